//! Cache entry types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Where a cache entry came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheSource {
    /// Produced by this process after a successful upstream call
    #[default]
    Local,
    /// Pulled in from the shared remote snapshot
    Remote,
}

impl CacheSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Remote => "REMOTE",
        }
    }

    /// Lenient parse. Older publishers wrote `S3` for remote entries and
    /// sometimes left the field empty.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "REMOTE" | "S3" => Self::Remote,
            _ => Self::Local,
        }
    }
}

impl fmt::Display for CacheSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CacheSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// A cached question/answer pair with its embedding.
///
/// Serializes to the snapshot wire format. Decoding also accepts the
/// PascalCase field names used by earlier snapshot writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(alias = "Vector", default, deserialize_with = "null_as_default")]
    vector: Vec<f32>,
    #[serde(alias = "Answer", default, deserialize_with = "null_as_default")]
    answer: String,
    #[serde(alias = "Question", default, deserialize_with = "null_as_default")]
    question: String,
    #[serde(alias = "CreatedAt", default = "unix_epoch")]
    created_at: DateTime<Utc>,
    #[serde(alias = "Source", default)]
    source: CacheSource,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl CacheEntry {
    /// Create a LOCAL entry stamped with the current time
    pub fn new(vector: Vec<f32>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            vector,
            answer: answer.into(),
            question: question.into(),
            created_at: Utc::now(),
            source: CacheSource::Local,
        }
    }

    /// Override the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: CacheSource) -> Self {
        self.source = source;
        self
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Question with surrounding whitespace removed, used as the merge key
    pub fn question_key(&self) -> &str {
        self.question.trim()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source(&self) -> CacheSource {
        self.source
    }
}

/// A cache entry that matched a query, with the score computed for that query
#[derive(Debug, Clone)]
pub struct MatchedEntry {
    pub entry: CacheEntry,
    pub similarity: f64,
}

impl MatchedEntry {
    pub fn new(entry: CacheEntry, similarity: f64) -> Self {
        Self { entry, similarity }
    }
}
