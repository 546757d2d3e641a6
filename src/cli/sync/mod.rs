//! Sync command - one download, merge and upload tick against the remote
//! snapshot. Starts from an empty local store, so the upload republishes
//! exactly what was downloaded.

use anyhow::Context;
use tracing::info;

use super::{init_logging, load_config};

pub async fn run() -> anyhow::Result<()> {
    let config = load_config();
    init_logging(&config);

    let components = crate::create_app_state_with_config(&config).await?;
    let sync = components
        .sync
        .context("remote sync is not configured; set S3_BUCKET_NAME and AWS_REGION")?;

    let report = sync.run_tick().await?;

    info!(
        merged = report.merge.merged,
        skipped = report.merge.skipped,
        uploaded = ?report.uploaded,
        "Sync tick complete"
    );

    Ok(())
}
