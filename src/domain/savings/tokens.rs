/// Estimate the token count of `text` as one token per four characters,
/// rounded up, never below one.
pub fn estimate_tokens(text: &str) -> u64 {
    let chars = text.chars().count() as u64;
    chars.div_ceil(4).max(1)
}
