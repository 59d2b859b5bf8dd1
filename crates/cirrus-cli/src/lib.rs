/// Shorten a string to `max_len` characters by eliding the middle.
///
/// Content identifiers and gateway links carry their distinguishing bits
/// at both ends, so the head and tail stay visible. Counts characters,
/// not bytes; file names are not always ASCII.
pub fn shorten_middle(s: &str, max_len: usize) -> String {
    let total = s.chars().count();
    if total <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return "...".to_string();
    }
    let keep = max_len - 3;
    let head = keep - keep / 2;
    let tail = keep / 2;
    let head_part: String = s.chars().take(head).collect();
    let tail_part: String = s.chars().skip(total - tail).collect();
    format!("{}...{}", head_part, tail_part)
}


/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
