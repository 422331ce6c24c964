//! Tracing initialization.

use tracing::Level;

/// Initialize the global tracing subscriber with the given level string.
///
/// Unknown level strings fall back to `info`. Safe to call once per process;
/// subsequent calls are ignored.
pub fn init_tracing(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing("debug");
        init_tracing("bogus-level");
    }
}
