// Log filter setup shared by the binary and demos
// RUST_LOG wins when set; otherwise `default` applies to everything.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Filter from RUST_LOG, falling back to `default`
pub fn env_filter(default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

fn filter_from(default: LevelFilter, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_when_unset() {
        let filter = filter_from(LevelFilter::INFO, "");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_rust_log_can_raise_level() {
        let filter = filter_from(LevelFilter::INFO, "debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_can_lower_level() {
        let filter = filter_from(LevelFilter::INFO, "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
