use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TABHOP_LOG";
pub const DEFAULT_FILTER: &str = "warn";

/// Filter directives: `$TABHOP_LOG`, then the configured filter, then `warn`
pub fn filter_directives(configured: Option<&str>) -> String {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| configured.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber, writing to stderr.
///
/// stdout is reserved for the stdio transport. Calling this twice is harmless.
pub fn init(configured: Option<&str>) {
    let directives = filter_directives(configured);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_filter_used_without_env() {
        if std::env::var_os(LOG_ENV).is_some() {
            return;
        }
        assert_eq!(filter_directives(Some("tabhop=debug")), "tabhop=debug");
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_init_twice() {
        init(Some("not a [valid filter"));
        init(None);
    }
}
