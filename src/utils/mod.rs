use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber. `RUST_LOG`, when set and valid, wins over
/// `default_filter`. A subscriber installed earlier by the host is left in place.
pub fn init_tracing(default_filter: &str) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(default_filter, from_env.as_deref());

    let _ = fmt().with_env_filter(filter).try_init();
}

/// Builds the filter `init_tracing` installs: a valid, non-empty override wins,
/// otherwise `default_filter` applies.
pub fn env_filter(default_filter: &str, env_override: Option<&str>) -> EnvFilter {
    env_override
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_applies_without_override() {
        let filter = env_filter("budget_core=debug", None).to_string();
        assert!(filter.contains("budget_core=debug"), "{filter}");
    }

    #[test]
    fn valid_override_wins() {
        let filter = env_filter("budget_core=debug", Some("budget_core=trace")).to_string();
        assert!(filter.contains("budget_core=trace"), "{filter}");
        assert!(!filter.contains("budget_core=debug"), "{filter}");
    }

    #[test]
    fn blank_override_falls_back_to_default() {
        let filter = env_filter("wallet_budget=warn", Some("  ")).to_string();
        assert!(filter.contains("wallet_budget=warn"), "{filter}");
    }
}
