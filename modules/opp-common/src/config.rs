use std::collections::HashMap;
use std::env;

/// Core-recognized configuration keys. Everything else belongs to
/// collaborators outside the core and is not parsed here.
#[derive(Debug, Clone)]
pub struct Config {
    pub scraper_interval_hours: u32,
    pub scraper_request_delay_seconds: u64,
    /// Per-adapter enable flags, keyed by source name (`scraper_<name>_enabled`).
    pub scraper_enabled: HashMap<String, bool>,

    pub embedding_provider_key: String,

    pub record_store_url: String,
    pub record_store_database: String,

    pub circuit_breaker_failure_threshold: u32,
    pub circuit_breaker_reset_timeout_seconds: u64,
    pub circuit_breaker_half_open_max_calls: u32,
}

impl Config {
    /// Load configuration from environment variables. Panics with a clear
    /// message if a required var is missing — failing fast at boot beats a
    /// silent misconfiguration surfacing mid-run.
    pub fn from_env() -> Self {
        Self {
            scraper_interval_hours: env_or("SCRAPER_INTERVAL_HOURS", 6),
            scraper_request_delay_seconds: env_or("SCRAPER_REQUEST_DELAY_SECONDS", 2),
            scraper_enabled: scraper_enabled_flags(),
            embedding_provider_key: required_env("EMBEDDING_PROVIDER_KEY"),
            record_store_url: required_env("RECORD_STORE_URL"),
            record_store_database: env::var("RECORD_STORE_DATABASE")
                .unwrap_or_else(|_| "opportunities".to_string()),
            circuit_breaker_failure_threshold: env_or("CIRCUIT_BREAKER_FAILURE_THRESHOLD", 5),
            circuit_breaker_reset_timeout_seconds: env_or(
                "CIRCUIT_BREAKER_RESET_TIMEOUT_SECONDS",
                300,
            ),
            circuit_breaker_half_open_max_calls: env_or("CIRCUIT_BREAKER_HALF_OPEN_MAX_CALLS", 3),
        }
    }

    /// Whether the named adapter is enabled. Defaults to enabled when the
    /// flag is absent — adapters opt out, not in.
    pub fn is_source_enabled(&self, source_name: &str) -> bool {
        self.scraper_enabled.get(source_name).copied().unwrap_or(true)
    }
}

fn scraper_enabled_flags() -> HashMap<String, bool> {
    let prefix = "SCRAPER_";
    let suffix = "_ENABLED";
    env::vars()
        .filter_map(|(k, v)| {
            let upper = k.to_uppercase();
            if upper.starts_with(prefix) && upper.ends_with(suffix) {
                let name = upper[prefix.len()..upper.len() - suffix.len()].to_lowercase();
                let enabled = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes");
                Some((name, enabled))
            } else {
                None
            }
        })
        .collect()
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable not set"))
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_source_flag_defaults_enabled() {
        let cfg = Config {
            scraper_interval_hours: 6,
            scraper_request_delay_seconds: 2,
            scraper_enabled: HashMap::new(),
            embedding_provider_key: String::new(),
            record_store_url: String::new(),
            record_store_database: String::new(),
            circuit_breaker_failure_threshold: 5,
            circuit_breaker_reset_timeout_seconds: 300,
            circuit_breaker_half_open_max_calls: 3,
        };
        assert!(cfg.is_source_enabled("devpost"));
    }

    #[test]
    fn explicit_disable_flag_is_honoured() {
        let mut enabled = HashMap::new();
        enabled.insert("devpost".to_string(), false);
        let cfg = Config {
            scraper_interval_hours: 6,
            scraper_request_delay_seconds: 2,
            scraper_enabled: enabled,
            embedding_provider_key: String::new(),
            record_store_url: String::new(),
            record_store_database: String::new(),
            circuit_breaker_failure_threshold: 5,
            circuit_breaker_reset_timeout_seconds: 300,
            circuit_breaker_half_open_max_calls: 3,
        };
        assert!(!cfg.is_source_enabled("devpost"));
        assert!(cfg.is_source_enabled("mlh"));
    }
}
