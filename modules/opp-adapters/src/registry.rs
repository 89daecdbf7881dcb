use std::collections::HashMap;
use std::sync::Arc;

use opp_common::config::Config;

use crate::adapter::SourceAdapter;
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};

/// One adapter plus the breaker that gates it. The breaker is owned here,
/// not by the adapter, so an orchestrator run can inspect its state
/// without downcasting the adapter trait object.
pub struct RegisteredSource {
    pub adapter: Arc<dyn SourceAdapter>,
    pub breaker: CircuitBreaker,
}

pub struct SourceRegistry {
    sources: HashMap<String, RegisteredSource>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>, breaker_config: CircuitBreakerConfig) {
        let name = adapter.source_name().to_string();
        self.sources.insert(
            name,
            RegisteredSource {
                adapter,
                breaker: CircuitBreaker::new(breaker_config),
            },
        );
    }

    pub fn get(&self, source_name: &str) -> Option<&RegisteredSource> {
        self.sources.get(source_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Sources enabled for this run, honoring the config's allow/deny list.
    pub fn enabled(&self, config: &Config) -> Vec<&RegisteredSource> {
        self.sources
            .values()
            .filter(|s| config.is_source_enabled(s.adapter.source_name()))
            .collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the registry of all known sources. Adapters that fail to
/// construct (e.g. TLS backend unavailable) are skipped with a log line
/// rather than failing the whole registry.
pub fn build_default_registry(config: &Config) -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    let breaker_config = CircuitBreakerConfig {
        failure_threshold: config.circuit_breaker_failure_threshold,
        reset_timeout: std::time::Duration::from_secs(config.circuit_breaker_reset_timeout_seconds),
        half_open_max_calls: config.circuit_breaker_half_open_max_calls,
    };

    match crate::adapters::devpost::DevpostAdapter::new() {
        Ok(adapter) => registry.register(Arc::new(adapter), breaker_config),
        Err(e) => tracing::error!(error = %e, "failed to construct devpost adapter"),
    }

    match crate::adapters::grants_gov::GrantsGovAdapter::new() {
        Ok(adapter) => registry.register(Arc::new(adapter), breaker_config),
        Err(e) => tracing::error!(error = %e, "failed to construct grants_gov adapter"),
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_known_sources() {
        let config = Config {
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
        let registry = build_default_registry(&config);
        let names: Vec<&str> = registry.names().collect();
        assert!(names.contains(&"devpost"));
        assert!(names.contains(&"grants_gov"));
    }
}
