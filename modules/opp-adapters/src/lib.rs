mod adapter;
mod adapters;
mod circuit_breaker;
mod http_base;
mod registry;
mod retry;

pub use adapter::{merge_with_fallback, SourceAdapter};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use http_base::{build_client, fetch_json};
pub use registry::{build_default_registry, RegisteredSource, SourceRegistry};
pub use retry::with_backoff;
