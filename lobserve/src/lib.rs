//! Production-friendly observability hooks for provider calls, tool invocations, and turns.
//!
//! ```rust
//! use lobserve::{MetricsObservabilityHooks, SafeTurnHooks, TracingObservabilityHooks};
//!
//! let _turn_hooks = SafeTurnHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;
mod tracing_setup;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeProviderHooks, SafeToolHooks, SafeTurnHooks};
pub use tracing_hooks::TracingObservabilityHooks;
pub use tracing_setup::{DEFAULT_LOG_LEVEL, env_filter, init_tracing};

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, SafeTurnHooks,
        TracingObservabilityHooks, init_tracing,
    };
}
