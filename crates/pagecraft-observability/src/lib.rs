//! Pagecraft observability.
//!
//! - Tracing subscriber setup: console, rolling log files, JSON logs and
//!   OpenTelemetry export
//! - HTTP request logging middleware
//! - Prometheus metrics with HTTP and authentication counters
//!
//! Everything beyond console logging sits behind the default `observability`
//! feature. At runtime `OBSERVABILITY_ENABLED=false` turns off OpenTelemetry
//! export and metrics collection.
//!
//! ```no_run
//! use pagecraft_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

mod basic_logging;
mod request_logging;

pub use basic_logging::init_basic_console_logging;
pub use request_logging::logging_middleware;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_middleware, track_authorization_check,
    track_login_failure, track_login_success, track_media_uploaded, track_token_issued,
    track_token_rejected, track_user_created,
};

// No-op stand-ins when the feature is compiled out.
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    impl PrometheusHandle {
        pub fn render(&self) -> String {
            String::new()
        }
    }

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn track_user_created(_role: &str) {}
    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_token_issued(_kind: &str) {}
    pub fn track_token_rejected(_reason: &str) {}
    pub fn track_authorization_check(_allowed: bool, _role: &str) {}
    pub fn track_media_uploaded(_bytes: u64) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
