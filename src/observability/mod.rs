//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate middleware and forwarder produce:
//!     → logging.rs (structured log events, request ID in every line)
//!     → metrics.rs (decision counters, request counters, latency)
//!
//! Consumers:
//!     → stdout (log aggregation)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
