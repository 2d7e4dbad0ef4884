//! Session gate for the travel site's protected back-office routes.
//!
//! Signed-out visitors asking for a protected path are redirected to the
//! login page with a return path; everything else is forwarded to the
//! rendering server.

pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use gate::{Gate, GateDecision, InboundRequest};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
