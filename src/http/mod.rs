//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign x-request-id)
//!     → middleware/session_gate.rs (Gate::decide)
//!         RedirectTo → 307 Location: /login?redirect=...
//!         Allow      → forward.rs (relay to upstream) → response to client
//! ```

pub mod forward;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{HttpServer, ServerError};
