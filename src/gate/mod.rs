//! Request gate subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest { path, cookies }
//!     → matcher.rs (is the path under a protected prefix?)
//!         no  → Allow
//!         yes → session.rs (is logged_in exactly "true"?)
//!                   yes → Allow
//!                   no  → redirect.rs (/login?redirect=<encoded path>)
//!                         → RedirectTo(location)
//! ```
//!
//! # Design Decisions
//! - Framework-free: hosting adapters only supply path and cookies
//! - Pure: no I/O, no shared mutable state, no errors
//! - Fail closed: anything short of a positive signal redirects
//! - Configuration is passed in at construction, never read globally

pub mod decision;
pub mod matcher;
pub mod redirect;
pub mod request;
pub mod session;

pub use decision::{Gate, GateDecision};
pub use matcher::{PrefixMatcher, ProtectedPrefixes};
pub use redirect::RedirectBuilder;
pub use request::InboundRequest;
pub use session::SessionSignal;
