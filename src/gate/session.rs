//! Session signal extraction.
//!
//! The signal is a plain, unsigned cookie flag set by the login flow. It is a
//! routing hint, not a credential: the backend API re-checks authorization on
//! every protected call. Only the exact value `"true"` counts as signed in.

use crate::gate::InboundRequest;

/// Default cookie carrying the signed-in flag.
pub const DEFAULT_SESSION_COOKIE: &str = "logged_in";

const SIGNED_IN: &str = "true";

/// Reads the boolean session signal from a request's cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSignal {
    cookie_name: String,
}

impl SessionSignal {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// True only when the cookie is present and exactly `"true"`.
    pub fn is_signed_in(&self, request: &InboundRequest) -> bool {
        request.cookie(&self.cookie_name) == Some(SIGNED_IN)
    }
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_COOKIE)
    }
}
