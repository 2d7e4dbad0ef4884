//! Allow/redirect decision for one request.

use serde::Serialize;

use crate::config::GateSettings;
use crate::gate::{InboundRequest, ProtectedPrefixes, RedirectBuilder, SessionSignal};

/// Outcome of the gate for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "location", rename_all = "snake_case")]
pub enum GateDecision {
    /// Continue normal request handling.
    Allow,
    /// Send the visitor to this same-origin location.
    RedirectTo(String),
}

impl GateDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }

    /// Label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            GateDecision::Allow => "allow",
            GateDecision::RedirectTo(_) => "redirect",
        }
    }
}

/// The request gate.
///
/// A pure function of the request and the configuration it was built with:
/// no I/O, no interior mutability, safe to share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    prefixes: ProtectedPrefixes,
    signal: SessionSignal,
    redirect: RedirectBuilder,
}

impl Gate {
    pub fn new(prefixes: ProtectedPrefixes, signal: SessionSignal, redirect: RedirectBuilder) -> Self {
        Self {
            prefixes,
            signal,
            redirect,
        }
    }

    pub fn from_settings(settings: &GateSettings) -> Self {
        Self::new(
            ProtectedPrefixes::new(settings.protected_prefixes.iter().cloned()),
            SessionSignal::new(settings.session_cookie.clone()),
            RedirectBuilder::new(settings.login_path.clone(), settings.redirect_param.clone()),
        )
    }

    pub fn prefixes(&self) -> &ProtectedPrefixes {
        &self.prefixes
    }

    pub fn signal(&self) -> &SessionSignal {
        &self.signal
    }

    pub fn redirect(&self) -> &RedirectBuilder {
        &self.redirect
    }

    /// Decide whether `request` may proceed.
    ///
    /// Fails closed: a protected path is only allowed when the session signal
    /// is positively present.
    pub fn decide(&self, request: &InboundRequest) -> GateDecision {
        if !self.prefixes.matches(request.path()) {
            return GateDecision::Allow;
        }

        if self.signal.is_signed_in(request) {
            return GateDecision::Allow;
        }

        GateDecision::RedirectTo(self.redirect.location_for(request.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn gate() -> Gate {
        Gate::new(
            ProtectedPrefixes::new(["/admin", "/dashboard"]),
            SessionSignal::default(),
            RedirectBuilder::default(),
        )
    }

    fn request(path: &str, logged_in: Option<&str>) -> InboundRequest {
        let mut cookies = HashMap::new();
        if let Some(v) = logged_in {
            cookies.insert("logged_in".to_string(), v.to_string());
        }
        InboundRequest::new(path, cookies)
    }

    #[test]
    fn test_public_paths_always_allowed() {
        let gate = gate();
        for cookie in [None, Some("true"), Some("false"), Some("garbage")] {
            assert_eq!(gate.decide(&request("/", cookie)), GateDecision::Allow);
            assert_eq!(gate.decide(&request("/tours/bali", cookie)), GateDecision::Allow);
            assert_eq!(gate.decide(&request("/adminpanel", cookie)), GateDecision::Allow);
        }
    }

    #[test]
    fn test_protected_path_with_session_allowed() {
        let gate = gate();
        assert_eq!(gate.decide(&request("/admin", Some("true"))), GateDecision::Allow);
        assert_eq!(
            gate.decide(&request("/dashboard/finance", Some("true"))),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_protected_path_without_session_redirects() {
        let gate = gate();
        assert_eq!(
            gate.decide(&request("/admin/users?tab=active", None)),
            GateDecision::RedirectTo("/login?redirect=%2Fadmin%2Fusers%3Ftab%3Dactive".into())
        );
        for value in ["", "false", "TRUE", "1"] {
            let decision = gate.decide(&request("/admin", Some(value)));
            assert_eq!(decision, GateDecision::RedirectTo("/login?redirect=%2Fadmin".into()));
        }
    }

    #[test]
    fn test_decision_is_repeatable() {
        let gate = gate();
        let req = request("/dashboard?x=1", Some("nope"));
        assert_eq!(gate.decide(&req), gate.decide(&req));
    }

    #[test]
    fn test_from_settings() {
        let settings = GateSettings {
            protected_prefixes: vec!["/backoffice".into()],
            login_path: "/signin".into(),
            session_cookie: "sess".into(),
            redirect_param: "next".into(),
            ..GateSettings::default()
        };
        let gate = Gate::from_settings(&settings);
        assert_eq!(
            gate.decide(&request("/backoffice/roles", Some("true"))),
            GateDecision::RedirectTo("/signin?next=%2Fbackoffice%2Froles".into())
        );
        assert_eq!(gate.decide(&request("/admin", None)), GateDecision::Allow);
    }

    #[test]
    fn test_decision_serializes_for_cli() {
        let allow = serde_json::to_value(GateDecision::Allow).unwrap();
        assert_eq!(allow, serde_json::json!({ "decision": "allow" }));

        let redirect = serde_json::to_value(GateDecision::RedirectTo("/login?redirect=%2F".into())).unwrap();
        assert_eq!(
            redirect,
            serde_json::json!({ "decision": "redirect_to", "location": "/login?redirect=%2F" })
        );
        assert_eq!(GateDecision::Allow.outcome(), "allow");
    }
}
