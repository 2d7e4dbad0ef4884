//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Keep the login redirect local and out of the protected set
//! - Validate addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::gate::ProtectedPrefixes;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("protected prefix {0:?} must start with '/' and contain no '?' or '#'")]
    InvalidPrefix(String),

    #[error("login path {0:?} must be a local path starting with a single '/' and contain no '\\', '?' or '#'")]
    InvalidLoginPath(String),

    #[error("login path {login_path:?} is covered by protected prefix {prefix:?}")]
    LoginPathProtected { login_path: String, prefix: String },

    #[error("session cookie name {0:?} is not a valid cookie name")]
    InvalidCookieName(String),

    #[error("redirect parameter must not be empty")]
    EmptyRedirectParam,

    #[error("redirect status {0} is not one of 302, 303, 307")]
    UnsupportedRedirectStatus(u16),

    #[error("bind address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("upstream address {0:?} is not a host:port authority")]
    InvalidUpstream(String),

    #[error("metrics address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let gate = &config.gate;

    for prefix in &gate.protected_prefixes {
        if !prefix.starts_with('/') || prefix.contains(['?', '#']) {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
        }
    }

    if is_local_path(&gate.login_path) {
        let prefixes = ProtectedPrefixes::new(gate.protected_prefixes.iter().cloned());
        if let Some(matched) = prefixes.first_match(&gate.login_path) {
            errors.push(ValidationError::LoginPathProtected {
                login_path: gate.login_path.clone(),
                prefix: matched.prefix().to_string(),
            });
        }
    } else {
        errors.push(ValidationError::InvalidLoginPath(gate.login_path.clone()));
    }

    if !is_cookie_name(&gate.session_cookie) {
        errors.push(ValidationError::InvalidCookieName(gate.session_cookie.clone()));
    }

    if gate.redirect_param.is_empty() {
        errors.push(ValidationError::EmptyRedirectParam);
    }

    if !matches!(gate.redirect_status, 302 | 303 | 307) {
        errors.push(ValidationError::UnsupportedRedirectStatus(gate.redirect_status));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    let upstream_ok = Authority::from_str(&config.upstream.address)
        .map(|a| a.port_u16().is_some() && !a.as_str().contains('@'))
        .unwrap_or(false);
    if !upstream_ok {
        errors.push(ValidationError::InvalidUpstream(config.upstream.address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `/login` is local; `//evil.example`, `https://...` and `/\evil` are not.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains(['\\', '?', '#'])
        && !path.chars().any(char::is_control)
}

/// RFC 6265 cookie-name: a non-empty HTTP token.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}
