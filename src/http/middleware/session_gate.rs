//! Session gate middleware.
//! Keeps signed-out visitors out of protected paths, and records every
//! response that passes through it.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{CACHE_CONTROL, COOKIE, LOCATION},
        HeaderValue, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::gate::{Gate, GateDecision, InboundRequest};
use crate::http::request::request_id;
use crate::observability::metrics;

/// State for [`session_gate`].
#[derive(Debug, Clone)]
pub struct GateState {
    pub gate: Arc<Gate>,
    pub redirect_status: StatusCode,
}

impl GateState {
    pub fn new(gate: Arc<Gate>, redirect_status: StatusCode) -> Self {
        Self {
            gate,
            redirect_status,
        }
    }
}

/// Map a hosted request onto the gate's `{ path, cookies }` shape.
///
/// Cookie headers that are not valid UTF-8 are skipped.
pub fn inbound_request<B>(request: &Request<B>) -> InboundRequest {
    let uri = request.uri();
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let cookie_headers = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok());

    InboundRequest::from_cookie_headers(path, cookie_headers)
}

pub async fn session_gate(
    State(state): State<GateState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let inbound = inbound_request(&request);
    let decision = state.gate.decide(&inbound);
    metrics::record_decision(decision.outcome());

    let request_id = request_id(request.headers()).to_string();
    let response = match decision {
        GateDecision::Allow => {
            tracing::debug!(request_id = %request_id, path = %inbound.path(), "Gate allowed request");
            next.run(request).await
        }
        GateDecision::RedirectTo(location) => {
            tracing::info!(
                request_id = %request_id,
                path = %inbound.path(),
                location = %location,
                "No session for protected path, redirecting to login"
            );
            redirect_response(state.redirect_status, &location)
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

fn redirect_response(status: StatusCode, location: &str) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (
            status,
            [
                (LOCATION, value),
                (CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
        )
            .into_response(),
        Err(e) => {
            // Still deny: a protected path never falls through.
            tracing::error!(location = %location, error = %e, "Unusable redirect location");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}
