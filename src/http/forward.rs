//! Upstream forwarding for requests the gate allowed.
//!
//! # Responsibilities
//! - Rewrite the request URI to the upstream authority
//! - Forward method, headers and body unchanged
//! - Stream the upstream response back
//!
//! # Design Decisions
//! - Single upstream, plain HTTP/1.1
//! - Host header is preserved so the rendering server sees the public host
//! - Upstream failure → 502 Bad Gateway

use std::str::FromStr;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::{request_id, X_REQUEST_ID};

/// Client and target for the rendering server.
#[derive(Debug, Clone)]
pub struct Upstream {
    authority: Authority,
    client: Client<HttpConnector, Body>,
}

impl Upstream {
    pub fn new(authority: Authority) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { authority, client }
    }

    pub fn parse(address: &str) -> Result<Self, axum::http::uri::InvalidUri> {
        Authority::from_str(address).map(Self::new)
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// URI of `original` on the upstream.
    pub fn target_uri(&self, original: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = original
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// Fallback handler: forward the request to the upstream.
pub async fn forward_handler(State(upstream): State<Upstream>, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();

    parts.uri = match upstream.target_uri(&parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_REQUEST, "Bad request target").into_response();
        }
    };

    if let Ok(value) = request_id.parse() {
        parts.headers.insert(X_REQUEST_ID, value);
    }

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        uri = %parts.uri,
        "Forwarding request upstream"
    );

    match upstream.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
