//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gate in front of every path
//! - Wire up middleware (request ID, tracing, gate, body limit, timeout)
//! - Forward allowed requests to the upstream rendering server
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{uri::InvalidUri, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{validate_config, ConfigError, GateConfig};
use crate::gate::Gate;
use crate::http::forward::{forward_handler, Upstream};
use crate::http::middleware::{session_gate, GateState};
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;

/// Path of the gate's own liveness endpoint.
pub const HEALTH_PATH: &str = "/_gate/health";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid upstream address {address:?}: {source}")]
    Upstream {
        address: String,
        #[source]
        source: InvalidUri,
    },

    #[error("invalid redirect status {0}")]
    RedirectStatus(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// HTTP server hosting the gate.
pub struct HttpServer {
    router: Router,
    gate: Arc<Gate>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated here as well, so a config built in
    /// code gets the same checks as one loaded from disk.
    pub fn new(config: &GateConfig) -> Result<Self, ServerError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let upstream = Upstream::parse(&config.upstream.address).map_err(|source| {
            ServerError::Upstream {
                address: config.upstream.address.clone(),
                source,
            }
        })?;
        let redirect_status = StatusCode::from_u16(config.gate.redirect_status)
            .map_err(|_| ServerError::RedirectStatus(config.gate.redirect_status))?;

        let gate = Arc::new(Gate::from_settings(&config.gate));
        let router = Self::build_router(config, GateState::new(gate.clone(), redirect_status), upstream);

        Ok(Self { router, gate })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, gate_state: GateState, upstream: Upstream) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health))
            .fallback(forward_handler)
            .with_state(upstream)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(from_fn_with_state(gate_state, session_gate))
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The gate this server enforces.
    pub fn gate(&self) -> &Arc<Gate> {
        &self.gate
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            protected_prefixes = self.gate.prefixes().len(),
            login_path = %self.gate.redirect().login_path(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
