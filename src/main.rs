//! site-gate
//!
//! Front door for the travel site. Checks every request against the
//! protected prefixes and the session cookie, then either redirects to the
//! login page or forwards to the rendering server.
//!
//! ```text
//!   Client ──▶ request id ──▶ trace ──▶ session gate ──┬──▶ forward ──▶ Rendering
//!                                                      │                 server
//!                                                      └──▶ 307 /login?redirect=…
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use site_gate::config::{load_or_default, GateConfig};
use site_gate::gate::request::parse_cookie_header;
use site_gate::lifecycle::signals::forward_signals;
use site_gate::observability::{init_logging, metrics};
use site_gate::{Gate, HttpServer, InboundRequest, Shutdown};

#[derive(Parser)]
#[command(name = "site-gate")]
#[command(about = "Session gate for protected site routes", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gate in front of the upstream (default)
    Serve,
    /// Evaluate one request offline and print the decision as JSON
    Check {
        /// Request path, optionally with query string
        path: String,
        /// Cookie as name=value; repeatable
        #[arg(long = "cookie", value_name = "NAME=VALUE")]
        cookies: Vec<String>,
    },
    /// Load and validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Check { path, cookies } => check(&config, path, &cookies),
        Commands::Validate => {
            println!(
                "configuration ok: {} protected prefix(es), login at {}, upstream {}",
                config.gate.protected_prefixes.len(),
                config.gate.login_path,
                config.upstream.address
            );
            Ok(())
        }
    }
}

async fn serve(config: GateConfig) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&config.observability);

    tracing::info!("site-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        protected_prefixes = ?config.gate.protected_prefixes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();
    tokio::spawn(forward_signals(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(config: &GateConfig, path: String, cookies: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if !path.starts_with('/') {
        return Err(format!("path {path:?} must start with '/'").into());
    }

    let mut jar = HashMap::new();
    for cookie in cookies {
        match parse_cookie_header(cookie).next() {
            Some((name, value)) => {
                jar.entry(name.to_string()).or_insert_with(|| value.to_string());
            }
            None => return Err(format!("cookie {cookie:?} is not NAME=VALUE").into()),
        }
    }

    let gate = Gate::from_settings(&config.gate);
    let decision = gate.decide(&InboundRequest::new(path, jar));
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
