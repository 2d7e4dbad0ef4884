//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use site_gate::config::GateConfig;
use site_gate::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock upstream that answers every request with 200 and a body
/// echoing the request line, so tests can see what was forwarded.
pub async fn start_echo_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        let request_line = head.lines().next().unwrap_or_default().to_string();
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            request_line.len(),
                            request_line
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start the gate on `gate_addr` in front of `upstream_addr`.
pub async fn start_gate(
    gate_addr: SocketAddr,
    upstream_addr: SocketAddr,
    tweak: impl FnOnce(&mut GateConfig),
) -> Shutdown {
    let mut config = GateConfig::default();
    config.listener.bind_address = gate_addr.to_string();
    config.upstream.address = upstream_addr.to_string();
    tweak(&mut config);

    let server = HttpServer::new(&config).unwrap();
    let listener = TcpListener::bind(gate_addr).await.unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
