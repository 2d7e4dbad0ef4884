//! End-to-end tests: client → gate → mock upstream.

use std::net::SocketAddr;

use reqwest::header::{COOKIE, LOCATION};
use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_public_page_is_forwarded_without_session() {
    let upstream: SocketAddr = "127.0.0.1:28381".parse().unwrap();
    let gate: SocketAddr = "127.0.0.1:28382".parse().unwrap();
    common::start_echo_backend(upstream).await;
    let shutdown = common::start_gate(gate, upstream, |_| {}).await;

    let res = common::client()
        .get(format!("http://{}/destinations/bali?nights=3", gate))
        .send()
        .await
        .expect("Gate unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "GET /destinations/bali?nights=3 HTTP/1.1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_protected_page_redirects_to_login() {
    let upstream: SocketAddr = "127.0.0.1:28481".parse().unwrap();
    let gate: SocketAddr = "127.0.0.1:28482".parse().unwrap();
    common::start_echo_backend(upstream).await;
    let shutdown = common::start_gate(gate, upstream, |_| {}).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/admin/users?tab=active", gate))
        .send()
        .await
        .expect("Gate unreachable");
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers()[LOCATION],
        "/login?redirect=%2Fadmin%2Fusers%3Ftab%3Dactive"
    );

    let res = client
        .get(format!("http://{}/admin", gate))
        .header(COOKIE, "logged_in=false")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    shutdown.trigger();
}

#[tokio::test]
async fn test_protected_page_is_forwarded_with_session() {
    let upstream: SocketAddr = "127.0.0.1:28581".parse().unwrap();
    let gate: SocketAddr = "127.0.0.1:28582".parse().unwrap();
    common::start_echo_backend(upstream).await;
    let shutdown = common::start_gate(gate, upstream, |_| {}).await;

    let res = common::client()
        .get(format!("http://{}/dashboard/finance", gate))
        .header(COOKIE, "locale=en; logged_in=true")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "GET /dashboard/finance HTTP/1.1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_custom_gate_settings() {
    let upstream: SocketAddr = "127.0.0.1:28681".parse().unwrap();
    let gate: SocketAddr = "127.0.0.1:28682".parse().unwrap();
    common::start_echo_backend(upstream).await;
    let shutdown = common::start_gate(gate, upstream, |config| {
        config.gate.protected_prefixes = vec!["/backoffice".into()];
        config.gate.login_path = "/auth/sign-in".into();
        config.gate.redirect_param = "next".into();
        config.gate.redirect_status = 303;
    })
    .await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/backoffice/roles", gate))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[LOCATION], "/auth/sign-in?next=%2Fbackoffice%2Froles");

    // No longer protected under this configuration.
    let res = client.get(format!("http://{}/admin", gate)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Nothing listens on the upstream port.
    let upstream: SocketAddr = "127.0.0.1:28781".parse().unwrap();
    let gate: SocketAddr = "127.0.0.1:28782".parse().unwrap();
    let shutdown = common::start_gate(gate, upstream, |_| {}).await;
    let client = common::client();

    let res = client.get(format!("http://{}/hotels", gate)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    // The gate still answers protected paths on its own.
    let res = client.get(format!("http://{}/admin", gate)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    shutdown.trigger();
}

#[tokio::test]
async fn test_encoded_protected_path_is_gated() {
    let upstream: SocketAddr = "127.0.0.1:28881".parse().unwrap();
    let gate: SocketAddr = "127.0.0.1:28882".parse().unwrap();
    common::start_echo_backend(upstream).await;
    let shutdown = common::start_gate(gate, upstream, |_| {}).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/%61dmin/users", gate))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[LOCATION], "/login?redirect=%2F%2561dmin%2Fusers");

    let res = client
        .get(format!("http://{}/admin%2Fusers", gate))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    // With a session, upstream sees the same raw path the gate evaluated.
    let res = client
        .get(format!("http://{}/%61dmin/users", gate))
        .header(COOKIE, "logged_in=true")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "GET /%61dmin/users HTTP/1.1");

    shutdown.trigger();
}
