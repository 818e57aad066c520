//! Failure injection tests for the caching proxy.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{client, proxy_config, start_origin, start_proxy, MockResponse};

#[tokio::test]
async fn test_non_json_body_is_not_cached() {
    let origin = start_origin(|_| MockResponse::json("not json")).await;
    let proxy = start_proxy(proxy_config(&origin.url())).await;
    let client = client();

    let first = client.get(proxy.url("/broken")).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(first.headers().get("x-cache").is_none());

    // Still a miss: the origin is asked again.
    let second = client.get(proxy.url("/broken")).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(origin.hits("/broken"), 2);
    assert!(proxy.cache.is_empty());
}

#[tokio::test]
async fn test_non_object_json_is_a_decode_failure() {
    let origin = start_origin(|path| match path {
        "/array" => MockResponse::json("[1,2,3]"),
        "/number" => MockResponse::json("42"),
        _ => MockResponse::json("null"),
    })
    .await;
    let proxy = start_proxy(proxy_config(&origin.url())).await;
    let client = client();

    for path in ["/array", "/number", "/null"] {
        let res = client.get(proxy.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
    }
    assert!(proxy.cache.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_bad_gateway() {
    // Bind then drop to get a port nothing listens on.
    let dead = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let proxy = start_proxy(proxy_config(&format!("http://{}", dead_addr))).await;

    let res = client().get(proxy.url("/anything")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(proxy.cache.is_empty());
}

#[tokio::test]
async fn test_slow_origin_times_out_as_bad_gateway() {
    let origin = start_origin(|_| {
        MockResponse::json(r#"{"late":true}"#).delay(Duration::from_secs(3))
    })
    .await;
    let mut config = proxy_config(&origin.url());
    config.timeouts.origin_secs = 1;
    let proxy = start_proxy(config).await;

    let res = client().get(proxy.url("/slow")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(proxy.cache.is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let origin = start_origin(|_| MockResponse::json(r#"{"padding":"0123456789abcdef"}"#)).await;
    let mut config = proxy_config(&origin.url());
    config.origin.max_body_bytes = 16;
    let proxy = start_proxy(config).await;

    let res = client().get(proxy.url("/big")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(proxy.cache.is_empty());
}

#[tokio::test]
async fn test_recovers_once_origin_is_fixed() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let origin = start_origin(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            MockResponse::json("<html>upstream error</html>").status(500)
        } else {
            MockResponse::json(r#"{"healthy":true}"#)
        }
    })
    .await;
    let proxy = start_proxy(proxy_config(&origin.url())).await;
    let client = client();

    let first = client.get(proxy.url("/flaky")).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let second = client.get(proxy.url("/flaky")).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers()["x-cache"], "MISS");

    let third = client.get(proxy.url("/flaky")).send().await.unwrap();
    assert_eq!(third.headers()["x-cache"], "HIT");
    assert_eq!(third.json::<Value>().await.unwrap(), json!({"healthy": true}));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
