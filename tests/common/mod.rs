//! Shared utilities for integration and load testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use caching_proxy::config::ProxyConfig;
use caching_proxy::http::HttpServer;
use caching_proxy::CacheStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// What the mock origin answers for one request.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(&'static str, String)>,
    pub delay: Duration,
}

#[allow(dead_code)]
impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: vec![("Content-Type", "application/json".to_string())],
            delay: Duration::ZERO,
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock origin that records every request it receives.
#[derive(Clone)]
pub struct MockOrigin {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

#[allow(dead_code)]
impl MockOrigin {
    /// Base URL to configure as the proxy origin.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received for exactly `target` (path plus query).
    pub fn hits(&self, target: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, t)| t == target)
            .count()
    }

    /// Number of requests received in total.
    pub fn total_hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Methods received, in arrival order.
    pub fn methods(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }
}

/// Start a programmable mock origin on an ephemeral port.
pub async fn start_origin<F>(handler: F) -> MockOrigin
where
    F: Fn(&str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        serve_one(socket, handler.as_ref(), &recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockOrigin { addr, requests }
}

/// Start a mock origin that answers every path with the same JSON body.
#[allow(dead_code)]
pub async fn start_json_origin(body: &'static str) -> MockOrigin {
    start_origin(move |_| MockResponse::json(body)).await
}

async fn serve_one<F>(mut socket: TcpStream, handler: &F, recorded: &Mutex<Vec<(String, String)>>)
where
    F: Fn(&str) -> MockResponse,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();
    recorded.lock().unwrap().push((method, target.clone()));

    let response = handler(&target);
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let mut out = format!("HTTP/1.1 {} {}\r\n", response.status, reason(response.status));
    for (name, value) in &response.headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.body.len(),
        response.body
    ));
    let _ = socket.write_all(out.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// A running proxy under test.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub cache: Arc<dyn CacheStore>,
    shutdown: Option<oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Config pointing at `origin`, listening on an ephemeral port.
pub fn proxy_config(origin: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.origin.url = origin.to_string();
    config
}

/// Start a proxy with `config` on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let server = HttpServer::new(config).unwrap();
    let cache = server.cache();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let stopped = async move {
            let _ = rx.await;
        };
        let _ = server.run(listener, stopped).await;
    });

    TestProxy {
        addr,
        cache,
        shutdown: Some(tx),
    }
}

/// HTTP client that bypasses any environment proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
