#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use momentum_dashboard::api::ScanSource;
use momentum_dashboard::config::Config;
use momentum_dashboard::error::{Error, Result};
use momentum_dashboard::models::{Candidate, PricePoint, Rejection, ScanSnapshot, SignalStatus};

// Helper to create a default test config
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.api.request_timeout_secs = Some(5);
    config
}

pub fn candidate(ticker: &str, status: SignalStatus, price: f64) -> Candidate {
    Candidate::new(ticker, status, price)
}

pub fn snapshot(candidates: Vec<Candidate>, rejected: Vec<(&str, &str)>) -> ScanSnapshot {
    ScanSnapshot::new(
        candidates,
        rejected
            .into_iter()
            .map(|(ticker, reason)| Rejection {
                ticker: ticker.to_string(),
                reason: reason.to_string(),
            })
            .collect(),
    )
}

/// Scripted `ScanSource`. Scan responses are handed out in call order;
/// each response and history series resolves after its own delay.
#[derive(Default)]
pub struct FakeSource {
    scans: Mutex<VecDeque<(Duration, Result<ScanSnapshot>)>>,
    history: Mutex<HashMap<String, (Duration, Vec<PricePoint>)>>,
    scan_calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scan(&self, delay: Duration, result: Result<ScanSnapshot>) {
        self.scans.lock().unwrap().push_back((delay, result));
    }

    pub fn set_history(&self, ticker: &str, delay: Duration, points: Vec<PricePoint>) {
        self.history
            .lock()
            .unwrap()
            .insert(ticker.to_string(), (delay, points));
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanSource for FakeSource {
    async fn fetch_scan(&self) -> Result<ScanSnapshot> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.scans.lock().unwrap().pop_front();
        match next {
            Some((delay, result)) => {
                tokio::time::sleep(delay).await;
                result
            }
            None => Err(Error::Transport("no scripted scan response".to_string())),
        }
    }

    async fn fetch_history(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let entry = self.history.lock().unwrap().get(ticker).cloned();
        match entry {
            Some((delay, points)) => {
                tokio::time::sleep(delay).await;
                Ok(points)
            }
            None => Err(Error::Protocol {
                status: 404,
                url: format!("/history/{}", ticker),
            }),
        }
    }
}

/// Canned HTTP response for one request path.
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn ok(path: &'static str, body: &str) -> Self {
        Self { path, status: 200, body: body.to_string() }
    }

    pub fn status(path: &'static str, status: u16, body: &str) -> Self {
        Self { path, status, body: body.to_string() }
    }
}

/// Minimal HTTP/1.1 responder on an ephemeral port. Unknown paths get 404.
/// Returns the base URL.
pub async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let head = String::from_utf8_lossy(&buf);
            let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

            let (status, body) = routes
                .iter()
                .find(|route| route.path == path)
                .map(|route| (route.status, route.body.clone()))
                .unwrap_or((404, "{\"detail\":\"Not Found\"}".to_string()));
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}
