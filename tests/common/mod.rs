//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request received by the mock collector.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: Value,
}

impl CapturedRequest {
    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}

/// Mock error-tracking collector.
#[derive(Clone)]
pub struct Collector {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl Collector {
    pub fn endpoint(&self) -> String {
        format!("http://{}/api/events", self.addr)
    }

    pub fn received(&self) -> Vec<CapturedRequest> {
        self.received.lock().unwrap().clone()
    }
}

/// Start a collector answering every POST with `status` after `delay`.
pub async fn start_collector(status: u16, delay: Duration) -> Collector {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let collector = Collector {
        addr: listener.local_addr().unwrap(),
        received: Arc::new(Mutex::new(Vec::new())),
    };

    let received = collector.received.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let received = received.clone();
                    tokio::spawn(async move {
                        let mut socket = socket;
                        if let Some(request) = read_request(&mut socket).await {
                            received.lock().unwrap().push(request);
                            respond(&mut socket, status, delay).await;
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    collector
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = serde_json::from_slice(&buf[header_end..]).unwrap_or(Value::Null);

    Some(CapturedRequest { head, body })
}

async fn respond(socket: &mut TcpStream, status: u16, delay: Duration) {
    tokio::time::sleep(delay).await;
    let status_text = match status {
        200 => "200 OK",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status_text
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}
