//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Canned reply of a mock Solr server.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl MockReply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("application/json; charset=UTF-8"),
            body: body.into(),
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("text/html; charset=utf-8"),
            body: body.into(),
        }
    }
}

pub const OK_BODY: &str = r#"{"responseHeader":{"status":0,"QTime":3},"response":{"numFound":2,"start":0,"docs":[{"id":"1"},{"id":"2"}]}}"#;

/// A running mock server and the request heads it has received.
#[derive(Debug, Clone)]
pub struct MockServer {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    pub fn base_url(&self) -> String {
        format!("http://{}/solr", self.addr)
    }

    /// Request lines (`GET /solr/select?... HTTP/1.1`) received so far.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|head| head.lines().next().map(str::to_string))
            .collect()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a mock backend on an ephemeral port that answers every request with `reply`.
pub async fn start_mock_backend(reply: MockReply) -> MockServer {
    start_programmable_backend(move |_head| reply.clone()).await
}

/// Start a mock backend whose reply is computed from the request head.
pub async fn start_programmable_backend<F>(f: F) -> MockServer
where
    F: Fn(&str) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        recorded.lock().unwrap().push(head.clone());
                        let reply = f(&head);

                        let mut response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            reply.status,
                            reason(reply.status),
                            reply.body.len()
                        );
                        if let Some(ct) = reply.content_type {
                            response.push_str(&format!("Content-Type: {ct}\r\n"));
                        }
                        response.push_str("\r\n");
                        response.push_str(&reply.body);

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockServer { addr, requests }
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let recorded = requests.clone();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            let head = read_head(&mut socket).await;
            recorded.lock().unwrap().push(head);
            held.push(socket);
        }
    });

    MockServer { addr, requests }
}

/// Address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
