//! Scripted HTTP/1.1 server for failures wiremock cannot produce, such as a
//! body cut short after the headers or a connection held open mid-body.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::socket_guard::should_skip_socket_bound_test;

/// One canned response.
#[derive(Debug, Clone)]
pub struct RawReply {
    status: u16,
    location: Option<String>,
    content_length: usize,
    body: Vec<u8>,
    delay: Duration,
    hold_open: Duration,
}

impl RawReply {
    /// A complete 200 response.
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            location: None,
            content_length: body.len(),
            body: body.to_vec(),
            delay: Duration::ZERO,
            hold_open: Duration::ZERO,
        }
    }

    /// A 200 that announces `content_length` bytes but sends only `body`.
    pub fn truncated(content_length: usize, body: &[u8]) -> Self {
        Self {
            content_length,
            ..Self::ok(body)
        }
    }

    /// A 302 to `location`.
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            location: Some(location.to_string()),
            ..Self::ok(b"")
        }
    }

    /// Waits before sending the status line.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Keeps the connection open this long after the body before closing.
    pub fn hold_open(mut self, duration: Duration) -> Self {
        self.hold_open = duration;
        self
    }

    fn head(&self) -> String {
        let reason = match self.status {
            200 => "OK",
            302 => "Found",
            _ => "Not Found",
        };
        let mut head = format!(
            "HTTP/1.1 {} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status, self.content_length
        );
        if let Some(location) = &self.location {
            head.push_str(&format!("Location: {location}\r\n"));
        }
        head.push_str("\r\n");
        head
    }
}

/// Serves `routes` by request path on an ephemeral port and returns its
/// base URI, or `None` when sockets cannot be bound here.
pub async fn start_raw_server_or_skip(routes: Vec<(&str, RawReply)>) -> Option<String> {
    if should_skip_socket_bound_test() {
        return None;
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    let routes: Arc<HashMap<String, RawReply>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect(),
    );

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve(stream, Arc::clone(&routes)));
        }
    });
    Some(uri)
}

async fn serve(mut stream: TcpStream, routes: Arc<HashMap<String, RawReply>>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or_default();
    let reply = routes.get(path).cloned().unwrap_or(RawReply {
        status: 404,
        ..RawReply::ok(b"")
    });

    tokio::time::sleep(reply.delay).await;
    if stream.write_all(reply.head().as_bytes()).await.is_err()
        || stream.write_all(&reply.body).await.is_err()
        || stream.flush().await.is_err()
    {
        return;
    }
    tokio::time::sleep(reply.hold_open).await;
}
