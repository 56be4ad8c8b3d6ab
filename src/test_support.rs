//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

use crate::domain::{FileType, ListingEntry};
use crate::fetcher::{DirectoryFetcher, FetchError, Listing};
use crate::listing::classify;

/// Serve exactly one HTTP response on a random local port and return the
/// server's base URL.
pub async fn serve_once(status: &str, body: impl Into<Vec<u8>>) -> Url {
    serve_once_capturing(status, body).await.0
}

/// Like [`serve_once`], also handing back the request head the client sent.
pub async fn serve_once_capturing(
    status: &str,
    body: impl Into<Vec<u8>>,
) -> (Url, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let status = status.to_string();
    let body = body.into();
    let (head_tx, head_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let _ = head_tx.send(String::from_utf8_lossy(&request).into_owned());

        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        socket.shutdown().await.ok();
    });

    (Url::parse(&format!("http://{}/", addr)).unwrap(), head_rx)
}

/// Accept one connection and never answer it.
pub async fn serve_silent() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(socket);
    });

    Url::parse(&format!("http://{}/", addr)).unwrap()
}

/// Send response headers and part of the body, then stall.
pub async fn serve_stalled(declared_len: usize, sent: impl Into<Vec<u8>>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let sent = sent.into();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            declared_len
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&sent).await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(socket);
    });

    Url::parse(&format!("http://{}/", addr)).unwrap()
}

pub fn entry(base: &Url, name: &str) -> ListingEntry {
    let is_directory = name.ends_with('/');
    ListingEntry {
        name: name.to_string(),
        is_directory,
        url: base.join(name).unwrap().to_string(),
        size: (!is_directory).then(|| "1 MB".to_string()),
        date: "2024-01-01 00:00".to_string(),
        file_type: if is_directory {
            FileType::Folder
        } else {
            classify(name)
        },
    }
}

/// In-memory [`DirectoryFetcher`] keyed by URL path.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Result<Vec<String>, FetchError>>,
    delays: HashMap<String, u64>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, path: &str, names: &[&str]) -> Self {
        let names = names.iter().map(|n| n.to_string()).collect();
        self.responses.insert(path.to_string(), Ok(names));
        self
    }

    pub fn with_failure(mut self, path: &str, error: FetchError) -> Self {
        self.responses.insert(path.to_string(), Err(error));
        self
    }

    pub fn with_delay(mut self, path: &str, millis: u64) -> Self {
        self.delays.insert(path.to_string(), millis);
        self
    }

    /// Paths requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryFetcher for StubFetcher {
    async fn fetch_directory(&self, url: &Url) -> Result<Listing, FetchError> {
        let path = url.path().to_string();
        self.calls.lock().unwrap().push(path.clone());

        if let Some(ms) = self.delays.get(&path) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }

        match self.responses.get(&path) {
            Some(Ok(names)) => Ok(Listing {
                url: url.clone(),
                items: names.iter().map(|n| entry(url, n)).collect(),
            }),
            Some(Err(e)) => Err(e.clone()),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
