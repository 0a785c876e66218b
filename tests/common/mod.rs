//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use health_runner::check::{generate_targets, Target};
use health_runner::config::RunnerConfig;

/// Tracks how many requests a mock backend is serving at once.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct Watermark {
    active: AtomicUsize,
    peak: AtomicUsize,
    served: AtomicUsize,
    heads: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl Watermark {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }

    /// Request heads received so far, in arrival order.
    pub fn heads(&self) -> Vec<String> {
        self.heads.lock().unwrap().clone()
    }

    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.served.fetch_add(1, Ordering::SeqCst);
    }
}

#[allow(dead_code)]
fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        204 => "204 No Content",
        302 => "302 Found",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Read until the end of the request head so the client never sees a reset.
/// Returns the head as text.
#[allow(dead_code)]
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a mock backend on an ephemeral port answering every request with
/// `status` after `delay`.
#[allow(dead_code)]
pub async fn start_backend(status: u16, delay: Duration) -> (SocketAddr, Arc<Watermark>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let watermark = Arc::new(Watermark::default());
    let wm = watermark.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let wm = wm.clone();
                    tokio::spawn(async move {
                        let head = read_request(&mut socket).await;
                        wm.heads.lock().unwrap().push(head);
                        wm.enter();
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        wm.leave();

                        let body = "ok";
                        let mut response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            status_line(status),
                            body.len()
                        );
                        if status == 302 {
                            response.push_str("Location: /elsewhere\r\n");
                        }
                        response.push_str("\r\n");
                        response.push_str(body);

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, watermark)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[allow(dead_code)]
pub fn targets_for(addr: SocketAddr, count: usize) -> Vec<Target> {
    generate_targets(&format!("http://{}", addr), "/health", count).unwrap()
}

#[allow(dead_code)]
pub fn runner_config(max_concurrency: usize, timeout: Duration) -> RunnerConfig {
    RunnerConfig {
        max_concurrency,
        request_timeout: timeout,
        shutdown_grace: Duration::from_millis(100),
        ..RunnerConfig::default()
    }
}
