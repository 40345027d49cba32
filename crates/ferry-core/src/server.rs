//! TCP listener and accept loop
//!
//! - SO_REUSEPORT / SO_REUSEADDR for quick restarts
//! - TCP_NODELAY for low latency
//! - One tokio task per accepted connection
//! - Graceful shutdown: stop accepting, then wait for live connections

use crate::config::{Limits, ServerConfig};
use crate::connection::serve_connection;
use crate::service::Service;
use crate::{Error, Result};
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::Instrument;

/// How long shutdown waits for in-flight connections
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Create a listening TCP socket with optimizations
pub fn create_optimized_socket(addr: &SocketAddr) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // SO_REUSEPORT - several processes may share the port
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;

    Ok(socket)
}

/// Tracks active connections for graceful shutdown
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    /// Active connection count
    active: AtomicU64,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; it is released when the guard drops
    pub fn track(self: &Arc<Self>) -> ConnectionGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Get current active connection count
    #[inline]
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait until no connections are active, or `grace` elapses.
    /// Returns the number still active.
    pub async fn drain(&self, grace: Duration) -> u64 {
        let deadline = tokio::time::Instant::now() + grace;
        while self.count() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.count()
    }
}

/// Live-connection marker
#[derive(Debug)]
pub struct ConnectionGuard {
    tracker: Arc<ConnectionTracker>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.tracker.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Bound server, ready to accept
pub struct Server {
    listener: TcpListener,
    service: Arc<Service>,
    limits: Limits,
    tracker: Arc<ConnectionTracker>,
}

impl Server {
    /// Bind the listener described by `config`
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let addr = config.socket_addr()?;
        let socket = create_optimized_socket(&addr)
            .map_err(|e| Error::Config(format!("failed to bind {}: {}", addr, e)))?;
        let listener = TcpListener::from_std(socket.into())?;

        if let Some(dir) = &config.directory {
            if !dir.is_dir() {
                tracing::warn!(directory = %dir.display(), "file directory does not exist");
            }
        }

        Ok(Self {
            listener,
            service: Arc::new(Service::from_config(config)),
            limits: config.limits(),
            tracker: Arc::new(ConnectionTracker::new()),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept until `shutdown` resolves, then drain live connections
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = %self.local_addr()?, "listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(stream, peer),
                    Err(e) => {
                        // Typically fd exhaustion; back off instead of spinning
                        tracing::error!(error = %e, "accept failed");
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                },
            }
        }

        tracing::info!(active = self.tracker.count(), "shutting down");
        let left = self.tracker.drain(SHUTDOWN_GRACE).await;
        if left > 0 {
            tracing::warn!(active = left, "connections still open after grace period");
        }
        Ok(())
    }

    fn spawn_connection(&self, stream: tokio::net::TcpStream, peer: SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "set_nodelay failed");
        }

        let guard = self.tracker.track();
        let service = Arc::clone(&self.service);
        let limits = self.limits;
        let span = tracing::info_span!("conn", %peer);

        tokio::spawn(
            async move {
                let _guard = guard;
                tracing::debug!("accepted");
                match serve_connection(stream, &service, &limits).await {
                    Ok(()) => {}
                    Err(Error::ConnectionClosed) => tracing::debug!("closed without a request"),
                    Err(Error::Timeout) => tracing::warn!("timed out reading request"),
                    Err(e) => tracing::warn!(error = %e, "connection failed"),
                }
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn start(config: ServerConfig) -> (SocketAddr, tokio::sync::oneshot::Sender<()>, tokio::task::JoinHandle<Result<()>>) {
        let server = Server::bind(&config.hostname("127.0.0.1").port(0)).unwrap();
        let addr = server.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async {
            let _ = rx.await;
        }));
        (addr, tx, handle)
    }

    async fn send(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        out
    }

    #[test]
    fn test_create_optimized_socket() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let socket = create_optimized_socket(&addr).unwrap();
        let local = socket.local_addr().unwrap().as_socket().unwrap();
        assert!(local.ip().is_loopback());
        assert_ne!(local.port(), 0);
    }

    #[tokio::test]
    async fn test_tracker_guard() {
        let tracker = Arc::new(ConnectionTracker::new());
        let a = tracker.track();
        let b = tracker.track();
        assert_eq!(tracker.count(), 2);
        drop(a);
        assert_eq!(tracker.count(), 1);
        drop(b);
        assert_eq!(tracker.drain(Duration::from_millis(50)).await, 0);
    }

    #[tokio::test]
    async fn test_serves_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let (addr, shutdown, handle) = start(ServerConfig::new().directory(dir.path())).await;

        let res = send(addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
        assert_eq!(res, b"HTTP/1.1 200 OK\r\n\r\n");

        let res = send(addr, b"POST /files/t HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").await;
        assert_eq!(res, b"HTTP/1.1 201 Created\r\n\r\n");

        let res = send(addr, b"GET /files/t HTTP/1.1\r\n\r\n").await;
        assert!(res.ends_with(b"Content-Length: 5\r\n\r\nhello"));

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_keeps_serving_after_bad_request() {
        let (addr, shutdown, handle) = start(ServerConfig::new()).await;

        let res = send(addr, b"DELETE / HTTP/1.1\r\n\r\n").await;
        assert_eq!(res, b"HTTP/1.1 400 Bad Request\r\n\r\n");

        let res = send(addr, b"GET /echo/still-here HTTP/1.1\r\n\r\n").await;
        assert!(res.ends_with(b"\r\n\r\nstill-here"));

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_live_connection() {
        let server = Server::bind(&ServerConfig::new().hostname("127.0.0.1").port(0)).unwrap();
        let addr = server.local_addr().unwrap();
        let tracker = Arc::clone(&server.tracker);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async {
            let _ = rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /echo/late HTTP/1.1\r\n").await.unwrap();
        while tracker.count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        stream.write_all(b"\r\n").await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        assert!(out.ends_with(b"\r\n\r\nlate"));

        handle.await.unwrap().unwrap();
        assert_eq!(tracker.count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_connections() {
        let (addr, shutdown, handle) = start(ServerConfig::new()).await;

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                tokio::spawn(async move {
                    let req = format!("GET /echo/{} HTTP/1.1\r\n\r\n", i);
                    (i, send(addr, req.as_bytes()).await)
                })
            })
            .collect();

        for task in tasks {
            let (i, res) = task.await.unwrap();
            assert!(res.ends_with(format!("\r\n\r\n{}", i).as_bytes()));
        }

        shutdown.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
