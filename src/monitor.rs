//! Monitor service.
//!
//! A minimal TCP status endpoint for external poll-based monitors: each
//! connection gets one plain-text status line and is closed. The kernel
//! treats a failure to bring this endpoint up as fatal - a controller
//! nobody can watch should not start.

use crate::error::Result;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Status endpoint.
pub struct Monitor {
    local_addr: SocketAddr,
    worker: JoinHandle<()>,
}

impl Monitor {
    /// Bind the endpoint and start answering. Bind failure propagates.
    pub async fn start(port: u16) -> Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await?;
        let local_addr = listener.local_addr()?;
        let started = Instant::now();

        let worker = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((mut socket, peer)) => {
                        debug!(peer = %peer, "Monitor poll");
                        let line = format!(
                            "servus {} uptime={}s\n",
                            env!("CARGO_PKG_VERSION"),
                            started.elapsed().as_secs()
                        );
                        if let Err(error) = socket.write_all(line.as_bytes()).await {
                            warn!(peer = %peer, error = %error, "Monitor write failed");
                        }
                    }
                    Err(error) => {
                        warn!(error = %error, "Monitor accept failed");
                    }
                }
            }
        });

        info!(service = "monitor", addr = %local_addr, "Monitor service listening");

        Ok(Self { local_addr, worker })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_monitor_answers_status_line() {
        let monitor = Monitor::start(0).await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(monitor.local_addr())
            .await
            .unwrap();
        let mut line = String::new();
        stream.read_to_string(&mut line).await.unwrap();

        assert!(line.starts_with("servus "));
        assert!(line.contains("uptime="));
    }

    #[tokio::test]
    async fn test_monitor_bind_failure_propagates() {
        let first = Monitor::start(0).await.unwrap();
        let taken = first.local_addr().port();
        assert!(Monitor::start(taken).await.is_err());
    }
}
