//! Signal bridge.
//!
//! Turns SIGINT/SIGTERM into a shutdown request without doing any shutdown
//! work in signal context: the listener only flips an atomic flag and wakes
//! waiters, and `kernel_wait` runs the actual unwind from ordinary async
//! context. Uninstalling the bridge aborts the listener, which restores
//! default signal disposition behavior.

use crate::error::{Result, WorkspaceError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

/// Process-wide "shutdown was requested" flag.
#[derive(Default)]
pub struct ShutdownFlag {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownFlag {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record the request. Returns `true` only for the first caller.
    pub fn request(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::AcqRel);
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Wait until shutdown has been requested.
    pub async fn requested(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_requested() {
                return;
            }
            notified.await;
        }
    }
}

/// Listener translating termination signals into a [`ShutdownFlag`] request.
#[derive(Default)]
pub struct SignalBridge {
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SignalBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the SIGINT/SIGTERM listener. Fails if already installed or
    /// if signal registration is refused.
    pub fn install(&self, flag: Arc<ShutdownFlag>) -> Result<()> {
        let mut listener = self.listener.lock().unwrap();
        if listener.is_some() {
            return Err(WorkspaceError::AlreadyInitialized("signal bridge"));
        }

        let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        *listener = Some(tokio::spawn(async move {
            let signal_name = tokio::select! {
                _ = sigint.recv() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            };
            if flag.request() {
                info!(signal = signal_name, "Received signal to quit");
            }
        }));

        Ok(())
    }

    /// Remove the listener. Safe to call when nothing is installed.
    pub fn uninstall(&self) {
        if let Some(listener) = self.listener.lock().unwrap().take() {
            listener.abort();
        }
    }

    pub fn is_installed(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_request_wakes_pending_waiter() {
        let flag = ShutdownFlag::new();

        let waiter = {
            let flag = Arc::clone(&flag);
            tokio::spawn(async move { flag.requested().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(flag.request());

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter not woken")
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_is_exactly_once() {
        let flag = ShutdownFlag::new();
        assert!(flag.request());
        assert!(!flag.request());
        assert!(flag.is_requested());
    }

    #[tokio::test]
    async fn test_wait_after_request_returns_immediately() {
        let flag = ShutdownFlag::new();
        flag.request();
        tokio::time::timeout(Duration::from_millis(100), flag.requested())
            .await
            .expect("requested() should not block once set");
    }

    #[tokio::test]
    async fn test_install_twice_fails() {
        let bridge = SignalBridge::new();
        bridge.install(ShutdownFlag::new()).unwrap();
        assert!(matches!(
            bridge.install(ShutdownFlag::new()),
            Err(WorkspaceError::AlreadyInitialized("signal bridge"))
        ));
        bridge.uninstall();
    }

    #[tokio::test]
    async fn test_uninstall_is_idempotent() {
        let bridge = SignalBridge::new();
        bridge.uninstall();

        bridge.install(ShutdownFlag::new()).unwrap();
        bridge.uninstall();
        assert!(!bridge.is_installed());
        bridge.uninstall();
    }
}
