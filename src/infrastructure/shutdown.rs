//! Graceful Shutdown Handler
//!
//! Shutdown trigger shared by the signal handler, the supervisor and any
//! component that fails, plus the in-flight request count the transports
//! maintain while a drain is in progress.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Shutdown coordinator.
///
/// Cloning shares the same trigger and counter.
#[derive(Clone)]
pub struct ShutdownController {
    /// Number of requests currently being handled across both transports
    in_flight: Arc<AtomicUsize>,
    /// Flips to true once; late subscribers still observe it
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Initiate shutdown. Only the first call has an effect.
    pub fn shutdown(&self) {
        let initiated = self.shutdown_tx.send_if_modified(|requested| {
            if *requested {
                false
            } else {
                *requested = true;
                true
            }
        });
        if initiated {
            tracing::info!("initiating graceful shutdown");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Resolves once shutdown has been initiated, immediately if it already was.
    pub async fn wait(&self) {
        let mut rx = self.shutdown_tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|requested| *requested).await;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Mark a request in flight until the guard is dropped.
    pub fn request_guard(&self) -> RequestGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        RequestGuard {
            in_flight: self.in_flight.clone(),
        }
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for an in-flight request.
pub struct RequestGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wait for Ctrl+C or SIGTERM, then trigger `controller`.
///
/// If a handler cannot be installed the failure is logged and that signal
/// is simply never observed.
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn shutdown_signal(controller: ShutdownController) {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, initiating shutdown"),
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("received SIGTERM, initiating shutdown");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = controller.wait() => return,
    }

    controller.shutdown();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_shutdown_controller_new() {
        let controller = ShutdownController::new();
        assert!(!controller.is_shutdown());
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn test_shutdown_controller_default() {
        let controller = ShutdownController::default();
        assert!(!controller.is_shutdown());
    }

    #[test]
    fn test_shutdown_initiates_once() {
        let controller = ShutdownController::new();

        controller.shutdown();
        assert!(controller.is_shutdown());

        // Calling again should be idempotent
        controller.shutdown();
        assert!(controller.is_shutdown());
    }

    #[test]
    fn test_request_guard() {
        let controller = ShutdownController::new();

        {
            let _guard = controller.request_guard();
            assert_eq!(controller.in_flight(), 1);
        }

        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn test_multiple_request_guards() {
        let controller = ShutdownController::new();

        let guard1 = controller.request_guard();
        let guard2 = controller.request_guard();
        let guard3 = controller.request_guard();
        assert_eq!(controller.in_flight(), 3);

        drop(guard1);
        assert_eq!(controller.in_flight(), 2);

        drop(guard2);
        drop(guard3);
        assert_eq!(controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_wait_resolves_after_shutdown() {
        let controller = ShutdownController::new();
        let waiter = controller.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        controller.shutdown();
        let result = tokio::time::timeout(Duration::from_millis(200), handle).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wait_after_shutdown_is_immediate() {
        let controller = ShutdownController::new();
        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_millis(100), controller.wait()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_signal_returns_when_already_shut_down() {
        let controller = ShutdownController::new();
        controller.shutdown();

        let result =
            tokio::time::timeout(Duration::from_millis(200), shutdown_signal(controller)).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_clone() {
        let controller = ShutdownController::new();
        let cloned = controller.clone();

        let _guard = controller.request_guard();
        assert_eq!(cloned.in_flight(), 1);

        cloned.shutdown();
        assert!(controller.is_shutdown());
    }
}
