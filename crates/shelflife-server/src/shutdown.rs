//! Graceful shutdown coordination.
//!
//! A [`ShutdownCoordinator`] owns a [`CancellationToken`] that fires on
//! SIGTERM/SIGINT (Ctrl-C elsewhere). The HTTP server drains in-flight
//! requests once it fires; [`ShutdownCoordinator::drain_deadline`] bounds how
//! long that drain may take.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

// ---------------------------------------------------------------------------
// Shutdown coordinator
// ---------------------------------------------------------------------------

/// Coordinates graceful shutdown of the HTTP server.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    /// The cancellation token that signals shutdown.
    token: CancellationToken,
    /// Maximum seconds to wait for in-flight requests after signal.
    timeout_seconds: u64,
}

impl ShutdownCoordinator {
    /// Create a new coordinator with the given drain timeout.
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            token: CancellationToken::new(),
            timeout_seconds,
        }
    }

    /// Get a clone of the cancellation token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns `true` if a shutdown has been requested.
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Resolves `timeout_seconds` after shutdown was triggered.
    ///
    /// Race this against the server future to force exit when draining
    /// takes too long.
    pub async fn drain_deadline(&self) {
        self.token.cancelled().await;
        tokio::time::sleep(Duration::from_secs(self.timeout_seconds)).await;
    }
}

// ---------------------------------------------------------------------------
// Signal handling
// ---------------------------------------------------------------------------

/// Returns a future that resolves when a shutdown signal is received.
///
/// On Unix this listens for both SIGTERM and SIGINT.
/// On other platforms it listens for Ctrl-C only. If the signal handlers
/// cannot be installed, only programmatic cancellation ends the wait.
pub async fn shutdown_signal(coordinator: ShutdownCoordinator) {
    let token = coordinator.token();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Shutdown signal received (SIGTERM)");
                    }
                    _ = sigint.recv() => {
                        info!("Shutdown signal received (SIGINT)");
                    }
                    _ = token.cancelled() => {
                        info!("Shutdown signal received (token cancelled)");
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Failed to install signal handlers");
                token.cancelled().await;
                info!("Shutdown signal received (token cancelled)");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received (Ctrl-C)");
            }
            _ = token.cancelled() => {
                info!("Shutdown signal received (token cancelled)");
            }
        }
    }

    coordinator.trigger();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
