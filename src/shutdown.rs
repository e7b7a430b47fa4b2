// Graceful shutdown handling for the HTTP server

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared shutdown state across the application
#[derive(Clone)]
pub struct ShutdownState {
    /// Flag indicating shutdown has been requested
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownState {
    /// Create a new shutdown state
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request a shutdown
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        log::info!("[shutdown] Shutdown requested");
    }

    /// Check if shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested.
    ///
    /// Polls the flag, so it can be handed to axum's graceful shutdown.
    pub async fn wait(&self) {
        while !self.is_shutdown_requested() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a task that requests shutdown on Ctrl+C
pub fn register_signal_handlers(state: ShutdownState) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("[shutdown] Received Ctrl+C");
                state.request_shutdown();
            }
            Err(e) => log::warn!("[shutdown] Failed to listen for Ctrl+C: {}", e),
        }
    });
    log::info!("[shutdown] Signal handler registered (Ctrl+C)");
}
