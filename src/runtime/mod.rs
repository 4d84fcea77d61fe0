//! # Runtime Module
//!
//! Startup orchestration for the operator: the ordered pipeline of fallible
//! initialization steps and the signal-driven shutdown boundary.

pub mod initialization;

pub use initialization::{initialize, Initialized, StartupError};

use tokio::signal;

/// Wait for a termination signal (SIGTERM or SIGINT).
///
/// This is the only cancellation source of the run loop; the startup
/// sequence itself has no partial-cancellation semantics.
///
/// Signal handler setup failures are fatal - the operator cannot shut down
/// gracefully without them, so expect() here is intentional.
#[allow(clippy::expect_used)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
