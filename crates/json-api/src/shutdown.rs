//! Graceful shutdown on process signals

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

/// Signal that triggered shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Interrupt => "interrupt",
            Self::Terminate => "terminate",
        }
    }
}

#[cfg(unix)]
async fn terminate() -> Result<(), ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<(), ShutdownSignalError> {
    std::future::pending().await
}

async fn wait_for_signal() -> Result<Signal, ShutdownSignalError> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::CtrlC)?;
            Ok(Signal::Interrupt)
        }
        result = terminate() => {
            result?;
            Ok(Signal::Terminate)
        }
    }
}

/// Wait for SIGINT/SIGTERM, then let in-flight requests finish before stopping.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    let received = wait_for_signal().await?;

    info!(signal = received.as_str(), "shutting down gracefully");

    handle.stop_graceful(None);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_have_log_names() {
        assert_eq!(Signal::Interrupt.as_str(), "interrupt");
        assert_eq!(Signal::Terminate.as_str(), "terminate");
    }
}
