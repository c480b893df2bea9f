//! Process signals that end the bot gracefully.
//!
//! Interrupt, terminate and hangup are shutdown requests. Fault signals such as
//! SIGSEGV are deliberately absent: they keep their default, fatal disposition.

use std::fmt;

use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Hangup,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Hangup => "SIGHUP",
        };
        f.write_str(name)
    }
}

/// Installed handlers for the graceful-shutdown signals.
///
/// Handlers are in place from `register` on, so a signal delivered while the
/// bot is still starting up is queued rather than killing the process.
#[cfg(unix)]
pub struct ShutdownSignals {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
    sighup: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    /// Must be called from within a tokio runtime.
    pub fn register() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
            sighup: signal(SignalKind::hangup())?,
        })
    }

    /// Wait for the next graceful-shutdown signal.
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = self.sigint.recv() => ShutdownSignal::Interrupt,
            _ = self.sigterm.recv() => ShutdownSignal::Terminate,
            _ = self.sighup.recv() => ShutdownSignal::Hangup,
        }
    }
}

#[cfg(not(unix))]
pub struct ShutdownSignals {
    _priv: (),
}

#[cfg(not(unix))]
impl ShutdownSignals {
    pub fn register() -> Result<Self> {
        Ok(Self { _priv: () })
    }

    pub async fn recv(&mut self) -> ShutdownSignal {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("ctrl-c handler failed: {e}");
        }
        ShutdownSignal::Interrupt
    }
}
