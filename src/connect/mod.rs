// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Compile-session lifecycle.
//!
//! One logical connection per client lifetime, bound to a fixed document
//! identity. The manager owns the start/stop/restart sequencing; the
//! transport behind it only knows how to open and close. A server-initiated
//! restart notice never changes the local state machine — it only raises the
//! [`RestartNotice`] mailbox the UI consumes.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod ws;

pub use ws::WsTransport;

/// Connection state machine: `Stopped -> Starting -> Active -> Stopping ->
/// Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Stopped,
    Starting,
    Active,
    Stopping,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Active => "active",
            Self::Stopping => "stopping",
        };
        f.write_str(label)
    }
}

/// Single-item mailbox for the out-of-band "server restarted" signal.
///
/// `raise` may be called from the transport's read task at any rate; the UI
/// consumes with `take`, which observes at most one pending notice no matter
/// how many raises happened in between.
#[derive(Debug, Clone, Default)]
pub struct RestartNotice {
    raised: Arc<AtomicBool>,
}

impl RestartNotice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consumes the pending notice, if any.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// What the manager needs from a transport: open a session bound to an
/// identity (handing over the notice to raise on server restarts) and close
/// it again. Close must be best-effort and must not hang on a dead peer.
pub trait SessionTransport {
    fn open(
        &mut self,
        identity: &str,
        notice: RestartNotice,
    ) -> impl std::future::Future<Output = Result<(), ConnectError>> + Send;

    fn close(&mut self) -> impl std::future::Future<Output = Result<(), ConnectError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// `start` while not stopped.
    AlreadyRunning { status: ConnectionStatus },
    Transport { message: String },
}

impl ConnectError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning { status } => {
                write!(f, "session is not stopped (status={status})")
            }
            Self::Transport { message } => write!(f, "transport error: {message}"),
        }
    }
}

impl std::error::Error for ConnectError {}

/// Owns the compile session's start/stop/restart sequencing, independent of
/// document content.
#[derive(Debug)]
pub struct ConnectionLifecycleManager<T> {
    transport: T,
    identity: String,
    status: ConnectionStatus,
    notice: RestartNotice,
}

impl<T: SessionTransport> ConnectionLifecycleManager<T> {
    /// Binds the manager to its identity for the lifetime of the client.
    pub fn new(transport: T, identity: impl Into<String>) -> Self {
        Self {
            transport,
            identity: identity.into(),
            status: ConnectionStatus::Stopped,
            notice: RestartNotice::new(),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Handle the transport raises server-restart notices on; the UI polls
    /// the same handle.
    pub fn restart_notice(&self) -> RestartNotice {
        self.notice.clone()
    }

    /// `Stopped -> Starting -> Active`. A failed open falls back to
    /// `Stopped`.
    pub async fn start(&mut self) -> Result<(), ConnectError> {
        if self.status != ConnectionStatus::Stopped {
            return Err(ConnectError::AlreadyRunning { status: self.status });
        }
        self.status = ConnectionStatus::Starting;
        match self.transport.open(&self.identity, self.notice.clone()).await {
            Ok(()) => {
                self.status = ConnectionStatus::Active;
                Ok(())
            }
            Err(err) => {
                self.status = ConnectionStatus::Stopped;
                Err(err)
            }
        }
    }

    /// `-> Stopping -> Stopped`. Always completes, whatever state the
    /// session is in; invoked on every teardown path and awaited before the
    /// client counts as torn down. Stopping an already stopped session is a
    /// no-op.
    pub async fn stop(&mut self) -> Result<(), ConnectError> {
        if self.status == ConnectionStatus::Stopped {
            return Ok(());
        }
        self.status = ConnectionStatus::Stopping;
        let result = self.transport.close().await;
        self.status = ConnectionStatus::Stopped;
        result
    }

    /// Stops the current session and starts a fresh one with the same
    /// identity, leaving the document alone. The pending-restart notice is
    /// cleared first so a stale banner can never re-show.
    pub async fn restart(&mut self) -> Result<(), ConnectError> {
        self.notice.take();
        self.stop().await?;
        self.start().await
    }
}

#[cfg(test)]
mod tests;
