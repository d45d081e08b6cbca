// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    ConnectError, ConnectionLifecycleManager, ConnectionStatus, RestartNotice, SessionTransport,
};

#[derive(Debug, Clone, Default)]
struct MockTransport {
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    fail_open: bool,
    seen_identity: Arc<Mutex<Option<String>>>,
}

impl MockTransport {
    fn failing() -> Self {
        Self { fail_open: true, ..Self::default() }
    }
}

impl SessionTransport for MockTransport {
    async fn open(&mut self, identity: &str, _notice: RestartNotice) -> Result<(), ConnectError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(ConnectError::transport("connection refused"));
        }
        *self.seen_identity.lock().unwrap() = Some(identity.to_owned());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

const IDENTITY: &str = "file:///LeanProject/LeanProject.lean";

#[tokio::test]
async fn start_opens_the_session_with_the_fixed_identity() {
    let transport = MockTransport::default();
    let opens = transport.opens.clone();
    let seen = transport.seen_identity.clone();
    let mut manager = ConnectionLifecycleManager::new(transport, IDENTITY);

    manager.start().await.unwrap();

    assert_eq!(manager.status(), ConnectionStatus::Active);
    assert_eq!(opens.load(Ordering::SeqCst), 1);
    assert_eq!(seen.lock().unwrap().as_deref(), Some(IDENTITY));
}

#[tokio::test]
async fn start_while_active_is_rejected() {
    let mut manager = ConnectionLifecycleManager::new(MockTransport::default(), IDENTITY);
    manager.start().await.unwrap();

    let err = manager.start().await.unwrap_err();
    assert_eq!(err, ConnectError::AlreadyRunning { status: ConnectionStatus::Active });
    assert_eq!(manager.status(), ConnectionStatus::Active);
}

#[tokio::test]
async fn failed_open_falls_back_to_stopped() {
    let transport = MockTransport::failing();
    let closes = transport.closes.clone();
    let mut manager = ConnectionLifecycleManager::new(transport, IDENTITY);

    manager.start().await.unwrap_err();
    assert_eq!(manager.status(), ConnectionStatus::Stopped);

    // Teardown still completes without ever touching the transport.
    manager.stop().await.unwrap();
    assert_eq!(manager.status(), ConnectionStatus::Stopped);
    assert_eq!(closes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stop_completes_whatever_came_before() {
    let mut manager = ConnectionLifecycleManager::new(MockTransport::default(), IDENTITY);

    // Never started.
    manager.stop().await.unwrap();
    assert_eq!(manager.status(), ConnectionStatus::Stopped);

    // Started, then stopped immediately.
    manager.start().await.unwrap();
    manager.stop().await.unwrap();
    assert_eq!(manager.status(), ConnectionStatus::Stopped);

    // Stopping twice stays a no-op.
    manager.stop().await.unwrap();
    assert_eq!(manager.status(), ConnectionStatus::Stopped);
}

#[tokio::test]
async fn restart_is_stop_then_start_with_the_same_identity() {
    let transport = MockTransport::default();
    let opens = transport.opens.clone();
    let closes = transport.closes.clone();
    let seen = transport.seen_identity.clone();
    let mut manager = ConnectionLifecycleManager::new(transport, IDENTITY);
    manager.start().await.unwrap();

    manager.restart().await.unwrap();

    assert_eq!(manager.status(), ConnectionStatus::Active);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    assert_eq!(opens.load(Ordering::SeqCst), 2);
    assert_eq!(seen.lock().unwrap().as_deref(), Some(IDENTITY));
}

#[tokio::test]
async fn restart_clears_a_pending_notice_deterministically() {
    let mut manager = ConnectionLifecycleManager::new(MockTransport::default(), IDENTITY);
    manager.start().await.unwrap();

    let notice = manager.restart_notice();
    notice.raise();
    assert!(notice.is_raised());

    manager.restart().await.unwrap();
    assert!(!notice.is_raised(), "a stale banner must not re-show after restart");
}

#[test]
fn notice_collapses_rapid_raises_into_one_take() {
    let notice = RestartNotice::new();
    notice.raise();
    notice.raise();
    notice.raise();

    assert!(notice.take());
    assert!(!notice.take());
    assert!(!notice.is_raised());
}
