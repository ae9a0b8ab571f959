mod common;

use common::{FakeAuthClient, credentials, now_ms, params};
use meeple_ledger::application::session::SessionManager;
use meeple_ledger::domain::ports::SessionStore;
use meeple_ledger::domain::session::{Credentials, SessionState};
use meeple_ledger::infrastructure::in_memory::InMemorySessionStore;
use std::sync::Arc;
use std::time::Duration;

fn manager_with(
    auth: Arc<FakeAuthClient>,
    store: InMemorySessionStore,
) -> SessionManager {
    SessionManager::new(auth, Arc::new(store))
}

#[tokio::test]
async fn restore_with_fresh_credentials_skips_the_network() {
    let auth = Arc::new(FakeAuthClient::new());
    let creds = credentials(now_ms() + 120_000); // two minutes out, above the buffer
    let store = InMemorySessionStore::with_credentials(creds.clone());
    let manager = manager_with(auth.clone(), store);

    manager.restore().await;

    assert_eq!(manager.state().await, SessionState::Authenticated(creds));
    assert_eq!(auth.refresh_calls(), 0);
    assert_eq!(auth.sign_in_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn restore_with_expired_credentials_refreshes_exactly_once() {
    let auth = Arc::new(FakeAuthClient::new());
    let renewed = credentials(now_ms() + 3_600_000);
    auth.succeed_refresh(renewed.clone());

    let store = InMemorySessionStore::with_credentials(credentials(now_ms() - 1_000));
    let manager = manager_with(auth.clone(), store.clone());

    manager.restore().await;

    assert_eq!(auth.refresh_calls(), 1);
    assert_eq!(manager.state().await, SessionState::Authenticated(renewed.clone()));
    // The renewed credential was persisted.
    assert_eq!(store.load().await.unwrap(), Some(renewed));
}

#[tokio::test]
async fn restore_with_failing_refresh_degrades_to_anonymous() {
    let auth = Arc::new(FakeAuthClient::new());
    let store = InMemorySessionStore::with_credentials(credentials(now_ms() - 1_000));
    let manager = manager_with(auth.clone(), store.clone());

    manager.restore().await;

    assert_eq!(auth.refresh_calls(), 1);
    assert_eq!(manager.state().await, SessionState::Anonymous);
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn restore_without_refresh_token_goes_anonymous_without_network() {
    let auth = Arc::new(FakeAuthClient::new());
    let mut stale = credentials(now_ms() - 1_000);
    stale.refresh_token = None;
    let store = InMemorySessionStore::with_credentials(stale);
    let manager = manager_with(auth.clone(), store.clone());

    manager.restore().await;

    assert_eq!(auth.refresh_calls(), 0);
    assert_eq!(manager.state().await, SessionState::Anonymous);
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn restore_with_empty_store_initializes_anonymous() {
    let auth = Arc::new(FakeAuthClient::new());
    let manager = manager_with(auth, InMemorySessionStore::new());

    assert!(!manager.state().await.is_initialized());
    manager.restore().await;
    let state = manager.state().await;
    assert!(state.is_initialized());
    assert_eq!(state, SessionState::Anonymous);
}

#[tokio::test]
async fn restore_with_invalid_payload_is_treated_as_absent() {
    let auth = Arc::new(FakeAuthClient::new());
    let invalid = Credentials {
        user_id: "user-1".into(),
        access_token: String::new(),
        expires_at: now_ms() + 3_600_000,
        refresh_token: Some("refresh".into()),
    };
    let store = InMemorySessionStore::with_credentials(invalid);
    let manager = manager_with(auth.clone(), store);

    manager.restore().await;

    assert_eq!(manager.state().await, SessionState::Anonymous);
    assert_eq!(auth.refresh_calls(), 0);
}

#[tokio::test]
async fn sign_in_persists_and_authenticates() {
    let auth = Arc::new(FakeAuthClient::new());
    let creds = credentials(now_ms() + 3_600_000);
    auth.succeed_sign_in(creds.clone());

    let store = InMemorySessionStore::new();
    let manager = manager_with(auth, store.clone());

    manager.sign_in(&params()).await.unwrap();

    assert_eq!(manager.state().await, SessionState::Authenticated(creds.clone()));
    assert_eq!(store.load().await.unwrap(), Some(creds));
}

#[tokio::test]
async fn logout_clears_storage_even_when_the_collaborator_fails() {
    let auth = Arc::new(FakeAuthClient::new());
    let creds = credentials(now_ms() + 3_600_000);
    auth.succeed_sign_in(creds);
    auth.fail_sign_out();

    let store = InMemorySessionStore::new();
    let manager = manager_with(auth.clone(), store.clone());

    manager.sign_in(&params()).await.unwrap();
    manager.logout().await;

    assert_eq!(manager.state().await, SessionState::Anonymous);
    assert!(store.load().await.unwrap().is_none());
    assert_eq!(auth.sign_out_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn rescheduling_leaves_a_single_pending_timer() {
    let auth = Arc::new(FakeAuthClient::new());
    let store = InMemorySessionStore::new();
    let manager = manager_with(auth.clone(), store);

    // Two sign-ins in a row: the second schedule must cancel the first
    // timer. Refresh is left to fail so a fired timer does not rearm.
    auth.succeed_sign_in(credentials(now_ms() + 3_600_000));
    manager.sign_in(&params()).await.unwrap();
    auth.succeed_sign_in(credentials(now_ms() + 7_200_000));
    manager.sign_in(&params()).await.unwrap();

    tokio::time::advance(Duration::from_secs(3 * 3600)).await;
    // Let the fired timer task run to completion.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(auth.refresh_calls(), 1);
    assert_eq!(manager.state().await, SessionState::Anonymous);
}

#[tokio::test(start_paused = true)]
async fn timer_fires_before_expiry_and_renews_the_session() {
    let auth = Arc::new(FakeAuthClient::new());
    let store = InMemorySessionStore::new();
    let manager = manager_with(auth.clone(), store.clone());

    auth.succeed_sign_in(credentials(now_ms() + 3_600_000));
    auth.succeed_refresh(credentials(now_ms() + 7_200_000));
    manager.sign_in(&params()).await.unwrap();

    tokio::time::advance(Duration::from_secs(3600)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(auth.refresh_calls(), 1);
    assert!(manager.is_authenticated().await);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_the_pending_timer() {
    let auth = Arc::new(FakeAuthClient::new());
    let manager = manager_with(auth.clone(), InMemorySessionStore::new());

    auth.succeed_sign_in(credentials(now_ms() + 3_600_000));
    manager.sign_in(&params()).await.unwrap();
    manager.shutdown();

    tokio::time::advance(Duration::from_secs(3 * 3600)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(auth.refresh_calls(), 0);
    assert!(manager.is_authenticated().await);
}

#[tokio::test]
async fn file_store_roundtrip_through_the_lifecycle() {
    use meeple_ledger::infrastructure::file::FileSessionStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let auth = Arc::new(FakeAuthClient::new());
    let creds = credentials(now_ms() + 3_600_000);
    auth.succeed_sign_in(creds.clone());

    let manager = SessionManager::new(auth.clone(), Arc::new(FileSessionStore::new(&path)));
    manager.sign_in(&params()).await.unwrap();
    assert!(path.exists());

    // A second manager restores from the file without any network call.
    let restored = SessionManager::new(
        Arc::new(FakeAuthClient::new()),
        Arc::new(FileSessionStore::new(&path)),
    );
    restored.restore().await;
    assert_eq!(restored.state().await, SessionState::Authenticated(creds));

    manager.logout().await;
    assert!(!path.exists());
}
