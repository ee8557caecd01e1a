//! SessionStore lifecycle tests: restore, login/register, logout,
//! invalidation, and storage/state consistency.

mod common;

use std::sync::Arc;
use std::time::Duration;

use portal_client::error::ClientError;
use portal_client::session::{TOKEN_KEY, USER_KEY};
use portal_client::{
    KeyValueStorage, MemoryStorage, Navigator, Role, SessionState, SessionStore,
};

use common::{MockAuth, RecordingNavigator, auth_response, init_tracing};

fn store_with(
    storage: Arc<MemoryStorage>,
    auth: MockAuth,
) -> (SessionStore, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let store = SessionStore::new(storage, Arc::new(auth), navigator.clone());
    (store, navigator)
}

fn seeded_storage(token: &str, user_json: &str) -> Arc<MemoryStorage> {
    Arc::new(
        MemoryStorage::new()
            .with_entry(TOKEN_KEY, token)
            .with_entry(USER_KEY, user_json),
    )
}

// =============================================================================
// initialize()
// =============================================================================

#[tokio::test]
async fn initialize_restores_valid_session() {
    init_tracing();
    let storage = seeded_storage("tok1", r#"{"id":7,"username":"al"}"#);
    let (store, navigator) = store_with(storage.clone(), MockAuth::Unreachable);

    let state = store.initialize().await;
    match state {
        SessionState::Authenticated(record) => {
            assert_eq!(record.credential, "tok1");
            assert_eq!(record.identity.id, 7);
            assert_eq!(record.identity.username, "al");
            assert_eq!(record.identity.role, Role::User);
        }
        other => panic!("expected Authenticated, got {:?}", other),
    }
    // No durable-storage mutation on a clean restore
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok1"));
    assert_eq!(storage.len(), 2);
    assert_eq!(navigator.redirects(), 0);
}

#[tokio::test]
async fn initialize_with_empty_storage_is_anonymous() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, _) = store_with(storage.clone(), MockAuth::Unreachable);

    assert_eq!(store.initialize().await, SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn initialize_purges_credential_without_identity() {
    let storage = Arc::new(MemoryStorage::new().with_entry(TOKEN_KEY, "tok1"));
    let (store, _) = store_with(storage.clone(), MockAuth::Unreachable);

    assert_eq!(store.initialize().await, SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn initialize_purges_unparsable_identity() {
    let storage = seeded_storage("tok1", "{not json");
    let (store, _) = store_with(storage.clone(), MockAuth::Unreachable);

    assert_eq!(store.initialize().await, SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn initialize_purges_identity_without_id() {
    let storage = seeded_storage("tok1", r#"{"username":"al"}"#);
    let (store, _) = store_with(storage.clone(), MockAuth::Unreachable);

    assert_eq!(store.initialize().await, SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn initialize_purges_identity_with_zero_id() {
    let storage = seeded_storage("tok1", r#"{"id":0,"username":"al"}"#);
    let (store, _) = store_with(storage.clone(), MockAuth::Unreachable);

    assert_eq!(store.initialize().await, SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn initialize_purges_empty_credential() {
    let storage = seeded_storage("", r#"{"id":7,"username":"al"}"#);
    let (store, _) = store_with(storage.clone(), MockAuth::Unreachable);

    assert_eq!(store.initialize().await, SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let storage = seeded_storage("tok1", r#"{"id":7,"username":"al"}"#);
    let (store, _) = store_with(storage, MockAuth::Unreachable);

    let first = store.initialize().await;
    let second = store.initialize().await;
    assert_eq!(first, second);
    assert!(second.is_authenticated());
}

#[tokio::test]
async fn wait_ready_blocks_until_initialized() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, _) = store_with(storage, MockAuth::Unreachable);

    assert_eq!(store.state(), SessionState::Initializing);
    assert_eq!(store.current_credential(), None);

    let waiter = {
        let store = store.clone();
        tokio::spawn(async move { store.wait_ready().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    store.initialize().await;

    let state = waiter.await.unwrap();
    assert_eq!(state, SessionState::Anonymous);
}

// =============================================================================
// login() / register()
// =============================================================================

#[tokio::test]
async fn login_persists_and_adopts_session() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, navigator) = store_with(
        storage.clone(),
        MockAuth::Ok(auth_response(7, "al", "tok1")),
    );
    store.initialize().await;

    let record = store.login("al", "pw").await.unwrap();
    assert_eq!(record.credential, "tok1");
    assert_eq!(store.current_credential().as_deref(), Some("tok1"));

    // Durable storage and in-memory state agree
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok1"));
    let persisted = storage.get(USER_KEY).unwrap();
    let identity: portal_client::UserIdentity = serde_json::from_str(&persisted).unwrap();
    assert_eq!(identity, record.identity);
    assert_eq!(navigator.redirects(), 0);
}

#[tokio::test]
async fn login_replaces_existing_session() {
    let storage = seeded_storage("stale", r#"{"id":3,"username":"old"}"#);
    let (store, _) = store_with(
        storage.clone(),
        MockAuth::Ok(auth_response(7, "al", "tok1")),
    );
    store.initialize().await;
    assert!(store.state().is_authenticated());

    store.login("al", "pw").await.unwrap();
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok1"));
    assert_eq!(store.current_user().unwrap().username, "al");
}

#[tokio::test]
async fn login_failure_clears_everything() {
    let storage = seeded_storage("tok1", r#"{"id":7,"username":"al"}"#);
    let (store, navigator) = store_with(
        storage.clone(),
        MockAuth::Rejected("Invalid username or password".into()),
    );
    store.initialize().await;

    let err = store.login("al", "wrong").await.unwrap_err();
    match err {
        ClientError::AuthRejected(message) => {
            assert_eq!(message, "Invalid username or password")
        }
        other => panic!("expected AuthRejected, got {:?}", other),
    }
    assert_eq!(store.state(), SessionState::Anonymous);
    assert!(storage.is_empty());
    // Entry failures belong to the caller; no redirect
    assert_eq!(navigator.redirects(), 0);
}

#[tokio::test]
async fn login_rejects_response_without_token() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, _) = store_with(storage.clone(), MockAuth::Ok(auth_response(7, "al", "")));
    store.initialize().await;

    let err = store.login("al", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert_eq!(store.state(), SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn login_rejects_response_without_usable_id() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, _) = store_with(storage.clone(), MockAuth::Ok(auth_response(0, "al", "tok1")));
    store.initialize().await;

    let err = store.login("al", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert!(storage.is_empty());
}

#[tokio::test]
async fn register_adopts_session() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, _) = store_with(
        storage.clone(),
        MockAuth::Ok(auth_response(9, "newbie", "tok9")),
    );
    store.initialize().await;

    let record = store.register("newbie", "n@example.com", "pw").await.unwrap();
    assert_eq!(record.identity.id, 9);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok9"));
}

#[tokio::test]
async fn register_failure_leaves_anonymous() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, _) = store_with(
        storage.clone(),
        MockAuth::Rejected("Username is already taken".into()),
    );
    store.initialize().await;

    let err = store.register("taken", "t@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, ClientError::AuthRejected(_)));
    assert_eq!(store.state(), SessionState::Anonymous);
    assert!(storage.is_empty());
}

// =============================================================================
// logout() / invalidate()
// =============================================================================

#[tokio::test]
async fn logout_clears_before_navigating() {
    let storage = seeded_storage("tok1", r#"{"id":7,"username":"al"}"#);
    let (store, navigator) = store_with(storage.clone(), MockAuth::Unreachable);
    store.initialize().await;

    // A subscriber must observe Anonymous no later than the redirect.
    let mut rx = store.subscribe();
    store.logout().await;

    assert!(navigator.at_entry());
    assert_eq!(navigator.redirects(), 1);
    assert_eq!(*rx.borrow_and_update(), SessionState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn logout_twice_converges() {
    let storage = seeded_storage("tok1", r#"{"id":7,"username":"al"}"#);
    let (store, navigator) = store_with(storage.clone(), MockAuth::Unreachable);
    store.initialize().await;

    store.logout().await;
    store.logout().await;

    assert_eq!(store.state(), SessionState::Anonymous);
    assert!(storage.is_empty());
    assert!(navigator.at_entry());
}

#[tokio::test]
async fn logout_is_safe_while_initializing() {
    let storage = seeded_storage("tok1", r#"{"id":7,"username":"al"}"#);
    let (store, navigator) = store_with(storage.clone(), MockAuth::Unreachable);

    store.logout().await;
    assert_eq!(store.state(), SessionState::Anonymous);
    assert!(storage.is_empty());
    assert_eq!(navigator.redirects(), 1);
}

#[tokio::test]
async fn invalidate_clears_without_navigating() {
    let storage = seeded_storage("tok1", r#"{"id":7,"username":"al"}"#);
    let (store, navigator) = store_with(storage.clone(), MockAuth::Unreachable);
    store.initialize().await;

    store.invalidate().await;
    assert_eq!(store.state(), SessionState::Anonymous);
    assert!(storage.is_empty());
    assert_eq!(navigator.redirects(), 0);
}

// =============================================================================
// Serialized transitions
// =============================================================================

#[tokio::test]
async fn concurrent_login_and_invalidation_never_tear() {
    let storage = Arc::new(MemoryStorage::new());
    let (store, _) = store_with(
        storage.clone(),
        MockAuth::Ok(auth_response(7, "al", "tok1")),
    );
    store.initialize().await;

    let mut tasks = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                let _ = store.login("al", "pw").await;
            } else {
                store.invalidate().await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // Whatever interleaving happened, storage and state must agree.
    match store.state() {
        SessionState::Authenticated(record) => {
            assert_eq!(storage.get(TOKEN_KEY), Some(record.credential.clone()));
            let identity: portal_client::UserIdentity =
                serde_json::from_str(&storage.get(USER_KEY).unwrap()).unwrap();
            assert_eq!(identity, record.identity);
        }
        SessionState::Anonymous => assert!(storage.is_empty()),
        SessionState::Initializing => panic!("state regressed to Initializing"),
    }
}
