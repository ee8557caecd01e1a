//! Session store
//!
//! Sole owner of the session state. Durable storage and the in-memory
//! state move together: every transition either sets both or clears
//! both, so no observer ever sees a credential without an identity or
//! vice versa.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use shared::client::{LoginRequest, RegisterRequest, UserIdentity};

use crate::error::{ClientError, ClientResult};
use crate::navigation::Navigator;

use super::auth::AuthBackend;
use super::storage::{KeyValueStorage, TOKEN_KEY, USER_KEY};

/// A logged-in user: identity plus the bearer token proving it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub identity: UserIdentity,
    pub credential: String,
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Durable storage has not been consulted yet. Views that need a
    /// definite answer must wait for this to resolve.
    #[default]
    Initializing,
    Authenticated(SessionRecord),
    Anonymous,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

struct Inner {
    storage: Arc<dyn KeyValueStorage>,
    auth: Arc<dyn AuthBackend>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<SessionState>,
    // Serializes compound transitions (storage write + state change) so
    // concurrent logins/invalidations cannot interleave into a torn state.
    transition: Mutex<()>,
}

/// Owner of the session lifecycle. Cheap to clone; all clones share one
/// state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        auth: Arc<dyn AuthBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        Self {
            inner: Arc::new(Inner {
                storage,
                auth,
                navigator,
                state,
                transition: Mutex::new(()),
            }),
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Watch state changes. The receiver immediately holds the current
    /// value.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait until the state has left `Initializing` and return it.
    /// Returns immediately once initialization has settled.
    pub async fn wait_ready(&self) -> SessionState {
        let mut rx = self.inner.state.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if current != SessionState::Initializing {
                return current;
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }

    /// Non-blocking read of the credential for outbound requests.
    /// `None` unless the state is `Authenticated`.
    pub fn current_credential(&self) -> Option<String> {
        match &*self.inner.state.borrow() {
            SessionState::Authenticated(record) => Some(record.credential.clone()),
            _ => None,
        }
    }

    /// Identity of the logged-in user, if any.
    pub fn current_user(&self) -> Option<UserIdentity> {
        match &*self.inner.state.borrow() {
            SessionState::Authenticated(record) => Some(record.identity.clone()),
            _ => None,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Restore the session from durable storage.
    ///
    /// Runs once; later calls are no-ops returning the current state.
    /// A well-formed persisted pair yields `Authenticated` without
    /// touching storage; anything partial or unparsable is purged and
    /// yields `Anonymous`. Never fails.
    pub async fn initialize(&self) -> SessionState {
        let _guard = self.inner.transition.lock().await;
        let current = self.inner.state.borrow().clone();
        if current != SessionState::Initializing {
            return current;
        }

        let token = self.inner.storage.get(TOKEN_KEY);
        let user = self.inner.storage.get(USER_KEY);

        let restored = match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                match serde_json::from_str::<UserIdentity>(&user) {
                    Ok(identity) if identity.id > 0 => Some(SessionRecord {
                        identity,
                        credential: token,
                    }),
                    Ok(_) => {
                        tracing::warn!("persisted identity has no usable id, discarding session");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "persisted identity unparsable, discarding session");
                        None
                    }
                }
            }
            (None, None) => None,
            _ => {
                tracing::warn!("partial persisted session, discarding");
                None
            }
        };

        let state = match restored {
            Some(record) => {
                tracing::debug!(username = %record.identity.username, "session restored");
                SessionState::Authenticated(record)
            }
            None => {
                self.purge_storage();
                SessionState::Anonymous
            }
        };
        self.inner.state.send_replace(state.clone());
        state
    }

    /// Log in and adopt the resulting session.
    ///
    /// Any existing session is cleared first so a stale credential can
    /// never leak into the new one. On failure the state is `Anonymous`
    /// and storage is empty.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<SessionRecord> {
        let guard = self.inner.transition.lock().await;
        self.clear_locked();

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.inner.auth.login(&request).await;
        let record = self.adopt_locked(response)?;
        drop(guard);

        tracing::debug!(username = %record.identity.username, "logged in");
        Ok(record)
    }

    /// Register a new account and adopt the resulting session.
    /// Registration happens from an anonymous state; there is no
    /// pre-clear, but the failure contract matches [`login`](Self::login).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<SessionRecord> {
        let guard = self.inner.transition.lock().await;

        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.inner.auth.register(&request).await;
        let record = self.adopt_locked(response)?;
        drop(guard);

        tracing::debug!(username = %record.identity.username, "registered");
        Ok(record)
    }

    /// Clear the session and request navigation to the entry surface.
    ///
    /// The clear completes and is observable before navigation is
    /// requested. Safe from any state, including `Initializing`.
    pub async fn logout(&self) {
        {
            let _guard = self.inner.transition.lock().await;
            self.clear_locked();
        }
        tracing::debug!("logged out");
        self.inner.navigator.to_entry();
    }

    /// Gateway-triggered forced clear, used when a protected call fails
    /// with an authentication error. Same effect as [`logout`](Self::logout)
    /// except the caller owns the subsequent navigation.
    pub async fn invalidate(&self) {
        let _guard = self.inner.transition.lock().await;
        self.clear_locked();
        tracing::debug!("session invalidated");
    }

    // =========================================================================
    // Internals (transition lock must be held)
    // =========================================================================

    /// Validate an auth response, persist it, and adopt it. Any failure
    /// leaves storage empty and the state `Anonymous`.
    fn adopt_locked(
        &self,
        response: ClientResult<shared::client::AuthResponse>,
    ) -> ClientResult<SessionRecord> {
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                self.clear_locked();
                return Err(e);
            }
        };

        if response.token.is_empty() || response.user.id <= 0 {
            self.clear_locked();
            return Err(ClientError::MalformedResponse(
                "auth response missing token or user id".to_string(),
            ));
        }

        let record = SessionRecord {
            identity: response.user,
            credential: response.token,
        };
        if let Err(e) = self.persist(&record) {
            self.clear_locked();
            return Err(e);
        }

        self.inner
            .state
            .send_replace(SessionState::Authenticated(record.clone()));
        Ok(record)
    }

    fn persist(&self, record: &SessionRecord) -> ClientResult<()> {
        let identity = serde_json::to_string(&record.identity)?;
        self.inner.storage.set(TOKEN_KEY, &record.credential)?;
        self.inner.storage.set(USER_KEY, &identity)?;
        Ok(())
    }

    fn clear_locked(&self) {
        self.purge_storage();
        self.inner.state.send_replace(SessionState::Anonymous);
    }

    fn purge_storage(&self) {
        if let Err(e) = self.inner.storage.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to remove persisted token");
        }
        if let Err(e) = self.inner.storage.remove(USER_KEY) {
            tracing::warn!(error = %e, "failed to remove persisted identity");
        }
    }
}
