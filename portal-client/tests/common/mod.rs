//! Shared test fixtures
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use portal_client::error::{ClientError, ClientResult};
use portal_client::{AuthBackend, AuthResponse, LoginRequest, Navigator, RegisterRequest, Role, UserIdentity};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("portal_client=debug")
        .with_test_writer()
        .try_init();
}

pub fn auth_response(id: i64, username: &str, token: &str) -> AuthResponse {
    AuthResponse {
        token: token.to_string(),
        token_type: Some("Bearer".to_string()),
        user: UserIdentity {
            id,
            username: username.to_string(),
            email: None,
            role: Role::User,
        },
    }
}

/// Canned auth backend.
pub enum MockAuth {
    Ok(AuthResponse),
    Rejected(String),
    Unreachable,
}

impl MockAuth {
    fn respond(&self) -> ClientResult<AuthResponse> {
        match self {
            MockAuth::Ok(response) => Ok(response.clone()),
            MockAuth::Rejected(message) => Err(ClientError::AuthRejected(message.clone())),
            MockAuth::Unreachable => Err(ClientError::Unreachable("connection refused".into())),
        }
    }
}

#[async_trait]
impl AuthBackend for MockAuth {
    async fn login(&self, _request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.respond()
    }

    async fn register(&self, _request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.respond()
    }
}

/// Navigator that counts redirects and tracks the simulated location:
/// after a redirect the entry surface is showing.
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
    at_entry: AtomicBool,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at_entry() -> Self {
        let navigator = Self::default();
        navigator.at_entry.store(true, Ordering::SeqCst);
        navigator
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn at_entry(&self) -> bool {
        self.at_entry.load(Ordering::SeqCst)
    }

    fn to_entry(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        self.at_entry.store(true, Ordering::SeqCst);
    }
}
