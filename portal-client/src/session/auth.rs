//! Remote authentication collaborator
//!
//! Login and registration POSTs. These are entry endpoints: a rejection
//! here is expected user error and is always surfaced to the caller,
//! never turned into a redirect.

use async_trait::async_trait;
use shared::client::{AuthResponse, LoginRequest, RegisterRequest};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, extract_error_message};

/// Remote authentication endpoints.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse>;
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse>;
}

/// HTTP implementation against the portal service.
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    /// Create a backend from configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<AuthResponse> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            let message = extract_error_message(
                &text,
                status.canonical_reason().unwrap_or("authentication failed"),
            );
            tracing::debug!(path = %path, status = %status, "authentication rejected");
            return Err(ClientError::AuthRejected(message));
        }

        serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.post("auth/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.post("auth/register", request).await
    }
}
