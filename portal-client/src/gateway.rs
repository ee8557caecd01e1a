//! API gateway
//!
//! Single choke point for remote calls. Attaches the current credential
//! on the way out; on the way back, interprets authentication failures
//! per the endpoint classification so that a stale token forces
//! re-authentication while failures on entry/public endpoints stay with
//! the caller.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, error_for_status};
use crate::navigation::Navigator;
use crate::routes::{RouteClass, classify};
use crate::session::SessionStore;

/// HTTP gateway to the portal service.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    /// Create a gateway from configuration.
    pub fn new(config: &ClientConfig, session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        }
    }

    /// The session store this gateway reads credentials from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.dispatch(path, self.client.get(self.url(path))).await?;
        Self::decode(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.dispatch(path, request).await?;
        Self::decode(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.dispatch(path, request).await?;
        Self::decode(response).await
    }

    /// Make a POST request carrying query parameters and no body
    pub async fn post_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.client.post(self.url(path)).query(query);
        let response = self.dispatch(path, request).await?;
        Self::decode(response).await
    }

    /// Make a PUT request without body
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.dispatch(path, self.client.put(self.url(path))).await?;
        Self::decode(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.client.put(self.url(path)).json(body);
        let response = self.dispatch(path, request).await?;
        Self::decode(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .dispatch(path, self.client.delete(self.url(path)))
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Interception
    // =========================================================================

    /// Send a request with the current credential attached and interpret
    /// the response. Success passes through; failures follow the
    /// classification contract.
    async fn dispatch(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let request = match self.session.current_credential() {
            Some(token) => request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token),
            ),
            None => request,
        };

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                // No transport response at all. Never an auth failure.
                tracing::warn!(path = %path, error = %e, "request failed without a response");
                return Err(ClientError::Unreachable(e.to_string()));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
            && classify(path) == RouteClass::Protected
        {
            return Err(self.reject_protected(path, status).await);
        }

        // AuthEntry/Public auth failures and every other status belong
        // to the caller.
        let text = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &text))
    }

    /// Handle an authentication failure on a protected route. The state
    /// clear completes before navigation is requested.
    async fn reject_protected(&self, path: &str, status: StatusCode) -> ClientError {
        if self.session.current_credential().is_some() {
            // Token went stale mid-session.
            tracing::info!(path = %path, status = %status, "credential rejected, invalidating session");
            self.session.invalidate().await;
            self.navigator.to_entry();
        } else if !self.navigator.at_entry() {
            // Anonymous user hit a protected route.
            tracing::debug!(path = %path, status = %status, "unauthenticated protected access");
            self.navigator.to_entry();
        }
        // Already at the entry surface: nothing to do, no redirect loop.
        ClientError::SessionInvalidated
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}
