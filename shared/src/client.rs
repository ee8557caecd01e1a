//! Auth-related types shared with the portal service
//!
//! Request/response shapes for the login and registration endpoints.
//! The service returns the token and the user fields in one flat body.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User identity as stored in a session
///
/// `email` and `role` are optional on the wire; a missing role defaults
/// to [`Role::User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Login/registration response data
///
/// The token and the user fields arrive flat in one body:
/// `{ "token": "...", "type": "Bearer", "id": 1, "username": "...", ... }`.
/// The `type` field is informational and unused by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    #[serde(flatten)]
    pub user: UserIdentity,
}
