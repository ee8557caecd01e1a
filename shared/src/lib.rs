//! Shared types for the portal client
//!
//! Wire DTOs exchanged with the remote portal service: auth
//! requests/responses, user identity, problem and submission models.

pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Auth re-exports (for convenient access)
pub use client::{AuthResponse, LoginRequest, RegisterRequest, Role, UserIdentity};
