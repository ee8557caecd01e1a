//! Portal Client - session lifecycle and API gateway for the coding portal
//!
//! Provides the two collaborating pieces every view goes through:
//!
//! - [`SessionStore`] owns "who is logged in": it restores a persisted
//!   session at boot, runs login/registration, and keeps durable storage
//!   and in-memory state consistent.
//! - [`Gateway`] is the single choke point for remote calls: it attaches
//!   the current credential to every request and decides, per endpoint
//!   class, whether a 401/403 means the session is gone or is an
//!   ordinary error for the caller.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod navigation;
pub mod routes;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::Gateway;
pub use navigation::Navigator;
pub use routes::{RouteClass, classify};
pub use session::{
    AuthBackend, FileStorage, HttpAuthBackend, KeyValueStorage, MemoryStorage, SessionRecord,
    SessionState, SessionStore,
};

// Re-export shared types for convenience
pub use shared::client::{AuthResponse, LoginRequest, RegisterRequest, Role, UserIdentity};
