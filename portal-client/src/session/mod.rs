//! Session module - authenticated-session lifecycle.
//!
//! [`SessionStore`] owns the in-memory session state and keeps it
//! consistent with durable storage; [`KeyValueStorage`] and
//! [`AuthBackend`] are the seams to the persistence medium and the
//! remote authentication endpoints.

mod auth;
mod storage;
mod store;

pub use auth::{AuthBackend, HttpAuthBackend};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, TOKEN_KEY, USER_KEY};
pub use store::{SessionRecord, SessionState, SessionStore};
