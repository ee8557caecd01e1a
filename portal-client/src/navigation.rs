//! Navigation seam
//!
//! The session core never renders anything; when it decides the user
//! must re-authenticate it asks the embedding shell (SPA router,
//! desktop webview, TUI screen stack) to show the entry surface.

/// Navigation requests issued by [`SessionStore`](crate::SessionStore)
/// and [`Gateway`](crate::Gateway).
///
/// Implementations must be cheap and non-blocking; the state clear that
/// precedes a `to_entry` call is already observable by the time the
/// request is made.
pub trait Navigator: Send + Sync {
    /// Whether the entry (login) surface is already showing. Used to
    /// suppress redundant redirects.
    fn at_entry(&self) -> bool;

    /// Show the entry surface.
    fn to_entry(&self);
}
