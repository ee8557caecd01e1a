//! Admin API

use shared::models::UserSummary;

use crate::error::ClientResult;
use crate::gateway::Gateway;

// ========== Admin API ==========

impl Gateway {
    /// Per-user summaries for the admin dashboard. Requires an admin
    /// session; an ordinary user gets the invalidate-and-redirect path.
    pub async fn list_users(&self) -> ClientResult<Vec<UserSummary>> {
        self.get("/admin/users").await
    }
}
