//! Problem catalog API

use shared::models::{Difficulty, Problem, Topic};

use crate::error::ClientResult;
use crate::gateway::Gateway;

/// Catalog filters. All optional; empty filter lists everything.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ProblemFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

// ========== Problems API ==========

impl Gateway {
    /// List the problem catalog, optionally filtered.
    pub async fn list_problems(&self, filter: &ProblemFilter) -> ClientResult<Vec<Problem>> {
        self.get_query("/problems", filter).await
    }

    /// Fetch one problem with its sample test cases.
    pub async fn problem(&self, id: i64) -> ClientResult<Problem> {
        self.get(&format!("/problems/{}", id)).await
    }

    /// Create a problem (admin form).
    pub async fn create_problem(&self, problem: &Problem) -> ClientResult<Problem> {
        self.post("/problems", problem).await
    }

    /// Problems the user has solved.
    pub async fn solved_problems(&self, user_id: i64) -> ClientResult<Vec<Problem>> {
        self.get(&format!("/problems/solved/{}", user_id)).await
    }

    /// Problems the user has not solved yet.
    pub async fn unsolved_problems(&self, user_id: i64) -> ClientResult<Vec<Problem>> {
        self.get(&format!("/problems/unsolved/{}", user_id)).await
    }

    /// Problems related to the given one.
    pub async fn recommendations(&self, id: i64) -> ClientResult<Vec<Problem>> {
        self.get(&format!("/problems/{}/recommendations", id)).await
    }
}
