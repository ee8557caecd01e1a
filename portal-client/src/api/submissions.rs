//! Submission and judging API
//!
//! The submission endpoints take their inputs as query parameters, not
//! a JSON body; the verdict arrives embedded in the returned submission.

use shared::models::{Language, Problem, Submission, SubmissionStats};

use crate::error::ClientResult;
use crate::gateway::Gateway;

/// A solution to submit for judging.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub user_id: i64,
    pub problem_id: i64,
    pub code: String,
    pub language: Language,
}

impl SubmissionRequest {
    fn query(&self) -> [(&'static str, String); 4] {
        [
            ("userId", self.user_id.to_string()),
            ("problemId", self.problem_id.to_string()),
            ("code", self.code.clone()),
            ("language", self.language.as_str().to_string()),
        ]
    }
}

// ========== Submissions API ==========

impl Gateway {
    /// Submit a solution and wait for the judging verdict.
    pub async fn submit_and_evaluate(
        &self,
        request: &SubmissionRequest,
    ) -> ClientResult<Submission> {
        self.post_query("/submissions/submit-and-evaluate", &request.query())
            .await
    }

    /// Record a submission without waiting for evaluation.
    pub async fn create_submission(&self, request: &SubmissionRequest) -> ClientResult<Submission> {
        self.post_query("/submissions", &request.query()).await
    }

    /// Re-poll the judging service for a pending submission's verdict.
    pub async fn refresh_result(&self, submission_id: i64) -> ClientResult<Submission> {
        self.put_empty(&format!("/submissions/{}/result", submission_id))
            .await
    }

    /// Fetch one submission.
    pub async fn submission(&self, id: i64) -> ClientResult<Submission> {
        self.get(&format!("/submissions/{}", id)).await
    }

    /// All submissions by a user, newest first.
    pub async fn user_submissions(&self, user_id: i64) -> ClientResult<Vec<Submission>> {
        self.get(&format!("/submissions/user/{}", user_id)).await
    }

    /// All submissions against a problem.
    pub async fn problem_submissions(&self, problem_id: i64) -> ClientResult<Vec<Submission>> {
        self.get(&format!("/submissions/problem/{}", problem_id))
            .await
    }

    /// One user's submissions against one problem.
    pub async fn user_problem_submissions(
        &self,
        user_id: i64,
        problem_id: i64,
    ) -> ClientResult<Vec<Submission>> {
        self.get(&format!("/submissions/user/{}/problem/{}", user_id, problem_id))
            .await
    }

    /// Suggested next problem after finishing one.
    pub async fn next_problem(
        &self,
        user_id: i64,
        current_problem_id: i64,
        score: Option<f64>,
    ) -> ClientResult<Problem> {
        let mut query = vec![
            ("userId", user_id.to_string()),
            ("currentProblemId", current_problem_id.to_string()),
        ];
        if let Some(score) = score {
            query.push(("score", score.to_string()));
        }
        self.get_query("/submissions/next-problem", &query).await
    }

    /// Aggregate submission statistics for a user.
    pub async fn user_stats(&self, user_id: i64) -> ClientResult<SubmissionStats> {
        self.get(&format!("/submissions/stats/user/{}", user_id))
            .await
    }
}
