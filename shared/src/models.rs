//! Problem and submission models
//!
//! Mirrors the portal service's DTOs. The service serializes field names
//! in camelCase and timestamps as local date-times without an offset.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Problems
// =============================================================================

/// Problem difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Problem topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    Arrays,
    Strings,
    Trees,
    Graphs,
    DynamicProgramming,
    Greedy,
    Sorting,
    Searching,
    Math,
    HashTable,
    Stack,
    Queue,
    LinkedList,
    BinaryTree,
    Heap,
}

/// Sample test case attached to a problem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub id: Option<i64>,
    pub input: String,
    pub expected_output: String,
}

/// A coding problem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub topic: Topic,
    #[serde(default)]
    pub input_format: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Execution time limit in milliseconds.
    #[serde(default)]
    pub time_limit: Option<u32>,
    /// Memory limit in megabytes.
    #[serde(default)]
    pub memory_limit: Option<u32>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub test_cases: Option<Vec<TestCase>>,
}

// =============================================================================
// Submissions
// =============================================================================

/// Submission language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    Python,
    Java,
    Cpp,
    Javascript,
    C,
}

impl Language {
    /// Wire name expected by the submission endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "PYTHON",
            Language::Java => "JAVA",
            Language::Cpp => "CPP",
            Language::Javascript => "JAVASCRIPT",
            Language::C => "C",
        }
    }
}

/// Judging verdict for a submission
///
/// Produced by the remote judging service; the client treats it as an
/// enumerated label and attaches no further semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    CompilationError,
    RuntimeError,
}

/// A solution submission and its judging outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub problem_id: Option<i64>,
    pub code: String,
    pub language: Language,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub test_cases_passed: Option<u32>,
    #[serde(default)]
    pub total_test_cases: Option<u32>,
    #[serde(default)]
    pub analysis_feedback: Option<String>,
    #[serde(default)]
    pub efficiency_score: Option<f64>,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
}

/// Per-user submission statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub total_submissions: u64,
    pub accepted_submissions: u64,
    #[serde(default)]
    pub average_accuracy: Option<f64>,
}

// =============================================================================
// Admin
// =============================================================================

/// Per-user summary row for the admin user list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: crate::client::Role,
    pub total_submissions: u64,
    pub solved_problems: u64,
    #[serde(default)]
    pub average_accuracy: Option<f64>,
}
