//! Typed API surface
//!
//! Thin wrappers over [`Gateway`](crate::Gateway) for the portal's REST
//! endpoints, grouped by domain.

mod admin;
mod problems;
mod submissions;

pub use problems::ProblemFilter;
pub use submissions::SubmissionRequest;
