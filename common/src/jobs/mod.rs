use serde::{Deserialize, Serialize};

/// Lifecycle of a background submission, as reported by `GET /api/jobs/{job_id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}
