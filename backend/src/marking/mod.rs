//! The seam between this service and the external marking engine.
//!
//! The engine extracts text from the uploaded documents, grades every student
//! response and, when asked, e-mails the results. This service only feeds it a
//! `SubmissionRequest` and consumes the `ResultSet` it returns.

mod http;

use async_trait::async_trait;
use common::model::results::{RenderingInputError, ResultSet};
use common::model::submission::SubmissionRequest;
use thiserror::Error;

pub use http::HttpMarker;

#[derive(Debug, Error)]
pub enum MarkingError {
    #[error("marking service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("marking service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Result(#[from] RenderingInputError),
}

#[async_trait]
pub trait Marker: Send + Sync {
    async fn mark(&self, request: &SubmissionRequest) -> Result<ResultSet, MarkingError>;
}
