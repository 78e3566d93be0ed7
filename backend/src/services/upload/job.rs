use crate::job_controller::state::{JobUpdate, JobsState};
use crate::marking::Marker;
use common::jobs::JobStatus;
use common::model::submission::SubmissionRequest;
use log::{error, info};
use std::sync::Arc;
use uuid::Uuid;

/// Queues `request` for marking and returns the new job id straight away.
///
/// The job starts as `Pending`; the spawned task reports `InProgress(0)` and
/// then `Completed` or `Failed`. All updates after the first go through the
/// state's channel so they are applied in the order they were sent.
pub async fn schedule_marking_job(
    state: &JobsState,
    marker: Arc<dyn Marker>,
    request: SubmissionRequest,
) -> String {
    let job_id = Uuid::new_v4().to_string();
    state.set(&job_id, JobStatus::Pending).await;

    let tx = state.tx.clone();
    let fallback = state.clone();
    let id = job_id.clone();

    tokio::spawn(async move {
        let _ = tx
            .send(JobUpdate {
                job_id: id.clone(),
                status: JobStatus::InProgress(0),
            })
            .await;

        let status = match marker.mark(&request).await {
            Ok(results) => {
                info!("Job {} marked {} student file(s)", id, results.results.len());
                JobStatus::Completed(format!(
                    "Marked {} student file(s); feedback is being emailed.",
                    results.results.len()
                ))
            }
            Err(e) => {
                error!("Job {} failed: {}", id, e);
                JobStatus::Failed(e.to_string())
            }
        };

        let update = JobUpdate {
            job_id: id.clone(),
            status,
        };
        if let Err(unsent) = tx.send(update).await {
            fallback.set(&id, unsent.0.status).await;
        }
    });

    job_id
}
