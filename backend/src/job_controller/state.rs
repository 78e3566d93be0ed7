//! Tracks submissions that are marked after the HTTP response has been sent.
//!
//! When a teacher only asks for results by e-mail there is nothing to render,
//! so the upload handler answers immediately and the marking call runs as a
//! background job. Its progress is kept here:
//! - `JobsState`: clonable, thread-safe map of job id to `JobStatus`, shared
//!   with the handlers as `web::Data`.
//! - `JobUpdate`: a status change sent by a running job.
//! - `start_job_updater`: long-running task applying `JobUpdate`s to the map.
//!
//! Finished jobs are dropped by `prune_finished` once they are older than the
//! configured time-to-live; pending and running jobs are always kept.

use common::jobs::JobStatus;
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// Capacity of the update channel created by `JobsState::new`.
pub const UPDATE_CHANNEL_CAPACITY: usize = 100;

/// A job's status and when it last changed.
#[derive(Debug, Clone)]
pub struct TrackedJob {
    pub status: JobStatus,
    pub updated: Instant,
}

impl TrackedJob {
    fn new(status: JobStatus) -> Self {
        Self {
            status,
            updated: Instant::now(),
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.status, JobStatus::Completed(_) | JobStatus::Failed(_))
    }
}

#[derive(Clone)]
pub struct JobsState {
    /// Current status of every job, read by `GET /api/jobs/{job_id}`.
    pub jobs: Arc<RwLock<HashMap<String, TrackedJob>>>,

    /// Jobs report progress through this sender instead of writing the map directly.
    pub tx: mpsc::Sender<JobUpdate>,
}

/// A status change for one background job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobsState {
    /// Creates an empty state and the receiver `start_job_updater` must drain.
    pub fn new() -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).map(|job| job.status.clone())
    }

    pub(crate) async fn set(&self, job_id: &str, status: JobStatus) {
        self.jobs
            .write()
            .await
            .insert(job_id.to_string(), TrackedJob::new(status));
    }

    /// Removes completed and failed jobs last updated at least `ttl` ago.
    /// Returns how many were removed.
    pub async fn prune_finished(&self, ttl: Duration) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| !job.is_finished() || job.updated.elapsed() < ttl);
        before - jobs.len()
    }
}

/// Applies every `JobUpdate` received on `rx` until all senders are dropped.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id, TrackedJob::new(update.status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn updater_applies_updates_in_order() {
        let (state, rx) = JobsState::new();
        let updater = tokio::spawn(start_job_updater(state.clone(), rx));

        state.set("job-1", JobStatus::Pending).await;
        for status in [JobStatus::InProgress(0), JobStatus::Completed("done".into())] {
            state
                .tx
                .send(JobUpdate {
                    job_id: "job-1".into(),
                    status,
                })
                .await
                .unwrap();
        }

        // The updater holds a sender itself, so wait for it instead of joining.
        let mut status = None;
        for _ in 0..100 {
            status = state.status("job-1").await;
            if status == Some(JobStatus::Completed("done".into())) {
                break;
            }
            tokio::task::yield_now().await;
        }
        updater.abort();

        assert_eq!(status, Some(JobStatus::Completed("done".into())));
    }

    #[tokio::test]
    async fn prune_drops_only_expired_finished_jobs() {
        let (state, _rx) = JobsState::new();
        state.set("done", JobStatus::Completed("ok".into())).await;
        state.set("broken", JobStatus::Failed("engine down".into())).await;
        state.set("queued", JobStatus::Pending).await;
        state.set("running", JobStatus::InProgress(0)).await;

        assert_eq!(state.prune_finished(Duration::from_secs(3600)).await, 0);
        assert_eq!(state.jobs.read().await.len(), 4);

        assert_eq!(state.prune_finished(Duration::ZERO).await, 2);
        assert_eq!(state.status("done").await, None);
        assert_eq!(state.status("broken").await, None);
        assert_eq!(state.status("queued").await, Some(JobStatus::Pending));
        assert_eq!(state.status("running").await, Some(JobStatus::InProgress(0)));
    }

    #[tokio::test]
    async fn unknown_job_has_no_status() {
        let (state, _rx) = JobsState::new();
        assert_eq!(state.status("missing").await, None);
    }
}
