//! Periodic clean-up of what the server keeps in memory between requests.

use crate::job_controller::state::JobsState;
use crate::report_store::ReportStore;
use log::debug;
use std::time::Duration;

/// How often the sweeper wakes up.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Drops finished jobs and stored results older than `ttl`, forever.
pub async fn start_retention_sweeper(jobs: JobsState, reports: ReportStore, ttl: Duration) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let pruned_jobs = jobs.prune_finished(ttl).await;
        let pruned_reports = reports.prune(ttl).await;
        if pruned_jobs + pruned_reports > 0 {
            debug!(
                "Pruned {} finished job(s) and {} stored result set(s)",
                pruned_jobs, pruned_reports
            );
        }
    }
}
