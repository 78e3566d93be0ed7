//! Result sets kept in memory after their report page was served, so the
//! page's PDF download links keep working for a while.

use common::model::results::ResultSet;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct StoredReport {
    results: Arc<ResultSet>,
    stored_at: Instant,
}

#[derive(Clone, Default)]
pub struct ReportStore {
    pub reports: Arc<RwLock<HashMap<String, StoredReport>>>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `results` and returns the id used in download URLs.
    pub async fn insert(&self, results: ResultSet) -> String {
        let id = Uuid::new_v4().to_string();
        self.reports.write().await.insert(
            id.clone(),
            StoredReport {
                results: Arc::new(results),
                stored_at: Instant::now(),
            },
        );
        id
    }

    pub async fn get(&self, id: &str) -> Option<Arc<ResultSet>> {
        self.reports.read().await.get(id).map(|r| r.results.clone())
    }

    /// Removes result sets stored at least `ttl` ago. Returns how many were removed.
    pub async fn prune(&self, ttl: Duration) -> usize {
        let mut reports = self.reports.write().await;
        let before = reports.len();
        reports.retain(|_, r| r.stored_at.elapsed() < ttl);
        before - reports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> ResultSet {
        ResultSet {
            level: "KS3".into(),
            subject: "Biology".into(),
            exam_board: "WJEC".into(),
            markscheme_text: None,
            results: Vec::new(),
            class_average: 0.0,
            class_feedback: String::new(),
        }
    }

    #[tokio::test]
    async fn stores_until_pruned() {
        let store = ReportStore::new();
        let id = store.insert(results()).await;
        assert_eq!(store.get(&id).await.map(|r| r.subject.clone()), Some("Biology".into()));

        assert_eq!(store.prune(Duration::from_secs(3600)).await, 0);
        assert!(store.get(&id).await.is_some());

        assert_eq!(store.prune(Duration::ZERO).await, 1);
        assert!(store.get(&id).await.is_none());
    }
}
