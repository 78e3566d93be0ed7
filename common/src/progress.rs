//! Upload progress as a typed event stream.
//!
//! A background submission produces any number of `UploadEvent::Progress`
//! events followed by exactly one `UploadEvent::Finished`.

/// Emitted by the upload transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Bytes sent so far. `total` is `None` when the transport cannot compute the length.
    Progress { loaded: u64, total: Option<u64> },
    /// Terminal event. `status` is 0 when no HTTP response was received.
    Finished { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded,
    Failed(String),
}

impl SubmissionOutcome {
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            200..=299 => SubmissionOutcome::Succeeded,
            0 => SubmissionOutcome::Failed("network error".to_string()),
            _ if body.trim().is_empty() => SubmissionOutcome::Failed(format!("HTTP {}", status)),
            _ => SubmissionOutcome::Failed(body.trim().to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded)
    }
}

/// Turns raw progress events into a percentage that never goes backwards.
#[derive(Debug, Default, Clone)]
pub struct ProgressTracker {
    percent: Option<u8>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest percentage shown, if any event so far was computable.
    pub fn percent(&self) -> Option<u8> {
        self.percent
    }

    /// Feeds one progress event.
    ///
    /// Returns the percentage to display, or `None` when the length is not
    /// computable, in which case the display is left untouched.
    pub fn observe(&mut self, loaded: u64, total: Option<u64>) -> Option<u8> {
        let total = total.filter(|t| *t > 0)?;
        let raw = (loaded as f64 / total as f64 * 100.0).round();
        let clamped = raw.clamp(0.0, 100.0) as u8;
        let next = self.percent.map_or(clamped, |prev| prev.max(clamped));
        self.percent = Some(next);
        Some(next)
    }

    pub fn reset(&mut self) {
        self.percent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_integer() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.observe(1, Some(3)), Some(33));
        assert_eq!(tracker.observe(2, Some(3)), Some(67));
        assert_eq!(tracker.observe(3, Some(3)), Some(100));
    }

    #[test]
    fn unknown_length_leaves_progress_alone() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(tracker.observe(10, None), None);
        assert_eq!(tracker.percent(), None);
        tracker.observe(50, Some(100));
        assert_eq!(tracker.observe(90, Some(0)), None);
        assert_eq!(tracker.percent(), Some(50));
    }

    #[test]
    fn never_decreases_and_stays_in_range() {
        let mut tracker = ProgressTracker::new();
        let events = [(10, 100), (60, 100), (40, 100), (250, 100), (99, 100)];
        let mut last = 0;
        for (loaded, total) in events {
            let pct = tracker.observe(loaded, Some(total)).unwrap();
            assert!(pct >= last);
            assert!(pct <= 100);
            last = pct;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn outcome_from_status() {
        assert!(SubmissionOutcome::from_status(202, "").is_success());
        assert_eq!(
            SubmissionOutcome::from_status(0, ""),
            SubmissionOutcome::Failed("network error".into())
        );
        assert_eq!(
            SubmissionOutcome::from_status(502, ""),
            SubmissionOutcome::Failed("HTTP 502".into())
        );
        assert_eq!(
            SubmissionOutcome::from_status(400, "Invalid level 'Y9' selected.\n"),
            SubmissionOutcome::Failed("Invalid level 'Y9' selected.".into())
        );
    }
}
