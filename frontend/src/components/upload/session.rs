//! Browser-free part of the upload form: what a submit, a progress event or a
//! finished upload does to the form's state. The component feeds DOM events
//! in and renders from the result.

use common::form::{
    choose_submit_strategy, completion_message, validate, FormState, SubmitStrategy,
    ValidationError,
};
use common::model::submission::DeliveryOption;
use common::progress::{ProgressTracker, SubmissionOutcome};

/// What the component should do with the browser's submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// A submission is already on its way; cancel the event and do nothing.
    Ignore,
    /// Cancel the event; the reason is already in `error`.
    Blocked(ValidationError),
    Proceed(SubmitStrategy),
}

#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    /// Delivery checkboxes, e-mail value and the in-flight guard.
    pub form: FormState,

    pub tracker: ProgressTracker,

    /// Bytes sent and total from the last progress event that moved the bar.
    pub sent: Option<(u64, u64)>,

    /// Reason shown under the submit button when validation or sending fails.
    pub error: Option<String>,

    /// Shown in place of the form once a background submission has finished.
    pub completion: Option<String>,

    /// True when `completion` reports a failure.
    pub failed: bool,

    /// Set from the start of a background upload until `reset`.
    background: bool,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_delivery(&mut self, option: DeliveryOption, checked: bool) {
        self.form.toggle(option, checked);
        self.error = None;
    }

    pub fn decide_submit(&mut self) -> SubmitDecision {
        if self.form.in_flight {
            return SubmitDecision::Ignore;
        }
        if let Err(reason) = validate(&self.form) {
            self.error = Some(reason.to_string());
            return SubmitDecision::Blocked(reason);
        }
        self.error = None;

        let strategy = choose_submit_strategy(&self.form);
        if strategy == SubmitStrategy::FullPageSubmit {
            self.form.in_flight = true;
        }
        SubmitDecision::Proceed(strategy)
    }

    /// The transport accepted the form; progress events follow.
    pub fn begin_background(&mut self) {
        self.tracker.reset();
        self.sent = None;
        self.completion = None;
        self.failed = false;
        self.form.in_flight = true;
        self.background = true;
    }

    /// The transport could not be started; the form stays usable.
    pub fn background_not_started(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.form.in_flight = false;
        self.background = false;
    }

    /// Returns true when the bar moved.
    pub fn progress(&mut self, loaded: u64, total: Option<u64>) -> bool {
        match (self.tracker.observe(loaded, total), total) {
            (Some(_), Some(total)) => {
                self.sent = Some((loaded, total));
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self, status: u16, body: &str) -> SubmissionOutcome {
        let outcome = SubmissionOutcome::from_status(status, body);
        self.failed = !outcome.is_success();
        self.completion = Some(completion_message(&self.form.delivery, &outcome));
        self.form.in_flight = false;
        outcome
    }

    /// "Try again": the same form, with its files and selections, comes back.
    pub fn reset(&mut self) {
        self.completion = None;
        self.failed = false;
        self.error = None;
        self.sent = None;
        self.tracker.reset();
        self.background = false;
    }

    /// Progress is only shown while a background upload has not finished.
    pub fn uploading(&self) -> bool {
        self.background && self.completion.is_none()
    }

    /// The form stays in the document while hidden so its inputs keep their values.
    pub fn form_hidden(&self) -> bool {
        self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_only(email: &str) -> UploadSession {
        let mut session = UploadSession::new();
        session.toggle_delivery(DeliveryOption::Website, false);
        session.toggle_delivery(DeliveryOption::Email, true);
        session.form.email = email.to_string();
        session
    }

    #[test]
    fn website_delivery_leaves_submit_to_the_browser() {
        let mut session = UploadSession::new();
        assert_eq!(
            session.decide_submit(),
            SubmitDecision::Proceed(SubmitStrategy::FullPageSubmit)
        );
        assert!(session.form.in_flight);
        assert_eq!(session.decide_submit(), SubmitDecision::Ignore);
        assert!(!session.form_hidden());
    }

    #[test]
    fn invalid_submit_is_blocked_with_a_reason() {
        let mut session = email_only("  ");
        assert_eq!(
            session.decide_submit(),
            SubmitDecision::Blocked(ValidationError::MissingEmail)
        );
        assert_eq!(
            session.error.as_deref(),
            Some("Please enter your email address so we can send your results.")
        );
        assert!(!session.form.in_flight);

        session.toggle_delivery(DeliveryOption::Email, false);
        assert!(session.error.is_none());
        assert_eq!(
            session.decide_submit(),
            SubmitDecision::Blocked(ValidationError::NoDeliveryOption)
        );
    }

    #[test]
    fn background_upload_reports_progress_then_completion() {
        let mut session = email_only("t@school.uk");
        assert_eq!(
            session.decide_submit(),
            SubmitDecision::Proceed(SubmitStrategy::BackgroundSubmit)
        );
        assert!(!session.form.in_flight);
        session.begin_background();
        assert!(session.uploading());
        assert!(session.form_hidden());

        assert!(session.progress(50, Some(100)));
        assert!(!session.progress(60, None));
        assert!(session.progress(20, Some(100)));
        assert_eq!(session.tracker.percent(), Some(50));
        assert_eq!(session.sent, Some((20, 100)));

        assert!(session.finish(202, "").is_success());
        assert_eq!(
            session.completion.as_deref(),
            Some("Feedback is being emailed to you.")
        );
        assert!(!session.uploading());
        assert!(session.form_hidden());
        assert!(!session.form.in_flight);
    }

    #[test]
    fn failed_upload_can_be_retried_with_the_same_form() {
        let mut session = email_only("t@school.uk");
        session.decide_submit();
        session.begin_background();
        session.progress(10, Some(100));

        assert!(!session.finish(413, "Upload exceeds the 50 MB limit.").is_success());
        assert!(session.failed);
        assert_eq!(
            session.completion.as_deref(),
            Some("Submission failed: Upload exceeds the 50 MB limit.")
        );
        assert!(session.form_hidden());

        session.reset();
        assert!(!session.form_hidden());
        assert!(session.completion.is_none());
        assert_eq!(session.tracker.percent(), None);
        assert_eq!(session.form.email, "t@school.uk");
        assert!(session.form.is_checked(DeliveryOption::Email));
        assert_eq!(
            session.decide_submit(),
            SubmitDecision::Proceed(SubmitStrategy::BackgroundSubmit)
        );
    }

    #[test]
    fn transport_start_failure_keeps_form_usable() {
        let mut session = email_only("t@school.uk");
        session.decide_submit();
        session.background_not_started("Could not start the upload.");
        assert!(!session.form_hidden());
        assert!(!session.form.in_flight);
        assert_eq!(session.error.as_deref(), Some("Could not start the upload."));
    }
}
