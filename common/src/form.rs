//! Decision logic behind the upload form.
//!
//! The form's state lives in an explicit `FormState` instead of in DOM
//! properties, so the rules below are plain functions over that state:
//!
//! - at least one delivery option must be ticked;
//! - ticking "email" makes the teacher e-mail field required;
//! - ticking "website" means the browser performs a normal form POST and
//!   navigates to the rendered report, otherwise the form is sent in the
//!   background and progress is shown in place.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::submission::DeliveryOption;
use crate::progress::SubmissionOutcome;

pub const UPLOAD_ACTION: &str = "/upload";
pub const UPLOAD_METHOD: &str = "POST";

/// Multipart field names shared by the form and the upload handler.
pub mod fields {
    pub const LEVEL: &str = "level";
    pub const SUBJECT: &str = "subject";
    pub const EXAM_BOARD: &str = "exam_board";
    pub const MARKSCHEME_FILE: &str = "markscheme_file";
    pub const STUDENT_FILES: &str = "student_files";
    pub const MARKING_POINTS_FILE: &str = "marking_points_file";
    pub const TEACHER_EMAIL: &str = "teacher_email";
    pub const ADDITIONAL_INFO: &str = "additional_info";
    pub const FEEDBACK_DETAIL: &str = "feedback_detail";
    pub const DELIVERY_OPTION: &str = "delivery_option";
}

/// Why a submission is blocked before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please choose at least one way to receive your results.")]
    NoDeliveryOption,
    #[error("Please enter your email address so we can send your results.")]
    MissingEmail,
}

impl ValidationError {
    /// Stable machine-readable reason code.
    pub fn reason(self) -> &'static str {
        match self {
            ValidationError::NoDeliveryOption => "no-delivery-option",
            ValidationError::MissingEmail => "missing-email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStrategy {
    /// Let the browser submit the form and navigate to the response.
    FullPageSubmit,
    /// Intercept the submit and upload in the background with progress.
    BackgroundSubmit,
}

/// Transient state of one form instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub delivery: BTreeSet<DeliveryOption>,
    pub email: String,
    /// Set while a submission is on its way; further submits are refused.
    pub in_flight: bool,
}

impl Default for FormState {
    /// The website checkbox starts checked and the email one unchecked.
    fn default() -> Self {
        Self {
            delivery: BTreeSet::from([DeliveryOption::Website]),
            email: String::new(),
            in_flight: false,
        }
    }
}

impl FormState {
    pub fn toggle(&mut self, option: DeliveryOption, checked: bool) {
        if checked {
            self.delivery.insert(option);
        } else {
            self.delivery.remove(&option);
        }
    }

    pub fn is_checked(&self, option: DeliveryOption) -> bool {
        self.delivery.contains(&option)
    }

    /// Required flag of the e-mail input; derived, never stored.
    pub fn email_required(&self) -> bool {
        self.is_checked(DeliveryOption::Email)
    }
}

pub fn validate(state: &FormState) -> Result<(), ValidationError> {
    validate_delivery(&state.delivery, &state.email)
}

/// Shared by the form and the server-side revalidation of a submission.
pub fn validate_delivery(
    delivery: &BTreeSet<DeliveryOption>,
    email: &str,
) -> Result<(), ValidationError> {
    if delivery.is_empty() {
        return Err(ValidationError::NoDeliveryOption);
    }
    if delivery.contains(&DeliveryOption::Email) && email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    Ok(())
}

pub fn choose_submit_strategy(state: &FormState) -> SubmitStrategy {
    if state.is_checked(DeliveryOption::Website) {
        SubmitStrategy::FullPageSubmit
    } else {
        SubmitStrategy::BackgroundSubmit
    }
}

/// Text shown in place of the form once a background submission ends.
///
/// It reflects whether the upload was accepted, not whether an e-mail was
/// actually delivered; that happens later, out of band.
pub fn completion_message(
    delivery: &BTreeSet<DeliveryOption>,
    outcome: &SubmissionOutcome,
) -> String {
    match outcome {
        SubmissionOutcome::Succeeded if delivery.contains(&DeliveryOption::Email) => {
            "Feedback is being emailed to you.".to_string()
        }
        SubmissionOutcome::Succeeded => "Your papers have been processed.".to_string(),
        SubmissionOutcome::Failed(reason) => format!("Submission failed: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeliveryOption::{Email, Website};

    fn state(delivery: &[DeliveryOption], email: &str) -> FormState {
        FormState {
            delivery: delivery.iter().copied().collect(),
            email: email.to_string(),
            in_flight: false,
        }
    }

    #[test]
    fn every_delivery_combination() {
        let cases: [(&[DeliveryOption], &str, Result<(), ValidationError>); 7] = [
            (&[], "", Err(ValidationError::NoDeliveryOption)),
            (&[], "t@school.uk", Err(ValidationError::NoDeliveryOption)),
            (&[Website], "", Ok(())),
            (&[Email], "", Err(ValidationError::MissingEmail)),
            (&[Email], "t@school.uk", Ok(())),
            (&[Website, Email], "", Err(ValidationError::MissingEmail)),
            (&[Website, Email], "t@school.uk", Ok(())),
        ];
        for (delivery, email, expected) in cases {
            assert_eq!(validate(&state(delivery, email)), expected, "{:?} {:?}", delivery, email);
        }
    }

    #[test]
    fn reason_codes() {
        assert_eq!(ValidationError::NoDeliveryOption.reason(), "no-delivery-option");
        assert_eq!(ValidationError::MissingEmail.reason(), "missing-email");
    }

    #[test]
    fn email_requirement_follows_checkbox() {
        let mut form = FormState::default();
        assert!(!form.email_required());
        form.toggle(Email, true);
        assert!(form.email_required());
        form.toggle(Email, false);
        assert!(!form.email_required());
    }

    #[test]
    fn website_always_means_full_page() {
        assert_eq!(choose_submit_strategy(&state(&[Website], "")), SubmitStrategy::FullPageSubmit);
        assert_eq!(
            choose_submit_strategy(&state(&[Website, Email], "x@y.z")),
            SubmitStrategy::FullPageSubmit
        );
        assert_eq!(choose_submit_strategy(&state(&[Email], "x@y.z")), SubmitStrategy::BackgroundSubmit);
    }

    #[test]
    fn completion_message_distinguishes_failure() {
        let email_only = BTreeSet::from([Email]);
        assert_eq!(
            completion_message(&email_only, &SubmissionOutcome::Succeeded),
            "Feedback is being emailed to you."
        );
        assert_eq!(
            completion_message(&BTreeSet::new(), &SubmissionOutcome::Succeeded),
            "Your papers have been processed."
        );
        assert_eq!(
            completion_message(&email_only, &SubmissionOutcome::Failed("HTTP 500".into())),
            "Submission failed: HTTP 500"
        );
    }
}
