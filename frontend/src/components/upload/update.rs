//! Update function for the upload form, Elm style: mutate the state for one
//! `Msg` and report whether the view must re-render.
//!
//! The decisions live in `UploadSession`; this module only adds the browser
//! side effects. A blocked submit cancels the event and shows the reason.
//! With the website option ticked the browser is left to post the form and
//! navigate to the report; otherwise the submit is intercepted and the form is
//! sent in the background while a progress bar is shown.

use common::form::SubmitStrategy;
use common::progress::{SubmissionOutcome, UploadEvent};
use gloo_console::{error, log};
use web_sys::HtmlFormElement;
use yew::prelude::*;

use super::helpers::show_toast;
use super::messages::Msg;
use super::session::SubmitDecision;
use super::state::UploadFormComponent;
use super::transport::start_upload;

pub fn update(
    component: &mut UploadFormComponent,
    ctx: &Context<UploadFormComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::OptionsLoaded(options) => {
            component.options = options;
            true
        }
        Msg::ToggleDelivery(option, checked) => {
            component.session.toggle_delivery(option, checked);
            true
        }
        Msg::UpdateEmail(email) => {
            component.session.form.email = email;
            false
        }
        Msg::Submit(event) => submit(component, ctx, event),
        Msg::Upload(UploadEvent::Progress { loaded, total }) => {
            component.session.progress(loaded, total)
        }
        Msg::Upload(UploadEvent::Finished { status, body }) => {
            if let SubmissionOutcome::Failed(reason) = component.session.finish(status, &body) {
                error!(format!("Upload failed: {}", reason));
            }
            true
        }
        Msg::Reset => {
            if let Some(handle) = component.upload.take() {
                handle.abort();
            }
            component.session.reset();
            true
        }
    }
}

fn submit(
    component: &mut UploadFormComponent,
    ctx: &Context<UploadFormComponent>,
    event: SubmitEvent,
) -> bool {
    match component.session.decide_submit() {
        SubmitDecision::Ignore => {
            event.prevent_default();
            false
        }
        SubmitDecision::Blocked(reason) => {
            event.prevent_default();
            log!(format!("Submission blocked: {}", reason.reason()));
            show_toast(&reason.to_string());
            true
        }
        SubmitDecision::Proceed(SubmitStrategy::FullPageSubmit) => true,
        SubmitDecision::Proceed(SubmitStrategy::BackgroundSubmit) => {
            event.prevent_default();
            let Some(form) = component.form_ref.cast::<HtmlFormElement>() else {
                return false;
            };

            match start_upload(&form, ctx.link().callback(Msg::Upload)) {
                Ok(handle) => {
                    component.session.begin_background();
                    component.upload = Some(handle);
                }
                Err(err) => {
                    error!(err);
                    let message = "Could not start the upload.";
                    show_toast(message);
                    component.session.background_not_started(message);
                }
            }
            true
        }
    }
}
