//! View rendering for the upload form.
//!
//! The form posts to `UPLOAD_ACTION` with the field names the upload handler
//! reads, so a full-page submit works without any script involvement. The
//! e-mail input's `required` flag is derived from `FormState` on every render.
//! Once a background submission finishes, the completion message is shown and
//! the form stays in the document, hidden, so "Try again" brings it back with
//! its files and selections intact.

use common::form::{fields, UPLOAD_ACTION, UPLOAD_METHOD};
use common::model::submission::{DeliveryOption, FEEDBACK_DETAIL};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::progress_label;
use super::messages::Msg;
use super::state::UploadFormComponent;

pub fn view(component: &UploadFormComponent, ctx: &Context<UploadFormComponent>) -> Html {
    let link = ctx.link();
    let session = &component.session;

    html! {
        <div class="upload-root">
            {
                match &session.completion {
                    Some(message) => build_completion(message, session.failed, link),
                    None => html! {},
                }
            }
            <form
                ref={component.form_ref.clone()}
                action={UPLOAD_ACTION}
                method={UPLOAD_METHOD}
                enctype="multipart/form-data"
                onsubmit={link.callback(Msg::Submit)}
                hidden={session.form_hidden()}
            >
                { build_context_selects(component) }
                { build_file_inputs(component) }
                { build_teacher_fields(component, link) }
                { build_delivery_options(component, link) }
                <input type="hidden" name={fields::FEEDBACK_DETAIL} value={FEEDBACK_DETAIL} />
                <p class="help-text">{ component.options.help_text() }</p>
                {
                    if let Some(error) = &session.error {
                        html! { <p class="form-error" role="alert">{ error }</p> }
                    } else {
                        html! {}
                    }
                }
                <button type="submit" disabled={session.form.in_flight}>{"Upload and mark"}</button>
            </form>
            { build_progress(component) }
        </div>
    }
}

fn build_context_selects(component: &UploadFormComponent) -> Html {
    let options = &component.options;
    html! {
        <fieldset class="context">
            { select(fields::LEVEL, "Level", options.levels.iter().map(|l| l.label())) }
            { select(fields::SUBJECT, "Subject", options.subjects.iter().map(|s| s.label())) }
            { select(fields::EXAM_BOARD, "Exam board", options.exam_boards.iter().map(|b| b.label())) }
        </fieldset>
    }
}

fn select<'a>(name: &'static str, label: &'static str, values: impl Iterator<Item = &'a str>) -> Html {
    html! {
        <label>
            { label }
            <select name={name} required=true>
                { for values.map(|value| html! { <option value={value.to_string()}>{ value }</option> }) }
            </select>
        </label>
    }
}

fn build_file_inputs(component: &UploadFormComponent) -> Html {
    html! {
        <fieldset class="files">
            <label>
                {"Mark scheme"}
                <input type="file" name={fields::MARKSCHEME_FILE} required=true />
            </label>
            <label>
                {"Student answers"}
                <input type="file" name={fields::STUDENT_FILES} multiple=true required=true />
            </label>
            {
                if component.options.show_marking_points {
                    html! {
                        <label>
                            {"Marking points (optional)"}
                            <input type="file" name={fields::MARKING_POINTS_FILE} />
                        </label>
                    }
                } else {
                    html! {}
                }
            }
        </fieldset>
    }
}

fn build_teacher_fields(component: &UploadFormComponent, link: &Scope<UploadFormComponent>) -> Html {
    html! {
        <fieldset class="teacher">
            <label>
                {"Your e-mail"}
                <input
                    type="email"
                    name={fields::TEACHER_EMAIL}
                    value={component.session.form.email.clone()}
                    required={component.session.form.email_required()}
                    oninput={link.callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdateEmail(input.value())
                    })}
                />
            </label>
            <label>
                {"Additional information"}
                <textarea name={fields::ADDITIONAL_INFO} rows={4} />
            </label>
        </fieldset>
    }
}

fn build_delivery_options(component: &UploadFormComponent, link: &Scope<UploadFormComponent>) -> Html {
    html! {
        <fieldset class="delivery">
            <legend>{"How would you like your results?"}</legend>
            { delivery_checkbox(component, link, DeliveryOption::Website, "Show them on the website") }
            { delivery_checkbox(component, link, DeliveryOption::Email, "E-mail them to me") }
        </fieldset>
    }
}

fn delivery_checkbox(
    component: &UploadFormComponent,
    link: &Scope<UploadFormComponent>,
    option: DeliveryOption,
    label: &'static str,
) -> Html {
    html! {
        <label>
            <input
                type="checkbox"
                name={fields::DELIVERY_OPTION}
                value={option.label()}
                checked={component.session.form.is_checked(option)}
                onchange={link.callback(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    Msg::ToggleDelivery(option, input.checked())
                })}
            />
            { label }
        </label>
    }
}

fn build_progress(component: &UploadFormComponent) -> Html {
    let session = &component.session;
    if !session.uploading() {
        return html! {};
    }
    let percent = session.tracker.percent().unwrap_or(0);
    html! {
        <div class="upload-progress">
            <progress max="100" value={percent.to_string()} />
            <span class="progress-label">{ progress_label(percent, session.sent) }</span>
        </div>
    }
}

fn build_completion(message: &str, failed: bool, link: &Scope<UploadFormComponent>) -> Html {
    html! {
        <div class={classes!("upload-complete", failed.then_some("failed"))}>
            <h2>{ message }</h2>
            {
                if failed {
                    html! { <button onclick={link.callback(|_| Msg::Reset)}>{"Try again"}</button> }
                } else {
                    html! { <a href="/">{"Mark another set of papers"}</a> }
                }
            }
        </div>
    }
}
