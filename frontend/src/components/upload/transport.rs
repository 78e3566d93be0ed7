//! Background submission of the upload form.
//!
//! `start_upload` posts the form as `multipart/form-data` through an
//! `XmlHttpRequest` and turns its callbacks into `UploadEvent`s: one
//! `Progress` per upload progress event, then exactly one `Finished` when the
//! request ends, whether it succeeded, failed or was aborted.

use common::form::{UPLOAD_ACTION, UPLOAD_METHOD};
use common::progress::UploadEvent;
use gloo_console::log;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{FormData, HtmlFormElement, ProgressEvent, XmlHttpRequest};
use yew::Callback;

/// Owns a running upload. The JS callbacks live as long as the handle.
pub struct UploadHandle {
    xhr: XmlHttpRequest,
    _on_progress: Closure<dyn FnMut(ProgressEvent)>,
    _on_loadend: Closure<dyn FnMut(ProgressEvent)>,
}

impl UploadHandle {
    /// Cancels the request; a `Finished` event with status 0 still follows.
    pub fn abort(&self) {
        let _ = self.xhr.abort();
    }
}

pub fn start_upload(
    form: &HtmlFormElement,
    on_event: Callback<UploadEvent>,
) -> Result<UploadHandle, JsValue> {
    let data = FormData::new_with_form(form)?;
    let xhr = XmlHttpRequest::new()?;
    xhr.open(UPLOAD_METHOD, UPLOAD_ACTION)?;

    let progress = on_event.clone();
    let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |e: ProgressEvent| {
        let total = e.length_computable().then(|| e.total() as u64);
        progress.emit(UploadEvent::Progress {
            loaded: e.loaded() as u64,
            total,
        });
    });
    xhr.upload()?
        .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

    let finished = xhr.clone();
    let on_loadend = Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
        let status = finished.status().unwrap_or(0);
        let body = finished.response_text().ok().flatten().unwrap_or_default();
        log!(format!("Upload finished with status {}", status));
        on_event.emit(UploadEvent::Finished { status, body });
    });
    xhr.set_onloadend(Some(on_loadend.as_ref().unchecked_ref()));

    xhr.send_with_opt_form_data(Some(&data))?;
    log!("Upload started");

    Ok(UploadHandle {
        xhr,
        _on_progress: on_progress,
        _on_loadend: on_loadend,
    })
}
