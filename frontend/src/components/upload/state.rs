//! Runtime state of the upload form.
//!
//! Everything the view needs is held here rather than read back from the DOM:
//! checkbox and e-mail values, progress and completion live in the
//! `UploadSession`, and the in-flight upload is owned through its handle.

use common::model::options::FormOptions;
use yew::prelude::*;

use super::session::UploadSession;
use super::transport::UploadHandle;

pub struct UploadFormComponent {
    /// Choices offered by the selects; defaults until the server answers.
    pub options: FormOptions,

    pub session: UploadSession,

    /// The `<form>` element, needed to build `FormData` for a background upload.
    pub form_ref: NodeRef,

    pub upload: Option<UploadHandle>,

    /// Guard to fetch the options only once.
    pub loaded: bool,
}

impl UploadFormComponent {
    pub fn new() -> Self {
        Self {
            options: FormOptions::default(),
            session: UploadSession::new(),
            form_ref: NodeRef::default(),
            upload: None,
            loaded: false,
        }
    }
}
