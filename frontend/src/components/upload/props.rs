//! Properties for the `UploadFormComponent`.

use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct UploadFormProps {
    /// Where the form options are fetched from on first render.
    #[prop_or(AttrValue::Static("/api/upload/options"))]
    pub options_url: AttrValue,
}
