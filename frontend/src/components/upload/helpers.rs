//! Small helpers for the upload form: user notifications and the progress label.

use num_format::{Locale, ToFormattedString};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Displays a temporary notification at the bottom of the screen.
///
/// The message is set as text, never as HTML, since it may echo a server response.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// "42% (1,024 of 2,438 bytes)"
pub fn progress_label(percent: u8, sent: Option<(u64, u64)>) -> String {
    match sent {
        Some((loaded, total)) => format!(
            "{}% ({} of {} bytes)",
            percent,
            loaded.to_formatted_string(&Locale::en),
            total.to_formatted_string(&Locale::en)
        ),
        None => format!("{}%", percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_groups_thousands() {
        assert_eq!(
            progress_label(42, Some((1_024, 2_438_000))),
            "42% (1,024 of 2,438,000 bytes)"
        );
        assert_eq!(progress_label(0, None), "0%");
    }
}
