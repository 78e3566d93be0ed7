//! Upload form: root module wiring the Yew `Component` implementation with
//! submodules for state, update logic, view rendering, transport and helpers.
//!
//! On first render the selectable levels, subjects and exam boards are
//! fetched from the server; if that fails the built-in defaults stay in place
//! and the user is told with a toast.

use common::model::options::FormOptions;
use gloo_console::error;
use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod session;
mod state;
mod transport;
mod update;
mod view;

use helpers::show_toast;
pub use messages::Msg;
pub use props::UploadFormProps;
pub use state::UploadFormComponent;

impl Component for UploadFormComponent {
    type Message = Msg;
    type Properties = UploadFormProps;

    fn create(_ctx: &Context<Self>) -> Self {
        UploadFormComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let link = ctx.link().clone();
            let url = ctx.props().options_url.clone();
            spawn_local(async move {
                match Request::get(&url).send().await {
                    Ok(resp) if resp.ok() => match resp.json::<FormOptions>().await {
                        Ok(options) => link.send_message(Msg::OptionsLoaded(options)),
                        Err(err) => {
                            error!(format!("Invalid form options: {}", err));
                            show_toast("Could not load the form options; showing the defaults.");
                        }
                    },
                    Ok(resp) => {
                        error!(format!("Form options request failed: HTTP {}", resp.status()));
                        show_toast("Could not load the form options; showing the defaults.");
                    }
                    Err(err) => {
                        error!(format!("Form options request failed: {}", err));
                        show_toast("Could not load the form options; showing the defaults.");
                    }
                }
            });
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(handle) = self.upload.take() {
            handle.abort();
        }
    }
}
