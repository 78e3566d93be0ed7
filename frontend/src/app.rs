use crate::components::upload::UploadFormComponent;
use yew::{html, Component, Context, Html};

pub struct App;

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="page">
                <h1>{"Mark a set of exam papers"}</h1>
                <UploadFormComponent />
            </div>
        }
    }
}
