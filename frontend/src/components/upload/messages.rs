use common::model::options::FormOptions;
use common::model::submission::DeliveryOption;
use common::progress::UploadEvent;
use web_sys::SubmitEvent;

pub enum Msg {
    OptionsLoaded(FormOptions),
    ToggleDelivery(DeliveryOption, bool),
    UpdateEmail(String),
    Submit(SubmitEvent),
    Upload(UploadEvent),
    Reset,
}
