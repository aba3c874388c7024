use super::super::{Model, Msg};
use crate::i18n::Text;
use shared::session::InputMode;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_mode_switch(model: &Model, link: &Scope<Model>) -> Html {
    let mode = model.session.mode();
    let button = |target: InputMode, icon: &'static str, label: &'static str| {
        html! {
            <button
                class={classes!("mode-btn", (mode == target).then_some("active"))}
                onclick={link.callback(move |_| Msg::SwitchMode(target))}
            >
                <i class={icon}></i>{ format!(" {}", label) }
            </button>
        }
    };

    html! {
        <div class="mode-selector">
            { button(InputMode::Webcam, "fa-solid fa-video", model.t(Text::UseWebcam)) }
            { button(InputMode::Upload, "fa-solid fa-upload", model.t(Text::UploadImage)) }
        </div>
    }
}
