use super::super::{Model, Msg};
use crate::i18n::Text;
use shared::settings::{Language, ScanMode, Theme, WebcamMode};
use yew::html::Scope;
use yew::prelude::*;

fn option_button(active: bool, label: &'static str, onclick: Callback<MouseEvent>) -> Html {
    html! {
        <button class={classes!("setting-btn", active.then_some("active"))} {onclick}>
            { label }
        </button>
    }
}

pub fn render_settings(model: &Model, link: &Scope<Model>) -> Html {
    let settings = &model.settings;
    let theme_label = |theme: Theme| match (settings.language, theme) {
        (Language::Es, Theme::Light) => "Claro",
        (Language::Es, Theme::Dark) => "Oscuro",
        (Language::En, Theme::Light) => "Light",
        (Language::En, Theme::Dark) => "Dark",
    };

    html! {
        <section id="config-view" class="card settings-section">
            <h2>{ model.t(Text::Settings) }</h2>

            <div class="setting-group">
                <h4>{ model.t(Text::Language) }</h4>
                <div class="setting-options">
                    { option_button(settings.language == Language::Es, "Español", link.callback(|_| Msg::SetLanguage(Language::Es))) }
                    { option_button(settings.language == Language::En, "English", link.callback(|_| Msg::SetLanguage(Language::En))) }
                </div>
            </div>

            <div class="setting-group">
                <h4>{ model.t(Text::Theme) }</h4>
                <div class="setting-options">
                    {
                        for [Theme::Light, Theme::Dark].into_iter().map(|theme| {
                            let onclick = if settings.theme == theme {
                                Callback::noop()
                            } else {
                                link.callback(|_| Msg::ToggleTheme)
                            };
                            option_button(settings.theme == theme, theme_label(theme), onclick)
                        })
                    }
                </div>
            </div>

            <div class="setting-group">
                <h4>{ model.t(Text::ScanMode) }</h4>
                <div class="setting-options">
                    { option_button(settings.scan_mode == ScanMode::Single, model.t(Text::SingleMode), link.callback(|_| Msg::SetScanMode(ScanMode::Single))) }
                    { option_button(settings.scan_mode == ScanMode::Multi, model.t(Text::MultiMode), link.callback(|_| Msg::SetScanMode(ScanMode::Multi))) }
                </div>
            </div>

            <div class="setting-group">
                <h4>{ model.t(Text::WebcamMode) }</h4>
                <div class="setting-options">
                    { option_button(settings.webcam_mode == WebcamMode::Continuous, model.t(Text::ContinuousMode), link.callback(|_| Msg::SetWebcamMode(WebcamMode::Continuous))) }
                    { option_button(settings.webcam_mode == WebcamMode::Capture, model.t(Text::CaptureMode), link.callback(|_| Msg::SetWebcamMode(WebcamMode::Capture))) }
                </div>
            </div>
        </section>
    }
}
