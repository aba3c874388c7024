use super::super::{Model, Msg, View};
use super::theme_toggle::render_theme_toggle;
use crate::i18n::Text;
use yew::html::Scope;
use yew::prelude::*;

/// Renders the application header with navigation
pub fn render_header(model: &Model, link: &Scope<Model>) -> Html {
    let nav_button = |view: View, label: &'static str| {
        html! {
            <button
                class={classes!("nav-btn", (model.view == view).then_some("active"))}
                onclick={link.callback(move |_| Msg::ShowView(view))}
            >
                { label }
            </button>
        }
    };

    html! {
        <header class="app-header">
            <div class="top-right">
                <button class="help-btn" title={model.t(Text::Help)} onclick={link.callback(|_| Msg::ToggleHelp(true))}>
                    <i class="fa-solid fa-circle-question"></i>
                </button>
                { render_theme_toggle(model.settings.theme, link) }
            </div>
            <h1>{ model.t(Text::Title) }</h1>
            <p class="subtitle">{ model.t(Text::Subtitle) }</p>
            <nav class="nav-menu">
                { nav_button(View::Main, "♻️") }
                { nav_button(View::History, model.t(Text::History)) }
                { nav_button(View::Dataset, model.t(Text::Dataset)) }
                { nav_button(View::Settings, model.t(Text::Settings)) }
            </nav>
        </header>
    }
}
