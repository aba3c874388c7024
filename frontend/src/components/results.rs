use super::super::{Model, Msg};
use crate::i18n::Text;
use shared::classification::CONFIDENCE_THRESHOLD;
use shared::waste_info::{WasteCategory, WasteTable};
use web_sys::HtmlSelectElement;
use yew::html::Scope;
use yew::prelude::*;

fn category_class(category: WasteCategory) -> &'static str {
    match category {
        WasteCategory::Reciclable => "recyclable",
        WasteCategory::Organico => "organic",
        WasteCategory::Merma => "reduction",
        WasteCategory::NoReciclable => "non-recyclable",
        WasteCategory::Info => "info",
    }
}

pub fn render_results(model: &Model, link: &Scope<Model>) -> Html {
    let Some(guidance) = &model.display.guidance else {
        let hint = if model.loading {
            model.t(Text::Classifying)
        } else {
            model.t(Text::Waiting)
        };
        return html! {
            <div class="results-container">
                <p id="prediction" class="no-results-message">{ hint }</p>
            </div>
        };
    };

    let confidence = guidance.confidence * 100.0;
    let info = &guidance.info;

    html! {
        <div class={classes!("results-container", category_class(info.category))}>
            <div class="result-header">
                <h2 id="prediction">{ &info.title }</h2>
                {
                    match &model.display.badge {
                        Some(badge) => html! {
                            <span class="category-badge" title={guidance.label.clone()}>{ badge.to_string() }</span>
                        },
                        None => html! {},
                    }
                }
                <div class="confidence-meter">
                    <div class="meter-label">{ format!("{}:", model.t(Text::Confidence)) }</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                    </div>
                    <div id="confidence" class="meter-value">{ format!("{:.1}%", confidence) }</div>
                </div>
                if !guidance.reliable {
                    <p class="low-confidence">
                        { format!("{} (< {:.0}%)", model.t(Text::LowConfidence), CONFIDENCE_THRESHOLD * 100.0) }
                    </p>
                }
            </div>

            <p class="waste-description">{ &info.description }</p>
            <div class="waste-guidance">
                <h3>{ model.t(Text::Instructions) }</h3>
                <ul>{ for info.instructions.iter().map(|step| html! { <li>{ step }</li> }) }</ul>
                <h3>{ model.t(Text::Tips) }</h3>
                <ul>{ for info.tips.iter().map(|tip| html! { <li>{ tip }</li> }) }</ul>
            </div>

            { render_prediction_bars(model) }
            { render_feedback(model, link) }
        </div>
    }
}

fn render_prediction_bars(model: &Model) -> Html {
    let Some(predictions) = &model.display.predictions else {
        return html! {};
    };

    html! {
        <div class="detailed-results">
            <div class="result-bars">
                { for predictions.iter().map(|prediction| {
                    let percentage = prediction.percent();
                    html! {
                        <div class="result-item">
                            <div class="result-label">{ &prediction.label }</div>
                            <div class="result-bar-container">
                                <div class="result-bar" style={format!("width: {}%", percentage)}></div>
                            </div>
                            <div class="result-value">{ format!("{:.1}%", percentage) }</div>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}

fn render_feedback(model: &Model, link: &Scope<Model>) -> Html {
    if model.display.correcting {
        let on_change = link.callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            Msg::CorrectionChosen(select.value())
        });
        return html! {
            <div class="feedback">
                <select class="correction-select" onchange={on_change}>
                    <option selected=true disabled=true value="">{ "…" }</option>
                    { for WasteTable::builtin().entries().iter().map(|entry| html! {
                        <option value={entry.key.clone()}>{ &entry.info.title }</option>
                    })}
                </select>
            </div>
        };
    }

    html! {
        <div class="feedback">
            <button class="feedback-btn correct" onclick={link.callback(|_| Msg::ConfirmPrediction)}>
                { model.t(Text::Correct) }
            </button>
            <button class="feedback-btn incorrect" onclick={link.callback(|_| Msg::ShowCorrection)}>
                { model.t(Text::Incorrect) }
            </button>
        </div>
    }
}
