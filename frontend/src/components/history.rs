use super::super::{Model, Msg};
use crate::i18n::Text;
use yew::html::Scope;
use yew::prelude::*;

fn stat_card(label: &str, value: String) -> Html {
    html! {
        <div class="stat-card">
            <div class="stat-value">{ value }</div>
            <div class="stat-label">{ label.to_string() }</div>
        </div>
    }
}

pub fn render_history(model: &Model, link: &Scope<Model>) -> Html {
    let stats = model.history.stats();
    let most_common = stats
        .most_common
        .map(|category| category.to_string())
        .unwrap_or_else(|| "-".to_string());

    html! {
        <section id="history-view" class="card">
            <h2>{ model.t(Text::History) }</h2>
            <div class="stats-grid">
                { stat_card(model.t(Text::TotalClassifications), stats.total.to_string()) }
                { stat_card(model.t(Text::AverageConfidence), format!("{:.1}%", stats.average_confidence * 100.0)) }
                { stat_card(model.t(Text::MostCommon), most_common) }
            </div>

            <div class="day-chart">
                { for stats.by_day.iter().map(|(day, count)| html! {
                    <div class="day-row">
                        <span class="day-label">{ day.format("%d/%m").to_string() }</span>
                        <div class="day-bar" style={format!("width: {}%", count * 100 / stats.total.max(1))}></div>
                        <span class="day-count">{ count.to_string() }</span>
                    </div>
                })}
            </div>

            {
                if model.history.is_empty() {
                    html! { <p class="no-results-message">{ model.t(Text::NoClassifications) }</p> }
                } else {
                    html! {
                        <ul class="history-list">
                            { for model.history.entries().map(|entry| html! {
                                <li key={entry.id.to_string()} class={classes!("history-item", entry.category.as_ref().to_string())}>
                                    <span class="history-label" title={entry.original_class.clone()}>{ &entry.label }</span>
                                    <span class="history-confidence">{ format!("{:.1}%", entry.confidence * 100.0) }</span>
                                    <span class="history-time">
                                        { entry.timestamp.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M").to_string() }
                                    </span>
                                </li>
                            })}
                        </ul>
                    }
                }
            }

            <div class="button-container">
                <button class="analyze-btn" onclick={link.callback(|_| Msg::ExportHistory)}>
                    <i class="fa-solid fa-download"></i>{ format!(" {}", model.t(Text::ExportData)) }
                </button>
                <button
                    class="analyze-btn"
                    style="background-color: var(--danger-color);"
                    onclick={link.callback(|_| Msg::ClearHistory)}
                >
                    <i class="fa-solid fa-trash"></i>{ format!(" {}", model.t(Text::ClearHistory)) }
                </button>
            </div>
        </section>
    }
}

pub fn render_dataset(model: &Model, link: &Scope<Model>) -> Html {
    let dataset = &model.dataset;

    html! {
        <section id="training-view" class="card">
            <h2>{ model.t(Text::Dataset) }</h2>
            <div class="stats-grid">
                { stat_card(model.t(Text::ImagesSaved), dataset.len().to_string()) }
                { stat_card(model.t(Text::AverageAccuracy), format!("{:.1}%", dataset.accuracy() * 100.0)) }
            </div>

            <div class="dataset-grid">
                { for dataset.samples().iter().rev().take(24).map(|sample| html! {
                    <figure key={sample.id.to_string()} class={classes!("dataset-item", (!sample.correct).then_some("corrected"))}>
                        <img src={sample.image_data_url.clone()} alt={sample.training_label().to_string()} />
                        <figcaption>{ sample.training_label() }</figcaption>
                    </figure>
                })}
            </div>

            <div class="button-container">
                <button class="analyze-btn" onclick={link.callback(|_| Msg::ExportDataset)}>
                    <i class="fa-solid fa-download"></i>{ format!(" {}", model.t(Text::ExportDataset)) }
                </button>
                <button
                    class="analyze-btn"
                    style="background-color: var(--danger-color);"
                    onclick={link.callback(|_| Msg::ClearDataset)}
                >
                    <i class="fa-solid fa-trash"></i>{ format!(" {}", model.t(Text::ClearDataset)) }
                </button>
            </div>
        </section>
    }
}
