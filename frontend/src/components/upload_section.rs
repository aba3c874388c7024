use super::super::Model;
use super::super::Msg;
use super::utils::{debounce, extract_image_files};
use crate::i18n::Text;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div id="upload-section" class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_preview(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files();
        let first_image = files
            .as_ref()
            .map(extract_image_files)
            .and_then(|files| files.into_iter().next());

        input.set_value("");

        match first_image {
            Some(file) => Msg::FileSelected(file),
            None => Msg::SetError(Some("No valid image files selected.".into())),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(input) = input {
            input.click();
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("dragover"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{ model.t(Text::SelectOrDrag) }</p>
                    <p class="file-types">{ model.t(Text::Formats) }</p>
                </div>
            </div>
        </>
    }
}

fn render_preview(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(upload) = &model.upload else {
        return html! {};
    };
    let link = ctx.link().clone();

    html! {
        <div id="preview-container">
            <img
                ref={model.image_ref.clone()}
                id="preview-image"
                src={upload.preview.to_string()}
                alt={upload.name.clone()}
                style="max-width:100%; max-height: 400px; object-fit: contain; margin-bottom: 10px;"
            />
            <button
                id="classify-image-btn"
                class="analyze-btn"
                disabled={model.loading || !model.session.can_infer()}
                onclick={debounce(300, move || link.send_message(Msg::ClassifyUpload))}
            >
                {
                    if model.loading {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{ format!(" {}", model.t(Text::Classifying)) }</> }
                    } else {
                        html! { <><i class="fa-solid fa-magnifying-glass"></i>{ format!(" {}", model.t(Text::ClassifyImage)) }</> }
                    }
                }
            </button>
        </div>
    }
}
