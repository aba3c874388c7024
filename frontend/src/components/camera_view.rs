use super::super::{Model, Msg};
use super::utils::debounce;
use crate::i18n::Text;
use shared::camera::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use shared::settings::{ScanMode, WebcamMode};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_camera_view(model: &Model, link: &Scope<Model>) -> Html {
    // Multi-object mode shows the annotated canvas instead of the raw video.
    let show_canvas = model.settings.scan_mode == ScanMode::Multi;
    let hidden = |hide: bool| if hide { "display: none;" } else { "" };

    html! {
        <div id="webcam-section" class="webcam-section">
            <div class="webcam-container">
                <video
                    ref={model.video_ref.clone()}
                    id="webcam-video"
                    autoplay=true
                    playsinline=true
                    muted=true
                    width={DEFAULT_WIDTH.to_string()}
                    height={DEFAULT_HEIGHT.to_string()}
                    style={hidden(show_canvas)}
                />
                <canvas
                    ref={model.canvas_ref.clone()}
                    id="webcam-canvas"
                    width={DEFAULT_WIDTH.to_string()}
                    height={DEFAULT_HEIGHT.to_string()}
                    style={hidden(!show_canvas)}
                    onclick={link.callback(Msg::CanvasClicked)}
                />
            </div>
            {
                if model.settings.webcam_mode == WebcamMode::Capture {
                    html! {
                        <button
                            class="analyze-btn capture-btn"
                            disabled={model.loading || !model.session.can_infer()}
                            onclick={debounce(300, {
                                let link = link.clone();
                                move || link.send_message(Msg::Capture)
                            })}
                        >
                            <i class="fa-solid fa-camera"></i>{ format!(" {}", model.t(Text::CaptureAndClassify)) }
                        </button>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
