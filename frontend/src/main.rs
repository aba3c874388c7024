mod camera;
mod canvas;
mod components;
mod display;
mod i18n;
mod live;
mod ml;
mod storage;

use std::rc::Rc;

use components::handlers;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::camera::{CameraController, CameraError, CameraStart};
use shared::classification::ClassificationResult;
use shared::feedback::TrainingDataset;
use shared::history::ClassificationHistory;
use shared::session::{InputMode, Session};
use shared::settings::{Language, ScanMode, Settings, WebcamMode};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent, KeyboardEvent};
use yew::prelude::*;

use crate::camera::WebMediaDevices;
use crate::display::ResultDisplay;
use crate::i18n::{Text, text};
use crate::live::{FrameOutcome, ScanState};
use crate::ml::{CocoDetector, TeachableModel};

pub struct UploadedImage {
    name: String,
    preview: ObjectUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Main,
    History,
    Dataset,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

// Yew msg components
pub enum Msg {
    // Models
    ClassifierLoaded(Rc<TeachableModel>),
    ClassifierFailed(String),
    DetectorLoaded(Rc<CocoDetector>),
    DetectorFailed(String),

    // Camera
    SwitchMode(InputMode),
    StartCamera,
    CameraReady(CameraStart),
    CameraCancelled,
    CameraFailed(CameraError),
    LiveFrame(FrameOutcome),
    LiveStopped(Option<String>),
    Capture,
    CanvasClicked(MouseEvent),

    // Upload
    FileSelected(GlooFile),
    ClassifyUpload,
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    SetDragging(bool),

    // Results
    Classified(InputMode, ClassificationResult),
    InferenceFailed(String),
    ConfirmPrediction,
    ShowCorrection,
    CorrectionChosen(String),

    // History and dataset
    ClearHistory,
    ExportHistory,
    ClearDataset,
    ExportDataset,

    // UI states
    ShowView(View),
    ToggleHelp(bool),
    ToggleTheme,
    SetLanguage(Language),
    SetScanMode(ScanMode),
    SetWebcamMode(WebcamMode),
    SetError(Option<String>),
}

// Main component
pub struct Model {
    session: Rc<Session<WebMediaDevices>>,
    classifier: Option<Rc<TeachableModel>>,
    detector: Option<Rc<CocoDetector>>,
    scan: Rc<ScanState>,
    video_ref: NodeRef,
    canvas_ref: NodeRef,
    image_ref: NodeRef,
    settings: Settings,
    status: Option<(String, StatusKind)>,
    display: ResultDisplay,
    last_recorded: Option<String>,
    history: ClassificationHistory,
    dataset: TrainingDataset,
    upload: Option<UploadedImage>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    is_dragging: bool,
    view: View,
    show_help: bool,
    _paste_listener: Option<EventListener>,
    _key_listener: Option<EventListener>,
}

impl Model {
    fn t(&self, key: Text) -> &'static str {
        text(self.settings.language, key)
    }

    fn set_status(&mut self, message: impl Into<String>, kind: StatusKind) {
        let message = message.into();
        log::info!("{}", message);
        self.status = Some((message, kind));
    }
}

// Yew component implementation
impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let settings = storage::load_settings();
        let session = Rc::new(Session::new(CameraController::new(WebMediaDevices)));
        session.set_scan_mode(settings.scan_mode);

        let mut model = Self {
            session,
            classifier: None,
            detector: None,
            scan: Rc::new(ScanState::default()),
            video_ref: NodeRef::default(),
            canvas_ref: NodeRef::default(),
            image_ref: NodeRef::default(),
            settings,
            status: None,
            display: ResultDisplay::default(),
            last_recorded: None,
            history: storage::load_history(),
            dataset: storage::load_dataset(),
            upload: None,
            loading: false,
            error: None,
            notice: None,
            is_dragging: false,
            view: View::Main,
            show_help: false,
            _paste_listener: None,
            _key_listener: None,
        };

        handlers::apply_theme(model.settings.theme);
        let status = model.t(Text::ModelLoading);
        model.set_status(status, StatusKind::Loading);
        handlers::load_classifier(ctx);
        if model.settings.scan_mode == ScanMode::Multi {
            handlers::load_detector(ctx);
        }

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            model._paste_listener = Some(EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            }));

            let link = ctx.link().clone();
            model._key_listener = Some(EventListener::new(&window, "keydown", move |event| {
                if let Some(key_event) = event.dyn_ref::<KeyboardEvent>() {
                    if key_event.key() == "Escape" {
                        link.send_message(Msg::ToggleHelp(false));
                    }
                }
            }));
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Models
            Msg::ClassifierLoaded(classifier) => handlers::handle_classifier_loaded(self, ctx, classifier),
            Msg::ClassifierFailed(reason) => handlers::handle_classifier_failed(self, reason),
            Msg::DetectorLoaded(detector) => handlers::handle_detector_loaded(self, ctx, detector),
            Msg::DetectorFailed(reason) => {
                self.error = Some(format!("COCO-SSD: {}", reason));
                true
            }

            // Camera
            Msg::SwitchMode(mode) => handlers::handle_switch_mode(self, ctx, mode),
            Msg::StartCamera => handlers::handle_start_camera(self, ctx),
            Msg::CameraReady(start) => handlers::handle_camera_ready(self, ctx, start),
            Msg::CameraCancelled => handlers::handle_camera_cancelled(self, ctx),
            Msg::CameraFailed(error) => handlers::handle_camera_failed(self, error),
            Msg::LiveFrame(outcome) => handlers::handle_live_frame(self, outcome),
            Msg::LiveStopped(error) => {
                if let Some(error) = error {
                    log::error!("Live loop stopped: {}", error);
                    handlers::clear_result(self);
                    self.error = Some(error);
                }
                true
            }
            Msg::Capture => handlers::handle_capture(self, ctx),
            Msg::CanvasClicked(event) => handlers::handle_canvas_click(self, event),

            // Upload
            Msg::FileSelected(file) => handlers::handle_file_selected(self, file),
            Msg::ClassifyUpload => handlers::handle_classify_upload(self, ctx),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            // Results
            Msg::Classified(mode, result) => handlers::handle_classified(self, mode, result),
            Msg::InferenceFailed(reason) => {
                log::error!("Inference failed: {}", reason);
                self.loading = false;
                handlers::clear_result(self);
                self.error = Some(reason);
                true
            }
            Msg::ConfirmPrediction => handlers::handle_feedback(self, None),
            Msg::ShowCorrection => {
                self.display.correcting = true;
                true
            }
            Msg::CorrectionChosen(label) => handlers::handle_feedback(self, Some(label)),

            // History and dataset
            Msg::ClearHistory => handlers::handle_clear_history(self),
            Msg::ExportHistory => handlers::handle_export_history(self),
            Msg::ClearDataset => handlers::handle_clear_dataset(self),
            Msg::ExportDataset => handlers::handle_export_dataset(self),

            // UI states
            Msg::ShowView(view) => handlers::handle_show_view(self, ctx, view),
            Msg::ToggleHelp(show) => {
                let changed = self.show_help != show;
                self.show_help = show;
                changed
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),
            Msg::SetLanguage(language) => {
                self.settings.language = language;
                handlers::persist_settings(self);
                true
            }
            Msg::SetScanMode(scan_mode) => handlers::handle_set_scan_mode(self, ctx, scan_mode),
            Msg::SetWebcamMode(webcam_mode) => handlers::handle_set_webcam_mode(self, ctx, webcam_mode),
            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="container">
                { components::header::render_header(self, link) }

                <main class="main-content">
                    { components::utils::render_status(self) }
                    { components::utils::render_error_message(self) }
                    {
                        match self.view {
                            View::Main => html! {
                                <>
                                    { components::mode_switch::render_mode_switch(self, link) }
                                    {
                                        if self.session.mode() == InputMode::Webcam {
                                            components::camera_view::render_camera_view(self, link)
                                        } else {
                                            components::upload_section::render_upload_section(self, ctx)
                                        }
                                    }
                                    { components::results::render_results(self, link) }
                                </>
                            },
                            View::History => components::history::render_history(self, link),
                            View::Dataset => components::history::render_dataset(self, link),
                            View::Settings => components::settings::render_settings(self, link),
                        }
                    }
                </main>

                { components::help::render_help(self, link) }

                <footer class="app-footer">
                    <p>{ self.t(Text::Footer) }</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.session.shutdown();
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
