use std::rc::Rc;

use chrono::Utc;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::assets::ModelAssets;
use shared::camera::{CameraEnvironment, CameraError, CameraStart};
use shared::classification::{ClassificationResult, ImageClassifier, InferenceError};
use shared::feedback::FeedbackSample;
use shared::history::{ExportError, HistoryEntry};
use shared::session::{InputMode, ModeChange};
use shared::settings::{Language, ScanMode, Theme, WebcamMode};
use shared::waste_info::WasteTable;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement};
use yew::prelude::*;

use super::super::{Model, Msg, StatusKind, UploadedImage, View};
use crate::camera;
use crate::canvas;
use crate::i18n::{self, Text};
use crate::live::{FrameOutcome, LiveFeed};
use crate::ml;
use crate::storage;

pub fn load_classifier(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match ml::load_classifier(&ModelAssets::default()).await {
            Ok(classifier) => {
                log::info!("Classifier loaded with {} classes", classifier.class_count());
                link.send_message(Msg::ClassifierLoaded(Rc::new(classifier)));
            }
            Err(e) => link.send_message(Msg::ClassifierFailed(e.to_string())),
        }
    });
}

pub fn load_detector(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match ml::load_detector().await {
            Ok(detector) => link.send_message(Msg::DetectorLoaded(Rc::new(detector))),
            Err(e) => link.send_message(Msg::DetectorFailed(e.to_string())),
        }
    });
}

pub fn handle_classifier_loaded(model: &mut Model, ctx: &Context<Model>, classifier: Rc<ml::TeachableModel>) -> bool {
    model.classifier = Some(classifier);
    model.session.mark_model_ready();
    let status = model.t(Text::ModelLoaded);
    model.set_status(status, StatusKind::Success);

    if model.session.mode() == InputMode::Webcam && model.view == View::Main {
        ctx.link().send_message(Msg::StartCamera);
    }
    true
}

pub fn handle_classifier_failed(model: &mut Model, reason: String) -> bool {
    log::error!("Model failed to load: {}", reason);
    model.session.mark_model_failed(reason.clone());
    model.set_status(format!("❌ {}", reason), StatusKind::Error);
    true
}

pub fn handle_detector_loaded(model: &mut Model, ctx: &Context<Model>, detector: Rc<ml::CocoDetector>) -> bool {
    log::info!("Object detector loaded");
    model.detector = Some(detector);
    restart_live(model, ctx);
    true
}

pub fn handle_switch_mode(model: &mut Model, ctx: &Context<Model>, mode: InputMode) -> bool {
    match model.session.switch_mode(mode) {
        ModeChange::Unchanged => false,
        ModeChange::EnteredWebcam => {
            clear_result(model);
            model.upload = None;
            ctx.link().send_message(Msg::StartCamera);
            true
        }
        ModeChange::LeftWebcam { camera_released } => {
            if camera_released {
                if let Some(video) = model.video_ref.cast::<HtmlVideoElement>() {
                    camera::detach(&video);
                }
            }
            model.scan.reset();
            clear_result(model);
            true
        }
    }
}

pub fn handle_start_camera(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.session.mode() != InputMode::Webcam || !model.session.can_infer() {
        return false;
    }

    let status = model.t(Text::CameraStarting);
    model.set_status(status, StatusKind::Loading);

    let session = model.session.clone();
    let video_ref = model.video_ref.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let env = CameraEnvironment::from_user_agent(&camera::user_agent());
        let start = match session.start_camera(&env).await {
            Ok(start) => start,
            Err(CameraError::AcquisitionInProgress) => {
                log::debug!("Camera start already in progress");
                return;
            }
            Err(e) => {
                link.send_message(Msg::CameraFailed(e));
                return;
            }
        };

        if start == CameraStart::Cancelled {
            link.send_message(Msg::CameraCancelled);
            return;
        }

        let stream = session.camera().with_stream(|s| s.raw().clone());
        if let (Some(video), Some(stream)) = (video_ref.cast::<HtmlVideoElement>(), stream) {
            if let Err(e) = camera::attach(&video, &stream).await {
                link.send_message(Msg::CameraFailed(e));
                return;
            }
        }
        link.send_message(Msg::CameraReady(start));
    });
    true
}

pub fn handle_camera_ready(model: &mut Model, ctx: &Context<Model>, start: CameraStart) -> bool {
    if let CameraStart::Started { strategy } = start {
        log::info!("Camera started via {}", strategy);
    }
    model.scan.reset();

    let status = match model.settings.webcam_mode {
        WebcamMode::Continuous if model.settings.scan_mode == ScanMode::Multi => {
            format!("{} - {}", model.t(Text::CameraActive), model.t(Text::ClickObject))
        }
        WebcamMode::Continuous => model.t(Text::CameraActive).to_string(),
        WebcamMode::Capture => model.t(Text::CameraActiveCapture).to_string(),
    };
    model.set_status(status, StatusKind::Success);

    if model.settings.webcam_mode == WebcamMode::Continuous {
        start_live(model, ctx);
    }
    true
}

/// A stop during negotiation cancelled the request. Retry if the user came back to the camera.
pub fn handle_camera_cancelled(model: &mut Model, ctx: &Context<Model>) -> bool {
    log::debug!("Camera request cancelled");
    if model.session.mode() == InputMode::Webcam && model.view == View::Main {
        ctx.link().send_message(Msg::StartCamera);
    }
    false
}

pub fn handle_camera_failed(model: &mut Model, error: CameraError) -> bool {
    log::error!("Camera error: {}", error);
    let message = i18n::camera_error(model.settings.language, &error);
    model.set_status(format!("❌ {}", message), StatusKind::Error);
    true
}

fn live_feed(model: &Model) -> Option<LiveFeed> {
    let detector = match model.settings.scan_mode {
        ScanMode::Single => None,
        ScanMode::Multi => Some(model.detector.clone()?),
    };
    Some(LiveFeed {
        classifier: model.classifier.clone()?,
        detector,
        scan: model.scan.clone(),
        video: model.video_ref.cast::<HtmlVideoElement>()?,
        canvas: model.canvas_ref.cast::<HtmlCanvasElement>()?,
    })
}

/// Starts the continuous loop if the session allows it.
pub fn start_live(model: &mut Model, ctx: &Context<Model>) {
    let Some(feed) = live_feed(model) else {
        log::debug!("Live loop not started: classifier, detector or elements missing");
        return;
    };
    let Some(token) = model.session.begin_live() else {
        return;
    };

    let session = model.session.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let cycle = {
            let session = session.clone();
            let link = link.clone();
            move || {
                let feed = feed.clone();
                let session = session.clone();
                let link = link.clone();
                async move {
                    let outcome = feed.cycle().await?;
                    if session.live_loop().is_current(token) {
                        link.send_message(Msg::LiveFrame(outcome));
                    }
                    Ok::<(), InferenceError>(())
                }
            }
        };

        match session.live_loop().run(token, cycle, canvas::next_frame).await {
            Ok(cycles) => {
                log::debug!("Live loop ended after {} frames", cycles);
                link.send_message(Msg::LiveStopped(None));
            }
            Err(e) => link.send_message(Msg::LiveStopped(Some(e.to_string()))),
        }
    });
}

fn restart_live(model: &mut Model, ctx: &Context<Model>) {
    if model.session.live_loop().is_running() {
        model.session.live_loop().stop();
        start_live(model, ctx);
    }
}

pub fn handle_live_frame(model: &mut Model, outcome: FrameOutcome) -> bool {
    match outcome {
        FrameOutcome::Classified(result) => {
            let record = result
                .top()
                .is_some_and(|top| top.is_reliable() && model.last_recorded.as_deref() != Some(top.label.as_str()));
            apply_result(model, result, record);
        }
        FrameOutcome::AwaitingSelection => {
            if model.display.is_empty() {
                return false;
            }
            clear_result(model);
        }
    }
    true
}

pub fn handle_capture(model: &mut Model, ctx: &Context<Model>) -> bool {
    if !model.session.camera().is_active() {
        model.error = Some(i18n::camera_error(model.settings.language, &CameraError::NotFound));
        return true;
    }
    let Some(feed) = live_feed(model) else {
        return false;
    };

    model.loading = true;
    let link = ctx.link().clone();
    spawn_local(async move {
        match feed.cycle().await {
            Ok(FrameOutcome::Classified(result)) => link.send_message(Msg::Classified(InputMode::Webcam, result)),
            Ok(FrameOutcome::AwaitingSelection) => link.send_message(Msg::SetError(None)),
            Err(e) => link.send_message(Msg::InferenceFailed(e.to_string())),
        }
    });
    true
}

pub fn handle_canvas_click(model: &mut Model, event: MouseEvent) -> bool {
    let Some(canvas) = model.canvas_ref.cast::<HtmlCanvasElement>() else {
        return false;
    };
    if model.scan.object_count() == 0 {
        return false;
    }

    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return false;
    }
    let x = (event.client_x() as f64 - rect.left()) * canvas.width() as f64 / rect.width();
    let y = (event.client_y() as f64 - rect.top()) * canvas.height() as f64 / rect.height();

    if model.scan.select_at(x, y).is_none() {
        clear_result(model);
    }
    true
}

pub fn handle_file_selected(model: &mut Model, file: GlooFile) -> bool {
    model.error = None;
    clear_result(model);
    model.upload = Some(UploadedImage {
        name: file.name(),
        preview: ObjectUrl::from(file),
    });
    true
}

pub fn handle_classify_upload(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(classifier) = model.classifier.clone().filter(|_| model.session.can_infer()) else {
        model.error = Some(InferenceError::ModelNotLoaded.to_string());
        return true;
    };
    let Some(image) = model.image_ref.cast::<HtmlImageElement>() else {
        model.error = Some(model.t(Text::SelectImageFirst).to_string());
        return true;
    };

    model.loading = true;
    model.error = None;
    let link = ctx.link().clone();
    spawn_local(async move {
        match classifier.predict(image.as_ref()).await {
            Ok(result) => link.send_message(Msg::Classified(InputMode::Upload, result)),
            Err(e) => link.send_message(Msg::InferenceFailed(e.to_string())),
        }
    });
    true
}

/// Results for a mode the user already left are dropped.
pub fn handle_classified(model: &mut Model, mode: InputMode, result: ClassificationResult) -> bool {
    model.loading = false;
    if model.session.mode() != mode {
        log::debug!("Discarding {} result after mode switch", mode);
        return false;
    }
    apply_result(model, result, true);
    true
}

fn apply_result(model: &mut Model, result: ClassificationResult, record: bool) {
    let guidance = model.display.show(WasteTable::builtin(), result).cloned();
    model.session.set_guidance(guidance.clone());

    if let Some(guidance) = guidance.as_ref().filter(|_| record) {
        log::info!("🎯 {} ({:.1}%)", guidance.label, guidance.confidence * 100.0);
        model.history.record(HistoryEntry::from_guidance(guidance, Utc::now()));
        model.last_recorded = Some(guidance.label.clone());
        if let Err(e) = storage::save_history(&model.history) {
            log::warn!("History not saved: {}", e);
        }
    }
}

pub fn clear_result(model: &mut Model) {
    model.display.clear();
    model.session.set_guidance(None);
}

fn snapshot(model: &Model) -> Option<String> {
    let data_url = match model.session.mode() {
        InputMode::Webcam => canvas::canvas_data_url(&model.canvas_ref.cast::<HtmlCanvasElement>()?),
        InputMode::Upload => canvas::image_data_url(&model.image_ref.cast::<HtmlImageElement>()?),
    };
    data_url
        .map_err(|e| log::warn!("Snapshot failed: {:?}", e))
        .ok()
}

/// Stores the current image as a training sample; `correction` marks the prediction wrong.
pub fn handle_feedback(model: &mut Model, correction: Option<String>) -> bool {
    let Some(guidance) = model.display.guidance.as_ref() else {
        return false;
    };
    let Some(image) = snapshot(model) else {
        model.error = Some(model.t(Text::SnapshotFailed).to_string());
        return true;
    };

    let sample = match correction {
        None => FeedbackSample::confirmed(&guidance.label, image, Utc::now()),
        Some(label) => FeedbackSample::corrected(&guidance.label, Some(label), image, Utc::now()),
    };
    model.dataset.add(sample);
    model.display.correcting = false;

    match storage::save_dataset(&model.dataset) {
        Ok(()) => model.notice = Some(model.t(Text::FeedbackSaved).to_string()),
        Err(e) => model.error = Some(e.to_string()),
    }
    true
}

pub fn handle_clear_history(model: &mut Model) -> bool {
    model.history.clear();
    model.last_recorded = None;
    storage::clear(storage::HISTORY_KEY);
    true
}

pub fn handle_export_history(model: &mut Model) -> bool {
    let language = model.settings.language;
    let exported = model
        .history
        .export_json()
        .map_err(|e| export_message(language, e))
        .and_then(|json| {
            storage::download("historial-clasificaciones.json", &json, "application/json")
                .map_err(|e| e.to_string())
        });
    if let Err(e) = exported {
        model.error = Some(e);
    }
    true
}

pub fn handle_clear_dataset(model: &mut Model) -> bool {
    model.dataset.clear();
    storage::clear(storage::DATASET_KEY);
    true
}

pub fn handle_export_dataset(model: &mut Model) -> bool {
    let language = model.settings.language;
    let exported = model
        .dataset
        .export_manifest()
        .map_err(|e| export_message(language, e))
        .and_then(|json| {
            storage::download("dataset-entrenamiento.json", &json, "application/json")
                .map_err(|e| e.to_string())
        });
    if let Err(e) = exported {
        model.error = Some(e);
    }
    true
}

fn export_message(language: Language, error: ExportError) -> String {
    match error {
        ExportError::Empty => i18n::text(language, Text::NothingToExport).to_string(),
        other => other.to_string(),
    }
}

/// Leaving the main view releases the camera, returning re-acquires it.
pub fn handle_show_view(model: &mut Model, ctx: &Context<Model>, view: View) -> bool {
    if model.view == view {
        return false;
    }
    if model.view == View::Main {
        model.session.shutdown();
        model.scan.reset();
    }
    if view == View::Main && model.session.mode() == InputMode::Webcam {
        ctx.link().send_message(Msg::StartCamera);
    }
    model.view = view;
    model.notice = None;
    true
}

pub fn handle_set_scan_mode(model: &mut Model, ctx: &Context<Model>, scan_mode: ScanMode) -> bool {
    if model.settings.scan_mode == scan_mode {
        return false;
    }
    model.settings.scan_mode = scan_mode;
    model.session.set_scan_mode(scan_mode);
    model.scan.reset();
    clear_result(model);
    persist_settings(model);

    if scan_mode == ScanMode::Multi && model.detector.is_none() {
        load_detector(ctx);
    }
    restart_live(model, ctx);
    true
}

pub fn handle_set_webcam_mode(model: &mut Model, ctx: &Context<Model>, webcam_mode: WebcamMode) -> bool {
    if model.settings.webcam_mode == webcam_mode {
        return false;
    }
    model.settings.webcam_mode = webcam_mode;
    persist_settings(model);

    match webcam_mode {
        WebcamMode::Capture => model.session.live_loop().stop(),
        WebcamMode::Continuous => start_live(model, ctx),
    }
    true
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    model.settings.theme = model.settings.theme.toggled();
    apply_theme(model.settings.theme);
    persist_settings(model);
    true
}

pub fn apply_theme(theme: Theme) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };

    let result = match theme {
        Theme::Dark => body.class_list().add_1("dark-mode"),
        Theme::Light => body.class_list().remove_1("dark-mode"),
    };
    if let Err(e) = result {
        log::warn!("Theme not applied: {:?}", e);
    }
}

pub fn persist_settings(model: &Model) {
    if let Err(e) = storage::save_settings(&model.settings) {
        log::warn!("Settings not saved: {}", e);
    }
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(ctx, file_list, model.settings.language);
        }
    }

    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if model.session.mode() != InputMode::Upload {
        return false;
    }
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            event.prevent_default();
            process_file_list(ctx, file_list, model.settings.language);
            return true;
        }
    }
    false
}

/// Only the first image is used.
pub fn process_file_list(ctx: &Context<Model>, file_list: FileList, language: Language) {
    let Some(file) = file_list.item(0) else {
        return;
    };

    if file.type_().starts_with("image/") {
        ctx.link().send_message(Msg::FileSelected(GlooFile::from(file)));
    } else {
        log::warn!("Skipping non-image file: {}", file.name());
        ctx.link().send_message(Msg::SetError(Some(format!(
            "{}: {}",
            i18n::text(language, Text::NotAnImage),
            file.name()
        ))));
    }
}
