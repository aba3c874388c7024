//! One frame of webcam classification, shared by the live loop and single captures.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared::classification::{ClassificationResult, ImageClassifier, InferenceError};
use shared::detection::{DetectedObject, ObjectDetector, filter_relevant, hit_test};
use wasm_bindgen::JsValue;
use web_sys::{HtmlCanvasElement, HtmlVideoElement};

use crate::canvas;
use crate::ml::{CocoDetector, TeachableModel};

/// Detections from the latest frame and the one the user picked.
#[derive(Default)]
pub struct ScanState {
    objects: RefCell<Vec<DetectedObject>>,
    selected: Cell<Option<usize>>,
}

impl ScanState {
    pub fn select_at(&self, x: f64, y: f64) -> Option<usize> {
        let hit = hit_test(&self.objects.borrow(), x, y);
        if let Some(index) = hit {
            log::info!("Selected object: {}", self.objects.borrow()[index].class);
        }
        self.selected.set(hit);
        hit
    }

    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn reset(&self) {
        self.objects.borrow_mut().clear();
        self.selected.set(None);
    }
}

pub enum FrameOutcome {
    Classified(ClassificationResult),
    /// Multi-object mode with nothing selected yet.
    AwaitingSelection,
}

#[derive(Clone)]
pub struct LiveFeed {
    pub classifier: Rc<TeachableModel>,
    pub detector: Option<Rc<CocoDetector>>,
    pub scan: Rc<ScanState>,
    pub video: HtmlVideoElement,
    pub canvas: HtmlCanvasElement,
}

fn js(err: JsValue) -> InferenceError {
    InferenceError::Prediction(format!("{:?}", err))
}

impl LiveFeed {
    /// Draws the current frame, then classifies either the whole frame or, when a
    /// detector is present, the selected detection.
    pub async fn cycle(&self) -> Result<FrameOutcome, InferenceError> {
        let ctx = canvas::draw_frame(&self.video, &self.canvas).map_err(js)?;

        let Some(detector) = &self.detector else {
            let result = self.classifier.predict(self.canvas.as_ref()).await?;
            return Ok(FrameOutcome::Classified(result));
        };

        let objects = filter_relevant(detector.detect(self.canvas.as_ref()).await?);
        let selected = self.scan.selected.get().filter(|&i| i < objects.len());
        canvas::draw_detections(&ctx, &objects, selected).map_err(js)?;
        let target = selected.map(|i| objects[i].bbox);
        *self.scan.objects.borrow_mut() = objects;

        match target {
            Some(bbox) => {
                let cropped = canvas::crop(&self.canvas, &bbox).map_err(js)?;
                let result = self.classifier.predict(cropped.as_ref()).await?;
                Ok(FrameOutcome::Classified(result))
            }
            None => Ok(FrameOutcome::AwaitingSelection),
        }
    }
}
