//! Bindings to the in-page models: the exported Teachable Machine image classifier
//! (`tmImage`) and the COCO-SSD object detector (`cocoSsd`).

use futures::future::{FutureExt, LocalBoxFuture};
use gloo_net::http::Request;
use js_sys::{JSON, Promise, Reflect};
use serde::Deserialize;
use shared::assets::{ModelAssets, ModelLoadError};
use shared::classification::{ClassificationResult, ImageClassifier, InferenceError};
use shared::detection::{BoundingBox, DetectedObject, ObjectDetector};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = tmImage, js_name = load, catch)]
    fn tm_load(model_url: &str, metadata_url: &str) -> Result<Promise, JsValue>;

    type TmModel;

    #[wasm_bindgen(method, catch)]
    fn predict(this: &TmModel, input: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, js_name = getTotalClasses)]
    fn total_classes(this: &TmModel) -> u32;

    #[wasm_bindgen(js_namespace = cocoSsd, js_name = load, catch)]
    fn coco_load() -> Result<Promise, JsValue>;

    type CocoModel;

    #[wasm_bindgen(method, catch)]
    fn detect(this: &CocoModel, input: &JsValue) -> Result<Promise, JsValue>;
}

pub struct TeachableModel {
    inner: TmModel,
}

impl TeachableModel {
    pub fn class_count(&self) -> u32 {
        self.inner.total_classes()
    }
}

impl ImageClassifier for TeachableModel {
    type Source = JsValue;

    fn predict<'a>(
        &'a self,
        source: &'a JsValue,
    ) -> LocalBoxFuture<'a, Result<ClassificationResult, InferenceError>> {
        async move {
            let promise = self.inner.predict(source).map_err(prediction_error)?;
            let output = JsFuture::from(promise).await.map_err(prediction_error)?;
            from_js(&output)
        }
        .boxed_local()
    }
}

pub struct CocoDetector {
    inner: CocoModel,
}

#[derive(Deserialize)]
struct RawDetection {
    class: String,
    score: f32,
    bbox: [f64; 4],
}

impl From<RawDetection> for DetectedObject {
    fn from(raw: RawDetection) -> Self {
        DetectedObject {
            class: raw.class,
            score: raw.score,
            bbox: BoundingBox::from(raw.bbox),
        }
    }
}

impl ObjectDetector for CocoDetector {
    type Source = JsValue;

    fn detect<'a>(
        &'a self,
        source: &'a JsValue,
    ) -> LocalBoxFuture<'a, Result<Vec<DetectedObject>, InferenceError>> {
        async move {
            let promise = self.inner.detect(source).map_err(prediction_error)?;
            let output = JsFuture::from(promise).await.map_err(prediction_error)?;
            let raw: Vec<RawDetection> = from_js(&output)?;
            Ok(raw.into_iter().map(DetectedObject::from).collect())
        }
        .boxed_local()
    }
}

/// Checks both model files are reachable, then loads the classifier.
pub async fn load_classifier(assets: &ModelAssets) -> Result<TeachableModel, ModelLoadError> {
    ensure_library("tmImage")?;

    let model_found = probe(&assets.model_url()).await;
    let metadata_found = model_found && probe(&assets.metadata_url()).await;
    assets.check_probe(model_found, metadata_found)?;

    let promise = tm_load(&assets.model_url(), &assets.metadata_url()).map_err(load_error)?;
    let model = JsFuture::from(promise).await.map_err(load_error)?;
    Ok(TeachableModel {
        inner: model.unchecked_into(),
    })
}

pub async fn load_detector() -> Result<CocoDetector, ModelLoadError> {
    ensure_library("cocoSsd")?;
    let promise = coco_load().map_err(load_error)?;
    let model = JsFuture::from(promise).await.map_err(load_error)?;
    Ok(CocoDetector {
        inner: model.unchecked_into(),
    })
}

async fn probe(url: &str) -> bool {
    match Request::get(url).send().await {
        Ok(response) => response.ok(),
        Err(e) => {
            log::warn!("Probe of {} failed: {}", url, e);
            false
        }
    }
}

fn ensure_library(global: &str) -> Result<(), ModelLoadError> {
    match Reflect::has(&js_sys::global(), &JsValue::from_str(global)) {
        Ok(true) => Ok(()),
        _ => Err(ModelLoadError::LibraryMissing(global.to_string())),
    }
}

fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> Result<T, InferenceError> {
    let json = JSON::stringify(value)
        .map_err(prediction_error)?
        .as_string()
        .ok_or_else(|| InferenceError::Prediction("model returned no output".into()))?;
    serde_json::from_str(&json).map_err(|e| InferenceError::Prediction(e.to_string()))
}

fn describe(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

fn prediction_error(err: JsValue) -> InferenceError {
    InferenceError::Prediction(describe(&err))
}

fn load_error(err: JsValue) -> ModelLoadError {
    ModelLoadError::Load(describe(&err))
}
