use gloo_file::{Blob, ObjectUrl};
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::callback::Timeout;
use shared::feedback::TrainingDataset;
use shared::history::{ClassificationHistory, StoreError};
use shared::settings::Settings;
use shared::settings::{LANGUAGE_KEY, SCAN_MODE_KEY, THEME_KEY, WEBCAM_MODE_KEY};
use wasm_bindgen::JsCast;

pub const HISTORY_KEY: &str = "classificationHistory";
pub const DATASET_KEY: &str = "trainingDataset";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Storage write failed: {0}")]
    Write(String),
}

fn read(key: &str) -> Option<String> {
    LocalStorage::raw().get_item(key).ok().flatten()
}

fn write(key: &str, value: &str) -> Result<(), PersistError> {
    LocalStorage::raw()
        .set_item(key, value)
        .map_err(|e| PersistError::Write(format!("{:?}", e)))
}

/// A missing or malformed blob yields an empty history.
pub fn load_history() -> ClassificationHistory {
    let Some(json) = read(HISTORY_KEY) else {
        return ClassificationHistory::new();
    };
    ClassificationHistory::from_json(&json).unwrap_or_else(|e| {
        log::warn!("Discarding stored history: {}", e);
        ClassificationHistory::new()
    })
}

pub fn save_history(history: &ClassificationHistory) -> Result<(), PersistError> {
    write(HISTORY_KEY, &history.to_json()?)
}

pub fn load_dataset() -> TrainingDataset {
    let Some(json) = read(DATASET_KEY) else {
        return TrainingDataset::new();
    };
    TrainingDataset::from_json(&json).unwrap_or_else(|e| {
        log::warn!("Discarding stored dataset: {}", e);
        TrainingDataset::new()
    })
}

pub fn save_dataset(dataset: &TrainingDataset) -> Result<(), PersistError> {
    write(DATASET_KEY, &dataset.to_json()?)
}

pub fn clear(key: &str) {
    LocalStorage::delete(key);
}

pub fn load_settings() -> Settings {
    Settings::from_stored(
        read(LANGUAGE_KEY).as_deref(),
        read(THEME_KEY).as_deref(),
        read(SCAN_MODE_KEY).as_deref(),
        read(WEBCAM_MODE_KEY).as_deref(),
    )
}

pub fn save_settings(settings: &Settings) -> Result<(), PersistError> {
    for (key, value) in settings.to_stored() {
        write(key, value)?;
    }
    Ok(())
}

const DOWNLOAD_URL_TTL_MS: u32 = 10_000;

/// Offers `contents` to the user as a file download.
pub fn download(file_name: &str, contents: &str, mime_type: &str) -> Result<(), PersistError> {
    let blob = Blob::new_with_options(contents, Some(mime_type));
    let url = ObjectUrl::from(blob);

    let anchor = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.create_element("a").ok())
        .and_then(|e| e.dyn_into::<web_sys::HtmlAnchorElement>().ok())
        .ok_or_else(|| PersistError::Write("cannot create download link".into()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    // Keep the URL alive until the browser has started the download.
    Timeout::new(DOWNLOAD_URL_TTL_MS, move || drop(url)).forget();
    Ok(())
}
