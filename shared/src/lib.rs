pub mod assets;
pub mod camera;
pub mod classification;
pub mod detection;
pub mod feedback;
pub mod history;
pub mod session;
pub mod settings;
pub mod waste_info;

use serde::{Deserialize, Serialize};

pub use classification::{CONFIDENCE_THRESHOLD, ClassificationResult, Guidance, Prediction, guidance_for};
pub use waste_info::{WasteCategory, WasteInfo, WasteTable};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GuidanceQuery {
    pub label: String,
    pub confidence: Option<f32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GuidanceResponse {
    pub guidance: Guidance,
    pub threshold: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_ready: bool,
    pub missing_files: Vec<String>,
}
