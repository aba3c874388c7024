/// Base path the exported model is served under.
pub const DEFAULT_MODEL_BASE: &str = "./my_model/";

pub const MODEL_FILE: &str = "model.json";
pub const METADATA_FILE: &str = "metadata.json";
pub const WEIGHTS_FILE: &str = "weights.bin";

/// Files that must exist in the model directory.
pub const REQUIRED_FILES: &[&str] = &[MODEL_FILE, METADATA_FILE, WEIGHTS_FILE];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelLoadError {
    #[error("model.json not found in {0}. Make sure the exported model folder is deployed.")]
    MissingModelJson(String),
    #[error("metadata.json not found in {0}")]
    MissingMetadata(String),
    #[error("Model library not available: {0}")]
    LibraryMissing(String),
    #[error("Failed to load model: {0}")]
    Load(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAssets {
    base_url: String,
}

impl ModelAssets {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model_url(&self) -> String {
        format!("{}{}", self.base_url, MODEL_FILE)
    }

    pub fn metadata_url(&self) -> String {
        format!("{}{}", self.base_url, METADATA_FILE)
    }

    pub fn weights_url(&self) -> String {
        format!("{}{}", self.base_url, WEIGHTS_FILE)
    }

    /// Turns the outcome of probing both JSON files into a load error, model file first.
    pub fn check_probe(&self, model_found: bool, metadata_found: bool) -> Result<(), ModelLoadError> {
        if !model_found {
            return Err(ModelLoadError::MissingModelJson(self.base_url.clone()));
        }
        if !metadata_found {
            return Err(ModelLoadError::MissingMetadata(self.base_url.clone()));
        }
        Ok(())
    }
}

impl Default for ModelAssets {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_relative_to_base() {
        let assets = ModelAssets::new("/static/my_model");
        assert_eq!(assets.model_url(), "/static/my_model/model.json");
        assert_eq!(assets.metadata_url(), "/static/my_model/metadata.json");
        assert_eq!(ModelAssets::default().weights_url(), "./my_model/weights.bin");
    }

    #[test]
    fn probe_reports_first_missing_file() {
        let assets = ModelAssets::default();
        assert!(matches!(
            assets.check_probe(false, false),
            Err(ModelLoadError::MissingModelJson(_))
        ));
        assert!(matches!(
            assets.check_probe(true, false),
            Err(ModelLoadError::MissingMetadata(_))
        ));
        assert!(assets.check_probe(true, true).is_ok());
    }
}
