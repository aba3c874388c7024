//! User feedback on classifications, kept as samples for retraining.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::{ExportError, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSample {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub predicted_label: String,
    pub correct: bool,
    /// Label supplied by the user when the prediction was wrong.
    pub corrected_label: Option<String>,
    /// Captured frame as a `data:image/...` URL.
    pub image_data_url: String,
}

impl FeedbackSample {
    pub fn confirmed(predicted_label: &str, image_data_url: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            predicted_label: predicted_label.to_string(),
            correct: true,
            corrected_label: None,
            image_data_url,
        }
    }

    pub fn corrected(
        predicted_label: &str,
        corrected_label: Option<String>,
        image_data_url: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            predicted_label: predicted_label.to_string(),
            correct: false,
            corrected_label,
            image_data_url,
        }
    }

    /// Label to train on: the correction if any, else the prediction.
    pub fn training_label(&self) -> &str {
        self.corrected_label.as_deref().unwrap_or(&self.predicted_label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: Uuid,
    pub file_name: String,
    pub label: String,
    pub predicted_label: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
    pub image_data_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetManifest {
    pub total: usize,
    pub accuracy: f32,
    pub samples: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingDataset {
    samples: Vec<FeedbackSample>,
}

impl TrainingDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: FeedbackSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[FeedbackSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Share of samples the user confirmed as correct, `0.0` when empty.
    pub fn accuracy(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let correct = self.samples.iter().filter(|s| s.correct).count();
        correct as f32 / self.samples.len() as f32
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.samples)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(Self {
            samples: serde_json::from_str(json)?,
        })
    }

    /// Self-contained export: each entry carries its image as a data URL, plus the
    /// `<label>/<id>.<ext>` name it should be saved under for retraining.
    pub fn manifest(&self) -> Result<DatasetManifest, ExportError> {
        if self.samples.is_empty() {
            return Err(ExportError::Empty);
        }
        let samples = self
            .samples
            .iter()
            .map(|s| ManifestEntry {
                id: s.id,
                file_name: format!("{}/{}.{}", s.training_label(), s.id, image_extension(&s.image_data_url)),
                label: s.training_label().to_string(),
                predicted_label: s.predicted_label.clone(),
                correct: s.correct,
                timestamp: s.timestamp,
                image_data_url: s.image_data_url.clone(),
            })
            .collect();
        Ok(DatasetManifest {
            total: self.samples.len(),
            accuracy: self.accuracy(),
            samples,
        })
    }

    pub fn export_manifest(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.manifest()?)?)
    }
}

fn image_extension(data_url: &str) -> &str {
    let mime = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or_default();
    match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_confirmed_samples() {
        let now = Utc::now();
        let mut dataset = TrainingDataset::new();
        assert_eq!(dataset.accuracy(), 0.0);

        dataset.add(FeedbackSample::confirmed("Lata", "data:image/png;base64,AAAA".into(), now));
        dataset.add(FeedbackSample::corrected(
            "Lata",
            Some("Botella".into()),
            "data:image/jpeg;base64,AAAA".into(),
            now,
        ));

        assert_eq!(dataset.len(), 2);
        assert!((dataset.accuracy() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn manifest_uses_training_labels() {
        let now = Utc::now();
        let mut dataset = TrainingDataset::new();
        dataset.add(FeedbackSample::corrected(
            "Lata",
            Some("Botella".into()),
            "data:image/png;base64,AAAA".into(),
            now,
        ));

        let manifest = dataset.manifest().unwrap();
        assert_eq!(manifest.total, 1);
        assert_eq!(manifest.samples[0].label, "Botella");
        assert!(manifest.samples[0].file_name.starts_with("Botella/"));
        assert!(manifest.samples[0].file_name.ends_with(".png"));
    }

    #[test]
    fn exported_manifest_carries_images() {
        let mut dataset = TrainingDataset::new();
        dataset.add(FeedbackSample::confirmed(
            "Carton",
            "data:image/jpeg;base64,/9j/AAAA".into(),
            Utc::now(),
        ));

        let json = dataset.export_manifest().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["samples"][0]["imageDataUrl"], "data:image/jpeg;base64,/9j/AAAA");
        assert_eq!(value["samples"][0]["label"], "Carton");
    }

    #[test]
    fn empty_dataset_cannot_be_exported() {
        assert_eq!(TrainingDataset::new().export_manifest(), Err(ExportError::Empty));
    }
}
