use derive_more::{Deref, Display, From};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::waste_info::{WasteInfo, WasteTable};

/// Predictions below this probability are not shown as a specific classification.
pub const CONFIDENCE_THRESHOLD: f32 = 0.90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(alias = "className")]
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }

    pub fn is_reliable(&self) -> bool {
        self.probability >= CONFIDENCE_THRESHOLD
    }

    pub fn percent(&self) -> f32 {
        self.probability * 100.0
    }
}

/// One inference call's output, one entry per trained class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Deref, From)]
#[serde(transparent)]
pub struct ClassificationResult(pub Vec<Prediction>);

impl ClassificationResult {
    /// Highest-probability prediction. On ties the earliest entry wins.
    pub fn top(&self) -> Option<&Prediction> {
        self.0.iter().fold(None, |best, current| match best {
            Some(max) if current.probability <= max.probability => Some(max),
            Some(_) | None => Some(current),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub label: String,
    pub confidence: f32,
    pub reliable: bool,
    pub info: WasteInfo,
}

impl Guidance {
    /// Resolves guidance for one prediction, applying the confidence gate.
    pub fn from_prediction(table: &WasteTable, prediction: &Prediction) -> Self {
        let reliable = prediction.is_reliable();
        let label = reliable.then_some(prediction.label.as_str());
        Self {
            label: prediction.label.clone(),
            confidence: prediction.probability,
            reliable,
            info: table.resolve(label).clone(),
        }
    }
}

/// Guidance for the top prediction, or `None` when the result is empty.
pub fn guidance_for(table: &WasteTable, result: &ClassificationResult) -> Option<Guidance> {
    result
        .top()
        .map(|prediction| Guidance::from_prediction(table, prediction))
}

/// Short badge shown next to the raw label.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CategoryBadge {
    #[display(fmt = "🍌 Orgánico")]
    Organic,
    #[display(fmt = "♻️ Reciclable")]
    Recyclable,
    #[display(fmt = "🚫 No Reciclable")]
    NonRecyclable,
    #[display(fmt = "🗂️ {}", _0)]
    Other(String),
}

/// Maps a class name to a badge by substring rules. The digit and `"no"` checks also
/// catch generic exported names (`Class 1`, `Class 2`), so any label containing `"0"`
/// reads as organic.
pub fn badge_for(class_name: &str) -> CategoryBadge {
    let label = class_name.to_lowercase();

    if label.contains("organi") || label.contains("class 1") || label.contains('0') {
        CategoryBadge::Organic
    } else if (label.contains("recicla") || label.contains("recycla")) && !label.contains("no") {
        CategoryBadge::Recyclable
    } else if label.contains("no") || label.contains("class 2") || label.contains('1') {
        CategoryBadge::NonRecyclable
    } else {
        CategoryBadge::Other(class_name.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Model is not loaded")]
    ModelNotLoaded,
    #[error("Prediction failed: {0}")]
    Prediction(String),
}

/// Image classification model, e.g. a Teachable Machine export running in the page.
pub trait ImageClassifier {
    type Source: ?Sized;

    fn predict<'a>(
        &'a self,
        source: &'a Self::Source,
    ) -> LocalBoxFuture<'a, Result<ClassificationResult, InferenceError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waste_info::WasteCategory;

    fn result(pairs: &[(&str, f32)]) -> ClassificationResult {
        pairs
            .iter()
            .map(|(label, p)| Prediction::new(*label, *p))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn top_prediction_prefers_first_on_ties() {
        let r = result(&[("lata", 0.4), ("botella", 0.4), ("papel", 0.2)]);
        assert_eq!(r.top().unwrap().label, "lata");
    }

    #[test]
    fn top_prediction_picks_maximum() {
        let r = result(&[("lata", 0.1), ("botella", 0.7), ("papel", 0.2)]);
        assert_eq!(r.top().unwrap().label, "botella");
        assert!(ClassificationResult::default().top().is_none());
    }

    #[test]
    fn low_confidence_yields_general_guide() {
        let table = WasteTable::builtin();
        let r = result(&[("Lata", 0.89), ("Botella", 0.11)]);

        let guidance = guidance_for(table, &r).unwrap();
        assert!(!guidance.reliable);
        assert_eq!(guidance.label, "Lata");
        assert_eq!(guidance.info.category, WasteCategory::Info);
    }

    #[test]
    fn threshold_is_inclusive() {
        let table = WasteTable::builtin();
        let guidance = Guidance::from_prediction(table, &Prediction::new("Lata", 0.90));
        assert!(guidance.reliable);
        assert_eq!(guidance.info.title, "Lata de aluminio");
    }

    #[test]
    fn deserializes_classifier_output() {
        let json = r#"[{"className":"Organico","probability":0.97},{"className":"Lata","probability":0.03}]"#;
        let r: ClassificationResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.top().unwrap().label, "Organico");
    }

    #[test]
    fn badges_follow_substring_rules() {
        assert_eq!(badge_for("Organico"), CategoryBadge::Organic);
        assert_eq!(badge_for("Reciclable"), CategoryBadge::Recyclable);
        assert_eq!(badge_for("No Reciclable"), CategoryBadge::NonRecyclable);
        assert_eq!(badge_for("Class 2"), CategoryBadge::NonRecyclable);
        assert_eq!(badge_for("Class 10"), CategoryBadge::Organic);
        assert_eq!(badge_for("Lata").to_string(), "🗂️ Lata");
    }
}
