use shared::classification::{CategoryBadge, ClassificationResult, Guidance, badge_for, guidance_for};
use shared::waste_info::WasteTable;

/// What the results panel currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultDisplay {
    pub guidance: Option<Guidance>,
    pub badge: Option<CategoryBadge>,
    pub predictions: Option<ClassificationResult>,
    pub correcting: bool,
}

impl ResultDisplay {
    /// Replaces the panel with `result` and returns the gated guidance for its top prediction.
    pub fn show(&mut self, table: &WasteTable, result: ClassificationResult) -> Option<&Guidance> {
        self.guidance = guidance_for(table, &result);
        self.badge = result.top().map(|top| badge_for(&top.label));
        self.predictions = Some(result);
        self.correcting = false;
        self.guidance.as_ref()
    }

    /// Drops every trace of the previous result, e.g. when an inference fails.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.guidance.is_none() && self.predictions.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::classification::Prediction;
    use shared::waste_info::WasteCategory;

    fn result(label: &str, probability: f32) -> ClassificationResult {
        ClassificationResult::from(vec![Prediction::new(label, probability), Prediction::new("Otro", 0.01)])
    }

    #[test]
    fn failure_removes_specific_instructions() {
        let mut display = ResultDisplay::default();
        let shown = display.show(WasteTable::builtin(), result("Lata", 0.98)).cloned();
        assert_eq!(shown.map(|g| g.info.category), Some(WasteCategory::Reciclable));
        display.correcting = true;

        display.clear();

        assert!(display.is_empty());
        assert!(display.badge.is_none());
        assert!(!display.correcting);
    }

    #[test]
    fn new_result_replaces_previous_one() {
        let mut display = ResultDisplay::default();
        display.show(WasteTable::builtin(), result("Lata", 0.98));
        display.correcting = true;

        let guidance = display.show(WasteTable::builtin(), result("Pila", 0.4)).cloned();

        let guidance = guidance.expect("non-empty result has guidance");
        assert!(!guidance.reliable);
        assert_eq!(guidance.info.category, WasteCategory::Info);
        assert!(!display.correcting);
        assert_eq!(display.predictions.as_ref().map(|p| p.len()), Some(2));
    }
}
