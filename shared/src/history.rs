use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::Guidance;
use crate::waste_info::WasteCategory;

pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Display title of the resolved record.
    pub label: String,
    pub confidence: f32,
    /// Raw classifier label.
    pub original_class: String,
    pub category: WasteCategory,
}

impl HistoryEntry {
    pub fn from_guidance(guidance: &Guidance, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            label: guidance.info.title.clone(),
            confidence: guidance.confidence,
            original_class: guidance.label.clone(),
            category: guidance.info.category,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

/// Capped classification log, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationHistory {
    entries: VecDeque<HistoryEntry>,
}

impl ClassificationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry, evicting the oldest once [`HISTORY_CAPACITY`] is exceeded.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Parses a persisted blob. Blobs longer than the cap keep their newest entries.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let mut entries: VecDeque<HistoryEntry> = serde_json::from_str(json)?;
        entries.truncate(HISTORY_CAPACITY);
        Ok(Self { entries })
    }

    pub fn export_json(&self) -> Result<String, ExportError> {
        if self.is_empty() {
            return Err(ExportError::Empty);
        }
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_entries(self.entries.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub average_confidence: f32,
    pub most_common: Option<WasteCategory>,
    pub by_category: HashMap<WasteCategory, usize>,
    pub by_day: BTreeMap<NaiveDate, usize>,
}

impl HistoryStats {
    pub fn from_entries<'a>(entries: impl Iterator<Item = &'a HistoryEntry>) -> Self {
        let mut stats = HistoryStats::default();
        let mut confidence_sum = 0.0f32;
        // First-seen order breaks ties for the most common category.
        let mut seen = Vec::new();

        for entry in entries {
            stats.total += 1;
            confidence_sum += entry.confidence;
            let count = stats.by_category.entry(entry.category).or_insert(0);
            if *count == 0 {
                seen.push(entry.category);
            }
            *count += 1;
            *stats.by_day.entry(entry.timestamp.date_naive()).or_insert(0) += 1;
        }

        if stats.total > 0 {
            stats.average_confidence = confidence_sum / stats.total as f32;
        }
        stats.most_common = seen.into_iter().fold(None, |best, category| {
            let count = stats.by_category[&category];
            match best {
                Some((_, max)) if count <= max => best,
                _ => Some((category, count)),
            }
        })
        .map(|(category, _)| category);

        stats
    }
}
