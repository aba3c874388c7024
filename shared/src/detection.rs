//! Helpers for the multi-object mode, where an object detector proposes regions and
//! the user clicks one to classify it.

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::classification::InferenceError;

/// Detector classes that can plausibly be waste.
pub const RELEVANT_CLASSES: &[&str] = &[
    "bottle",
    "cup",
    "bowl",
    "apple",
    "banana",
    "orange",
    "carrot",
    "book",
    "cell phone",
    "remote",
    "keyboard",
    "mouse",
    "laptop",
    "paper",
    "cardboard",
    "plastic",
    "can",
    "box",
];

pub const MIN_DETECTION_SCORE: f32 = 0.5;

/// Padding added around a detection when cropping it for classification.
pub const CROP_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive on all edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub class: String,
    pub score: f32,
    pub bbox: BoundingBox,
}

pub fn is_relevant(object: &DetectedObject) -> bool {
    let class = object.class.to_lowercase();
    object.score > MIN_DETECTION_SCORE && RELEVANT_CLASSES.iter().any(|c| class.contains(c))
}

pub fn filter_relevant(objects: Vec<DetectedObject>) -> Vec<DetectedObject> {
    objects.into_iter().filter(is_relevant).collect()
}

/// Index of the first object whose box contains the point.
pub fn hit_test(objects: &[DetectedObject], x: f64, y: f64) -> Option<usize> {
    objects.iter().position(|o| o.bbox.contains(x, y))
}

/// Region to crop for a detection: the box grown by [`CROP_PADDING`], clamped to the frame.
pub fn crop_region(bbox: &BoundingBox, frame_width: f64, frame_height: f64) -> BoundingBox {
    let x = (bbox.x - CROP_PADDING).max(0.0);
    let y = (bbox.y - CROP_PADDING).max(0.0);
    let width = (frame_width - x).min(bbox.width + 2.0 * CROP_PADDING);
    let height = (frame_height - y).min(bbox.height + 2.0 * CROP_PADDING);
    BoundingBox::new(x, y, width.max(0.0), height.max(0.0))
}

pub trait ObjectDetector {
    type Source: ?Sized;

    fn detect<'a>(
        &'a self,
        source: &'a Self::Source,
    ) -> LocalBoxFuture<'a, Result<Vec<DetectedObject>, InferenceError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(class: &str, score: f32, bbox: [f64; 4]) -> DetectedObject {
        DetectedObject {
            class: class.to_string(),
            score,
            bbox: bbox.into(),
        }
    }

    #[test]
    fn keeps_confident_relevant_objects() {
        let kept = filter_relevant(vec![
            object("bottle", 0.9, [0.0, 0.0, 10.0, 10.0]),
            object("bottle", 0.5, [0.0, 0.0, 10.0, 10.0]),
            object("person", 0.99, [0.0, 0.0, 10.0, 10.0]),
            object("Cell Phone", 0.7, [0.0, 0.0, 10.0, 10.0]),
        ]);

        let classes: Vec<&str> = kept.iter().map(|o| o.class.as_str()).collect();
        assert_eq!(classes, vec!["bottle", "Cell Phone"]);
    }

    #[test]
    fn hit_test_returns_first_containing_box() {
        let objects = vec![
            object("cup", 0.9, [10.0, 10.0, 50.0, 50.0]),
            object("bottle", 0.9, [30.0, 30.0, 50.0, 50.0]),
        ];

        assert_eq!(hit_test(&objects, 40.0, 40.0), Some(0));
        assert_eq!(hit_test(&objects, 70.0, 70.0), Some(1));
        assert_eq!(hit_test(&objects, 60.0, 60.0), Some(0));
        assert_eq!(hit_test(&objects, 200.0, 5.0), None);
    }

    #[test]
    fn crop_is_padded_and_clamped() {
        let inner = crop_region(&BoundingBox::new(100.0, 100.0, 50.0, 40.0), 640.0, 480.0);
        assert_eq!(inner, BoundingBox::new(90.0, 90.0, 70.0, 60.0));

        let corner = crop_region(&BoundingBox::new(5.0, 2.0, 630.0, 470.0), 640.0, 480.0);
        assert_eq!(corner, BoundingBox::new(0.0, 0.0, 640.0, 480.0));
    }
}
