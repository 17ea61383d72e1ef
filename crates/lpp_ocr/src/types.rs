//! Data model for the OCR input boundary.
//!
//! These types describe the shape of data handed over by the OCR engine and
//! the records that flow to the annotation service and the document store.

use serde::{Deserialize, Serialize};

/// Pixel-space bounding box as `[x0, y0, x1, y1]`, with `x0 <= x1` and
/// `y0 <= y1`. Serializes as a plain JSON array.
pub type BBox = [i32; 4];

/// Raw per-word output of an OCR pass over one page image.
///
/// The engine emits parallel columns: one entry per detected word, with the
/// box given as left/top corner plus width/height. Blank words (pure
/// whitespace) are still present at this stage and are filtered out by
/// [`build_record`](crate::build_record).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawOcrFrame {
    pub words: Vec<String>,
    pub left: Vec<i32>,
    pub top: Vec<i32>,
    pub width: Vec<i32>,
    pub height: Vec<i32>,
}

/// Dataset split a document belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SampleSplit {
    Train,
    Validation,
    Test,
}

impl Default for SampleSplit {
    fn default() -> Self {
        SampleSplit::Train
    }
}

/// One OCR'd document, ready for task registration and label alignment.
///
/// `tokens` and `bboxes` are parallel and equal-length; their order is the
/// implicit token index that annotation offsets are later aligned against.
/// `text` is the single-space join of `tokens` and is exactly the string the
/// annotation tool computes character offsets over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OcrRecord {
    pub tokens: Vec<String>,
    pub bboxes: Vec<BBox>,
    pub filename: String,
    pub text: String,
    pub task_id: String,
    pub project_id: String,
    pub split: SampleSplit,
}

/// Per-image metadata record kept alongside the token data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    pub filename: String,
    pub text: String,
    pub task_id: String,
    pub project_id: String,
    pub split: SampleSplit,
}

impl OcrRecord {
    /// Metadata view of this record, as stored in the metadata collection.
    pub fn metadata(&self) -> ImageMetadata {
        ImageMetadata {
            filename: self.filename.clone(),
            text: self.text.clone(),
            task_id: self.task_id.clone(),
            project_id: self.project_id.clone(),
            split: self.split,
        }
    }
}
