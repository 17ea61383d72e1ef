//! Annotation data model.

use serde::{Deserialize, Serialize};

/// One human annotation as exported by the annotation service: a character
/// span over the reconstructed document text plus the chosen label.
///
/// `start` and `end` are character offsets; `text` is the covered span,
/// trimmed. Spans from different annotations are expected not to overlap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawAnnotation {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
}

/// A raw annotation resolved onto the token sequence.
///
/// `ids` is the contiguous run of 0-based token indices the span covers,
/// in ascending order. It is derived from `start` and the space count of the
/// span text; it is only correct when the annotation tool's whitespace
/// tokenization matches the OCR pass's word segmentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedAnnotation {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
    pub ids: Vec<usize>,
}
