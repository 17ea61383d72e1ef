//! Output data model: the per-document field record the training side reads.

use lpp_ocr::BBox;
use serde::{Deserialize, Serialize};

/// Label carried by every token that no annotation claimed.
pub const OTHERS_LABEL: &str = "OTHERS";

/// One original OCR token preserved inside a field entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Word {
    #[serde(rename = "box")]
    pub bbox: BBox,
    pub text: String,
}

/// One logical field in the output: a single token, or several contiguous
/// tokens absorbed under one label.
///
/// `words` keeps the per-token detail of everything this entry covers;
/// `bbox` spans from the first token's left/top to the last absorbed word's
/// right/bottom. `id` is the entry's position in the final output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldEntry {
    pub text: String,
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BBox,
    pub words: Vec<Word>,
    pub id: usize,
}

/// The per-document output record, serialized as `{ "form": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentForm {
    pub form: Vec<FieldEntry>,
}
