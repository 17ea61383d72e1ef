//! OCR input boundary for layoutprep.
//!
//! Turns the raw parallel-column output of an OCR pass into an [`OcrRecord`]:
//! blank words are dropped together with their coordinates, boxes are
//! converted from `[left, top, width, height]` to `[x0, y0, x1, y1]`, the
//! document text is reconstructed as the single-space join of the surviving
//! tokens, and a deterministic task id is derived from that text.
//!
//! The reconstruction matters: annotation offsets are computed against this
//! exact string, so any change to the join breaks alignment downstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

mod task;
mod types;

pub use task::{import_task, ImportBody, ImportMeta, ImportTask, TaskMetaInfo, DEFAULT_TASK_TYPE};
pub use types::{BBox, ImageMetadata, OcrRecord, RawOcrFrame, SampleSplit};

/// Runtime configuration for the OCR boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Semantic version of the OCR configuration.
    pub version: u32,
    /// Language model the engine is asked to use.
    pub lang: String,
    /// Engine mode (`--oem`), 0..=3.
    pub oem: u32,
    /// Rendering DPI hint for the engine.
    pub dpi: u32,
    /// Namespace UUID for deterministic task-id derivation.
    pub task_id_namespace: Uuid,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            version: 1,
            lang: "eng".into(),
            oem: 3,
            dpi: 600,
            task_id_namespace: Uuid::NAMESPACE_DNS,
        }
    }
}

/// Errors that can occur while building an OCR record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OcrError {
    #[error("invalid OCR configuration: {0}")]
    InvalidConfig(String),
    #[error("OCR frame columns disagree: {words} words vs {left}/{top}/{width}/{height} coords")]
    ColumnMismatch {
        words: usize,
        left: usize,
        top: usize,
        width: usize,
        height: usize,
    },
    #[error("no visible text left in frame after filtering blank words")]
    NoVisibleText,
}

/// Reconstructs the document text that annotation offsets are computed over:
/// the token texts joined by single spaces, nothing else.
pub fn document_text<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut text = String::new();
    for token in tokens {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(token.as_ref());
    }
    text
}

/// Derives the deterministic task id for a document text.
pub fn derive_task_id(cfg: &OcrConfig, text: &str) -> String {
    Uuid::new_v5(&cfg.task_id_namespace, text.as_bytes()).to_string()
}

/// Builds an [`OcrRecord`] from one raw OCR frame.
///
/// Words that are empty after trimming are discarded along with their
/// coordinates, keeping the token and box sequences parallel. Boxes are
/// converted to corner form. The frame's columns must agree in length.
pub fn build_record(
    frame: RawOcrFrame,
    filename: impl Into<String>,
    project_id: impl Into<String>,
    cfg: &OcrConfig,
) -> Result<OcrRecord, OcrError> {
    if cfg.version == 0 {
        return Err(OcrError::InvalidConfig("config version must be >= 1".into()));
    }
    if cfg.oem > 3 {
        return Err(OcrError::InvalidConfig(format!(
            "oem must be 0..=3, got {}",
            cfg.oem
        )));
    }

    let RawOcrFrame {
        words,
        left,
        top,
        width,
        height,
    } = frame;

    let count = words.len();
    if left.len() != count || top.len() != count || width.len() != count || height.len() != count {
        return Err(OcrError::ColumnMismatch {
            words: count,
            left: left.len(),
            top: top.len(),
            width: width.len(),
            height: height.len(),
        });
    }

    let mut tokens = Vec::with_capacity(count);
    let mut bboxes: Vec<BBox> = Vec::with_capacity(count);
    for (idx, word) in words.into_iter().enumerate() {
        if word.trim().is_empty() {
            continue;
        }
        let (x, y, w, h) = (left[idx], top[idx], width[idx], height[idx]);
        tokens.push(word);
        bboxes.push([x, y, x + w, y + h]);
    }

    if tokens.is_empty() {
        return Err(OcrError::NoVisibleText);
    }

    let text = document_text(&tokens);
    let task_id = derive_task_id(cfg, &text);
    let filename = filename.into();

    info!(
        task_id = %task_id,
        filename = %filename,
        tokens = tokens.len(),
        "ocr_record_built"
    );

    Ok(OcrRecord {
        tokens,
        bboxes,
        filename,
        text,
        task_id,
        project_id: project_id.into(),
        split: SampleSplit::default(),
    })
}
