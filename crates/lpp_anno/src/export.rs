//! Annotation-service export records.
//!
//! Shape of the JSON export the annotation service produces for a project:
//! one task per document, each carrying the document text it was annotated
//! against and any number of annotation runs, each with a list of span
//! results. Only the fields this pipeline consumes are modeled.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::RawAnnotation;

/// The span value inside one annotation result. `labels` holds the label
/// choices for the span; the first entry is the effective label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationValue {
    pub start: usize,
    pub end: usize,
    pub labels: Vec<String>,
    pub text: String,
}

/// One labeled span inside an annotation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationResult {
    pub value: AnnotationValue,
}

/// One annotator's pass over a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationRun {
    pub result: Vec<AnnotationResult>,
}

/// The document text a task was created with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskText {
    pub text: String,
}

/// Task bookkeeping echoed back in the export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRef {
    pub task_id: String,
}

/// One annotated task in the export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotatedTask {
    pub data: TaskText,
    pub meta: TaskRef,
    #[serde(default)]
    pub annotations: Vec<AnnotationRun>,
}

/// A full project export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationExport {
    pub data: Vec<AnnotatedTask>,
}

/// Flattens a task's annotation runs into raw annotations.
///
/// Span text is trimmed; results with an empty label list are logged and
/// dropped. Ordering is left to the normalizer, which sorts by `start`.
pub fn raw_annotations(task: &AnnotatedTask) -> Vec<RawAnnotation> {
    let mut out = Vec::new();
    for run in &task.annotations {
        for result in &run.result {
            let value = &result.value;
            let Some(label) = value.labels.first() else {
                warn!(
                    task_id = %task.meta.task_id,
                    start = value.start,
                    end = value.end,
                    "annotation result has no labels; dropping"
                );
                continue;
            };
            out.push(RawAnnotation {
                start: value.start,
                end: value.end,
                label: label.clone(),
                text: value.text.trim().to_string(),
            });
        }
    }
    out
}
