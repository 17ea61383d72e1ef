//! Workspace umbrella crate for layoutprep.
//!
//! Stitches the pipeline stages together: OCR token data (boundary A) and
//! the annotation-service export (boundary B) go in, per-document
//! `{ "form": [...] }` label files come out. The alignment itself lives in
//! `lpp_anno` (offset → token-id resolution) and `lpp_merge` (token-label
//! merging); this crate adds configuration, the store collaborator
//! interfaces, and the per-export driver.

pub mod config;
pub mod export;
pub mod store;

pub use config::{
    ConfigLoadError, DatabaseConfig, ExportConfig, LayoutPrepConfig, ServiceConfig,
};
pub use export::{output_stem, write_form, ExportError};
pub use store::{MetadataStore, StoreError, TokenRecord, TokenStore};

pub use lpp_anno::{
    normalize, normalize_all, raw_annotations, token_index_at, AnnoError, AnnotatedTask,
    AnnotationExport, AnnotationResult, AnnotationRun, AnnotationValue, NormalizedAnnotation,
    RawAnnotation, TaskRef, TaskText,
};
pub use lpp_merge::{merge, DocumentForm, FieldEntry, MergeError, Word, OTHERS_LABEL};
pub use lpp_ocr::{
    build_record, derive_task_id, document_text, import_task, BBox, ImageMetadata, ImportTask,
    OcrConfig, OcrError, OcrRecord, RawOcrFrame, SampleSplit, DEFAULT_TASK_TYPE,
};

use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that can occur while processing a document through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("ocr boundary failure: {0}")]
    Ocr(#[from] OcrError),
    #[error("annotation resolution failure: {0}")]
    Annotation(#[from] AnnoError),
    #[error("merge failure: {0}")]
    Merge(#[from] MergeError),
    #[error("annotated text for task {task_id} does not match the token reconstruction")]
    TextMismatch { task_id: String },
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("export failure: {0}")]
    Export(#[from] ExportError),
}

/// Aligns one document's annotations onto its token sequence.
///
/// The document text is reconstructed from the tokens, the annotations are
/// sorted and resolved onto token-id runs (malformed spans are logged and
/// dropped), and the runs are merged into the final field record.
pub fn label_document(
    tokens: &[String],
    bboxes: &[BBox],
    annotations: Vec<RawAnnotation>,
) -> Result<DocumentForm, PipelineError> {
    let text = document_text(tokens);
    let normalized = normalize_all(annotations, &text, tokens.len());
    Ok(merge(tokens, bboxes, &normalized)?)
}

/// Aligns one annotated task from the service export onto its stored tokens.
///
/// The task's text must equal the single-space reconstruction of the stored
/// tokens byte-for-byte; anything else means the offsets were computed
/// against a different string and the labels cannot be trusted.
pub fn label_task(task: &AnnotatedTask, record: &TokenRecord) -> Result<DocumentForm, PipelineError> {
    let reconstructed = document_text(&record.tokens);
    if task.data.text != reconstructed {
        return Err(PipelineError::TextMismatch {
            task_id: task.meta.task_id.clone(),
        });
    }

    let raws = raw_annotations(task);
    let normalized = normalize_all(raws, &reconstructed, record.tokens.len());
    Ok(merge(&record.tokens, &record.bboxes, &normalized)?)
}

/// Outcome counts for one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineSummary {
    /// Documents whose label file was written.
    pub written: usize,
    /// Documents whose merge failed; no file was written for them.
    pub failed: usize,
    /// Tasks with no stored tokens or metadata.
    pub skipped: usize,
}

/// Drives one full export run: for every annotated task, look up the stored
/// token data and image metadata, align the labels, and write the label
/// file.
///
/// Per-document failures are logged and counted; the run continues and the
/// failing document produces no output file. Store backend errors and
/// filesystem errors abort the run.
pub fn combine_export(
    export: &AnnotationExport,
    tokens: &dyn TokenStore,
    metadata: &dyn MetadataStore,
    cfg: &LayoutPrepConfig,
) -> Result<CombineSummary, PipelineError> {
    let project_id = cfg.service.project_id.as_str();
    let mut summary = CombineSummary::default();

    for task in &export.data {
        let task_id = task.meta.task_id.as_str();

        let Some(record) = tokens.find_tokens(task_id, project_id)? else {
            warn!(task_id, "no token record stored for task; skipping");
            summary.skipped += 1;
            continue;
        };
        let Some(image) = metadata.find_metadata(task_id, project_id)? else {
            warn!(task_id, "no image metadata stored for task; skipping");
            summary.skipped += 1;
            continue;
        };

        match label_task(task, &record) {
            Ok(form) => {
                let stem = output_stem(&image.filename);
                let path = write_form(&cfg.export.output_dir, stem, &form)?;
                info!(
                    task_id,
                    path = %path.display(),
                    entries = form.form.len(),
                    "label_file_written"
                );
                summary.written += 1;
            }
            Err(err) => {
                error!(task_id, error = %err, "document alignment failed; no label file written");
                summary.failed += 1;
            }
        }
    }

    info!(
        written = summary.written,
        failed = summary.failed,
        skipped = summary.skipped,
        "export_combined"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<String> {
        vec!["Hello".into(), "World".into(), "Foo".into()]
    }

    fn bboxes() -> Vec<BBox> {
        vec![[0, 0, 10, 10], [11, 0, 25, 10], [26, 0, 35, 10]]
    }

    #[test]
    fn label_document_without_annotations() {
        let form = label_document(&tokens(), &bboxes(), vec![])
            .expect("alignment succeeds")
            .form;
        assert_eq!(form.len(), 3);
        assert!(form.iter().all(|entry| entry.label == OTHERS_LABEL));
        assert_eq!(
            form.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn label_document_merges_span() {
        let annotations = vec![RawAnnotation {
            start: 0,
            end: 11,
            label: "NAME".into(),
            text: "Hello World".into(),
        }];
        let form = label_document(&tokens(), &bboxes(), annotations)
            .expect("alignment succeeds")
            .form;

        assert_eq!(form.len(), 2);
        assert_eq!(form[0].text, "Hello World");
        assert_eq!(form[0].label, "NAME");
        assert_eq!(form[0].bbox, [0, 0, 25, 10]);
        assert_eq!(form[1].text, "Foo");
        assert_eq!(form[1].id, 1);
    }

    #[test]
    fn label_document_drops_malformed_span_and_continues() {
        let annotations = vec![RawAnnotation {
            start: 400,
            end: 410,
            label: "BAD".into(),
            text: "nonsense".into(),
        }];
        let form = label_document(&tokens(), &bboxes(), annotations)
            .expect("alignment succeeds")
            .form;

        assert_eq!(form.len(), 3);
        assert!(form.iter().all(|entry| entry.label == OTHERS_LABEL));
    }

    #[test]
    fn label_task_rejects_foreign_text() {
        let task: AnnotatedTask = serde_json::from_value(serde_json::json!({
            "data": { "text": "Hello  World Foo" },
            "meta": { "task_id": "t-9" },
            "annotations": []
        }))
        .expect("task fixture parses");
        let record = TokenRecord {
            tokens: tokens(),
            bboxes: bboxes(),
        };

        let res = label_task(&task, &record);
        assert!(matches!(
            res,
            Err(PipelineError::TextMismatch { task_id }) if task_id == "t-9"
        ));
    }
}
