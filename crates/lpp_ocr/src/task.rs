//! Annotation-task import payload.
//!
//! The shape the annotation service expects when a freshly OCR'd document is
//! registered as a labeling task. Task lifecycle (dedup, status) is the
//! service's business; this module only builds the record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::OcrRecord;

/// Task type tag attached to imported tasks.
pub const DEFAULT_TASK_TYPE: &str = "LayoutLM V3";

/// Inner metadata echoed back by the service inside the task data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskMetaInfo {
    pub task_id: String,
    pub record_time: NaiveDate,
}

/// The `data` half of an import payload: what the annotator sees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportBody {
    pub text: String,
    pub meta_info: TaskMetaInfo,
}

/// The `meta` half of an import payload: bookkeeping fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportMeta {
    pub task_id: String,
    pub import_date: NaiveDate,
    pub task_type: String,
}

/// One task registration payload for the annotation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportTask {
    pub data: ImportBody,
    pub meta: ImportMeta,
}

/// Builds the import payload for one OCR record.
///
/// Dates are explicit parameters so the builder stays deterministic; callers
/// decide what "today" means.
pub fn import_task(
    record: &OcrRecord,
    import_date: NaiveDate,
    record_time: NaiveDate,
    task_type: impl Into<String>,
) -> ImportTask {
    ImportTask {
        data: ImportBody {
            text: record.text.clone(),
            meta_info: TaskMetaInfo {
                task_id: record.task_id.clone(),
                record_time,
            },
        },
        meta: ImportMeta {
            task_id: record.task_id.clone(),
            import_date,
            task_type: task_type.into(),
        },
    }
}
