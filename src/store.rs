//! Document-store collaborator interfaces.
//!
//! The pipeline never talks to a database itself; it asks these traits for
//! the token/bbox data and the image metadata recorded when a document was
//! OCR'd. Backends (the production document database, in-memory fixtures in
//! tests) implement them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lpp_ocr::{BBox, ImageMetadata};

/// A store lookup failure. `Ok(None)` from the traits means "not found";
/// this error means the backend itself misbehaved and the run should stop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// The token/bbox payload stored for one OCR'd document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRecord {
    pub tokens: Vec<String>,
    pub bboxes: Vec<BBox>,
}

/// Lookup of the token data recorded for a task.
pub trait TokenStore {
    fn find_tokens(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<Option<TokenRecord>, StoreError>;
}

/// Lookup of the image metadata recorded for a task.
pub trait MetadataStore {
    fn find_metadata(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<Option<ImageMetadata>, StoreError>;
}
