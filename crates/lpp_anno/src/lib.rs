//! Annotation normalization for layoutprep.
//!
//! Human annotations arrive as character spans over the reconstructed
//! document text. This crate resolves each span onto the token sequence the
//! OCR pass produced: the offset indexer maps a character offset to a token
//! index, and the normalizer expands a span into the contiguous run of token
//! ids it covers.
//!
//! The resolution leans on two conventions: tokens in the document text are
//! separated by exactly one space, and the annotation tool splits words at
//! the same spaces the OCR pass did. The first is guaranteed by the text
//! reconstruction; the second is validated here only as far as the token
//! count allows (a span resolving past the last token is rejected as
//! malformed rather than silently mis-aligned).

use thiserror::Error;
use tracing::error;

mod export;
mod types;

pub use export::{
    raw_annotations, AnnotatedTask, AnnotationExport, AnnotationResult, AnnotationRun,
    AnnotationValue, TaskRef, TaskText,
};
pub use types::{NormalizedAnnotation, RawAnnotation};

/// Errors that can occur while resolving an annotation span onto tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnoError {
    #[error("annotation start {start} lies beyond the document text ({len} chars)")]
    OffsetOutOfRange { start: usize, len: usize },
    #[error(
        "span at offset {start} resolves to token {last_id} but the document has {token_count} tokens"
    )]
    SpanOutOfBounds {
        start: usize,
        last_id: usize,
        token_count: usize,
    },
}

/// Maps a character offset in the document text to a 0-based token index.
///
/// Tokens are separated by single spaces, so the index of the token that
/// begins at or contains `start` equals the number of space characters among
/// the first `start` characters. `start == 0` is token 0 without scanning.
/// An offset beyond the end of the text is an error, never clamped.
pub fn token_index_at(text: &str, start: usize) -> Result<usize, AnnoError> {
    if start == 0 {
        return Ok(0);
    }

    let mut spaces = 0;
    let mut seen = 0;
    for ch in text.chars() {
        if seen == start {
            break;
        }
        if ch == ' ' {
            spaces += 1;
        }
        seen += 1;
    }

    if seen < start {
        return Err(AnnoError::OffsetOutOfRange { start, len: seen });
    }
    Ok(spaces)
}

/// Resolves one raw annotation onto the token sequence.
///
/// The span covers `1 + (spaces inside its trimmed text)` tokens, starting at
/// the token containing `start`. The run must fit inside the document's
/// `token_count`; a span running past the last token means the annotation
/// tool tokenized differently than the OCR pass and cannot be aligned.
pub fn normalize(
    raw: RawAnnotation,
    document_text: &str,
    token_count: usize,
) -> Result<NormalizedAnnotation, AnnoError> {
    let first_id = token_index_at(document_text, raw.start)?;
    let extra = raw.text.trim().matches(' ').count();
    let last_id = first_id + extra;

    if last_id >= token_count {
        return Err(AnnoError::SpanOutOfBounds {
            start: raw.start,
            last_id,
            token_count,
        });
    }

    Ok(NormalizedAnnotation {
        start: raw.start,
        end: raw.end,
        label: raw.label,
        text: raw.text,
        ids: (first_id..=last_id).collect(),
    })
}

/// Normalizes a batch of annotations for one document.
///
/// Annotations are sorted ascending by `start` first so multi-token spans are
/// resolved left-to-right and absorption order downstream is deterministic.
/// Malformed spans are logged and dropped; the rest of the batch is still
/// processed.
pub fn normalize_all(
    mut raws: Vec<RawAnnotation>,
    document_text: &str,
    token_count: usize,
) -> Vec<NormalizedAnnotation> {
    raws.sort_by_key(|raw| raw.start);

    let mut out = Vec::with_capacity(raws.len());
    for raw in raws {
        match normalize(raw, document_text, token_count) {
            Ok(normalized) => out.push(normalized),
            Err(err) => {
                error!(error = %err, "dropping malformed annotation span");
            }
        }
    }
    out
}
