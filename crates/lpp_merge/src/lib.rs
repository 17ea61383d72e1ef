//! Token-label merging for layoutprep.
//!
//! Takes the OCR token/bbox sequence and the normalized annotations for one
//! document and produces the final field record: initially one `"OTHERS"`
//! entry per token, with every multi-token annotation collapsing its run of
//! tokens into the run's head entry.
//!
//! Entries live in an arena ordered by original token id, with parallel
//! `active` and `claimed` bitmaps. Lookup by token id is an index, absorption
//! deactivates the absorbed entry, and the claimed bitmap makes a second
//! annotation touching any already-labeled token a hard error instead of a
//! silent mis-merge. The merge is a pure function of its inputs; nothing is
//! shared across invocations.

use lpp_anno::NormalizedAnnotation;
use lpp_ocr::BBox;
use thiserror::Error;
use tracing::error;

mod entry;

pub use entry::{DocumentForm, FieldEntry, Word, OTHERS_LABEL};

/// Errors that abort the merge for a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("token/bbox length mismatch: {tokens} tokens vs {bboxes} boxes")]
    LengthMismatch { tokens: usize, bboxes: usize },
    #[error("annotation '{label}' references token id {id} but the document has {token_count} tokens")]
    DanglingId {
        label: String,
        id: usize,
        token_count: usize,
    },
    #[error("annotation '{label}' overlaps token id {id} already claimed by an earlier annotation")]
    OverlappingSpan { label: String, id: usize },
}

/// Merges normalized annotations into the token sequence.
///
/// Annotations must arrive sorted ascending by `start` (the normalizer's
/// output order). Every token ends up in exactly one entry: as its own
/// `"OTHERS"` entry, as the head of an annotation's run, or absorbed into
/// that head. Surviving entries are renumbered densely from 0 in original
/// order.
///
/// An annotation with an empty id run is a normalizer defect; it is logged
/// and skipped without touching any entry. Out-of-range and overlapping ids
/// fail the whole document: a partially merged record would silently corrupt
/// training data.
pub fn merge(
    tokens: &[String],
    bboxes: &[BBox],
    annotations: &[NormalizedAnnotation],
) -> Result<DocumentForm, MergeError> {
    if tokens.len() != bboxes.len() {
        return Err(MergeError::LengthMismatch {
            tokens: tokens.len(),
            bboxes: bboxes.len(),
        });
    }

    let token_count = tokens.len();
    let mut entries: Vec<FieldEntry> = tokens
        .iter()
        .zip(bboxes)
        .enumerate()
        .map(|(id, (text, bbox))| FieldEntry {
            text: text.clone(),
            label: OTHERS_LABEL.to_string(),
            bbox: *bbox,
            words: vec![Word {
                bbox: *bbox,
                text: text.clone(),
            }],
            id,
        })
        .collect();
    let mut active = vec![true; token_count];
    let mut claimed = vec![false; token_count];

    for annotation in annotations {
        let Some((&head_id, tail)) = annotation.ids.split_first() else {
            error!(
                label = %annotation.label,
                start = annotation.start,
                "annotation resolved to an empty token run; skipping"
            );
            continue;
        };

        for &id in &annotation.ids {
            if id >= token_count {
                return Err(MergeError::DanglingId {
                    label: annotation.label.clone(),
                    id,
                    token_count,
                });
            }
            if claimed[id] {
                return Err(MergeError::OverlappingSpan {
                    label: annotation.label.clone(),
                    id,
                });
            }
            claimed[id] = true;
        }

        entries[head_id].label = annotation.label.clone();
        for &id in tail {
            let absorbed_text = std::mem::take(&mut entries[id].text);
            let absorbed_words = std::mem::take(&mut entries[id].words);
            active[id] = false;

            let head = &mut entries[head_id];
            head.text.push(' ');
            head.text.push_str(&absorbed_text);
            head.words.extend(absorbed_words);
            if let Some(last) = head.words.last() {
                head.bbox[2] = last.bbox[2];
                head.bbox[3] = last.bbox[3];
            }
        }
    }

    let form = entries
        .into_iter()
        .zip(active)
        .filter_map(|(entry, keep)| keep.then_some(entry))
        .enumerate()
        .map(|(new_id, mut entry)| {
            entry.id = new_id;
            entry
        })
        .collect();

    Ok(DocumentForm { form })
}
