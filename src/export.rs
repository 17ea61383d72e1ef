//! Label-file output.
//!
//! One JSON file per document, named after the document's original image
//! file with its extension stripped.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;

use lpp_merge::DocumentForm;

/// Errors that can occur while writing a label file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write label file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize label record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Output stem for an image filename: the final path segment with a trailing
/// `.jpg` or `.png` removed.
pub fn output_stem(filename: &str) -> &str {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    name.strip_suffix(".jpg")
        .or_else(|| name.strip_suffix(".png"))
        .unwrap_or(name)
}

/// Writes one document's label record to `<dir>/<stem>.json`, creating the
/// directory if needed. Returns the path written.
pub fn write_form(dir: &Path, stem: &str, form: &DocumentForm) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.json"));
    let file = File::create(&path)?;
    serde_json::to_writer(BufWriter::new(file), form)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpp_merge::{FieldEntry, Word, OTHERS_LABEL};

    #[test]
    fn stem_strips_directories_and_extensions() {
        assert_eq!(output_stem("images/batch1/scan_01.jpg"), "scan_01");
        assert_eq!(output_stem("scan_02.png"), "scan_02");
        assert_eq!(output_stem("scan_03.tiff"), "scan_03.tiff");
        assert_eq!(output_stem("no_extension"), "no_extension");
    }

    #[test]
    fn stem_only_strips_trailing_extension() {
        assert_eq!(output_stem("a.jpg.backup/scan.jpg.png"), "scan.jpg");
    }

    #[test]
    fn writes_form_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let form = DocumentForm {
            form: vec![FieldEntry {
                text: "Hello".into(),
                label: OTHERS_LABEL.into(),
                bbox: [0, 0, 10, 10],
                words: vec![Word {
                    bbox: [0, 0, 10, 10],
                    text: "Hello".into(),
                }],
                id: 0,
            }],
        };

        let path = write_form(dir.path(), "scan_01", &form).expect("write succeeds");
        assert_eq!(path, dir.path().join("scan_01.json"));

        let written = std::fs::read_to_string(&path).expect("file readable");
        let value: serde_json::Value = serde_json::from_str(&written).expect("valid json");
        assert_eq!(value["form"][0]["text"], "Hello");
        assert_eq!(value["form"][0]["box"], serde_json::json!([0, 0, 10, 10]));
    }
}
