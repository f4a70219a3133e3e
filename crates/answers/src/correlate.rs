use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ptac_core::config::{DEFAULT_ANSWER_KEY_FILE, DEFAULT_CSV_FILE_NAME};
use ptac_core::ResultSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::answer_key::parse_answer_key;
use crate::export::{build_rows, write_rows_to_path, CsvError, CsvRow};
use crate::questions::discover_question_images;
use crate::resolve::KeyResolver;

#[derive(Debug, Error)]
pub enum CorrelateError {
    #[error("Failed to list question images in {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: CsvError,
    },
}

/// Pairs OCR'd question images in a folder with its answer key and exports a CSV.
#[derive(Debug, Clone)]
pub struct Correlator {
    answer_key_file: String,
    csv_file_name: String,
    resolver: KeyResolver,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new(DEFAULT_ANSWER_KEY_FILE, DEFAULT_CSV_FILE_NAME)
    }
}

impl Correlator {
    pub fn new(answer_key_file: impl Into<String>, csv_file_name: impl Into<String>) -> Self {
        Self {
            answer_key_file: answer_key_file.into(),
            csv_file_name: csv_file_name.into(),
            resolver: KeyResolver::default(),
        }
    }

    pub fn answer_key_path(&self, folder: &Path) -> PathBuf {
        folder.join(&self.answer_key_file)
    }

    pub fn csv_path(&self, folder: &Path) -> PathBuf {
        folder.join(&self.csv_file_name)
    }

    /// Rows for `folder`, or `None` when the folder has no answer key.
    pub fn rows(&self, folder: &Path, results: &ResultSet) -> Result<Option<Vec<CsvRow>>, CorrelateError> {
        let key_path = self.answer_key_path(folder);
        if !key_path.is_file() {
            info!("No answer key at {}, skipping CSV export", key_path.display());
            return Ok(None);
        }
        let answers = parse_answer_key(&key_path);

        let images = discover_question_images(folder).map_err(|source| CorrelateError::Discovery {
            path: folder.to_path_buf(),
            source,
        })?;

        let texts: BTreeMap<u32, String> = images
            .iter()
            .map(|(number, image)| {
                let text = self.resolver.text_for(results, folder, image);
                if text.is_empty() {
                    debug!("Question {number}: no OCR text for {}", image.display());
                }
                (number, text)
            })
            .collect();

        Ok(Some(build_rows(&texts, &answers)))
    }

    /// Write the CSV for `folder` and return its path. `None` means nothing was
    /// exported: no answer key, or neither images nor answers.
    pub fn correlate(&self, folder: &Path, results: &ResultSet) -> Result<Option<PathBuf>, CorrelateError> {
        let Some(rows) = self.rows(folder, results)? else {
            return Ok(None);
        };
        if rows.is_empty() {
            info!("No data to export for {}", folder.display());
            return Ok(None);
        }

        let path = self.csv_path(folder);
        write_rows_to_path(&path, &rows).map_err(|source| CorrelateError::Export {
            path: path.clone(),
            source,
        })?;
        info!("Exported {} rows to {}", rows.len(), path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptac_core::OcrOutcome;
    use std::fs;

    #[test]
    fn missing_answer_key_skips() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("q1.png"), b"").unwrap();
        let out = Correlator::default().correlate(dir.path(), &ResultSet::new()).unwrap();
        assert_eq!(out, None);
        assert!(!dir.path().join(DEFAULT_CSV_FILE_NAME).exists());
    }

    #[test]
    fn empty_answer_key_and_no_images_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("answers.txt"), "\n\n").unwrap();
        assert_eq!(Correlator::default().correlate(dir.path(), &ResultSet::new()).unwrap(), None);
    }

    #[test]
    fn failed_ocr_renders_empty_question() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("answers.txt"), "Lift\n").unwrap();
        fs::write(dir.path().join("q1.png"), b"").unwrap();
        let mut results = ResultSet::new();
        results.insert("q1.png", OcrOutcome::failed("decode"));

        let rows = Correlator::default().rows(dir.path(), &results).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "");
        assert_eq!(rows[0].answer_text, "Lift");
    }

    #[test]
    fn custom_file_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("key.txt"), "Drag\n").unwrap();
        fs::write(dir.path().join("q1.jpg"), b"").unwrap();
        let mut results = ResultSet::new();
        results.insert("q1.jpg", OcrOutcome::Text("What opposes thrust?".into()));

        let path = Correlator::new("key.txt", "out.csv")
            .correlate(dir.path(), &results)
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join("out.csv"));
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("1,What opposes thrust?,Drag"));
    }
}
