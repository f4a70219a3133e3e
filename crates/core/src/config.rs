use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TESSERACT_CONFIG: &str = "--oem 3 --psm 3";
pub const DEFAULT_LANG: &str = "eng";
pub const DEFAULT_ANSWER_KEY_FILE: &str = "answers.txt";
pub const DEFAULT_CSV_FILE_NAME: &str = "results.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for a batch run. Every field may be omitted from the TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PtacConfig {
    /// Worker pool size; `None` means one worker per available CPU.
    pub workers: Option<usize>,
    /// Grayscale + contrast/brightness/sharpness enhancement before OCR.
    pub preprocess: bool,
    /// Extra arguments handed to the OCR engine.
    pub tesseract_config: String,
    pub lang: String,
    /// Answer-key file name looked up inside each source folder.
    pub answer_key_file: String,
    /// CSV file name written inside each source folder on export.
    pub csv_file_name: String,
}

impl Default for PtacConfig {
    fn default() -> Self {
        Self {
            workers: None,
            preprocess: true,
            tesseract_config: DEFAULT_TESSERACT_CONFIG.to_string(),
            lang: DEFAULT_LANG.to_string(),
            answer_key_file: DEFAULT_ANSWER_KEY_FILE.to_string(),
            csv_file_name: DEFAULT_CSV_FILE_NAME.to_string(),
        }
    }
}

impl PtacConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Resolved worker count, never zero.
    pub fn effective_workers(&self) -> usize {
        self.workers
            .filter(|&n| n > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = PtacConfig::from_toml("").unwrap();
        assert_eq!(cfg, PtacConfig::default());
        assert_eq!(cfg.tesseract_config, "--oem 3 --psm 3");
        assert!(cfg.preprocess);
    }

    #[test]
    fn partial_toml_overrides_selected_fields() {
        let cfg = PtacConfig::from_toml("workers = 3\npreprocess = false\nlang = \"deu\"\n").unwrap();
        assert_eq!(cfg.workers, Some(3));
        assert!(!cfg.preprocess);
        assert_eq!(cfg.lang, "deu");
        assert_eq!(cfg.answer_key_file, DEFAULT_ANSWER_KEY_FILE);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(matches!(
            PtacConfig::from_toml("wrokers = 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = PtacConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn effective_workers_never_zero() {
        let cfg = PtacConfig { workers: Some(0), ..PtacConfig::default() };
        assert!(cfg.effective_workers() >= 1);
        let cfg = PtacConfig { workers: Some(5), ..PtacConfig::default() };
        assert_eq!(cfg.effective_workers(), 5);
    }
}
