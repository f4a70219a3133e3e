use std::io::Write;
use std::process::{Command, Stdio};

use ptac_core::config::{DEFAULT_LANG, DEFAULT_TESSERACT_CONFIG};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available: {0}")]
    NotAvailable(String),
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG image bytes and return the recognized text.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns the same text for every image. Lets the batch runner run without Tesseract.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

// ── Tesseract command-line backend ────────────────────────────────────────────

/// Runs the `tesseract` executable once per image, feeding the image on stdin.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: String,
    lang: String,
    config: String,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new(DEFAULT_LANG, DEFAULT_TESSERACT_CONFIG)
    }
}

impl TesseractCli {
    /// `config` is a whitespace-separated engine argument string such as `--oem 3 --psm 3`.
    pub fn new(lang: &str, config: &str) -> Self {
        Self {
            program: "tesseract".to_string(),
            lang: lang.to_string(),
            config: config.to_string(),
        }
    }

    /// Use a specific executable instead of `tesseract` from `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn args(&self) -> Vec<String> {
        ["stdin", "stdout", "-l", self.lang.as_str()]
            .into_iter()
            .map(str::to_string)
            .chain(self.config.split_whitespace().map(str::to_string))
            .collect()
    }
}

impl OcrBackend for TesseractCli {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OcrError::NotAvailable(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(image_bytes)
                .map_err(|e| OcrError::Engine(format!("writing image to engine: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| OcrError::Engine(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!("{}: {}", output.status, stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ── Tesseract library backend (optional, gated behind `tesseract` feature) ─────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::{LepTess, Variable};

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
        page_seg_mode: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str, page_seg_mode: u8) -> Self {
            Self {
                data_path,
                lang: lang.to_string(),
                page_seg_mode: page_seg_mode.to_string(),
            }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_variable(Variable::TesseditPagesegMode, &self.page_seg_mode)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
