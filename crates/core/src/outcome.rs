use serde::{Serialize, Serializer};

/// Reserved prefix marking a rendered result as a failure.
pub const ERROR_PREFIX: &str = "ERROR:";

/// The result of processing a single image: cleaned text or a failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    Text(String),
    Failed(String),
}

impl OcrOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        OcrOutcome::Failed(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OcrOutcome::Failed(_))
    }

    /// Extracted text, or an empty string for failures.
    pub fn text_or_empty(&self) -> &str {
        match self {
            OcrOutcome::Text(t) => t,
            OcrOutcome::Failed(_) => "",
        }
    }
}

impl std::fmt::Display for OcrOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrOutcome::Text(t) => write!(f, "{t}"),
            OcrOutcome::Failed(msg) => write!(f, "{ERROR_PREFIX} {msg}"),
        }
    }
}

impl Serialize for OcrOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
