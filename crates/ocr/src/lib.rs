pub mod discovery;
pub mod normalize;
pub mod preprocess;
pub mod recognizer;
pub mod runner;

pub use discovery::{discover, discover_many, DiscoveryError};
pub use normalize::{apply_rule, normalize, Rule, Scope, RULES};
pub use preprocess::{enhance, prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, TesseractCli};
pub use runner::{BatchRunner, ProcessError, RunnerOptions};
