pub mod config;
pub mod image_path;
pub mod outcome;
pub mod result_set;

pub use config::{ConfigError, PtacConfig};
pub use image_path::{is_supported_image, SUPPORTED_EXTENSIONS};
pub use outcome::{OcrOutcome, ERROR_PREFIX};
pub use result_set::{display_key, file_name_of, ResultSet};
