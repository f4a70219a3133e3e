pub mod answer_key;
pub mod correlate;
pub mod export;
pub mod questions;
pub mod resolve;

pub use answer_key::{parse_answer_key, AnswerKey};
pub use correlate::{CorrelateError, Correlator};
pub use export::{build_rows, read_rows, read_rows_from_path, write_rows, write_rows_to_path, CsvError, CsvRow};
pub use questions::{discover_question_images, question_number, QuestionImageSet};
pub use resolve::{KeyResolver, KeyStrategy, DEFAULT_STRATEGIES};
