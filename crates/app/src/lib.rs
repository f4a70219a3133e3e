//! Batch OCR of question screenshots.
//!
//! The `ptac` binary walks one or more folders, extracts and cleans the text of
//! every supported image, prints the results and can export a CSV per folder
//! pairing each question with its answer key. `phat` opens a fixed page in the
//! default browser.

pub mod browser;
pub mod cli;
pub mod display;
pub mod run;

pub use run::{run, run_with, RunStatus};
