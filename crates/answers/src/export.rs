use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::answer_key::AnswerKey;

pub const HEADER: [&str; 3] = ["Question Number", "Question", "Answer Text"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Question Number")]
    pub question_number: u32,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answer Text")]
    pub answer_text: String,
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// One row per question number found on either side, ascending. A missing side is empty.
pub fn build_rows(question_texts: &BTreeMap<u32, String>, answers: &AnswerKey) -> Vec<CsvRow> {
    let numbers: BTreeSet<u32> = question_texts.keys().copied().chain(answers.numbers()).collect();
    numbers
        .into_iter()
        .map(|n| CsvRow {
            question_number: n,
            question: question_texts.get(&n).cloned().unwrap_or_default(),
            answer_text: answers.get(n).unwrap_or_default().to_string(),
        })
        .collect()
}

/// Write the header followed by `rows`.
pub fn write_rows<W: Write>(writer: W, rows: &[CsvRow]) -> Result<(), CsvError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_rows_to_path(path: &Path, rows: &[CsvRow]) -> Result<(), CsvError> {
    let file = std::fs::File::create(path)?;
    write_rows(file, rows)
}

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<CsvRow>, CsvError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let rows = rdr.deserialize().collect::<Result<Vec<CsvRow>, _>>()?;
    Ok(rows)
}

pub fn read_rows_from_path(path: &Path) -> Result<Vec<CsvRow>, CsvError> {
    let file = std::fs::File::open(path)?;
    read_rows(file)
}
