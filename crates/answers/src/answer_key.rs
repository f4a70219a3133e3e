use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

/// Correct answers by 1-based question number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    answers: BTreeMap<u32, String>,
}

impl AnswerKey {
    /// Each non-blank line is one answer, in question order. Blank lines do not
    /// consume a question number.
    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .zip(1u32..)
            .map(|(answer, number)| (number, answer.to_string()))
            .collect()
    }

    pub fn get(&self, number: u32) -> Option<&str> {
        self.answers.get(&number).map(String::as_str)
    }

    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.answers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(u32, String)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self { answers: iter.into_iter().collect() }
    }
}

/// Read an answer-key file. Missing or unreadable files yield an empty key.
pub fn parse_answer_key(path: &Path) -> AnswerKey {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let key = AnswerKey::parse(&content);
            debug!("Loaded {} answers from {}", key.len(), path.display());
            key
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Answer key not found: {}", path.display());
            AnswerKey::default()
        }
        Err(e) => {
            warn!("Failed to read answer key {}: {e}", path.display());
            AnswerKey::default()
        }
    }
}
