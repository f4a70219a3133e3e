use std::path::Path;

use ptac_core::{file_name_of, OcrOutcome, ResultSet};

/// One way of finding a question image's entry in a [`ResultSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Key is the bare file name (single-folder runs).
    FileName,
    /// Key is the image's full path (base folders sharing a name).
    AbsolutePath,
    /// Key is `<folder name>/<file name>` (multi-folder runs).
    FolderPrefixed,
    /// Any key whose last component is the file name.
    FileNameSuffix,
}

/// Full-path keys are tried before prefixed ones: when two base folders share
/// a name, the prefixed key belongs to the first of them.
pub const DEFAULT_STRATEGIES: [KeyStrategy; 4] = [
    KeyStrategy::FileName,
    KeyStrategy::AbsolutePath,
    KeyStrategy::FolderPrefixed,
    KeyStrategy::FileNameSuffix,
];

impl KeyStrategy {
    fn lookup<'a>(
        self,
        results: &'a ResultSet,
        folder: &Path,
        image: &Path,
    ) -> Option<(&'a str, &'a OcrOutcome)> {
        let file_name = file_name_of(image);
        match self {
            KeyStrategy::FileName => results.get_entry(&file_name),
            KeyStrategy::AbsolutePath => results.get_entry(&image.display().to_string()),
            KeyStrategy::FolderPrefixed => {
                results.get_entry(&format!("{}/{file_name}", file_name_of(folder)))
            }
            KeyStrategy::FileNameSuffix => results.iter().find(|(key, _)| {
                Path::new(key).file_name().and_then(|n| n.to_str()) == Some(file_name.as_str())
            }),
        }
    }
}

/// Tries each strategy in order; the first hit wins.
#[derive(Debug, Clone)]
pub struct KeyResolver {
    strategies: Vec<KeyStrategy>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_STRATEGIES.to_vec())
    }
}

impl KeyResolver {
    pub fn new(strategies: Vec<KeyStrategy>) -> Self {
        Self { strategies }
    }

    pub fn resolve<'a>(
        &self,
        results: &'a ResultSet,
        folder: &Path,
        image: &Path,
    ) -> Option<(&'a str, &'a OcrOutcome)> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.lookup(results, folder, image))
    }

    /// OCR text for `image`; failures and misses yield an empty string.
    pub fn text_for(&self, results: &ResultSet, folder: &Path, image: &Path) -> String {
        self.resolve(results, folder, image)
            .map(|(_, outcome)| outcome.text_or_empty().to_string())
            .unwrap_or_default()
    }
}
