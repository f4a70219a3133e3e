use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::outcome::OcrOutcome;

/// Processed images keyed by display key. Iteration is always in ascending key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: BTreeMap<String, OcrOutcome>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an outcome; returns the previous outcome stored under the same key.
    pub fn insert(&mut self, key: impl Into<String>, outcome: OcrOutcome) -> Option<OcrOutcome> {
        self.entries.insert(key.into(), outcome)
    }

    pub fn get(&self, key: &str) -> Option<&OcrOutcome> {
        self.entries.get(key)
    }

    /// The stored key and outcome for `key`.
    pub fn get_entry(&self, key: &str) -> Option<(&str, &OcrOutcome)> {
        self.entries.get_key_value(key).map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OcrOutcome)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries holding extracted text rather than a failure.
    pub fn success_count(&self) -> usize {
        self.entries.values().filter(|o| !o.is_error()).count()
    }
}

impl FromIterator<(String, OcrOutcome)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (String, OcrOutcome)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Compute the identifier under which an image's result is presented.
///
/// With more than one base folder the key is `<folder name>/<relative path>`
/// using the first base folder that contains `path`, falling back to the full
/// path when none does. With zero or one base folder it is the file name.
pub fn display_key(path: &Path, base_paths: &[PathBuf]) -> String {
    if base_paths.len() <= 1 {
        return file_name_of(path);
    }

    for base in base_paths {
        if let Ok(relative) = path.strip_prefix(base) {
            let folder = base
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| base.display().to_string());
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            return format!("{folder}/{relative}");
        }
    }

    path.display().to_string()
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
