use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

fn re_question_file() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(?i)^q(\d+)\.(?:png|jpe?g)$").expect("invalid regex"))
}

/// Question number encoded in a `q<N>.<png|jpg|jpeg>` file name.
pub fn question_number(file_name: &str) -> Option<u32> {
    re_question_file()
        .captures(file_name)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Question images by question number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionImageSet {
    images: BTreeMap<u32, PathBuf>,
}

impl QuestionImageSet {
    pub fn get(&self, number: u32) -> Option<&Path> {
        self.images.get(&number).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Path)> {
        self.images.iter().map(|(n, p)| (*n, p.as_path()))
    }

    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.images.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Collect question images directly inside `folder`; other files are ignored.
pub fn discover_question_images(folder: &Path) -> std::io::Result<QuestionImageSet> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut images = BTreeMap::new();
    for path in files {
        let Some(number) = path.file_name().and_then(|n| n.to_str()).and_then(question_number) else {
            continue;
        };
        match images.entry(number) {
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
            Entry::Occupied(existing) => {
                debug!(
                    "Question {number}: keeping {}, ignoring {}",
                    existing.get().display(),
                    path.display()
                );
            }
        }
    }
    Ok(QuestionImageSet { images })
}
