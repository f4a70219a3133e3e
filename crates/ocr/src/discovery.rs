use std::path::{Path, PathBuf};

use ptac_core::is_supported_image;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Folder not found: {0}")]
    NotFound(PathBuf),
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// List supported image files directly inside `folder`, sorted by path.
pub fn discover(folder: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !folder.exists() {
        return Err(DiscoveryError::NotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(DiscoveryError::NotADirectory(folder.to_path_buf()));
    }

    let io_err = |source| DiscoveryError::Io { path: folder.to_path_buf(), source };

    let mut images = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        } else {
            debug!("Skipping {}", path.display());
        }
    }
    images.sort();

    if images.is_empty() {
        warn!("No supported image files found in {}", folder.display());
    } else {
        info!("Found {} image files in {}", images.len(), folder.display());
    }
    Ok(images)
}

/// Discover across several folders. Folders that cannot be listed are skipped with a warning.
pub fn discover_many<P: AsRef<Path>>(folders: &[P]) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = folders
        .iter()
        .filter_map(|folder| match discover(folder.as_ref()) {
            Ok(found) => Some(found),
            Err(e) => {
                warn!("Skipping source: {e}");
                None
            }
        })
        .flatten()
        .collect();
    images.sort();
    images
}
