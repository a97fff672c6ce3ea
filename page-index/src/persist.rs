//! Index persistence: JSON snapshot under a storage directory.
//!
//! Used only in the persistent operating mode. The snapshot is a single
//! `index.json`; load failures distinguish "nothing persisted yet" from
//! actual corruption so callers can fall back to a rebuild.

use std::path::Path;

use tracing::info;

use crate::errors::index_error::IndexError;
use crate::vector_index::VectorIndex;

const INDEX_FILE: &str = "index.json";

/// Writes the index as JSON under `dir`, creating the directory when missing.
pub fn save_index(index: &VectorIndex, dir: &Path) -> Result<(), IndexError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(INDEX_FILE);
    let json = serde_json::to_vec(index)?;
    std::fs::write(&path, json)?;

    info!(
        target: "page_index::persist",
        path = %path.display(),
        chunks = index.len(),
        "index persisted"
    );
    Ok(())
}

/// Loads a previously persisted index from `dir`.
///
/// # Errors
/// - [`IndexError::NotPersisted`] when no snapshot exists at the location
/// - [`IndexError::Json`] when the snapshot cannot be decoded
pub fn load_index(dir: &Path) -> Result<VectorIndex, IndexError> {
    let path = dir.join(INDEX_FILE);
    if !path.exists() {
        return Err(IndexError::NotPersisted(path.display().to_string()));
    }

    let bytes = std::fs::read(&path)?;
    let index: VectorIndex = serde_json::from_slice(&bytes)?;

    info!(
        target: "page_index::persist",
        path = %path.display(),
        chunks = index.len(),
        "index loaded from storage"
    );
    Ok(index)
}

/// True when a snapshot exists under `dir`.
pub fn is_persisted(dir: &Path) -> bool {
    dir.join(INDEX_FILE).exists()
}
