//! Record files
//!
//! Measurement collections are stored as a pretty-printed JSON array, one
//! object per measurement. Files are created readable by the owner only.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::merge::merge_all;
use crate::storage::types::Measurement;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Load a measurement collection from a record file
pub fn load_file(path: &Path) -> StorageResult<Vec<Measurement>> {
    let content = std::fs::read_to_string(path)?;

    let items: Vec<Measurement> =
        serde_json::from_str(&content).map_err(|e| StorageError::MalformedStoredRecord {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::debug!(path = ?path, count = items.len(), "Loaded record file");
    Ok(items)
}

/// Load several record files and merge them into one collection
///
/// Files listed first win when the same measurement appears twice.
pub fn load_files(paths: &[PathBuf]) -> StorageResult<Vec<Measurement>> {
    let sources = paths
        .iter()
        .map(|path| load_file(path))
        .collect::<StorageResult<Vec<_>>>()?;

    let merged = merge_all(sources);
    tracing::info!(
        files = paths.len(),
        count = merged.len(),
        "Loaded measurements from record files"
    );
    Ok(merged)
}

/// Render a collection in the record file format
pub fn to_json(items: &[Measurement]) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Save a measurement collection to a record file, replacing its content
pub fn save_file(path: &Path, items: &[Measurement]) -> StorageResult<()> {
    let json = to_json(items)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;

    tracing::info!(path = ?path, count = items.len(), "Saved record file");
    Ok(())
}
