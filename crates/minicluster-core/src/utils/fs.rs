use std::fs;
use std::io;
use std::path::Path;

use crate::component::error::AdapterError;

/// Create a directory and its parents, reporting failures with the path.
pub fn create_dir_all<P: AsRef<Path>>(path: P) -> Result<(), AdapterError> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| AdapterError::io(e, "create_dir_all", path))
}

/// Recursively delete a directory. A missing directory is not an error.
pub fn delete_folder<P: AsRef<Path>>(path: P) -> Result<(), AdapterError> {
    let path = path.as_ref();
    match fs::remove_dir_all(path) {
        Ok(()) => {
            log::debug!("Deleted {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AdapterError::io(e, "remove_dir_all", path)),
    }
}

/// Last `/`-separated segment of a path string, e.g. `metastore_db` for
/// `/tmp/hive/metastore_db`. Some embedded libraries create their working
/// directory relative to the process working directory under this name.
pub fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
