//! Filesystem utilities

use std::path::Path;

use log::debug;

/// Check if a path exists
pub fn path_exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Check if a path points at a regular file
pub fn is_file(path: &str) -> bool {
    let is_file = Path::new(path).is_file();
    if !is_file {
        debug!("not a regular file: {}", path);
    }
    is_file
}
