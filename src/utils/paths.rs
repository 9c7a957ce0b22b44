// Path Conversion Utilities
//
// Conversion between absolute native paths and the relative Unix-style paths
// stored in documents (and hashed into document ids).

use crate::error::{CodeSearchError, Result};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Convert an absolute path to a relative Unix-style path (with `/` separators)
///
/// Both paths are canonicalized when possible so symlinked roots still match.
/// When the file no longer exists (a delete event) the original paths are
/// compared as given.
///
/// # Examples
/// ```text
/// to_relative_unix_style("/src/repo/services/Api.cs", "/src/repo")
/// // => "services/Api.cs"
/// ```
pub fn to_relative_unix_style(absolute: &Path, root: &Path) -> Result<String> {
    let (path_to_use, root_to_use) = match (absolute.canonicalize(), root.canonicalize()) {
        (Ok(canonical_abs), Ok(canonical_root)) => (canonical_abs, canonical_root),
        _ => (absolute.to_path_buf(), root.to_path_buf()),
    };

    let relative = path_to_use
        .strip_prefix(&root_to_use)
        .or_else(|_| absolute.strip_prefix(root))
        .map_err(|_| {
            CodeSearchError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "File path '{}' is not within source root '{}'",
                    absolute.display(),
                    root.display()
                ),
            ))
        })?;

    let path_str = relative.to_string_lossy();
    let unix_style = if MAIN_SEPARATOR == '\\' {
        path_str.replace('\\', "/")
    } else {
        path_str.to_string()
    };

    Ok(unix_style)
}

/// Convert a relative Unix-style path to an absolute native path
pub fn to_absolute_native(relative_unix: &str, root: &Path) -> PathBuf {
    // Path::join accepts '/' on every platform
    root.join(relative_unix)
}

/// Display form used in query output (`\` → `/`)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
