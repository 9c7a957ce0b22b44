//! Eligibility rules shared by the bulk indexer and the watcher
//!
//! A path is indexed when its extension is tracked and no component of its
//! path relative to the source root is an excluded directory or starts with
//! a dot.

use crate::config::Config;
use std::path::{Component, Path};

/// Does any component of `relative` fall under the exclusion rules?
pub fn is_excluded_path(relative: &Path, config: &Config) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => config.is_excluded_component(&name.to_string_lossy()),
        _ => false,
    })
}

/// Extension tracked and path not excluded. Paths outside `root` never qualify.
pub fn is_indexable(path: &Path, root: &Path, config: &Config) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    if !config.is_tracked_extension(&ext.to_string_lossy()) {
        return false;
    }
    match path.strip_prefix(root) {
        Ok(relative) => !is_excluded_path(relative, config),
        Err(_) => false,
    }
}
