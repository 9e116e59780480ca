use std::path::Path;

use crate::error::{DetectError, Result};

/// Names of the entries in `dir`, skipping anything that starts with `.`.
///
/// No recursion and no particular order; files and directories are listed alike.
pub fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|source| DetectError::DirectoryNotFound {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    Ok(names)
}
