use crate::error::{PlacesError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List the `.json` files directly inside `dir`, sorted by path.
///
/// Subdirectories are not searched. The extension match ignores case.
pub fn discover_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PlacesError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PlacesError::io(dir, e))?.path();
        if path.is_file() && is_json(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
