use crate::domain::ApiKey;
use crate::error::{PlacesError, Result};
use std::path::Path;

/// Read the API key from a plain-text file.
///
/// Surrounding whitespace is ignored. A missing, unreadable or blank file is
/// a configuration error.
pub fn read_api_key(path: &Path) -> Result<ApiKey> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        PlacesError::config(format!("cannot read API key file {}: {}", path.display(), e))
    })?;

    ApiKey::new(contents)
        .map_err(|_| PlacesError::config(format!("API key file {} is empty", path.display())))
}
