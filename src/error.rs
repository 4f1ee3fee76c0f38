use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the collector and exporter.
///
/// Every variant is fatal to the current invocation; nothing here is retried.
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Places API error ({status}): {message}")]
    Upstream { status: String, message: String },

    #[error("No JSON files found in {}", .0.display())]
    NoInput(PathBuf),

    #[error("Invalid result set in {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

impl PlacesError {
    pub fn config(message: impl Into<String>) -> Self {
        PlacesError::Config(message.into())
    }

    pub fn upstream(status: impl Into<String>, message: impl Into<String>) -> Self {
        PlacesError::Upstream {
            status: status.into(),
            message: message.into(),
        }
    }

    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PlacesError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlacesError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for PlacesError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        PlacesError::Spreadsheet(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlacesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = PlacesError::schema("data/a.json", "expected an array");
        assert_eq!(
            err.to_string(),
            "Invalid result set in data/a.json: expected an array"
        );

        let err = PlacesError::NoInput(PathBuf::from("empty"));
        assert_eq!(err.to_string(), "No JSON files found in empty");
    }

    #[test]
    fn test_upstream_message() {
        let err = PlacesError::upstream("REQUEST_DENIED", "The provided API key is invalid.");
        assert_eq!(
            err.to_string(),
            "Places API error (REQUEST_DENIED): The provided API key is invalid."
        );
    }
}
