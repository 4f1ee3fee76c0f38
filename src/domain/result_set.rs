//! Result set files: the on-disk contract between collector and exporter.
//!
//! A file holds one ResultSet, written as a pretty-printed JSON array of
//! place records. Readers also accept an object whose first array-valued
//! field holds the records.

use super::PlaceRecord;
use crate::error::{PlacesError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Ordered places produced by one collector run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    pub places: Vec<PlaceRecord>,
}

impl ResultSet {
    pub fn new(places: Vec<PlaceRecord>) -> Self {
        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaceRecord> {
        self.places.iter()
    }

    /// Parse a result set document. `origin` only labels errors.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        Self::from_slice(text.as_bytes(), origin)
    }

    /// Parse raw file bytes. Bytes that are not UTF-8 JSON are a schema error.
    pub fn from_slice(bytes: &[u8], origin: &Path) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| PlacesError::schema(origin, format!("not valid JSON: {}", e)))?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(map) => map
                .into_iter()
                .find_map(|(_, v)| match v {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| {
                    PlacesError::schema(origin, "object does not wrap an array of places")
                })?,
            other => {
                return Err(PlacesError::schema(
                    origin,
                    format!("expected an array of places, found {}", json_kind(&other)),
                ));
            }
        };

        let mut places = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let place: PlaceRecord = serde_json::from_value(item).map_err(|e| {
                PlacesError::schema(origin, format!("place #{}: {}", index + 1, e))
            })?;
            if place.place_id.trim().is_empty() {
                return Err(PlacesError::schema(
                    origin,
                    format!("place #{}: empty place_id", index + 1),
                ));
            }
            places.push(place);
        }

        Ok(Self { places })
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| PlacesError::io(path, e))?;
        Self::from_slice(&bytes, path)
    }

    /// Write the set to `path`, replacing any existing file.
    ///
    /// The document goes to a sibling temp file first and is renamed into
    /// place, so a failed write never leaves a truncated file at `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| PlacesError::io(path, e.into()))?;
        write_atomically(path, &json)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a PlaceRecord;
    type IntoIter = std::slice::Iter<'a, PlaceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.iter()
    }
}

pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PlacesError::config(format!("{} is not a file path", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PlacesError::io(&tmp_path, e));
    }
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        PlacesError::io(path, e)
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
