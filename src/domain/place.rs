use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One point of interest as persisted in a result set file.
///
/// `raw` holds every upstream field that is not promoted to a typed field,
/// in the order the upstream returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub place_id: String,
    #[serde(default)]
    pub raw: Map<String, Value>,
}

impl PlaceRecord {
    pub fn new(place_id: impl Into<String>, name: impl Into<String>, location: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            address: None,
            latitude: location.0,
            longitude: location.1,
            rating: None,
            place_id: place_id.into(),
            raw: Map::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_raw(mut self, key: impl Into<String>, value: Value) -> Self {
        self.raw.insert(key.into(), value);
        self
    }

    /// Upstream place types, if the raw bag carries them
    pub fn types(&self) -> Vec<&str> {
        self.raw
            .get("types")
            .and_then(Value::as_array)
            .map(|types| types.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn user_ratings_total(&self) -> u64 {
        self.raw
            .get("user_ratings_total")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    pub fn open_now(&self) -> Option<bool> {
        self.raw
            .get("opening_hours")
            .and_then(|h| h.get("open_now"))
            .and_then(Value::as_bool)
    }
}
