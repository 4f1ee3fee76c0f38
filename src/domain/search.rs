use crate::error::{PlacesError, Result};
use std::fmt;

/// Upper bound the places API documents for a nearby search radius.
pub const MAX_RADIUS_METERS: f64 = 50_000.0;

/// A places API key, read once at startup.
///
/// `Debug` and `Display` never print the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, trimming surrounding whitespace. Empty keys are rejected.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(PlacesError::config("API key is empty"));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

/// Parameters for one nearby search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// (lat, lon) center point in WGS84
    pub center: (f64, f64),
    pub radius_meters: f64,
    /// Upstream place type filter (e.g. "restaurant"), passed through unmodified
    pub place_type: Option<String>,
    pub keyword: Option<String>,
    /// Price level filters, 0 (free) to 4 (very expensive)
    pub min_price: Option<u8>,
    pub max_price: Option<u8>,
    pub open_now: bool,
    pub api_key: ApiKey,
}

impl SearchRequest {
    /// Build and validate a request with no optional filters.
    pub fn new(center: (f64, f64), radius_meters: f64, api_key: ApiKey) -> Result<Self> {
        let request = Self {
            center,
            radius_meters,
            place_type: None,
            keyword: None,
            min_price: None,
            max_price: None,
            open_now: false,
            api_key,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn with_place_type(mut self, place_type: Option<String>) -> Self {
        self.place_type = place_type.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_price_range(mut self, min_price: Option<u8>, max_price: Option<u8>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_open_now(mut self, open_now: bool) -> Self {
        self.open_now = open_now;
        self
    }

    /// Check coordinate ranges, radius and price filters.
    pub fn validate(&self) -> Result<()> {
        let (lat, lon) = self.center;
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(PlacesError::config(format!(
                "latitude {} is outside [-90, 90]",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(PlacesError::config(format!(
                "longitude {} is outside [-180, 180]",
                lon
            )));
        }
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(PlacesError::config(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_meters
            )));
        }
        if self.radius_meters > MAX_RADIUS_METERS {
            log::warn!(
                "Radius {}m exceeds the {}m the places API accepts; expect an upstream error",
                self.radius_meters,
                MAX_RADIUS_METERS
            );
        }
        for (label, price) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(p) = price
                && p > 4
            {
                return Err(PlacesError::config(format!(
                    "{} must be between 0 and 4, got {}",
                    label, p
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(PlacesError::config(format!(
                "min_price {} is greater than max_price {}",
                min, max
            )));
        }
        Ok(())
    }

    /// Query parameters for the nearby search endpoint, excluding paging.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let (lat, lon) = self.center;
        let mut params = vec![
            ("location", format!("{},{}", lat, lon)),
            ("radius", self.radius_meters.to_string()),
            ("key", self.api_key.expose().to_string()),
        ];
        if let Some(ref t) = self.place_type {
            params.push(("type", t.clone()));
        }
        if let Some(ref k) = self.keyword {
            params.push(("keyword", k.clone()));
        }
        if let Some(p) = self.min_price {
            params.push(("minprice", p.to_string()));
        }
        if let Some(p) = self.max_price {
            params.push(("maxprice", p.to_string()));
        }
        if self.open_now {
            params.push(("opennow", "true".to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    #[test]
    fn test_api_key_is_trimmed_and_redacted() {
        let key = ApiKey::new("  secret-value\n").unwrap();
        assert_eq!(key.expose(), "secret-value");
        assert_eq!(format!("{:?}", key), "ApiKey(****)");
        assert!(!format!("{}", key).contains("secret"));
    }

    #[test]
    fn test_empty_api_key_is_config_error() {
        assert!(matches!(ApiKey::new("   "), Err(PlacesError::Config(_))));
    }

    #[test]
    fn test_valid_request() {
        let request = SearchRequest::new((40.7128, -74.0060), 1000.0, key()).unwrap();
        assert_eq!(request.center, (40.7128, -74.0060));
        assert!(request.place_type.is_none());
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert!(matches!(
            SearchRequest::new((91.0, 0.0), 1000.0, key()),
            Err(PlacesError::Config(_))
        ));
        assert!(matches!(
            SearchRequest::new((0.0, -180.5), 1000.0, key()),
            Err(PlacesError::Config(_))
        ));
        assert!(matches!(
            SearchRequest::new((f64::NAN, 0.0), 1000.0, key()),
            Err(PlacesError::Config(_))
        ));
    }

    #[test]
    fn test_radius_must_be_positive() {
        assert!(SearchRequest::new((0.0, 0.0), 0.0, key()).is_err());
        assert!(SearchRequest::new((0.0, 0.0), -5.0, key()).is_err());
        assert!(SearchRequest::new((0.0, 0.0), f64::INFINITY, key()).is_err());
        assert!(SearchRequest::new((0.0, 0.0), 0.5, key()).is_ok());
    }

    #[test]
    fn test_price_range_validation() {
        let request = SearchRequest::new((0.0, 0.0), 100.0, key())
            .unwrap()
            .with_price_range(Some(3), Some(1));
        assert!(matches!(request.validate(), Err(PlacesError::Config(_))));

        let request = SearchRequest::new((0.0, 0.0), 100.0, key())
            .unwrap()
            .with_price_range(None, Some(5));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_query_params() {
        let request = SearchRequest::new((47.5, -122.25), 807.72, key())
            .unwrap()
            .with_place_type(Some("restaurant".to_string()))
            .with_keyword(Some("".to_string()))
            .with_open_now(true);

        let params = request.query_params();
        assert!(params.contains(&("location", "47.5,-122.25".to_string())));
        assert!(params.contains(&("radius", "807.72".to_string())));
        assert!(params.contains(&("type", "restaurant".to_string())));
        assert!(params.contains(&("opennow", "true".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "keyword"));
    }
}
