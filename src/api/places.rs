use crate::domain::SearchRequest;
use crate::error::{PlacesError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const USER_AGENT: &str = concat!("nearby-places/", env!("CARGO_PKG_VERSION"));

/// Raw nearby search response
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A single result element from the nearby search.
///
/// Only the fields promoted into a place record are typed; everything else
/// lands in `extra` untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// One page of a nearby search. Implemented by the HTTP client and by test stubs.
pub trait PlacesApi {
    fn nearby_search(
        &self,
        request: &SearchRequest,
        page_token: Option<&str>,
    ) -> Result<PlacesResponse>;
}

/// Blocking client for the places nearby search endpoint
pub struct PlacesClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl PlacesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PlacesError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/nearbysearch/json", self.base_url)
    }
}

impl PlacesApi for PlacesClient {
    fn nearby_search(
        &self,
        request: &SearchRequest,
        page_token: Option<&str>,
    ) -> Result<PlacesResponse> {
        let mut params = request.query_params();
        if let Some(token) = page_token {
            params.push(("pagetoken", token.to_string()));
        }

        log::debug!(
            "Nearby search: center=({}, {}), radius={}m, type={:?}, page_token={}",
            request.center.0,
            request.center.1,
            request.radius_meters,
            request.place_type,
            page_token.is_some()
        );

        // The query string carries the API key, so the URL is stripped from transport errors.
        let response = self
            .client
            .get(self.endpoint())
            .query(&params)
            .send()
            .map_err(|e| {
                PlacesError::upstream("REQUEST_FAILED", e.without_url().to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            log::error!("Places API HTTP error {}: {}", status, body);
            return Err(PlacesError::upstream(
                format!("HTTP {}", status.as_u16()),
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            ));
        }

        let api_response: PlacesResponse = response.json().map_err(|e| {
            PlacesError::upstream(
                "INVALID_RESPONSE",
                format!("failed to parse response: {}", e.without_url()),
            )
        })?;

        check_status(api_response)
    }
}

/// Pass through `OK` and `ZERO_RESULTS`; every other status becomes an error.
pub fn check_status(response: PlacesResponse) -> Result<PlacesResponse> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {
            log::info!("Nearby search returned {} results", response.results.len());
            Ok(response)
        }
        other => {
            let message = response
                .error_message
                .clone()
                .unwrap_or_else(|| format!("request failed with status {}", other));
            log::error!("Places API returned {}: {}", other, message);
            Err(PlacesError::upstream(other, message))
        }
    }
}
