use crate::api::{PlaceResult, PlacesResponse};
use crate::domain::PlaceRecord;
use serde_json::Value;

/// Convert one page of search results into place records
///
/// # Algorithm
/// 1. Skip results with no `place_id` or no `geometry.location`
/// 2. Promote name, address, coordinates and rating to typed fields
///    - address is `vicinity`, falling back to `formatted_address`
///    - a rating outside 0-5 is dropped
/// 3. Keep every other upstream field in `raw`, in upstream order
pub fn parse_places(response: &PlacesResponse) -> Vec<PlaceRecord> {
    response.results.iter().filter_map(parse_place).collect()
}

pub fn parse_place(result: &PlaceResult) -> Option<PlaceRecord> {
    let place_id = match result.place_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            log::warn!(
                "Skipping result without place_id: {}",
                result.name.as_deref().unwrap_or("<unnamed>")
            );
            return None;
        }
    };

    let Some((geometry, location)) = result
        .geometry
        .as_ref()
        .and_then(|g| g.location.map(|location| (g, location)))
    else {
        log::warn!("Skipping {} ({}): no location", place_id, display_name(result));
        return None;
    };

    let mut place = PlaceRecord::new(
        place_id,
        result.name.clone().unwrap_or_default(),
        (location.lat, location.lng),
    );

    if let Some(address) = result
        .vicinity
        .as_ref()
        .or(result.formatted_address.as_ref())
    {
        place.address = Some(address.clone());
    }

    // Whichever address field was not promoted stays in raw.
    if place.address.as_ref() != result.formatted_address.as_ref()
        && let Some(ref formatted) = result.formatted_address
    {
        place
            .raw
            .insert("formatted_address".to_string(), Value::String(formatted.clone()));
    }

    match result.rating {
        Some(r) if (0.0..=5.0).contains(&r) => place.rating = Some(r),
        Some(r) => log::warn!("Dropping out-of-range rating {} for {}", r, place.place_id),
        None => {}
    }

    for (key, value) in &result.extra {
        place.raw.insert(key.clone(), value.clone());
    }
    if !geometry.extra.is_empty() {
        place
            .raw
            .insert("geometry".to_string(), Value::Object(geometry.extra.clone()));
    }

    Some(place)
}

fn display_name(result: &PlaceResult) -> &str {
    result.name.as_deref().unwrap_or("<unnamed>")
}
