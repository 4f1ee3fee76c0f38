pub mod places;

pub use places::{PlaceResult, PlacesApi, PlacesClient, PlacesResponse};
