pub mod place;
pub mod result_set;
pub mod search;

pub use place::PlaceRecord;
pub use result_set::ResultSet;
pub use search::{ApiKey, SearchRequest};
