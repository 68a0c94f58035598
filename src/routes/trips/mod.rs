mod handlers;
mod types;

pub use handlers::{get_trip, list_trips, trip_summary};
pub use types::TripFilters;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_trip, __path_list_trips, __path_trip_summary};
