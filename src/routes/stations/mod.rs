mod handlers;
mod types;

pub use handlers::{get_station, list_stations, station_summary};
pub use types::StationFilters;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_station, __path_list_stations, __path_station_summary};
