pub mod rate_limit;
pub mod related;
pub mod store;
pub mod summary;

pub use related::{station_records, trip_records};
pub use store::{Resource, apply_ordering, fetch_page, filter_condition};
pub use summary::run_summary;
