use chrono::{DateTime, FixedOffset, NaiveDate};
use utoipa::IntoParams;

/// Trip attribute filters. Every attribute except `is_subscriber` also
/// accepts `_gt` / `_lt` suffixes (strict bounds).
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TripFilters {
    pub id: Option<i32>,
    /// Seconds
    pub duration: Option<i32>,
    pub duration_gt: Option<i32>,
    pub duration_lt: Option<i32>,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub start_time_gt: Option<DateTime<FixedOffset>>,
    pub start_time_lt: Option<DateTime<FixedOffset>>,
    pub stop_time: Option<DateTime<FixedOffset>>,
    pub start_date: Option<NaiveDate>,
    /// Trips starting after this date, excluding the date itself
    pub start_date_gt: Option<NaiveDate>,
    /// Trips starting before this date, excluding the date itself
    pub start_date_lt: Option<NaiveDate>,
    pub stop_date: Option<NaiveDate>,
    /// Start station id
    pub start_station: Option<i32>,
    /// Stop station id
    pub stop_station: Option<i32>,
    pub bike_id: Option<i32>,
    pub is_subscriber: Option<bool>,
    pub birth_year: Option<i32>,
    pub birth_year_gt: Option<i32>,
    pub birth_year_lt: Option<i32>,
    /// 0 = unknown, 1 = man, 2 = woman
    pub gender: Option<i32>,
}
