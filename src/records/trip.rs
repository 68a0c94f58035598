use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::StationRecord;
use super::attr;
use crate::entity::trips;
use crate::query::{AttributeKind, AttributeSchema};

pub static TRIP_SCHEMA: AttributeSchema = AttributeSchema {
    resource: "trips",
    primary_key: "id",
    attributes: &[
        attr("id", AttributeKind::Integer),
        attr("duration", AttributeKind::Integer),
        attr("start_time", AttributeKind::Timestamp),
        attr("stop_time", AttributeKind::Timestamp),
        attr("start_date", AttributeKind::Date),
        attr("stop_date", AttributeKind::Date),
        attr("start_station", AttributeKind::Integer),
        attr("stop_station", AttributeKind::Integer),
        attr("bike_id", AttributeKind::Integer),
        attr("is_subscriber", AttributeKind::Boolean),
        attr("birth_year", AttributeKind::Integer),
        attr("gender", AttributeKind::Integer),
    ],
};

/// A trip with both stations embedded.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TripRecord {
    pub id: i32,
    /// Seconds
    pub duration: i32,
    pub start_time: DateTime<FixedOffset>,
    pub stop_time: DateTime<FixedOffset>,
    pub start_date: NaiveDate,
    pub stop_date: NaiveDate,
    /// Null when the trip references a station that was never imported
    pub start_station: Option<StationRecord>,
    pub stop_station: Option<StationRecord>,
    pub bike_id: i32,
    pub is_subscriber: bool,
    pub birth_year: Option<i32>,
    /// 0 = unknown, 1 = man, 2 = woman
    pub gender: i32,
}

impl TripRecord {
    #[must_use]
    pub fn new(
        trip: trips::Model,
        start_station: Option<StationRecord>,
        stop_station: Option<StationRecord>,
    ) -> Self {
        Self {
            id: trip.id,
            duration: trip.duration,
            start_time: trip.start_time,
            stop_time: trip.stop_time,
            start_date: trip.start_date,
            stop_date: trip.stop_date,
            start_station,
            stop_station,
            bike_id: trip.bike_id,
            is_subscriber: trip.is_subscriber,
            birth_year: trip.birth_year,
            gender: trip.gender,
        }
    }
}
