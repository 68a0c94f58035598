use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Trip length in seconds
    pub duration: i32,
    pub start_time: DateTimeWithTimeZone,
    pub stop_time: DateTimeWithTimeZone,
    /// Always the date component of `start_time`; maintained on write
    pub start_date: Date,
    /// Always the date component of `stop_time`; maintained on write
    pub stop_date: Date,
    pub start_station_id: i32,
    pub stop_station_id: i32,
    pub bike_id: i32,
    pub is_subscriber: bool,
    pub birth_year: Option<i32>,
    /// 0 = unknown, 1 = man, 2 = woman
    pub gender: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stations::Entity",
        from = "Column::StartStationId",
        to = "super::stations::Column::StationId"
    )]
    StartStation,
    #[sea_orm(
        belongs_to = "super::stations::Entity",
        from = "Column::StopStationId",
        to = "super::stations::Column::StationId"
    )]
    StopStation,
}

/// The same instant with a `+00:00` offset.
#[must_use]
pub fn to_utc(time: &DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    time.with_timezone(&Utc).fixed_offset()
}

impl ActiveModel {
    /// Move written timestamps to UTC, then recompute `start_date`/`stop_date`
    /// as their UTC calendar dates.
    pub fn sync_dates(&mut self) {
        if let Set(time) = &self.start_time {
            self.start_time = Set(to_utc(time));
        }
        if let Set(time) = &self.stop_time {
            self.stop_time = Set(to_utc(time));
        }

        match &self.start_time {
            Set(time) | Unchanged(time) => self.start_date = Set(to_utc(time).date_naive()),
            NotSet => {}
        }
        match &self.stop_time {
            Set(time) | Unchanged(time) => self.stop_date = Set(to_utc(time).date_naive()),
            NotSet => {}
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.sync_dates();
        Ok(self)
    }
}

/// A trip as produced by the importer, before it has an id.
///
/// Conversion into an `ActiveModel` derives the date columns, so batch
/// inserts (which skip `before_save`) keep the same invariant as single saves.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub duration: i32,
    pub start_time: DateTimeWithTimeZone,
    pub stop_time: DateTimeWithTimeZone,
    pub start_station_id: i32,
    pub stop_station_id: i32,
    pub bike_id: i32,
    pub is_subscriber: bool,
    pub birth_year: Option<i32>,
    pub gender: i32,
}

impl From<NewTrip> for ActiveModel {
    fn from(trip: NewTrip) -> Self {
        let mut model = Self {
            id: NotSet,
            duration: Set(trip.duration),
            start_time: Set(trip.start_time),
            stop_time: Set(trip.stop_time),
            start_date: NotSet,
            stop_date: NotSet,
            start_station_id: Set(trip.start_station_id),
            stop_station_id: Set(trip.stop_station_id),
            bike_id: Set(trip.bike_id),
            is_subscriber: Set(trip.is_subscriber),
            birth_year: Set(trip.birth_year),
            gender: Set(trip.gender),
        };
        model.sync_dates();
        model
    }
}
