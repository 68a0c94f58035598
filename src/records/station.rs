use serde::Serialize;
use utoipa::ToSchema;

use super::attr;
use crate::entity::stations;
use crate::query::{AttributeKind, AttributeSchema};

pub static STATION_SCHEMA: AttributeSchema = AttributeSchema {
    resource: "stations",
    primary_key: "station_id",
    attributes: &[
        attr("station_id", AttributeKind::Integer),
        attr("short_name", AttributeKind::Text),
        attr("name", AttributeKind::Text).searchable(),
        attr("latitude", AttributeKind::Float),
        attr("longitude", AttributeKind::Float),
        attr("region", AttributeKind::Integer),
        attr("capacity", AttributeKind::Integer),
        attr("electric_bike_surcharge_waiver", AttributeKind::Boolean),
        attr("eightd_has_key_dispenser", AttributeKind::Boolean),
        attr("has_kiosk", AttributeKind::Boolean),
    ],
};

/// A docking station as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StationRecord {
    pub station_id: i32,
    pub short_name: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Region name, null when the station has no known region
    pub region: Option<String>,
    pub capacity: i32,
    pub electric_bike_surcharge_waiver: bool,
    pub eightd_has_key_dispenser: bool,
    pub has_kiosk: bool,
    /// Rental method names, e.g. `KEY`, `CREDITCARD`
    pub rental_methods: Vec<String>,
}

impl StationRecord {
    #[must_use]
    pub fn new(station: stations::Model, region: Option<String>, rental_methods: Vec<String>) -> Self {
        Self {
            station_id: station.station_id,
            short_name: station.short_name,
            name: station.name,
            latitude: station.latitude,
            longitude: station.longitude,
            region,
            capacity: station.capacity,
            electric_bike_surcharge_waiver: station.electric_bike_surcharge_waiver,
            eightd_has_key_dispenser: station.eightd_has_key_dispenser,
            has_kiosk: station.has_kiosk,
            rental_methods,
        }
    }
}
