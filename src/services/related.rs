//! Batch loading of related rows for serialized records.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entity::{regions, rental_methods, station_rental_methods, stations, trips};
use crate::error::AppResult;
use crate::records::{StationRecord, TripRecord};

async fn region_names(
    db: &DatabaseConnection,
    region_ids: Vec<i32>,
) -> AppResult<HashMap<i32, String>> {
    if region_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let regions = regions::Entity::find()
        .filter(regions::Column::RegionId.is_in(region_ids))
        .all(db)
        .await?;

    Ok(regions.into_iter().map(|r| (r.region_id, r.name)).collect())
}

async fn rental_method_names(
    db: &DatabaseConnection,
    station_ids: Vec<i32>,
) -> AppResult<HashMap<i32, Vec<String>>> {
    if station_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = station_rental_methods::Entity::find()
        .filter(station_rental_methods::Column::StationId.is_in(station_ids))
        .find_also_related(rental_methods::Entity)
        .all(db)
        .await?;

    let mut by_station: HashMap<i32, Vec<String>> = HashMap::new();
    for (link, method) in links {
        if let Some(method) = method {
            by_station.entry(link.station_id).or_default().push(method.method);
        }
    }
    for methods in by_station.values_mut() {
        methods.sort();
    }

    Ok(by_station)
}

/// Station records in input order, with region names and rental methods.
pub async fn station_records(
    db: &DatabaseConnection,
    stations: Vec<stations::Model>,
) -> AppResult<Vec<StationRecord>> {
    let region_ids: BTreeSet<i32> = stations.iter().filter_map(|s| s.region_id).collect();
    let station_ids: Vec<i32> = stations.iter().map(|s| s.station_id).collect();

    let regions = region_names(db, region_ids.into_iter().collect()).await?;
    let mut methods = rental_method_names(db, station_ids).await?;

    Ok(stations
        .into_iter()
        .map(|station| {
            let region = station
                .region_id
                .and_then(|id| regions.get(&id).cloned());
            let rental_methods = methods.remove(&station.station_id).unwrap_or_default();
            StationRecord::new(station, region, rental_methods)
        })
        .collect())
}

/// Trip records in input order with both stations embedded.
///
/// A station id with no matching station row serializes as `null`.
pub async fn trip_records(
    db: &DatabaseConnection,
    trips: Vec<trips::Model>,
) -> AppResult<Vec<TripRecord>> {
    let station_ids: BTreeSet<i32> = trips
        .iter()
        .flat_map(|t| [t.start_station_id, t.stop_station_id])
        .collect();

    let stations = if station_ids.is_empty() {
        Vec::new()
    } else {
        stations::Entity::find()
            .filter(stations::Column::StationId.is_in(station_ids))
            .all(db)
            .await?
    };

    let by_id: HashMap<i32, StationRecord> = station_records(db, stations)
        .await?
        .into_iter()
        .map(|station| (station.station_id, station))
        .collect();

    Ok(trips
        .into_iter()
        .map(|trip| {
            let start = by_id.get(&trip.start_station_id).cloned();
            let stop = by_id.get(&trip.stop_station_id).cloned();
            TripRecord::new(trip, start, stop)
        })
        .collect())
}
