use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait, sea_query::OnConflict,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use crate::entity::{regions, rental_methods, station_rental_methods, stations, trips};
use crate::error::{AppError, AppResult};
use crate::import::GbfsClient;
use crate::import::models::{FeedId, GbfsRegion, GbfsStation};
use crate::import::trips::{ParsedTrips, parse_trips_file};

/// Batch size for bulk inserts
const BATCH_SIZE: usize = 1000;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StationImportSummary {
    pub regions: usize,
    pub rental_methods: usize,
    pub stations: usize,
    /// Stations dropped because their id is not an integer
    pub skipped: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TripImportSummary {
    pub inserted: usize,
    pub skipped_rows: usize,
    /// Trips whose start or stop station is not in the stations table
    pub unresolved_stations: usize,
}

/// `ON CONFLICT DO NOTHING` reports a batch of duplicates as an error.
fn ignore_unchanged(result: Result<(), DbErr>) -> Result<(), DbErr> {
    match result {
        Err(DbErr::RecordNotInserted) => Ok(()),
        other => other,
    }
}

/// Import regions and stations from the GBFS feeds.
///
/// # Errors
///
/// Returns an error if either feed cannot be fetched or a write fails.
pub async fn import_stations(
    db: &DatabaseConnection,
    client: &GbfsClient,
) -> AppResult<StationImportSummary> {
    tracing::info!("Importing stations from GBFS...");

    let feed_regions = client.regions().await?;
    let feed_stations = client.stations().await?;

    upsert_stations(db, &feed_regions, &feed_stations).await
}

/// Write feed regions and stations.
///
/// Regions and stations are upserted by id; a station listed twice keeps its
/// last entry. Each imported station's rental methods replace its previous
/// ones. Everything is written in one transaction.
///
/// # Errors
///
/// Returns an error if a write fails.
pub async fn upsert_stations(
    db: &DatabaseConnection,
    feed_regions: &[GbfsRegion],
    feed_stations: &[GbfsStation],
) -> AppResult<StationImportSummary> {
    let mut summary = StationImportSummary::default();

    let region_models: Vec<regions::ActiveModel> = feed_regions
        .iter()
        .filter_map(|r| Some((r.region_id.as_i32()?, r)))
        .collect::<BTreeMap<i32, &GbfsRegion>>()
        .into_iter()
        .map(|(region_id, r)| regions::ActiveModel {
            region_id: Set(region_id),
            name: Set(r.name.clone()),
        })
        .collect();
    summary.regions = region_models.len();

    let mut by_id: BTreeMap<i32, &GbfsStation> = BTreeMap::new();
    for station in feed_stations {
        match station.station_id.as_i32() {
            Some(station_id) => {
                by_id.insert(station_id, station);
            }
            None => {
                summary.skipped += 1;
                tracing::warn!(station_id = ?station.station_id, "Skipping station with non-integer id");
            }
        }
    }

    let method_names: BTreeSet<String> = by_id
        .values()
        .flat_map(|s| s.rental_methods.iter().cloned())
        .collect();
    summary.rental_methods = method_names.len();

    let mut station_models: Vec<stations::ActiveModel> = Vec::with_capacity(by_id.len());
    let mut station_methods: Vec<(i32, &[String])> = Vec::with_capacity(by_id.len());
    for (&station_id, station) in &by_id {
        station_models.push(stations::ActiveModel {
            station_id: Set(station_id),
            short_name: Set(station.short_name.clone().unwrap_or_default()),
            name: Set(station.name.clone()),
            latitude: Set(station.lat),
            longitude: Set(station.lon),
            region_id: Set(station.region_id.as_ref().and_then(FeedId::as_i32)),
            capacity: Set(station.capacity),
            electric_bike_surcharge_waiver: Set(station.electric_bike_surcharge_waiver),
            eightd_has_key_dispenser: Set(station.eightd_has_key_dispenser),
            has_kiosk: Set(station.has_kiosk),
        });
        station_methods.push((station_id, station.rental_methods.as_slice()));
    }
    summary.stations = station_models.len();

    let txn = db.begin().await?;

    if !region_models.is_empty() {
        regions::Entity::insert_many(region_models)
            .on_conflict(
                OnConflict::column(regions::Column::RegionId)
                    .update_column(regions::Column::Name)
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    if !method_names.is_empty() {
        let models = method_names.iter().map(|method| rental_methods::ActiveModel {
            method: Set(method.clone()),
            ..Default::default()
        });
        ignore_unchanged(
            rental_methods::Entity::insert_many(models)
                .on_conflict(
                    OnConflict::column(rental_methods::Column::Method)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map(|_| ()),
        )?;
    }

    let method_ids: HashMap<String, i32> = rental_methods::Entity::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|m| (m.method, m.id))
        .collect();

    for chunk in station_models.chunks(BATCH_SIZE) {
        stations::Entity::insert_many(chunk.to_vec())
            .on_conflict(
                OnConflict::column(stations::Column::StationId)
                    .update_columns([
                        stations::Column::ShortName,
                        stations::Column::Name,
                        stations::Column::Latitude,
                        stations::Column::Longitude,
                        stations::Column::RegionId,
                        stations::Column::Capacity,
                        stations::Column::ElectricBikeSurchargeWaiver,
                        stations::Column::EightdHasKeyDispenser,
                        stations::Column::HasKiosk,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    let station_ids: Vec<i32> = station_methods.iter().map(|(id, _)| *id).collect();
    for chunk in station_ids.chunks(BATCH_SIZE) {
        station_rental_methods::Entity::delete_many()
            .filter(station_rental_methods::Column::StationId.is_in(chunk.to_vec()))
            .exec(&txn)
            .await?;
    }

    let links: Vec<station_rental_methods::ActiveModel> = station_methods
        .iter()
        .flat_map(|(station_id, methods)| {
            let unique: BTreeSet<&String> = methods.iter().collect();
            unique
                .into_iter()
                .filter_map(|method| method_ids.get(method))
                .map(|method_id| station_rental_methods::ActiveModel {
                    station_id: Set(*station_id),
                    rental_method_id: Set(*method_id),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    for chunk in links.chunks(BATCH_SIZE) {
        station_rental_methods::Entity::insert_many(chunk.to_vec())
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    tracing::info!(
        regions = summary.regions,
        rental_methods = summary.rental_methods,
        stations = summary.stations,
        skipped = summary.skipped,
        "Station import completed"
    );

    Ok(summary)
}

/// Import trips from a trip-history CSV file.
///
/// Trips keep their raw station ids even when no such station exists; those
/// are counted as unresolved.
///
/// # Errors
///
/// Returns an error if the file cannot be read or an insert fails.
pub async fn import_trips_csv(
    db: &DatabaseConnection,
    path: PathBuf,
) -> AppResult<TripImportSummary> {
    tracing::info!(path = %path.display(), "Importing trips from CSV...");

    let ParsedTrips { trips: parsed, skipped } =
        tokio::task::spawn_blocking(move || parse_trips_file(&path))
            .await
            .map_err(|e| AppError::Internal(format!("CSV parser task failed: {e}")))??;

    insert_trips(db, parsed, skipped).await
}

/// Insert parsed trips in batches, deriving their date columns.
///
/// # Errors
///
/// Returns an error if a batch insert fails.
pub async fn insert_trips(
    db: &DatabaseConnection,
    parsed: Vec<trips::NewTrip>,
    skipped_rows: usize,
) -> AppResult<TripImportSummary> {
    let known_stations: HashSet<i32> = stations::Entity::find()
        .select_only()
        .column(stations::Column::StationId)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let unresolved_stations = parsed
        .iter()
        .filter(|t| {
            !known_stations.contains(&t.start_station_id)
                || !known_stations.contains(&t.stop_station_id)
        })
        .count();

    let inserted = parsed.len();
    for chunk in parsed.chunks(BATCH_SIZE) {
        let models = chunk.iter().cloned().map(trips::ActiveModel::from);
        trips::Entity::insert_many(models)
            .exec_without_returning(db)
            .await?;
        tracing::debug!(batch_size = chunk.len(), "Inserted trip batch");
    }

    let summary = TripImportSummary {
        inserted,
        skipped_rows,
        unresolved_stations,
    };

    tracing::info!(
        inserted = summary.inserted,
        skipped_rows = summary.skipped_rows,
        unresolved_stations = summary.unresolved_stations,
        "Trip import completed"
    );

    Ok(summary)
}
