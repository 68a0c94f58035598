use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::EntityTrait;

use crate::common::{AppState, RequestUrl};
use crate::entity::stations;
use crate::error::{AppError, AppResult};
use crate::query::{Page, Projection, QueryParams, Record};
use crate::records::{StationRecord, to_record};
use crate::routes::listing::{ListParams, ListRequest, SummaryParams, parse_id, summarize};
use crate::services::{fetch_page, station_records};

use super::types::StationFilters;

/// List stations
#[utoipa::path(
    get,
    path = "/api/stations",
    params(ListParams, StationFilters),
    responses(
        (status = 200, description = "Page of stations", body = Page),
        (status = 400, description = "Malformed filter value"),
        (status = 404, description = "Invalid page"),
    ),
    tag = "stations"
)]
pub async fn list_stations(
    State(state): State<AppState>,
    url: RequestUrl,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Page>> {
    let request = ListRequest::parse::<stations::Entity>(&params)?;
    let page_size = state.config.page_size;

    let (models, count) = fetch_page::<stations::Entity>(
        &state.db,
        &request.predicate,
        &request.ordering,
        request.page,
        page_size,
    )
    .await?;
    let records = station_records(&state.db, models).await?;

    Ok(Json(request.into_page(&url, &records, count, page_size)?))
}

/// Get a station by id
#[utoipa::path(
    get,
    path = "/api/stations/{station_id}",
    params(
        ("station_id" = i32, Path, description = "Station id"),
        ("fields" = Option<String>, Query, description = "Comma-separated fields to return"),
        ("fields_exclude" = Option<String>, Query, description = "Comma-separated fields to leave out"),
    ),
    responses(
        (status = 200, description = "Station retrieved successfully", body = StationRecord),
        (status = 404, description = "Station not found"),
    ),
    tag = "stations"
)]
pub async fn get_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Record>> {
    let projection = Projection::from_params(&params);
    let not_found = || AppError::NotFound(format!("Station '{station_id}' not found"));

    let id = parse_id(&station_id, "station")?;
    let station = stations::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(not_found)?;

    let record = station_records(&state.db, vec![station])
        .await?
        .pop()
        .ok_or_else(not_found)?;

    Ok(Json(projection.apply(to_record(&record)?)))
}

/// Aggregate stations by an attribute
#[utoipa::path(
    get,
    path = "/api/stations/summary",
    params(SummaryParams, StationFilters),
    responses(
        (status = 200, description = "Grouped aggregates in ascending group order, e.g. [{\"region\": 71, \"sum_capacity\": 2300}]"),
        (status = 400, description = "Missing or invalid group_by, agg or field"),
    ),
    tag = "stations"
)]
pub async fn station_summary(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Vec<Record>>> {
    Ok(Json(summarize::<stations::Entity>(&state.db, &params).await?))
}
