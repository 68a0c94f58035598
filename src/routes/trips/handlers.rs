use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::EntityTrait;

use crate::common::{AppState, RequestUrl};
use crate::entity::trips;
use crate::error::{AppError, AppResult};
use crate::query::{Page, Projection, QueryParams, Record};
use crate::records::{TripRecord, to_record};
use crate::routes::listing::{ListParams, ListRequest, SummaryParams, parse_id, summarize};
use crate::services::{fetch_page, trip_records};

use super::types::TripFilters;

/// List trips
///
/// Each trip embeds its start and stop stations; a station that was never
/// imported serializes as null.
#[utoipa::path(
    get,
    path = "/api/trips",
    params(ListParams, TripFilters),
    responses(
        (status = 200, description = "Page of trips", body = Page),
        (status = 400, description = "Malformed filter value"),
        (status = 404, description = "Invalid page"),
    ),
    tag = "trips"
)]
pub async fn list_trips(
    State(state): State<AppState>,
    url: RequestUrl,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Page>> {
    let request = ListRequest::parse::<trips::Entity>(&params)?;
    let page_size = state.config.page_size;

    let (models, count) = fetch_page::<trips::Entity>(
        &state.db,
        &request.predicate,
        &request.ordering,
        request.page,
        page_size,
    )
    .await?;
    let records = trip_records(&state.db, models).await?;

    Ok(Json(request.into_page(&url, &records, count, page_size)?))
}

/// Get a trip by id
#[utoipa::path(
    get,
    path = "/api/trips/{trip_id}",
    params(
        ("trip_id" = i32, Path, description = "Trip id"),
        ("fields" = Option<String>, Query, description = "Comma-separated fields to return"),
        ("fields_exclude" = Option<String>, Query, description = "Comma-separated fields to leave out"),
    ),
    responses(
        (status = 200, description = "Trip retrieved successfully", body = TripRecord),
        (status = 404, description = "Trip not found"),
    ),
    tag = "trips"
)]
pub async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Record>> {
    let projection = Projection::from_params(&params);
    let not_found = || AppError::NotFound(format!("Trip '{trip_id}' not found"));

    let id = parse_id(&trip_id, "trip")?;
    let trip = trips::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(not_found)?;

    let record = trip_records(&state.db, vec![trip])
        .await?
        .pop()
        .ok_or_else(not_found)?;

    Ok(Json(projection.apply(to_record(&record)?)))
}

/// Aggregate trips by an attribute
///
/// Filters apply before grouping. The whole grouped result is returned,
/// ordered by ascending group key.
#[utoipa::path(
    get,
    path = "/api/trips/summary",
    params(SummaryParams, TripFilters),
    responses(
        (status = 200, description = "Grouped aggregates, e.g. [{\"start_date\": \"2019-03-01\", \"sum_duration\": 8100, \"count\": 9}]"),
        (status = 400, description = "Missing or invalid group_by, agg or field"),
    ),
    tag = "trips"
)]
pub async fn trip_summary(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> AppResult<Json<Vec<Record>>> {
    Ok(Json(summarize::<trips::Entity>(&state.db, &params).await?))
}
