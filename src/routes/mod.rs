pub mod health;
pub mod listing;
pub mod stations;
pub mod trips;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    normalize_path::NormalizePath,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::query::Page;
use crate::records::{StationRecord, TripRecord};
use crate::services::rate_limit::ClientIpKeyExtractor;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        stations::list_stations,
        stations::get_station,
        stations::station_summary,
        trips::list_trips,
        trips::get_trip,
        trips::trip_summary,
    ),
    components(
        schemas(
            Page,
            StationRecord,
            TripRecord,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "stations", description = "Docking stations"),
        (name = "trips", description = "Trip history"),
    ),
    info(
        title = "Bikeshare API",
        description = "Bike-share stations and trip history with filtering, field selection and aggregation",
        version = "0.1.0"
    )
)]
struct ApiDoc;

fn rate_limited(
    routes: Router<AppState>,
    name: &'static str,
    per_second: u64,
    burst: u32,
) -> Router<AppState> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(per_second)
        .burst_size(burst)
        .finish();

    match config {
        Some(config) => routes.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            tracing::warn!(
                limiter = name,
                per_second,
                burst,
                "Rate limit settings rejected, limiter not applied"
            );
            routes
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            records_rate = %format!("{}/s burst {}", config.rate_limit_records_per_second, config.rate_limit_records_burst),
            summary_rate = %format!("{}/s burst {}", config.rate_limit_summary_per_second, config.rate_limit_summary_burst),
            "Rate limiting configured"
        );
    }

    let record_routes = Router::new()
        .route("/stations", get(stations::list_stations))
        .route("/stations/{station_id}", get(stations::get_station))
        .route("/trips", get(trips::list_trips))
        .route("/trips/{trip_id}", get(trips::get_trip));

    // Summaries scan whole tables, so they get their own tighter budget
    let summary_routes = Router::new()
        .route("/stations/summary", get(stations::station_summary))
        .route("/trips/summary", get(trips::trip_summary));

    let api_routes = if config.disable_rate_limiting {
        Router::new().merge(record_routes).merge(summary_routes)
    } else {
        Router::new()
            .merge(rate_limited(
                record_routes,
                "records",
                config.rate_limit_records_per_second,
                config.rate_limit_records_burst,
            ))
            .merge(rate_limited(
                summary_routes,
                "summary",
                config.rate_limit_summary_per_second,
                config.rate_limit_summary_burst,
            ))
    }
    .layer(RequestBodyLimitLayer::new(64 * 1024));

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The served application: `/api/stations/` and `/api/stations` route alike.
pub type App = NormalizePath<Router>;

/// Wrap the router so trailing slashes are trimmed before routing.
pub fn build_app(state: AppState) -> App {
    NormalizePath::trim_trailing_slash(build_router(state))
}
