//! End-to-end tests for the HTTP API over an in-memory SQLite database.
//!
//! Run with: cargo test --test api_test

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

use bikeshare_api::common::AppState;
use bikeshare_api::config::Config;
use bikeshare_api::entity::{regions, rental_methods, station_rental_methods, stations, trips};
use bikeshare_api::routes::{self, App};

/// Trips per start date, March 2019: 21 trips over 5 dates.
const TRIPS_PER_DAY: [(u32, u32); 5] = [(1, 9), (2, 2), (3, 6), (4, 1), (5, 3)];
const TRIP_DURATION: i32 = 300;
const UNKNOWN_STATION: i32 = 999;

async fn connect() -> DatabaseConnection {
    // A single connection keeps the in-memory database alive and shared
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn seed_stations(db: &DatabaseConnection) {
    for (region_id, name) in [(10, "Boston"), (11, "Cambridge")] {
        regions::ActiveModel {
            region_id: Set(region_id),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await
        .unwrap();
    }

    let key = rental_methods::ActiveModel {
        method: Set("KEY".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    let card = rental_methods::ActiveModel {
        method: Set("CREDITCARD".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let rows = [
        (1, "A32000", "Central Sq", Some(10), 19, true),
        (2, "M32001", "Kendall T", Some(11), 18, false),
        (3, "M32002", "Harvard Square", Some(11), 25, true),
        (4, "X00004", "Lab_1 Depot", None, 11, false),
    ];
    for (station_id, short_name, name, region_id, capacity, has_kiosk) in rows {
        stations::ActiveModel {
            station_id: Set(station_id),
            short_name: Set(short_name.to_string()),
            name: Set(name.to_string()),
            latitude: Set(42.36),
            longitude: Set(-71.1),
            region_id: Set(region_id),
            capacity: Set(capacity),
            electric_bike_surcharge_waiver: Set(false),
            eightd_has_key_dispenser: Set(false),
            has_kiosk: Set(has_kiosk),
        }
        .insert(db)
        .await
        .unwrap();
    }

    for method_id in [key.id, card.id] {
        station_rental_methods::ActiveModel {
            station_id: Set(1),
            rental_method_id: Set(method_id),
        }
        .insert(db)
        .await
        .unwrap();
    }
}

async fn seed_trips(db: &DatabaseConnection) {
    let mut n = 0;
    for (day, count) in TRIPS_PER_DAY {
        for i in 0..count {
            let start = Utc
                .with_ymd_and_hms(2019, 3, day, 8, i, 0)
                .unwrap()
                .fixed_offset();
            let start_station_id = if n == 20 { UNKNOWN_STATION } else { [1, 2, 3][n % 3] };
            trips::ActiveModel::from(trips::NewTrip {
                duration: TRIP_DURATION,
                start_time: start,
                stop_time: start + chrono::Duration::seconds(i64::from(TRIP_DURATION)),
                start_station_id,
                stop_station_id: 2,
                bike_id: 1000 + i32::try_from(n).unwrap(),
                is_subscriber: n % 2 == 0,
                birth_year: if n % 4 == 0 { None } else { Some(1990) },
                gender: i32::try_from(n % 3).unwrap(),
            })
            .insert(db)
            .await
            .unwrap();
            n += 1;
        }
    }
}

async fn app() -> App {
    let db = connect().await;
    seed_stations(&db).await;
    seed_trips(&db).await;

    let mut config = Config::with_database_url("sqlite::memory:");
    config.disable_rate_limiting = true;
    routes::build_app(AppState::new(db, config))
}

async fn get(app: &App, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("host", "testserver")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn field<'a>(results: &'a Value, key: &str) -> Vec<&'a Value> {
    results
        .as_array()
        .unwrap()
        .iter()
        .map(|record| &record[key])
        .collect()
}

#[tokio::test]
async fn health_check_pings_database() {
    let app = app().await;
    let (status, _) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

// ========== SUMMARY ==========

#[tokio::test]
async fn summary_counts_trips_per_start_date() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips/summary?group_by=start_date&agg=count").await;

    assert_eq!(status, StatusCode::OK);
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 5);

    let total: i64 = groups.iter().map(|g| g["count"].as_i64().unwrap()).sum();
    assert_eq!(total, 21);
}

#[tokio::test]
async fn summary_merges_several_aggregations_in_date_order() {
    let app = app().await;
    let (status, body) = get(
        &app,
        "/api/trips/summary?group_by=start_date&agg=sum,count&field=duration",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let expected: Vec<Value> = TRIPS_PER_DAY
        .iter()
        .map(|(day, count)| {
            json!({
                "start_date": format!("2019-03-{day:02}"),
                "sum_duration": i64::from(*count) * i64::from(TRIP_DURATION),
                "count": count,
            })
        })
        .collect();
    assert_eq!(body, Value::Array(expected));
}

#[tokio::test]
async fn summary_defaults_to_count() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips/summary?group_by=start_date").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0], json!({"start_date": "2019-03-01", "count": 9}));
}

#[tokio::test]
async fn summary_filters_before_grouping() {
    let app = app().await;
    let (status, body) = get(
        &app,
        "/api/trips/summary?group_by=start_date&start_date_gt=2019-03-02",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        field(&body, "start_date"),
        vec!["2019-03-03", "2019-03-04", "2019-03-05"]
    );
    assert_eq!(field(&body, "count"), vec![6, 1, 3]);
}

#[tokio::test]
async fn summary_reports_min_max_and_avg() {
    let app = app().await;
    let (status, body) = get(
        &app,
        "/api/trips/summary?group_by=start_date&agg=min,max,avg&field=duration&start_date=2019-03-04",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "start_date": "2019-03-04",
            "min_duration": 300,
            "max_duration": 300,
            "avg_duration": 300.0,
        }])
    );
}

#[tokio::test]
async fn summary_without_field_is_a_client_error() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips/summary?group_by=start_date&agg=max").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameter: field");
}

#[tokio::test]
async fn summary_without_group_by_is_a_client_error() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips/summary?agg=count").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameter: group_by");
}

#[tokio::test]
async fn summary_rejects_unknown_function() {
    let app = app().await;
    let (status, body) = get(
        &app,
        "/api/trips/summary?group_by=start_date&agg=median&field=duration",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("median"));
}

#[tokio::test]
async fn station_summary_sums_capacity_by_region() {
    let app = app().await;
    let (status, body) = get(
        &app,
        "/api/stations/summary?group_by=region&agg=sum,count&field=capacity&region_gt=0",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"region": 10, "sum_capacity": 19, "count": 1},
            {"region": 11, "sum_capacity": 43, "count": 2},
        ])
    );
}

#[tokio::test]
async fn summary_timestamp_keys_match_record_timestamps() {
    let app = app().await;
    let (status, body) = get(
        &app,
        "/api/trips/summary?group_by=start_time&start_date=2019-03-04",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"start_time": "2019-03-04T08:00:00Z", "count": 1}]));

    let (_, trip) = get(&app, "/api/trips/18?fields=start_time").await;
    assert_eq!(trip["start_time"], body[0]["start_time"]);
}

// ========== LISTS AND PAGINATION ==========

#[tokio::test]
async fn second_page_links_back_to_unparameterized_first_page() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips?page=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 21);
    assert_eq!(body["results"].as_array().unwrap().len(), 10);
    assert_eq!(body["previous"], "http://testserver/api/trips");
    assert_eq!(body["next"], "http://testserver/api/trips?page=3");
    assert_eq!(body["results"][0]["id"], 11);
}

#[tokio::test]
async fn last_page_has_remaining_records_and_no_next() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips?page=3&fields=id").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([{"id": 21}]));
    assert!(body["next"].is_null());
    assert_eq!(body["previous"], "http://testserver/api/trips?fields=id&page=2");
}

#[tokio::test]
async fn out_of_range_page_is_not_found() {
    let app = app().await;

    let (status, body) = get(&app, "/api/trips?page=4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid page.");

    let (status, _) = get(&app, "/api/trips?page=zero").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forwarded_headers_shape_page_links() {
    let app = app().await;
    let request = Request::builder()
        .uri("/api/trips")
        .header("host", "internal:3000")
        .header("x-forwarded-proto", "https")
        .header("x-forwarded-host", "bikes.example.org")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["next"], "https://bikes.example.org/api/trips?page=2");
}

#[tokio::test]
async fn capacity_bounds_are_strict() {
    let app = app().await;
    let (status, body) = get(&app, "/api/stations?capacity_gt=18").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body["results"], "station_id"), vec![1, 3]);

    let (_, body) = get(&app, "/api/stations?capacity_lt=19&capacity_gt=11").await;
    assert_eq!(field(&body["results"], "station_id"), vec![2]);
}

#[tokio::test]
async fn date_bounds_are_strict() {
    let app = app().await;
    let (_, body) = get(&app, "/api/trips?start_date_gt=2019-03-04").await;
    assert_eq!(body["count"], 3);

    let (_, body) = get(&app, "/api/trips?start_date_lt=2019-03-02").await;
    assert_eq!(body["count"], 9);
}

#[tokio::test]
async fn timestamp_bounds_compare_instants_across_offsets() {
    let app = app().await;

    // 03:00 at -05:00 is 08:00Z, the first trip of March 5th
    let (status, body) = get(&app, "/api/trips?start_time_gt=2019-03-05T03:00:00-05:00").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (_, body) = get(&app, "/api/trips?start_time_gt=2019-03-05T08:00:00Z").await;
    assert_eq!(body["count"], 2);

    let (_, body) = get(
        &app,
        "/api/trips?start_time_lt=2019-03-01T03:05:00-05:00&fields=id",
    )
    .await;
    assert_eq!(body["count"], 5);

    let (_, body) = get(&app, "/api/trips?start_time=2019-03-04T03:00:00-05:00&fields=id").await;
    assert_eq!(body["results"], json!([{"id": 18}]));
}

#[tokio::test]
async fn filters_combine_with_and() {
    let app = app().await;
    let (_, body) = get(&app, "/api/stations?has_kiosk=true&capacity_gt=20").await;
    assert_eq!(field(&body["results"], "station_id"), vec![3]);

    let (_, body) = get(&app, "/api/stations?has_kiosk=False").await;
    assert_eq!(field(&body["results"], "station_id"), vec![2, 4]);
}

#[tokio::test]
async fn malformed_filter_value_is_a_client_error() {
    let app = app().await;
    let (status, body) = get(&app, "/api/stations?capacity_gt=lots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("capacity_gt"));
}

#[tokio::test]
async fn unknown_parameters_are_ignored() {
    let app = app().await;
    let (status, body) = get(&app, "/api/stations?colour=red&fields=name,colour").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["results"][0], json!({"name": "Central Sq"}));
}

#[tokio::test]
async fn search_matches_names_case_insensitively_and_literally() {
    let app = app().await;
    let (_, body) = get(&app, "/api/stations?search=KENDALL").await;
    assert_eq!(field(&body["results"], "name"), vec!["Kendall T"]);

    let (_, body) = get(&app, "/api/stations?search=lab_1").await;
    assert_eq!(field(&body["results"], "name"), vec!["Lab_1 Depot"]);

    // Wildcards in the term match only themselves
    let (_, body) = get(&app, "/api/stations?search=lab%25depot").await;
    assert_eq!(body["count"], 0);
    let (_, body) = get(&app, "/api/stations?search=central_sq").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn ordering_sorts_before_paginating() {
    let app = app().await;
    let (_, body) = get(&app, "/api/stations?ordering=-capacity&fields=station_id").await;
    assert_eq!(field(&body["results"], "station_id"), vec![3, 1, 2, 4]);

    let (_, body) = get(&app, "/api/trips?ordering=-start_date&fields=id").await;
    // Ties on start_date fall back to ascending id
    assert_eq!(body["results"][0], json!({"id": 19}));
}

#[tokio::test]
async fn empty_fields_returns_empty_records() {
    let app = app().await;
    let (_, body) = get(&app, "/api/stations?fields=").await;

    assert_eq!(body["results"], json!([{}, {}, {}, {}]));
}

#[tokio::test]
async fn trailing_slash_routes_like_bare_path() {
    let app = app().await;

    let (status, body) = get(&app, "/api/stations/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);

    let (status, body) = get(&app, "/api/stations/1/?fields=name").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "Central Sq"}));

    let (status, _) = get(&app, "/api/trips/summary/?group_by=gender").await;
    assert_eq!(status, StatusCode::OK);
}

// ========== DETAIL ==========

#[tokio::test]
async fn station_detail_shows_region_name_and_rental_methods() {
    let app = app().await;
    let (status, body) = get(&app, "/api/stations/1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["region"], "Boston");
    assert_eq!(body["rental_methods"], json!(["CREDITCARD", "KEY"]));

    let (_, body) = get(&app, "/api/stations/4").await;
    assert!(body["region"].is_null());
    assert_eq!(body["rental_methods"], json!([]));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app().await;

    let (status, _) = get(&app, "/api/stations/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/api/stations/central").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/api/trips/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trip_detail_embeds_stations_and_projects() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips/1?fields=id,start_date,start_station").await;

    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "start_date", "start_station"]);
    assert_eq!(body["start_date"], "2019-03-01");
    assert_eq!(body["start_station"]["name"], "Central Sq");
    assert_eq!(body["start_station"]["region"], "Boston");

    let (_, body) = get(&app, "/api/trips/1?fields=stop_station.name").await;
    assert_eq!(body, json!({"stop_station": {"name": "Kendall T"}}));
}

#[tokio::test]
async fn unresolved_station_serializes_as_null() {
    let app = app().await;
    let (status, body) = get(&app, "/api/trips/21").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["start_station"].is_null());
    assert_eq!(body["stop_station"]["station_id"], 2);

    // The raw id still filters
    let (_, body) = get(&app, &format!("/api/trips?start_station={UNKNOWN_STATION}")).await;
    assert_eq!(body["count"], 1);
}
