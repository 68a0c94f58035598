//! Unit tests for aggregation plan validation.
//!
//! Run with: cargo test --test aggregate_unit_test

use bikeshare_api::query::{
    AggregateFunction, AggregationPlan, AttributeKind, OutputColumn, QueryParams, ValidationError,
};
use bikeshare_api::records::{STATION_SCHEMA, TRIP_SCHEMA};

fn plan(pairs: &[(&str, &str)]) -> Result<AggregationPlan, ValidationError> {
    let params: QueryParams = pairs.iter().copied().collect();
    AggregationPlan::from_params(&TRIP_SCHEMA, &params)
}

fn output_keys(plan: &AggregationPlan) -> Vec<String> {
    plan.columns().into_iter().map(|c| c.key).collect()
}

#[test]
fn group_by_is_required() {
    assert_eq!(
        plan(&[("agg", "count")]).unwrap_err(),
        ValidationError::MissingParameter("group_by")
    );
    assert_eq!(
        plan(&[("group_by", "")]).unwrap_err(),
        ValidationError::MissingParameter("group_by")
    );
}

#[test]
fn group_by_must_name_an_attribute() {
    let err = plan(&[("group_by", "weather")]).unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnknownAttribute {
            param: "group_by",
            name: "weather".to_string(),
        }
    );
    assert_eq!(err.parameter(), "group_by");
}

#[test]
fn agg_defaults_to_count() {
    let plan = plan(&[("group_by", "start_date")]).unwrap();

    assert_eq!(plan.group_by.name, "start_date");
    assert_eq!(plan.aggregations.len(), 1);
    assert_eq!(plan.aggregations[0].function, AggregateFunction::Count);
    assert!(plan.aggregations[0].field.is_none());
    assert_eq!(output_keys(&plan), vec!["start_date", "count"]);
}

#[test]
fn count_ignores_field() {
    let plan = plan(&[("group_by", "gender"), ("agg", "count"), ("field", "duration")]).unwrap();
    assert_eq!(output_keys(&plan), vec!["gender", "count"]);
}

#[test]
fn non_count_functions_require_field() {
    for agg in ["max", "min", "avg", "sum", "count,sum"] {
        assert_eq!(
            plan(&[("group_by", "start_date"), ("agg", agg)]).unwrap_err(),
            ValidationError::MissingParameter("field"),
            "agg={agg}"
        );
    }
}

#[test]
fn unknown_function_is_rejected() {
    let err = plan(&[("group_by", "start_date"), ("agg", "median"), ("field", "duration")])
        .unwrap_err();
    assert_eq!(err, ValidationError::InvalidAggregate("median".to_string()));
    assert_eq!(err.parameter(), "agg");
    assert_eq!(
        err.to_string(),
        "Invalid aggregation function: median. Must be one of: count, max, min, avg, sum"
    );
}

#[test]
fn multiple_functions_share_one_record() {
    let plan = plan(&[
        ("group_by", "start_date"),
        ("agg", "sum,count,max,sum"),
        ("field", "duration"),
    ])
    .unwrap();

    assert_eq!(
        plan.columns(),
        vec![
            OutputColumn {
                key: "start_date".to_string(),
                kind: AttributeKind::Date,
            },
            OutputColumn {
                key: "sum_duration".to_string(),
                kind: AttributeKind::Integer,
            },
            OutputColumn {
                key: "count".to_string(),
                kind: AttributeKind::Integer,
            },
            OutputColumn {
                key: "max_duration".to_string(),
                kind: AttributeKind::Integer,
            },
        ]
    );
}

#[test]
fn avg_is_always_a_float() {
    let plan = plan(&[("group_by", "gender"), ("agg", "avg"), ("field", "duration")]).unwrap();
    assert_eq!(plan.aggregations[0].output_key(), "avg_duration");
    assert_eq!(plan.aggregations[0].output_kind(), AttributeKind::Float);
}

#[test]
fn field_kind_must_suit_the_function() {
    let err = plan(&[("group_by", "gender"), ("agg", "sum"), ("field", "start_date")])
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnsupportedAggregate {
            function: "sum",
            field: "start_date",
            kind: "date",
        }
    );

    assert!(plan(&[("group_by", "gender"), ("agg", "max"), ("field", "is_subscriber")]).is_err());
    // min/max work on dates
    assert!(plan(&[("group_by", "gender"), ("agg", "min,max"), ("field", "start_date")]).is_ok());
}

#[test]
fn unknown_field_is_rejected() {
    assert_eq!(
        plan(&[("group_by", "gender"), ("agg", "max"), ("field", "speed")]).unwrap_err(),
        ValidationError::UnknownAttribute {
            param: "field",
            name: "speed".to_string(),
        }
    );
}

#[test]
fn station_schema_supports_capacity_by_region() {
    let params: QueryParams = [("group_by", "region"), ("agg", "sum"), ("field", "capacity")]
        .into_iter()
        .collect();
    let plan = AggregationPlan::from_params(&STATION_SCHEMA, &params).unwrap();
    assert_eq!(output_keys(&plan), vec!["region", "sum_capacity"]);
}

#[test]
fn function_names_round_trip() {
    for name in ["count", "max", "min", "avg", "sum"] {
        let function: AggregateFunction = name.parse().unwrap();
        assert_eq!(function.name(), name);
        assert_eq!(function.requires_field(), name != "count");
    }
}
