//! Grouped aggregation over a filtered record set.
//!
//! One `GROUP BY` query per request: filters apply first, every requested
//! aggregation shares the grouping, and groups come back in ascending key
//! order. Results are not paginated.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QueryResult, QuerySelect, QueryTrait,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use serde_json::{Value, json};

use super::store::{Resource, filter_condition};
use crate::error::{AppError, AppResult};
use crate::query::{
    AggregateFunction, Aggregation, AggregationPlan, AttributeKind, FilterPredicate, Record,
};

const GROUP_ALIAS: &str = "group_key";

fn column_expr<C: ColumnTrait>(column: C) -> SimpleExpr {
    Expr::col(column.as_column_ref()).into()
}

/// Cast integer and float results to one SQL type each so decoding does not
/// depend on the backend's native result type.
fn normalized(expr: SimpleExpr, kind: AttributeKind) -> SimpleExpr {
    match kind {
        AttributeKind::Integer => Func::cast_as(expr, Alias::new("BIGINT")).into(),
        AttributeKind::Float => Func::cast_as(expr, Alias::new("DOUBLE PRECISION")).into(),
        _ => expr,
    }
}

fn aggregate_expr<R: Resource>(aggregation: &Aggregation) -> AppResult<SimpleExpr> {
    let target = match aggregation.field {
        Some(field) => R::column(field).ok_or_else(|| {
            AppError::Internal(format!("no column for attribute {}", field.name))
        })?,
        None => R::primary_key_column(),
    };
    let target = column_expr(target);

    let expr: SimpleExpr = match aggregation.function {
        AggregateFunction::Count => Func::count(target).into(),
        AggregateFunction::Sum => Func::sum(target).into(),
        AggregateFunction::Avg => Func::avg(target).into(),
        AggregateFunction::Min => Func::min(target).into(),
        AggregateFunction::Max => Func::max(target).into(),
    };

    Ok(normalized(expr, aggregation.output_kind()))
}

fn decode(row: &QueryResult, alias: &str, kind: AttributeKind) -> AppResult<Value> {
    let value = match kind {
        AttributeKind::Integer => json!(row.try_get::<Option<i64>>("", alias)?),
        AttributeKind::Float => json!(row.try_get::<Option<f64>>("", alias)?),
        AttributeKind::Boolean => json!(row.try_get::<Option<bool>>("", alias)?),
        AttributeKind::Text => json!(row.try_get::<Option<String>>("", alias)?),
        AttributeKind::Date => json!(
            row.try_get::<Option<NaiveDate>>("", alias)?
                .map(|date| date.to_string())
        ),
        AttributeKind::Timestamp => json!(
            row.try_get::<Option<DateTime<FixedOffset>>>("", alias)?
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        ),
    };
    Ok(value)
}

/// Execute `plan` over the records of `R` matching `predicate`.
///
/// Each output record holds the group key under the grouping attribute's
/// name followed by one key per aggregation (`count`, `sum_duration`, ...).
pub async fn run_summary<R: Resource>(
    db: &DatabaseConnection,
    plan: &AggregationPlan,
    predicate: &FilterPredicate,
) -> AppResult<Vec<Record>> {
    let group_column = R::column(plan.group_by).ok_or_else(|| {
        AppError::Internal(format!("no column for attribute {}", plan.group_by.name))
    })?;

    let mut select = R::find()
        .select_only()
        .column_as(
            normalized(column_expr(group_column), plan.group_by.kind),
            GROUP_ALIAS,
        )
        .filter(filter_condition::<R>(predicate));

    let aliases: Vec<String> = (0..plan.aggregations.len())
        .map(|i| format!("agg_{i}"))
        .collect();
    for (aggregation, alias) in plan.aggregations.iter().zip(&aliases) {
        select = select.column_as(aggregate_expr::<R>(aggregation)?, alias.as_str());
    }

    let select = select.group_by(group_column).order_by_asc(group_column);

    let statement = select.build(db.get_database_backend());
    let rows = db.query_all(statement).await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut record = Record::new();
        record.insert(
            plan.group_by.name.to_string(),
            decode(row, GROUP_ALIAS, plan.group_by.kind)?,
        );
        for (aggregation, alias) in plan.aggregations.iter().zip(&aliases) {
            record.insert(
                aggregation.output_key(),
                decode(row, alias, aggregation.output_kind())?,
            );
        }
        records.push(record);
    }

    tracing::debug!(
        resource = R::schema().resource,
        group_by = plan.group_by.name,
        groups = records.len(),
        "Computed summary"
    );

    Ok(records)
}
