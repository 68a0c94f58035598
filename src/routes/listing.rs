//! Request handling shared by the list, detail and summary endpoints.

use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::IntoParams;

use crate::common::RequestUrl;
use crate::error::{AppError, AppResult};
use crate::query::{
    AggregationPlan, FilterPredicate, Ordering, Page, PageLinks, PageNumber, Projection,
    QueryParams, Record, build_filter_predicate,
};
use crate::records::to_record;
use crate::services::{Resource, run_summary};

/// Parameters understood by every list endpoint.
///
/// Attribute filters (`A`, `A_gt`, `A_lt`) are listed per resource.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Comma-separated fields to return; dotted names reach into nested records
    pub fields: Option<String>,
    /// Comma-separated fields to leave out; wins over `fields`
    pub fields_exclude: Option<String>,
    /// Alias of `fields_exclude`
    pub omit: Option<String>,
    /// Comma-separated sort attributes, `-` prefix for descending
    pub ordering: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Case-insensitive substring match on searchable attributes
    pub search: Option<String>,
}

/// Parameters of the summary endpoints.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    /// Attribute to group by (required)
    pub group_by: String,
    /// Comma-separated aggregations: count, max, min, avg, sum (default count)
    pub agg: Option<String>,
    /// Attribute reduced by every aggregation except count
    pub field: Option<String>,
}

/// A validated list request. Built before any query runs.
#[derive(Debug)]
pub struct ListRequest {
    pub predicate: FilterPredicate,
    pub ordering: Ordering,
    pub page: PageNumber,
    pub projection: Projection,
}

impl ListRequest {
    pub fn parse<R: Resource>(params: &QueryParams) -> AppResult<Self> {
        let schema = R::schema();
        Ok(Self {
            predicate: build_filter_predicate(schema, params)?,
            ordering: Ordering::from_params(schema, params),
            page: PageNumber::from_params(params)?,
            projection: Projection::from_params(params),
        })
    }

    /// Serialize, project and wrap records in the pagination envelope.
    pub fn into_page<T: Serialize>(
        self,
        url: &RequestUrl,
        records: &[T],
        count: u64,
        page_size: u64,
    ) -> AppResult<Page> {
        let results = project_all(&self.projection, records)?;
        Ok(PageLinks::new(url.base(), url.query()).page(self.page, count, page_size, results))
    }
}

pub fn project_all<T: Serialize>(projection: &Projection, records: &[T]) -> AppResult<Vec<Record>> {
    records
        .iter()
        .map(|record| to_record(record).map(|r| projection.apply(r)))
        .collect()
}

/// Parse a numeric path id; anything else cannot match a record.
pub fn parse_id(raw: &str, resource: &str) -> AppResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(format!("No {resource} matches id '{raw}'")))
}

/// Validate and execute a summary request for `R`.
pub async fn summarize<R: Resource>(
    db: &DatabaseConnection,
    params: &QueryParams,
) -> AppResult<Vec<Record>> {
    let schema = R::schema();
    let plan = AggregationPlan::from_params(schema, params)?;
    let predicate = build_filter_predicate(schema, params)?;

    run_summary::<R>(db, &plan, &predicate).await
}
