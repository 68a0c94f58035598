//! Translation of validated query plans into `sea-orm` selects.
//!
//! Attribute names reach SQL only through [`Resource::column`], a fixed match
//! per entity, and every filter value is bound as a parameter.

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Value,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

use crate::entity::trips::to_utc;
use crate::entity::{stations, trips};
use crate::error::AppResult;
use crate::query::{
    Attribute, AttributeSchema, Comparison, Direction, FilterPredicate, FilterValue, InvalidPage,
    Ordering, PageNumber, total_pages,
};
use crate::records::{STATION_SCHEMA, TRIP_SCHEMA};

/// An entity exposed through the list and summary endpoints.
pub trait Resource: EntityTrait {
    fn schema() -> &'static AttributeSchema;

    /// Column backing a schema attribute.
    fn column(attribute: &Attribute) -> Option<Self::Column>;

    fn primary_key_column() -> Self::Column;
}

impl Resource for stations::Entity {
    fn schema() -> &'static AttributeSchema {
        &STATION_SCHEMA
    }

    fn column(attribute: &Attribute) -> Option<stations::Column> {
        use stations::Column;

        Some(match attribute.name {
            "station_id" => Column::StationId,
            "short_name" => Column::ShortName,
            "name" => Column::Name,
            "latitude" => Column::Latitude,
            "longitude" => Column::Longitude,
            "region" => Column::RegionId,
            "capacity" => Column::Capacity,
            "electric_bike_surcharge_waiver" => Column::ElectricBikeSurchargeWaiver,
            "eightd_has_key_dispenser" => Column::EightdHasKeyDispenser,
            "has_kiosk" => Column::HasKiosk,
            _ => return None,
        })
    }

    fn primary_key_column() -> stations::Column {
        stations::Column::StationId
    }
}

impl Resource for trips::Entity {
    fn schema() -> &'static AttributeSchema {
        &TRIP_SCHEMA
    }

    fn column(attribute: &Attribute) -> Option<trips::Column> {
        use trips::Column;

        Some(match attribute.name {
            "id" => Column::Id,
            "duration" => Column::Duration,
            "start_time" => Column::StartTime,
            "stop_time" => Column::StopTime,
            "start_date" => Column::StartDate,
            "stop_date" => Column::StopDate,
            "start_station" => Column::StartStationId,
            "stop_station" => Column::StopStationId,
            "bike_id" => Column::BikeId,
            "is_subscriber" => Column::IsSubscriber,
            "birth_year" => Column::BirthYear,
            "gender" => Column::Gender,
            _ => return None,
        })
    }

    fn primary_key_column() -> trips::Column {
        trips::Column::Id
    }
}

fn bind(value: &FilterValue) -> Value {
    match value {
        FilterValue::Integer(v) => (*v).into(),
        FilterValue::Float(v) => (*v).into(),
        FilterValue::Boolean(v) => (*v).into(),
        FilterValue::Text(v) => v.clone().into(),
        FilterValue::Date(v) => (*v).into(),
        // Stored timestamps are UTC; text-backed stores compare them as strings
        FilterValue::Timestamp(v) => to_utc(v).into(),
    }
}

/// Escape `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Conjunction of all criteria, plus the search term across searchable columns.
pub fn filter_condition<R: Resource>(predicate: &FilterPredicate) -> Condition {
    let mut condition = Condition::all();

    for criterion in &predicate.criteria {
        let Some(column) = R::column(criterion.attribute) else {
            continue;
        };
        let value = bind(&criterion.value);
        condition = condition.add(match criterion.comparison {
            Comparison::Exact => column.eq(value),
            Comparison::GreaterThan => column.gt(value),
            Comparison::LessThan => column.lt(value),
        });
    }

    if let Some(term) = &predicate.search {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let mut any = Condition::any();
        for column in R::schema().searchable().filter_map(R::column) {
            let lowered: SimpleExpr = Func::lower(Expr::col(column.as_column_ref())).into();
            any = any.add(Expr::expr(lowered).like(LikeExpr::new(pattern.clone()).escape('\\')));
        }
        condition = condition.add(any);
    }

    condition
}

/// Requested ordering, then the primary key as a tiebreaker.
pub fn apply_ordering<R: Resource>(mut select: Select<R>, ordering: &Ordering) -> Select<R> {
    for key in &ordering.keys {
        let Some(column) = R::column(key.attribute) else {
            continue;
        };
        let order = match key.direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };
        select = select.order_by(column, order);
    }

    if !ordering.contains(R::schema().primary_key) {
        select = select.order_by_asc(R::primary_key_column());
    }

    select
}

/// Filtered, ordered page of models plus the total matching count.
///
/// # Errors
///
/// `NotFound("Invalid page.")` when `page` lies beyond the last page.
pub async fn fetch_page<R>(
    db: &DatabaseConnection,
    predicate: &FilterPredicate,
    ordering: &Ordering,
    page: PageNumber,
    page_size: u64,
) -> AppResult<(Vec<R::Model>, u64)>
where
    R: Resource,
    R::Model: FromQueryResult + Sync,
{
    let select = R::find().filter(filter_condition::<R>(predicate));
    let select = apply_ordering(select, ordering);

    let paginator = select.paginate(db, page_size);
    let count = paginator.num_items().await?;

    if page.get() > total_pages(count, page_size) {
        return Err(InvalidPage.into());
    }

    let models = paginator.fetch_page(page.index()).await?;
    tracing::debug!(
        resource = R::schema().resource,
        page = page.get(),
        count,
        returned = models.len(),
        "Fetched page"
    );

    Ok((models, count))
}
