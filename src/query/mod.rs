//! Request-shaping contract layer.
//!
//! Everything in this module is pure: it turns raw query parameters into
//! validated, typed plans (filters, ordering, aggregation, pagination) and
//! shapes already-serialized records. Nothing here touches the database; the
//! `services` module translates these plans into SQL.

pub mod aggregate;
pub mod filter;
pub mod ordering;
pub mod pagination;
pub mod params;
pub mod projection;

pub use aggregate::{AggregateFunction, Aggregation, AggregationPlan, OutputColumn};
pub use filter::{
    Attribute, AttributeKind, AttributeSchema, Comparison, Criterion, FilterPredicate,
    FilterValue, build_filter_predicate, parse_timestamp,
};
pub use ordering::{Direction, OrderKey, Ordering};
pub use pagination::{DEFAULT_PAGE_SIZE, InvalidPage, Page, PageLinks, PageNumber, total_pages};
pub use params::QueryParams;
pub use projection::{FieldTree, Projection, Record};

/// A request parameter that cannot be turned into a valid query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid aggregation function: {0}. Must be one of: count, max, min, avg, sum")]
    InvalidAggregate(String),

    #[error("Invalid value for {param}: '{value}' is not a valid {expected}")]
    InvalidValue {
        param: String,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown attribute for {param}: {name}")]
    UnknownAttribute { param: &'static str, name: String },

    #[error("Aggregation {function} is not supported on {kind} attribute {field}")]
    UnsupportedAggregate {
        function: &'static str,
        field: &'static str,
        kind: &'static str,
    },
}

impl ValidationError {
    /// Name of the request parameter the error is about.
    #[must_use]
    pub fn parameter(&self) -> &str {
        match self {
            Self::MissingParameter(param) | Self::UnknownAttribute { param, .. } => *param,
            Self::InvalidAggregate(_) => "agg",
            Self::InvalidValue { param, .. } => param.as_str(),
            Self::UnsupportedAggregate { .. } => "field",
        }
    }
}
