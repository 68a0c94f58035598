//! Attribute filter set.
//!
//! Each resource declares a static [`AttributeSchema`]. Query parameters are
//! matched against it by name (`A`, `A_gt`, `A_lt`), their values coerced to
//! the attribute's kind, and the result combined into a conjunctive
//! [`FilterPredicate`]. Parameters that match nothing are ignored.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use super::ValidationError;
use super::params::QueryParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Integer,
    Float,
    Boolean,
    Text,
    Date,
    Timestamp,
}

impl AttributeKind {
    /// Whether `_gt`/`_lt` comparisons are accepted.
    #[must_use]
    pub const fn supports_range(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Float | Self::Date | Self::Timestamp
        )
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
            Self::Text => "string",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
        }
    }

    /// Coerce a raw parameter value. `None` means the value is malformed.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<FilterValue> {
        match self {
            Self::Integer => raw.parse().ok().map(FilterValue::Integer),
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FilterValue::Float),
            Self::Boolean => parse_bool(raw).map(FilterValue::Boolean),
            Self::Text => Some(FilterValue::Text(raw.to_string())),
            Self::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(FilterValue::Date),
            Self::Timestamp => parse_timestamp(raw).map(FilterValue::Timestamp),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    /// Matched by the `search` parameter (case-insensitive substring).
    pub searchable: bool,
}

impl Attribute {
    #[must_use]
    pub const fn new(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            searchable: false,
        }
    }

    #[must_use]
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }
}

/// The filterable, orderable and groupable attributes of one resource.
#[derive(Debug)]
pub struct AttributeSchema {
    pub resource: &'static str,
    pub primary_key: &'static str,
    pub attributes: &'static [Attribute],
}

impl AttributeSchema {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn searchable(&self) -> impl Iterator<Item = &'static Attribute> {
        self.attributes.iter().filter(|a| a.searchable)
    }

    /// Resolve a filter parameter name to its attribute and comparison.
    #[must_use]
    pub fn resolve(&self, param: &str) -> Option<(&'static Attribute, Comparison)> {
        if let Some(attribute) = self.attribute(param) {
            return Some((attribute, Comparison::Exact));
        }

        let (base, comparison) = if let Some(base) = param.strip_suffix("_gt") {
            (base, Comparison::GreaterThan)
        } else if let Some(base) = param.strip_suffix("_lt") {
            (base, Comparison::LessThan)
        } else {
            return None;
        };

        self.attribute(base)
            .filter(|a| a.kind.supports_range())
            .map(|a| (a, comparison))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Exact,
    /// Strict: the bound itself never matches.
    GreaterThan,
    /// Strict: the bound itself never matches.
    LessThan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<FixedOffset>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub attribute: &'static Attribute,
    pub comparison: Comparison,
    pub value: FilterValue,
}

/// Conjunction of criteria plus an optional search term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPredicate {
    pub criteria: Vec<Criterion>,
    pub search: Option<String>,
}

impl FilterPredicate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && self.search.is_none()
    }
}

/// Build the filter predicate for `schema` from request parameters.
///
/// Empty values are skipped, as are names that are reserved or match no
/// attribute. A repeated name uses its last value.
///
/// # Errors
///
/// Returns `ValidationError::InvalidValue` when a recognized parameter's
/// value cannot be coerced to the attribute's kind.
pub fn build_filter_predicate(
    schema: &AttributeSchema,
    params: &QueryParams,
) -> Result<FilterPredicate, ValidationError> {
    let mut criteria = Vec::new();

    for name in params.names() {
        if QueryParams::is_reserved(name) {
            continue;
        }
        let Some((attribute, comparison)) = schema.resolve(name) else {
            continue;
        };
        let raw = params.get(name).unwrap_or_default().trim();
        if raw.is_empty() {
            continue;
        }

        let value = attribute
            .kind
            .parse(raw)
            .ok_or_else(|| ValidationError::InvalidValue {
                param: name.to_string(),
                value: raw.to_string(),
                expected: attribute.kind.name(),
            })?;

        criteria.push(Criterion {
            attribute,
            comparison,
            value,
        });
    }

    let search = params
        .get("search")
        .map(str::trim)
        .filter(|term| !term.is_empty() && schema.searchable().next().is_some())
        .map(str::to_string);

    Ok(FilterPredicate { criteria, search })
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a timestamp in RFC 3339 or one of the naive forms used by the trip
/// exports. Naive values and bare dates are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
