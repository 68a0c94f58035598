//! Aggregation plan for the summary endpoints.
//!
//! `group_by` names the grouping attribute and is required. `agg` is a
//! comma list drawn from `count`, `max`, `min`, `avg` and `sum`, defaulting to
//! `count`. Every function except `count` reduces over `field`.

use std::fmt;
use std::str::FromStr;

use super::ValidationError;
use super::filter::{Attribute, AttributeKind, AttributeSchema};
use super::params::QueryParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Count,
    Max,
    Min,
    Avg,
    Sum,
}

impl AggregateFunction {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Max => "max",
            Self::Min => "min",
            Self::Avg => "avg",
            Self::Sum => "sum",
        }
    }

    #[must_use]
    pub const fn requires_field(self) -> bool {
        !matches!(self, Self::Count)
    }

    /// Whether the function can reduce an attribute of `kind`.
    #[must_use]
    pub const fn accepts(self, kind: AttributeKind) -> bool {
        match self {
            Self::Count => true,
            Self::Sum | Self::Avg => kind.is_numeric(),
            Self::Min | Self::Max => !matches!(kind, AttributeKind::Boolean),
        }
    }
}

impl FromStr for AggregateFunction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Self::Count),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "avg" => Ok(Self::Avg),
            "sum" => Ok(Self::Sum),
            other => Err(ValidationError::InvalidAggregate(other.to_string())),
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One reduction in a summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregation {
    pub function: AggregateFunction,
    /// Always `None` for `count`, which counts records rather than values.
    pub field: Option<&'static Attribute>,
}

impl Aggregation {
    /// Key under which the result appears: `count`, or `<func>_<field>`.
    #[must_use]
    pub fn output_key(&self) -> String {
        match self.field {
            Some(field) => format!("{}_{}", self.function, field.name),
            None => self.function.name().to_string(),
        }
    }

    /// Kind of the reduced value.
    #[must_use]
    pub fn output_kind(&self) -> AttributeKind {
        match (self.function, self.field) {
            (AggregateFunction::Count, _) | (_, None) => AttributeKind::Integer,
            (AggregateFunction::Avg, Some(_)) => AttributeKind::Float,
            (_, Some(field)) => field.kind,
        }
    }
}

/// Column of a summary row, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub key: String,
    pub kind: AttributeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationPlan {
    pub group_by: &'static Attribute,
    pub aggregations: Vec<Aggregation>,
}

impl AggregationPlan {
    /// Validate `group_by`, `agg` and `field` against `schema`.
    ///
    /// # Errors
    ///
    /// - `MissingParameter("group_by")` when `group_by` is absent or empty
    /// - `UnknownAttribute` when `group_by` or `field` names no attribute
    /// - `InvalidAggregate` for a function name outside the five supported
    /// - `MissingParameter("field")` when a non-count function has no field
    /// - `UnsupportedAggregate` when the field's kind cannot be reduced
    pub fn from_params(
        schema: &AttributeSchema,
        params: &QueryParams,
    ) -> Result<Self, ValidationError> {
        let group_name = params
            .get("group_by")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingParameter("group_by"))?;
        let group_by =
            schema
                .attribute(group_name)
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    param: "group_by",
                    name: group_name.to_string(),
                })?;

        let mut functions: Vec<AggregateFunction> = Vec::new();
        for name in params.list("agg").unwrap_or_default() {
            let function = name.parse()?;
            if !functions.contains(&function) {
                functions.push(function);
            }
        }
        if functions.is_empty() {
            functions.push(AggregateFunction::Count);
        }

        let field = if functions.iter().any(|f| f.requires_field()) {
            let name = params
                .get("field")
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or(ValidationError::MissingParameter("field"))?;
            let attribute =
                schema
                    .attribute(name)
                    .ok_or_else(|| ValidationError::UnknownAttribute {
                        param: "field",
                        name: name.to_string(),
                    })?;
            Some(attribute)
        } else {
            None
        };

        let aggregations = functions
            .into_iter()
            .map(|function| {
                if !function.requires_field() {
                    return Ok(Aggregation {
                        function,
                        field: None,
                    });
                }
                let Some(field) = field else {
                    return Err(ValidationError::MissingParameter("field"));
                };
                if !function.accepts(field.kind) {
                    return Err(ValidationError::UnsupportedAggregate {
                        function: function.name(),
                        field: field.name,
                        kind: field.kind.name(),
                    });
                }
                Ok(Aggregation {
                    function,
                    field: Some(field),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            group_by,
            aggregations,
        })
    }

    /// Output columns: the group key first, then each aggregation.
    #[must_use]
    pub fn columns(&self) -> Vec<OutputColumn> {
        std::iter::once(OutputColumn {
            key: self.group_by.name.to_string(),
            kind: self.group_by.kind,
        })
        .chain(self.aggregations.iter().map(|agg| OutputColumn {
            key: agg.output_key(),
            kind: agg.output_kind(),
        }))
        .collect()
    }
}
