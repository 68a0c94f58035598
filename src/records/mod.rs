//! Wire representation of stored entities.
//!
//! Records are serialized to plain JSON maps so projection can work on them
//! without knowing their type.

mod station;
mod trip;

use serde::Serialize;

use crate::error::AppResult;
use crate::query::{Attribute, AttributeKind, Record};

pub use station::{STATION_SCHEMA, StationRecord};
pub use trip::{TRIP_SCHEMA, TripRecord};

/// Serialize a record type into a JSON map.
///
/// # Errors
///
/// Returns an error if serialization fails or `value` is not an object.
pub fn to_record<T: Serialize>(value: &T) -> AppResult<Record> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(crate::error::AppError::Internal(format!(
            "expected an object record, got {other}"
        ))),
    }
}

pub(crate) const fn attr(name: &'static str, kind: AttributeKind) -> Attribute {
    Attribute::new(name, kind)
}
