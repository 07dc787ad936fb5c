//! Payload normalization boundary
//!
//! The backend's list endpoints are loosely shaped: a payload may be a bare
//! array, an envelope with a `data` field, or an envelope keyed by the
//! entity name (`{"products": [...]}`). One function per entity type turns
//! the raw [`serde_json::Value`] into typed entities or fails with
//! [`ClientError::MalformedPayload`]; the ambiguity never leaks past here.

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{Assignment, AvailabilityRecord, Product, Reservation, ScheduleOverride};

use crate::error::{ClientError, ClientResult};

/// Extract and deserialize an entity list from a loose payload
pub fn entity_list<T: DeserializeOwned>(value: Value, entity_key: &str) -> ClientResult<Vec<T>> {
    let items = unwrap_list(value, entity_key)?;
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| ClientError::MalformedPayload(format!("{entity_key}: {e}")))
        })
        .collect()
}

fn unwrap_list(value: Value, entity_key: &str) -> ClientResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            let inner = map
                .remove("data")
                .or_else(|| map.remove(entity_key))
                .ok_or_else(|| {
                    ClientError::MalformedPayload(format!(
                        "expected array or `data`/`{entity_key}` field"
                    ))
                })?;
            match inner {
                Value::Array(items) => Ok(items),
                // One more level: {"data": {"products": [...]}}
                Value::Object(mut inner_map) => match inner_map.remove(entity_key) {
                    Some(Value::Array(items)) => Ok(items),
                    _ => Err(ClientError::MalformedPayload(format!(
                        "`data` holds neither an array nor `{entity_key}`"
                    ))),
                },
                _ => Err(ClientError::MalformedPayload(format!(
                    "`data`/`{entity_key}` is not an array"
                ))),
            }
        }
        other => Err(ClientError::MalformedPayload(format!(
            "expected array or object, got {other}"
        ))),
    }
}

pub fn availability_records(value: Value) -> ClientResult<Vec<AvailabilityRecord>> {
    entity_list(value, "records")
}

pub fn schedule_overrides(value: Value) -> ClientResult<Vec<ScheduleOverride>> {
    entity_list(value, "overrides")
}

pub fn reservations(value: Value) -> ClientResult<Vec<Reservation>> {
    entity_list(value, "reservations")
}

pub fn assignments(value: Value) -> ClientResult<Vec<Assignment>> {
    entity_list(value, "assignments")
}

pub fn products(value: Value) -> ClientResult<Vec<Product>> {
    entity_list(value, "products")
}
