//! Structural validation of the dashboard document
//!
//! The validator is deliberately shallow: it checks the top-level shape and
//! that every agent/event/session entry is a JSON object. Field-level checks
//! inside entries are left to serde, whose defaults tolerate fields that come
//! and go between producer versions.

use serde_json::{Map, Value};

use super::error::SchemaError;
use crate::types::{DashboardState, CURRENT_VERSION};

const STRING_FIELDS: &[&str] = &["project_name", "created_at", "updated_at"];
const COUNTER_FIELDS: &[&str] = &["total_sessions", "total_tokens"];
const AMOUNT_FIELDS: &[&str] = &["total_cost_usd", "total_duration_seconds"];

/// JSON type name used in error messages
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn required<'a>(root: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SchemaError> {
    root.get(field).ok_or(SchemaError::MissingField { field })
}

fn wrong_type(field: &'static str, expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::WrongType {
        field,
        expected,
        found: kind(value),
    }
}

/// Check the structure of an untyped document without decoding it
pub fn validate_value(value: &Value) -> Result<(), SchemaError> {
    let root = value
        .as_object()
        .ok_or(SchemaError::NotAnObject { found: kind(value) })?;

    let version = required(root, "version")?;
    let version = version
        .as_u64()
        .ok_or_else(|| wrong_type("version", "a non-negative integer", version))?;
    if version != CURRENT_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }

    for &field in STRING_FIELDS {
        let value = required(root, field)?;
        if !value.is_string() {
            return Err(wrong_type(field, "a string", value));
        }
    }

    for &field in COUNTER_FIELDS {
        let value = required(root, field)?;
        if value.as_u64().is_none() {
            return Err(wrong_type(field, "a non-negative integer", value));
        }
    }

    for &field in AMOUNT_FIELDS {
        let value = required(root, field)?;
        if !value.is_number() {
            return Err(wrong_type(field, "a number", value));
        }
    }

    let agents = required(root, "agents")?;
    let agents = agents
        .as_object()
        .ok_or_else(|| wrong_type("agents", "an object", agents))?;
    for (name, profile) in agents {
        if !profile.is_object() {
            return Err(SchemaError::NotAMapping {
                collection: "agents",
                key: format!("`{}`", name),
                found: kind(profile),
            });
        }
    }

    for collection in ["events", "sessions"] {
        let list = required(root, collection)?;
        let list = list
            .as_array()
            .ok_or_else(|| wrong_type(collection, "an array", list))?;
        if let Some((index, item)) = list.iter().enumerate().find(|(_, item)| !item.is_object()) {
            return Err(SchemaError::NotAMapping {
                collection,
                key: format!("#{}", index),
                found: kind(item),
            });
        }
    }

    Ok(())
}

/// Validate an untyped document and decode it
pub fn validate(value: Value) -> Result<DashboardState, SchemaError> {
    validate_value(&value)?;
    serde_json::from_value(value).map_err(|e| SchemaError::Decode(e.to_string()))
}

/// Validate a typed state before it is written.
///
/// Most of the shape is guaranteed by the types. What remains is the version
/// tag and float fields: JSON has no NaN or infinity, so such a value would
/// be written as `null` and make the file undecodable on the next load.
pub fn validate_state(state: &DashboardState) -> Result<(), SchemaError> {
    if state.version != CURRENT_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found: state.version,
            supported: CURRENT_VERSION,
        });
    }

    check_finite("total_cost_usd", state.total_cost_usd)?;
    check_finite("total_duration_seconds", state.total_duration_seconds)?;

    for (name, profile) in &state.agents {
        check_finite(format!("agents.{}.total_cost_usd", name), profile.total_cost_usd)?;
        check_finite(format!("agents.{}.total_duration_seconds", name), profile.total_duration_seconds)?;
        check_finite(format!("agents.{}.success_rate", name), profile.success_rate)?;
        check_finite(
            format!("agents.{}.avg_tokens_per_invocation", name),
            profile.avg_tokens_per_invocation,
        )?;
        check_finite(format!("agents.{}.avg_duration_seconds", name), profile.avg_duration_seconds)?;
    }

    for (i, event) in state.events.iter().enumerate() {
        check_finite(format!("events[{}].duration_seconds", i), event.duration_seconds)?;
        check_finite(format!("events[{}].estimated_cost_usd", i), event.estimated_cost_usd)?;
    }

    for (i, session) in state.sessions.iter().enumerate() {
        check_finite(format!("sessions[{}].total_cost_usd", i), session.total_cost_usd)?;
        check_finite(format!("sessions[{}].duration_seconds", i), session.duration_seconds)?;
    }

    Ok(())
}

fn check_finite(field: impl Into<String>, value: f64) -> Result<(), SchemaError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SchemaError::NonFiniteNumber { field: field.into() })
    }
}
