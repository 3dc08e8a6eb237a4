//! Field decoders for records written by other producers
//!
//! Only the top-level shape of the document is enforced. A record field that
//! is `null` or has drifted to another JSON type decodes to its default, so
//! one odd field never makes the whole document unreadable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode the field as `T`, falling back to `T::default()`
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Record {
        #[serde(deserialize_with = "or_default")]
        name: String,
        #[serde(deserialize_with = "or_default")]
        count: u64,
        #[serde(deserialize_with = "or_default")]
        note: Option<String>,
    }

    #[test]
    fn test_null_becomes_default() {
        let record: Record = serde_json::from_value(json!({"name": null, "count": null, "note": null})).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.count, 0);
        assert!(record.note.is_none());
    }

    #[test]
    fn test_wrong_type_becomes_default() {
        let record: Record = serde_json::from_value(json!({"name": 7, "count": "many", "note": ["x"]})).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.count, 0);
        assert!(record.note.is_none());
    }

    #[test]
    fn test_well_typed_fields_decode() {
        let record: Record = serde_json::from_value(json!({"name": "qa", "count": 3, "note": "ok"})).unwrap();
        assert_eq!(record.name, "qa");
        assert_eq!(record.count, 3);
        assert_eq!(record.note.as_deref(), Some("ok"));
    }
}
