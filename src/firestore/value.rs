//! Conversion between JSON values and Firestore's native value types.
//!
//! Documents are handled as JSON objects on the Rust side. Firestore stores a
//! document as a map of field names to typed [`Value`]s, so every write goes
//! through [`to_fields`] and every read through [`from_fields`].

use std::collections::HashMap;

use firestore_grpc::v1::{value::ValueType, ArrayValue, MapValue, Value};
use serde_json::{Map, Number};

/// A JSON object, the shape every document body takes.
pub type JsonMap = Map<String, serde_json::Value>;

/// Firestore document fields.
pub type Fields = HashMap<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("a document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    // Firestore always sets a value type on values it returns, but the field
    // is optional in the protobuf definition.
    #[error("missing value type")]
    MissingValueType,

    #[error("cannot represent non-finite number {0} in JSON")]
    NonFiniteNumber(f64),

    #[error("unsupported value type: {0}")]
    Unsupported(&'static str),
}

/// Converts a JSON object into Firestore document fields.
pub fn to_fields(document: &JsonMap) -> Fields {
    document
        .iter()
        .map(|(key, value)| (key.clone(), to_value(value)))
        .collect()
}

/// Converts any serializable document body into a JSON object, failing if
/// it is not object-shaped.
pub fn to_json_map<T: serde::Serialize>(document: &T) -> Result<JsonMap, anyhow::Error> {
    match serde_json::to_value(document)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ValueError::NotAnObject(json_kind(&other)).into()),
    }
}

/// Converts Firestore document fields back into a JSON object.
pub fn from_fields(fields: Fields) -> Result<JsonMap, ValueError> {
    fields
        .into_iter()
        .map(|(key, value)| Ok((key, from_value(value)?)))
        .collect()
}

pub fn to_value(value: &serde_json::Value) -> Value {
    let value_type = match value {
        serde_json::Value::Null => ValueType::NullValue(0),
        serde_json::Value::Bool(b) => ValueType::BooleanValue(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => ValueType::IntegerValue(i),
            // Integers beyond i64 and fractional numbers are stored as
            // doubles, since Firestore integers are signed 64-bit.
            None => ValueType::DoubleValue(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => ValueType::StringValue(s.clone()),
        serde_json::Value::Array(items) => ValueType::ArrayValue(ArrayValue {
            values: items.iter().map(to_value).collect(),
        }),
        serde_json::Value::Object(map) => ValueType::MapValue(MapValue {
            fields: to_fields(map),
        }),
    };

    Value {
        value_type: Some(value_type),
    }
}

pub fn from_value(value: Value) -> Result<serde_json::Value, ValueError> {
    let value_type = value.value_type.ok_or(ValueError::MissingValueType)?;

    let json = match value_type {
        ValueType::NullValue(_) => serde_json::Value::Null,
        ValueType::BooleanValue(b) => serde_json::Value::Bool(b),
        ValueType::IntegerValue(i) => serde_json::Value::Number(i.into()),
        ValueType::DoubleValue(d) => {
            serde_json::Value::Number(Number::from_f64(d).ok_or(ValueError::NonFiniteNumber(d))?)
        }
        ValueType::StringValue(s) => serde_json::Value::String(s),
        ValueType::ReferenceValue(r) => serde_json::Value::String(r),
        ValueType::ArrayValue(array) => serde_json::Value::Array(
            array
                .values
                .into_iter()
                .map(from_value)
                .collect::<Result<_, _>>()?,
        ),
        ValueType::MapValue(map) => serde_json::Value::Object(from_fields(map.fields)?),
        ValueType::TimestampValue(_) => return Err(ValueError::Unsupported("timestamp")),
        ValueType::BytesValue(_) => return Err(ValueError::Unsupported("bytes")),
        ValueType::GeoPointValue(_) => return Err(ValueError::Unsupported("geo point")),
        #[allow(unreachable_patterns)]
        _ => return Err(ValueError::Unsupported("unknown")),
    };

    Ok(json)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: serde_json::Value) -> JsonMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn integers_are_stored_as_integer_values() {
        let fields = to_fields(&object(json!({ "value": 1 })));

        assert_eq!(
            fields["value"].value_type,
            Some(ValueType::IntegerValue(1))
        );
    }

    #[test]
    fn fractions_and_large_unsigned_are_stored_as_doubles() {
        let fields = to_fields(&object(json!({ "weight": 0.5, "big": u64::MAX })));

        assert_eq!(
            fields["weight"].value_type,
            Some(ValueType::DoubleValue(0.5))
        );
        assert!(matches!(
            fields["big"].value_type,
            Some(ValueType::DoubleValue(_))
        ));
    }

    #[test]
    fn item_lists_survive_conversion_in_order() {
        let document = object(json!({
            "items": [
                { "key": "Shower and dry", "value": 1 },
                { "key": "תספורת", "value": 2 },
                { "key": "Dematting", "value": 3 },
            ],
            "published": true,
            "note": null,
        }));

        let restored = from_fields(to_fields(&document)).unwrap();

        assert_eq!(restored, document);
    }

    #[test]
    fn missing_value_type_is_an_error() {
        let mut fields = Fields::new();
        fields.insert("broken".to_string(), Value { value_type: None });

        assert!(matches!(
            from_fields(fields),
            Err(ValueError::MissingValueType)
        ));
    }

    #[test]
    fn non_finite_doubles_cannot_be_read_back() {
        let value = Value {
            value_type: Some(ValueType::DoubleValue(f64::INFINITY)),
        };

        assert!(matches!(
            from_value(value),
            Err(ValueError::NonFiniteNumber(_))
        ));
    }

    #[test]
    fn references_are_read_as_strings() {
        let value = Value {
            value_type: Some(ValueType::ReferenceValue(
                "projects/p/databases/(default)/documents/shops/meamore".to_string(),
            )),
        };

        assert_eq!(
            from_value(value).unwrap(),
            json!("projects/p/databases/(default)/documents/shops/meamore")
        );
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        let err = to_json_map(&vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "a document must be a JSON object, got an array"
        );
    }
}
