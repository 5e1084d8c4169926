//! # Value Codec
//!
//! Converts backing-store field values into JSON-serializable values.
//! Extension types are handled by explicit rule rather than reflection:
//! timestamps become ISO-8601 strings, arbitrary-precision decimals become
//! the nearest double (lossy by design), and anything that has no JSON
//! representation encodes as null.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

/// A single field value as produced by a record.
///
/// Records hand the projector one of these per field; the codec decides how
/// it appears on the wire. `Decimal` carries the digits as text so stores
/// with arbitrary-precision numerics lose nothing before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Decimal(String),
    Bytes(Vec<u8>),
    Json(Value),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Json(other),
        }
    }
}

/// Encoding policy for field values.
///
/// One codec instance is attached to each resource specification and shared
/// immutably across requests; there is no global encoder singleton.
pub trait ValueCodec: Send + Sync {
    /// Encode a field value as JSON.
    fn encode(&self, value: FieldValue) -> Value;
}

/// Default codec: ISO-8601 timestamps, lossy decimal-to-float conversion,
/// null for everything JSON cannot represent.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    fn encode(&self, value: FieldValue) -> Value {
        match value {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Int(i) => Value::Number(i.into()),
            FieldValue::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Timestamp(ts) => {
                Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FieldValue::Decimal(digits) => digits
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
            // Raw bytes have no JSON representation; encode permissively.
            FieldValue::Bytes(_) => Value::Null,
            FieldValue::Json(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_scalars_encode_directly() {
        let codec = JsonCodec;
        assert_eq!(codec.encode(FieldValue::Null), Value::Null);
        assert_eq!(codec.encode(FieldValue::Bool(true)), json!(true));
        assert_eq!(codec.encode(FieldValue::Int(42)), json!(42));
        assert_eq!(codec.encode(FieldValue::Text("hi".into())), json!("hi"));
    }

    #[test]
    fn test_timestamp_encodes_as_iso8601() {
        let codec = JsonCodec;
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            codec.encode(FieldValue::Timestamp(ts)),
            json!("2024-03-01T12:30:00Z")
        );
    }

    #[test]
    fn test_decimal_encodes_as_float() {
        let codec = JsonCodec;
        assert_eq!(codec.encode(FieldValue::Decimal("19.99".into())), json!(19.99));
        // Unparseable digits fall back to null rather than failing the request
        assert_eq!(codec.encode(FieldValue::Decimal("not-a-number".into())), Value::Null);
    }

    #[test]
    fn test_unrepresentable_values_encode_as_null() {
        let codec = JsonCodec;
        assert_eq!(codec.encode(FieldValue::Bytes(vec![1, 2, 3])), Value::Null);
        assert_eq!(codec.encode(FieldValue::Float(f64::NAN)), Value::Null);
    }

    #[test]
    fn test_json_passthrough() {
        let codec = JsonCodec;
        let nested = json!({"a": [1, 2, 3]});
        assert_eq!(codec.encode(FieldValue::Json(nested.clone())), nested);
    }

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(FieldValue::from(json!(7)), FieldValue::Int(7));
        assert_eq!(FieldValue::from(json!(1.5)), FieldValue::Float(1.5));
        assert_eq!(FieldValue::from(json!("x")), FieldValue::Text("x".into()));
        assert_eq!(
            FieldValue::from(json!([1])),
            FieldValue::Json(json!([1]))
        );
    }
}
