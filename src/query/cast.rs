//! Value casting
//!
//! Converts raw query text into the semantic type declared for the target
//! column. Casting is total for text and partial for everything else.

use super::types::Value;
use crate::error::FilterError;
use crate::schema::SemanticType;
use crate::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Casts raw query values to typed values
pub struct ValueCaster;

impl ValueCaster {
    /// Cast `raw` to `target`; `field` is only used for error reporting
    pub fn cast(field: &str, raw: &str, target: SemanticType) -> Result<Value> {
        let fail = || FilterError::Cast {
            field: field.to_string(),
            value: raw.to_string(),
            target,
        };

        match target {
            SemanticType::Text => Ok(Value::Text(raw.to_string())),
            SemanticType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| fail()),
            SemanticType::Float => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Value::Float(v)),
                _ => Err(fail()),
            },
            SemanticType::Boolean => parse_bool(raw.trim()).map(Value::Boolean).ok_or_else(fail),
            SemanticType::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| fail()),
            SemanticType::DateTime => parse_datetime(raw.trim())
                .map(Value::DateTime)
                .ok_or_else(fail),
            SemanticType::Uuid => Uuid::parse_str(raw.trim())
                .map(Value::Uuid)
                .map_err(|_| fail()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Accepts RFC 3339, naive ISO date-times, bare dates (start of day) and Unix seconds
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date.and_time(NaiveTime::MIN));
    }

    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cast_text_is_total() {
        let value = ValueCaster::cast("name", "te?t*", SemanticType::Text).unwrap();
        assert_eq!(value, Value::Text("te?t*".to_string()));
    }

    #[test]
    fn test_cast_integer() {
        assert_eq!(
            ValueCaster::cast("age", "40", SemanticType::Integer).unwrap(),
            Value::Integer(40)
        );
        assert_eq!(
            ValueCaster::cast("age", " -3 ", SemanticType::Integer).unwrap(),
            Value::Integer(-3)
        );

        let err = ValueCaster::cast("age", "forty", SemanticType::Integer).unwrap_err();
        match err {
            FilterError::Cast {
                field,
                value,
                target,
            } => {
                assert_eq!(field, "age");
                assert_eq!(value, "forty");
                assert_eq!(target, SemanticType::Integer);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_cast_float_rejects_non_finite() {
        assert_eq!(
            ValueCaster::cast("score", "2.5", SemanticType::Float).unwrap(),
            Value::Float(2.5)
        );
        assert!(ValueCaster::cast("score", "NaN", SemanticType::Float).is_err());
        assert!(ValueCaster::cast("score", "inf", SemanticType::Float).is_err());
    }

    #[test]
    fn test_cast_boolean_spellings() {
        for raw in ["true", "True", "TRUE", "t", "yes", "on", "1"] {
            assert_eq!(
                ValueCaster::cast("is_admin", raw, SemanticType::Boolean).unwrap(),
                Value::Boolean(true),
                "{}",
                raw
            );
        }
        for raw in ["false", "False", "f", "no", "off", "0"] {
            assert_eq!(
                ValueCaster::cast("is_admin", raw, SemanticType::Boolean).unwrap(),
                Value::Boolean(false),
                "{}",
                raw
            );
        }
        assert!(ValueCaster::cast("is_admin", "maybe", SemanticType::Boolean).is_err());
    }

    #[test]
    fn test_cast_date() {
        assert_eq!(
            ValueCaster::cast("born", "2024-02-29", SemanticType::Date).unwrap(),
            Value::Date(ymd(2024, 2, 29))
        );
        assert!(ValueCaster::cast("born", "2023-02-29", SemanticType::Date).is_err());
    }

    #[test]
    fn test_cast_datetime_date_is_start_of_day() {
        let value = ValueCaster::cast("created_at", "2024-05-01", SemanticType::DateTime).unwrap();
        assert_eq!(
            value,
            Value::DateTime(ymd(2024, 5, 1).and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_cast_datetime_formats() {
        let expected = ymd(2024, 5, 1).and_hms_opt(12, 30, 0).unwrap();
        for raw in [
            "2024-05-01T12:30:00",
            "2024-05-01 12:30:00",
            "2024-05-01T14:30:00+02:00",
            "2024-05-01T12:30:00Z",
            "1714566600",
        ] {
            assert_eq!(
                ValueCaster::cast("created_at", raw, SemanticType::DateTime).unwrap(),
                Value::DateTime(expected),
                "{}",
                raw
            );
        }
        assert!(ValueCaster::cast("created_at", "yesterday", SemanticType::DateTime).is_err());
    }

    #[test]
    fn test_cast_uuid() {
        let raw = "8614b913-6f4f-4105-8616-761f55f31f44";
        let value = ValueCaster::cast("id", raw, SemanticType::Uuid).unwrap();
        assert_eq!(value, Value::Uuid(Uuid::parse_str(raw).unwrap()));
        assert!(ValueCaster::cast("id", "not-a-uuid", SemanticType::Uuid).is_err());
    }
}
