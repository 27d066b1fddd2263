//! Typed extraction from generic JSON values
//!
//! [`ObjectParser`] and [`ArrayParser`] pull typed values out of a decoded
//! `serde_json::Value` by key or index. A lookup has three outcomes:
//!
//! - present and well typed: `Some(value)`, and the key or index is marked
//!   consumed
//! - present but mistyped: a type error is reported at the key and `None`
//!   is returned; the key still counts as consumed
//! - absent: `None`, nothing reported
//!
//! Once a record has pulled every field it knows about,
//! `process_not_parsed` reports each leftover key or index as `not-parsed`.
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

pub mod array;
pub mod object;

pub use array::ArrayParser;
pub use object::ObjectParser;

use crate::base::Base;
use crate::error;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// RFC 3339 timestamps, with or without fractional seconds
pub const RFC3339: &str = "%+";

/// Local device clock time without an offset
pub const DEVICE_TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse `value` with a chrono format string
///
/// Layouts without an offset are read as UTC.
pub fn parse_time(value: &str, layout: &str) -> Option<DateTime<Utc>> {
    if layout == RFC3339 {
        return DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|time| time.with_timezone(&Utc));
    }

    DateTime::parse_from_str(value, layout)
        .map(|time| time.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, layout)
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}

// Each conversion below receives a base already scoped to the value's reference.

pub(crate) fn as_bool(base: &Base, value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => {
            base.report_error(error::type_not_bool(other));
            None
        }
    }
}

pub(crate) fn as_int(base: &Base, value: &Value) -> Option<i64> {
    let int = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    if int.is_none() {
        base.report_error(error::type_not_int(value));
    }
    int
}

pub(crate) fn as_float(base: &Base, value: &Value) -> Option<f64> {
    match value.as_f64() {
        Some(float) => Some(float),
        None => {
            base.report_error(error::type_not_float(value));
            None
        }
    }
}

pub(crate) fn as_string(base: &Base, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => {
            base.report_error(error::type_not_string(other));
            None
        }
    }
}

pub(crate) fn as_string_array(base: &Base, value: &Value) -> Option<Vec<String>> {
    let Value::Array(elements) = value else {
        base.report_error(error::type_not_array(value));
        return None;
    };

    let mut strings = Vec::with_capacity(elements.len());
    let mut valid = true;
    for (index, element) in elements.iter().enumerate() {
        match as_string(&base.with_reference(index), element) {
            Some(s) => strings.push(s),
            None => valid = false,
        }
    }
    valid.then_some(strings)
}

pub(crate) fn as_time(base: &Base, value: &Value, layout: &str) -> Option<DateTime<Utc>> {
    let s = as_string(base, value)?;
    let time = parse_time(&s, layout);
    if time.is_none() {
        base.report_error(error::value_not_time(&s, layout));
    }
    time
}

pub(crate) fn as_object(base: &Base, value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(object) => Some(object.clone()),
        other => {
            base.report_error(error::type_not_object(other));
            None
        }
    }
}

pub(crate) fn as_object_array(base: &Base, value: &Value) -> Option<Vec<Map<String, Value>>> {
    let Value::Array(elements) = value else {
        base.report_error(error::type_not_array(value));
        return None;
    };

    let mut objects = Vec::with_capacity(elements.len());
    let mut valid = true;
    for (index, element) in elements.iter().enumerate() {
        match as_object(&base.with_reference(index), element) {
            Some(object) => objects.push(object),
            None => valid = false,
        }
    }
    valid.then_some(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::Origin;
    use chrono::Timelike;
    use serde_json::json;

    #[test]
    fn test_parse_time_rfc3339() {
        let time = parse_time("2017-02-06T02:37:46.123Z", RFC3339).unwrap();
        assert_eq!(time.timestamp(), 1_486_348_666);
        assert_eq!(time.nanosecond(), 123_000_000);

        let offset = parse_time("2017-02-06T10:37:46+08:00", RFC3339).unwrap();
        assert_eq!(offset.timestamp(), 1_486_348_666);

        assert!(parse_time("2017-02-06 02:37", RFC3339).is_none());
    }

    #[test]
    fn test_parse_time_without_offset() {
        let time = parse_time("2017-02-06T02:37:46", DEVICE_TIME_LAYOUT).unwrap();
        assert_eq!(time.timestamp(), 1_486_348_666);
        assert!(parse_time("2017-02-06", DEVICE_TIME_LAYOUT).is_none());
    }

    #[test]
    fn test_as_int_accepts_integral_floats() {
        let base = Base::new(Origin::External);
        assert_eq!(as_int(&base, &json!(28800000)), Some(28_800_000));
        assert_eq!(as_int(&base, &json!(5.0)), Some(5));
        assert!(!base.has_error());

        assert_eq!(as_int(&base, &json!(1.5)), None);
        assert_eq!(as_int(&base, &json!("5")), None);
        let errors = base.error().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == ErrorCode::TypeNotInt));
    }

    #[test]
    fn test_as_string_array_reports_each_bad_element() {
        let base = Base::new(Origin::External).with_reference("tags");
        assert_eq!(as_string_array(&base, &json!(["a", 1, "b", false])), None);

        let errors = base.error().unwrap();
        let pointers: Vec<_> = errors.iter().map(|e| e.pointer()).collect();
        assert_eq!(pointers, vec!["/tags/1", "/tags/3"]);
    }

    #[test]
    fn test_as_time_reports_unparsable_string() {
        let base = Base::new(Origin::External);
        assert!(as_time(&base, &json!("yesterday"), RFC3339).is_none());
        assert_eq!(base.error().unwrap().as_slice()[0].code, ErrorCode::ValueNotTime);
    }
}
