//! Parser over a JSON object
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use super::{
    as_bool, as_float, as_int, as_object, as_object_array, as_string, as_string_array, as_time,
    ArrayParser,
};
use crate::base::{Base, Origin};
use crate::error;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Extracts typed fields from one JSON object, remembering which keys were read
#[derive(Debug)]
pub struct ObjectParser<'a> {
    base: Base,
    object: Option<&'a Map<String, Value>>,
    parsed: HashSet<String>,
}

impl<'a> ObjectParser<'a> {
    pub fn new(base: Base, object: Option<&'a Map<String, Value>>) -> Self {
        Self {
            base,
            object,
            parsed: HashSet::new(),
        }
    }

    /// Parser over `value`, reporting `type-not-object` if it is anything else
    pub fn from_value(base: Base, value: &'a Value) -> Self {
        let object = match value {
            Value::Object(object) => Some(object),
            other => {
                base.report_error(error::type_not_object(other));
                None
            }
        };
        Self::new(base, object)
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    /// Swap in a new meta tag, keeping the consumed-key bookkeeping
    pub fn with_meta(self, meta: Value) -> Self {
        Self {
            base: self.base.with_meta(meta),
            ..self
        }
    }

    /// The underlying object, if the parsed value was one
    pub fn object_value(&self) -> Option<&'a Map<String, Value>> {
        self.object
    }

    pub fn exists(&self, key: &str) -> bool {
        self.object.is_some_and(|object| object.contains_key(key))
    }

    /// Keys present in the object that no extraction has consumed yet
    pub fn unparsed_keys(&self) -> Vec<&'a str> {
        self.object
            .map(|object| {
                object
                    .keys()
                    .filter(|key| !self.parsed.contains(key.as_str()))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Mark `key` as consumed without extracting it
    pub fn mark_parsed(&mut self, key: &str) {
        if self.exists(key) {
            self.parsed.insert(key.to_string());
        }
    }

    fn take(&mut self, key: &str) -> Option<&'a Value> {
        let value = self.object?.get(key)?;
        self.parsed.insert(key.to_string());
        Some(value)
    }

    /// The raw JSON value stored at `key`, for open-ended content
    pub fn value(&mut self, key: &str) -> Option<Value> {
        self.take(key).cloned()
    }

    pub fn bool(&mut self, key: &str) -> Option<bool> {
        let value = self.take(key)?;
        as_bool(&self.base.with_reference(key), value)
    }

    pub fn int(&mut self, key: &str) -> Option<i64> {
        let value = self.take(key)?;
        as_int(&self.base.with_reference(key), value)
    }

    pub fn float(&mut self, key: &str) -> Option<f64> {
        let value = self.take(key)?;
        as_float(&self.base.with_reference(key), value)
    }

    pub fn string(&mut self, key: &str) -> Option<String> {
        let value = self.take(key)?;
        as_string(&self.base.with_reference(key), value)
    }

    pub fn string_array(&mut self, key: &str) -> Option<Vec<String>> {
        let value = self.take(key)?;
        as_string_array(&self.base.with_reference(key), value)
    }

    /// A time encoded as a string in `layout` (see [`parse_time`](super::parse_time))
    pub fn time(&mut self, key: &str, layout: &str) -> Option<DateTime<Utc>> {
        let value = self.take(key)?;
        as_time(&self.base.with_reference(key), value, layout)
    }

    pub fn object(&mut self, key: &str) -> Option<Map<String, Value>> {
        let value = self.take(key)?;
        as_object(&self.base.with_reference(key), value)
    }

    pub fn object_array(&mut self, key: &str) -> Option<Vec<Map<String, Value>>> {
        let value = self.take(key)?;
        as_object_array(&self.base.with_reference(key), value)
    }

    /// Parser scoped to the object stored at `key`
    ///
    /// An absent key yields a parser over nothing; a non-object value is
    /// reported here.
    pub fn with_reference_object_parser(&mut self, key: &str) -> ObjectParser<'a> {
        let base = self.base.with_reference(key);
        match self.take(key) {
            Some(value) => ObjectParser::from_value(base, value),
            None => ObjectParser::new(base, None),
        }
    }

    /// Parser scoped to the array stored at `key`
    pub fn with_reference_array_parser(&mut self, key: &str) -> ArrayParser<'a> {
        let base = self.base.with_reference(key);
        match self.take(key) {
            Some(value) => ArrayParser::from_value(base, value),
            None => ArrayParser::new(base, None),
        }
    }

    /// Parse the nested object at `key` with `parse`, rejecting stray keys
    ///
    /// Returns `None` when the key is absent or not an object.
    pub fn parse_object<T, F>(&mut self, key: &str, parse: F) -> Option<T>
    where
        F: FnOnce(&mut ObjectParser<'a>) -> T,
    {
        if !self.exists(key) {
            return None;
        }
        let mut parser = self.with_reference_object_parser(key);
        parser.object_value()?;
        let parsed = parse(&mut parser);
        parser.process_not_parsed();
        Some(parsed)
    }

    /// Parse every object of the array at `key` with `parse`
    ///
    /// Elements that are not objects are reported and skipped.
    pub fn parse_object_array<T, F>(&mut self, key: &str, mut parse: F) -> Option<Vec<T>>
    where
        F: FnMut(&mut ObjectParser<'a>) -> T,
    {
        if !self.exists(key) {
            return None;
        }
        let mut array = self.with_reference_array_parser(key);
        array.array_value()?;

        let mut parsed = Vec::with_capacity(array.len());
        for index in 0..array.len() {
            let mut parser = array.with_reference_object_parser(index);
            if parser.object_value().is_some() {
                parsed.push(parse(&mut parser));
                parser.process_not_parsed();
            }
        }
        Some(parsed)
    }

    /// Report one `not-parsed` error for every key nothing consumed
    pub fn process_not_parsed(&self) {
        for key in self.unparsed_keys() {
            self.base.with_reference(key).report_error(error::not_parsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn codes_at(base: &Base) -> Vec<(String, ErrorCode)> {
        base.error()
            .map(|errors| errors.iter().map(|e| (e.pointer(), e.code)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_present_absent_and_mistyped() {
        let value = json!({"rate": 1.75, "deliveryType": 3});
        let object = value.as_object().unwrap();
        let mut parser = ObjectParser::new(Base::new(Origin::External), Some(object));

        assert_eq!(parser.float("rate"), Some(1.75));
        assert_eq!(parser.string("scheduleName"), None);
        assert_eq!(parser.string("deliveryType"), None);

        assert_eq!(
            codes_at(parser.base()),
            vec![("/deliveryType".to_string(), ErrorCode::TypeNotString)]
        );

        // A mistyped key still counts as consumed.
        parser.process_not_parsed();
        assert_eq!(parser.base().error_count(), 1);
    }

    #[test]
    fn test_process_not_parsed_reports_each_extra_key() {
        let value = json!({"type": "water", "colour": "blue", "extra": 1});
        let mut parser = ObjectParser::from_value(Base::new(Origin::External), &value);
        parser.string("type");
        parser.process_not_parsed();

        let mut found = codes_at(parser.base());
        found.sort();
        assert_eq!(
            found,
            vec![
                ("/colour".to_string(), ErrorCode::NotParsed),
                ("/extra".to_string(), ErrorCode::NotParsed),
            ]
        );
    }

    #[test]
    fn test_null_is_type_mismatch() {
        let value = json!({"rate": null});
        let mut parser = ObjectParser::from_value(Base::default(), &value);
        assert_eq!(parser.float("rate"), None);
        assert_eq!(
            codes_at(parser.base()),
            vec![("/rate".to_string(), ErrorCode::TypeNotFloat)]
        );
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let value = json!([1, 2]);
        let parser = ObjectParser::from_value(Base::default().with_reference(4usize), &value);
        assert!(parser.object_value().is_none());
        assert_eq!(
            codes_at(parser.base()),
            vec![("/4".to_string(), ErrorCode::TypeNotObject)]
        );
    }

    #[test]
    fn test_nested_parser_extends_reference() {
        let value = json!({"amount": {"units": "liters", "value": "lots"}});
        let mut parser = ObjectParser::from_value(Base::default(), &value);

        let mut amount = parser.with_reference_object_parser("amount");
        assert_eq!(amount.string("units").as_deref(), Some("liters"));
        assert_eq!(amount.float("value"), None);
        amount.process_not_parsed();
        parser.process_not_parsed();

        assert_eq!(
            codes_at(parser.base()),
            vec![("/amount/value".to_string(), ErrorCode::TypeNotFloat)]
        );
    }

    #[test]
    fn test_parse_object_helper() {
        let value = json!({"amount": {"units": "liters", "value": 2, "stray": true}});
        let mut parser = ObjectParser::from_value(Base::default(), &value);

        let parsed = parser.parse_object("amount", |p| (p.string("units"), p.float("value")));
        assert_eq!(parsed, Some((Some("liters".to_string()), Some(2.0))));
        assert_eq!(parser.parse_object("missing", |p| p.string("units")), None);
        assert_eq!(
            codes_at(parser.base()),
            vec![("/amount/stray".to_string(), ErrorCode::NotParsed)]
        );
    }

    #[test]
    fn test_parse_object_array_helper() {
        let value = json!({"associations": [{"type": "url"}, 7, {"type": "datum"}]});
        let mut parser = ObjectParser::from_value(Base::default(), &value);

        let kinds = parser
            .parse_object_array("associations", |p| p.string("type"))
            .unwrap();
        assert_eq!(kinds, vec![Some("url".to_string()), Some("datum".to_string())]);
        assert_eq!(
            codes_at(parser.base()),
            vec![("/associations/1".to_string(), ErrorCode::TypeNotObject)]
        );
    }

    #[test]
    fn test_time_extraction() {
        let value = json!({"time": "2020-01-02T03:04:05Z", "bad": "soon"});
        let mut parser = ObjectParser::from_value(Base::default(), &value);
        assert!(parser.time("time", crate::parser::RFC3339).is_some());
        assert!(parser.time("bad", crate::parser::RFC3339).is_none());
        assert_eq!(
            codes_at(parser.base()),
            vec![("/bad".to_string(), ErrorCode::ValueNotTime)]
        );
    }

    #[test]
    fn test_unparsed_keys_and_mark_parsed() {
        let value = json!({"a": 1, "b": 2});
        let mut parser = ObjectParser::from_value(Base::default(), &value);
        parser.int("a");
        assert_eq!(parser.unparsed_keys(), vec!["b"]);
        parser.mark_parsed("b");
        assert!(parser.unparsed_keys().is_empty());
        parser.process_not_parsed();
        assert!(!parser.base().has_error());
    }
}
