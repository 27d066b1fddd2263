//! Parser over a JSON array
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use super::{
    as_bool, as_float, as_int, as_object, as_object_array, as_string, as_string_array, as_time,
    ObjectParser,
};
use crate::base::{Base, Origin};
use crate::error;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Extracts typed elements from one JSON array by index, remembering which
/// indices were read
#[derive(Debug, Clone)]
pub struct ArrayParser<'a> {
    base: Base,
    array: Option<&'a [Value]>,
    parsed: BTreeSet<usize>,
}

impl<'a> ArrayParser<'a> {
    pub fn new(base: Base, array: Option<&'a [Value]>) -> Self {
        Self {
            base,
            array,
            parsed: BTreeSet::new(),
        }
    }

    /// Parser over `value`, reporting `type-not-array` if it is anything else
    pub fn from_value(base: Base, value: &'a Value) -> Self {
        let array = match value {
            Value::Array(array) => Some(array.as_slice()),
            other => {
                base.report_error(error::type_not_array(other));
                None
            }
        };
        Self::new(base, array)
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    pub fn with_meta(self, meta: Value) -> Self {
        Self {
            base: self.base.with_meta(meta),
            ..self
        }
    }

    pub fn array_value(&self) -> Option<&'a [Value]> {
        self.array
    }

    pub fn len(&self) -> usize {
        self.array.map_or(0, <[Value]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices present in the array that no extraction has consumed yet
    pub fn unparsed_indices(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|index| !self.parsed.contains(index))
            .collect()
    }

    /// Mark `index` as consumed without extracting it
    pub fn mark_parsed(&mut self, index: usize) {
        if index < self.len() {
            self.parsed.insert(index);
        }
    }

    fn take(&mut self, index: usize) -> Option<&'a Value> {
        let value = self.array?.get(index)?;
        self.parsed.insert(index);
        Some(value)
    }

    pub fn value(&mut self, index: usize) -> Option<Value> {
        self.take(index).cloned()
    }

    pub fn bool(&mut self, index: usize) -> Option<bool> {
        let value = self.take(index)?;
        as_bool(&self.base.with_reference(index), value)
    }

    pub fn int(&mut self, index: usize) -> Option<i64> {
        let value = self.take(index)?;
        as_int(&self.base.with_reference(index), value)
    }

    pub fn float(&mut self, index: usize) -> Option<f64> {
        let value = self.take(index)?;
        as_float(&self.base.with_reference(index), value)
    }

    pub fn string(&mut self, index: usize) -> Option<String> {
        let value = self.take(index)?;
        as_string(&self.base.with_reference(index), value)
    }

    pub fn string_array(&mut self, index: usize) -> Option<Vec<String>> {
        let value = self.take(index)?;
        as_string_array(&self.base.with_reference(index), value)
    }

    pub fn time(&mut self, index: usize, layout: &str) -> Option<DateTime<Utc>> {
        let value = self.take(index)?;
        as_time(&self.base.with_reference(index), value, layout)
    }

    pub fn object(&mut self, index: usize) -> Option<Map<String, Value>> {
        let value = self.take(index)?;
        as_object(&self.base.with_reference(index), value)
    }

    pub fn object_array(&mut self, index: usize) -> Option<Vec<Map<String, Value>>> {
        let value = self.take(index)?;
        as_object_array(&self.base.with_reference(index), value)
    }

    /// Parser scoped to the element at `index`
    ///
    /// A non-object element is reported as `type-not-object` at that index.
    pub fn with_reference_object_parser(&mut self, index: usize) -> ObjectParser<'a> {
        let base = self.base.with_reference(index);
        match self.take(index) {
            Some(value) => ObjectParser::from_value(base, value),
            None => ObjectParser::new(base, None),
        }
    }

    pub fn with_reference_array_parser(&mut self, index: usize) -> ArrayParser<'a> {
        let base = self.base.with_reference(index);
        match self.take(index) {
            Some(value) => ArrayParser::from_value(base, value),
            None => ArrayParser::new(base, None),
        }
    }

    /// Report one `not-parsed` error for every index nothing consumed
    pub fn process_not_parsed(&self) {
        for index in self.unparsed_indices() {
            self.base.with_reference(index).report_error(error::not_parsed());
        }
    }
}
