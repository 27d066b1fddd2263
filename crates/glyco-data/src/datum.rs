//! The record trait every device data type implements
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::common::Common;
use glyco_structure::{Normalizer, ObjectParser, Validator};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

/// Normalizer whose side collection receives derived records
pub type DataNormalizer = Normalizer<Box<dyn Datum>>;

/// A typed device record
///
/// Records are created empty by the registry, then filled in three passes:
/// `parse` reads the payload, `validate` checks constraints, and
/// `normalize` canonicalizes a record that validated cleanly.
pub trait Datum: Any + fmt::Debug {
    /// Discriminator written to and read from the `type` key
    fn type_name(&self) -> &str;

    fn common(&self) -> &Common;

    fn common_mut(&mut self) -> &mut Common;

    fn parse(&mut self, parser: &mut ObjectParser<'_>);

    fn validate(&self, validator: &Validator);

    fn normalize(&mut self, normalizer: &DataNormalizer);

    /// Wire form, including `type`; injected context is never written
    fn to_object(&self) -> Map<String, Value>;

    fn as_any(&self) -> &dyn Any;
}

impl dyn Datum {
    pub fn downcast_ref<T: Datum>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }
}

/// Builds a wire object key by key, skipping absent values
#[derive(Debug, Default)]
pub struct WireObject {
    object: Map<String, Value>,
}

impl WireObject {
    pub fn new(type_name: &str) -> Self {
        let mut object = Map::new();
        object.insert("type".to_string(), Value::from(type_name));
        Self { object }
    }

    pub fn with<T: Into<Value>>(mut self, key: &str, value: Option<T>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<T: Into<Value>>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.object.insert(key.to_string(), value.into());
        }
    }

    pub fn extend(&mut self, entries: Map<String, Value>) {
        self.object.extend(entries);
    }

    pub fn build(self) -> Map<String, Value> {
        self.object
    }
}
