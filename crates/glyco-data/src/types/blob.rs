//! Open-ended records kept verbatim
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::common::{Common, INJECTED_KEYS};
use crate::datum::{DataNormalizer, Datum, WireObject};
use glyco_structure::{error, ObjectParser, Origin, Validator};
use serde_json::{Map, Value};
use std::any::Any;

pub const TYPE: &str = "blob";

/// Largest serialized payload accepted from external callers
pub const PAYLOAD_SIZE_MAXIMUM: usize = 64 * 1024;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blob {
    pub common: Common,
    /// Every key the common fields did not claim
    pub payload: Map<String, Value>,
}

impl Blob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Box<dyn Datum> {
        Box::new(Self::new())
    }

    pub fn payload_size(&self) -> usize {
        serde_json::to_vec(&self.payload).map_or(0, |bytes| bytes.len())
    }
}

impl Datum for Blob {
    fn type_name(&self) -> &str {
        TYPE
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn parse(&mut self, parser: &mut ObjectParser<'_>) {
        self.common.parse(parser);
        for key in parser.unparsed_keys() {
            if INJECTED_KEYS.contains(&key) {
                parser.mark_parsed(key);
                parser
                    .base()
                    .with_reference(key)
                    .report_error(error::not_parsed());
                continue;
            }
            if let Some(value) = parser.value(key) {
                self.payload.insert(key.to_string(), value);
            }
        }
    }

    fn validate(&self, validator: &Validator) {
        self.common.validate(validator);

        if validator.origin() == Origin::External {
            let size = self.payload_size();
            if size > PAYLOAD_SIZE_MAXIMUM {
                validator.report_error(error::length_not_less_than_or_equal_to(
                    size,
                    PAYLOAD_SIZE_MAXIMUM,
                ));
            }
        }
    }

    fn normalize(&mut self, normalizer: &DataNormalizer) {
        self.common.normalize(normalizer);
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::new(TYPE);
        self.common.write(&mut object);
        object.extend(self.payload.clone());
        object.build()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
