//! Bolus insulin delivery
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::common::Common;
use crate::datum::{DataNormalizer, Datum, WireObject};
use glyco_structure::{ObjectParser, Validator};
use serde_json::{Map, Value};
use std::any::Any;

pub const TYPE: &str = "bolus";

pub const SUB_TYPE_NORMAL: &str = "normal";
pub const SUB_TYPE_SQUARE: &str = "square";
pub const SUB_TYPE_DUAL_SQUARE: &str = "dual/square";

pub const SUB_TYPES: &[&str] = &[SUB_TYPE_NORMAL, SUB_TYPE_SQUARE, SUB_TYPE_DUAL_SQUARE];

pub const NORMAL_MINIMUM: f64 = 0.0;
pub const NORMAL_MAXIMUM: f64 = 100.0;
pub const EXTENDED_MINIMUM: f64 = 0.0;
pub const EXTENDED_MAXIMUM: f64 = 100.0;
pub const DURATION_MINIMUM: i64 = 0;
pub const DURATION_MAXIMUM: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bolus {
    pub common: Common,
    pub sub_type: Option<String>,
    pub normal: Option<f64>,
    pub expected_normal: Option<f64>,
    pub extended: Option<f64>,
    pub duration: Option<i64>,
}

impl Bolus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Box<dyn Datum> {
        Box::new(Self::new())
    }

    fn validate_normal(&self, validator: &Validator) {
        validator
            .float("normal", self.normal)
            .exists()
            .in_range(NORMAL_MINIMUM, NORMAL_MAXIMUM);
        let expected_normal = validator.float("expectedNormal", self.expected_normal);
        match self.normal {
            Some(normal) if (NORMAL_MINIMUM..=NORMAL_MAXIMUM).contains(&normal) => {
                expected_normal.in_range(normal, NORMAL_MAXIMUM);
            }
            _ => {
                expected_normal.in_range(NORMAL_MINIMUM, NORMAL_MAXIMUM);
            }
        }
    }

    fn validate_extended(&self, validator: &Validator) {
        validator
            .float("extended", self.extended)
            .exists()
            .in_range(EXTENDED_MINIMUM, EXTENDED_MAXIMUM);
        validator
            .int("duration", self.duration)
            .exists()
            .in_range(DURATION_MINIMUM, DURATION_MAXIMUM);
    }
}

impl Datum for Bolus {
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
        self.sub_type = parser.string("subType");
        self.normal = parser.float("normal");
        self.expected_normal = parser.float("expectedNormal");
        self.extended = parser.float("extended");
        self.duration = parser.int("duration");
    }

    fn validate(&self, validator: &Validator) {
        self.common.validate(validator);

        validator
            .string("subType", self.sub_type.as_deref())
            .exists()
            .one_of(SUB_TYPES);

        match self.sub_type.as_deref() {
            Some(SUB_TYPE_NORMAL) => {
                self.validate_normal(validator);
                validator.float("extended", self.extended).not_exists();
                validator.int("duration", self.duration).not_exists();
            }
            Some(SUB_TYPE_SQUARE) => {
                validator.float("normal", self.normal).not_exists();
                validator
                    .float("expectedNormal", self.expected_normal)
                    .not_exists();
                self.validate_extended(validator);
            }
            Some(SUB_TYPE_DUAL_SQUARE) => {
                self.validate_normal(validator);
                self.validate_extended(validator);
            }
            _ => {}
        }
    }

    fn normalize(&mut self, normalizer: &DataNormalizer) {
        self.common.normalize(normalizer);
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::new(TYPE);
        self.common.write(&mut object);
        object
            .with("subType", self.sub_type.clone())
            .with("normal", self.normal)
            .with("expectedNormal", self.expected_normal)
            .with("extended", self.extended)
            .with("duration", self.duration)
            .build()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
