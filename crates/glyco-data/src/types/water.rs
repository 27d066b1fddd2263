//! Water intake
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::common::Common;
use crate::datum::{DataNormalizer, Datum, WireObject};
use glyco_structure::{error, ObjectParser, Validatable, Validator};
use serde_json::{Map, Value};
use std::any::Any;

pub const TYPE: &str = "water";

pub const UNITS_GALLONS: &str = "gallons";
pub const UNITS_LITERS: &str = "liters";
pub const UNITS_MILLILITERS: &str = "milliliters";
pub const UNITS_OUNCES: &str = "ounces";

pub const UNITS: &[&str] = &[UNITS_GALLONS, UNITS_LITERS, UNITS_MILLILITERS, UNITS_OUNCES];

/// Inclusive value range for `units`, if the units are known
pub fn value_range(units: Option<&str>) -> Option<(f64, f64)> {
    match units? {
        UNITS_GALLONS => Some((0.0, 10.0)),
        UNITS_LITERS => Some((0.0, 50.0)),
        UNITS_MILLILITERS => Some((0.0, 50_000.0)),
        UNITS_OUNCES => Some((0.0, 1_280.0)),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Amount {
    pub units: Option<String>,
    pub value: Option<f64>,
}

impl Amount {
    pub fn parse(parser: &mut ObjectParser<'_>) -> Self {
        Self {
            units: parser.string("units"),
            value: parser.float("value"),
        }
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::default();
        object.insert("units", self.units.clone());
        object.insert("value", self.value);
        object.build()
    }
}

impl Validatable for Amount {
    fn validate(&self, validator: &Validator) {
        validator
            .string("units", self.units.as_deref())
            .exists()
            .one_of(UNITS);
        let value = validator.float("value", self.value).exists();
        if let Some((minimum, maximum)) = value_range(self.units.as_deref()) {
            value.in_range(minimum, maximum);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Water {
    pub common: Common,
    pub amount: Option<Amount>,
}

impl Water {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Box<dyn Datum> {
        Box::new(Self::new())
    }
}

impl Datum for Water {
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
        self.amount = parser.parse_object("amount", Amount::parse);
    }

    fn validate(&self, validator: &Validator) {
        self.common.validate(validator);

        match &self.amount {
            Some(amount) => amount.validate(&validator.with_reference("amount")),
            None => validator
                .with_reference("amount")
                .report_error(error::value_not_exists()),
        }
    }

    fn normalize(&mut self, normalizer: &DataNormalizer) {
        self.common.normalize(normalizer);
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::new(TYPE);
        self.common.write(&mut object);
        object
            .with(
                "amount",
                self.amount.as_ref().map(|amount| Value::Object(amount.to_object())),
            )
            .build()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
