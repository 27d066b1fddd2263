//! Continuous (`cbg`) and self-monitored (`smbg`) blood glucose readings
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::blood_glucose;
use crate::common::Common;
use crate::datum::{DataNormalizer, Datum, WireObject};
use glyco_structure::{ObjectParser, Origin, Validator};
use serde_json::{Map, Value};
use std::any::Any;

pub const TYPE_CBG: &str = "cbg";
pub const TYPE_SMBG: &str = "smbg";

pub const SUB_TYPE_MANUAL: &str = "manual";
pub const SUB_TYPE_LINKED: &str = "linked";

pub const SMBG_SUB_TYPES: &[&str] = &[SUB_TYPE_LINKED, SUB_TYPE_MANUAL];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlucoseKind {
    Continuous,
    SelfMonitored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glucose {
    pub kind: GlucoseKind,
    pub common: Common,
    pub units: Option<String>,
    pub value: Option<f64>,
    /// Only read for self-monitored readings
    pub sub_type: Option<String>,
}

impl Glucose {
    pub fn new(kind: GlucoseKind) -> Self {
        Self {
            kind,
            common: Common::default(),
            units: None,
            value: None,
            sub_type: None,
        }
    }

    pub fn create_continuous() -> Box<dyn Datum> {
        Box::new(Self::new(GlucoseKind::Continuous))
    }

    pub fn create_self_monitored() -> Box<dyn Datum> {
        Box::new(Self::new(GlucoseKind::SelfMonitored))
    }
}

/// Validate a `units`/`value` pair whose range depends on the units
pub(crate) fn validate_value(validator: &Validator, units: Option<&str>, key: &str, value: Option<f64>) {
    let value = validator.float(key, value);
    if let Some((minimum, maximum)) = blood_glucose::value_range(units) {
        value.in_range(minimum, maximum);
    }
}

/// Convert `values` to mmol/L in place and rewrite `units`, for external data only
pub(crate) fn normalize_units(
    normalizer: &DataNormalizer,
    units: &mut Option<String>,
    values: &mut [&mut Option<f64>],
) {
    if normalizer.origin() != Origin::External {
        return;
    }
    let Some(current) = units.as_deref() else {
        return;
    };
    for value in values.iter_mut() {
        if let Some(v) = value.as_mut() {
            *v = blood_glucose::to_mmol_l(*v, current);
        }
    }
    *units = Some(blood_glucose::MMOL_L.to_string());
}

impl Datum for Glucose {
    fn type_name(&self) -> &str {
        match self.kind {
            GlucoseKind::Continuous => TYPE_CBG,
            GlucoseKind::SelfMonitored => TYPE_SMBG,
        }
    }

    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }

    fn parse(&mut self, parser: &mut ObjectParser<'_>) {
        self.common.parse(parser);
        self.units = parser.string("units");
        self.value = parser.float("value");
        if self.kind == GlucoseKind::SelfMonitored {
            self.sub_type = parser.string("subType");
        }
    }

    fn validate(&self, validator: &Validator) {
        self.common.validate(validator);

        validator
            .string("units", self.units.as_deref())
            .exists()
            .one_of(blood_glucose::UNITS);
        validator.float("value", self.value).exists();
        validate_value(validator, self.units.as_deref(), "value", self.value);

        if self.kind == GlucoseKind::SelfMonitored {
            validator
                .string("subType", self.sub_type.as_deref())
                .one_of(SMBG_SUB_TYPES);
        }
    }

    fn normalize(&mut self, normalizer: &DataNormalizer) {
        self.common.normalize(normalizer);
        normalize_units(normalizer, &mut self.units, &mut [&mut self.value]);
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::new(self.type_name());
        self.common.write(&mut object);
        object
            .with("units", self.units.clone())
            .with("value", self.value)
            .with("subType", self.sub_type.clone())
            .build()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
