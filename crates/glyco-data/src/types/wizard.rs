//! Bolus calculator events
//!
//! A wizard record may reference its bolus by id or embed the full bolus.
//! External data with an embedded bolus is split during normalization: the
//! bolus becomes a derived record of its own and the wizard keeps its id.
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use super::bolus::{self, Bolus};
use super::glucose::{normalize_units, validate_value};
use crate::blood_glucose;
use crate::common::Common;
use crate::datum::{DataNormalizer, Datum, WireObject};
use crate::formats;
use glyco_structure::{ObjectParser, Origin, Validatable, Validator};
use serde_json::{Map, Value};
use std::any::Any;

pub const TYPE: &str = "wizard";

pub const CARB_INPUT_MINIMUM: f64 = 0.0;
pub const CARB_INPUT_MAXIMUM: f64 = 1000.0;
pub const INSULIN_CARB_RATIO_MINIMUM: f64 = 0.0;
pub const INSULIN_CARB_RATIO_MAXIMUM: f64 = 250.0;
pub const INSULIN_ON_BOARD_MINIMUM: f64 = 0.0;
pub const INSULIN_ON_BOARD_MAXIMUM: f64 = 250.0;
pub const RECOMMENDED_CARB_MINIMUM: f64 = 0.0;
pub const RECOMMENDED_CARB_MAXIMUM: f64 = 250.0;
pub const RECOMMENDED_CORRECTION_MINIMUM: f64 = -250.0;
pub const RECOMMENDED_CORRECTION_MAXIMUM: f64 = 250.0;
pub const RECOMMENDED_NET_MINIMUM: f64 = -250.0;
pub const RECOMMENDED_NET_MAXIMUM: f64 = 250.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BgTarget {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl BgTarget {
    pub fn parse(parser: &mut ObjectParser<'_>) -> Self {
        Self {
            low: parser.float("low"),
            high: parser.float("high"),
        }
    }

    fn validate_with_units(&self, validator: &Validator, units: Option<&str>) {
        validator.float("low", self.low).exists();
        validate_value(validator, units, "low", self.low);
        validator.float("high", self.high).exists();
        validate_value(validator, units, "high", self.high);
        if let Some(low) = self.low {
            validator.float("high", self.high).greater_than_or_equal_to(low);
        }
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::default();
        object.insert("low", self.low);
        object.insert("high", self.high);
        object.build()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommended {
    pub carb: Option<f64>,
    pub correction: Option<f64>,
    pub net: Option<f64>,
}

impl Recommended {
    pub fn parse(parser: &mut ObjectParser<'_>) -> Self {
        Self {
            carb: parser.float("carb"),
            correction: parser.float("correction"),
            net: parser.float("net"),
        }
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::default();
        object.insert("carb", self.carb);
        object.insert("correction", self.correction);
        object.insert("net", self.net);
        object.build()
    }
}

impl Validatable for Recommended {
    fn validate(&self, validator: &Validator) {
        validator
            .float("carb", self.carb)
            .in_range(RECOMMENDED_CARB_MINIMUM, RECOMMENDED_CARB_MAXIMUM);
        validator
            .float("correction", self.correction)
            .in_range(RECOMMENDED_CORRECTION_MINIMUM, RECOMMENDED_CORRECTION_MAXIMUM);
        validator
            .float("net", self.net)
            .in_range(RECOMMENDED_NET_MINIMUM, RECOMMENDED_NET_MAXIMUM);
    }
}

/// The `bolus` key: an id string or a full embedded bolus object
#[derive(Debug, Clone, PartialEq)]
pub enum WizardBolus {
    Id(String),
    Embedded {
        bolus_type: Option<String>,
        bolus: Box<Bolus>,
    },
}

impl WizardBolus {
    fn parse(parser: &mut ObjectParser<'_>) -> Option<Self> {
        match parser.object_value()?.get("bolus")? {
            Value::Object(_) => parser.parse_object("bolus", |parser| {
                let bolus_type = parser.string("type");
                let mut bolus = Bolus::new();
                bolus.parse(parser);
                WizardBolus::Embedded {
                    bolus_type,
                    bolus: Box::new(bolus),
                }
            }),
            _ => parser.string("bolus").map(WizardBolus::Id),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            WizardBolus::Id(id) => Value::from(id.as_str()),
            WizardBolus::Embedded { bolus, .. } => Value::Object(bolus.to_object()),
        }
    }
}

impl Validatable for WizardBolus {
    fn validate(&self, validator: &Validator) {
        match self {
            WizardBolus::Id(id) => {
                validator.report_error(formats::validate_id(id).err());
            }
            WizardBolus::Embedded { bolus_type, bolus } => {
                validator
                    .string("type", bolus_type.as_deref())
                    .exists()
                    .equal_to(bolus::TYPE);
                bolus.validate(validator);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wizard {
    pub common: Common,
    pub units: Option<String>,
    pub carb_input: Option<f64>,
    pub bg_input: Option<f64>,
    pub bg_target: Option<BgTarget>,
    pub insulin_carb_ratio: Option<f64>,
    pub insulin_sensitivity: Option<f64>,
    pub insulin_on_board: Option<f64>,
    pub recommended: Option<Recommended>,
    pub bolus: Option<WizardBolus>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Box<dyn Datum> {
        Box::new(Self::new())
    }

    /// Move an embedded bolus out into its own record
    fn extract_bolus(&mut self, normalizer: &DataNormalizer) {
        let Some(WizardBolus::Embedded { bolus, .. }) = self.bolus.take() else {
            return;
        };
        let mut derived = *bolus;
        derived.common.inherit(&self.common);
        derived.normalize(&normalizer.with_reference("bolus"));

        let id = derived.common.id.clone().unwrap_or_else(formats::new_id);
        derived.common.id = Some(id.clone());
        normalizer.add_data(Box::new(derived));
        self.bolus = Some(WizardBolus::Id(id));
    }
}

impl Datum for Wizard {
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
        self.units = parser.string("units");
        self.carb_input = parser.float("carbInput");
        self.bg_input = parser.float("bgInput");
        self.bg_target = parser.parse_object("bgTarget", BgTarget::parse);
        self.insulin_carb_ratio = parser.float("insulinCarbRatio");
        self.insulin_sensitivity = parser.float("insulinSensitivity");
        self.insulin_on_board = parser.float("insulinOnBoard");
        self.recommended = parser.parse_object("recommended", Recommended::parse);
        self.bolus = WizardBolus::parse(parser);
    }

    fn validate(&self, validator: &Validator) {
        self.common.validate(validator);

        let units = self.units.as_deref();
        validator
            .string("units", units)
            .exists()
            .one_of(blood_glucose::UNITS);
        validator
            .float("carbInput", self.carb_input)
            .in_range(CARB_INPUT_MINIMUM, CARB_INPUT_MAXIMUM);
        validate_value(validator, units, "bgInput", self.bg_input);
        if let Some(bg_target) = &self.bg_target {
            bg_target.validate_with_units(&validator.with_reference("bgTarget"), units);
        }
        validator
            .float("insulinCarbRatio", self.insulin_carb_ratio)
            .in_range(INSULIN_CARB_RATIO_MINIMUM, INSULIN_CARB_RATIO_MAXIMUM);
        validate_value(validator, units, "insulinSensitivity", self.insulin_sensitivity);
        validator
            .float("insulinOnBoard", self.insulin_on_board)
            .in_range(INSULIN_ON_BOARD_MINIMUM, INSULIN_ON_BOARD_MAXIMUM);
        validator.validate("recommended", self.recommended.as_ref());
        validator.validate("bolus", self.bolus.as_ref());
    }

    fn normalize(&mut self, normalizer: &DataNormalizer) {
        self.common.normalize(normalizer);

        let (mut low, mut high) = match &self.bg_target {
            Some(target) => (target.low, target.high),
            None => (None, None),
        };
        normalize_units(
            normalizer,
            &mut self.units,
            &mut [
                &mut self.bg_input,
                &mut self.insulin_sensitivity,
                &mut low,
                &mut high,
            ],
        );
        if let Some(target) = &mut self.bg_target {
            target.low = low;
            target.high = high;
        }

        if normalizer.origin() == Origin::External {
            self.extract_bolus(normalizer);
        }
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::new(TYPE);
        self.common.write(&mut object);
        object
            .with("units", self.units.clone())
            .with("carbInput", self.carb_input)
            .with("bgInput", self.bg_input)
            .with(
                "bgTarget",
                self.bg_target.as_ref().map(|target| Value::Object(target.to_object())),
            )
            .with("insulinCarbRatio", self.insulin_carb_ratio)
            .with("insulinSensitivity", self.insulin_sensitivity)
            .with("insulinOnBoard", self.insulin_on_board)
            .with(
                "recommended",
                self.recommended
                    .as_ref()
                    .map(|recommended| Value::Object(recommended.to_object())),
            )
            .with("bolus", self.bolus.as_ref().map(WizardBolus::to_value))
            .build()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
