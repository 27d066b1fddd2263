//! Basal insulin delivery
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::common::Common;
use crate::datum::{DataNormalizer, Datum, WireObject};
use glyco_structure::{error, ObjectParser, Validatable, Validator};
use serde_json::{Map, Value};
use std::any::Any;

pub const TYPE: &str = "basal";

pub const DELIVERY_TYPE_AUTOMATED: &str = "automated";
pub const DELIVERY_TYPE_SCHEDULED: &str = "scheduled";
pub const DELIVERY_TYPE_SUSPEND: &str = "suspend";
pub const DELIVERY_TYPE_TEMP: &str = "temp";

pub const DELIVERY_TYPES: &[&str] = &[
    DELIVERY_TYPE_AUTOMATED,
    DELIVERY_TYPE_SCHEDULED,
    DELIVERY_TYPE_SUSPEND,
    DELIVERY_TYPE_TEMP,
];

/// Delivery types a suppressed basal may have
pub const SUPPRESSED_DELIVERY_TYPES: &[&str] = &[DELIVERY_TYPE_AUTOMATED, DELIVERY_TYPE_SCHEDULED];

pub const RATE_MINIMUM: f64 = 0.0;
pub const RATE_MAXIMUM: f64 = 100.0;
pub const DURATION_MINIMUM: i64 = 0;
pub const DURATION_MAXIMUM: i64 = 7 * 24 * 60 * 60 * 1000;
pub const PERCENT_MINIMUM: f64 = 0.0;
pub const PERCENT_MAXIMUM: f64 = 10.0;

/// The schedule a temporary or suspended basal replaces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suppressed {
    pub basal_type: Option<String>,
    pub delivery_type: Option<String>,
    pub rate: Option<f64>,
    pub schedule_name: Option<String>,
}

impl Suppressed {
    pub fn parse(parser: &mut ObjectParser<'_>) -> Self {
        Self {
            basal_type: parser.string("type"),
            delivery_type: parser.string("deliveryType"),
            rate: parser.float("rate"),
            schedule_name: parser.string("scheduleName"),
        }
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::default();
        object.insert("type", self.basal_type.clone());
        object.insert("deliveryType", self.delivery_type.clone());
        object.insert("rate", self.rate);
        object.insert("scheduleName", self.schedule_name.clone());
        object.build()
    }
}

impl Validatable for Suppressed {
    fn validate(&self, validator: &Validator) {
        validator
            .string("type", self.basal_type.as_deref())
            .exists()
            .equal_to(TYPE);
        validator
            .string("deliveryType", self.delivery_type.as_deref())
            .exists()
            .one_of(SUPPRESSED_DELIVERY_TYPES);
        validator
            .float("rate", self.rate)
            .exists()
            .in_range(RATE_MINIMUM, RATE_MAXIMUM);
        validator
            .string("scheduleName", self.schedule_name.as_deref())
            .not_empty();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basal {
    pub common: Common,
    pub delivery_type: Option<String>,
    pub rate: Option<f64>,
    pub duration: Option<i64>,
    pub expected_duration: Option<i64>,
    pub schedule_name: Option<String>,
    pub percent: Option<f64>,
    pub suppressed: Option<Suppressed>,
}

impl Basal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Box<dyn Datum> {
        Box::new(Self::new())
    }
}

impl Datum for Basal {
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
        self.delivery_type = parser.string("deliveryType");
        self.rate = parser.float("rate");
        self.duration = parser.int("duration");
        self.expected_duration = parser.int("expectedDuration");
        self.schedule_name = parser.string("scheduleName");
        self.percent = parser.float("percent");
        self.suppressed = parser.parse_object("suppressed", Suppressed::parse);
    }

    fn validate(&self, validator: &Validator) {
        self.common.validate(validator);

        validator
            .string("deliveryType", self.delivery_type.as_deref())
            .exists()
            .one_of(DELIVERY_TYPES);
        validator
            .int("duration", self.duration)
            .exists()
            .in_range(DURATION_MINIMUM, DURATION_MAXIMUM);

        let expected_duration = validator.int("expectedDuration", self.expected_duration);
        match self.duration {
            Some(duration) if (DURATION_MINIMUM..=DURATION_MAXIMUM).contains(&duration) => {
                expected_duration.in_range(duration, DURATION_MAXIMUM);
            }
            _ => {
                expected_duration.in_range(DURATION_MINIMUM, DURATION_MAXIMUM);
            }
        }

        let rate = validator.float("rate", self.rate);
        let percent = validator.float("percent", self.percent);
        let schedule_name = validator.string("scheduleName", self.schedule_name.as_deref());

        match self.delivery_type.as_deref() {
            Some(DELIVERY_TYPE_SCHEDULED | DELIVERY_TYPE_AUTOMATED) => {
                rate.exists().in_range(RATE_MINIMUM, RATE_MAXIMUM);
                percent.not_exists();
                schedule_name.not_empty();
                if self.suppressed.is_some() {
                    validator
                        .with_reference("suppressed")
                        .report_error(error::value_exists());
                }
            }
            Some(DELIVERY_TYPE_TEMP) => {
                rate.exists().in_range(RATE_MINIMUM, RATE_MAXIMUM);
                percent.in_range(PERCENT_MINIMUM, PERCENT_MAXIMUM);
                schedule_name.not_exists();
                validator.validate("suppressed", self.suppressed.as_ref());
            }
            Some(DELIVERY_TYPE_SUSPEND) => {
                rate.not_exists();
                percent.not_exists();
                schedule_name.not_exists();
                validator.validate("suppressed", self.suppressed.as_ref());
            }
            // Delivery type missing or invalid: already reported above.
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
            .with("deliveryType", self.delivery_type.clone())
            .with("rate", self.rate)
            .with("duration", self.duration)
            .with("expectedDuration", self.expected_duration)
            .with("scheduleName", self.schedule_name.clone())
            .with("percent", self.percent)
            .with(
                "suppressed",
                self.suppressed
                    .as_ref()
                    .map(|suppressed| Value::Object(suppressed.to_object())),
            )
            .build()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
