//! Upload (data set) records describing the device and client that sent data
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::common::Common;
use crate::datum::{DataNormalizer, Datum, WireObject};
use crate::formats;
use glyco_structure::normalizer::sort_strings;
use glyco_structure::{ObjectParser, Validatable, Validator};
use serde_json::{Map, Value};
use std::any::Any;

pub const TYPE: &str = "upload";

pub const DATA_SET_TYPES: &[&str] = &["continuous", "normal"];
pub const DEVICE_TAGS: &[&str] = &["bgm", "cgm", "insulin-pump"];
pub const TIME_PROCESSINGS: &[&str] = &["across-the-board-timezone", "none", "utc-bootstrapping"];

pub const DEVICE_MANUFACTURERS_LENGTH_MAXIMUM: usize = 10;
pub const DEVICE_MANUFACTURER_LENGTH_MAXIMUM: usize = 100;
pub const DEVICE_MODEL_LENGTH_MAXIMUM: usize = 100;
pub const DEVICE_SERIAL_NUMBER_LENGTH_MAXIMUM: usize = 100;
pub const VERSION_LENGTH_MAXIMUM: usize = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Client {
    pub name: Option<String>,
    pub version: Option<String>,
    pub private: Option<Map<String, Value>>,
}

impl Client {
    pub fn parse(parser: &mut ObjectParser<'_>) -> Self {
        Self {
            name: parser.string("name"),
            version: parser.string("version"),
            private: parser.object("private"),
        }
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::default();
        object.insert("name", self.name.clone());
        object.insert("version", self.version.clone());
        object.insert("private", self.private.clone().map(Value::Object));
        object.build()
    }
}

impl Validatable for Client {
    fn validate(&self, validator: &Validator) {
        validator
            .string("name", self.name.as_deref())
            .exists()
            .using(formats::validate_reverse_domain);
        validator
            .string("version", self.version.as_deref())
            .exists()
            .using(formats::validate_semantic_version);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Upload {
    pub common: Common,
    pub client: Option<Client>,
    pub data_set_type: Option<String>,
    pub device_manufacturers: Option<Vec<String>>,
    pub device_model: Option<String>,
    pub device_serial_number: Option<String>,
    pub device_tags: Option<Vec<String>>,
    pub time_processing: Option<String>,
    pub version: Option<String>,
}

impl Upload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Box<dyn Datum> {
        Box::new(Self::new())
    }
}

impl Datum for Upload {
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
        self.client = parser.parse_object("client", Client::parse);
        self.data_set_type = parser.string("dataSetType");
        self.device_manufacturers = parser.string_array("deviceManufacturers");
        self.device_model = parser.string("deviceModel");
        self.device_serial_number = parser.string("deviceSerialNumber");
        self.device_tags = parser.string_array("deviceTags");
        self.time_processing = parser.string("timeProcessing");
        self.version = parser.string("version");
    }

    fn validate(&self, validator: &Validator) {
        self.common.validate(validator);

        validator.validate("client", self.client.as_ref());
        validator
            .string("dataSetType", self.data_set_type.as_deref())
            .one_of(DATA_SET_TYPES);
        validator
            .string_array("deviceManufacturers", self.device_manufacturers.as_deref())
            .length_in_range(1, DEVICE_MANUFACTURERS_LENGTH_MAXIMUM)
            .each(|manufacturer| {
                manufacturer.length_in_range(1, DEVICE_MANUFACTURER_LENGTH_MAXIMUM);
            })
            .each_unique();
        validator
            .string("deviceModel", self.device_model.as_deref())
            .length_in_range(1, DEVICE_MODEL_LENGTH_MAXIMUM);
        validator
            .string("deviceSerialNumber", self.device_serial_number.as_deref())
            .length_in_range(1, DEVICE_SERIAL_NUMBER_LENGTH_MAXIMUM);
        validator
            .string_array("deviceTags", self.device_tags.as_deref())
            .not_empty()
            .each_one_of(DEVICE_TAGS)
            .each_unique();
        validator
            .string("timeProcessing", self.time_processing.as_deref())
            .one_of(TIME_PROCESSINGS);
        validator
            .string("version", self.version.as_deref())
            .length_in_range(1, VERSION_LENGTH_MAXIMUM);
    }

    fn normalize(&mut self, normalizer: &DataNormalizer) {
        self.common.normalize(normalizer);
        sort_strings(&mut self.device_manufacturers);
        sort_strings(&mut self.device_tags);
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::new(TYPE);
        self.common.write(&mut object);
        object
            .with(
                "client",
                self.client.as_ref().map(|client| Value::Object(client.to_object())),
            )
            .with("dataSetType", self.data_set_type.clone())
            .with("deviceManufacturers", self.device_manufacturers.clone())
            .with("deviceModel", self.device_model.clone())
            .with("deviceSerialNumber", self.device_serial_number.clone())
            .with("deviceTags", self.device_tags.clone())
            .with("timeProcessing", self.time_processing.clone())
            .with("version", self.version.clone())
            .build()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
