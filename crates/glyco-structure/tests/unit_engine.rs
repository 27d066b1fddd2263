//! Parse, validate and normalize passes working over one shared accumulator

use chrono::{Duration, TimeZone, Utc};
use glyco_structure::normalizer::{sort_strings, truncate_to_millis};
use glyco_structure::parser::RFC3339;
use glyco_structure::{
    Base, ErrorCode, Normalizer, ObjectParser, Origin, Validatable, Validator,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Debug, Default, PartialEq)]
struct Reading {
    units: Option<String>,
    value: Option<f64>,
    tags: Option<Vec<String>>,
    time: Option<chrono::DateTime<Utc>>,
}

impl Reading {
    fn parse(parser: &mut ObjectParser<'_>) -> Self {
        Self {
            units: parser.string("units"),
            value: parser.float("value"),
            tags: parser.string_array("tags"),
            time: parser.time("time", RFC3339),
        }
    }

    fn normalize(&mut self) {
        sort_strings(&mut self.tags);
        self.time = self.time.map(truncate_to_millis);
    }
}

impl Validatable for Reading {
    fn validate(&self, validator: &Validator) {
        validator
            .string("units", self.units.as_deref())
            .exists()
            .one_of(&["mmol/L", "mg/dL"]);
        validator.float("value", self.value).exists().in_range(0.0, 55.0);
        validator
            .string_array("tags", self.tags.as_deref())
            .length_less_than_or_equal_to(3)
            .each_not_empty();
        validator
            .time("time", self.time)
            .after(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
            .before_now(Duration::days(1));
    }
}

fn pointers(base: &Base) -> Vec<(String, ErrorCode)> {
    base.error()
        .map(|errors| errors.iter().map(|e| (e.pointer(), e.code)).collect())
        .unwrap_or_default()
}

#[test]
fn test_valid_reading_passes_every_pass() {
    let payload = json!({
        "units": "mmol/L",
        "value": 5.5,
        "tags": ["b", "a", "b"],
        "time": "2020-01-02T03:04:05.678901Z",
    });
    let base = Base::new(Origin::External);
    let mut parser = ObjectParser::from_value(base.clone(), &payload);
    let mut reading = Reading::parse(&mut parser);
    parser.process_not_parsed();
    Validator::from(base.clone()).validate("reading", Some(&reading));
    assert!(pointers(&base).is_empty());

    reading.normalize();
    assert_eq!(reading.tags, Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(
        reading.time.unwrap().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "2020-01-02T03:04:05.678Z"
    );
}

#[test]
fn test_all_errors_are_reported_with_locations() {
    let payload = json!({
        "units": "furlongs",
        "value": "high",
        "tags": ["", "x"],
        "time": "1999-12-31T23:59:59Z",
        "extra": true,
    });
    let base = Base::new(Origin::External).with_reference(3usize);
    let mut parser = ObjectParser::from_value(base.clone(), &payload);
    let reading = Reading::parse(&mut parser);
    parser.process_not_parsed();
    reading.validate(&Validator::from(base.clone()));

    let mut found = pointers(&base);
    found.sort();
    assert_eq!(
        found,
        vec![
            ("/3/extra".to_string(), ErrorCode::NotParsed),
            ("/3/tags/0".to_string(), ErrorCode::ValueEmpty),
            ("/3/time".to_string(), ErrorCode::ValueNotAfter),
            ("/3/units".to_string(), ErrorCode::ValueNotOneOf),
            ("/3/value".to_string(), ErrorCode::TypeNotFloat),
            ("/3/value".to_string(), ErrorCode::ValueNotExists),
        ]
    );
}

#[test]
fn test_normalizer_collects_derived_items_across_scopes() {
    let normalizer: Normalizer<Reading> = Normalizer::new(Origin::External);
    for index in 0..3usize {
        let scoped = normalizer.with_reference(index);
        if index % 2 == 0 {
            scoped.add_data(Reading {
                value: Some(index as f64),
                ..Reading::default()
            });
        }
    }

    let derived = normalizer.take_data();
    assert_eq!(derived.len(), 2);
    assert_eq!(derived[1].value, Some(2.0));
    assert!(!normalizer.base().has_error());
}

#[test]
fn test_errors_serialize_with_pointer_source() {
    let base = Base::new(Origin::External)
        .with_meta(json!({"type": "water"}))
        .with_reference(0usize)
        .with_reference("amount");
    Validator::from(base.clone()).float("value", Some(11.0)).in_range(0.0, 10.0);

    let errors = base.error().unwrap();
    let wire = serde_json::to_value(&errors).unwrap();
    assert_eq!(wire[0]["code"], json!("value-not-in-range"));
    assert_eq!(wire[0]["source"], json!("/0/amount/value"));
    assert_eq!(wire[0]["meta"], json!({"type": "water"}));
}
