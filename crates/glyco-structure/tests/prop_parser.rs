//! Property-based tests for the object and array parsers
//!
//! These tests verify the consumed-or-reported bookkeeping across
//! arbitrary objects and arrays and arbitrary subsets of extracted keys.

use glyco_structure::{ArrayParser, Base, ErrorCode, ObjectParser, Origin, Reference, Segment};
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::hash_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn object_strategy() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::hash_map("[a-zA-Z_~/]{1,10}", json_value_strategy(), 0..12)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_every_key_consumed_or_not_parsed(
        object in object_strategy(),
        picks in proptest::collection::vec(any::<bool>(), 12),
    ) {
        let base = Base::new(Origin::External);
        let mut parser = ObjectParser::new(base.clone(), Some(&object));

        let mut consumed = BTreeSet::new();
        for (key, pick) in object.keys().zip(picks.iter()) {
            if *pick {
                parser.value(key);
                consumed.insert(key.clone());
            }
        }
        parser.process_not_parsed();

        let not_parsed: Vec<Reference> = base
            .error()
            .map(|errors| {
                errors
                    .iter()
                    .filter(|e| e.code == ErrorCode::NotParsed)
                    .filter_map(|e| e.reference.clone())
                    .collect()
            })
            .unwrap_or_default();

        prop_assert_eq!(not_parsed.len() + consumed.len(), object.len());
        for key in object.keys() {
            let expected = Reference::root().with(key.as_str());
            let hits = not_parsed.iter().filter(|r| **r == expected).count();
            prop_assert_eq!(hits, usize::from(!consumed.contains(key)));
        }
    }

    #[test]
    fn prop_every_index_consumed_or_not_parsed(
        array in proptest::collection::vec(json_value_strategy(), 0..12),
        picks in proptest::collection::vec(any::<bool>(), 12),
    ) {
        let base = Base::new(Origin::External).with_reference("readings");
        let mut parser = ArrayParser::new(base.clone(), Some(&array));

        let consumed: BTreeSet<usize> = (0..array.len()).filter(|i| picks[*i]).collect();
        for index in &consumed {
            parser.value(*index);
        }
        parser.process_not_parsed();

        let pointers: Vec<String> = base
            .error()
            .map(|errors| {
                errors
                    .iter()
                    .filter(|e| e.code == ErrorCode::NotParsed)
                    .map(|e| e.pointer())
                    .collect()
            })
            .unwrap_or_default();

        let expected: Vec<String> = (0..array.len())
            .filter(|i| !consumed.contains(i))
            .map(|i| format!("/readings/{}", i))
            .collect();
        prop_assert_eq!(pointers, expected);
    }

    #[test]
    fn prop_typed_extraction_reports_at_most_one_error_per_key(
        object in object_strategy(),
    ) {
        let base = Base::new(Origin::External);
        let mut parser = ObjectParser::new(base.clone(), Some(&object));
        for key in object.keys() {
            parser.string(key);
        }
        parser.process_not_parsed();

        let errors = base.error().map(|e| e.len()).unwrap_or(0);
        let non_strings = object.values().filter(|v| !v.is_string()).count();
        prop_assert_eq!(errors, non_strings);
    }

    #[test]
    fn prop_reference_round_trips_through_pointer(
        segments in proptest::collection::vec(
            prop_oneof![
                "[a-z0-9~/]{1,6}".prop_map(Segment::Key),
                (0usize..10_000).prop_map(Segment::Index),
            ],
            0..6,
        ),
    ) {
        let reference = segments
            .iter()
            .cloned()
            .fold(Reference::root(), |r, s| r.with(s));
        let parsed: Reference = reference.to_string().parse().unwrap();
        prop_assert_eq!(parsed.to_string(), reference.to_string());
    }
}
