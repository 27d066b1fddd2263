//! Chainable constraints over parsed values
//!
//! A [`Validator`] hands out one typed validator per field. Each constraint
//! reports at most one error at the field's reference and returns the
//! validator, so constraints chain and a failing one never hides the next:
//!
//! ```
//! use glyco_structure::{Origin, Validator};
//!
//! let validator = Validator::new(Origin::External);
//! validator.float("rate", Some(120.0)).exists().in_range(0.0, 100.0);
//! validator.string("deliveryType", None).exists();
//!
//! let errors = validator.base().error().unwrap();
//! assert_eq!(errors.len(), 2);
//! ```
//!
//! Everything except `exists` and `not_exists` passes when the value is
//! absent.
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

pub mod boolean;
pub mod number;
pub mod object_array;
pub mod string;
pub mod string_array;
pub mod time;

pub use self::boolean::BoolValidator;
pub use self::number::{FloatValidator, IntValidator};
pub use self::object_array::ObjectArrayValidator;
pub use self::string::StringValidator;
pub use self::string_array::StringArrayValidator;
pub use self::time::TimeValidator;

use crate::base::{Base, Origin};
use crate::error::Error;
use crate::reference::{Reference, Segment};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Structures that know how to validate themselves
///
/// `validator` is already scoped to the structure's own reference; fields are
/// validated by deriving one more segment per key.
pub trait Validatable {
    fn validate(&self, validator: &Validator);
}

/// Entry point of the constraint chains, scoped like a [`Base`]
#[derive(Debug, Clone, Default)]
pub struct Validator {
    base: Base,
}

impl From<Base> for Validator {
    fn from(base: Base) -> Self {
        Self { base }
    }
}

impl Validator {
    pub fn new(origin: Origin) -> Self {
        Self::from(Base::new(origin))
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    pub fn with_origin(&self, origin: Origin) -> Self {
        Self::from(self.base.with_origin(origin))
    }

    pub fn with_meta(&self, meta: Value) -> Self {
        Self::from(self.base.with_meta(meta))
    }

    pub fn with_source(&self, reference: Reference) -> Self {
        Self::from(self.base.with_source(reference))
    }

    pub fn with_reference(&self, segment: impl Into<Segment>) -> Self {
        Self::from(self.base.with_reference(segment))
    }

    pub fn report_error(&self, error: impl Into<Option<Error>>) {
        self.base.report_error(error);
    }

    pub fn bool(&self, reference: impl Into<Segment>, value: Option<bool>) -> BoolValidator {
        BoolValidator::new(self.base.with_reference(reference), value)
    }

    pub fn int(&self, reference: impl Into<Segment>, value: Option<i64>) -> IntValidator {
        IntValidator::new(self.base.with_reference(reference), value)
    }

    pub fn float(&self, reference: impl Into<Segment>, value: Option<f64>) -> FloatValidator {
        FloatValidator::new(self.base.with_reference(reference), value)
    }

    pub fn string<'v>(
        &self,
        reference: impl Into<Segment>,
        value: Option<&'v str>,
    ) -> StringValidator<'v> {
        StringValidator::new(self.base.with_reference(reference), value)
    }

    pub fn string_array<'v>(
        &self,
        reference: impl Into<Segment>,
        value: Option<&'v [String]>,
    ) -> StringArrayValidator<'v> {
        StringArrayValidator::new(self.base.with_reference(reference), value)
    }

    pub fn time(
        &self,
        reference: impl Into<Segment>,
        value: Option<DateTime<Utc>>,
    ) -> TimeValidator {
        TimeValidator::new(self.base.with_reference(reference), value)
    }

    pub fn object_array<'v>(
        &self,
        reference: impl Into<Segment>,
        value: Option<&'v [Map<String, Value>]>,
    ) -> ObjectArrayValidator<'v> {
        ObjectArrayValidator::new(self.base.with_reference(reference), value)
    }

    /// Validate a nested structure under `reference`, if present
    pub fn validate<V: Validatable>(&self, reference: impl Into<Segment>, value: Option<&V>) {
        if let Some(value) = value {
            value.validate(&self.with_reference(reference));
        }
    }

    /// Validate every element of a nested list under `reference/i`
    pub fn validate_each<V: Validatable>(&self, reference: impl Into<Segment>, values: Option<&[V]>) {
        let Some(values) = values else {
            return;
        };
        let validator = self.with_reference(reference);
        for (index, value) in values.iter().enumerate() {
            value.validate(&validator.with_reference(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{self, ErrorCode};

    struct Amount {
        units: Option<String>,
        value: Option<f64>,
    }

    impl Validatable for Amount {
        fn validate(&self, validator: &Validator) {
            validator
                .string("units", self.units.as_deref())
                .exists()
                .one_of(&["liters"]);
            validator.float("value", self.value).exists().in_range(0.0, 50.0);
        }
    }

    #[test]
    fn test_nested_validatable_extends_reference() {
        let validator = Validator::new(Origin::External);
        let amount = Amount {
            units: Some("liters".to_string()),
            value: Some(51.0),
        };
        validator.validate("amount", Some(&amount));

        let errors = validator.base().error().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.as_slice()[0].pointer(), "/amount/value");
        assert_eq!(errors.as_slice()[0].code, ErrorCode::ValueNotInRange);
    }

    #[test]
    fn test_validate_each_indexes_elements() {
        let validator = Validator::new(Origin::External);
        let amounts = vec![
            Amount {
                units: Some("liters".to_string()),
                value: Some(1.0),
            },
            Amount {
                units: None,
                value: Some(1.0),
            },
        ];
        validator.validate_each("amounts", Some(amounts.as_slice()));
        validator.validate_each::<Amount>("missing", None);

        let errors = validator.base().error().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.as_slice()[0].pointer(), "/amounts/1/units");
        assert_eq!(errors.as_slice()[0].code, ErrorCode::ValueNotExists);
    }

    #[test]
    fn test_failures_do_not_short_circuit() {
        let validator = Validator::new(Origin::External);
        validator
            .int("duration", Some(-5))
            .greater_than_or_equal_to(0)
            .not_equal_to(-5)
            .in_range(0, 10);
        assert_eq!(validator.base().error_count(), 3);
    }

    #[test]
    fn test_report_error_uses_scope() {
        let validator = Validator::new(Origin::Internal).with_reference("suppressed");
        validator.report_error(error::value_exists());
        let errors = validator.base().error().unwrap();
        assert_eq!(errors.as_slice()[0].pointer(), "/suppressed");
        assert_eq!(validator.origin(), Origin::Internal);
    }
}
