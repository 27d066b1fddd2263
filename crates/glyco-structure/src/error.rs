//! Error types reported while parsing, validating and normalizing records
//!
//! Nothing in the engine returns these as `Err`: they are reported to a
//! [`Base`](crate::Base) accumulator and read back as an [`Errors`] collection
//! once processing completes.
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::reference::Reference;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    // Structural
    TypeNotBool,
    TypeNotInt,
    TypeNotFloat,
    TypeNotString,
    TypeNotArray,
    TypeNotObject,
    ValueNotTime,
    NotParsed,
    TypeMissing,
    TypeUnknown,

    // Constraints
    ValueNotExists,
    ValueExists,
    ValueEmpty,
    ValueNotEmpty,
    ValueNotTrue,
    ValueNotFalse,
    ValueEqualTo,
    ValueNotEqualTo,
    ValueNotLessThan,
    ValueNotLessThanOrEqualTo,
    ValueNotGreaterThan,
    ValueNotGreaterThanOrEqualTo,
    ValueNotInRange,
    ValueOneOf,
    ValueNotOneOf,
    LengthNotEqualTo,
    LengthNotLessThanOrEqualTo,
    LengthNotInRange,
    ValueNotMatches,
    ValueDuplicate,
    ValueNotAfter,
    ValueNotBefore,
    ValueNotValid,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TypeNotBool => "type-not-bool",
            ErrorCode::TypeNotInt => "type-not-int",
            ErrorCode::TypeNotFloat => "type-not-float",
            ErrorCode::TypeNotString => "type-not-string",
            ErrorCode::TypeNotArray => "type-not-array",
            ErrorCode::TypeNotObject => "type-not-object",
            ErrorCode::ValueNotTime => "value-not-time",
            ErrorCode::NotParsed => "not-parsed",
            ErrorCode::TypeMissing => "type-missing",
            ErrorCode::TypeUnknown => "type-unknown",
            ErrorCode::ValueNotExists => "value-not-exists",
            ErrorCode::ValueExists => "value-exists",
            ErrorCode::ValueEmpty => "value-empty",
            ErrorCode::ValueNotEmpty => "value-not-empty",
            ErrorCode::ValueNotTrue => "value-not-true",
            ErrorCode::ValueNotFalse => "value-not-false",
            ErrorCode::ValueEqualTo => "value-equal-to",
            ErrorCode::ValueNotEqualTo => "value-not-equal-to",
            ErrorCode::ValueNotLessThan => "value-not-less-than",
            ErrorCode::ValueNotLessThanOrEqualTo => "value-not-less-than-or-equal-to",
            ErrorCode::ValueNotGreaterThan => "value-not-greater-than",
            ErrorCode::ValueNotGreaterThanOrEqualTo => "value-not-greater-than-or-equal-to",
            ErrorCode::ValueNotInRange => "value-not-in-range",
            ErrorCode::ValueOneOf => "value-one-of",
            ErrorCode::ValueNotOneOf => "value-not-one-of",
            ErrorCode::LengthNotEqualTo => "length-not-equal-to",
            ErrorCode::LengthNotLessThanOrEqualTo => "length-not-less-than-or-equal-to",
            ErrorCode::LengthNotInRange => "length-not-in-range",
            ErrorCode::ValueNotMatches => "value-not-matches",
            ErrorCode::ValueDuplicate => "value-duplicate",
            ErrorCode::ValueNotAfter => "value-not-after",
            ErrorCode::ValueNotBefore => "value-not-before",
            ErrorCode::ValueNotValid => "value-not-valid",
        }
    }

    /// Structural errors describe the payload shape rather than a constraint
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ErrorCode::TypeNotBool
                | ErrorCode::TypeNotInt
                | ErrorCode::TypeNotFloat
                | ErrorCode::TypeNotString
                | ErrorCode::TypeNotArray
                | ErrorCode::TypeNotObject
                | ErrorCode::ValueNotTime
                | ErrorCode::NotParsed
                | ErrorCode::TypeMissing
                | ErrorCode::TypeUnknown
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported failure
///
/// `source` and `meta` are filled in by the accumulator the error is reported
/// to; constructors leave them empty.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub struct Error {
    pub code: ErrorCode,
    pub title: String,
    pub detail: String,
    /// JSON pointer of the offending value
    #[serde(rename = "source", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reference {
            Some(reference) => write!(f, "{} at '{}': {}", self.title, reference, self.detail),
            None => write!(f, "{}: {}", self.title, self.detail),
        }
    }
}

impl Error {
    /// Create an error with no reference or meta attached
    pub fn new<T, D>(code: ErrorCode, title: T, detail: D) -> Self
    where
        T: Into<String>,
        D: Into<String>,
    {
        Self {
            code,
            title: title.into(),
            detail: detail.into(),
            reference: None,
            meta: None,
        }
    }

    /// JSON pointer of the offending value, or `""` for the payload root
    pub fn pointer(&self) -> String {
        self.reference
            .as_ref()
            .map(|reference| reference.to_string())
            .unwrap_or_default()
    }
}

/// Ordered collection of every error reported under one accumulator
#[derive(Debug, Clone, Default, PartialEq, Error, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Errors {
    errors: Vec<Error>,
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [only] => write!(f, "{}", only),
            many => {
                write!(f, "{} errors occurred:", many.len())?;
                for (i, error) in many.iter().enumerate() {
                    write!(f, "\n{}. {}", i + 1, error)?;
                }
                Ok(())
            }
        }
    }
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[Error] {
        &self.errors
    }

    /// Errors whose reference is `pointer` exactly
    pub fn at<'a>(&'a self, pointer: &'a str) -> impl Iterator<Item = &'a Error> + 'a {
        self.errors.iter().filter(move |error| error.pointer() == pointer)
    }

    /// `Ok` if nothing was reported
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Error> for Errors {
    fn from(error: Error) -> Self {
        Self { errors: vec![error] }
    }
}

impl From<Vec<Error>> for Errors {
    fn from(errors: Vec<Error>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn list<T: fmt::Debug>(values: &[T]) -> String {
    values
        .iter()
        .map(|value| format!("{:?}", value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_mismatch(code: ErrorCode, expected: &str, value: &Value) -> Error {
    Error::new(
        code,
        "type is not correct",
        format!("type is not {}, but {}", expected, describe(value)),
    )
}

pub fn type_not_bool(value: &Value) -> Error {
    type_mismatch(ErrorCode::TypeNotBool, "bool", value)
}

pub fn type_not_int(value: &Value) -> Error {
    type_mismatch(ErrorCode::TypeNotInt, "int", value)
}

pub fn type_not_float(value: &Value) -> Error {
    type_mismatch(ErrorCode::TypeNotFloat, "float", value)
}

pub fn type_not_string(value: &Value) -> Error {
    type_mismatch(ErrorCode::TypeNotString, "string", value)
}

pub fn type_not_array(value: &Value) -> Error {
    type_mismatch(ErrorCode::TypeNotArray, "array", value)
}

pub fn type_not_object(value: &Value) -> Error {
    type_mismatch(ErrorCode::TypeNotObject, "object", value)
}

pub fn value_not_time(value: &str, layout: &str) -> Error {
    Error::new(
        ErrorCode::ValueNotTime,
        "value is not a parsable time",
        format!("value {:?} is not a parsable time of format {:?}", value, layout),
    )
}

pub fn not_parsed() -> Error {
    Error::new(ErrorCode::NotParsed, "not parsed", "not parsed")
}

pub fn type_missing() -> Error {
    Error::new(ErrorCode::TypeMissing, "type is missing", "type is missing")
}

pub fn type_unknown(value: &str) -> Error {
    Error::new(
        ErrorCode::TypeUnknown,
        "type is unknown",
        format!("unknown type: {}", value),
    )
}

pub fn value_not_exists() -> Error {
    Error::new(ErrorCode::ValueNotExists, "value does not exist", "value does not exist")
}

pub fn value_exists() -> Error {
    Error::new(ErrorCode::ValueExists, "value exists", "value exists")
}

pub fn value_empty() -> Error {
    Error::new(ErrorCode::ValueEmpty, "value is empty", "value is empty")
}

pub fn value_not_empty() -> Error {
    Error::new(ErrorCode::ValueNotEmpty, "value is not empty", "value is not empty")
}

pub fn value_not_true() -> Error {
    Error::new(ErrorCode::ValueNotTrue, "value is not true", "value is not true")
}

pub fn value_not_false() -> Error {
    Error::new(ErrorCode::ValueNotFalse, "value is not false", "value is not false")
}

pub fn value_equal_to<T: fmt::Debug>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueEqualTo,
        "value is equal to the limit",
        format!("value {:?} is equal to {:?}", value, limit),
    )
}

pub fn value_not_equal_to<T: fmt::Debug>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotEqualTo,
        "value is not equal to the limit",
        format!("value {:?} is not equal to {:?}", value, limit),
    )
}

pub fn value_not_less_than<T: fmt::Debug>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotLessThan,
        "value is not less than the limit",
        format!("value {:?} is not less than {:?}", value, limit),
    )
}

pub fn value_not_less_than_or_equal_to<T: fmt::Debug>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotLessThanOrEqualTo,
        "value is not less than or equal to the limit",
        format!("value {:?} is not less than or equal to {:?}", value, limit),
    )
}

pub fn value_not_greater_than<T: fmt::Debug>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotGreaterThan,
        "value is not greater than the limit",
        format!("value {:?} is not greater than {:?}", value, limit),
    )
}

pub fn value_not_greater_than_or_equal_to<T: fmt::Debug>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotGreaterThanOrEqualTo,
        "value is not greater than or equal to the limit",
        format!("value {:?} is not greater than or equal to {:?}", value, limit),
    )
}

pub fn value_not_in_range<T: fmt::Debug>(value: &T, lower: &T, upper: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotInRange,
        "value is not in range",
        format!("value {:?} is not between {:?} and {:?}", value, lower, upper),
    )
}

pub fn value_one_of<T: fmt::Debug>(value: &T, disallowed: &[T]) -> Error {
    Error::new(
        ErrorCode::ValueOneOf,
        "value is one of the disallowed values",
        format!("value {:?} is one of [{}]", value, list(disallowed)),
    )
}

pub fn value_not_one_of<T: fmt::Debug>(value: &T, allowed: &[T]) -> Error {
    Error::new(
        ErrorCode::ValueNotOneOf,
        "value is not one of the allowed values",
        format!("value {:?} is not one of [{}]", value, list(allowed)),
    )
}

pub fn length_not_equal_to(length: usize, limit: usize) -> Error {
    Error::new(
        ErrorCode::LengthNotEqualTo,
        "length is not equal to the limit",
        format!("length {} is not equal to {}", length, limit),
    )
}

pub fn length_not_less_than_or_equal_to(length: usize, limit: usize) -> Error {
    Error::new(
        ErrorCode::LengthNotLessThanOrEqualTo,
        "length is not less than or equal to the limit",
        format!("length {} is not less than or equal to {}", length, limit),
    )
}

pub fn length_not_in_range(length: usize, lower: usize, upper: usize) -> Error {
    Error::new(
        ErrorCode::LengthNotInRange,
        "length is not in range",
        format!("length {} is not between {} and {}", length, lower, upper),
    )
}

pub fn value_not_matches(value: &str, pattern: &str) -> Error {
    Error::new(
        ErrorCode::ValueNotMatches,
        "value does not match the pattern",
        format!("value {:?} does not match {:?}", value, pattern),
    )
}

pub fn value_duplicate() -> Error {
    Error::new(ErrorCode::ValueDuplicate, "value is a duplicate", "value is a duplicate")
}

pub fn value_not_after<T: fmt::Display>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotAfter,
        "value is not after the limit",
        format!("value {} is not after {}", value, limit),
    )
}

pub fn value_not_before<T: fmt::Display>(value: &T, limit: &T) -> Error {
    Error::new(
        ErrorCode::ValueNotBefore,
        "value is not before the limit",
        format!("value {} is not before {}", value, limit),
    )
}

/// Failure raised by a domain-specific validator
pub fn value_not_valid(detail: impl Into<String>) -> Error {
    Error::new(ErrorCode::ValueNotValid, "value is not valid", detail)
}
