//! Glyco Structure - reference-tracking parse, validate and normalize passes
//!
//! This crate turns untrusted, decoded JSON into typed values while keeping an
//! exact record of everything that went wrong and where:
//!
//! - **Base**: an error accumulator shared by every derived scope, each scope
//!   carrying its own JSON-pointer reference, meta tag and origin
//! - **Parser**: typed extraction from objects and arrays with consumed-key
//!   tracking, so unexpected keys surface as `not-parsed`
//! - **Validator**: chainable constraints that report at most one error each
//!   and never short-circuit
//! - **Normalizer**: a canonicalization pass that may emit derived items into
//!   a shared collection
//!
//! Errors are reported, never returned. After a pass completes, read them
//! back with [`Base::error`].
//!
//! ## Quick Start
//!
//! ```rust
//! use glyco_structure::{ObjectParser, Origin, Base, Validator};
//! use serde_json::json;
//!
//! let payload = json!({"units": "gallons", "value": 11, "colour": "blue"});
//! let base = Base::new(Origin::External);
//!
//! let mut parser = ObjectParser::from_value(base.clone(), &payload);
//! let units = parser.string("units");
//! let value = parser.float("value");
//! parser.process_not_parsed();
//!
//! let validator = Validator::from(base.clone());
//! validator.string("units", units.as_deref()).exists().one_of(&["gallons", "liters"]);
//! validator.float("value", value).exists().in_range(0.0, 10.0);
//!
//! let errors = base.error().unwrap();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors.at("/colour").count(), 1);
//! assert_eq!(errors.at("/value").count(), 1);
//! ```
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod reference;
pub mod validator;

pub use base::{Base, Origin};
pub use error::{Error, ErrorCode, Errors};
pub use normalizer::Normalizer;
pub use parser::{ArrayParser, ObjectParser};
pub use reference::{Reference, Segment};
pub use validator::{Validatable, Validator};
