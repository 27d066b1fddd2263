//! Object array constraints
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::base::Base;
use crate::error::{self, Error};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct ObjectArrayValidator<'v> {
    base: Base,
    value: Option<&'v [Map<String, Value>]>,
}

impl<'v> ObjectArrayValidator<'v> {
    pub fn new(base: Base, value: Option<&'v [Map<String, Value>]>) -> Self {
        Self { base, value }
    }

    pub fn exists(self) -> Self {
        if self.value.is_none() {
            self.base.report_error(error::value_not_exists());
        }
        self
    }

    pub fn not_exists(self) -> Self {
        if self.value.is_some() {
            self.base.report_error(error::value_exists());
        }
        self
    }

    pub fn empty(self) -> Self {
        if self.value.is_some_and(|value| !value.is_empty()) {
            self.base.report_error(error::value_not_empty());
        }
        self
    }

    pub fn not_empty(self) -> Self {
        if self.value.is_some_and(<[_]>::is_empty) {
            self.base.report_error(error::value_empty());
        }
        self
    }

    pub fn length_equal_to(self, limit: usize) -> Self {
        if let Some(value) = self.value {
            if value.len() != limit {
                self.base
                    .report_error(error::length_not_equal_to(value.len(), limit));
            }
        }
        self
    }

    pub fn length_less_than_or_equal_to(self, limit: usize) -> Self {
        if let Some(value) = self.value {
            if value.len() > limit {
                self.base
                    .report_error(error::length_not_less_than_or_equal_to(value.len(), limit));
            }
        }
        self
    }

    pub fn length_in_range(self, lower: usize, upper: usize) -> Self {
        if let Some(value) = self.value {
            if !(lower..=upper).contains(&value.len()) {
                self.base
                    .report_error(error::length_not_in_range(value.len(), lower, upper));
            }
        }
        self
    }

    pub fn using<F>(self, check: F) -> Self
    where
        F: FnOnce(&[Map<String, Value>]) -> Result<(), Error>,
    {
        if let Some(value) = self.value {
            self.base.report_error(check(value).err());
        }
        self
    }
}
