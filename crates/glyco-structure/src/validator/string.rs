//! String constraints
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::base::Base;
use crate::error::{self, Error};
use crate::parser::parse_time;
use regex::Regex;

/// Constraints over an optional string; lengths count characters, not bytes
#[derive(Debug, Clone)]
pub struct StringValidator<'v> {
    base: Base,
    value: Option<&'v str>,
}

impl<'v> StringValidator<'v> {
    pub fn new(base: Base, value: Option<&'v str>) -> Self {
        Self { base, value }
    }

    pub fn base(&self) -> &Base {
        &self.base
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
        if self.value.is_some_and(str::is_empty) {
            self.base.report_error(error::value_empty());
        }
        self
    }

    pub fn equal_to(self, limit: &str) -> Self {
        if let Some(value) = self.value {
            if value != limit {
                self.base.report_error(error::value_not_equal_to(&value, &limit));
            }
        }
        self
    }

    pub fn not_equal_to(self, limit: &str) -> Self {
        if let Some(value) = self.value {
            if value == limit {
                self.base.report_error(error::value_equal_to(&value, &limit));
            }
        }
        self
    }

    pub fn length_equal_to(self, limit: usize) -> Self {
        if let Some(length) = self.length() {
            if length != limit {
                self.base.report_error(error::length_not_equal_to(length, limit));
            }
        }
        self
    }

    pub fn length_less_than_or_equal_to(self, limit: usize) -> Self {
        if let Some(length) = self.length() {
            if length > limit {
                self.base
                    .report_error(error::length_not_less_than_or_equal_to(length, limit));
            }
        }
        self
    }

    pub fn length_in_range(self, lower: usize, upper: usize) -> Self {
        if let Some(length) = self.length() {
            if !(lower..=upper).contains(&length) {
                self.base
                    .report_error(error::length_not_in_range(length, lower, upper));
            }
        }
        self
    }

    pub fn one_of(self, allowed: &[&str]) -> Self {
        if let Some(value) = self.value {
            if !allowed.contains(&value) {
                self.base.report_error(error::value_not_one_of(&value, allowed));
            }
        }
        self
    }

    pub fn not_one_of(self, disallowed: &[&str]) -> Self {
        if let Some(value) = self.value {
            if disallowed.contains(&value) {
                self.base.report_error(error::value_one_of(&value, disallowed));
            }
        }
        self
    }

    pub fn matches(self, pattern: &Regex) -> Self {
        if let Some(value) = self.value {
            if !pattern.is_match(value) {
                self.base
                    .report_error(error::value_not_matches(value, pattern.as_str()));
            }
        }
        self
    }

    /// The value must parse as a time in `layout`
    pub fn as_time(self, layout: &str) -> Self {
        if let Some(value) = self.value {
            if parse_time(value, layout).is_none() {
                self.base.report_error(error::value_not_time(value, layout));
            }
        }
        self
    }

    pub fn using<F>(self, check: F) -> Self
    where
        F: FnOnce(&str) -> Result<(), Error>,
    {
        if let Some(value) = self.value {
            self.base.report_error(check(value).err());
        }
        self
    }

    fn length(&self) -> Option<usize> {
        self.value.map(|value| value.chars().count())
    }
}
