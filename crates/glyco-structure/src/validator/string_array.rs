//! String array constraints
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use super::StringValidator;
use crate::base::Base;
use crate::error::{self, Error};
use regex::Regex;
use std::collections::HashSet;

/// Constraints over an optional list of strings
///
/// The `each*` constraints report per element at `<reference>/<index>`.
#[derive(Debug, Clone)]
pub struct StringArrayValidator<'v> {
    base: Base,
    value: Option<&'v [String]>,
}

impl<'v> StringArrayValidator<'v> {
    pub fn new(base: Base, value: Option<&'v [String]>) -> Self {
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

    /// Run `check` against a string validator for every element
    pub fn each<F>(self, mut check: F) -> Self
    where
        F: FnMut(StringValidator<'v>),
    {
        if let Some(value) = self.value {
            for (index, element) in value.iter().enumerate() {
                check(StringValidator::new(
                    self.base.with_reference(index),
                    Some(element.as_str()),
                ));
            }
        }
        self
    }

    pub fn each_not_empty(self) -> Self {
        self.each(|element| {
            element.not_empty();
        })
    }

    pub fn each_one_of(self, allowed: &[&str]) -> Self {
        self.each(|element| {
            element.one_of(allowed);
        })
    }

    pub fn each_matches(self, pattern: &Regex) -> Self {
        self.each(|element| {
            element.matches(pattern);
        })
    }

    /// Report `value-duplicate` at every repeat after an element's first occurrence
    pub fn each_unique(self) -> Self {
        if let Some(value) = self.value {
            let mut seen = HashSet::with_capacity(value.len());
            for (index, element) in value.iter().enumerate() {
                if !seen.insert(element.as_str()) {
                    self.base
                        .with_reference(index)
                        .report_error(error::value_duplicate());
                }
            }
        }
        self
    }

    pub fn using<F>(self, check: F) -> Self
    where
        F: FnOnce(&[String]) -> Result<(), Error>,
    {
        if let Some(value) = self.value {
            self.base.report_error(check(value).err());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn found(base: &Base) -> Vec<(String, ErrorCode)> {
        base.error()
            .map(|errors| errors.iter().map(|e| (e.pointer(), e.code)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_each_unique_reports_repeats() {
        let tags = strings(&["a", "b", "a", "a"]);
        let base = Base::default().with_reference("tags");
        StringArrayValidator::new(base.clone(), Some(tags.as_slice())).each_unique();

        assert_eq!(
            found(&base),
            vec![
                ("/tags/2".to_string(), ErrorCode::ValueDuplicate),
                ("/tags/3".to_string(), ErrorCode::ValueDuplicate),
            ]
        );
    }

    #[test]
    fn test_each_constraints_index_elements() {
        let tags = strings(&["cgm", "", "toaster"]);
        let base = Base::default().with_reference("deviceTags");
        StringArrayValidator::new(base.clone(), Some(tags.as_slice()))
            .not_empty()
            .each_not_empty()
            .each_one_of(&["bgm", "cgm", "insulin-pump"]);

        assert_eq!(
            found(&base),
            vec![
                ("/deviceTags/1".to_string(), ErrorCode::ValueEmpty),
                ("/deviceTags/1".to_string(), ErrorCode::ValueNotOneOf),
                ("/deviceTags/2".to_string(), ErrorCode::ValueNotOneOf),
            ]
        );
    }

    #[test]
    fn test_each_with_closure() {
        let notes = strings(&["ok", "this note is too long"]);
        let base = Base::default().with_reference("notes");
        StringArrayValidator::new(base.clone(), Some(notes.as_slice()))
            .length_less_than_or_equal_to(100)
            .each(|note| {
                note.length_in_range(1, 10);
            });

        assert_eq!(
            found(&base),
            vec![("/notes/1".to_string(), ErrorCode::LengthNotInRange)]
        );
    }

    #[test]
    fn test_each_matches() {
        let pattern = Regex::new("^[a-z]+$").unwrap();
        let values = strings(&["abc", "ABC"]);
        let base = Base::default();
        StringArrayValidator::new(base.clone(), Some(values.as_slice())).each_matches(&pattern);
        assert_eq!(found(&base), vec![("/1".to_string(), ErrorCode::ValueNotMatches)]);
    }

    #[test]
    fn test_length_and_presence() {
        let values = strings(&["a", "b", "c"]);
        let base = Base::default();
        StringArrayValidator::new(base.clone(), Some(values.as_slice()))
            .length_equal_to(2)
            .length_in_range(1, 3)
            .empty()
            .not_exists();
        StringArrayValidator::new(base.clone(), None).exists().each_unique();
        let codes: Vec<_> = found(&base).into_iter().map(|(_, code)| code).collect();
        assert_eq!(
            codes,
            vec![
                ErrorCode::LengthNotEqualTo,
                ErrorCode::ValueNotEmpty,
                ErrorCode::ValueExists,
                ErrorCode::ValueNotExists,
            ]
        );
    }
}
