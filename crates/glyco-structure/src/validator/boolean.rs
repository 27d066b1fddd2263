//! Boolean constraints
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::base::Base;
use crate::error::{self, Error};

#[derive(Debug, Clone)]
pub struct BoolValidator {
    base: Base,
    value: Option<bool>,
}

impl BoolValidator {
    pub fn new(base: Base, value: Option<bool>) -> Self {
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

    pub fn is_true(self) -> Self {
        if self.value == Some(false) {
            self.base.report_error(error::value_not_true());
        }
        self
    }

    pub fn is_false(self) -> Self {
        if self.value == Some(true) {
            self.base.report_error(error::value_not_false());
        }
        self
    }

    pub fn using<F>(self, check: F) -> Self
    where
        F: FnOnce(&bool) -> Result<(), Error>,
    {
        if let Some(value) = &self.value {
            self.base.report_error(check(value).err());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn codes(base: &Base) -> Vec<ErrorCode> {
        base.error()
            .map(|errors| errors.iter().map(|e| e.code).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_truthiness() {
        let base = Base::default();
        BoolValidator::new(base.clone(), Some(true)).is_true().is_false();
        BoolValidator::new(base.clone(), None).is_true().is_false();
        assert_eq!(codes(&base), vec![ErrorCode::ValueNotFalse]);
    }

    #[test]
    fn test_presence() {
        let base = Base::default();
        BoolValidator::new(base.clone(), None).exists();
        BoolValidator::new(base.clone(), Some(false)).not_exists();
        assert_eq!(
            codes(&base),
            vec![ErrorCode::ValueNotExists, ErrorCode::ValueExists]
        );
    }
}
