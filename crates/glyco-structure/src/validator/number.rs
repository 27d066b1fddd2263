//! Integer and float constraints
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::base::Base;
use crate::error::{self, Error};

macro_rules! number_validator {
    ($(#[$attr:meta])* $name:ident, $ty:ty) => {
        $(#[$attr])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: Base,
            value: Option<$ty>,
        }

        impl $name {
            pub fn new(base: Base, value: Option<$ty>) -> Self {
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

            pub fn equal_to(self, limit: $ty) -> Self {
                if let Some(value) = self.value {
                    if value != limit {
                        self.base.report_error(error::value_not_equal_to(&value, &limit));
                    }
                }
                self
            }

            pub fn not_equal_to(self, limit: $ty) -> Self {
                if let Some(value) = self.value {
                    if value == limit {
                        self.base.report_error(error::value_equal_to(&value, &limit));
                    }
                }
                self
            }

            pub fn less_than(self, limit: $ty) -> Self {
                if let Some(value) = self.value {
                    if !(value < limit) {
                        self.base.report_error(error::value_not_less_than(&value, &limit));
                    }
                }
                self
            }

            pub fn less_than_or_equal_to(self, limit: $ty) -> Self {
                if let Some(value) = self.value {
                    if !(value <= limit) {
                        self.base
                            .report_error(error::value_not_less_than_or_equal_to(&value, &limit));
                    }
                }
                self
            }

            pub fn greater_than(self, limit: $ty) -> Self {
                if let Some(value) = self.value {
                    if !(value > limit) {
                        self.base.report_error(error::value_not_greater_than(&value, &limit));
                    }
                }
                self
            }

            pub fn greater_than_or_equal_to(self, limit: $ty) -> Self {
                if let Some(value) = self.value {
                    if !(value >= limit) {
                        self.base.report_error(error::value_not_greater_than_or_equal_to(
                            &value, &limit,
                        ));
                    }
                }
                self
            }

            /// Inclusive on both ends
            pub fn in_range(self, lower: $ty, upper: $ty) -> Self {
                if let Some(value) = self.value {
                    if !(lower <= value && value <= upper) {
                        self.base
                            .report_error(error::value_not_in_range(&value, &lower, &upper));
                    }
                }
                self
            }

            pub fn one_of(self, allowed: &[$ty]) -> Self {
                if let Some(value) = self.value {
                    if !allowed.contains(&value) {
                        self.base.report_error(error::value_not_one_of(&value, allowed));
                    }
                }
                self
            }

            pub fn not_one_of(self, disallowed: &[$ty]) -> Self {
                if let Some(value) = self.value {
                    if disallowed.contains(&value) {
                        self.base.report_error(error::value_one_of(&value, disallowed));
                    }
                }
                self
            }

            pub fn using<F>(self, check: F) -> Self
            where
                F: FnOnce(&$ty) -> Result<(), Error>,
            {
                if let Some(value) = &self.value {
                    self.base.report_error(check(value).err());
                }
                self
            }
        }
    };
}

number_validator!(IntValidator, i64);

number_validator!(
    /// Comparisons fail for NaN, so a NaN value violates every ordering constraint
    FloatValidator,
    f64
);
