//! Time constraints
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::base::Base;
use crate::error::{self, Error};
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct TimeValidator {
    base: Base,
    value: Option<DateTime<Utc>>,
}

impl TimeValidator {
    pub fn new(base: Base, value: Option<DateTime<Utc>>) -> Self {
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

    /// Strictly after `limit`
    pub fn after(self, limit: DateTime<Utc>) -> Self {
        if let Some(value) = self.value {
            if value <= limit {
                self.base.report_error(error::value_not_after(&value, &limit));
            }
        }
        self
    }

    /// Strictly before `limit`
    pub fn before(self, limit: DateTime<Utc>) -> Self {
        if let Some(value) = self.value {
            if value >= limit {
                self.base.report_error(error::value_not_before(&value, &limit));
            }
        }
        self
    }

    /// After the current time minus `threshold`
    pub fn after_now(self, threshold: Duration) -> Self {
        let limit = Utc::now() - threshold;
        self.after(limit)
    }

    /// Before the current time plus `threshold`
    pub fn before_now(self, threshold: Duration) -> Self {
        let limit = Utc::now() + threshold;
        self.before(limit)
    }

    /// Between `lower` and `upper`, inclusive
    pub fn in_range(self, lower: DateTime<Utc>, upper: DateTime<Utc>) -> Self {
        if let Some(value) = self.value {
            if value < lower || value > upper {
                self.base.report_error(error::value_not_in_range(
                    &value.to_rfc3339(),
                    &lower.to_rfc3339(),
                    &upper.to_rfc3339(),
                ));
            }
        }
        self
    }

    pub fn using<F>(self, check: F) -> Self
    where
        F: FnOnce(&DateTime<Utc>) -> Result<(), Error>,
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
    use chrono::TimeZone;

    fn codes(base: &Base) -> Vec<ErrorCode> {
        base.error()
            .map(|errors| errors.iter().map(|e| e.code).collect())
            .unwrap_or_default()
    }

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_after_and_before_are_strict() {
        let base = Base::default();
        TimeValidator::new(base.clone(), Some(at(2000)))
            .after(at(2000))
            .before(at(2000))
            .after(at(1999))
            .before(at(2001));
        assert_eq!(
            codes(&base),
            vec![ErrorCode::ValueNotAfter, ErrorCode::ValueNotBefore]
        );
    }

    #[test]
    fn test_relative_to_now() {
        let base = Base::default();
        let now = Utc::now();
        TimeValidator::new(base.clone(), Some(now + Duration::hours(2)))
            .before_now(Duration::days(1));
        TimeValidator::new(base.clone(), Some(now + Duration::days(2)))
            .before_now(Duration::days(1));
        TimeValidator::new(base.clone(), Some(now - Duration::days(2)))
            .after_now(Duration::days(1));
        assert_eq!(
            codes(&base),
            vec![ErrorCode::ValueNotBefore, ErrorCode::ValueNotAfter]
        );
    }

    #[test]
    fn test_in_range_inclusive() {
        let base = Base::default();
        TimeValidator::new(base.clone(), Some(at(2010))).in_range(at(2010), at(2020));
        TimeValidator::new(base.clone(), Some(at(2021))).in_range(at(2010), at(2020));
        assert_eq!(codes(&base), vec![ErrorCode::ValueNotInRange]);
    }

    #[test]
    fn test_absent_is_vacuous() {
        let base = Base::default();
        TimeValidator::new(base.clone(), None)
            .after(at(2030))
            .before_now(Duration::zero())
            .not_exists();
        assert!(!base.has_error());
    }
}
