//! Canonicalization pass run over accepted values
//!
//! A [`Normalizer`] is scoped like a [`Base`] and additionally carries a side
//! collection of derived items. Every derived scope appends to the same
//! collection, which the caller drains once the whole input is processed.
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::base::{Base, Origin};
use crate::error::Error;
use crate::reference::{Reference, Segment};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub struct Normalizer<T> {
    base: Base,
    data: Rc<RefCell<Vec<T>>>,
}

// Manual impls: deriving would require `T: Clone` / `T: Debug`.
impl<T> Clone for Normalizer<T> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            data: Rc::clone(&self.data),
        }
    }
}

impl<T> fmt::Debug for Normalizer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("base", &self.base)
            .field("data_len", &self.data_len())
            .finish()
    }
}

impl<T> Default for Normalizer<T> {
    fn default() -> Self {
        Self::from_base(Base::default())
    }
}

impl<T> Normalizer<T> {
    pub fn new(origin: Origin) -> Self {
        Self::from_base(Base::new(origin))
    }

    /// Share `base`'s error list, starting with an empty data collection
    pub fn from_base(base: Base) -> Self {
        Self {
            base,
            data: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn origin(&self) -> Origin {
        self.base.origin()
    }

    fn derive(&self, base: Base) -> Self {
        Self {
            base,
            data: Rc::clone(&self.data),
        }
    }

    pub fn with_origin(&self, origin: Origin) -> Self {
        self.derive(self.base.with_origin(origin))
    }

    pub fn with_meta(&self, meta: Value) -> Self {
        self.derive(self.base.with_meta(meta))
    }

    pub fn with_source(&self, reference: Reference) -> Self {
        self.derive(self.base.with_source(reference))
    }

    pub fn with_reference(&self, segment: impl Into<Segment>) -> Self {
        self.derive(self.base.with_reference(segment))
    }

    pub fn report_error(&self, error: impl Into<Option<Error>>) {
        self.base.report_error(error);
    }

    /// Append a derived item to the shared collection
    pub fn add_data(&self, item: T) {
        self.data.borrow_mut().push(item);
    }

    pub fn data_len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Drain everything appended so far, in insertion order
    pub fn take_data(&self) -> Vec<T> {
        std::mem::take(&mut *self.data.borrow_mut())
    }
}

/// Sort a string list and drop repeated entries
pub fn sort_strings(values: &mut Option<Vec<String>>) {
    if let Some(values) = values {
        values.sort();
        values.dedup();
    }
}

/// Drop sub-millisecond precision
pub fn truncate_to_millis(time: DateTime<Utc>) -> DateTime<Utc> {
    time.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(time)
}
