//! Discriminator to constructor mapping
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::datum::Datum;
use crate::types::{basal, blob, bolus, glucose, upload, water, wizard};
use crate::types::{Basal, Blob, Bolus, Glucose, Upload, Water, Wizard};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Creates an empty record ready to be parsed
pub type Constructor = fn() -> Box<dyn Datum>;

/// Whether a record type accepts keys it does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Unknown keys are reported as `not-parsed`
    Strict,
    /// The record captures unknown keys itself
    Open,
}

#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub name: &'static str,
    pub policy: Policy,
    constructor: Constructor,
}

impl Registration {
    pub fn create(&self) -> Box<dyn Datum> {
        (self.constructor)()
    }
}

/// Immutable once built; safe to share across threads
#[derive(Debug, Clone, Default)]
pub struct Registry {
    registrations: BTreeMap<&'static str, Registration>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name`, replacing any earlier registration of the same name
    pub fn register(mut self, name: &'static str, policy: Policy, constructor: Constructor) -> Self {
        self.registrations.insert(
            name,
            Registration {
                name,
                policy,
                constructor,
            },
        );
        self
    }

    /// Every record type this crate ships
    pub fn standard() -> Self {
        Self::new()
            .register(basal::TYPE, Policy::Strict, Basal::create)
            .register(blob::TYPE, Policy::Open, Blob::create)
            .register(bolus::TYPE, Policy::Strict, Bolus::create)
            .register(glucose::TYPE_CBG, Policy::Strict, Glucose::create_continuous)
            .register(glucose::TYPE_SMBG, Policy::Strict, Glucose::create_self_monitored)
            .register(upload::TYPE, Policy::Strict, Upload::create)
            .register(water::TYPE, Policy::Strict, Water::create)
            .register(wizard::TYPE, Policy::Strict, Wizard::create)
    }

    /// Process-wide standard registry
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::standard)
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.registrations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registrations.contains_key(name)
    }

    /// Registered type names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registrations.keys().copied()
    }

    pub fn registrations(&self) -> impl Iterator<Item = &Registration> + '_ {
        self.registrations.values()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
