//! Dispatch one payload object to its record type and run every pass
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::datum::{DataNormalizer, Datum};
use crate::registry::{Policy, Registry};
use glyco_structure::{error, Base, ObjectParser, Origin, Validator};
use serde_json::{json, Value};
use tracing::debug;

/// Caller-supplied facts injected into every record before parsing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub user_id: Option<String>,
    pub upload_id: Option<String>,
    pub group_id: Option<String>,
    pub origin: Origin,
}

impl Context {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_upload_id(mut self, upload_id: impl Into<String>) -> Self {
        self.upload_id = Some(upload_id.into());
        self
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Builder<'r> {
    registry: &'r Registry,
    context: Context,
}

impl<'r> Builder<'r> {
    pub fn new(registry: &'r Registry, context: Context) -> Self {
        Self { registry, context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Build the record described by `value`, reporting under `base`
    ///
    /// Returns `None` if anything was reported while building this record.
    /// Derived records emitted during normalization go to `normalizer`.
    pub fn build(
        &self,
        value: &Value,
        base: &Base,
        normalizer: &DataNormalizer,
    ) -> Option<Box<dyn Datum>> {
        let errors_before = base.error_count();
        let mut parser = ObjectParser::from_value(base.clone(), value);
        parser.object_value()?;

        if !parser.exists("type") {
            base.with_reference("type").report_error(error::type_missing());
            return None;
        }
        let type_name = parser.string("type")?;
        let Some(registration) = self.registry.get(&type_name) else {
            base.with_reference("type")
                .report_error(error::type_unknown(&type_name));
            return None;
        };

        let meta = json!({ "type": type_name });
        let mut parser = parser.with_meta(meta.clone());

        let mut datum = registration.create();
        datum.common_mut().inject(&self.context);
        datum.parse(&mut parser);
        if registration.policy == Policy::Strict {
            parser.process_not_parsed();
        }

        let validator = Validator::from(parser.base().clone());
        datum.validate(&validator);
        datum.common().validate_context(&validator);

        if base.error_count() == errors_before {
            let normalizer = normalizer
                .with_source(base.reference().clone())
                .with_meta(meta);
            datum.normalize(&normalizer);
        }

        let errors = base.error_count() - errors_before;
        if errors > 0 {
            debug!(
                r#type = %type_name,
                source = %base.reference(),
                errors,
                "rejected record"
            );
            return None;
        }

        debug!(r#type = %type_name, source = %base.reference(), "built record");
        Some(datum)
    }
}
