//! Drive the builder over a batch, collecting every error
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::builder::{Builder, Context};
use crate::datum::{DataNormalizer, Datum};
use crate::registry::Registry;
use glyco_structure::{Base, Errors};
use serde_json::Value;
use std::fmt;
use tracing::info;

/// Everything a batch produced
///
/// Rejected elements contribute errors only. Records keep input order.
#[derive(Default)]
pub struct BatchOutcome {
    pub records: Vec<Box<dyn Datum>>,
    /// Records emitted during normalization, such as embedded wizard boluses
    pub derived: Vec<Box<dyn Datum>>,
    pub errors: Option<Errors>,
}

impl fmt::Debug for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOutcome")
            .field("records", &self.records.len())
            .field("derived", &self.derived.len())
            .field("errors", &self.error_count())
            .finish()
    }
}

impl BatchOutcome {
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Errors::len)
    }

    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }

    /// Accepted and derived records together, accepted first
    pub fn all_records(&self) -> impl Iterator<Item = &dyn Datum> + '_ {
        self.records
            .iter()
            .chain(self.derived.iter())
            .map(|datum| datum.as_ref())
    }

    /// Wire form of every accepted and derived record
    pub fn to_values(&self) -> Vec<Value> {
        self.all_records().map(|datum| datum.to_value()).collect()
    }

    /// All-or-nothing view of the batch
    pub fn into_result(self) -> Result<Vec<Box<dyn Datum>>, Errors> {
        match self.errors {
            Some(errors) => Err(errors),
            None => {
                let mut records = self.records;
                records.extend(self.derived);
                Ok(records)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Processor<'r> {
    builder: Builder<'r>,
}

impl<'r> Processor<'r> {
    pub fn new(registry: &'r Registry, context: Context) -> Self {
        Self {
            builder: Builder::new(registry, context),
        }
    }

    /// Processor over the standard record types
    pub fn standard(context: Context) -> Processor<'static> {
        Processor::new(Registry::global(), context)
    }

    pub fn builder(&self) -> &Builder<'r> {
        &self.builder
    }

    /// Build each element under `/i`
    pub fn process(&self, values: &[Value]) -> BatchOutcome {
        let base = Base::new(self.builder.context().origin);
        let normalizer = DataNormalizer::from_base(base.clone());

        let records: Vec<_> = values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                self.builder
                    .build(value, &base.with_reference(index), &normalizer)
            })
            .collect();

        self.finish(records, &base, &normalizer, values.len())
    }

    /// Build a single record with no prefix
    pub fn build_one(&self, value: &Value) -> BatchOutcome {
        let base = Base::new(self.builder.context().origin);
        let normalizer = DataNormalizer::from_base(base.clone());

        let records = self
            .builder
            .build(value, &base, &normalizer)
            .into_iter()
            .collect();

        self.finish(records, &base, &normalizer, 1)
    }

    /// Arrays are processed as batches, anything else as one record
    pub fn process_value(&self, value: &Value) -> BatchOutcome {
        match value {
            Value::Array(values) => self.process(values),
            other => self.build_one(other),
        }
    }

    fn finish(
        &self,
        records: Vec<Box<dyn Datum>>,
        base: &Base,
        normalizer: &DataNormalizer,
        submitted: usize,
    ) -> BatchOutcome {
        let outcome = BatchOutcome {
            records,
            derived: normalizer.take_data(),
            errors: base.error(),
        };
        info!(
            submitted,
            accepted = outcome.records.len(),
            derived = outcome.derived.len(),
            errors = outcome.error_count(),
            origin = %base.origin(),
            "processed batch"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bolus, Wizard};
    use glyco_structure::{ErrorCode, Origin};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn processor() -> Processor<'static> {
        Processor::standard(
            Context::new(Origin::External)
                .with_user_id("abcdef0123")
                .with_upload_id("0123456789abcdef0123456789abcdef"),
        )
    }

    fn pointers(outcome: &BatchOutcome) -> Vec<(String, ErrorCode)> {
        outcome
            .errors
            .as_ref()
            .map(|errors| errors.iter().map(|e| (e.pointer(), e.code)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_errors_are_prefixed_by_index() {
        let outcome = processor().process(&[
            json!({"type": "cbg", "units": "mmol/L", "value": 5.5}),
            json!({"type": "cbg", "units": "mmol/L", "value": 99}),
            json!(42),
        ]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            pointers(&outcome),
            vec![
                ("/1/value".to_string(), ErrorCode::ValueNotInRange),
                ("/2".to_string(), ErrorCode::TypeNotObject),
            ]
        );
    }

    #[test]
    fn test_all_errors_reported_not_first() {
        let outcome = processor().process(&[
            json!({"type": "bolus"}),
            json!({"type": "water"}),
            json!({"type": "basal", "extra": true}),
        ]);
        assert!(outcome.records.is_empty());
        let found = pointers(&outcome);
        assert!(found.contains(&("/0/subType".to_string(), ErrorCode::ValueNotExists)));
        assert!(found.contains(&("/1/amount".to_string(), ErrorCode::ValueNotExists)));
        assert!(found.contains(&("/2/extra".to_string(), ErrorCode::NotParsed)));
        assert!(found.contains(&("/2/deliveryType".to_string(), ErrorCode::ValueNotExists)));
    }

    #[test]
    fn test_empty_batch() {
        let outcome = processor().process(&[]);
        assert!(outcome.records.is_empty());
        assert!(outcome.errors.is_none());
        assert!(outcome.into_result().unwrap().is_empty());
    }

    #[test]
    fn test_build_one_has_no_prefix() {
        let outcome = processor().build_one(&json!({"type": "smbg", "units": "mg/dL"}));
        assert_eq!(
            pointers(&outcome),
            vec![("/value".to_string(), ErrorCode::ValueNotExists)]
        );
    }

    #[test]
    fn test_process_value_dispatches_on_shape() {
        let single = json!({"type": "cbg", "units": "mmol/L", "value": 5.5});
        assert_eq!(processor().process_value(&single).records.len(), 1);
        let batch = json!([single.clone(), single]);
        assert_eq!(processor().process_value(&batch).records.len(), 2);
    }

    #[test]
    fn test_embedded_wizard_bolus_is_derived() {
        let outcome = processor().process(&[json!({
            "type": "wizard",
            "units": "mmol/L",
            "carbInput": 30,
            "bolus": {"type": "bolus", "subType": "normal", "normal": 2.5},
        })]);
        assert!(outcome.errors.is_none(), "{:?}", outcome.errors);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.derived.len(), 1);

        let bolus = outcome.derived[0].downcast_ref::<Bolus>().unwrap();
        let wizard = outcome.records[0].downcast_ref::<Wizard>().unwrap();
        assert_eq!(bolus.normal, Some(2.5));
        assert_eq!(
            outcome.to_values()[0]["bolus"],
            json!(bolus.common.id.clone().unwrap())
        );
        assert_eq!(bolus.common.user_id, wizard.common.user_id);
    }

    #[test]
    fn test_into_result_rejects_whole_batch() {
        let outcome = processor().process(&[
            json!({"type": "cbg", "units": "mmol/L", "value": 5.5}),
            json!({"type": "bogus"}),
        ]);
        let errors = outcome.into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
