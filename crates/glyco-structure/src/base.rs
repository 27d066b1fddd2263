//! Shared error accumulator and the per-scope context carried beside it
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Errors};
use crate::reference::{Reference, Segment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Where the value being processed came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Untrusted input from a network caller
    #[default]
    External,
    /// Data produced by server-side normalization
    Internal,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::External => write!(f, "external"),
            Origin::Internal => write!(f, "internal"),
        }
    }
}

/// Error accumulator scoped to one reference, meta tag and origin
///
/// Every `with_*` derivation shares the same underlying error list, so an error
/// reported three scopes down is visible from the root. The list is `Rc`
/// shared, which keeps a whole tree on the thread that created it. A derived
/// scope must not outlive the parse, validate or normalize call it was
/// created for.
#[derive(Debug, Clone)]
pub struct Base {
    errors: Rc<RefCell<Vec<Error>>>,
    reference: Reference,
    meta: Option<Value>,
    origin: Origin,
}

impl Default for Base {
    fn default() -> Self {
        Self::new(Origin::default())
    }
}

impl Base {
    /// Create a root scope with an empty error list
    pub fn new(origin: Origin) -> Self {
        Self {
            errors: Rc::new(RefCell::new(Vec::new())),
            reference: Reference::root(),
            meta: None,
            origin,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }

    pub fn with_origin(&self, origin: Origin) -> Self {
        Self {
            origin,
            ..self.clone()
        }
    }

    /// Replace the reference outright
    pub fn with_source(&self, reference: Reference) -> Self {
        Self {
            reference,
            ..self.clone()
        }
    }

    pub fn with_meta(&self, meta: Value) -> Self {
        Self {
            meta: Some(meta),
            ..self.clone()
        }
    }

    /// Extend the reference by one key or index
    pub fn with_reference(&self, segment: impl Into<Segment>) -> Self {
        Self {
            reference: self.reference.with(segment),
            ..self.clone()
        }
    }

    /// Tag `error` with this scope's reference and meta and append it
    ///
    /// Accepts `Option<Error>` as well, where `None` is a no-op.
    pub fn report_error(&self, error: impl Into<Option<Error>>) {
        let Some(mut error) = error.into() else {
            return;
        };
        error.reference = Some(self.reference.clone());
        error.meta = self.meta.clone();

        trace!(
            code = %error.code,
            source = %self.reference,
            "reported error"
        );
        self.errors.borrow_mut().push(error);
    }

    /// Everything reported under this tree, or `None` if nothing was
    pub fn error(&self) -> Option<Errors> {
        let errors = self.errors.borrow();
        if errors.is_empty() {
            None
        } else {
            Some(Errors::from(errors.clone()))
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn has_error(&self) -> bool {
        self.error_count() > 0
    }

    /// Errors reported after the first `since` entries
    pub fn errors_since(&self, since: usize) -> Vec<Error> {
        self.errors
            .borrow()
            .iter()
            .skip(since)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{self, ErrorCode};
    use serde_json::json;

    #[test]
    fn test_new_base_has_no_error() {
        let base = Base::new(Origin::External);
        assert!(base.error().is_none());
        assert!(!base.has_error());
        assert!(base.reference().is_root());
    }

    #[test]
    fn test_derived_scopes_share_errors() {
        let root = Base::new(Origin::External);
        let nested = root.with_reference(2usize).with_reference("suppressed");

        nested.with_reference("rate").report_error(error::value_not_exists());

        let errors = root.error().expect("error visible from root");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.as_slice()[0].pointer(), "/2/suppressed/rate");
        assert_eq!(nested.reference().to_string(), "/2/suppressed");
    }

    #[test]
    fn test_report_none_is_noop() {
        let base = Base::default();
        base.report_error(None::<Error>);
        assert_eq!(base.error_count(), 0);
    }

    #[test]
    fn test_meta_is_copied_onto_errors() {
        let root = Base::new(Origin::External);
        let tagged = root.with_meta(json!({"type": "water"}));

        tagged.with_reference("amount").report_error(error::value_exists());
        root.report_error(error::value_empty());

        let errors = root.error().unwrap();
        assert_eq!(errors.as_slice()[0].meta, Some(json!({"type": "water"})));
        assert_eq!(errors.as_slice()[1].meta, None);
        assert_eq!(errors.as_slice()[1].code, ErrorCode::ValueEmpty);
    }

    #[test]
    fn test_with_origin_keeps_errors() {
        let root = Base::new(Origin::External);
        let internal = root.with_origin(Origin::Internal);
        internal.report_error(error::value_exists());

        assert_eq!(internal.origin(), Origin::Internal);
        assert_eq!(root.origin(), Origin::External);
        assert_eq!(root.error_count(), 1);
    }

    #[test]
    fn test_with_source_replaces_reference() {
        let base = Base::default().with_reference("a");
        let moved = base.with_source(Reference::root().with(7usize));
        assert_eq!(moved.reference().to_string(), "/7");
    }

    #[test]
    fn test_errors_since() {
        let base = Base::default();
        base.report_error(error::value_exists());
        let mark = base.error_count();
        base.report_error(error::value_empty());
        let since = base.errors_since(mark);
        assert_eq!(since.len(), 1);
        assert_eq!(since[0].code, ErrorCode::ValueEmpty);
    }
}
