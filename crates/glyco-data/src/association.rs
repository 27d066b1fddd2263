//! Links from a record to other records, blobs, images or URLs
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::datum::WireObject;
use crate::formats;
use glyco_structure::{error, ObjectParser, Validatable, Validator};
use serde_json::{Map, Value};

pub const TYPE_BLOB: &str = "blob";
pub const TYPE_DATUM: &str = "datum";
pub const TYPE_IMAGE: &str = "image";
pub const TYPE_URL: &str = "url";

pub const TYPES: &[&str] = &[TYPE_BLOB, TYPE_DATUM, TYPE_IMAGE, TYPE_URL];

pub const REASON_LENGTH_MAXIMUM: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Association {
    pub association_type: Option<String>,
    pub id: Option<String>,
    pub url: Option<String>,
    pub reason: Option<String>,
}

impl Association {
    pub fn parse(parser: &mut ObjectParser<'_>) -> Self {
        Self {
            association_type: parser.string("type"),
            id: parser.string("id"),
            url: parser.string("url"),
            reason: parser.string("reason"),
        }
    }

    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = WireObject::default();
        object.insert("type", self.association_type.clone());
        object.insert("id", self.id.clone());
        object.insert("url", self.url.clone());
        object.insert("reason", self.reason.clone());
        object.build()
    }
}

impl Validatable for Association {
    fn validate(&self, validator: &Validator) {
        validator
            .string("type", self.association_type.as_deref())
            .exists()
            .one_of(TYPES);

        match self.association_type.as_deref() {
            Some(TYPE_BLOB | TYPE_DATUM | TYPE_IMAGE) => {
                validator
                    .string("id", self.id.as_deref())
                    .exists()
                    .using(formats::validate_id);
                validator.string("url", self.url.as_deref()).not_exists();
            }
            Some(TYPE_URL) => {
                validator.string("id", self.id.as_deref()).not_exists();
                validator
                    .string("url", self.url.as_deref())
                    .exists()
                    .using(formats::validate_url);
            }
            // Type missing or invalid: already reported above.
            _ => {}
        }

        validator
            .string("reason", self.reason.as_deref())
            .length_in_range(1, REASON_LENGTH_MAXIMUM);
    }
}

/// Limit on the number of associations a record may carry
pub const ARRAY_LENGTH_MAXIMUM: usize = 100;

pub fn validate_array(validator: &Validator, associations: Option<&[Association]>) {
    if let Some(associations) = associations {
        if associations.len() > ARRAY_LENGTH_MAXIMUM {
            validator
                .with_reference("associations")
                .report_error(error::length_not_less_than_or_equal_to(
                    associations.len(),
                    ARRAY_LENGTH_MAXIMUM,
                ));
        }
    }
    validator.validate_each("associations", associations);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyco_structure::{ErrorCode, Origin};

    const ID: &str = "0123456789abcdef0123456789abcdef";

    fn validate(association: &Association) -> Vec<(String, ErrorCode)> {
        let validator = Validator::new(Origin::External);
        association.validate(&validator);
        validator
            .base()
            .error()
            .map(|errors| errors.iter().map(|e| (e.pointer(), e.code)).collect())
            .unwrap_or_default()
    }

    fn association(kind: &str, id: Option<&str>, url: Option<&str>) -> Association {
        Association {
            association_type: Some(kind.to_string()),
            id: id.map(str::to_string),
            url: url.map(str::to_string),
            reason: None,
        }
    }

    #[test]
    fn test_datum_with_url_reports_url_only() {
        let found = validate(&association(TYPE_DATUM, Some(ID), Some("https://example.com")));
        assert_eq!(found, vec![("/url".to_string(), ErrorCode::ValueExists)]);
    }

    #[test]
    fn test_url_with_empty_id_reports_id_only() {
        let found = validate(&association(TYPE_URL, Some(""), Some("https://example.com")));
        assert_eq!(found, vec![("/id".to_string(), ErrorCode::ValueExists)]);
    }

    #[test]
    fn test_valid_associations() {
        assert!(validate(&association(TYPE_IMAGE, Some(ID), None)).is_empty());
        assert!(validate(&association(TYPE_URL, None, Some("http://example.com/x"))).is_empty());
    }

    #[test]
    fn test_missing_type_skips_dependent_checks() {
        let found = validate(&Association {
            id: Some("bogus".to_string()),
            url: Some("bogus".to_string()),
            ..Association::default()
        });
        assert_eq!(found, vec![("/type".to_string(), ErrorCode::ValueNotExists)]);
    }

    #[test]
    fn test_reason_length() {
        let mut value = association(TYPE_DATUM, Some(ID), None);
        value.reason = Some(String::new());
        assert_eq!(
            validate(&value),
            vec![("/reason".to_string(), ErrorCode::LengthNotInRange)]
        );
    }

    #[test]
    fn test_blob_requires_valid_id() {
        assert_eq!(
            validate(&association(TYPE_BLOB, Some("xyz"), None)),
            vec![("/id".to_string(), ErrorCode::ValueNotValid)]
        );
        assert_eq!(
            validate(&association(TYPE_BLOB, None, None)),
            vec![("/id".to_string(), ErrorCode::ValueNotExists)]
        );
    }
}
