//! Shared string formats and the custom validators built on them
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use glyco_structure::error::{self, Error};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

static ID_REGEX: OnceLock<Regex> = OnceLock::new();
static USER_ID_REGEX: OnceLock<Regex> = OnceLock::new();
static REVERSE_DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();
static SEMANTIC_VERSION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Record and upload ids: 32 lowercase hex characters
pub fn id_regex() -> &'static Regex {
    ID_REGEX.get_or_init(|| Regex::new("^[0-9a-f]{32}$").expect("id pattern compiles"))
}

/// User ids: 10 lowercase hex characters
pub fn user_id_regex() -> &'static Regex {
    USER_ID_REGEX.get_or_init(|| Regex::new("^[0-9a-f]{10}$").expect("user id pattern compiles"))
}

fn reverse_domain_regex() -> &'static Regex {
    REVERSE_DOMAIN_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{2,63}(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)+$")
            .expect("reverse domain pattern compiles")
    })
}

fn semantic_version_regex() -> &'static Regex {
    SEMANTIC_VERSION_REGEX.get_or_init(|| {
        Regex::new(
            r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$",
        )
        .expect("semantic version pattern compiles")
    })
}

/// Generate a fresh server-side record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn is_valid_id(value: &str) -> bool {
    id_regex().is_match(value)
}

pub fn validate_id(value: &str) -> Result<(), Error> {
    if is_valid_id(value) {
        Ok(())
    } else {
        Err(error::value_not_valid(format!("value {:?} is not a valid id", value)))
    }
}

pub fn validate_user_id(value: &str) -> Result<(), Error> {
    if user_id_regex().is_match(value) {
        Ok(())
    } else {
        Err(error::value_not_valid(format!("value {:?} is not a valid user id", value)))
    }
}

/// Absolute `http` or `https` URL with a host
pub fn validate_url(value: &str) -> Result<(), Error> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(error::value_not_valid(format!("value {:?} is not a valid url", value))),
    }
}

/// Reverse domain name such as `org.glyco.uploader`
pub fn validate_reverse_domain(value: &str) -> Result<(), Error> {
    if value.len() <= 253 && reverse_domain_regex().is_match(value) {
        Ok(())
    } else {
        Err(error::value_not_valid(format!(
            "value {:?} is not a valid reverse domain",
            value
        )))
    }
}

pub fn validate_semantic_version(value: &str) -> Result<(), Error> {
    if semantic_version_regex().is_match(value) {
        Ok(())
    } else {
        Err(error::value_not_valid(format!(
            "value {:?} is not a valid semantic version",
            value
        )))
    }
}
