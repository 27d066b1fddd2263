//! JSON-pointer references locating a value inside an inbound payload
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One step of a reference: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key.replace('~', "~0").replace('/', "~1")),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<&String> for Segment {
    fn from(key: &String) -> Self {
        Segment::Key(key.clone())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Immutable path from the payload root to a value
///
/// Deriving a child never touches the parent, so every scope can hold its own
/// reference while sharing nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Reference {
    segments: Vec<Segment>,
}

impl Reference {
    /// The empty reference, rendered as `""`
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a child reference one segment deeper
    pub fn with(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check whether `prefix` is an ancestor of (or equal to) this reference
    pub fn starts_with(&self, prefix: &Reference) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a JSON pointer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid reference {0:?}: must be empty or start with '/'")]
pub struct ParseReferenceError(String);

impl FromStr for Reference {
    type Err = ParseReferenceError;

    fn from_str(pointer: &str) -> Result<Self, Self::Err> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(ParseReferenceError(pointer.to_string()));
        };

        let segments = rest
            .split('/')
            .map(|token| {
                let token = token.replace("~1", "/").replace("~0", "~");
                // Pointers do not distinguish indices from numeric keys; canonical
                // decimals become indices so the pointer renders back unchanged.
                match canonical_index(&token) {
                    Some(index) => Segment::Index(index),
                    None => Segment::Key(token),
                }
            })
            .collect();
        Ok(Self { segments })
    }
}

/// `token` as an index, if it is a decimal without sign or leading zero
fn canonical_index(token: &str) -> Option<usize> {
    let digits = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
    if !digits || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    token.parse().ok()
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pointer = String::deserialize(deserializer)?;
        pointer.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_empty() {
        assert_eq!(Reference::root().to_string(), "");
        assert!(Reference::root().is_root());
    }

    #[test]
    fn test_with_appends_without_mutating_parent() {
        let parent = Reference::root().with(3usize);
        let child = parent.with("amount").with("units");
        assert_eq!(parent.to_string(), "/3");
        assert_eq!(child.to_string(), "/3/amount/units");
        assert!(child.starts_with(&parent));
        assert!(!parent.starts_with(&child));
    }

    #[test]
    fn test_keys_are_escaped() {
        let reference = Reference::root().with("a/b").with("m~n");
        assert_eq!(reference.to_string(), "/a~1b/m~0n");
    }

    #[test]
    fn test_parse_round_trip() {
        let reference: Reference = "/2/suppressed/a~1b".parse().unwrap();
        assert_eq!(
            reference.segments(),
            &[
                Segment::Index(2),
                Segment::Key("suppressed".to_string()),
                Segment::Key("a/b".to_string()),
            ]
        );
        assert_eq!(reference.to_string(), "/2/suppressed/a~1b");
    }

    #[test]
    fn test_parse_rejects_relative_pointer() {
        assert!("amount/value".parse::<Reference>().is_err());
    }

    #[test]
    fn test_serializes_as_pointer_string() {
        let reference = Reference::root().with(1usize).with("type");
        assert_eq!(serde_json::to_value(&reference).unwrap(), serde_json::json!("/1/type"));
    }

    #[test]
    fn test_non_canonical_numbers_stay_keys() {
        let reference: Reference = "/01/0/+2/ 3/10".parse().unwrap();
        assert_eq!(
            reference.segments(),
            &[
                Segment::Key("01".to_string()),
                Segment::Index(0),
                Segment::Key("+2".to_string()),
                Segment::Key(" 3".to_string()),
                Segment::Index(10),
            ]
        );
        assert_eq!(reference.to_string(), "/01/0/+2/ 3/10");

        let overflow = "/99999999999999999999999999".parse::<Reference>().unwrap();
        assert_eq!(
            overflow.segments(),
            &[Segment::Key("99999999999999999999999999".to_string())]
        );
    }

    #[test]
    fn test_leading_zero_key_survives_serde() {
        let reference = Reference::root().with("readings").with("007");
        let json = serde_json::to_value(&reference).unwrap();
        let back: Reference = serde_json::from_value(json).unwrap();
        assert_eq!(back.to_string(), "/readings/007");
    }
}
