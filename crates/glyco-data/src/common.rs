//! Fields shared by every record type
//!
//! Copyright (c) 2025 Glyco Team
//! Licensed under the Apache-2.0 license

use crate::association::{self, Association};
use crate::builder::Context;
use crate::datum::{DataNormalizer, WireObject};
use crate::formats;
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use glyco_structure::normalizer::{sort_strings, truncate_to_millis};
use glyco_structure::parser::{DEVICE_TIME_LAYOUT, RFC3339};
use glyco_structure::{ObjectParser, Origin, Validator};
use serde_json::{Map, Value};

pub const TIMEZONE_OFFSET_MINIMUM: i64 = -7 * 24 * 60;
pub const TIMEZONE_OFFSET_MAXIMUM: i64 = 7 * 24 * 60;
pub const DEVICE_ID_LENGTH_MAXIMUM: usize = 1000;
pub const TAGS_LENGTH_MAXIMUM: usize = 100;
pub const NOTES_LENGTH_MAXIMUM: usize = 100;
pub const NOTE_LENGTH_MAXIMUM: usize = 1000;
pub const ANNOTATIONS_LENGTH_MAXIMUM: usize = 100;

/// Keys filled from the caller context, never from the payload
pub const INJECTED_KEYS: [&str; 3] = ["_userId", "uploadId", "_groupId"];

/// Earliest accepted record time, 2000-01-01T00:00:00Z
fn fill<T: Clone>(field: &mut Option<T>, from: &Option<T>) {
    if field.is_none() {
        *field = from.clone();
    }
}

pub fn time_minimum() -> DateTime<Utc> {
    Utc.timestamp_opt(946_684_800, 0).single().unwrap_or_default()
}

/// How far into the future a record time may lie
pub fn time_future_threshold() -> Duration {
    Duration::days(1)
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Common {
    pub id: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub timezone_offset: Option<i64>,
    pub device_id: Option<String>,
    pub device_time: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<Vec<String>>,
    pub annotations: Option<Vec<Map<String, Value>>>,
    pub associations: Option<Vec<Association>>,

    // Supplied by the caller, never read from the payload.
    pub user_id: Option<String>,
    pub upload_id: Option<String>,
    pub group_id: Option<String>,
}

impl Common {
    /// Copy the caller's context in ahead of parsing
    pub fn inject(&mut self, context: &Context) {
        self.user_id = context.user_id.clone();
        self.upload_id = context.upload_id.clone();
        self.group_id = context.group_id.clone();
    }

    /// Fill whatever this record left absent from `parent`
    ///
    /// The id stays this record's own. The caller context always comes
    /// from `parent`.
    pub fn inherit(&mut self, parent: &Common) {
        fill(&mut self.time, &parent.time);
        fill(&mut self.timezone_offset, &parent.timezone_offset);
        fill(&mut self.device_id, &parent.device_id);
        fill(&mut self.device_time, &parent.device_time);
        fill(&mut self.tags, &parent.tags);
        fill(&mut self.notes, &parent.notes);
        fill(&mut self.annotations, &parent.annotations);
        fill(&mut self.associations, &parent.associations);

        self.user_id = parent.user_id.clone();
        self.upload_id = parent.upload_id.clone();
        self.group_id = parent.group_id.clone();
    }

    pub fn parse(&mut self, parser: &mut ObjectParser<'_>) {
        self.id = parser.string("id");
        self.time = parser.time("time", RFC3339);
        self.timezone_offset = parser.int("timezoneOffset");
        self.device_id = parser.string("deviceId");
        self.device_time = parser.string("deviceTime");
        self.tags = parser.string_array("tags");
        self.notes = parser.string_array("notes");
        self.annotations = parser.object_array("annotations");
        self.associations = parser.parse_object_array("associations", Association::parse);
    }

    pub fn validate(&self, validator: &Validator) {
        validator
            .string("id", self.id.as_deref())
            .using(formats::validate_id);
        validator
            .time("time", self.time)
            .after(time_minimum())
            .before_now(time_future_threshold());
        validator
            .int("timezoneOffset", self.timezone_offset)
            .in_range(TIMEZONE_OFFSET_MINIMUM, TIMEZONE_OFFSET_MAXIMUM);
        validator
            .string("deviceId", self.device_id.as_deref())
            .not_empty()
            .length_less_than_or_equal_to(DEVICE_ID_LENGTH_MAXIMUM);
        validator
            .string("deviceTime", self.device_time.as_deref())
            .as_time(DEVICE_TIME_LAYOUT);
        validator
            .string_array("tags", self.tags.as_deref())
            .length_less_than_or_equal_to(TAGS_LENGTH_MAXIMUM)
            .each_not_empty()
            .each_unique();
        validator
            .string_array("notes", self.notes.as_deref())
            .length_less_than_or_equal_to(NOTES_LENGTH_MAXIMUM)
            .each(|note| {
                note.length_in_range(1, NOTE_LENGTH_MAXIMUM);
            });
        validator
            .object_array("annotations", self.annotations.as_deref())
            .length_less_than_or_equal_to(ANNOTATIONS_LENGTH_MAXIMUM);
        association::validate_array(validator, self.associations.as_deref());
    }

    /// Check the injected caller context
    pub fn validate_context(&self, validator: &Validator) {
        validator
            .string("_userId", self.user_id.as_deref())
            .exists()
            .using(formats::validate_user_id);
        validator
            .string("uploadId", self.upload_id.as_deref())
            .exists()
            .using(formats::validate_id);
        validator
            .string("_groupId", self.group_id.as_deref())
            .not_empty();
    }

    pub fn normalize(&mut self, normalizer: &DataNormalizer) {
        if normalizer.origin() == Origin::External && self.id.is_none() {
            self.id = Some(formats::new_id());
        }
        self.time = self.time.map(truncate_to_millis);
        sort_strings(&mut self.tags);
    }

    /// Write the common fields onto `object`
    pub fn write(&self, object: &mut WireObject) {
        object.insert("id", self.id.clone());
        object.insert("time", self.time.as_ref().map(format_time));
        object.insert("timezoneOffset", self.timezone_offset);
        object.insert("deviceId", self.device_id.clone());
        object.insert("deviceTime", self.device_time.clone());
        object.insert("tags", self.tags.clone());
        object.insert("notes", self.notes.clone());
        object.insert(
            "annotations",
            self.annotations
                .as_ref()
                .map(|annotations| annotations.iter().cloned().map(Value::Object).collect::<Vec<_>>()),
        );
        object.insert(
            "associations",
            self.associations.as_ref().map(|associations| {
                associations
                    .iter()
                    .map(|association| Value::Object(association.to_object()))
                    .collect::<Vec<_>>()
            }),
        );
    }
}
