//! Line-oriented notes format.
//!
//! ```text
//! id:p3
//! Created:Mon 2024-01-15 09:00
//! Expires:Mon 2024-01-22 09:00
//! Bake sale on Friday in the cafeteria
//!
//! ```
//!
//! The first `:` on a line splits key from value; the value may contain more
//! colons (timestamps do). Lines without a separator are free text and are
//! written back after every `key:value` line, followed by two line breaks.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AnnounceError, Result};
use crate::host::{MarkerHandle, SlideId};

use super::types::{FieldKey, FieldSet};

const SEPARATOR: char = ':';

/// Canonical timestamp form, minute precision.
pub const TIMESTAMP_FORMAT: &str = "%a %Y-%m-%d %H:%M";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y, %I:%M %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Notes split into raw entries, before any value is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNotes {
    entries: Vec<(String, String)>,
    text: Vec<String>,
}

impl RawNotes {
    /// Last value written for `key`, ignoring empty values.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    pub fn is_permanent(&self) -> bool {
        self.value(FieldKey::PERMANENT).is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.value("expired").is_some()
    }

    /// Interprets every entry against the schema.
    pub fn to_fields(&self) -> Result<FieldSet> {
        self.interpret(true)
    }

    /// Like [`RawNotes::to_fields`], but an unreadable date is kept verbatim
    /// as an extra entry so it is written back unchanged.
    pub fn to_fields_lossy(&self) -> FieldSet {
        self.interpret(false).unwrap_or_default()
    }

    fn interpret(&self, strict: bool) -> Result<FieldSet> {
        let mut fields = FieldSet::new();
        for (key, value) in &self.entries {
            if value.is_empty() {
                continue;
            }
            match FieldKey::from_key(key) {
                FieldKey::Id => fields.set_id(SlideId::new(value.as_str())),
                FieldKey::Date(field) => match parse_timestamp(value) {
                    Some(parsed) => fields.set_date(field, parsed),
                    None if strict => {
                        return Err(AnnounceError::InvalidTimestamp {
                            key: field.key(),
                            value: value.clone(),
                        })
                    }
                    None => fields.set_extra(field.key(), value.as_str()),
                },
                FieldKey::Permanent => fields.set_permanent(value.as_str()),
                FieldKey::Marker(purpose) => {
                    fields.set_marker(purpose, MarkerHandle::new(value.as_str()))
                }
                FieldKey::Extra(name) => fields.set_extra(name, value.as_str()),
            }
        }
        for line in &self.text {
            fields.push_text(line.as_str());
        }
        Ok(fields)
    }
}

/// Splits notes text into entries and free-text lines.
pub fn parse_raw(text: &str) -> RawNotes {
    let mut raw = RawNotes::default();
    for line in text.lines() {
        match line.split_once(SEPARATOR) {
            Some((key, value)) => raw
                .entries
                .push((key.trim().to_string(), value.trim().to_string())),
            None if !line.trim().is_empty() => raw.text.push(line.to_string()),
            None => {}
        }
    }
    raw
}

/// Parses notes into a field set. A malformed timestamp is a parse fault.
pub fn parse(text: &str) -> Result<FieldSet> {
    parse_raw(text).to_fields()
}

/// Renders a field set back into notes text.
pub fn serialize(fields: &FieldSet) -> String {
    let mut lines: Vec<String> = Vec::new();
    for key in fields.order() {
        let value = match key {
            FieldKey::Id => fields.id().map(|id| id.to_string()),
            FieldKey::Date(field) => fields.date(*field).map(format_timestamp),
            FieldKey::Permanent => fields.permanent().map(str::to_string),
            FieldKey::Marker(purpose) => fields.marker(*purpose).map(|h| h.to_string()),
            FieldKey::Extra(name) => fields.extra(name).map(str::to_string),
        };
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            lines.push(format!("{}{}{}", key.as_key(), SEPARATOR, value));
        }
    }
    lines.extend(fields.text().iter().cloned());

    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts the canonical form plus the formats people and older versions
/// wrote. A leading weekday word is ignored, so editing the date without the
/// weekday still parses.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    try_formats(value).or_else(|| {
        let (head, rest) = value.split_once(char::is_whitespace)?;
        let head = head.trim_end_matches(',');
        if !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic()) {
            try_formats(rest.trim())
        } else {
            None
        }
    })
}

fn try_formats(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MarkerPurpose;
    use crate::notes::DateField;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .unwrap()
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let fields = parse("Owner:Ms. Lee: room 4\n").unwrap();
        assert_eq!(fields.extra("Owner"), Some("Ms. Lee: room 4"));
    }

    #[test]
    fn test_parse_collects_free_text_in_order() {
        let fields = parse("first line\n\nid:p1\nsecond line\n\n").unwrap();
        assert_eq!(fields.text(), &["first line", "second line"]);
        assert_eq!(fields.id(), Some(&SlideId::from("p1")));
    }

    #[test]
    fn test_parse_known_fields() {
        let text = "id:p1\nCreated:Mon 2024-01-15 09:00\nPermanent:yes\nbadge:b1\nexpired:e1\nzombieBadge:z1\n";
        let fields = parse(text).unwrap();
        assert_eq!(fields.created(), Some(at(2024, 1, 15, 9, 0)));
        assert!(fields.is_permanent());
        assert_eq!(
            fields.marker(MarkerPurpose::New),
            Some(&MarkerHandle::from("b1"))
        );
        assert!(fields.is_expired());
        assert_eq!(
            fields.marker(MarkerPurpose::Zombie),
            Some(&MarkerHandle::from("z1"))
        );
    }

    #[test]
    fn test_empty_value_is_absent() {
        let fields = parse("Created:\nPermanent:\nbadge:  \n").unwrap();
        assert_eq!(fields.created(), None);
        assert!(!fields.is_permanent());
        assert_eq!(fields.marker(MarkerPurpose::New), None);
        assert!(fields.order().is_empty());
    }

    #[test]
    fn test_malformed_timestamp_is_parse_fault() {
        let err = parse("Expires:next tuesday-ish\n").unwrap_err();
        match err {
            AnnounceError::InvalidTimestamp { key, value } => {
                assert_eq!(key, "Expires");
                assert_eq!(value, "next tuesday-ish");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_raw_flags_survive_parse_fault() {
        let raw = parse_raw("Created:garbage\nexpired:e1\n");
        assert!(raw.to_fields().is_err());
        assert!(raw.is_expired());
        assert!(!raw.is_permanent());
    }

    #[test]
    fn test_serialize_layout() {
        let mut fields = FieldSet::new();
        fields.set_id(SlideId::from("p1"));
        fields.set_date(DateField::Created, at(2024, 1, 15, 9, 0));
        fields.push_text("Bake sale");
        fields.push_text("Bring cash");

        assert_eq!(
            serialize(&fields),
            "id:p1\nCreated:Mon 2024-01-15 09:00\nBake sale\nBring cash\n\n"
        );
    }

    #[test]
    fn test_serialize_without_text_ends_with_blank_line() {
        let mut fields = FieldSet::new();
        fields.set_id(SlideId::from("p1"));
        assert_eq!(serialize(&fields), "id:p1\n\n");
    }

    #[test]
    fn test_dates_round_trip_to_the_minute() {
        let mut fields = FieldSet::new();
        let created = at(2024, 2, 29, 23, 59) + chrono::Duration::seconds(42);
        fields.set_date(DateField::Created, created);
        fields.set_date(DateField::Expires, at(2024, 3, 7, 23, 59));
        fields.set_date(DateField::Highlight, at(2024, 3, 1, 23, 59));
        fields.set_permanent("yes");

        let reparsed = parse(&serialize(&fields)).unwrap();
        assert_eq!(reparsed.created(), Some(at(2024, 2, 29, 23, 59)));
        assert_eq!(reparsed.expires(), fields.expires());
        assert_eq!(reparsed.highlight(), fields.highlight());
        assert_eq!(reparsed.permanent(), Some("yes"));
    }

    #[test]
    fn test_parse_timestamp_accepts_legacy_locale_output() {
        assert_eq!(
            parse_timestamp("1/15/2024, 9:05:00 AM"),
            Some(at(2024, 1, 15, 9, 5))
        );
        assert_eq!(
            parse_timestamp("12/1/2023, 3:30 PM"),
            Some(at(2023, 12, 1, 15, 30))
        );
    }

    #[test]
    fn test_parse_timestamp_ignores_stale_weekday() {
        // Person edited the date and left the weekday alone.
        assert_eq!(
            parse_timestamp("Mon 2024-01-17 09:00"),
            Some(at(2024, 1, 17, 9, 0))
        );
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2024-01-15"), Some(at(2024, 1, 15, 0, 0)));
    }

    #[test]
    fn test_parse_timestamp_rejects_nonsense() {
        assert_eq!(parse_timestamp("soon"), None);
        assert_eq!(parse_timestamp("Mon"), None);
        assert_eq!(parse_timestamp("2024-13-40 09:00"), None);
    }

    #[test]
    fn test_unknown_keys_are_preserved_in_order() {
        let text = "Owner:Ms. Lee\nid:p1\ntext:literal\n";
        let fields = parse(text).unwrap();
        assert_eq!(serialize(&fields), "Owner:Ms. Lee\nid:p1\ntext:literal\n\n");
    }

    #[test]
    fn test_lossy_fields_keep_unreadable_dates_verbatim() {
        let raw = parse_raw("id:p1\nCreated:sometime last week\nexpired:e1\nOld news\n");
        assert!(raw.to_fields().unwrap_err().is_parse_fault());

        let fields = raw.to_fields_lossy();
        assert!(fields.is_expired());
        assert_eq!(fields.created(), None);
        assert_eq!(
            serialize(&fields),
            "id:p1\nCreated:sometime last week\nexpired:e1\nOld news\n\n"
        );
    }
}
