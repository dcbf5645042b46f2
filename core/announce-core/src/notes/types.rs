//! The closed field schema stored in a slide's notes.
//!
//! Each known key has its own slot. Unknown `key:value` lines are kept as
//! extras so that a human's own annotations survive a pass. Serialization
//! order is insertion order, tracked separately in `order`.

use chrono::NaiveDateTime;

use crate::host::{MarkerHandle, MarkerPurpose, SlideId};

/// Timestamp-valued keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Created,
    Expires,
    Highlight,
}

impl DateField {
    pub fn key(self) -> &'static str {
        match self {
            DateField::Created => "Created",
            DateField::Expires => "Expires",
            DateField::Highlight => "Highlight",
        }
    }
}

/// Position-tracking key for insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Id,
    Date(DateField),
    Permanent,
    Marker(MarkerPurpose),
    Extra(String),
}

impl FieldKey {
    pub const ID: &'static str = "id";
    pub const PERMANENT: &'static str = "Permanent";

    /// Maps a notes key to its slot. Unknown keys become extras.
    pub fn from_key(key: &str) -> Self {
        match key {
            Self::ID => FieldKey::Id,
            "Created" => FieldKey::Date(DateField::Created),
            "Expires" => FieldKey::Date(DateField::Expires),
            "Highlight" => FieldKey::Date(DateField::Highlight),
            Self::PERMANENT => FieldKey::Permanent,
            "badge" => FieldKey::Marker(MarkerPurpose::New),
            "expired" => FieldKey::Marker(MarkerPurpose::Expired),
            "zombieBadge" => FieldKey::Marker(MarkerPurpose::Zombie),
            other => FieldKey::Extra(other.to_string()),
        }
    }

    pub fn as_key(&self) -> &str {
        match self {
            FieldKey::Id => Self::ID,
            FieldKey::Date(field) => field.key(),
            FieldKey::Permanent => Self::PERMANENT,
            FieldKey::Marker(MarkerPurpose::New) => "badge",
            FieldKey::Marker(MarkerPurpose::Expired) => "expired",
            FieldKey::Marker(MarkerPurpose::Zombie) => "zombieBadge",
            FieldKey::Extra(name) => name,
        }
    }
}

/// Lifecycle metadata of one slide, materialized fresh from its notes each pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    id: Option<SlideId>,
    created: Option<NaiveDateTime>,
    expires: Option<NaiveDateTime>,
    highlight: Option<NaiveDateTime>,
    permanent: Option<String>,
    badge: Option<MarkerHandle>,
    expired: Option<MarkerHandle>,
    zombie_badge: Option<MarkerHandle>,
    extras: Vec<(String, String)>,
    text: Vec<String>,
    order: Vec<FieldKey>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&mut self, key: FieldKey) {
        if !self.order.contains(&key) {
            self.order.push(key);
        }
    }

    fn forget(&mut self, key: &FieldKey) {
        self.order.retain(|k| k != key);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> Option<&SlideId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: SlideId) {
        self.id = Some(id);
        self.touch(FieldKey::Id);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dates
    // ─────────────────────────────────────────────────────────────────────

    pub fn date(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::Created => self.created,
            DateField::Expires => self.expires,
            DateField::Highlight => self.highlight,
        }
    }

    pub fn set_date(&mut self, field: DateField, value: NaiveDateTime) {
        let slot = match field {
            DateField::Created => &mut self.created,
            DateField::Expires => &mut self.expires,
            DateField::Highlight => &mut self.highlight,
        };
        *slot = Some(value);
        self.touch(FieldKey::Date(field));
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        self.created
    }

    pub fn expires(&self) -> Option<NaiveDateTime> {
        self.expires
    }

    pub fn highlight(&self) -> Option<NaiveDateTime> {
        self.highlight
    }

    // ─────────────────────────────────────────────────────────────────────
    // Permanent flag
    // ─────────────────────────────────────────────────────────────────────

    pub fn is_permanent(&self) -> bool {
        self.permanent.is_some()
    }

    pub fn permanent(&self) -> Option<&str> {
        self.permanent.as_deref()
    }

    pub fn set_permanent(&mut self, value: impl Into<String>) {
        self.permanent = Some(value.into());
        self.touch(FieldKey::Permanent);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Markers
    // ─────────────────────────────────────────────────────────────────────

    pub fn marker(&self, purpose: MarkerPurpose) -> Option<&MarkerHandle> {
        match purpose {
            MarkerPurpose::New => self.badge.as_ref(),
            MarkerPurpose::Expired => self.expired.as_ref(),
            MarkerPurpose::Zombie => self.zombie_badge.as_ref(),
        }
    }

    pub fn set_marker(&mut self, purpose: MarkerPurpose, handle: MarkerHandle) {
        *self.marker_slot(purpose) = Some(handle);
        self.touch(FieldKey::Marker(purpose));
    }

    pub fn clear_marker(&mut self, purpose: MarkerPurpose) -> Option<MarkerHandle> {
        self.forget(&FieldKey::Marker(purpose));
        self.marker_slot(purpose).take()
    }

    fn marker_slot(&mut self, purpose: MarkerPurpose) -> &mut Option<MarkerHandle> {
        match purpose {
            MarkerPurpose::New => &mut self.badge,
            MarkerPurpose::Expired => &mut self.expired,
            MarkerPurpose::Zombie => &mut self.zombie_badge,
        }
    }

    /// Expiration is terminal: there is no way to clear it short of
    /// rewriting the notes.
    pub fn is_expired(&self) -> bool {
        self.expired.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Extras and free text
    // ─────────────────────────────────────────────────────────────────────

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.extras.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.extras.push((key.clone(), value)),
        }
        self.touch(FieldKey::Extra(key));
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }

    pub fn push_text(&mut self, line: impl Into<String>) {
        self.text.push(line.into());
    }

    /// Keys in the order they were populated.
    pub fn order(&self) -> &[FieldKey] {
        &self.order
    }
}
