//! Per-slide lifecycle states, read off a field set.
//!
//! ```text
//! Fresh ──dates derived──▶ Highlighted ──now ≥ Highlight──▶ Active
//! Active ──now > Expires──▶ Expired ──dragged before boundary──▶ Zombie
//! any non-permanent ──id mismatch──▶ (copy reset) ──▶ Fresh
//! Permanent: set by hand, never left by the engine
//! ```

use std::fmt;

use chrono::NaiveDateTime;

use crate::host::MarkerPurpose;
use crate::notes::FieldSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    Fresh,
    Active,
    Highlighted,
    Expired,
    Zombie,
    Permanent,
}

impl SlideState {
    pub fn classify(fields: &FieldSet, now: NaiveDateTime) -> Self {
        if fields.is_permanent() {
            return SlideState::Permanent;
        }
        if fields.is_expired() {
            return if fields.marker(MarkerPurpose::Zombie).is_some() {
                SlideState::Zombie
            } else {
                SlideState::Expired
            };
        }
        if fields.created().is_none() {
            return SlideState::Fresh;
        }
        match fields.highlight() {
            Some(highlight) if highlight > now => SlideState::Highlighted,
            _ => SlideState::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlideState::Fresh => "fresh",
            SlideState::Active => "active",
            SlideState::Highlighted => "highlighted",
            SlideState::Expired => "expired",
            SlideState::Zombie => "zombie",
            SlideState::Permanent => "permanent",
        }
    }
}

impl fmt::Display for SlideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
