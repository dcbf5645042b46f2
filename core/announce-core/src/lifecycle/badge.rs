//! The "new" badge: present while `Highlight` is still in the future.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::Result;
use crate::host::{MarkerPurpose, MarkerStyle, Presentation, SlideId};
use crate::notes::FieldSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeChange {
    Added,
    Removed,
    /// The handle no longer resolved (shape deleted by hand); field cleared.
    ClearedMissing,
    Unchanged,
}

pub fn handle_new_badge(
    host: &mut dyn Presentation,
    slide: &SlideId,
    fields: &mut FieldSet,
    now: NaiveDateTime,
    style: &MarkerStyle,
) -> Result<BadgeChange> {
    if fields.is_permanent() {
        return Ok(BadgeChange::Unchanged);
    }

    let keep_badge = fields.highlight().is_some_and(|highlight| highlight > now);
    let current = fields.marker(MarkerPurpose::New).cloned();

    match (keep_badge, current) {
        (true, None) => {
            let handle = host.add_marker(slide, style)?;
            debug!(slide = %slide, handle = %handle, "Added new badge");
            fields.set_marker(MarkerPurpose::New, handle);
            Ok(BadgeChange::Added)
        }
        (false, Some(handle)) => {
            let removed = host.remove_marker(slide, &handle)?;
            fields.clear_marker(MarkerPurpose::New);
            if removed {
                debug!(slide = %slide, handle = %handle, "Removed new badge");
                Ok(BadgeChange::Removed)
            } else {
                debug!(slide = %slide, handle = %handle, "New badge already gone");
                Ok(BadgeChange::ClearedMissing)
            }
        }
        _ => Ok(BadgeChange::Unchanged),
    }
}
