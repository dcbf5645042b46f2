//! Expiration: mark, annotate, and send the slide to the end of the deck.

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::Result;
use crate::host::{MarkerPurpose, MarkerStyle, Presentation, SlideId};
use crate::notes::FieldSet;

pub const EXPIRED_NOTE: &str = "This slide has expired. If you want to bring it back to life, delete the contents of these notes and drag it back into the slideshow";

/// Returns true when the slide expired during this call.
pub fn handle_expiration(
    host: &mut dyn Presentation,
    slide: &SlideId,
    fields: &mut FieldSet,
    now: NaiveDateTime,
    style: &MarkerStyle,
) -> Result<bool> {
    if fields.is_permanent() || fields.is_expired() {
        return Ok(false);
    }
    let Some(expires) = fields.expires() else {
        return Ok(false);
    };
    if expires >= now {
        return Ok(false);
    }

    let handle = host.add_marker(slide, style)?;
    fields.set_marker(MarkerPurpose::Expired, handle);
    fields.push_text(EXPIRED_NOTE);
    let end = host.slide_count();
    host.move_slide(slide, end)?;
    info!(slide = %slide, expires = %expires, "Slide expired; moved to end");
    Ok(true)
}
