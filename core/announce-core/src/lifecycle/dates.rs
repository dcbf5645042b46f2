//! Derives missing `Created`, `Expires` and `Highlight` values.
//!
//! All offsets are calendar days from `Created`, keeping its time of day.
//! Values already present are never recomputed.

use chrono::{Datelike, Days, NaiveDateTime, Weekday};
use tracing::debug;

use crate::config::{LifecycleSection, SaturdayRule};
use crate::error::{AnnounceError, Result};
use crate::notes::{DateField, FieldSet};

/// Fills in whichever date fields are absent. No-op for permanent slides.
pub fn derive_dates(
    fields: &mut FieldSet,
    now: NaiveDateTime,
    rules: &LifecycleSection,
) -> Result<()> {
    if fields.is_permanent() {
        return Ok(());
    }

    let created = match fields.created() {
        Some(created) => created,
        None => {
            fields.set_date(DateField::Created, now);
            now
        }
    };

    if fields.expires().is_none() {
        let expires = add_days(DateField::Expires, created, rules.expire_after_days)?;
        fields.set_date(DateField::Expires, expires);
    }

    if fields.highlight().is_none() {
        let delta = highlight_delta(created.weekday(), rules);
        let highlight = add_days(DateField::Highlight, created, delta)?;
        debug!(weekday = ?created.weekday(), delta, "Derived highlight window");
        fields.set_date(DateField::Highlight, highlight);
    }

    Ok(())
}

/// Days of "new" badge for an item created on `weekday`. Friday and Saturday
/// items stay highlighted over the weekend.
pub fn highlight_delta(weekday: Weekday, rules: &LifecycleSection) -> u64 {
    let mut delta = rules.highlight_after_days;
    match weekday {
        Weekday::Fri => delta += rules.friday_extra_days,
        Weekday::Sat if rules.saturday_rule == SaturdayRule::Intended => {
            delta += rules.saturday_extra_days
        }
        _ => {}
    }
    delta
}

fn add_days(key: DateField, base: NaiveDateTime, days: u64) -> Result<NaiveDateTime> {
    base.checked_add_days(Days::new(days))
        .ok_or_else(|| AnnounceError::DateOutOfRange {
            key: key.key(),
            base: base.to_string(),
            days,
        })
}
