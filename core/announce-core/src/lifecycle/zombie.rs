//! Zombie reconciliation.
//!
//! An expired slide sitting before the last active slide was dragged back by
//! hand. It is sent to just after the active region, marked, and annotated.
//!
//! The boundary is the pre-sweep index recorded by the first pass. It is
//! compared against live positions as is, and shrinks by one per relocation.
//! Dates are not needed here, so notes with an unreadable date still qualify.

use tracing::info;

use crate::error::{AnnounceError, Result};
use crate::host::{MarkerPurpose, MarkerStyle, Presentation, SlideId};
use crate::notes::{parse_raw, serialize};

pub const ZOMBIE_NOTE: &str = "This slide was expired, then dragged back to the start. It has been moved to maintain order in the presentation. To de-zombify this slide, be sure to delete the notes before moving it so it can start life as a new slide once again.";

/// Reconciles one slide against the boundary. Returns true if it was a zombie.
/// The boundary moves down by one for every zombie relocated behind it.
pub fn reconcile_slide(
    host: &mut dyn Presentation,
    slide: &SlideId,
    boundary: &mut Option<usize>,
    style: &MarkerStyle,
) -> Result<bool> {
    let Some(k) = *boundary else {
        return Ok(false);
    };
    let position = host
        .position_of(slide)
        .ok_or_else(|| AnnounceError::SlideNotFound(slide.clone()))?;
    if position > k {
        return Ok(false);
    }

    let mut fields = parse_raw(&host.notes(slide)?).to_fields_lossy();
    if !fields.is_expired() || fields.is_permanent() {
        return Ok(false);
    }

    host.move_slide(slide, k + 1)?;
    *boundary = k.checked_sub(1);

    fields.push_text(ZOMBIE_NOTE);
    let live_marker = fields
        .marker(MarkerPurpose::Zombie)
        .is_some_and(|handle| host.has_marker(slide, handle));
    if !live_marker {
        let handle = host.add_marker(slide, style)?;
        fields.set_marker(MarkerPurpose::Zombie, handle);
    }
    host.set_notes(slide, &serialize(&fields))?;

    info!(slide = %slide, from = position, to = k, "Relocated zombie slide");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::notes::parse;

    fn style() -> MarkerStyle {
        MarkerStyle::new("Zombie (see Notes)", "#7FBF3F")
    }

    #[test]
    fn test_zombie_moves_behind_active_region() {
        let mut deck = Deck::new();
        let zombie = deck.push_slide("id:z\nexpired:e1\nOld news\n");
        let a = deck.push_slide("id:a\n");
        let b = deck.push_slide("id:b\n");
        let mut boundary = Some(2);

        assert!(reconcile_slide(&mut deck, &zombie, &mut boundary, &style()).unwrap());
        assert_eq!(deck.slide_ids(), vec![a, b, zombie.clone()]);
        assert_eq!(boundary, Some(1));

        let fields = parse(&deck.notes(&zombie).unwrap()).unwrap();
        assert_eq!(fields.text(), &["Old news", ZOMBIE_NOTE]);
        let handle = fields.marker(MarkerPurpose::Zombie).unwrap();
        assert!(deck.has_marker(&zombie, handle));
    }

    #[test]
    fn test_slide_after_boundary_is_left_alone() {
        let mut deck = Deck::new();
        let _a = deck.push_slide("id:a\n");
        let expired = deck.push_slide("id:x\nexpired:e1\n");
        let before = deck.notes(&expired).unwrap();
        let mut boundary = Some(0);

        assert!(!reconcile_slide(&mut deck, &expired, &mut boundary, &style()).unwrap());
        assert_eq!(deck.notes(&expired).unwrap(), before);
        assert_eq!(boundary, Some(0));
    }

    #[test]
    fn test_active_slide_in_region_is_not_a_zombie() {
        let mut deck = Deck::new();
        let a = deck.push_slide("id:a\n");
        let _b = deck.push_slide("id:b\n");
        let mut boundary = Some(1);

        assert!(!reconcile_slide(&mut deck, &a, &mut boundary, &style()).unwrap());
        assert_eq!(boundary, Some(1));
    }

    #[test]
    fn test_permanent_expired_slide_is_not_a_zombie() {
        let mut deck = Deck::new();
        let p = deck.push_slide("Permanent:yes\nexpired:e1\n");
        let _b = deck.push_slide("id:b\n");
        let mut boundary = Some(1);

        assert!(!reconcile_slide(&mut deck, &p, &mut boundary, &style()).unwrap());
        assert_eq!(deck.position_of(&p), Some(0));
    }

    #[test]
    fn test_live_zombie_marker_is_reused() {
        let mut deck = Deck::new();
        let zombie = deck.push_slide("");
        let existing = deck.add_marker(&zombie, &style()).unwrap();
        deck.set_notes(&zombie, &format!("expired:e1\nzombieBadge:{existing}\n"))
            .unwrap();
        let _a = deck.push_slide("id:a\n");
        let mut boundary = Some(1);

        assert!(reconcile_slide(&mut deck, &zombie, &mut boundary, &style()).unwrap());
        let fields = parse(&deck.notes(&zombie).unwrap()).unwrap();
        assert_eq!(fields.marker(MarkerPurpose::Zombie), Some(&existing));
        assert_eq!(deck.slide(&zombie).unwrap().markers.len(), 1);
        assert_eq!(fields.text(), &[ZOMBIE_NOTE]);
    }

    #[test]
    fn test_unreadable_date_does_not_block_reconciliation() {
        let mut deck = Deck::new();
        let zombie = deck.push_slide("id:z\nCreated:last tuesday\nexpired:e1\n");
        let _a = deck.push_slide("id:a\n");
        let mut boundary = Some(1);

        assert!(reconcile_slide(&mut deck, &zombie, &mut boundary, &style()).unwrap());
        assert_eq!(deck.position_of(&zombie), Some(1));
        let notes = deck.notes(&zombie).unwrap();
        assert!(notes.starts_with("id:z\nCreated:last tuesday\nexpired:e1\nzombieBadge:"));
        assert!(notes.ends_with(&format!("{ZOMBIE_NOTE}\n\n")));
    }
}
