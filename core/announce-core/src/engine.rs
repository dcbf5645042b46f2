//! AnnouncementEngine - the two-pass update over a presentation.
//!
//! ## Pass 1 (forward sweep over the pre-sweep order)
//!
//! For each slide: parse notes → copy detection → boundary bookkeeping →
//! skip permanent/expired → derive dates → "new" badge → expiration → write
//! notes back. Expiring slides are moved to the end as they are found, so the
//! live order drifts from the snapshot. The active boundary is the snapshot
//! index of the last slide that was permanent or not yet expired when the
//! sweep reached it, and it is never recomputed against the live order.
//!
//! ## Pass 2 (zombie reconciliation over the current order)
//!
//! Expired slides found at or before the boundary are relocated behind it.
//!
//! ## Failure Isolation
//!
//! A slide that fails (bad timestamp, host error) becomes a [`SlideFault`] in
//! the [`RunReport`]; the run always covers every slide.

use std::collections::HashSet;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::config::LifecycleConfig;
use crate::error::{AnnounceError, Result, SlideFault};
use crate::host::{MarkerPurpose, Presentation, SlideId};
use crate::lifecycle::{
    derive_dates, detect_copy, handle_expiration, handle_new_badge, is_copy, reconcile_slide,
    BadgeChange,
};
use crate::notes::{parse_raw, serialize, FieldKey, FieldSet};

/// What one update run did.
#[derive(Debug, Default)]
pub struct RunReport {
    pub slides_seen: usize,
    pub copies_reset: Vec<SlideId>,
    pub badges_added: Vec<SlideId>,
    pub badges_removed: Vec<SlideId>,
    pub expired: Vec<SlideId>,
    pub skipped: Vec<SlideId>,
    pub zombies: Vec<SlideId>,
    pub faults: Vec<SlideFault>,
    /// Snapshot index of the last active slide, before zombie relocation.
    pub boundary: Option<usize>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    fn fault(&mut self, slide: &SlideId, position: usize, error: AnnounceError) {
        warn!(slide = %slide, position, error = %error, "Slide update failed");
        self.faults.push(SlideFault {
            slide: slide.clone(),
            position,
            error,
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnnouncementEngine {
    config: LifecycleConfig,
}

impl AnnouncementEngine {
    pub fn new(config: LifecycleConfig) -> Self {
        Self { config }
    }

    /// Runs the update at the current local wall-clock time.
    pub fn run_now(&self, host: &mut dyn Presentation) -> RunReport {
        self.run(host, Local::now().naive_local())
    }

    pub fn run(&self, host: &mut dyn Presentation, now: NaiveDateTime) -> RunReport {
        let snapshot = host.slide_ids();
        let mut report = RunReport {
            slides_seen: snapshot.len(),
            ..RunReport::default()
        };
        let mut boundary = None;

        for (index, slide) in snapshot.iter().enumerate() {
            if let Err(error) =
                self.sweep_slide(host, slide, index, now, &mut boundary, &mut report)
            {
                report.fault(slide, index, error);
            }
        }

        let mut edge = boundary;
        report.boundary = boundary;
        debug!(boundary = ?boundary, "Pass one complete");

        let faulted: HashSet<SlideId> = report.faults.iter().map(|f| f.slide.clone()).collect();
        let style = self.config.markers.style(MarkerPurpose::Zombie);
        for slide in host.slide_ids() {
            if faulted.contains(&slide) {
                continue;
            }
            match reconcile_slide(host, &slide, &mut edge, style) {
                Ok(true) => report.zombies.push(slide),
                Ok(false) => {}
                Err(error) => {
                    let position = host.position_of(&slide).unwrap_or_default();
                    report.fault(&slide, position, error);
                }
            }
        }

        info!(
            slides = report.slides_seen,
            copies_reset = report.copies_reset.len(),
            badges_added = report.badges_added.len(),
            badges_removed = report.badges_removed.len(),
            expired = report.expired.len(),
            zombies = report.zombies.len(),
            faults = report.faults.len(),
            "Update run complete"
        );
        report
    }

    /// Pass-one work for one slide. Boundary bookkeeping happens before the
    /// skip check and before any date is read, so a failing slide still
    /// counts toward it.
    fn sweep_slide(
        &self,
        host: &mut dyn Presentation,
        slide: &SlideId,
        index: usize,
        now: NaiveDateTime,
        boundary: &mut Option<usize>,
        report: &mut RunReport,
    ) -> Result<()> {
        let raw = parse_raw(&host.notes(slide)?);
        // A copy is reset below, so its stored state does not count.
        let copied = is_copy(raw.value(FieldKey::ID), slide);
        let permanent = !copied && raw.is_permanent();
        let expired = !copied && raw.is_expired();

        if permanent || !expired {
            *boundary = Some(index);
        }
        if permanent || expired {
            debug!(slide = %slide, permanent, "Skipping slide");
            report.skipped.push(slide.clone());
            return Ok(());
        }

        let mut fields = if copied {
            raw.to_fields_lossy()
        } else {
            raw.to_fields()?
        };
        if detect_copy(&mut fields, slide) {
            report.copies_reset.push(slide.clone());
        }

        // Markers created before a failing host call are only tracked through
        // the notes, so they are written back either way.
        let advanced = self.advance(host, slide, &mut fields, now, report);
        let committed = host.set_notes(slide, &serialize(&fields));
        if advanced? {
            report.expired.push(slide.clone());
        }
        committed
    }

    /// Dates, badge, expiration. Returns true if the slide expired and moved.
    fn advance(
        &self,
        host: &mut dyn Presentation,
        slide: &SlideId,
        fields: &mut FieldSet,
        now: NaiveDateTime,
        report: &mut RunReport,
    ) -> Result<bool> {
        derive_dates(fields, now, &self.config.lifecycle)?;

        let markers = &self.config.markers;
        match handle_new_badge(host, slide, fields, now, markers.style(MarkerPurpose::New))? {
            BadgeChange::Added => report.badges_added.push(slide.clone()),
            BadgeChange::Removed | BadgeChange::ClearedMissing => {
                report.badges_removed.push(slide.clone())
            }
            BadgeChange::Unchanged => {}
        }

        handle_expiration(host, slide, fields, now, markers.style(MarkerPurpose::Expired))
    }
}
