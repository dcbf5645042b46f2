//! Slide lifecycle stages, run in order by the engine for each slide:
//!
//! - [`copy`]: detect host copies and reset them
//! - [`dates`]: derive `Created`, `Expires`, `Highlight`
//! - [`badge`]: add or remove the "new" badge
//! - [`expiration`]: mark and relocate expired slides
//! - [`zombie`]: second pass for expired slides dragged back by hand
//! - [`transition`]: state classification for display and tests

pub mod badge;
pub mod copy;
pub mod dates;
pub mod expiration;
pub mod transition;
pub mod zombie;

pub use badge::{handle_new_badge, BadgeChange};
pub use copy::{detect_copy, is_copy};
pub use dates::{derive_dates, highlight_delta};
pub use expiration::{handle_expiration, EXPIRED_NOTE};
pub use transition::SlideState;
pub use zombie::{reconcile_slide, ZOMBIE_NOTE};
