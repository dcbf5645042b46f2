//! # announce-core
//!
//! Core library for Morning Announcements: ephemeral announcement slides
//! whose lifecycle metadata lives in each slide's speaker notes.
//!
//! ## Design Principles
//!
//! - **Notes are the database**: every field is a human-editable `key:value`
//!   line. Nothing survives between runs except notes, slide order and markers.
//! - **Synchronous**: a run is one uninterrupted sweep. Callers that can
//!   overlap (timer plus manual run) hold a [`RunGuard`].
//! - **Per-slide isolation**: a bad slide becomes a [`SlideFault`] in the
//!   [`RunReport`]; it never aborts the run.
//! - **Host-agnostic**: the engine drives any [`Presentation`]; [`Deck`] is
//!   the JSON-backed one.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use announce_core::{AnnouncementEngine, Deck, LifecycleConfig};
//!
//! let mut deck = Deck::load(path)?;
//! let report = AnnouncementEngine::new(LifecycleConfig::default()).run_now(&mut deck);
//! deck.save(path)?;
//! ```

pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod guard;
pub mod host;
pub mod lifecycle;
pub mod notes;
pub mod qr;
pub mod schedule;

pub use config::{load_config, LifecycleConfig, SaturdayRule};
pub use deck::Deck;
pub use engine::{AnnouncementEngine, RunReport};
pub use error::{AnnounceError, Result, SlideFault};
pub use guard::RunGuard;
pub use host::{MarkerHandle, MarkerPurpose, MarkerStyle, Presentation, SlideId};
pub use lifecycle::SlideState;
pub use notes::FieldSet;
pub use schedule::DailyTimer;
