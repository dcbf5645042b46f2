//! Error types for announce-core operations.
//!
//! Nothing here is fatal to a run: the engine isolates per-slide failures into
//! [`SlideFault`]s and keeps going.

use std::path::PathBuf;

use crate::host::SlideId;

/// All errors that can occur in announce-core operations.
#[derive(Debug, thiserror::Error)]
pub enum AnnounceError {
    // ─────────────────────────────────────────────────────────────────────
    // Notes Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Unparsable {key} timestamp: {value:?}")]
    InvalidTimestamp { key: &'static str, value: String },

    #[error("Date arithmetic out of range: {key} = {base} + {days} days")]
    DateOutOfRange {
        key: &'static str,
        base: String,
        days: u64,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Host Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Slide not found: {0}")]
    SlideNotFound(SlideId),

    #[error("Host operation failed: {operation}: {details}")]
    Host { operation: String, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Home directory not found")]
    HomeDirNotFound,

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported deck version {found} (expected {expected})")]
    UnsupportedDeckVersion { found: u32, expected: u32 },

    // ─────────────────────────────────────────────────────────────────────
    // Run Guard Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Another update run holds the lock: {0}")]
    RunInProgress(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // Timer Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Timer setup not confirmed")]
    TimerNotConfirmed,

    #[error("Invalid hour {0:?}; expected a number between 0 and 23")]
    InvalidHour(String),

    // ─────────────────────────────────────────────────────────────────────
    // QR Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("No hyperlinks found in selection")]
    NoLinksSelected,
}

/// Convenience type alias for Results using AnnounceError.
pub type Result<T> = std::result::Result<T, AnnounceError>;

/// A failure isolated to one slide during a run.
#[derive(Debug, thiserror::Error)]
#[error("slide {slide} at position {position}: {error}")]
pub struct SlideFault {
    pub slide: SlideId,
    pub position: usize,
    #[source]
    pub error: AnnounceError,
}

impl AnnounceError {
    /// For [`Presentation`](crate::host::Presentation) implementors whose
    /// host call failed.
    pub fn host(operation: &str, details: impl Into<String>) -> Self {
        AnnounceError::Host {
            operation: operation.to_string(),
            details: details.into(),
        }
    }

    /// True for faults caused by what a person typed into the notes.
    pub fn is_parse_fault(&self) -> bool {
        matches!(self, AnnounceError::InvalidTimestamp { .. })
    }
}
