//! Host surface the engine drives: the ordered slide sequence, each slide's
//! speaker notes, and the marker shapes drawn on slides.
//!
//! The engine never assumes a marker handle still resolves. People delete
//! shapes by hand, so `remove_marker` reports a miss instead of failing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Stable identity the host assigns to a physical slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlideId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to a marker shape on one slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerHandle(String);

impl MarkerHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MarkerHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which lifecycle signal a marker carries. At most one marker per purpose
/// is tracked per slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerPurpose {
    New,
    Expired,
    Zombie,
}

/// Label and fill color of a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub label: String,
    pub color: String,
}

impl MarkerStyle {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

/// Fixed placement of every marker: a rotated banner across the top-right
/// corner of a standard 720pt-wide slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
    pub font_family: &'static str,
    pub font_size: f64,
    pub text_color: &'static str,
}

pub const MARKER_GEOMETRY: MarkerGeometry = MarkerGeometry {
    left: 475.0,
    top: 0.0,
    width: 400.0,
    height: 75.0,
    rotation_degrees: 45.0,
    font_family: "Cantarell",
    font_size: 18.0,
    text_color: "#fefefe",
};

/// Trait for presentation hosts.
///
/// Implementors should:
/// - Keep `SlideId`s stable for the lifetime of a physical slide
/// - Treat `move_slide`'s index as counted before the slide is taken out, so
///   `slide_count()` means "the end" and `k + 1` lands right after slide `k`
/// - Return `Ok(false)` from `remove_marker` when the handle no longer resolves
pub trait Presentation {
    /// Current slide order.
    fn slide_ids(&self) -> Vec<SlideId>;

    /// Current zero-based position of a slide, if it exists.
    fn position_of(&self, slide: &SlideId) -> Option<usize>;

    /// Raw speaker-notes text.
    fn notes(&self, slide: &SlideId) -> Result<String>;

    fn set_notes(&mut self, slide: &SlideId, text: &str) -> Result<()>;

    fn move_slide(&mut self, slide: &SlideId, index: usize) -> Result<()>;

    /// Draw a marker using [`MARKER_GEOMETRY`] and return its handle.
    fn add_marker(&mut self, slide: &SlideId, style: &MarkerStyle) -> Result<MarkerHandle>;

    /// Remove a marker. `Ok(false)` means it was already gone.
    fn remove_marker(&mut self, slide: &SlideId, handle: &MarkerHandle) -> Result<bool>;

    fn has_marker(&self, slide: &SlideId, handle: &MarkerHandle) -> bool;

    fn slide_count(&self) -> usize {
        self.slide_ids().len()
    }
}
