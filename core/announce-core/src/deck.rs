//! JSON-backed presentation.
//!
//! Stands in for a live slides host: the CLI loads a deck file, runs the
//! engine against it, and writes it back. Tests use it in memory.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "slides": [
//!     { "id": "01HM...", "notes": "id:01HM...\n...", "markers": [], "images": [] }
//!   ],
//!   "timer": { "hour": 7 },
//!   "last_run": "2024-01-15T07:00:00"
//! }
//! ```
//!
//! # Atomic Writes
//!
//! Uses temp file + rename so an interrupted save never leaves half a deck.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use ulid::Ulid;

use crate::error::{AnnounceError, Result};
use crate::host::{MarkerHandle, MarkerStyle, Presentation, SlideId, MARKER_GEOMETRY};
use crate::qr::QrTile;
use crate::schedule::DailyTimer;

pub const DECK_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub handle: MarkerHandle,
    pub label: String,
    pub color: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
    pub font_family: String,
    pub font_size: f64,
    pub text_color: String,
}

impl Marker {
    /// A marker shape in the fixed banner placement.
    fn drawn(handle: MarkerHandle, style: &MarkerStyle) -> Self {
        let geometry = MARKER_GEOMETRY;
        Self {
            handle,
            label: style.label.clone(),
            color: style.color.clone(),
            left: geometry.left,
            top: geometry.top,
            width: geometry.width,
            height: geometry.height,
            rotation_degrees: geometry.rotation_degrees,
            font_family: geometry.font_family.to_string(),
            font_size: geometry.font_size,
            text_color: geometry.text_color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub source_url: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Slide {
    fn new(id: SlideId, notes: &str) -> Self {
        Self {
            id,
            notes: notes.to_string(),
            markers: Vec::new(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    version: u32,
    #[serde(default)]
    slides: Vec<Slide>,
    #[serde(default)]
    timer: Option<DailyTimer>,
    #[serde(default)]
    last_run: Option<NaiveDateTime>,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            version: DECK_VERSION,
            slides: Vec::new(),
            timer: None,
            last_run: None,
        }
    }
}

fn fresh_id() -> String {
    Ulid::new().to_string()
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).map_err(|source| AnnounceError::Io {
            context: format!("reading deck {}", path.display()),
            source,
        })?;
        let deck: Deck = serde_json::from_str(&content).map_err(|source| AnnounceError::Json {
            context: format!("parsing deck {}", path.display()),
            source,
        })?;
        if deck.version != DECK_VERSION {
            return Err(AnnounceError::UnsupportedDeckVersion {
                found: deck.version,
                expected: DECK_VERSION,
            });
        }
        Ok(deck)
    }

    /// Loads `path`, or starts an empty deck if it does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let io_err = |source| AnnounceError::Io {
            context: format!("writing deck {}", path.display()),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, self).map_err(|source| AnnounceError::Json {
            context: format!("serializing deck {}", path.display()),
            source,
        })?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.persist(path).map_err(|err| io_err(err.error))?;
        Ok(())
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, id: &SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| &s.id == id)
    }

    fn slide_mut(&mut self, id: &SlideId) -> Result<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| AnnounceError::SlideNotFound(id.clone()))
    }

    /// Appends a slide with a new id.
    pub fn push_slide(&mut self, notes: &str) -> SlideId {
        let id = SlideId::new(fresh_id());
        self.slides.push(Slide::new(id.clone(), notes));
        id
    }

    /// Copies a slide right after the original, the way a host "duplicate"
    /// does: same notes, same shapes under new handles, new slide id.
    pub fn duplicate_slide(&mut self, id: &SlideId) -> Result<SlideId> {
        let position = self
            .position_of(id)
            .ok_or_else(|| AnnounceError::SlideNotFound(id.clone()))?;
        let original = &self.slides[position];
        let copy = Slide {
            id: SlideId::new(fresh_id()),
            notes: original.notes.clone(),
            markers: original
                .markers
                .iter()
                .map(|m| Marker {
                    handle: MarkerHandle::new(fresh_id()),
                    ..m.clone()
                })
                .collect(),
            images: original.images.clone(),
        };
        let copy_id = copy.id.clone();
        self.slides.insert(position + 1, copy);
        Ok(copy_id)
    }

    /// Places QR tiles on a slide.
    pub fn insert_images(&mut self, id: &SlideId, tiles: &[QrTile]) -> Result<()> {
        let slide = self.slide_mut(id)?;
        slide.images.extend(tiles.iter().map(|tile| Image {
            source_url: tile.image_url.clone(),
            left: tile.left,
            top: tile.top,
            width: tile.size,
            height: tile.size,
        }));
        Ok(())
    }

    pub fn timer(&self) -> Option<&DailyTimer> {
        self.timer.as_ref()
    }

    /// Replaces any existing timer.
    pub fn set_timer(&mut self, timer: DailyTimer) {
        self.timer = Some(timer);
    }

    pub fn clear_timer(&mut self) -> Option<DailyTimer> {
        self.timer.take()
    }

    /// When the engine last ran against this deck.
    pub fn last_run(&self) -> Option<NaiveDateTime> {
        self.last_run
    }

    pub fn record_run(&mut self, at: NaiveDateTime) {
        self.last_run = Some(at);
    }

    /// True when a timer is set and has fired since the last run.
    pub fn is_timer_due(&self, now: NaiveDateTime) -> bool {
        self.timer.is_some_and(|timer| timer.is_due(self.last_run, now))
    }
}

impl Presentation for Deck {
    fn slide_ids(&self) -> Vec<SlideId> {
        self.slides.iter().map(|s| s.id.clone()).collect()
    }

    fn position_of(&self, slide: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| &s.id == slide)
    }

    fn notes(&self, slide: &SlideId) -> Result<String> {
        self.slide(slide)
            .map(|s| s.notes.clone())
            .ok_or_else(|| AnnounceError::SlideNotFound(slide.clone()))
    }

    fn set_notes(&mut self, slide: &SlideId, text: &str) -> Result<()> {
        self.slide_mut(slide)?.notes = text.to_string();
        Ok(())
    }

    fn move_slide(&mut self, slide: &SlideId, index: usize) -> Result<()> {
        let from = self
            .position_of(slide)
            .ok_or_else(|| AnnounceError::SlideNotFound(slide.clone()))?;
        let index = index.min(self.slides.len());
        let target = if index > from { index - 1 } else { index };
        let moved = self.slides.remove(from);
        self.slides.insert(target, moved);
        Ok(())
    }

    fn add_marker(&mut self, slide: &SlideId, style: &MarkerStyle) -> Result<MarkerHandle> {
        let handle = MarkerHandle::new(fresh_id());
        self.slide_mut(slide)?.markers.push(Marker::drawn(handle.clone(), style));
        Ok(handle)
    }

    fn remove_marker(&mut self, slide: &SlideId, handle: &MarkerHandle) -> Result<bool> {
        let markers = &mut self.slide_mut(slide)?.markers;
        let before = markers.len();
        markers.retain(|m| &m.handle != handle);
        Ok(markers.len() != before)
    }

    fn has_marker(&self, slide: &SlideId, handle: &MarkerHandle) -> bool {
        self.slide(slide)
            .is_some_and(|s| s.markers.iter().any(|m| &m.handle == handle))
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn deck_of(n: usize) -> (Deck, Vec<SlideId>) {
        let mut deck = Deck::new();
        let ids = (0..n).map(|_| deck.push_slide("")).collect();
        (deck, ids)
    }

    #[test]
    fn test_move_to_end_uses_pre_removal_index() {
        let (mut deck, ids) = deck_of(4);
        let end = deck.slide_count();
        deck.move_slide(&ids[1], end).unwrap();
        assert_eq!(
            deck.slide_ids(),
            vec![ids[0].clone(), ids[2].clone(), ids[3].clone(), ids[1].clone()]
        );
    }

    #[test]
    fn test_move_after_slide_k() {
        let (mut deck, ids) = deck_of(4);
        // k = 2: land directly after the slide currently at 2.
        deck.move_slide(&ids[0], 3).unwrap();
        assert_eq!(
            deck.slide_ids(),
            vec![ids[1].clone(), ids[2].clone(), ids[0].clone(), ids[3].clone()]
        );
    }

    #[test]
    fn test_move_forward_and_clamped() {
        let (mut deck, ids) = deck_of(3);
        deck.move_slide(&ids[2], 0).unwrap();
        assert_eq!(deck.position_of(&ids[2]), Some(0));
        deck.move_slide(&ids[2], 99).unwrap();
        assert_eq!(deck.position_of(&ids[2]), Some(2));
    }

    #[test]
    fn test_unknown_slide_is_error() {
        let (mut deck, _) = deck_of(1);
        let ghost = SlideId::from("ghost");
        assert!(matches!(
            deck.set_notes(&ghost, "x"),
            Err(AnnounceError::SlideNotFound(_))
        ));
        assert!(!deck.has_marker(&ghost, &MarkerHandle::from("m")));
    }

    #[test]
    fn test_markers_add_and_remove() {
        let (mut deck, ids) = deck_of(1);
        let style = MarkerStyle::new("new", "#0033a0");
        let handle = deck.add_marker(&ids[0], &style).unwrap();
        assert!(deck.has_marker(&ids[0], &handle));
        assert!(deck.remove_marker(&ids[0], &handle).unwrap());
        assert!(!deck.remove_marker(&ids[0], &handle).unwrap());
    }

    #[test]
    fn test_markers_use_fixed_banner_placement() {
        let (mut deck, ids) = deck_of(1);
        deck.add_marker(&ids[0], &MarkerStyle::new("expired", "#7f7f7f"))
            .unwrap();
        let marker = &deck.slide(&ids[0]).unwrap().markers[0];
        assert_eq!(marker.label, "expired");
        assert_eq!((marker.left, marker.top), (475.0, 0.0));
        assert_eq!((marker.width, marker.height), (400.0, 75.0));
        assert_eq!(marker.rotation_degrees, 45.0);
        assert_eq!(marker.font_family, "Cantarell");
        assert_eq!(marker.text_color, "#fefefe");
    }

    #[test]
    fn test_duplicate_copies_notes_with_new_identity() {
        let (mut deck, ids) = deck_of(2);
        let style = MarkerStyle::new("new", "#0033a0");
        let handle = deck.add_marker(&ids[0], &style).unwrap();
        deck.set_notes(&ids[0], "id:orig\nHello\n").unwrap();

        let copy = deck.duplicate_slide(&ids[0]).unwrap();
        assert_ne!(copy, ids[0]);
        assert_eq!(deck.position_of(&copy), Some(1));
        assert_eq!(deck.notes(&copy).unwrap(), "id:orig\nHello\n");
        assert!(!deck.has_marker(&copy, &handle));
        assert_eq!(deck.slide(&copy).unwrap().markers.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let (mut deck, ids) = deck_of(2);
        deck.set_notes(&ids[1], "Permanent:yes\n").unwrap();
        deck.set_timer(DailyTimer { hour: 7 });
        deck.save(&path).unwrap();

        let loaded = Deck::load(&path).unwrap();
        assert_eq!(loaded, deck);
        assert_eq!(loaded.timer(), Some(&DailyTimer { hour: 7 }));
    }

    #[test]
    fn test_timer_due_after_last_run() {
        let (mut deck, _) = deck_of(0);
        let at = |d: u32, h: u32| {
            chrono::NaiveDate::from_ymd_opt(2024, 1, d)
                .and_then(|date| date.and_hms_opt(h, 0, 0))
                .unwrap()
        };
        assert!(!deck.is_timer_due(at(15, 9)));
        deck.set_timer(DailyTimer { hour: 7 });
        assert!(deck.is_timer_due(at(15, 9)));
        deck.record_run(at(15, 9));
        assert!(!deck.is_timer_due(at(15, 23)));
        assert!(deck.is_timer_due(at(16, 7)));
    }

    #[test]
    fn test_load_or_default_for_missing_file() {
        let dir = tempdir().unwrap();
        let deck = Deck::load_or_default(&dir.path().join("none.json")).unwrap();
        assert!(deck.slides().is_empty());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.json");
        fs_err::write(&path, r#"{"version": 9, "slides": []}"#).unwrap();
        assert!(matches!(
            Deck::load(&path),
            Err(AnnounceError::UnsupportedDeckVersion { found: 9, .. })
        ));
    }
}
