//! QR tiles for hyperlinks in a text selection.
//!
//! Each link becomes one square image from a public QR rendering endpoint.
//! The tiles share a fixed square area, stacked top to bottom.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AnnounceError, Result};

pub const QR_AREA: f64 = 400.0;
const QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("valid link regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct QrTile {
    pub link: String,
    pub image_url: String,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

/// Links in selection order. Trailing sentence punctuation is not part of a link.
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ')', '!', '?']).to_string())
        .collect()
}

pub fn qr_image_url(link: &str) -> String {
    format!("{QR_ENDPOINT}?data={}&size=400x400", urlencoding::encode(link))
}

/// Splits [`QR_AREA`] evenly among the links.
pub fn plan_tiles(links: &[String]) -> Result<Vec<QrTile>> {
    if links.is_empty() {
        return Err(AnnounceError::NoLinksSelected);
    }
    let size = QR_AREA / links.len() as f64;
    Ok(links
        .iter()
        .enumerate()
        .map(|(i, link)| QrTile {
            link: link.clone(),
            image_url: qr_image_url(link),
            left: 0.0,
            top: size * i as f64,
            size,
        })
        .collect())
}
