//! Speaker notes as a settings page.
//!
//! - [`types`]: the closed field schema (`FieldSet`)
//! - [`codec`]: `key:value` text format and timestamp handling

pub mod codec;
pub mod types;

pub use codec::{format_timestamp, parse, parse_raw, parse_timestamp, serialize, RawNotes};
pub use types::{DateField, FieldKey, FieldSet};
