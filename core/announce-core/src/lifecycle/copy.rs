//! Copy detection.
//!
//! Every processed slide stamps its own id into its notes. A host copy
//! duplicates the notes verbatim, so a stamp that disagrees with the slide's
//! real id means this slide is a copy and must start over.

use tracing::info;

use crate::host::SlideId;
use crate::notes::FieldSet;

/// True when a stored stamp exists and names a different slide.
pub fn is_copy(stored: Option<&str>, actual: &SlideId) -> bool {
    stored.is_some_and(|stored| stored != actual.as_str())
}

/// Resets copied fields and (re)stamps the identity. Returns true on reset.
pub fn detect_copy(fields: &mut FieldSet, actual: &SlideId) -> bool {
    let copied = is_copy(fields.id().map(SlideId::as_str), actual);
    if copied {
        info!(
            slide = %actual,
            stamped = ?fields.id(),
            "Slide is a copy; resetting fields"
        );
        *fields = FieldSet::new();
    }
    fields.set_id(actual.clone());
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MarkerHandle, MarkerPurpose};
    use crate::notes::{parse, DateField};

    #[test]
    fn test_copy_discards_everything_but_id() {
        let mut fields =
            parse("id:p1\nCreated:2024-01-15 09:00\nexpired:e1\nBake sale\n").unwrap();

        assert!(detect_copy(&mut fields, &SlideId::from("p2")));
        assert_eq!(fields.id(), Some(&SlideId::from("p2")));
        assert_eq!(fields.date(DateField::Created), None);
        assert!(!fields.is_expired());
        assert!(fields.text().is_empty());
        assert_eq!(fields.order().len(), 1);
    }

    #[test]
    fn test_matching_id_is_kept() {
        let mut fields = FieldSet::new();
        fields.set_id(SlideId::from("p1"));
        fields.set_marker(MarkerPurpose::New, MarkerHandle::from("b1"));
        let before = fields.clone();

        assert!(!detect_copy(&mut fields, &SlideId::from("p1")));
        assert_eq!(fields, before);
    }

    #[test]
    fn test_missing_id_is_stamped() {
        let mut fields = FieldSet::new();
        fields.push_text("Hello");

        assert!(!detect_copy(&mut fields, &SlideId::from("p9")));
        assert_eq!(fields.id(), Some(&SlideId::from("p9")));
        assert_eq!(fields.text(), &["Hello"]);
    }

    #[test]
    fn test_is_copy() {
        let slide = SlideId::from("p1");
        assert!(!is_copy(None, &slide));
        assert!(!is_copy(Some("p1"), &slide));
        assert!(is_copy(Some("p0"), &slide));
    }
}
