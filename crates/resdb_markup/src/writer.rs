//! Splicing rewritten attribute values back into a scanned fragment.

use crate::entities;
use std::ops::Range;

/// Replaces attribute value spans with entity-encoded replacements.
///
/// `edits` must be non-overlapping and in ascending span order, which
/// is the order [`crate::scan`] reports sites in. Every byte outside
/// the edited spans is copied through unchanged, so a fragment with no
/// edits re-serializes byte-for-byte identical.
#[must_use]
pub fn splice(src: &str, edits: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(src.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        debug_assert!(span.start >= cursor, "edits must be ordered and disjoint");
        out.push_str(&src[cursor..span.start]);
        out.push_str(&entities::encode(replacement));
        cursor = span.end;
    }
    out.push_str(&src[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    #[test]
    fn no_edits_is_identity() {
        let src = r#"<div><a href="Patient/1">x</a></div>"#;
        assert_eq!(splice(src, &[]), src);
    }

    #[test]
    fn replaces_scanned_span() {
        let src = r#"<div><a href="Patient/temp-1">x</a></div>"#;
        let sites = scan(src).unwrap();
        let edits = vec![(sites[0].span.clone(), "Patient/42".to_string())];
        assert_eq!(splice(src, &edits), r#"<div><a href="Patient/42">x</a></div>"#);
    }

    #[test]
    fn preserves_surrounding_markup() {
        let src = r#"<div class="x"><a href="a">1</a> text <img src="b"/></div>"#;
        let sites = scan(src).unwrap();
        let edits: Vec<_> = sites
            .iter()
            .map(|s| (s.span.clone(), format!("new-{}", s.value)))
            .collect();
        assert_eq!(
            splice(src, &edits),
            r#"<div class="x"><a href="new-a">1</a> text <img src="new-b"/></div>"#
        );
    }

    #[test]
    fn encodes_replacement_values() {
        let src = r#"<a href="x">y</a>"#;
        let sites = scan(src).unwrap();
        let edits = vec![(sites[0].span.clone(), "a&b".to_string())];
        assert_eq!(splice(src, &edits), r#"<a href="a&amp;b">y</a>"#);
    }
}
