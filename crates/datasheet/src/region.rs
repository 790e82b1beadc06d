//! Named, marker-delimited regions of a markdown document.
//!
//! A region is delimited by a pair of HTML comments embedding the
//! tag name: `<!-- START-<TAG> -->` and `<!-- END-<TAG> -->`. Tag
//! names must not contain the literal substring `-->`.

use crate::error::{DatasheetError, DatasheetResult};

#[inline]
fn start_marker(tag: &str) -> String {
    format!("<!-- START-{tag} -->")
}

#[inline]
fn end_marker(tag: &str) -> String {
    format!("<!-- END-{tag} -->")
}

/// Returns the byte offsets of the start and end marker.
///
/// Each marker must occur exactly once and the end marker must
/// strictly follow the start marker.
fn bounds(text: &str, tag: &str) -> DatasheetResult<(usize, usize)> {
    let start = start_marker(tag);
    let end = end_marker(tag);

    if text.matches(&start).count() != 1
        || text.matches(&end).count() != 1
    {
        return Err(DatasheetError::TagNotFound(tag.into()));
    }

    let start_idx = text.find(&start).unwrap();
    let end_idx = text.find(&end).unwrap();

    if end_idx <= start_idx {
        return Err(DatasheetError::TagNotFound(tag.into()));
    }

    Ok((start_idx, end_idx))
}

/// Returns the trimmed interior of the tagged region.
pub(crate) fn extract(
    text: &str,
    tag: &str,
) -> DatasheetResult<String> {
    let (start_idx, end_idx) = bounds(text, tag)?;
    let interior = &text[start_idx + start_marker(tag).len()..end_idx];
    Ok(interior.trim().to_string())
}

/// Replaces the interior of the tagged region with `content`.
///
/// The previous interior is discarded entirely; everything outside
/// the marker pair is preserved character-for-character. This is a
/// pure transformation; writing the result back to disk is up to
/// the caller.
pub(crate) fn replace(
    text: &str,
    tag: &str,
    content: &str,
) -> DatasheetResult<String> {
    let start = start_marker(tag);
    let end = end_marker(tag);

    let (start_idx, end_idx) = bounds(text, tag)?;
    let prefix = &text[..start_idx];
    let suffix = &text[end_idx + end.len()..];

    Ok(format!(
        "{prefix}{start}\n{}\n{end}{suffix}",
        content.trim()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    const DOC: &str = "# Title\n\
        \n\
        <!-- START-DESC-STATS -->\n\
        - old content\n\
        <!-- END-DESC-STATS -->\n\
        \n\
        trailing text\n";

    #[test]
    fn extract_interior() -> TestResult {
        assert_eq!(extract(DOC, "DESC-STATS")?, "- old content");
        Ok(())
    }

    #[test]
    fn extract_missing_tag() {
        assert!(matches!(
            extract(DOC, "NO SUCH TAG"),
            Err(DatasheetError::TagNotFound(tag)) if tag == "NO SUCH TAG"
        ));
    }

    #[test]
    fn replace_interior() -> TestResult {
        let out = replace(DOC, "DESC-STATS", "- new content\n")?;

        assert!(out.starts_with("# Title\n\n<!-- START-DESC-STATS -->"));
        assert!(out.contains(
            "<!-- START-DESC-STATS -->\n- new content\n<!-- END-DESC-STATS -->"
        ));
        assert!(out.ends_with("\ntrailing text\n"));
        assert!(!out.contains("old content"));
        Ok(())
    }

    #[test]
    fn replace_roundtrip() -> TestResult {
        // re-inserting the extracted interior is a no-op
        let interior = extract(DOC, "DESC-STATS")?;
        assert_eq!(replace(DOC, "DESC-STATS", &interior)?, DOC);
        Ok(())
    }

    #[test]
    fn replace_is_idempotent() -> TestResult {
        let once = replace(DOC, "DESC-STATS", "payload")?;
        let twice = replace(&once, "DESC-STATS", "payload")?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn replace_duplicate_start_marker() {
        let doc = format!("<!-- START-X -->\n{DOC}");
        let doc = format!("{doc}<!-- START-X -->\n<!-- END-X -->\n");

        assert!(matches!(
            replace(&doc, "X", "payload"),
            Err(DatasheetError::TagNotFound(_))
        ));
    }

    #[test]
    fn replace_end_before_start() {
        let doc = "<!-- END-X -->\n<!-- START-X -->\n";

        assert!(matches!(
            replace(doc, "X", "payload"),
            Err(DatasheetError::TagNotFound(_))
        ));
    }

    #[test]
    fn replace_preserves_unrelated_tags() -> TestResult {
        let doc = "<!-- START-A -->\na\n<!-- END-A -->\n\
            <!-- START-B -->\nb\n<!-- END-B -->\n";
        let out = replace(doc, "A", "changed")?;

        assert!(
            out.contains("<!-- START-B -->\nb\n<!-- END-B -->")
        );
        Ok(())
    }
}
