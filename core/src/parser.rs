//! Turns one raw source into a [`Document`].
//!
//! Sources look like this:
//!
//! ```text
//! ---
//! Title: Hello
//! Date: 2024-06-01
//! ---
//! Body in *markdown*.
//! ```
//!
//! Anything before the first `---` is ignored, and header lines other than
//! `Title: ` and `Date: ` are skipped.

use std::borrow::Cow;
use std::path::Path;

use time::macros::format_description;
use time::Date;

use crate::markdown::render_markdown;
use crate::{Document, Error, Result};

pub const DELIMITER: &str = "---";
/// Summary length, in characters.
pub const SUMMARY_LIMIT: usize = 150;
pub const TRUNCATION_MARKER: &str = "...";

const TITLE_PREFIX: &str = "Title: ";
const DATE_PREFIX: &str = "Date: ";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub published_at: Option<Date>,
}

/// Parse a source named `source_name` into a document.
///
/// Fails with [`Error::MalformedStructure`] when the header delimiters or the
/// body are missing and with [`Error::RenderFailure`] when markdown conversion
/// fails. A bad `Date:` value is not an error.
pub fn parse(source_name: &str, raw: &[u8]) -> Result<Document> {
    let text = String::from_utf8_lossy(raw);
    let (meta, body) = split_sections(&text).ok_or_else(|| Error::MalformedStructure {
        name: source_name.to_string(),
    })?;

    let header = parse_header(meta);
    let body_html = render_markdown(body).map_err(|source| Error::RenderFailure {
        name: source_name.to_string(),
        source,
    })?;
    tracing::trace!(source = source_name, bytes = raw.len(), "parsed document");

    Ok(Document {
        title: header.title,
        published_at: header.published_at,
        slug: derive_slug(source_name),
        body_html,
        summary: summarize(body).into_owned(),
    })
}

/// Split text into the metadata block and the raw body.
///
/// Returns `None` unless two delimiters are present and something follows the
/// second one. The line break closing the second delimiter is not part of the
/// body.
pub fn split_sections(text: &str) -> Option<(&str, &str)> {
    let mut parts = text.splitn(3, DELIMITER);
    let _preamble = parts.next()?;
    let meta = parts.next()?;
    let rest = parts.next()?;
    if rest.is_empty() {
        return None;
    }
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    Some((meta, body))
}

/// Read `Title: ` and `Date: ` lines. Later lines override earlier ones.
pub fn parse_header(meta: &str) -> Header {
    let mut header = Header::default();
    for line in meta.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(title) = line.strip_prefix(TITLE_PREFIX) {
            header.title = title.to_string();
        } else if let Some(date) = line.strip_prefix(DATE_PREFIX) {
            header.published_at = parse_date(date);
        }
    }
    header
}

/// `YYYY-MM-DD`, surrounding whitespace ignored.
pub fn parse_date(value: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value.trim(), &format).ok()
}

/// Base name of `source_name` with its final extension removed.
///
/// Leading-dot names such as `.draft` have no extension and are kept whole,
/// deliberately, instead of collapsing to an empty slug that no URL can reach.
pub fn derive_slug(source_name: &str) -> String {
    let path = Path::new(source_name);
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => source_name.to_string(),
    }
}

/// First [`SUMMARY_LIMIT`] characters plus [`TRUNCATION_MARKER`], or the whole
/// body if it is short enough.
pub fn summarize(body: &str) -> Cow<'_, str> {
    match body.char_indices().nth(SUMMARY_LIMIT) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &body[..cut], TRUNCATION_MARKER)),
        None => Cow::Borrowed(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn splits_header_and_body() {
        let (meta, body) = split_sections("---\nTitle: A\n---\nHello").unwrap();
        assert_eq!(meta, "\nTitle: A\n");
        assert_eq!(body, "Hello");
    }

    #[test]
    fn split_keeps_later_delimiters_in_body() {
        let (_, body) = split_sections("---\n---\nabove\n---\nbelow").unwrap();
        assert_eq!(body, "above\n---\nbelow");
    }

    #[test]
    fn split_rejects_missing_parts() {
        assert!(split_sections("no header at all").is_none());
        assert!(split_sections("---\nTitle: only one delimiter").is_none());
        assert!(split_sections("---\nTitle: A\n---").is_none());
    }

    #[test]
    fn split_allows_empty_body() {
        let (_, body) = split_sections("---\nTitle: A\n---\n").unwrap();
        assert_eq!(body, "");
    }

    #[test]
    fn header_reads_known_fields() {
        let header = parse_header("\nDate: 2024-02-29\nAuthor: someone\nTitle: Leap\n");
        assert_eq!(header.title, "Leap");
        assert_eq!(header.published_at, Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn header_handles_crlf() {
        let header = parse_header("\r\nTitle: Windows\r\nDate: 2023-01-05\r\n");
        assert_eq!(header.title, "Windows");
        assert_eq!(header.published_at, Some(date!(2023 - 01 - 05)));
    }

    #[test]
    fn bad_dates_become_none() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2024-1-1"), None);
        assert_eq!(parse_date(" 2024-01-01 "), Some(date!(2024 - 01 - 01)));
    }

    #[test]
    fn prefix_match_needs_the_space() {
        let header = parse_header("Title:NoSpace\nTitle: Spaced");
        assert_eq!(header.title, "Spaced");
        assert_eq!(parse_header("Title:Only").title, "");
    }

    #[test]
    fn slug_strips_extension_only() {
        assert_eq!(derive_slug("post-a.md"), "post-a");
        assert_eq!(derive_slug("My_Post.MD"), "My_Post");
        assert_eq!(derive_slug("archive.tar.gz"), "archive.tar");
        assert_eq!(derive_slug("README"), "README");
        assert_eq!(derive_slug(".draft"), ".draft");
        assert_eq!(derive_slug("content/nested.md"), "nested");
    }

    #[test]
    fn summary_counts_characters() {
        let body = "é".repeat(SUMMARY_LIMIT + 1);
        let summary = summarize(&body);
        assert_eq!(summary.chars().count(), SUMMARY_LIMIT + TRUNCATION_MARKER.len());
        assert!(summary.ends_with(TRUNCATION_MARKER));

        let exact = "x".repeat(SUMMARY_LIMIT);
        assert_eq!(summarize(&exact), exact.as_str());
    }

    #[test]
    fn parse_builds_a_document() {
        let doc = parse("hello.md", b"---\nTitle: Hello\nDate: 2024-01-01\n---\n# Hi\n").unwrap();
        assert_eq!(doc.title, "Hello");
        assert_eq!(doc.slug, "hello");
        assert_eq!(doc.published_at, Some(date!(2024 - 01 - 01)));
        assert_eq!(doc.body_html, "<h1>Hi</h1>\n");
        assert_eq!(doc.summary, "# Hi\n");
    }

    #[test]
    fn parse_reports_malformed_source() {
        let err = parse("broken.md", b"just text").unwrap_err();
        assert!(matches!(err, Error::MalformedStructure { ref name } if name == "broken.md"));
    }
}
