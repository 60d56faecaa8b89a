//! Embedded date marker inside pin content
//!
//! The backend stores a pin's date as a leading marker line in the free-text
//! content: `"📅 <date>\n\n<body>"`. A pin without a date stores the body
//! as-is. Older pins were written with a single newline after the marker, so
//! [`split_content`] accepts both. [`compose_content`] always writes the
//! blank line. A marker line only counts as a date when the date parses, so
//! a body that opens with some other `📅` line survives as plain text. The
//! one ambiguous input, a dateless body that itself opens with a dated marker
//! line, is refused before saving (see [`leads_with_date_marker`]).

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Marker glyph that opens the date line.
pub const DATE_MARKER: &str = "📅";

/// Accepted date format for the marker line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pin content split into its date and body parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatedContent {
    /// Date string from the marker line, empty when absent
    pub date: String,
    /// Free text after the marker
    pub body: String,
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^📅 ([^\n]+)\n\n?").expect("Invalid regex"))
}

/// Merge a date and body into the stored content format.
#[must_use]
pub fn compose_content(date: &str, body: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        body.to_string()
    } else {
        format!("{DATE_MARKER} {date}\n\n{body}")
    }
}

/// Split stored content into date and body.
///
/// Content without a leading marker line carrying a valid date is returned
/// whole as the body.
#[must_use]
pub fn split_content(content: &str) -> DatedContent {
    dated_marker(content).map_or_else(
        || DatedContent {
            date: String::new(),
            body: content.to_string(),
        },
        |(date, end)| DatedContent {
            date: date.to_string(),
            body: content[end..].to_string(),
        },
    )
}

/// True when `body` opens with a marker line that [`split_content`] would
/// read as a date.
#[must_use]
pub fn leads_with_date_marker(body: &str) -> bool {
    dated_marker(body).is_some()
}

/// The trimmed marker date and the offset where the body starts.
fn dated_marker(content: &str) -> Option<(&str, usize)> {
    let captures = marker_regex().captures(content)?;
    let date = captures.get(1)?.as_str().trim();
    parse_date(date)?;
    Some((date, captures.get(0)?.end()))
}

/// Parse a marker date, returning `None` for anything but `YYYY-MM-DD`.
#[must_use]
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn compose_places_marker_line_before_body() {
        assert_eq!(
            compose_content("2025-01-01", "Great view"),
            "📅 2025-01-01\n\nGreat view"
        );
    }

    #[test]
    fn compose_without_date_keeps_body() {
        assert_eq!(compose_content("  ", "Just text"), "Just text");
    }

    #[test]
    fn split_extracts_date_and_multiline_body() {
        let parsed = split_content("📅 2024-12-24\n\nline one\n\nline two");
        assert_eq!(parsed.date, "2024-12-24");
        assert_eq!(parsed.body, "line one\n\nline two");
    }

    #[test]
    fn split_without_marker_returns_whole_body() {
        let parsed = split_content("no date here\n\nstill body");
        assert_eq!(parsed.date, "");
        assert_eq!(parsed.body, "no date here\n\nstill body");
    }

    #[test]
    fn split_accepts_single_newline_after_marker() {
        let parsed = split_content("📅  2024-12-24 \nbody");
        assert_eq!(parsed.date, "2024-12-24");
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn split_needs_marker_on_first_line() {
        let parsed = split_content("intro\n📅 2024-12-24\n\nbody");
        assert_eq!(parsed.date, "");
        assert_eq!(parsed.body, "intro\n📅 2024-12-24\n\nbody");
    }

    #[test]
    fn split_inverts_compose() {
        for (date, body) in [
            ("2025-01-01", "Great view"),
            ("2023-07-14", ""),
            ("", "plain"),
            ("1999-12-31", "multi\n\nparagraph\n"),
            ("", "📅 note to self\n\nhello"),
            ("2025-01-01", "📅 2024-12-24\n\nnested"),
        ] {
            let parsed = split_content(&compose_content(date, body));
            assert_eq!(parsed.date, date);
            assert_eq!(parsed.body, body);
        }
    }

    #[test]
    fn marker_with_unparsable_date_stays_in_body() {
        let parsed = split_content("📅 someday\n\nhello");
        assert_eq!(parsed.date, "");
        assert_eq!(parsed.body, "📅 someday\n\nhello");
        assert!(!leads_with_date_marker("📅 someday\n\nhello"));
        assert!(leads_with_date_marker("📅 2024-12-24\nhello"));
    }

    #[test]
    fn parse_date_accepts_iso_days_only() {
        assert!(parse_date("2025-01-01").is_some());
        assert!(parse_date("2025-13-01").is_none());
        assert!(parse_date("01/01/2025").is_none());
    }
}
