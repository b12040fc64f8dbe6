//! Timestamp text shared by ingestion and range selections

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Formats accepted for timestamps with an explicit offset, besides RFC 3339
const AWARE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%#z"];

/// Formats accepted for timestamps without an offset
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// A timestamp read from text, keeping whether it carried an offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM[:SS[.f]][offset]` or a bare date
pub fn parse_timestamp(text: &str) -> Option<ParsedTimestamp> {
    let text = text.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(ParsedTimestamp::Aware(t));
    }
    if let Some(t) = AWARE_FORMATS.iter().find_map(|f| DateTime::parse_from_str(text, f).ok()) {
        return Some(ParsedTimestamp::Aware(t));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(ParsedTimestamp::Naive)
}
