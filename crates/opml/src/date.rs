//! RFC 822 timestamp handling
//!
//! OPML 2.0 carries its `dateCreated`/`dateModified`/`created` timestamps in
//! the RFC 822 form RSS uses (`Thu, 02 Jan 2020 03:04:05 +0000`). Documents
//! in the wild also show up with ISO 8601 timestamps, so parsing runs through
//! an ordered list of format attempts and takes the first hit.

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Render a timestamp in the RFC 822 form, always in UTC
pub fn format(date: OffsetDateTime) -> String {
    date.to_offset(UtcOffset::UTC)
        .format(&Rfc2822)
        .unwrap_or_else(|_| "Thu, 01 Jan 1970 00:00:00 +0000".to_string())
}

/// Parse a timestamp, RFC 822 first with ISO 8601 fallbacks
///
/// Returns `None` when no format matches; callers treat that as the field
/// being absent rather than a hard error.
pub fn parse(text: &str) -> Option<OffsetDateTime> {
    if let Ok(date) = OffsetDateTime::parse(text, &Rfc2822) {
        return Some(date);
    }
    if let Ok(date) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date);
    }

    // Offsetless ISO 8601 local datetime, taken as UTC
    let local_datetime = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(date) = PrimitiveDateTime::parse(text, &local_datetime) {
        return Some(date.assume_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_format_rfc822() {
        let date = datetime!(2020-01-02 03:04:05 UTC);
        assert_eq!(format(date), "Thu, 02 Jan 2020 03:04:05 +0000");
    }

    #[test]
    fn test_format_normalizes_to_utc() {
        let date = datetime!(2020-01-02 05:04:05 +02:00);
        assert_eq!(format(date), "Thu, 02 Jan 2020 03:04:05 +0000");
    }

    #[test]
    fn test_parse_rfc822() {
        let parsed = parse("Thu, 02 Jan 2020 03:04:05 +0000");
        assert_eq!(parsed, Some(datetime!(2020-01-02 03:04:05 UTC)));
    }

    #[test]
    fn test_parse_iso8601_fallback() {
        let parsed = parse("2020-01-02T03:04:05Z");
        assert_eq!(parsed, Some(datetime!(2020-01-02 03:04:05 UTC)));
    }

    #[test]
    fn test_parse_offsetless_iso8601() {
        let parsed = parse("2020-01-02T03:04:05");
        assert_eq!(parsed, Some(datetime!(2020-01-02 03:04:05 UTC)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse("not a date"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_roundtrip() {
        let date = datetime!(1999-12-31 23:59:59 UTC);
        assert_eq!(parse(&format(date)), Some(date));
    }
}
