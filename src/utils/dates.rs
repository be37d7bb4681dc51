//! Date normalization and display formatting
//!
//! Record dates arrive in three shapes: `YYYY-MM-DD` from date pickers,
//! `DD/MM/YYYY` round-tripped from listings, and full ISO timestamps.
//! Everything normalizes to a single `DateTime<Utc>` instant or `None`;
//! bad dates degrade to `None` instead of failing the request.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Rendering for dates that are not set (or never parsed).
pub const DISPLAY_PLACEHOLDER: &str = "-";

/// Parse a date in any of the accepted shapes.
///
/// Fixed-width patterns are tried before the generic timestamp parse, each
/// attempt producing `Some` or falling through to the next. Bare calendar
/// dates pin to midnight UTC so every representation of the same day yields
/// the same instant.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(start_of_day(date));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(start_of_day(date));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalize an optional wire value to an instant. Absent, empty and
/// unparseable inputs all collapse to `None`.
pub fn normalize_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_date)
}

/// Render a stored instant as `DD/MM/YYYY`; unset dates render as the
/// placeholder, never as an error string.
pub fn format_display(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(dt) => dt.format("%d/%m/%Y").to_string(),
        None => DISPLAY_PLACEHOLDER.to_string(),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_picker_format() {
        let parsed = parse_date("2025-03-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_display_format() {
        let parsed = parse_date("01/03/2025").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_iso_timestamp() {
        let parsed = parse_date("2025-03-01T00:00:00.000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_all_representations_agree() {
        let a = parse_date("2025-03-01");
        let b = parse_date("01/03/2025");
        let c = parse_date("2025-03-01T00:00:00Z");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(a.is_some());
    }

    #[test]
    fn test_garbage_normalizes_to_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("32/13/2025"), None);
        assert_eq!(parse_date("2025-13-40"), None);
        assert_eq!(normalize_date(None), None);
        assert_eq!(normalize_date(Some("")), None);
    }

    #[test]
    fn test_format_display() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap();
        assert_eq!(format_display(Some(&dt)), "01/03/2025");
        assert_eq!(format_display(None), DISPLAY_PLACEHOLDER);
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let shown = format_display(Some(&dt));
        assert_eq!(parse_date(&shown), Some(dt));
    }
}
