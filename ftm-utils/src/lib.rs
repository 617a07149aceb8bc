//! Shared utility functions for FTM crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    /// Wire format for request dates: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Timestamp formats the results backend has been seen to emit, tried in order
    /// after RFC 3339 and RFC 2822.
    const NAIVE_TIMESTAMP_FORMATS: [&str; 3] =
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// Parse a result timestamp.
    ///
    /// Accepts RFC 3339, RFC 2822 (`"Tue, 16 Apr 2024 10:00:00 GMT"`, the
    /// format Flask's `jsonify` produces) and a few naive layouts. Offsets are
    /// normalized to UTC before the zone is dropped.
    pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.naive_utc());
        }
        NAIVE_TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_date_rejects_compact() {
            assert!(parse_date("20230615").is_err());
            assert!(parse_date("").is_err());
        }

        #[test]
        fn test_parse_timestamp_formats() {
            let expected = NaiveDate::from_ymd_opt(2024, 4, 16)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap();
            assert_eq!(parse_timestamp("Tue, 16 Apr 2024 10:00:00 GMT"), Some(expected));
            assert_eq!(parse_timestamp("2024-04-16T10:00:00Z"), Some(expected));
            assert_eq!(parse_timestamp("2024-04-16T12:00:00+02:00"), Some(expected));
            assert_eq!(parse_timestamp("2024-04-16 10:00:00"), Some(expected));
            assert_eq!(parse_timestamp("2024-04-16T10:00:00.000"), Some(expected));
        }

        #[test]
        fn test_parse_timestamp_garbage() {
            assert_eq!(parse_timestamp("yesterday"), None);
            assert_eq!(parse_timestamp("  "), None);
        }
    }
}
