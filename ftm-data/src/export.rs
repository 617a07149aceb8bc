//! CSV export of a record sequence, in the order given.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use thiserror::Error;

/// File name offered for download.
pub const EXPORT_FILE_NAME: &str = "results.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    /// No records, so no header can be derived.
    #[error("Nothing to export")]
    EmptyInput,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output was not valid UTF-8")]
    Encoding,
}

/// Serialize `records` as CSV.
///
/// The header is the field names of the record type in declaration order.
/// Every field is double-quoted, embedded quotes are doubled, and rows are
/// joined with `\n` (no trailing newline). `T` must serialize as a struct.
pub fn to_csv<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::EmptyInput);
    }
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    let mut text = String::from_utf8(bytes).map_err(|_| ExportError::Encoding)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ftm_core::record::CoverageRecord;

    #[derive(Serialize)]
    struct Row {
        a: i32,
        b: String,
    }

    #[test]
    fn test_quotes_every_field() {
        let csv = to_csv(&[Row {
            a: 1,
            b: "x,y".to_string(),
        }])
        .unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines, vec![r#""a","b""#, r#""1","x,y""#]);
    }

    #[test]
    fn test_escapes_embedded_quotes() {
        let csv = to_csv(&[Row {
            a: 2,
            b: r#"say "hi""#.to_string(),
        }])
        .unwrap();
        assert_eq!(csv, "\"a\",\"b\"\n\"2\",\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_rejects_empty_input() {
        let rows: Vec<Row> = Vec::new();
        assert!(matches!(to_csv(&rows), Err(ExportError::EmptyInput)));
    }

    #[test]
    fn test_preserves_input_order() {
        let rows = vec![
            Row { a: 3, b: "c".into() },
            Row { a: 1, b: "a".into() },
            Row { a: 2, b: "b".into() },
        ];
        let csv = to_csv(&rows).unwrap();
        assert_eq!(csv.lines().nth(1), Some(r#""3","c""#));
        assert_eq!(csv.lines().nth(3), Some(r#""2","b""#));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_coverage_record_columns() {
        let record = CoverageRecord {
            id: 7,
            area_name: "Yosemite".to_string(),
            elevation_band: "2400-2600".to_string(),
            elevation_lower: Some(2400),
            detected_points: 30,
            total_points: 40,
            coverage_percentage: 75.0,
            generated_at: NaiveDate::from_ymd_opt(2024, 4, 16)
                .unwrap()
                .and_hms_opt(10, 0, 0),
        };
        let csv = to_csv(&[record]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(r#""id","area_name","elevation_band","elevation_lower","detected_points","total_points","coverage_percentage","generated_at""#)
        );
        assert_eq!(
            lines.next(),
            Some(r#""7","Yosemite","2400-2600","2400","30","40","75.0","2024-04-16T10:00:00""#)
        );
    }
}
