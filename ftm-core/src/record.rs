use crate::error::{ApiError, DataError};
use chrono::NaiveDateTime;
use ftm_utils::dates::parse_timestamp;
use log::warn;
use serde::{Deserialize, Serialize};

/// One row of `GET /api/results` as the backend sends it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultRow {
    pub id_res: i64,
    pub area_name: String,
    pub elevation: String,
    pub detected_points: i64,
    pub total_points: i64,
    pub coverage_percentage: f64,
    #[serde(default, rename = "ddatetime", alias = "datetime")]
    pub ddatetime: Option<String>,
}

/// A result row that could not be decoded, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Position in the response array.
    pub index: usize,
    /// `id_res`, when the row carried a readable one.
    pub id: Option<i64>,
    pub reason: String,
}

impl std::fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "row {} (id {}): {}", self.index, id, self.reason),
            None => write!(f, "row {}: {}", self.index, self.reason),
        }
    }
}

/// Decoded `GET /api/results` body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsPage {
    pub rows: Vec<ResultRow>,
    /// Rows skipped because a field was missing, null or mistyped.
    pub rejected: Vec<RejectedRow>,
}

impl From<Vec<ResultRow>> for ResultsPage {
    fn from(rows: Vec<ResultRow>) -> Self {
        ResultsPage {
            rows,
            rejected: Vec::new(),
        }
    }
}

impl ResultRow {
    /// Parse a `GET /api/results` response body.
    ///
    /// The body must be a JSON array; each element is decoded on its own so
    /// one malformed row does not lose the rest.
    pub fn parse_results(body: &str) -> Result<ResultsPage, ApiError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(body)?;
        let mut page = ResultsPage::default();
        for (index, value) in values.into_iter().enumerate() {
            let id = value.get("id_res").and_then(serde_json::Value::as_i64);
            match serde_json::from_value::<ResultRow>(value) {
                Ok(row) => page.rows.push(row),
                Err(err) => {
                    let rejected = RejectedRow {
                        index,
                        id,
                        reason: err.to_string(),
                    };
                    warn!("Skipping result {}", rejected);
                    page.rejected.push(rejected);
                }
            }
        }
        Ok(page)
    }
}

/// Snow coverage of one elevation band of one analysed area.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRecord {
    pub id: i64,
    pub area_name: String,
    /// Band label, e.g. "2400-2600".
    pub elevation_band: String,
    /// Leading number of `elevation_band`; `None` when the label has none.
    pub elevation_lower: Option<i32>,
    pub detected_points: i64,
    pub total_points: i64,
    pub coverage_percentage: f64,
    pub generated_at: Option<NaiveDateTime>,
}

impl CoverageRecord {
    /// Lower bound of the elevation band.
    pub fn elevation_lower(&self) -> Result<i32, DataError> {
        self.elevation_lower
            .ok_or_else(|| DataError::MalformedElevationBand(self.elevation_band.clone()))
    }
}

impl From<ResultRow> for CoverageRecord {
    fn from(row: ResultRow) -> Self {
        let generated_at = row.ddatetime.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                warn!("record {}: unparseable timestamp {:?}", row.id_res, raw);
            }
            parsed
        });
        CoverageRecord {
            id: row.id_res,
            elevation_lower: parse_elevation_lower(&row.elevation).ok(),
            area_name: row.area_name,
            elevation_band: row.elevation,
            detected_points: row.detected_points,
            total_points: row.total_points,
            coverage_percentage: row.coverage_percentage,
            generated_at,
        }
    }
}

/// First run of ASCII digits in an elevation band label.
pub fn parse_elevation_lower(band: &str) -> Result<i32, DataError> {
    let malformed = || DataError::MalformedElevationBand(band.to_string());
    let digits: String = band
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return Err(malformed());
    }
    digits.parse::<i32>().map_err(|_| malformed())
}

/// A stored submission from `GET /api/userpolygons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPolygon {
    pub id: Option<i64>,
    pub area_name: String,
    pub datetime: Option<String>,
    /// Start date argument.
    pub arg_s: Option<String>,
    /// End date argument.
    pub arg_e: Option<String>,
    /// Raster band argument.
    pub arg_b: Option<String>,
    /// Sampling distance argument, in degrees.
    pub arg_d: Option<String>,
}

impl UserPolygon {
    pub fn parse_list(body: &str) -> Result<Vec<UserPolygon>, ApiError> {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const RESULTS_BODY: &str = r#"[
        {"id_res": 1, "area_name": "Yosemite", "elevation": "2400-2600", "detected_points": 40,
         "total_points": 80, "coverage_percentage": 50.0, "datetime": "Tue, 16 Apr 2024 10:00:00 GMT"},
        {"id_res": 2, "area_name": "Yosemite", "elevation": "unknown", "detected_points": 0,
         "total_points": 10, "coverage_percentage": 0.0, "ddatetime": null}
    ]"#;

    #[test]
    fn test_parse_results() {
        let page = ResultRow::parse_results(RESULTS_BODY).unwrap();
        assert!(page.rejected.is_empty());
        let rows = page.rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ddatetime.as_deref(), Some("Tue, 16 Apr 2024 10:00:00 GMT"));

        let records: Vec<CoverageRecord> = rows.into_iter().map(CoverageRecord::from).collect();
        assert_eq!(records[0].elevation_lower, Some(2400));
        assert_eq!(
            records[0].generated_at,
            NaiveDate::from_ymd_opt(2024, 4, 16).unwrap().and_hms_opt(10, 0, 0)
        );
        assert_eq!(records[1].elevation_lower, None);
        assert_eq!(records[1].generated_at, None);
        assert_eq!(
            records[1].elevation_lower(),
            Err(DataError::MalformedElevationBand("unknown".to_string()))
        );
    }

    #[test]
    fn test_parse_results_malformed_body() {
        assert!(matches!(
            ResultRow::parse_results("<html>502</html>"),
            Err(ApiError::Parse(_))
        ));
        assert!(matches!(
            ResultRow::parse_results(r#"{"id_res": 1}"#),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_results_isolates_bad_rows() {
        let body = r#"[
            {"id_res": 1, "area_name": "Yosemite", "elevation": "2400-2600", "detected_points": 40,
             "total_points": 80, "coverage_percentage": 50.0, "ddatetime": null},
            {"id_res": 2, "area_name": null, "elevation": "2600-2800", "detected_points": null,
             "total_points": null, "coverage_percentage": 12.5, "ddatetime": "2024-04-16 10:00:00"},
            {"area_name": "Tahoe"}
        ]"#;
        let page = ResultRow::parse_results(body).unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id_res, 1);
        assert_eq!(page.rejected.len(), 2);
        assert_eq!(page.rejected[0].index, 1);
        assert_eq!(page.rejected[0].id, Some(2));
        assert_eq!(page.rejected[1].id, None);
        assert!(page.rejected[0].to_string().starts_with("row 1 (id 2): "));
    }

    #[test]
    fn test_parse_elevation_lower() {
        assert_eq!(parse_elevation_lower("2400-2600"), Ok(2400));
        assert_eq!(parse_elevation_lower("  800 - 1000m"), Ok(800));
        assert_eq!(parse_elevation_lower("band 3000+"), Ok(3000));
        assert!(parse_elevation_lower("high").is_err());
        assert!(parse_elevation_lower("").is_err());
    }

    #[test]
    fn test_parse_user_polygons() {
        let body = r#"[{"id": 1, "area_name": "Yosemite", "datetime": null, "geom": "POLYGON(...)",
            "arg_s": "2024-01-01", "arg_e": "2024-03-31", "arg_b": "VV", "arg_d": "0.005",
            "arg_p": null, "dem_path": null}]"#;
        let polygons = UserPolygon::parse_list(body).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].area_name, "Yosemite");
        assert_eq!(polygons[0].arg_b.as_deref(), Some("VV"));
    }
}
