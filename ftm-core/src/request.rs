//! Validation and assembly of the area-of-interest analysis request.

use crate::bbox::BoundingBox;
use crate::error::{DateField, ValidationError};
use chrono::NaiveDate;
use ftm_utils::dates::format_date;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Sampling distance pre-filled in the form, in metres.
pub const DEFAULT_SAMPLING_DISTANCE_M: &str = "500";

/// Sentinel-1 SAR polarisation to analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RasterBand {
    #[default]
    #[serde(rename = "VV")]
    Vv,
    #[serde(rename = "VH")]
    Vh,
}

impl fmt::Display for RasterBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterBand::Vv => write!(f, "VV"),
            RasterBand::Vh => write!(f, "VH"),
        }
    }
}

impl FromStr for RasterBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VV" => Ok(RasterBand::Vv),
            "VH" => Ok(RasterBand::Vh),
            other => Err(format!("unknown raster band {:?}, expected VV or VH", other)),
        }
    }
}

/// Raw values of the creation form, as the user typed them.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Free text; validated as a positive number of metres.
    pub sampling_distance: String,
    pub band: RasterBand,
}

impl Default for FormState {
    fn default() -> Self {
        FormState {
            name: String::new(),
            start_date: None,
            end_date: None,
            sampling_distance: DEFAULT_SAMPLING_DISTANCE_M.to_string(),
            band: RasterBand::default(),
        }
    }
}

/// A validated, immutable analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfInterestRequest {
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    sampling_distance_meters: f64,
    band: RasterBand,
    bbox: BoundingBox,
}

/// JSON body of `POST /api/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload {
    pub start_date: String,
    pub end_date: String,
    pub area_name: String,
    pub distance: f64,
    pub raster_band: RasterBand,
    pub coordinates: String,
}

impl AreaOfInterestRequest {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn sampling_distance_meters(&self) -> f64 {
        self.sampling_distance_meters
    }

    pub fn band(&self) -> RasterBand {
        self.band
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Wire form: dates as `YYYY-MM-DD`, box as `"xmin ymin xmax ymax"`.
    pub fn to_payload(&self) -> CreatePayload {
        CreatePayload {
            start_date: format_date(&self.start_date),
            end_date: format_date(&self.end_date),
            area_name: self.name.clone(),
            distance: self.sampling_distance_meters,
            raster_band: self.band,
            coordinates: self.bbox.to_coordinate_string(),
        }
    }
}

/// Builds [`AreaOfInterestRequest`]s from form input.
#[derive(Debug, Clone, Default)]
pub struct AreaRequestBuilder {
    submit_delay: Option<Duration>,
}

impl AreaRequestBuilder {
    pub fn new() -> Self {
        AreaRequestBuilder::default()
    }

    /// Hold the "sending" status for `delay` before the request goes out,
    /// so fast responses do not flicker.
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    pub fn submit_delay(&self) -> Option<Duration> {
        self.submit_delay
    }

    /// Validate `form` and `bbox`, reporting the first failing rule.
    ///
    /// Rules run in order: name, geometry, distance, date range, then both
    /// dates being present.
    pub fn build(
        &self,
        form: &FormState,
        bbox: Option<BoundingBox>,
    ) -> Result<AreaOfInterestRequest, ValidationError> {
        if !is_valid_area_name(&form.name) {
            return Err(ValidationError::InvalidName(form.name.clone()));
        }
        let bbox = bbox.ok_or(ValidationError::MissingGeometry)?;
        let sampling_distance_meters = parse_distance(&form.sampling_distance)?;
        if let (Some(start), Some(end)) = (form.start_date, form.end_date) {
            if start > end {
                return Err(ValidationError::InvalidDateRange {
                    start: format_date(&start),
                    end: format_date(&end),
                });
            }
        }
        let start_date = form
            .start_date
            .ok_or(ValidationError::MissingDate(DateField::Start))?;
        let end_date = form
            .end_date
            .ok_or(ValidationError::MissingDate(DateField::End))?;

        Ok(AreaOfInterestRequest {
            name: form.name.clone(),
            start_date,
            end_date,
            sampling_distance_meters,
            band: form.band,
            bbox,
        })
    }

    /// Send `request` to the backend, honouring the configured submit delay.
    #[cfg(feature = "api")]
    pub async fn submit(
        &self,
        client: &crate::client::ApiClient,
        request: &AreaOfInterestRequest,
    ) -> Result<crate::client::CreateResponse, crate::error::ApiError> {
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        client.create(request).await
    }
}

/// Area names are used verbatim as backend file and table keys.
pub fn is_valid_area_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn parse_distance(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(d) if d.is_finite() && d > 0.0 => Ok(d),
        _ => Err(ValidationError::InvalidDistance(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_form() -> FormState {
        FormState {
            name: "Yosemite2024".to_string(),
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 3, 31)),
            sampling_distance: "500".to_string(),
            band: RasterBand::Vh,
        }
    }

    fn bbox() -> Option<BoundingBox> {
        Some(BoundingBox::new(37.9, 37.7, -119.4, -119.6).unwrap())
    }

    #[test]
    fn test_build_valid_request() {
        let request = AreaRequestBuilder::new().build(&valid_form(), bbox()).unwrap();
        let payload = request.to_payload();
        assert_eq!(payload.area_name, "Yosemite2024");
        assert_eq!(payload.start_date, "2024-01-01");
        assert_eq!(payload.end_date, "2024-03-31");
        assert_eq!(payload.coordinates, "-119.6 37.7 -119.4 37.9");
        assert_eq!(payload.distance, 500.0);
    }

    #[test]
    fn test_payload_json_shape() {
        let request = AreaRequestBuilder::new().build(&valid_form(), bbox()).unwrap();
        let json = serde_json::to_value(request.to_payload()).unwrap();
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["areaName"], "Yosemite2024");
        assert_eq!(json["rasterBand"], "VH");
        assert_eq!(json["coordinates"], "-119.6 37.7 -119.4 37.9");
        assert_eq!(json["distance"], 500.0);
    }

    #[test]
    fn test_coordinates_round_trip() {
        let original = BoundingBox::new(37.123_456_789, -0.1, 179.999, -45.000_000_1).unwrap();
        let request = AreaRequestBuilder::new()
            .build(&valid_form(), Some(original))
            .unwrap();
        let parsed = BoundingBox::from_coordinate_string(&request.to_payload().coordinates).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "Half Dome", " Dome", "north-face", "café"] {
            let form = FormState {
                name: name.to_string(),
                ..valid_form()
            };
            assert_eq!(
                AreaRequestBuilder::new().build(&form, bbox()),
                Err(ValidationError::InvalidName(name.to_string()))
            );
        }
    }

    #[test]
    fn test_rule_order() {
        // Bad name wins over missing geometry.
        let form = FormState {
            name: "bad name".to_string(),
            sampling_distance: "-1".to_string(),
            ..valid_form()
        };
        assert!(matches!(
            AreaRequestBuilder::new().build(&form, None),
            Err(ValidationError::InvalidName(_))
        ));

        // Missing geometry wins over bad distance.
        let form = FormState {
            sampling_distance: "-1".to_string(),
            ..valid_form()
        };
        assert_eq!(
            AreaRequestBuilder::new().build(&form, None),
            Err(ValidationError::MissingGeometry)
        );
    }

    #[test]
    fn test_invalid_distance() {
        for raw in ["", "0", "-5", "abc", "NaN", "inf"] {
            let form = FormState {
                sampling_distance: raw.to_string(),
                ..valid_form()
            };
            assert_eq!(
                AreaRequestBuilder::new().build(&form, bbox()),
                Err(ValidationError::InvalidDistance(raw.to_string()))
            );
        }
    }

    #[test]
    fn test_date_rules() {
        let reversed = FormState {
            start_date: Some(date(2024, 4, 1)),
            end_date: Some(date(2024, 3, 1)),
            ..valid_form()
        };
        assert!(matches!(
            AreaRequestBuilder::new().build(&reversed, bbox()),
            Err(ValidationError::InvalidDateRange { .. })
        ));

        let same_day = FormState {
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 1)),
            ..valid_form()
        };
        assert!(AreaRequestBuilder::new().build(&same_day, bbox()).is_ok());

        let missing_end = FormState {
            end_date: None,
            ..valid_form()
        };
        assert_eq!(
            AreaRequestBuilder::new().build(&missing_end, bbox()),
            Err(ValidationError::MissingDate(DateField::End))
        );
    }

    #[test]
    fn test_submit_delay_is_optional() {
        assert_eq!(AreaRequestBuilder::new().submit_delay(), None);
        let builder = AreaRequestBuilder::new().with_submit_delay(Duration::from_secs(2));
        assert_eq!(builder.submit_delay(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_raster_band_parse() {
        assert_eq!("vh".parse::<RasterBand>(), Ok(RasterBand::Vh));
        assert_eq!("VV".parse::<RasterBand>(), Ok(RasterBand::Vv));
        assert!("HH".parse::<RasterBand>().is_err());
    }
}
