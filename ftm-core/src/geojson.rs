//! Per-area elevation polygons from `GET /api/geojson/{areaName}`.

use crate::error::ApiError;
use crate::geometry::LatLng;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Map center used before any area has been analysed (Yosemite Valley).
pub const DEFAULT_MAP_CENTER: LatLng = LatLng {
    lat: 37.8451,
    lng: -119.5383,
};

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    pub elevation: Option<ElevationLabel>,
    pub coverage_percentage: Option<f64>,
}

/// Elevation property; the backend writes either a band label or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ElevationLabel {
    Number(f64),
    Text(String),
}

impl fmt::Display for ElevationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevationLabel::Number(n) => write!(f, "{}", n),
            ElevationLabel::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FeatureCollection {
    pub fn parse(body: &str) -> Result<FeatureCollection, ApiError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Every `[lng, lat]` position in the collection, as `LatLng`.
    pub fn positions(&self) -> Vec<LatLng> {
        let mut out = Vec::new();
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            collect_positions(&geometry.coordinates, &mut out);
        }
        out
    }

    /// Center of the extent of all positions, or [`DEFAULT_MAP_CENTER`]
    /// when the collection has none.
    pub fn map_center(&self) -> LatLng {
        let positions = self.positions();
        if positions.is_empty() {
            return DEFAULT_MAP_CENTER;
        }
        let (mut south, mut north) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut west, mut east) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in &positions {
            south = south.min(p.lat);
            north = north.max(p.lat);
            west = west.min(p.lng);
            east = east.max(p.lng);
        }
        LatLng::new((south + north) / 2.0, (west + east) / 2.0)
    }

    /// `(elevation, coverage %)` of each feature that carries both.
    pub fn coverage_by_elevation(&self) -> Vec<(String, f64)> {
        self.features
            .iter()
            .filter_map(|f| {
                let properties = f.properties.as_ref()?;
                let elevation = properties.elevation.as_ref()?;
                let coverage = properties.coverage_percentage?;
                Some((elevation.to_string(), coverage))
            })
            .collect()
    }
}

fn collect_positions(value: &Value, out: &mut Vec<LatLng>) {
    let Some(items) = value.as_array() else {
        return;
    };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => {
            out.push(LatLng::new(lat, lng));
        }
        _ => {
            for item in items {
                collect_positions(item, out);
            }
        }
    }
}
