//! Capture of the single rectangle drawn on the map.
//!
//! The map widget reports draw events; [`GeometryCapture`] keeps only the most
//! recent shape and derives the bounding box and sample-count estimate from it.

use crate::bbox::BoundingBox;
use crate::error::{DataError, ValidationError};
use log::debug;
use serde::{Deserialize, Serialize};

/// WGS84 equatorial radius used by the map widget's geodesic area.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// A drawn polygon ring (open: the last vertex is not repeated).
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnShape {
    ring: Vec<LatLng>,
}

impl DrawnShape {
    /// Rectangle spanning two opposite corners, in either order.
    ///
    /// The ring is laid out south-west, north-west, north-east, south-east.
    pub fn rectangle(a: LatLng, b: LatLng) -> Result<Self, DataError> {
        let (south, north) = (a.lat.min(b.lat), a.lat.max(b.lat));
        let (west, east) = (a.lng.min(b.lng), a.lng.max(b.lng));
        DrawnShape::from_ring(vec![
            LatLng::new(south, west),
            LatLng::new(north, west),
            LatLng::new(north, east),
            LatLng::new(south, east),
        ])
    }

    /// Shape from an edited vertex ring.
    pub fn from_ring(ring: Vec<LatLng>) -> Result<Self, DataError> {
        if ring.len() < 3 {
            return Err(DataError::DegenerateShape(format!(
                "{} vertices, need at least 3",
                ring.len()
            )));
        }
        if ring.iter().any(|p| !p.lat.is_finite() || !p.lng.is_finite()) {
            return Err(DataError::DegenerateShape("non-finite vertex".to_string()));
        }
        let shape = DrawnShape { ring };
        if shape.bounds()?.is_degenerate() {
            return Err(DataError::DegenerateShape("zero-area extent".to_string()));
        }
        Ok(shape)
    }

    pub fn ring(&self) -> &[LatLng] {
        &self.ring
    }

    /// Box through the ring's south-west and north-east extremes.
    pub fn bounds(&self) -> Result<BoundingBox, DataError> {
        let mut south = f64::INFINITY;
        let mut north = f64::NEG_INFINITY;
        let mut west = f64::INFINITY;
        let mut east = f64::NEG_INFINITY;
        for p in &self.ring {
            south = south.min(p.lat);
            north = north.max(p.lat);
            west = west.min(p.lng);
            east = east.max(p.lng);
        }
        BoundingBox::new(north, south, east, west)
    }

    /// Geodesic area of the ring in square metres.
    ///
    /// Spherical-excess approximation summed edge by edge; the absolute value
    /// makes the result independent of winding direction.
    pub fn geodesic_area(&self) -> f64 {
        let n = self.ring.len();
        let mut area = 0.0;
        for i in 0..n {
            let p1 = self.ring[i];
            let p2 = self.ring[(i + 1) % n];
            area += (p2.lng - p1.lng).to_radians()
                * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
        }
        (area * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
    }
}

/// What to do with the drawn shape when the visible layer set changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerTogglePolicy {
    /// Drop the shape so no edit handle outlives the layers it was drawn over.
    #[default]
    ClearShapes,
    /// Keep the shape regardless of basemap/overlay toggles.
    KeepShapes,
}

/// Owner of the single currently drawn shape.
#[derive(Debug, Clone, Default)]
pub struct GeometryCapture {
    shape: Option<DrawnShape>,
    policy: LayerTogglePolicy,
}

impl GeometryCapture {
    pub fn new(policy: LayerTogglePolicy) -> Self {
        GeometryCapture {
            shape: None,
            policy,
        }
    }

    pub fn policy(&self) -> LayerTogglePolicy {
        self.policy
    }

    /// A new shape replaces whatever was drawn before.
    pub fn on_shape_created(&mut self, shape: DrawnShape) {
        debug!("shape created with {} vertices", shape.ring.len());
        self.shape = Some(shape);
    }

    /// The last edited shape replaces the current one. An empty edit set
    /// leaves the current shape untouched.
    pub fn on_shape_edited(&mut self, shapes: Vec<DrawnShape>) {
        if let Some(shape) = shapes.into_iter().last() {
            debug!("shape edited");
            self.shape = Some(shape);
        }
    }

    pub fn on_shape_deleted(&mut self) {
        debug!("shape deleted");
        self.shape = None;
    }

    /// Basemap or overlay toggled.
    pub fn on_layers_changed(&mut self) {
        if self.policy == LayerTogglePolicy::ClearShapes && self.shape.is_some() {
            debug!("layer set changed, clearing drawn shape");
            self.shape = None;
        }
    }

    pub fn current_shape(&self) -> Option<&DrawnShape> {
        self.shape.as_ref()
    }

    pub fn current_bounding_box(&self) -> Option<BoundingBox> {
        self.shape.as_ref().and_then(|s| s.bounds().ok())
    }

    /// Number of sampling points a grid of `distance_meters` spacing would
    /// place inside the drawn shape; 0 when nothing is drawn.
    pub fn estimate_sample_count(&self, distance_meters: f64) -> Result<u64, ValidationError> {
        if !distance_meters.is_finite() || distance_meters <= 0.0 {
            return Err(ValidationError::InvalidDistance(distance_meters.to_string()));
        }
        let Some(shape) = &self.shape else {
            return Ok(0);
        };
        let count = (shape.geodesic_area() / (distance_meters * distance_meters)).round();
        if !count.is_finite() || count >= u64::MAX as f64 {
            return Err(ValidationError::InvalidDistance(distance_meters.to_string()));
        }
        Ok(count as u64)
    }
}
