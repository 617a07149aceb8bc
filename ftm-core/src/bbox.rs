use crate::error::DataError;
use serde::Serialize;

/// Latitude/longitude extent of a drawn rectangle.
///
/// Always satisfies `north >= south` and `east >= west`. The "nothing drawn"
/// state is `Option::<BoundingBox>::None`, never a sentinel box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, DataError> {
        let finite = [north, south, east, west].iter().all(|v| v.is_finite());
        if !finite || north < south || east < west {
            return Err(DataError::InvalidBoundingBox {
                north,
                south,
                east,
                west,
            });
        }
        Ok(BoundingBox {
            north,
            south,
            east,
            west,
        })
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// True when the box spans no latitude or no longitude.
    pub fn is_degenerate(&self) -> bool {
        self.north == self.south || self.east == self.west
    }

    /// Serialize as `"xmin ymin xmax ymax"` (west south east north).
    ///
    /// `f64`'s `Display` emits the shortest representation that parses back
    /// to the same value, so [`BoundingBox::from_coordinate_string`] recovers
    /// the box exactly.
    pub fn to_coordinate_string(&self) -> String {
        format!("{} {} {} {}", self.west, self.south, self.east, self.north)
    }

    /// Parse the `"xmin ymin xmax ymax"` form produced by
    /// [`BoundingBox::to_coordinate_string`].
    pub fn from_coordinate_string(s: &str) -> Result<Self, DataError> {
        let invalid = || DataError::InvalidCoordinates(s.to_string());
        let values = s
            .split_whitespace()
            .map(|v| v.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<f64>, _>>()?;
        match values.as_slice() {
            [west, south, east, north] => BoundingBox::new(*north, *south, *east, *west),
            _ => Err(invalid()),
        }
    }
}
