//! Error types shared by the FTM crates.

use thiserror::Error;

/// Bad user input, caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Area names must be non-empty and ASCII alphanumeric.
    #[error("Area name must be non-empty and contain only letters and digits: {0:?}")]
    InvalidName(String),

    /// No rectangle has been drawn.
    #[error("Draw a rectangle on the map before submitting")]
    MissingGeometry,

    /// Sampling distance is not a positive number.
    #[error("Sampling distance must be a positive number of metres: {0:?}")]
    InvalidDistance(String),

    /// Start date falls after end date.
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    /// One of the dates was never selected.
    #[error("{0} date is required")]
    MissingDate(DateField),
}

/// Which of the two request dates a [`ValidationError::MissingDate`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateField::Start => write!(f, "Start"),
            DateField::End => write!(f, "End"),
        }
    }
}

impl ValidationError {
    /// Name of the form field the error should be displayed next to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidName(_) => "area_name",
            ValidationError::MissingGeometry => "map",
            ValidationError::InvalidDistance(_) => "distance",
            ValidationError::InvalidDateRange { .. } => "end_date",
            ValidationError::MissingDate(DateField::Start) => "start_date",
            ValidationError::MissingDate(DateField::End) => "end_date",
        }
    }
}

/// Failures talking to the analysis backend.
///
/// Covers both `POST /api/create` submissions and result refetches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Server responded with status {status}")]
    Server { status: u16 },

    /// The response body could not be decoded.
    #[error("Malformed response body: {0}")]
    Parse(String),
}

impl ApiError {
    /// Status line suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "No response from server".to_string(),
            ApiError::Server { status } => format!("Server error: {}", status),
            ApiError::Parse(_) => "Unexpected response from server".to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Malformed domain data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// Elevation band label has no leading number.
    #[error("Elevation band {0:?} contains no number")]
    MalformedElevationBand(String),

    /// Corners violate `north >= south` / `east >= west`, or are not finite.
    #[error("Invalid bounding box: north {north}, south {south}, east {east}, west {west}")]
    InvalidBoundingBox {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },

    /// Drawn shape has too few vertices or encloses no area.
    #[error("Drawn shape is degenerate: {0}")]
    DegenerateShape(String),

    /// Coordinate string is not four space-separated numbers.
    #[error("Invalid coordinate string {0:?}, expected \"xmin ymin xmax ymax\"")]
    InvalidCoordinates(String),
}
