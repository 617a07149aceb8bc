//! Least-squares trend of coverage against elevation.

use crate::view::Selection;
use log::info;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendError {
    /// Fewer than two points.
    #[error("At least two points are needed to fit a trend line, got {0}")]
    InsufficientData(usize),

    /// Every point shares the same x, so the slope is undefined.
    #[error("All points share the same elevation; the trend is undefined")]
    DegenerateInput,

    #[error("Point {index} is not finite: ({x}, {y})")]
    NonFiniteInput { index: usize, x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Fitted y for each x.
    pub fn project(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.at(x)).collect()
    }
}

/// Ordinary least squares over `(x, y)` points.
pub fn fit(points: &[(f64, f64)]) -> Result<TrendLine, TrendError> {
    let n = points.len();
    if n < 2 {
        return Err(TrendError::InsufficientData(n));
    }
    if let Some((index, &(x, y))) = points
        .iter()
        .enumerate()
        .find(|(_, (x, y))| !x.is_finite() || !y.is_finite())
    {
        return Err(TrendError::NonFiniteInput { index, x, y });
    }
    let first_x = points[0].0;
    if points.iter().all(|&(x, _)| x == first_x) {
        return Err(TrendError::DegenerateInput);
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let n = n as f64;
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(TrendError::DegenerateInput);
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(TrendError::DegenerateInput);
    }
    Ok(TrendLine { slope, intercept })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Elevation vs. coverage chart: the raw series plus the dashed trend overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationChart {
    pub observed: Vec<ChartPoint>,
    /// Empty when no trend could be fitted.
    pub trend: Vec<ChartPoint>,
    pub line: Option<TrendLine>,
}

impl ElevationChart {
    /// Chart for a sorted selection. A failed fit drops only the overlay.
    pub fn from_selection(selection: &Selection) -> Self {
        let observed: Vec<ChartPoint> = selection
            .elevation_coverage_points()
            .into_iter()
            .map(|(x, y)| ChartPoint { x, y })
            .collect();
        let pairs: Vec<(f64, f64)> = observed.iter().map(|p| (p.x, p.y)).collect();
        let line = match fit(&pairs) {
            Ok(line) => Some(line),
            Err(err) => {
                info!("No trend line: {}", err);
                None
            }
        };
        let trend = line
            .map(|line| {
                let xs: Vec<f64> = observed.iter().map(|p| p.x).collect();
                let ys = line.project(&xs);
                xs.into_iter().zip(ys).map(|(x, y)| ChartPoint { x, y }).collect()
            })
            .unwrap_or_default();
        ElevationChart {
            observed,
            trend,
            line,
        }
    }
}
