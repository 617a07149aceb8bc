//! Per-area filtered and elevation-sorted views over the record set.
//!
//! Every view sorts by lower elevation bound, ascending, whether one area or
//! all areas are shown. Ties keep the backend's order.

use ftm_core::error::DataError;
use ftm_core::record::CoverageRecord;
use log::warn;

/// A filtered, sorted copy of part of the record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub records: Vec<CoverageRecord>,
    /// Matching records left out because their elevation band has no number.
    pub excluded: Vec<(i64, DataError)>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(lower elevation, coverage %)` pairs for charting.
    pub fn elevation_coverage_points(&self) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| {
                r.elevation_lower
                    .map(|lower| (f64::from(lower), r.coverage_percentage))
            })
            .collect()
    }

    /// One line per excluded record, for a warning banner.
    pub fn warnings(&self) -> Vec<String> {
        self.excluded
            .iter()
            .map(|(id, err)| format!("record {}: {}", id, err))
            .collect()
    }
}

/// Read-only view over a record slice owned by the repository.
#[derive(Debug, Clone, Copy)]
pub struct ResultsView<'a> {
    records: &'a [CoverageRecord],
}

impl<'a> ResultsView<'a> {
    pub fn new(records: &'a [CoverageRecord]) -> Self {
        ResultsView { records }
    }

    /// Records of `area` (all areas when `None`), sorted by ascending lower
    /// elevation. Records with a malformed band are moved to
    /// [`Selection::excluded`].
    pub fn select(&self, area: Option<&str>) -> Selection {
        let mut selection = Selection::default();
        let mut keyed: Vec<(i32, &CoverageRecord)> = Vec::new();
        for record in self
            .records
            .iter()
            .filter(|r| area.map_or(true, |a| r.area_name == a))
        {
            match record.elevation_lower() {
                Ok(lower) => keyed.push((lower, record)),
                Err(err) => {
                    warn!("Excluding record {} from view: {}", record.id, err);
                    selection.excluded.push((record.id, err));
                }
            }
        }
        keyed.sort_by_key(|(lower, _)| *lower);
        selection.records = keyed.into_iter().map(|(_, r)| r.clone()).collect();
        selection
    }
}
