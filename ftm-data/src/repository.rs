//! In-memory holder of the coverage records fetched from the backend.

use ftm_core::error::ApiError;
use ftm_core::record::{CoverageRecord, RejectedRow, ResultsPage};
use log::{info, warn};
use std::collections::HashSet;

/// Owns the last successfully fetched record set.
///
/// The set only changes on an explicit refetch, and a failed refetch leaves
/// the previous set in place.
#[derive(Debug, Clone, Default)]
pub struct ResultsRepository {
    records: Vec<CoverageRecord>,
    rejected: Vec<RejectedRow>,
}

impl ResultsRepository {
    pub fn new() -> Self {
        ResultsRepository::default()
    }

    /// Refetch every record from the backend.
    #[cfg(feature = "api")]
    pub async fn fetch_all(
        &mut self,
        client: &ftm_core::client::ApiClient,
    ) -> Result<&[CoverageRecord], ApiError> {
        let fetched = client.fetch_results().await;
        self.apply_fetch(fetched)
    }

    /// Replace the record set with a fetch outcome. On error the current set
    /// is kept and the error handed back to the caller.
    pub fn apply_fetch(
        &mut self,
        fetched: Result<ResultsPage, ApiError>,
    ) -> Result<&[CoverageRecord], ApiError> {
        match fetched {
            Ok(page) => {
                self.records = page.rows.into_iter().map(CoverageRecord::from).collect();
                self.rejected = page.rejected;
                info!(
                    "Loaded {} coverage records ({} rejected)",
                    self.records.len(),
                    self.rejected.len()
                );
                Ok(&self.records)
            }
            Err(err) => {
                warn!(
                    "Refetch failed, keeping {} stale records: {}",
                    self.records.len(),
                    err
                );
                Err(err)
            }
        }
    }

    pub fn records(&self) -> &[CoverageRecord] {
        &self.records
    }

    /// Rows of the last successful fetch that could not be decoded.
    pub fn rejected_rows(&self) -> &[RejectedRow] {
        &self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct area names in order of first appearance by ascending id.
    pub fn area_catalog(&self) -> Vec<String> {
        let mut by_id: Vec<&CoverageRecord> = self.records.iter().collect();
        by_id.sort_by_key(|r| r.id);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut catalog = Vec::new();
        for record in by_id {
            if seen.insert(record.area_name.as_str()) {
                catalog.push(record.area_name.clone());
            }
        }
        catalog
    }

    /// Area of the record with the largest id.
    pub fn most_recent_area(&self) -> Option<&str> {
        self.records
            .iter()
            .max_by_key(|r| r.id)
            .map(|r| r.area_name.as_str())
    }
}
