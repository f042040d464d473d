use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::{CanonicalField, NormalizedObservation};

/// Observations aggregated to one row per hour-start, strictly increasing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    rows: Vec<NormalizedObservation>,
}

impl HourlySeries {
    /// Caller guarantees rows are hour-aligned and strictly increasing.
    pub(crate) fn from_sorted(rows: Vec<NormalizedObservation>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { rows }
    }

    /// Build a series from rows that must already satisfy the hourly invariant.
    pub fn try_from_rows(rows: Vec<NormalizedObservation>) -> Result<Self> {
        if let Some(row) = rows.iter().find(|r| !is_hour_start(r.timestamp)) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Timestamp {} is not an hour-start",
                row.timestamp
            )));
        }
        if let Some(pair) = rows.windows(2).find(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Timestamps not strictly increasing: {} then {}",
                pair[0].timestamp, pair[1].timestamp
            )));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[NormalizedObservation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedObservation> {
        self.rows.iter()
    }

    /// (timestamp, value) pairs of one field, the shape a chart layer plots.
    pub fn points(&self, field: CanonicalField) -> Vec<(NaiveDateTime, Option<f64>)> {
        self.rows
            .iter()
            .map(|r| (r.timestamp, r.value(field)))
            .collect()
    }

    /// Fields carrying at least one value anywhere in the series.
    pub fn present_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| self.rows.iter().any(|r| r.value(*f).is_some()))
            .collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.timestamp.date(), last.timestamp.date())),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a HourlySeries {
    type Item = &'a NormalizedObservation;
    type IntoIter = std::slice::Iter<'a, NormalizedObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

fn is_hour_start(ts: NaiveDateTime) -> bool {
    ts.minute() == 0 && ts.second() == 0 && ts.nanosecond() == 0
}

/// Mean/min/max of one field over every row in scope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub field: CanonicalField,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub valid_count: usize,
}

impl DailySummary {
    pub fn summary(&self, unit: &str) -> String {
        format!(
            "{} mean={:.2} min={:.2} max={:.2} {} ({} values)",
            self.field, self.mean, self.min, self.max, unit, self.valid_count
        )
    }
}

/// Mean of the selected field for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyMean {
    pub date: NaiveDate,
    pub mean: Option<f64>,
}
