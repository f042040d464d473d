use crate::error::{ProcessingError, Result};
use crate::models::{CanonicalField, DailyMean, DailySummary, HourlySeries};
use crate::processors::resampler::{Granularity, Resampler};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of the selected month a view covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    SingleDay,
    FullMonth,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::SingleDay => write!(f, "single day"),
            ViewMode::FullMonth => write!(f, "full month"),
        }
    }
}

/// A month-scoped series with its per-day means of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub series: HourlySeries,
    pub daily_means: Vec<DailyMean>,
}

pub struct RangeFilter;

impl RangeFilter {
    /// Rows whose calendar date equals `date`.
    pub fn single_day(series: &HourlySeries, date: NaiveDate) -> Result<HourlySeries> {
        let rows: Vec<_> = series
            .iter()
            .filter(|r| r.timestamp.date() == date)
            .copied()
            .collect();

        if rows.is_empty() {
            return Err(ProcessingError::NoDataInRange { date });
        }
        Ok(HourlySeries::from_sorted(rows))
    }

    /// Every row of an already month-scoped series, plus one mean per date present.
    pub fn full_month(series: &HourlySeries, field: CanonicalField) -> MonthView {
        MonthView {
            series: series.clone(),
            daily_means: Self::daily_means(series, field),
        }
    }

    pub fn daily_means(series: &HourlySeries, field: CanonicalField) -> Vec<DailyMean> {
        Resampler::aggregate(series.rows(), Granularity::Day)
            .into_iter()
            .map(|day| DailyMean {
                date: day.timestamp.date(),
                mean: day.value(field),
            })
            .collect()
    }

    /// Mean/min/max of the field's non-missing values; `None` when there are none.
    pub fn summarize(series: &HourlySeries, field: CanonicalField) -> Option<DailySummary> {
        let values: Vec<f64> = series.iter().filter_map(|r| r.value(field)).collect();
        if values.is_empty() {
            return None;
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(DailySummary {
            field,
            mean: sum / values.len() as f64,
            min,
            max,
            valid_count: values.len(),
        })
    }
}
