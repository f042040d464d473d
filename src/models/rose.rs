use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::CanonicalField;

/// Period the series is averaged to before binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AggregationMode {
    #[default]
    Raw,
    DailyMean,
    MonthlyMean,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::Raw => write!(f, "raw"),
            AggregationMode::DailyMean => write!(f, "daily mean"),
            AggregationMode::MonthlyMean => write!(f, "monthly mean"),
        }
    }
}

/// One pollutant value bucket, `(low, high]` except the first which includes `low`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBin {
    pub index: usize,
    pub low: f64,
    pub high: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalBin {
    /// Lower edge of the wind-direction sector in degrees.
    pub sector: u32,
    pub value_bin: usize,
    pub label: String,
    pub count: usize,
}

/// Directional bins for one pollutant, with the value buckets they refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindRose {
    pub pollutant: CanonicalField,
    pub mode: AggregationMode,
    pub value_bins: Vec<ValueBin>,
    pub bins: Vec<DirectionalBin>,
    pub observations: usize,
}

impl WindRose {
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Counts per sector across every value bucket.
    pub fn sector_totals(&self) -> Vec<(u32, usize)> {
        let mut totals: Vec<(u32, usize)> = Vec::new();
        for bin in &self.bins {
            match totals.last_mut() {
                Some((sector, count)) if *sector == bin.sector => *count += bin.count,
                _ => totals.push((bin.sector, bin.count)),
            }
        }
        totals
    }
}
