use crate::config::BinnerConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{
    AggregationMode, CanonicalField, DirectionalBin, NormalizedObservation, ValueBin, WindRose,
};
use crate::processors::resampler::{Granularity, Resampler};
use std::collections::BTreeMap;
use tracing::debug;

/// Buckets (pollutant value, wind direction) pairs into sectors and value bins.
/// Value bins are derived from the current input on every call.
#[derive(Debug, Clone)]
pub struct DirectionalBinner {
    value_bins: usize,
    sector_width: f64,
    degenerate_width: f64,
}

impl DirectionalBinner {
    pub fn new(config: &BinnerConfig) -> Self {
        Self {
            value_bins: config.value_bins.max(1),
            sector_width: config.sector_width_deg,
            degenerate_width: config.degenerate_bin_width,
        }
    }

    pub fn bin(
        &self,
        rows: &[NormalizedObservation],
        pollutant: CanonicalField,
        mode: AggregationMode,
    ) -> Result<WindRose> {
        let aggregated;
        let rows = match mode {
            AggregationMode::Raw => rows,
            AggregationMode::DailyMean => {
                aggregated = Resampler::aggregate(rows, Granularity::Day);
                &aggregated[..]
            }
            AggregationMode::MonthlyMean => {
                aggregated = Resampler::aggregate(rows, Granularity::Month);
                &aggregated[..]
            }
        };

        let required = [
            CanonicalField::WindSpeed,
            CanonicalField::WindDirection,
            pollutant,
        ];
        let pairs: Vec<(f64, f64)> = rows
            .iter()
            .filter(|r| r.has_all(&required))
            .filter_map(|r| Some((r.value(pollutant)?, r.value(CanonicalField::WindDirection)?)))
            .collect();

        if pairs.is_empty() {
            return Err(ProcessingError::InsufficientData {
                field: pollutant.to_string(),
            });
        }

        let (min, max) = pairs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (v, _)| {
                (lo.min(*v), hi.max(*v))
            });
        let value_bins = self.value_bins_for(min, max);

        let mut counts: BTreeMap<(u32, usize), usize> = BTreeMap::new();
        for (value, direction) in &pairs {
            let key = (self.sector(*direction), assign_bin(*value, &value_bins));
            *counts.entry(key).or_default() += 1;
        }

        let bins: Vec<DirectionalBin> = counts
            .into_iter()
            .map(|((sector, value_bin), count)| DirectionalBin {
                sector,
                value_bin,
                label: value_bins[value_bin].label.clone(),
                count,
            })
            .collect();

        debug!(
            pollutant = %pollutant,
            mode = %mode,
            rows = pairs.len(),
            bins = bins.len(),
            "Computed directional bins"
        );

        Ok(WindRose {
            pollutant,
            mode,
            value_bins,
            bins,
            observations: pairs.len(),
        })
    }

    /// Equal-width bins over `[min, max]`, or one bin centered on the value when the range is empty.
    pub fn value_bins_for(&self, min: f64, max: f64) -> Vec<ValueBin> {
        if min == max {
            let half = self.degenerate_width / 2.0;
            return vec![value_bin(0, min - half, min + half)];
        }

        let n = self.value_bins;
        let width = (max - min) / n as f64;
        (0..n)
            .map(|i| {
                let low = min + width * i as f64;
                let high = if i + 1 == n { max } else { min + width * (i + 1) as f64 };
                value_bin(i, low, high)
            })
            .collect()
    }

    /// Lower edge of the direction's sector; directions are wrapped into `[0, 360)`.
    pub fn sector(&self, direction: f64) -> u32 {
        let wrapped = direction.rem_euclid(360.0);
        ((wrapped / self.sector_width).floor() * self.sector_width) as u32
    }
}

impl Default for DirectionalBinner {
    fn default() -> Self {
        Self::new(&BinnerConfig::default())
    }
}

fn value_bin(index: usize, low: f64, high: f64) -> ValueBin {
    ValueBin {
        index,
        low,
        high,
        label: format!("{:.1}\u{2013}{:.1}", low, high),
    }
}

/// Right-closed bins with the first one also closed on the left.
fn assign_bin(value: f64, bins: &[ValueBin]) -> usize {
    bins.iter()
        .position(|b| value <= b.high)
        .unwrap_or(bins.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValues;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn row(day: u32, hour: u32, co2: Option<f64>, ws: Option<f64>, wd: Option<f64>) -> NormalizedObservation {
        NormalizedObservation::new(
            NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            FieldValues::empty()
                .with(CanonicalField::Co2, co2)
                .with(CanonicalField::WindSpeed, ws)
                .with(CanonicalField::WindDirection, wd),
        )
    }

    #[test]
    fn test_degenerate_range_single_bin() {
        let rows: Vec<_> = (0..3).map(|h| row(1, h, Some(5.0), Some(2.0), Some(10.0))).collect();
        let rose = DirectionalBinner::default()
            .bin(&rows, CanonicalField::Co2, AggregationMode::Raw)
            .unwrap();

        assert_eq!(rose.value_bins.len(), 1);
        assert!((rose.value_bins[0].low - 4.9).abs() < 1e-9);
        assert!((rose.value_bins[0].high - 5.1).abs() < 1e-9);
        assert_eq!(
            rose.bins,
            vec![DirectionalBin {
                sector: 0,
                value_bin: 0,
                label: "4.9\u{2013}5.1".to_string(),
                count: 3,
            }]
        );
    }

    #[test]
    fn test_counts_cover_surviving_rows() {
        let rows = vec![
            row(1, 0, Some(400.0), Some(1.0), Some(0.0)),
            row(1, 1, Some(410.0), Some(1.0), Some(45.0)),
            row(1, 2, Some(420.0), Some(1.0), Some(359.9)),
            row(1, 3, Some(430.0), None, Some(90.0)),
            row(1, 4, None, Some(1.0), Some(90.0)),
            row(1, 5, Some(450.0), Some(1.0), Some(181.0)),
        ];
        let rose = DirectionalBinner::default()
            .bin(&rows, CanonicalField::Co2, AggregationMode::Raw)
            .unwrap();

        assert_eq!(rose.observations, 4);
        assert_eq!(rose.total_count(), 4);
        assert_eq!(rose.value_bins.len(), 5);
        assert!(rose.bins.iter().all(|b| b.sector <= 330 && b.sector % 30 == 0));
        assert_eq!(
            rose.sector_totals(),
            vec![(0, 1), (30, 1), (180, 1), (330, 1)]
        );
    }

    #[test]
    fn test_edges_fall_into_expected_bins() {
        let binner = DirectionalBinner::default();
        let bins = binner.value_bins_for(0.0, 10.0);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].label, "0.0\u{2013}2.0");
        assert_eq!(bins[4].high, 10.0);
        assert_eq!(assign_bin(0.0, &bins), 0);
        assert_eq!(assign_bin(2.0, &bins), 0);
        assert_eq!(assign_bin(2.1, &bins), 1);
        assert_eq!(assign_bin(10.0, &bins), 4);
    }

    #[test]
    fn test_sector_floor_and_wrap() {
        let binner = DirectionalBinner::default();
        assert_eq!(binner.sector(0.0), 0);
        assert_eq!(binner.sector(29.9), 0);
        assert_eq!(binner.sector(30.0), 30);
        assert_eq!(binner.sector(359.0), 330);
        assert_eq!(binner.sector(360.0), 0);
        assert_eq!(binner.sector(-10.0), 330);
    }

    #[test]
    fn test_insufficient_data() {
        let rows = vec![row(1, 0, Some(400.0), None, Some(10.0))];
        let err = DirectionalBinner::default()
            .bin(&rows, CanonicalField::Co2, AggregationMode::Raw)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::InsufficientData { field } if field == "CO2"));
    }

    #[test]
    fn test_daily_mean_mode_aggregates_first() {
        let rows = vec![
            row(1, 0, Some(400.0), Some(1.0), Some(10.0)),
            row(1, 1, Some(420.0), Some(3.0), Some(20.0)),
            row(2, 0, Some(430.0), Some(2.0), Some(200.0)),
        ];
        let rose = DirectionalBinner::default()
            .bin(&rows, CanonicalField::Co2, AggregationMode::DailyMean)
            .unwrap();

        assert_eq!(rose.observations, 2);
        assert_eq!(rose.sector_totals(), vec![(0, 1), (180, 1)]);
    }

    #[test]
    fn test_monthly_mean_mode_collapses_month() {
        let rows = vec![
            row(1, 0, Some(400.0), Some(1.0), Some(10.0)),
            row(1, 1, Some(420.0), Some(3.0), Some(20.0)),
            row(2, 0, Some(430.0), Some(2.0), Some(200.0)),
            row(3, 0, Some(500.0), None, Some(90.0)),
        ];
        let rose = DirectionalBinner::default()
            .bin(&rows, CanonicalField::Co2, AggregationMode::MonthlyMean)
            .unwrap();

        // One March mean: CO2 437.5, direction 80
        assert_eq!(rose.mode, AggregationMode::MonthlyMean);
        assert_eq!(rose.observations, 1);
        assert_eq!(rose.value_bins.len(), 1);
        assert_eq!(rose.sector_totals(), vec![(60, 1)]);
    }

    #[test]
    fn test_configured_bin_count() {
        let binner = DirectionalBinner::new(&BinnerConfig {
            value_bins: 3,
            sector_width_deg: 45.0,
            degenerate_bin_width: 1.0,
        });
        assert_eq!(binner.value_bins_for(0.0, 3.0).len(), 3);
        assert_eq!(binner.sector(100.0), 90);
        assert_eq!(binner.value_bins_for(2.0, 2.0)[0].label, "1.5\u{2013}2.5");
    }
}
