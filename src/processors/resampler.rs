use crate::models::{CanonicalField, FieldValues, HourlySeries, NormalizedObservation};
use crate::utils::timestamp::{day_start, hour_start, month_start};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::debug;

/// Period observations are averaged over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Hour,
    Day,
    Month,
}

impl Granularity {
    /// Start of the period containing the timestamp.
    pub fn bucket(self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            Granularity::Hour => hour_start(ts),
            Granularity::Day => day_start(ts.date()),
            Granularity::Month => month_start(ts),
        }
    }
}

/// Running per-field sums for one bucket.
#[derive(Default, Clone, Copy)]
struct FieldAccumulator {
    sums: [f64; CanonicalField::COUNT],
    counts: [usize; CanonicalField::COUNT],
}

impl FieldAccumulator {
    fn add(&mut self, values: &FieldValues) {
        for (field, value) in values.iter() {
            if let Some(v) = value {
                self.sums[field.index()] += v;
                self.counts[field.index()] += 1;
            }
        }
    }

    fn means(&self) -> FieldValues {
        CanonicalField::ALL
            .into_iter()
            .fold(FieldValues::empty(), |values, field| {
                let i = field.index();
                let mean = (self.counts[i] > 0).then(|| self.sums[i] / self.counts[i] as f64);
                values.with(field, mean)
            })
    }
}

pub struct Resampler;

impl Resampler {
    /// Mean of every field per period; missing values are ignored and periods with
    /// no observations are not emitted. Output is sorted by period start.
    pub fn aggregate(
        observations: &[NormalizedObservation],
        granularity: Granularity,
    ) -> Vec<NormalizedObservation> {
        let mut buckets: BTreeMap<NaiveDateTime, FieldAccumulator> = BTreeMap::new();

        for obs in observations {
            buckets
                .entry(granularity.bucket(obs.timestamp))
                .or_default()
                .add(&obs.values);
        }

        buckets
            .into_iter()
            .map(|(start, acc)| NormalizedObservation::new(start, acc.means()))
            .collect()
    }

    /// Average arbitrary-frequency observations into an hourly series.
    pub fn to_hourly(observations: &[NormalizedObservation]) -> HourlySeries {
        let rows = Self::aggregate(observations, Granularity::Hour);
        debug!(
            input = observations.len(),
            hours = rows.len(),
            "Resampled to hourly means"
        );
        HourlySeries::from_sorted(rows)
    }
}
