pub mod api;
pub mod field;
pub mod observation;
pub mod rose;
pub mod series;
pub mod site;

pub use api::{ApiObservation, ApiParameter, ObservationRequest};
pub use field::CanonicalField;
pub use observation::{FieldValues, NormalizedObservation, RawRecord, RawTable};
pub use rose::{AggregationMode, DirectionalBin, ValueBin, WindRose};
pub use series::{DailyMean, DailySummary, HourlySeries};
pub use site::{SiteFormat, SiteMetadata, YearMonth};
