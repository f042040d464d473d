pub mod directional_binner;
pub mod normalizer;
pub mod pipeline;
pub mod range_filter;
pub mod resampler;
pub mod schema_detector;

pub use directional_binner::DirectionalBinner;
pub use normalizer::{strip_unit_suffix, ColumnNormalizer, NormalizedFrame};
pub use pipeline::{GasPipeline, GasView, RoseRequest, ViewRequest};
pub use range_filter::{MonthView, RangeFilter, ViewMode};
pub use resampler::{Granularity, Resampler};
pub use schema_detector::SchemaDetector;
