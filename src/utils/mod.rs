pub mod constants;
pub mod filename;
pub mod progress;
pub mod timestamp;

pub use constants::*;
pub use filename::{extract_month_tag, matches_site};
pub use progress::ProgressReporter;
pub use timestamp::{hour_start, parse_day_first};
