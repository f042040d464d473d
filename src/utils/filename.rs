use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::models::{CanonicalField, YearMonth};
use crate::utils::constants::{CSV_EXTENSION, HOURLY_FILE_SUFFIX};

/// Extract the month tag embedded in a file name such as `Lidcombe_20250301.csv`
/// or `Stockton_202411.csv`. The first `_`-separated token of 8 or 6 digits wins.
pub fn extract_month_tag(path: &Path) -> Option<YearMonth> {
    let stem = path.file_stem()?.to_str()?;

    stem.split(['_', '-', ' '])
        .filter(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .find_map(|token| match token.len() {
            8 => NaiveDate::parse_from_str(token, "%Y%m%d")
                .ok()
                .map(|date| YearMonth::of(&date)),
            6 => token.parse::<YearMonth>().ok(),
            _ => None,
        })
}

/// Whether a file name belongs to the given site, e.g. `Lidcombe_*.csv`.
pub fn matches_site(path: &Path, site: &str) -> bool {
    let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
        return false;
    };
    let has_csv_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(CSV_EXTENSION));

    has_csv_extension && name.starts_with(&format!("{}_", site))
}

/// Daily-average export name: `{site}_{gas}_daily_avg_{YYYYMM}.csv`
pub fn daily_average_filename(site: &str, gas: CanonicalField, month: YearMonth) -> String {
    format!("{}_{}_daily_avg_{}.csv", site, gas, month)
}

/// Hourly export name for one selection: `{site}_{gas}_{YYYYMMDD}.csv`
pub fn hourly_export_filename(site: &str, gas: CanonicalField, date: NaiveDate) -> String {
    format!("{}_{}_{}.csv", site, gas, date.format("%Y%m%d"))
}

/// Default output path of the minute-to-hour conversion: `{stem}_hour.csv` next to the input.
pub fn default_hourly_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{}{}.{}", stem, HOURLY_FILE_SUFFIX, CSV_EXTENSION))
}
