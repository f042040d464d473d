use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ProcessingError;

/// How a site's CSV export lays out its timestamp and value columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteFormat {
    /// Separate `DATE` and `TIME` columns, unit-suffixed gas headers.
    FormatA,
    /// Single `Date Time` column, raw sensor-channel headers.
    FormatB,
}

impl fmt::Display for SiteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteFormat::FormatA => write!(f, "Format A (DATE + TIME)"),
            SiteFormat::FormatB => write!(f, "Format B (Date Time)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SiteMetadata {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl SiteMetadata {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// Calendar month tag carried by a file name (`YYYYMM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of<D: chrono::Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ProcessingError::InvalidFormat(format!("Invalid month tag: '{}'", s));

        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = s[..4].parse::<i32>().map_err(|_| invalid())?;
        let month = s[4..].parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_site_validation() {
        let site = SiteMetadata::new("Lidcombe", -33.865, 151.045);
        assert!(site.validate().is_ok());

        let invalid = SiteMetadata::new("Nowhere", -95.0, 151.0);
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_year_month_parse_and_display() {
        let tag: YearMonth = "202504".parse().unwrap();
        assert_eq!(tag, YearMonth { year: 2025, month: 4 });
        assert_eq!(tag.to_string(), "202504");

        assert!("202513".parse::<YearMonth>().is_err());
        assert!("2025-04".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_of_date() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        assert_eq!(YearMonth::of(&date).to_string(), "202411");
    }
}
