use crate::error::{ProcessingError, Result};
use crate::models::SiteFormat;
use crate::utils::constants::{
    FORMAT_A_DATE_COLUMN, FORMAT_A_TIME_COLUMN, FORMAT_B_DATETIME_COLUMN,
};

pub struct SchemaDetector;

impl SchemaDetector {
    /// Identify the site format from a header row. A `Date Time` column takes
    /// precedence over a `DATE`/`TIME` pair.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Result<SiteFormat> {
        let has = |name: &str| headers.iter().any(|h| h.as_ref().trim() == name);

        if has(FORMAT_B_DATETIME_COLUMN) {
            Ok(SiteFormat::FormatB)
        } else if has(FORMAT_A_DATE_COLUMN) && has(FORMAT_A_TIME_COLUMN) {
            Ok(SiteFormat::FormatA)
        } else {
            Err(ProcessingError::UnrecognizedSchema {
                headers: headers
                    .iter()
                    .map(|h| h.as_ref().trim())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format_a() {
        let headers = ["DATE", "TIME", "CH4 (ppm)", "CO2 (ppm)"];
        assert_eq!(SchemaDetector::detect(&headers).unwrap(), SiteFormat::FormatA);
    }

    #[test]
    fn test_detect_format_b() {
        let headers = vec![" Date Time ".to_string(), "CH4_Pic_0".to_string()];
        assert_eq!(SchemaDetector::detect(&headers).unwrap(), SiteFormat::FormatB);
    }

    #[test]
    fn test_date_time_wins_over_pair() {
        let headers = ["DATE", "TIME", "Date Time"];
        assert_eq!(SchemaDetector::detect(&headers).unwrap(), SiteFormat::FormatB);
    }

    #[test]
    fn test_unrecognized() {
        for headers in [vec!["DATE", "CH4"], vec!["Timestamp", "CO2"], vec![]] {
            let err = SchemaDetector::detect(&headers).unwrap_err();
            assert!(matches!(err, ProcessingError::UnrecognizedSchema { .. }));
        }
    }
}
