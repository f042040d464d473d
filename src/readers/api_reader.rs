use crate::config::ApiConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{ApiObservation, ObservationRequest};
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// The external air-quality service, seen as a black box returning observation records.
pub trait ObservationSource {
    fn fetch(&self, request: &ObservationRequest) -> Result<Vec<ApiObservation>>;
}

impl ObservationRequest {
    /// Request for one parameter at one or more sites, using the configured selectors.
    pub fn for_parameter(
        api: &ApiConfig,
        parameter: &str,
        sites: Vec<u32>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        if start_date > end_date {
            return Err(ProcessingError::InvalidFormat(format!(
                "End date {} is before start date {}",
                end_date, start_date
            )));
        }
        Ok(Self {
            parameters: vec![parameter.to_string()],
            sites,
            start_date,
            end_date,
            categories: api.categories.clone(),
            sub_categories: api.sub_categories.clone(),
            frequency: api.frequency.clone(),
        })
    }
}

/// Reads a saved observations response (a JSON array of records) from disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ObservationSource for JsonFileSource {
    fn fetch(&self, request: &ObservationRequest) -> Result<Vec<ApiObservation>> {
        let file = File::open(&self.path).map_err(|e| remote_failure(request, e))?;
        let records: Vec<ApiObservation> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| remote_failure(request, e))?;

        let selected: Vec<ApiObservation> = records
            .into_iter()
            .filter(|r| request.sites.is_empty() || request.sites.contains(&r.site_id))
            .filter(|r| {
                request.parameters.is_empty()
                    || request
                        .parameters
                        .iter()
                        .any(|p| p.eq_ignore_ascii_case(&r.parameter.parameter_code))
            })
            .filter(|r| r.date >= request.start_date && r.date <= request.end_date)
            .collect();

        info!(
            file = %self.path.display(),
            records = selected.len(),
            "Loaded saved observations"
        );
        Ok(selected)
    }
}

/// Wrap a failure with the site and parameter context of the request.
pub fn remote_failure(request: &ObservationRequest, error: impl std::fmt::Display) -> ProcessingError {
    ProcessingError::RemoteCallFailure {
        site_id: request.sites.first().copied().unwrap_or_default(),
        parameter: request.parameters.join(","),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn request(parameter: &str, site: u32) -> ObservationRequest {
        ObservationRequest::for_parameter(
            &ApiConfig::default(),
            parameter,
            vec![site],
            NaiveDate::from_ymd_opt(2024, 12, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_request_uses_configured_selectors() {
        let req = request("NO2", 39);
        assert_eq!(req.categories, vec!["Averages"]);
        assert_eq!(req.frequency, vec!["Hourly average"]);

        let reversed = ObservationRequest::for_parameter(
            &ApiConfig::default(),
            "NO2",
            vec![39],
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(reversed.is_err());
    }

    #[test]
    fn test_json_source_filters_by_request() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[
                {{"Site_Id": 39, "Parameter": {{"ParameterCode": "CO2", "Units": "ppm"}}, "Date": "2024-12-05", "Hour": 1, "Value": 420.0}},
                {{"Site_Id": 39, "Parameter": {{"ParameterCode": "NO2", "Units": "pphm"}}, "Date": "2024-12-05", "Hour": 1, "Value": 1.0}},
                {{"Site_Id": 141, "Parameter": {{"ParameterCode": "CO2", "Units": "ppm"}}, "Date": "2024-12-05", "Hour": 1, "Value": 415.0}},
                {{"Site_Id": 39, "Parameter": {{"ParameterCode": "CO2", "Units": "ppm"}}, "Date": "2024-12-20", "Hour": 1, "Value": 430.0}}
            ]"#
        )?;

        let source = JsonFileSource::new(file.path());
        let records = source.fetch(&request("CO2", 39))?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, Some(420.0));
        Ok(())
    }

    #[test]
    fn test_malformed_response_is_remote_failure() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "<html>Service Unavailable</html>")?;

        match JsonFileSource::new(file.path()).fetch(&request("CO2", 39)) {
            Err(ProcessingError::RemoteCallFailure { site_id, parameter, .. }) => {
                assert_eq!(site_id, 39);
                assert_eq!(parameter, "CO2");
            }
            other => panic!("expected RemoteCallFailure, got {:?}", other),
        }
        Ok(())
    }
}
