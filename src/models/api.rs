use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Parameter metadata attached to every observation returned by the
/// air-quality API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParameter {
    #[serde(rename = "ParameterCode")]
    pub parameter_code: String,

    #[serde(rename = "Units", default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiObservation {
    #[serde(rename = "Site_Id")]
    pub site_id: u32,

    #[serde(rename = "Parameter")]
    pub parameter: ApiParameter,

    /// Calendar date, `YYYY-MM-DD`; a trailing time part is ignored.
    #[serde(rename = "Date", deserialize_with = "iso_date::deserialize_lenient")]
    pub date: NaiveDate,

    /// Hour offset from the date's midnight.
    #[serde(rename = "Hour")]
    pub hour: u32,

    #[serde(rename = "Value", default)]
    pub value: Option<f64>,
}

impl ApiObservation {
    /// Hour 24 rolls over to midnight of the following day.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(chrono::NaiveTime::MIN) + Duration::hours(self.hour as i64)
    }
}

/// Request payload for the observations endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObservationRequest {
    pub parameters: Vec<String>,
    pub sites: Vec<u32>,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub frequency: Vec<String>,
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_lenient<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        let date_part = s.trim().get(..10).unwrap_or(s.trim());
        NaiveDate::parse_from_str(date_part, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_observation() {
        let json = r#"{
            "Site_Id": 39,
            "Parameter": {"ParameterCode": "NO2", "Units": "pphm", "Category": "Averages"},
            "Date": "2024-12-05",
            "Hour": 3,
            "Value": 1.2
        }"#;
        let obs: ApiObservation = serde_json::from_str(json).unwrap();

        assert_eq!(obs.site_id, 39);
        assert_eq!(obs.parameter.parameter_code, "NO2");
        assert_eq!(obs.parameter.units.as_deref(), Some("pphm"));
        assert_eq!(obs.value, Some(1.2));
        assert_eq!(obs.timestamp().to_string(), "2024-12-05 03:00:00");
    }

    #[test]
    fn test_null_value_and_hour_rollover() {
        let json = r#"{"Site_Id": 1, "Parameter": {"ParameterCode": "CO2"},
                       "Date": "2024-12-31T00:00:00", "Hour": 24, "Value": null}"#;
        let obs: ApiObservation = serde_json::from_str(json).unwrap();

        assert_eq!(obs.value, None);
        assert_eq!(obs.parameter.units, None);
        assert_eq!(obs.timestamp().to_string(), "2025-01-01 00:00:00");
    }

    #[test]
    fn test_request_payload_shape() {
        let request = ObservationRequest {
            parameters: vec!["NO2".into()],
            sites: vec![141, 39],
            start_date: NaiveDate::from_ymd_opt(2024, 12, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 15).unwrap(),
            categories: vec!["Averages".into()],
            sub_categories: vec!["Hourly".into()],
            frequency: vec!["Hourly average".into()],
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["StartDate"], "2024-12-05");
        assert_eq!(value["Sites"][1], 39);
        assert_eq!(value["SubCategories"][0], "Hourly");
        assert_eq!(value["Frequency"][0], "Hourly average");
    }
}
