use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::CanonicalField;

/// One row of a source file, cells still in the file's own column order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub cells: Vec<String>,
}

impl RawRecord {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// Header row plus data rows of a source file, before any interpretation.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, records: Vec<RawRecord>) -> Self {
        Self { headers, records }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Value-or-missing for every canonical field, indexed by [`CanonicalField::index`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldValues([Option<f64>; CanonicalField::COUNT]);

impl FieldValues {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> Option<f64> {
        self.0[field.index()]
    }

    pub fn with(mut self, field: CanonicalField, value: Option<f64>) -> Self {
        self.0[field.index()] = value;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, Option<f64>)> + '_ {
        CanonicalField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedObservation {
    pub timestamp: NaiveDateTime,
    pub values: FieldValues,
}

impl NormalizedObservation {
    pub fn new(timestamp: NaiveDateTime, values: FieldValues) -> Self {
        Self { timestamp, values }
    }

    pub fn value(&self, field: CanonicalField) -> Option<f64> {
        self.values.get(field)
    }

    /// True when every listed field carries a value.
    pub fn has_all(&self, fields: &[CanonicalField]) -> bool {
        fields.iter().all(|f| self.values.get(*f).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_field_values() {
        let values = FieldValues::empty()
            .with(CanonicalField::Ch4, Some(1.9))
            .with(CanonicalField::WindSpeed, Some(3.5));

        assert_eq!(values.get(CanonicalField::Ch4), Some(1.9));
        assert_eq!(values.get(CanonicalField::Co2), None);
        assert_eq!(values.iter().filter(|(_, v)| v.is_some()).count(), 2);
    }

    #[test]
    fn test_has_all() {
        let ts = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let obs = NormalizedObservation::new(
            ts,
            FieldValues::empty()
                .with(CanonicalField::Ch4, Some(1.9))
                .with(CanonicalField::WindSpeed, Some(2.0)),
        );

        assert!(obs.has_all(&[CanonicalField::Ch4, CanonicalField::WindSpeed]));
        assert!(!obs.has_all(&[CanonicalField::Ch4, CanonicalField::WindDirection]));
    }

    #[test]
    fn test_raw_table_column_index() {
        let table = RawTable::new(
            vec!["DATE".to_string(), " TIME ".to_string()],
            vec![RawRecord::new(vec!["01/03/2025".into(), "00:00".into()])],
        );
        assert_eq!(table.column_index("TIME"), Some(1));
        assert_eq!(table.column_index("Date Time"), None);
        assert_eq!(table.records[0].get(0), Some("01/03/2025"));
    }
}
