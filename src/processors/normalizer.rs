use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{
    ApiObservation, CanonicalField, FieldValues, NormalizedObservation, RawRecord, RawTable,
    SiteFormat,
};
use crate::utils::constants::{
    FORMAT_A_DATE_COLUMN, FORMAT_A_TIME_COLUMN, FORMAT_B_DATETIME_COLUMN,
};
use crate::utils::timestamp::parse_day_first;
use chrono::NaiveDateTime;
use tracing::{debug, warn};

/// Normalized observations of one source plus the canonical columns it provided.
#[derive(Debug, Clone, Default)]
pub struct NormalizedFrame {
    pub observations: Vec<NormalizedObservation>,
    pub columns: Vec<CanonicalField>,
    pub dropped_rows: usize,
}

impl NormalizedFrame {
    pub fn has_column(&self, field: CanonicalField) -> bool {
        self.columns.contains(&field)
    }

    pub fn require(&self, field: CanonicalField) -> Result<()> {
        if self.has_column(field) {
            Ok(())
        } else {
            Err(ProcessingError::MissingColumn {
                column: field.to_string(),
            })
        }
    }

    pub fn require_all(&self, fields: &[CanonicalField]) -> Result<()> {
        fields.iter().try_for_each(|f| self.require(*f))
    }
}

/// Where the timestamp lives in a file, resolved once per file.
enum TimestampColumns {
    Split { date: usize, time: usize },
    Combined(usize),
}

impl TimestampColumns {
    fn resolve(table: &RawTable, format: SiteFormat) -> Result<Self> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| ProcessingError::MissingColumn {
                    column: name.to_string(),
                })
        };
        match format {
            SiteFormat::FormatA => Ok(TimestampColumns::Split {
                date: find(FORMAT_A_DATE_COLUMN)?,
                time: find(FORMAT_A_TIME_COLUMN)?,
            }),
            SiteFormat::FormatB => Ok(TimestampColumns::Combined(find(FORMAT_B_DATETIME_COLUMN)?)),
        }
    }

    fn raw_value(&self, record: &RawRecord) -> Option<String> {
        match self {
            TimestampColumns::Split { date, time } => {
                let date = record.get(*date)?;
                let time = record.get(*time)?;
                Some(format!("{} {}", date, time))
            }
            TimestampColumns::Combined(index) => record.get(*index).map(str::to_string),
        }
    }

    fn parse(&self, record: &RawRecord) -> Result<NaiveDateTime> {
        let raw = self.raw_value(record).unwrap_or_default();
        parse_day_first(&raw)
    }
}

/// Remove a parenthetical unit suffix: `"CH4 (ppm)"` becomes `"CH4"`.
pub fn strip_unit_suffix(header: &str) -> String {
    let header = header.trim();
    match (header.find('('), header.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            format!("{}{}", &header[..open], &header[close + 1..])
                .trim()
                .to_string()
        }
        _ => header.to_string(),
    }
}

/// Maps raw site columns onto the canonical field set.
pub struct ColumnNormalizer {
    rename_table: Vec<(String, CanonicalField)>,
}

impl ColumnNormalizer {
    pub fn new(rename_table: Vec<(String, CanonicalField)>) -> Self {
        Self { rename_table }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.rename_table())
    }

    /// Canonical field a header maps to under the given format, if any.
    pub fn canonical_column(&self, header: &str, format: SiteFormat) -> Option<CanonicalField> {
        let header = header.trim();
        match format {
            SiteFormat::FormatA => CanonicalField::from_name(&strip_unit_suffix(header)),
            SiteFormat::FormatB => {
                let renamed = self
                    .rename_table
                    .iter()
                    .find(|(from, _)| from == header)
                    .map(|(_, field)| field.as_str())
                    .unwrap_or(header);
                CanonicalField::from_name(&strip_unit_suffix(renamed))
            }
        }
    }

    /// Columns of the table that carry a canonical field; the first header wins on duplicates.
    fn column_map(&self, headers: &[String], format: SiteFormat) -> Vec<(usize, CanonicalField)> {
        let mut map: Vec<(usize, CanonicalField)> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(field) = self.canonical_column(header, format) {
                if map.iter().any(|(_, f)| *f == field) {
                    debug!(header = %header, field = %field, "Ignoring duplicate column");
                    continue;
                }
                map.push((index, field));
            }
        }
        map
    }

    pub fn normalize(&self, table: &RawTable, format: SiteFormat) -> Result<NormalizedFrame> {
        let timestamps = TimestampColumns::resolve(table, format)?;
        let columns = self.column_map(&table.headers, format);

        let mut observations = Vec::with_capacity(table.len());
        let mut dropped_rows = 0;

        for (row, record) in table.records.iter().enumerate() {
            let timestamp = match timestamps.parse(record) {
                Ok(ts) => ts,
                Err(e) => {
                    debug!(row = row + 1, error = %e, "Dropping row");
                    dropped_rows += 1;
                    continue;
                }
            };

            let values = columns
                .iter()
                .fold(FieldValues::empty(), |values, (index, field)| {
                    values.with(*field, record.get(*index).and_then(parse_numeric))
                });
            observations.push(NormalizedObservation::new(timestamp, values));
        }

        if dropped_rows > 0 {
            warn!(
                dropped_rows,
                kept_rows = observations.len(),
                "Dropped rows with unparseable timestamps"
            );
        }

        let mut fields: Vec<CanonicalField> = columns.into_iter().map(|(_, f)| f).collect();
        fields.sort();

        Ok(NormalizedFrame {
            observations,
            columns: fields,
            dropped_rows,
        })
    }

    /// Normalize air-quality API records for one site and parameter code.
    /// Records with a null value are skipped.
    pub fn normalize_api(
        &self,
        records: &[ApiObservation],
        site_id: u32,
        parameter_code: &str,
    ) -> Result<NormalizedFrame> {
        let field: CanonicalField = parameter_code.parse()?;

        let observations: Vec<NormalizedObservation> = records
            .iter()
            .filter(|r| r.site_id == site_id)
            .filter(|r| r.parameter.parameter_code.eq_ignore_ascii_case(parameter_code))
            .filter_map(|r| {
                let value = r.value.filter(|v| v.is_finite())?;
                Some(NormalizedObservation::new(
                    r.timestamp(),
                    FieldValues::empty().with(field, Some(value)),
                ))
            })
            .collect();

        debug!(
            site_id,
            parameter = parameter_code,
            records = observations.len(),
            "Normalized API records"
        );

        Ok(NormalizedFrame {
            observations,
            columns: vec![field],
            dropped_rows: 0,
        })
    }
}

impl Default for ColumnNormalizer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Numeric cell value; anything non-numeric or non-finite is missing.
fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
