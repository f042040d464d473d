use crate::error::Result;
use crate::models::{CanonicalField, DailyMean, HourlySeries, WindRose};
use crate::utils::constants::{EXPORT_DATETIME_FORMAT, FORMAT_B_DATETIME_COLUMN};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes pipeline outputs as CSV. Missing values are written as empty cells.
pub struct CsvWriter {
    precision: Option<usize>,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            precision: None,
        }
    }

    /// Round values to a fixed number of decimals instead of full precision.
    pub fn with_precision(mut self, decimals: usize) -> Self {
        self.precision = Some(decimals);
        self
    }

    /// `Date Time` plus one column per field, in the given order.
    pub fn write_hourly<W: Write>(
        &self,
        series: &HourlySeries,
        fields: &[CanonicalField],
        writer: W,
    ) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec![FORMAT_B_DATETIME_COLUMN.to_string()];
        header.extend(fields.iter().map(|f| f.to_string()));
        csv_writer.write_record(&header)?;

        for row in series {
            let mut record = vec![row.timestamp.format(EXPORT_DATETIME_FORMAT).to_string()];
            record.extend(fields.iter().map(|f| self.cell(row.value(*f))));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// `date,{GAS}_daily_avg`, one row per date.
    pub fn write_daily_means<W: Write>(
        &self,
        daily: &[DailyMean],
        gas: CanonicalField,
        writer: W,
    ) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["date".to_string(), format!("{}_daily_avg", gas)])?;

        for day in daily {
            csv_writer.write_record([day.date.format("%Y-%m-%d").to_string(), self.cell(day.mean)])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// `sector,value_bin,label,count`, one row per non-empty bin.
    pub fn write_wind_rose<W: Write>(&self, rose: &WindRose, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["sector", "value_bin", "label", "count"])?;

        for bin in &rose.bins {
            csv_writer.write_record([
                bin.sector.to_string(),
                bin.value_bin.to_string(),
                bin.label.clone(),
                bin.count.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_hourly_file(
        &self,
        series: &HourlySeries,
        fields: &[CanonicalField],
        path: &Path,
    ) -> Result<()> {
        self.write_hourly(series, fields, Self::create(path)?)?;
        info!(file = %path.display(), rows = series.len(), "Wrote hourly CSV");
        Ok(())
    }

    pub fn write_daily_means_file(
        &self,
        daily: &[DailyMean],
        gas: CanonicalField,
        path: &Path,
    ) -> Result<()> {
        self.write_daily_means(daily, gas, Self::create(path)?)?;
        info!(file = %path.display(), rows = daily.len(), "Wrote daily averages CSV");
        Ok(())
    }

    pub fn write_wind_rose_file(&self, rose: &WindRose, path: &Path) -> Result<()> {
        self.write_wind_rose(rose, Self::create(path)?)?;
        info!(file = %path.display(), bins = rose.bins.len(), "Wrote wind rose CSV");
        Ok(())
    }

    fn create(path: &Path) -> Result<BufWriter<File>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(BufWriter::new(File::create(path)?))
    }

    fn cell(&self, value: Option<f64>) -> String {
        match (value, self.precision) {
            (Some(v), Some(decimals)) => format!("{:.*}", decimals, v),
            (Some(v), None) => v.to_string(),
            (None, _) => String::new(),
        }
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
