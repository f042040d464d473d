use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{
    AggregationMode, CanonicalField, DailyMean, DailySummary, HourlySeries, ObservationRequest,
    RawTable, WindRose,
};
use crate::processors::directional_binner::DirectionalBinner;
use crate::processors::normalizer::ColumnNormalizer;
use crate::processors::range_filter::{RangeFilter, ViewMode};
use crate::processors::resampler::Resampler;
use crate::processors::schema_detector::SchemaDetector;
use crate::readers::{FileCatalog, ObservationSource, SiteReader};
use crate::utils::progress::ProgressReporter;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

const WIND_FIELDS: [CanonicalField; 2] = [CanonicalField::WindSpeed, CanonicalField::WindDirection];

#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    pub site: String,
    pub gas: CanonicalField,
    pub date: NaiveDate,
    pub mode: ViewMode,
}

/// Series, summary and (for a full month) per-day means of one gas at one site.
#[derive(Debug, Clone, PartialEq)]
pub struct GasView {
    pub site: String,
    pub gas: CanonicalField,
    pub date: NaiveDate,
    pub mode: ViewMode,
    pub source: PathBuf,
    pub series: HourlySeries,
    pub summary: Option<DailySummary>,
    pub daily_means: Vec<DailyMean>,
}

impl GasView {
    pub fn summary_text(&self, unit: &str) -> String {
        match &self.summary {
            Some(summary) => summary.summary(unit),
            None => format!("No valid data for {}", self.gas),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoseRequest {
    pub site: String,
    pub pollutant: CanonicalField,
    pub date: NaiveDate,
    pub scope: ViewMode,
    pub aggregation: AggregationMode,
}

/// Ties the stages together over the configured data directory.
/// Holds no mutable state, so one instance can serve concurrent callers.
pub struct GasPipeline {
    config: PipelineConfig,
    normalizer: ColumnNormalizer,
    binner: DirectionalBinner,
    reader: SiteReader,
}

impl GasPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let normalizer = ColumnNormalizer::from_config(&config);
        let binner = DirectionalBinner::new(&config.binner);
        Self {
            config,
            normalizer,
            binner,
            reader: SiteReader::new(),
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.reader = SiteReader::with_mmap(use_mmap);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &ColumnNormalizer {
        &self.normalizer
    }

    pub fn reader(&self) -> &SiteReader {
        &self.reader
    }

    pub fn catalog(&self, site: &str) -> Result<FileCatalog> {
        let site = self
            .config
            .site(site)
            .ok_or_else(|| ProcessingError::UnknownSite {
                site: site.to_string(),
            })?;
        FileCatalog::scan(&self.config.data_dir, &site.name)
    }

    pub fn available_dates(
        &self,
        site: &str,
        progress: &ProgressReporter,
    ) -> Result<BTreeSet<NaiveDate>> {
        let catalog = self.catalog(site)?;
        Ok(catalog.available_dates(&self.reader, &self.normalizer, progress))
    }

    /// Detect, normalize and resample a raw table, requiring the given fields.
    pub fn hourly_from_table(
        &self,
        table: &RawTable,
        required: &[CanonicalField],
    ) -> Result<HourlySeries> {
        let format = SchemaDetector::detect(&table.headers)?;
        let frame = self.normalizer.normalize(table, format)?;
        frame.require_all(required)?;
        Ok(Resampler::to_hourly(&frame.observations))
    }

    pub fn load_hourly(&self, path: &Path, required: &[CanonicalField]) -> Result<HourlySeries> {
        let table = self.reader.read_table(path)?;
        let series = self.hourly_from_table(&table, required)?;
        info!(
            file = %path.display(),
            rows = table.len(),
            hours = series.len(),
            "Loaded hourly series"
        );
        Ok(series)
    }

    pub fn view(&self, request: &ViewRequest) -> Result<GasView> {
        let catalog = self.catalog(&request.site)?;
        let file = catalog.select_month(request.date)?;
        let series = self.load_hourly(&file.path, &[request.gas])?;

        let (series, daily_means) = match request.mode {
            ViewMode::SingleDay => (RangeFilter::single_day(&series, request.date)?, Vec::new()),
            ViewMode::FullMonth => {
                let month = RangeFilter::full_month(&series, request.gas);
                (month.series, month.daily_means)
            }
        };
        let summary = RangeFilter::summarize(&series, request.gas);

        Ok(GasView {
            site: catalog.site().to_string(),
            gas: request.gas,
            date: request.date,
            mode: request.mode,
            source: file.path.clone(),
            series,
            summary,
            daily_means,
        })
    }

    pub fn wind_rose(&self, request: &RoseRequest) -> Result<WindRose> {
        let catalog = self.catalog(&request.site)?;
        let file = catalog.select_month(request.date)?;

        let mut required = WIND_FIELDS.to_vec();
        required.push(request.pollutant);
        let series = self.load_hourly(&file.path, &required)?;

        let series = match request.scope {
            ViewMode::SingleDay => RangeFilter::single_day(&series, request.date)?,
            ViewMode::FullMonth => series,
        };
        self.binner
            .bin(series.rows(), request.pollutant, request.aggregation)
    }

    /// Hourly series of one parameter at one site from the air-quality service.
    pub fn import_api(
        &self,
        source: &dyn ObservationSource,
        request: &ObservationRequest,
        site_id: u32,
    ) -> Result<HourlySeries> {
        let parameter = request
            .parameters
            .first()
            .ok_or_else(|| ProcessingError::InvalidFormat("Request has no parameter".to_string()))?;

        let records = source.fetch(request)?;
        let frame = self.normalizer.normalize_api(&records, site_id, parameter)?;
        let series = Resampler::to_hourly(&frame.observations);
        info!(
            site_id,
            parameter = %parameter,
            records = records.len(),
            hours = series.len(),
            "Imported API observations"
        );
        Ok(series)
    }
}

impl Default for GasPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
