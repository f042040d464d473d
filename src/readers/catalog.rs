use crate::error::{ProcessingError, Result};
use crate::models::{SiteFormat, YearMonth};
use crate::processors::{ColumnNormalizer, SchemaDetector};
use crate::readers::SiteReader;
use crate::utils::filename::{extract_month_tag, matches_site};
use crate::utils::progress::ProgressReporter;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A site export file and the month its name is tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedFile {
    pub path: PathBuf,
    pub month: YearMonth,
}

/// Return the file whose month tag equals the requested date's year-month.
pub fn select_file_for_month<'a>(
    files: &'a [TaggedFile],
    site: &str,
    date: NaiveDate,
) -> Result<&'a TaggedFile> {
    let month = YearMonth::of(&date);
    files
        .iter()
        .find(|f| f.month == month)
        .ok_or_else(|| ProcessingError::NoFileForMonth {
            site: site.to_string(),
            month: month.to_string(),
        })
}

/// The monthly export files of one site inside the data directory.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    site: String,
    files: Vec<TaggedFile>,
}

impl FileCatalog {
    pub fn new(site: impl Into<String>, mut files: Vec<TaggedFile>) -> Self {
        files.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| a.path.cmp(&b.path)));
        Self {
            site: site.into(),
            files,
        }
    }

    /// List `{site}_*.csv` files; files without a month tag are skipped with a warning.
    /// A site with no files yields an empty catalog, so every month lookup is `NoFileForMonth`.
    pub fn scan(data_dir: &Path, site: &str) -> Result<Self> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.is_file() || !matches_site(&path, site) {
                continue;
            }
            match extract_month_tag(&path) {
                Some(month) => files.push(TaggedFile { path, month }),
                None => warn!(file = %path.display(), "Skipping file without a month tag"),
            }
        }

        if files.is_empty() {
            warn!(site, dir = %data_dir.display(), "No files found for site");
        }

        info!(site, files = files.len(), "Scanned site files");
        Ok(Self::new(site, files))
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn files(&self) -> &[TaggedFile] {
        &self.files
    }

    pub fn months(&self) -> Vec<YearMonth> {
        self.files.iter().map(|f| f.month).collect()
    }

    pub fn select_month(&self, date: NaiveDate) -> Result<&TaggedFile> {
        select_file_for_month(&self.files, &self.site, date)
    }

    /// Distinct dates present in the contents of every file, scanned in parallel.
    /// Files that cannot be read or recognized are skipped with a warning.
    pub fn available_dates(
        &self,
        reader: &SiteReader,
        normalizer: &ColumnNormalizer,
        progress: &ProgressReporter,
    ) -> BTreeSet<NaiveDate> {
        let per_file: Vec<BTreeSet<NaiveDate>> = self
            .files
            .par_iter()
            .map(|file| {
                let dates = match Self::dates_in_file(reader, &file.path, normalizer) {
                    Ok(dates) => dates,
                    Err(e) => {
                        warn!(file = %file.path.display(), error = %e, "Failed to parse dates");
                        BTreeSet::new()
                    }
                };
                progress.file_done(&file.path);
                dates
            })
            .collect();

        let dates: BTreeSet<NaiveDate> = per_file.into_iter().flatten().collect();
        debug!(site = %self.site, dates = dates.len(), "Collected available dates");
        dates
    }

    fn dates_in_file(
        reader: &SiteReader,
        path: &Path,
        normalizer: &ColumnNormalizer,
    ) -> Result<BTreeSet<NaiveDate>> {
        let table = reader.read_table(path)?;
        let format: SiteFormat = SchemaDetector::detect(&table.headers)?;
        let frame = normalizer.normalize(&table, format)?;
        Ok(frame
            .observations
            .iter()
            .map(|o| o.timestamp.date())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use std::fs;
    use tempfile::TempDir;

    fn tagged(name: &str, year: i32, month: u32) -> TaggedFile {
        TaggedFile {
            path: PathBuf::from(name),
            month: YearMonth { year, month },
        }
    }

    #[test]
    fn test_select_file_for_month() {
        let files = vec![
            tagged("Lidcombe_20250201.csv", 2025, 2),
            tagged("Lidcombe_20250301.csv", 2025, 3),
        ];
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let selected = select_file_for_month(&files, "Lidcombe", date).unwrap();
        assert_eq!(selected.path, PathBuf::from("Lidcombe_20250301.csv"));
    }

    #[test]
    fn test_missing_month_is_no_file_for_month() {
        let files = vec![tagged("Lidcombe_20250301.csv", 2025, 3)];
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();

        match select_file_for_month(&files, "Lidcombe", date) {
            Err(ProcessingError::NoFileForMonth { site, month }) => {
                assert_eq!(site, "Lidcombe");
                assert_eq!(month, "202504");
            }
            other => panic!("expected NoFileForMonth, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_and_available_dates() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("Lidcombe_20250301.csv"),
            "DATE,TIME,CH4 (ppm)\n01/03/2025,00:00,1.8\n02/03/2025,00:00,1.9\nbad,row,1.0\n",
        )?;
        fs::write(
            dir.path().join("Lidcombe_20250201.csv"),
            "DATE,TIME,CH4 (ppm)\n28/02/2025,23:00,2.0\n",
        )?;
        fs::write(dir.path().join("Lidcombe_notes.csv"), "anything\n")?;
        fs::write(dir.path().join("Stockton_20250301.csv"), "Date Time,CH4_Pic_0\n")?;

        let catalog = FileCatalog::scan(dir.path(), "Lidcombe")?;
        assert_eq!(catalog.files().len(), 2);
        assert_eq!(
            catalog.months(),
            vec![YearMonth { year: 2025, month: 2 }, YearMonth { year: 2025, month: 3 }]
        );

        let normalizer = ColumnNormalizer::from_config(&PipelineConfig::default());
        let dates = catalog.available_dates(&SiteReader::new(), &normalizer, &ProgressReporter::silent());
        let expected: Vec<NaiveDate> = [(2, 28), (3, 1), (3, 2)]
            .iter()
            .map(|(m, d)| NaiveDate::from_ymd_opt(2025, *m, *d).unwrap())
            .collect();
        assert_eq!(dates.into_iter().collect::<Vec<_>>(), expected);
        Ok(())
    }

    #[test]
    fn test_empty_site_has_no_file_for_month() -> Result<()> {
        let dir = TempDir::new()?;
        let catalog = FileCatalog::scan(dir.path(), "Stockton")?;
        assert!(catalog.files().is_empty());

        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert!(matches!(
            catalog.select_month(date),
            Err(ProcessingError::NoFileForMonth { month, .. }) if month == "202504"
        ));
        Ok(())
    }
}
