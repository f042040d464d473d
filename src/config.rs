use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{CanonicalField, SiteMetadata};
use crate::utils::constants::*;

/// Sites, the gas-unit table, the Format B rename table and the directional
/// binner tunables. Values are layered: built-in defaults, then an optional
/// TOML file, then `GHG__` prefixed environment variables
/// (e.g. `GHG__BINNER__VALUE_BINS=8`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,

    #[validate(length(min = 1), nested)]
    pub sites: Vec<SiteMetadata>,

    pub gas_units: Vec<GasUnit>,

    pub rename_rules: Vec<RenameRule>,

    #[validate(nested)]
    pub binner: BinnerConfig,

    #[validate(nested)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasUnit {
    pub gas: String,
    pub unit: String,
}

/// Source header to canonical name, applied to Format B files before unit stripping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BinnerConfig {
    #[validate(range(min = 1, max = 50))]
    pub value_bins: usize,

    #[validate(range(min = 1.0, max = 180.0))]
    pub sector_width_deg: f64,

    /// Width of the single bucket used when every value is identical.
    #[validate(range(min = 0.000001))]
    pub degenerate_bin_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    #[validate(url)]
    pub base_url: String,

    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,

    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub frequency: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sites: DEFAULT_SITES
                .iter()
                .map(|(name, lat, lon)| SiteMetadata::new(*name, *lat, *lon))
                .collect(),
            gas_units: DEFAULT_GAS_UNITS
                .iter()
                .map(|(gas, unit)| GasUnit {
                    gas: gas.to_string(),
                    unit: unit.to_string(),
                })
                .collect(),
            rename_rules: DEFAULT_RENAME_RULES
                .iter()
                .map(|(from, to)| RenameRule {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
            binner: BinnerConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for BinnerConfig {
    fn default() -> Self {
        Self {
            value_bins: DEFAULT_VALUE_BINS,
            sector_width_deg: DEFAULT_SECTOR_WIDTH_DEG,
            degenerate_bin_width: DEFAULT_DEGENERATE_BIN_WIDTH,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            categories: vec![DEFAULT_API_CATEGORY.to_string()],
            sub_categories: vec![DEFAULT_API_SUB_CATEGORY.to_string()],
            frequency: vec![DEFAULT_API_FREQUENCY.to_string()],
        }
    }
}

impl ApiConfig {
    /// Full URL of the observations endpoint.
    pub fn observations_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            OBSERVATIONS_ENDPOINT.trim_start_matches('/')
        )
    }
}

impl PipelineConfig {
    /// Load defaults, overlay an optional TOML file and the environment, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("GHG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn site(&self, name: &str) -> Option<&SiteMetadata> {
        self.sites
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn unit_for(&self, field: CanonicalField) -> &str {
        self.gas_units
            .iter()
            .find(|u| CanonicalField::from_name(&u.gas) == Some(field))
            .map(|u| u.unit.as_str())
            .unwrap_or("")
    }

    /// Rename table resolved against the canonical names; rules with an unknown target are skipped.
    pub fn rename_table(&self) -> Vec<(String, CanonicalField)> {
        self.rename_rules
            .iter()
            .filter_map(|rule| match CanonicalField::from_name(&rule.to) {
                Some(field) => Some((rule.from.trim().to_string(), field)),
                None => {
                    tracing::warn!(
                        from = %rule.from,
                        to = %rule.to,
                        "Ignoring rename rule with a non-canonical target"
                    );
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn toml_file() -> std::io::Result<NamedTempFile> {
        Builder::new().suffix(".toml").tempfile()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sites.len(), 2);
        assert_eq!(config.unit_for(CanonicalField::Nh3), "ppb");
        assert_eq!(config.unit_for(CanonicalField::WindSpeed), "");
        assert_eq!(config.binner.value_bins, 5);
        assert_eq!(config.binner.degenerate_bin_width, 0.2);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(
            config.api.observations_url(),
            "https://data.airquality.nsw.gov.au/api/Data/get_Observations"
        );
    }

    #[test]
    fn test_rename_table_resolves_targets() {
        let mut config = PipelineConfig::default();
        config.rename_rules.push(RenameRule {
            from: "NO2_0".to_string(),
            to: "NO2".to_string(),
        });

        let table = config.rename_table();
        assert_eq!(table.len(), 7);
        assert!(table.contains(&("WDR_0".to_string(), CanonicalField::WindDirection)));
    }

    #[test]
    fn test_site_lookup_ignores_case() {
        let config = PipelineConfig::default();
        assert_eq!(config.site("stockton").map(|s| s.latitude), Some(-32.909));
        assert!(config.site("Rozelle").is_none());
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = toml_file()?;
        writeln!(file, "data_dir = \"/data/ghg\"")?;
        writeln!(file, "[binner]")?;
        writeln!(file, "value_bins = 8")?;

        let config = PipelineConfig::load(Some(file.path()))?;
        assert_eq!(config.data_dir, PathBuf::from("/data/ghg"));
        assert_eq!(config.binner.value_bins, 8);
        assert_eq!(config.binner.sector_width_deg, 30.0);
        assert_eq!(config.sites.len(), 2);
        Ok(())
    }

    #[test]
    fn test_load_rejects_invalid_values() -> Result<()> {
        let mut file = toml_file()?;
        writeln!(file, "[binner]")?;
        writeln!(file, "value_bins = 0")?;

        assert!(matches!(
            PipelineConfig::load(Some(file.path())),
            Err(ProcessingError::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(PipelineConfig::load(Some(Path::new("/nonexistent/ghg.toml"))).is_err());
    }
}
