/// Timestamp column headers
pub const FORMAT_A_DATE_COLUMN: &str = "DATE";
pub const FORMAT_A_TIME_COLUMN: &str = "TIME";
pub const FORMAT_B_DATETIME_COLUMN: &str = "Date Time";

/// Default Format B sensor-channel renames (source header, canonical name)
pub const DEFAULT_RENAME_RULES: [(&str, &str); 7] = [
    ("CH4_Pic_0", "CH4"),
    ("CO2_Pic_0", "CO2"),
    ("N2O_Pic_0", "N2O"),
    ("NH3_Pic_0", "NH3"),
    ("H2O_Pic_0", "H2O"),
    ("WSP_0", "Wind_Speed"),
    ("WDR_0", "Wind_Direction"),
];

/// Default gas display units
pub const DEFAULT_GAS_UNITS: [(&str, &str); 5] = [
    ("CH4", "ppm"),
    ("CO2", "ppm"),
    ("N2O", "ppm"),
    ("NH3", "ppb"),
    ("H2O", "%"),
];

/// Default monitoring sites (name, latitude, longitude)
pub const DEFAULT_SITES: [(&str, f64, f64); 2] = [
    ("Lidcombe", -33.865, 151.045),
    ("Stockton", -32.909, 151.784),
];

/// File layout
pub const DEFAULT_DATA_DIR: &str = "ghg_csv";
pub const CSV_EXTENSION: &str = "csv";
pub const HOURLY_FILE_SUFFIX: &str = "_hour";

/// Directional binning defaults
pub const DEFAULT_VALUE_BINS: usize = 5;
pub const DEFAULT_SECTOR_WIDTH_DEG: f64 = 30.0;
pub const DEFAULT_DEGENERATE_BIN_WIDTH: f64 = 0.2;

/// External API defaults
pub const DEFAULT_API_BASE_URL: &str = "https://data.airquality.nsw.gov.au/";
pub const OBSERVATIONS_ENDPOINT: &str = "api/Data/get_Observations";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_CATEGORY: &str = "Averages";
pub const DEFAULT_API_SUB_CATEGORY: &str = "Hourly";
pub const DEFAULT_API_FREQUENCY: &str = "Hourly average";

/// Export timestamp format used by the hourly CSV writer
pub const EXPORT_DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
