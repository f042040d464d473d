use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unrecognized file schema, headers: [{headers}]")]
    UnrecognizedSchema { headers: String },

    #[error("Column '{column}' not found in the normalized data")]
    MissingColumn { column: String },

    #[error("Unknown site '{site}'")]
    UnknownSite { site: String },

    #[error("No file for {site} covering month {month}")]
    NoFileForMonth { site: String, month: String },

    #[error("No data available for {date}")]
    NoDataInRange { date: chrono::NaiveDate },

    #[error("Insufficient data for {field}: no rows with wind speed, wind direction and {field}")]
    InsufficientData { field: String },

    #[error("Unparseable timestamp: '{value}'")]
    UnparseableTimestamp { value: String },

    #[error("Remote call failed for site {site_id} parameter {parameter}: {message}")]
    RemoteCallFailure {
        site_id: u32,
        parameter: String,
        message: String,
    },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}
