use clap::{Parser, Subcommand, ValueEnum};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::models::{AggregationMode, CanonicalField};
use crate::processors::ViewMode;

#[derive(Parser)]
#[command(name = "ghg-processor")]
#[command(about = "Greenhouse-gas monitoring site data processor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the configured data directory")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Memory-map site files instead of buffered reads")]
    pub mmap: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the dates with data for a site
    Dates {
        #[arg(short, long)]
        site: String,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Show one gas for a day or a whole month
    View {
        #[arg(short, long)]
        site: String,

        #[arg(short, long, value_parser = parse_gas)]
        gas: CanonicalField,

        #[arg(short, long, help = "Date to view (YYYY-MM-DD)")]
        date: NaiveDate,

        #[arg(short, long, value_enum, default_value_t = ModeArg::SingleDay)]
        mode: ModeArg,

        #[arg(long, help = "Directory to export the selection as CSV")]
        export: Option<PathBuf>,
    },

    /// Bin a pollutant by wind direction
    Rose {
        #[arg(short, long)]
        site: String,

        #[arg(short, long, value_parser = parse_field)]
        pollutant: CanonicalField,

        #[arg(short, long, help = "Date inside the month to bin (YYYY-MM-DD)")]
        date: NaiveDate,

        #[arg(short, long, value_enum, default_value_t = ModeArg::FullMonth)]
        mode: ModeArg,

        #[arg(short, long, value_enum, default_value_t = AggregationArg::Raw)]
        aggregation: AggregationArg,

        #[arg(short, long, help = "Write the bins to a CSV file")]
        output: Option<PathBuf>,
    },

    /// Convert one minute-resolution file to hourly means
    Hourly {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, help = "Output CSV path [default: {input}_hour.csv]")]
        output: Option<PathBuf>,
    },

    /// Normalize a saved air-quality API response into an hourly CSV
    ///
    /// Only parameters that map to a known field (CH4, CO2, N2O, NH3, H2O,
    /// Wind_Speed, Wind_Direction) can be imported; others such as NO2 fail
    /// with a missing column error.
    ApiImport {
        #[arg(short, long, help = "JSON file holding the observation records")]
        input: PathBuf,

        #[arg(long)]
        site_id: u32,

        #[arg(short, long, help = "Parameter code, e.g. CO2 (NO2 and other unmapped codes are rejected)")]
        parameter: String,

        #[arg(long, help = "First date (YYYY-MM-DD)")]
        start: NaiveDate,

        #[arg(long, help = "Last date (YYYY-MM-DD)")]
        end: NaiveDate,

        #[arg(short, long, help = "Output CSV path [default: {input}_hour.csv]")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    SingleDay,
    FullMonth,
}

impl From<ModeArg> for ViewMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::SingleDay => ViewMode::SingleDay,
            ModeArg::FullMonth => ViewMode::FullMonth,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AggregationArg {
    Raw,
    Daily,
    Monthly,
}

impl From<AggregationArg> for AggregationMode {
    fn from(mode: AggregationArg) -> Self {
        match mode {
            AggregationArg::Raw => AggregationMode::Raw,
            AggregationArg::Daily => AggregationMode::DailyMean,
            AggregationArg::Monthly => AggregationMode::MonthlyMean,
        }
    }
}

fn parse_field(value: &str) -> Result<CanonicalField, String> {
    CanonicalField::from_name(value).ok_or_else(|| {
        let names: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.as_str()).collect();
        format!("unknown field '{}', expected one of {}", value, names.join(", "))
    })
}

fn parse_gas(value: &str) -> Result<CanonicalField, String> {
    match CanonicalField::from_name(value) {
        Some(field) if field.is_gas() => Ok(field),
        _ => {
            let names: Vec<&str> = CanonicalField::GASES.iter().map(|f| f.as_str()).collect();
            Err(format!("unknown gas '{}', expected one of {}", value, names.join(", ")))
        }
    }
}
