use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// The closed set of gas and meteorological measurements recognized after
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "CH4")]
    Ch4,
    #[serde(rename = "CO2")]
    Co2,
    #[serde(rename = "N2O")]
    N2o,
    #[serde(rename = "NH3")]
    Nh3,
    #[serde(rename = "H2O")]
    H2o,
    #[serde(rename = "Wind_Speed")]
    WindSpeed,
    #[serde(rename = "Wind_Direction")]
    WindDirection,
}

impl CanonicalField {
    pub const COUNT: usize = 7;

    pub const ALL: [CanonicalField; Self::COUNT] = [
        CanonicalField::Ch4,
        CanonicalField::Co2,
        CanonicalField::N2o,
        CanonicalField::Nh3,
        CanonicalField::H2o,
        CanonicalField::WindSpeed,
        CanonicalField::WindDirection,
    ];

    pub const GASES: [CanonicalField; 5] = [
        CanonicalField::Ch4,
        CanonicalField::Co2,
        CanonicalField::N2o,
        CanonicalField::Nh3,
        CanonicalField::H2o,
    ];

    /// Position of this field inside a [`FieldValues`](crate::models::FieldValues) row.
    pub fn index(self) -> usize {
        match self {
            CanonicalField::Ch4 => 0,
            CanonicalField::Co2 => 1,
            CanonicalField::N2o => 2,
            CanonicalField::Nh3 => 3,
            CanonicalField::H2o => 4,
            CanonicalField::WindSpeed => 5,
            CanonicalField::WindDirection => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Ch4 => "CH4",
            CanonicalField::Co2 => "CO2",
            CanonicalField::N2o => "N2O",
            CanonicalField::Nh3 => "NH3",
            CanonicalField::H2o => "H2O",
            CanonicalField::WindSpeed => "Wind_Speed",
            CanonicalField::WindDirection => "Wind_Direction",
        }
    }

    /// Match a cleaned column name against the canonical names, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(name))
    }

    pub fn is_gas(self) -> bool {
        !matches!(self, CanonicalField::WindSpeed | CanonicalField::WindDirection)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ProcessingError::MissingColumn {
            column: s.trim().to_string(),
        })
    }
}
