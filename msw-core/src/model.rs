use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Unit systems accepted by the API, in their wire spelling.
pub const VALID_UNITS: [&str; 3] = ["uk", "us", "eu"];

/// One forecast record. The schema belongs to the upstream API and is not
/// validated field by field.
pub type ForecastEntry = serde_json::Map<String, serde_json::Value>;

/// A successful response: forecast records in the order the API sent them.
pub type Forecast = Vec<ForecastEntry>;

/// Identifier of a surf spot / forecast location.
///
/// Only integers in `0..=i64::MAX` are accepted, the range a TOML config file
/// can store. Every conversion into a `SpotId` is fallible so that setters can
/// reject non-numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SpotId(u64);

impl SpotId {
    pub const MAX: u64 = i64::MAX as u64;

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for SpotId {
    type Error = ConfigError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value <= SpotId::MAX {
            Ok(SpotId(value))
        } else {
            Err(ConfigError::InvalidSpotId(value.to_string()))
        }
    }
}

impl TryFrom<u32> for SpotId {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(SpotId(u64::from(value)))
    }
}

impl TryFrom<i64> for SpotId {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(SpotId)
            .map_err(|_| ConfigError::InvalidSpotId(value.to_string()))
    }
}

impl TryFrom<i32> for SpotId {
    type Error = ConfigError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        SpotId::try_from(i64::from(value))
    }
}

impl TryFrom<f64> for SpotId {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // 2^63 is exactly representable; anything at or above it is out of range.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;

        if value.is_finite() && value.fract() == 0.0 && (0.0..LIMIT).contains(&value) {
            Ok(SpotId(value as u64))
        } else {
            Err(ConfigError::InvalidSpotId(value.to_string()))
        }
    }
}

impl TryFrom<&str> for SpotId {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for SpotId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for SpotId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidSpotId(s.to_string()))
            .and_then(SpotId::try_from)
    }
}

/// Measurement convention used by the API when formatting values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Uk,
    Us,
    Eu,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Uk => "uk",
            Units::Us => "us",
            Units::Eu => "eu",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Uk, Units::Us, Units::Eu]
    }

    pub fn is_default(&self) -> bool {
        *self == Units::default()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: `"UK"` is rejected.
impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uk" => Ok(Units::Uk),
            "us" => Ok(Units::Us),
            "eu" => Ok(Units::Eu),
            _ => Err(ConfigError::InvalidUnits(s.to_string())),
        }
    }
}

impl TryFrom<&str> for Units {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Units {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Field names go into the query string verbatim, so they must be plain tokens.
pub(crate) fn validate_field(name: &str) -> Result<(), ConfigError> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '&' | '=' | '#' | '?'));

    if bad {
        Err(ConfigError::InvalidField(name.to_string()))
    } else {
        Ok(())
    }
}
