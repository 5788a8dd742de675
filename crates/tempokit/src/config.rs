//! Process-wide defaults: the datetime pattern and the target zone.
//!
//! Built once at startup (from the environment or a deserialized file) and
//! passed by reference; nothing in this crate reads the environment on its
//! own.

use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::format::compile;
use crate::parse::ParseOptions;
use crate::zone::TargetZone;
use crate::DEFAULT_FORMAT;

/// Environment variable holding the default datetime pattern.
pub const FORMAT_VAR: &str = "DATE_FORMAT";
/// Environment variable holding the default zone (`UTC`, `+05:30`, an IANA name).
pub const TIMEZONE_VAR: &str = "DATE_TIMEZONE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// strftime pattern used when no per-call format is given.
    pub datetime_format: String,
    /// Zone attached to offset-less values and used for "now" defaults.
    pub timezone: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            datetime_format: DEFAULT_FORMAT.to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl EngineConfig {
    /// Read [`FORMAT_VAR`] and [`TIMEZONE_VAR`], defaulting missing values.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if a value is present but invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(format) = lookup(FORMAT_VAR).filter(|v| !v.trim().is_empty()) {
            config.datetime_format = format;
        }
        if let Some(timezone) = lookup(TIMEZONE_VAR).filter(|v| !v.trim().is_empty()) {
            config.timezone = timezone;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the pattern compiles and the zone resolves.
    pub fn validate(&self) -> Result<()> {
        compile(&self.datetime_format)
            .map_err(|e| EngineError::Config(format!("{FORMAT_VAR}: {e}")))?;
        self.zone()
            .map_err(|e| EngineError::Config(format!("{TIMEZONE_VAR}: {e}")))?;
        Ok(())
    }

    pub fn zone(&self) -> Result<TargetZone> {
        self.timezone.parse()
    }

    /// Parser options carrying this configuration's defaults.
    pub fn parse_options(&self) -> Result<ParseOptions> {
        ParseOptions::from_config(self)
    }
}
