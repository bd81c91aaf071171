//! Log verbosity threshold

use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};

/// Environment variable holding the integer verbosity level.
pub const DEBUG_LEVEL_VAR: &str = "DEBUG_LEVEL";

/// Highest level with its own meaning; larger values behave like it.
const MAX_LEVEL: u8 = 2;

/// Severity threshold for the logging sink.
///
/// - `0`: errors only
/// - `1`: warnings, errors and lifecycle notices
/// - `2` and above: verbose trace of every entry touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const QUIET: Self = Self(0);
    pub const NORMAL: Self = Self(1);
    pub const TRACE: Self = Self(MAX_LEVEL);

    pub fn new(level: u8) -> Self {
        Self(level.min(MAX_LEVEL))
    }

    /// Read the level from [`DEBUG_LEVEL_VAR`]. Unset means quiet.
    pub fn from_env() -> Result<Self> {
        Self::from_value(std::env::var(DEBUG_LEVEL_VAR).ok().as_deref())
    }

    /// Parse a raw level. Negative numbers clamp to quiet.
    pub fn from_value(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::QUIET);
        };

        let level: i64 = raw.trim().parse().map_err(|_| {
            Error::Config(format!("Invalid {} value {:?}", DEBUG_LEVEL_VAR, raw))
        })?;

        Ok(Self::new(level.clamp(0, MAX_LEVEL as i64) as u8))
    }

    /// Maximum `tracing` level that passes this threshold.
    pub fn level_filter(&self) -> LevelFilter {
        match self.0 {
            0 => LevelFilter::ERROR,
            1 => LevelFilter::INFO,
            _ => LevelFilter::TRACE,
        }
    }
}
