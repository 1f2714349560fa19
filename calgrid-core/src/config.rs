//! Global calgrid configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HOUR_UNIT, DEFAULT_MIN_EXTENT};
use crate::error::{CalGridError, CalGridResult};
use crate::layout::TimeScale;
use crate::timezone::parse_timezone;

static DEFAULT_EVENTS_FILE: &str = "~/calendar/events.json";

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

fn default_hour_unit() -> f64 {
    DEFAULT_HOUR_UNIT
}

fn default_min_extent() -> f64 {
    DEFAULT_MIN_EXTENT
}

/// Configuration at ~/.config/calgrid/config.toml
///
/// Every key can be overridden with a `CALGRID_` environment variable,
/// e.g. `CALGRID_TIMEZONE=Europe/Berlin`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalGridConfig {
    /// JSON snapshot of event records
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    /// IANA zone used for day boundaries; the system zone when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default = "default_hour_unit")]
    pub hour_unit: f64,

    #[serde(default = "default_min_extent")]
    pub min_extent: f64,
}

impl Default for CalGridConfig {
    fn default() -> Self {
        CalGridConfig {
            events_file: default_events_file(),
            timezone: None,
            hour_unit: DEFAULT_HOUR_UNIT,
            min_extent: DEFAULT_MIN_EXTENT,
        }
    }
}

impl CalGridConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template on first use.
    pub fn load() -> CalGridResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (missing file is fine) layered under `CALGRID_*` env vars.
    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CALGRID"))
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// Parse a config from TOML text, without environment overrides.
    pub fn from_toml(content: &str) -> CalGridResult<Self> {
        toml::from_str(content).map_err(|e| CalGridError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> CalGridResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalGridError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let contents = format!(
            "\
# calgrid configuration

# Event snapshot to read (JSON array of event records):
# events_file = \"{}\"

# Timezone for day boundaries (defaults to the system timezone):
# timezone = \"Europe/Berlin\"

# Time grid scale: length of one hour, and the shortest drawn event:
# hour_unit = {:.1}
# min_extent = {:.1}
",
            DEFAULT_EVENTS_FILE, DEFAULT_HOUR_UNIT, DEFAULT_MIN_EXTENT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// `events_file` with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.events_file.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// The configured zone, if any.
    pub fn timezone(&self) -> CalGridResult<Option<Tz>> {
        self.timezone.as_deref().map(parse_timezone).transpose()
    }

    pub fn time_scale(&self) -> TimeScale {
        TimeScale::new(self.hour_unit, self.min_extent)
    }
}
