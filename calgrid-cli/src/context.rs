//! Everything a view command needs: the event snapshot, the resolver for
//! the viewer's timezone and the time grid scale.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use calgrid_core::config::CalGridConfig;
use calgrid_core::event::parse_events;
use calgrid_core::timezone::parse_timezone;
use calgrid_core::{Event, Resolver, TimeScale};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub events_file: Option<PathBuf>,
    pub timezone: Option<String>,
}

pub struct Context {
    pub events: Vec<Event>,
    pub resolver: Resolver,
    pub scale: TimeScale,
    pub today: NaiveDate,
}

impl Context {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config = CalGridConfig::load().context("Failed to load configuration")?;
        Self::from_config(&config, overrides)
    }

    pub fn from_config(config: &CalGridConfig, overrides: &Overrides) -> Result<Self> {
        let tz = resolve_timezone(overrides.timezone.as_deref(), config)?;
        let events_path = overrides
            .events_file
            .clone()
            .unwrap_or_else(|| config.events_path());

        let events = load_events(&events_path)?;
        info!(
            count = events.len(),
            path = %events_path.display(),
            timezone = tz.name(),
            "loaded event snapshot"
        );

        Ok(Context {
            events,
            resolver: Resolver::new(tz),
            scale: config.time_scale(),
            today: Utc::now().with_timezone(&tz).date_naive(),
        })
    }

    pub fn timezone(&self) -> Tz {
        self.resolver.timezone()
    }

    pub fn find_event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
}

/// Flag, then config, then the system zone, then UTC.
fn resolve_timezone(flag: Option<&str>, config: &CalGridConfig) -> Result<Tz> {
    if let Some(name) = flag {
        return Ok(parse_timezone(name)?);
    }

    if let Some(tz) = config.timezone()? {
        return Ok(tz);
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => match parse_timezone(&name) {
            Ok(tz) => {
                debug!(timezone = %name, "using system timezone");
                Ok(tz)
            }
            Err(e) => {
                warn!(error = %e, "system timezone not recognized; using UTC");
                Ok(Tz::UTC)
            }
        },
        Err(e) => {
            warn!(error = %e, "could not determine system timezone; using UTC");
            Ok(Tz::UTC)
        }
    }
}

/// Read a JSON array of event records.
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    if !path.exists() {
        bail!(
            "No event snapshot at {}.\n\n\
            Point calgrid at one with:\n  \
            calgrid --events <file.json> month\n\n\
            or set events_file in {}",
            path.display(),
            CalGridConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    parse_events(&content).with_context(|| format!("Could not parse events in {}", path.display()))
}
