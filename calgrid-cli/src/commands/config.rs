use anyhow::Result;
use calgrid_core::config::CalGridConfig;
use owo_colors::OwoColorize;

use crate::context::Overrides;

pub fn run(overrides: &Overrides) -> Result<()> {
    let config_path = CalGridConfig::config_path()?;
    let config = CalGridConfig::load()?;

    let events_file = overrides
        .events_file
        .clone()
        .unwrap_or_else(|| config.events_path());
    let timezone = overrides
        .timezone
        .clone()
        .or_else(|| config.timezone.clone())
        .unwrap_or_else(|| "(system)".to_string());
    let scale = config.time_scale();

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Events:     {}", events_file.display());
    println!();
    println!("{}", "Views".bold());
    println!("  Timezone:   {}", timezone);
    println!("  Hour unit:  {}", scale.hour_unit);
    println!("  Min extent: {}", scale.min_extent);

    Ok(())
}
