use anyhow::Result;
use calgrid_core::week_of;
use owo_colors::OwoColorize;

use super::parse_day_arg;
use crate::context::Context;
use crate::render::{Render, format_date_label};

pub fn run(ctx: &Context, date: Option<&str>) -> Result<()> {
    let anchor = parse_day_arg(date, ctx.today)?;
    let tz = ctx.timezone();

    for (i, day) in week_of(anchor).into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        let label = format!("{}  {}", format_date_label(day, ctx.today), day.format("%Y-%m-%d"));
        println!("{}", label.bold());

        let slots = ctx.resolver.bucket_by_hour(&ctx.events, day);
        if slots.iter().all(Vec::is_empty) {
            println!("  {}", "No events".dimmed());
            continue;
        }
        for event in slots.iter().flatten() {
            println!("  {}", event.render(&tz));
        }
    }

    Ok(())
}
