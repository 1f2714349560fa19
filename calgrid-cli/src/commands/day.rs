use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;

use super::parse_day_arg;
use crate::context::Context;
use crate::render::{Render, format_date_label, render_bar};

pub fn run(ctx: &Context, date: Option<&str>, json: bool) -> Result<()> {
    let day = parse_day_arg(date, ctx.today)?;

    if json {
        let events = ctx.resolver.events_for_day(&ctx.events, day);
        let out = serde_json::to_string_pretty(&events).context("Could not serialize events")?;
        println!("{}", out);
        return Ok(());
    }

    let tz = ctx.timezone();
    let label = format!("{}  {}", format_date_label(day, ctx.today), day.format("%A, %B %-d %Y"));
    println!("{}", label.bold());

    let slots = ctx.resolver.bucket_by_hour(&ctx.events, day);
    if slots.iter().all(Vec::is_empty) {
        println!("  {}", "No events".dimmed());
        return Ok(());
    }

    for (hour, events) in slots.iter().enumerate() {
        if events.is_empty() {
            continue;
        }
        println!("{}", format!("{:02}:00", hour).dimmed());
        for event in events {
            let placement = ctx.resolver.place(event, &ctx.scale);
            println!("  {} {}", event.render(&tz), render_bar(&placement, &ctx.scale).cyan());
        }
    }

    Ok(())
}
