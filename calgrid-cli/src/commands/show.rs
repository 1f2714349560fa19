use anyhow::{Result, anyhow};
use calgrid_core::{Event, Occurrence, Resolver};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::{Render, describe_recurrence, format_date_label, format_duration};

/// How many upcoming occurrences to list
const UPCOMING_LIMIT: usize = 5;

/// How far ahead to look for them, in days
const UPCOMING_HORIZON_DAYS: usize = 366;

pub fn run(ctx: &Context, id: &str) -> Result<()> {
    let event = ctx
        .find_event(id)
        .ok_or_else(|| anyhow!("Event '{}' not found", id))?;
    let tz = ctx.timezone();

    println!("{}", event.title.bold());
    if let Some(description) = &event.description {
        println!("  {}", description.dimmed());
    }
    println!();

    let origin = event.origin_date(&tz);
    println!("  First:      {} {}", origin.format("%Y-%m-%d"), event.render(&tz));
    println!("  Duration:   {}", format_duration(event.duration()));
    println!(
        "  Visibility: {}",
        if event.is_public { "public" } else { "private" }
    );
    if let Some(calendar) = &event.calendar_id {
        println!("  Calendar:   {}", calendar);
    }
    println!("  Repeats:    {}", describe_recurrence(&event.recurrence));
    if let Some(rule) = event.recurrence.to_rrule(&tz) {
        println!("  RRULE:      {}", rule.dimmed());
    }

    if !event.guests.is_empty() {
        println!("  Guests:");
        for guest in &event.guests {
            let name = match (guest.name.as_deref(), guest.email.as_str()) {
                (Some(name), _) => name,
                (None, "") => "unnamed guest",
                (None, email) => email,
            };
            let status = guest.response_status.as_deref().unwrap_or("no response");
            println!("    {} {}", name, format!("({})", status).dimmed());
        }
    }

    let upcoming = next_occurrences(&ctx.resolver, event, ctx.today, UPCOMING_LIMIT);
    println!();
    if upcoming.is_empty() {
        println!("  {}", "No upcoming occurrences".dimmed());
    } else {
        println!("  {}", "Upcoming".bold());
        for (day, kind) in upcoming {
            let tag = match kind {
                Occurrence::Origin => " (first)",
                Occurrence::Recurring => "",
            };
            println!("    {}{}", format_date_label(day, ctx.today), tag.dimmed());
        }
    }

    Ok(())
}

/// The first `limit` days on or after `from` that `event` occurs on.
pub fn next_occurrences(
    resolver: &Resolver,
    event: &Event,
    from: NaiveDate,
    limit: usize,
) -> Vec<(NaiveDate, Occurrence)> {
    from.iter_days()
        .take(UPCOMING_HORIZON_DAYS)
        .filter_map(|day| resolver.classify(event, day).map(|kind| (day, kind)))
        .take(limit)
        .collect()
}
