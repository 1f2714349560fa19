use anyhow::Result;
use calgrid_core::generate_month_grid;
use chrono::Datelike;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::context::Context;
use crate::render::{pluralize, render_month};

/// `month` is 1-based; values outside 1..=12 roll into neighbouring years.
pub fn run(ctx: &Context, year: Option<i32>, month: Option<i32>) -> Result<()> {
    let year = year.unwrap_or(ctx.today.year());
    let month = month.unwrap_or(ctx.today.month() as i32);

    let grid = generate_month_grid(year, month_index(month));
    debug!(first = %grid.first_of_month(), range = ?grid.range(), "month grid");

    let cells = ctx.resolver.events_for_grid(&ctx.events, &grid);
    println!("{}", render_month(&grid, &cells, ctx.today));

    let occurrences: usize = cells
        .iter()
        .filter(|(day, _)| grid.is_in_month(*day))
        .map(|(_, events)| events.len())
        .sum();
    println!();
    println!(
        "{}",
        format!("{} {} this month", occurrences, pluralize("occurrence", occurrences)).dimmed()
    );

    Ok(())
}

/// 0-based index for the grid generator.
fn month_index(month: i32) -> i32 {
    month.saturating_sub(1)
}
