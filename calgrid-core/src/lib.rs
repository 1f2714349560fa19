//! Core engine for calgrid.
//!
//! This crate turns a flat snapshot of event records into what calendar
//! views draw:
//! - `grid` lays out a month as a fixed 5x7 matrix of dates
//! - `occurrence` decides which events (one-off or weekly) fall on a day,
//!   and which hour row they start in
//! - `layout` maps an occurrence onto a vertical time grid
//!
//! Only `config` touches the filesystem.

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod grid;
pub mod layout;
pub mod occurrence;
pub mod recurrence;
pub mod timezone;

pub use date_range::DateRange;
pub use error::{CalGridError, CalGridResult};
pub use event::{Event, Guest};
pub use grid::{MonthGrid, generate_month_grid, week_of};
pub use layout::{Placement, TimeScale};
pub use occurrence::{Occurrence, Resolver};
pub use recurrence::{Recurrence, WeekdaySet};
