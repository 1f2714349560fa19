/// Rows in the month grid. Fixed, even for months that need six.
pub const GRID_ROWS: usize = 5;

/// Columns in the month grid, Sunday first.
pub const GRID_COLUMNS: usize = 7;

pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLUMNS;

pub const HOURS_PER_DAY: usize = 24;

/// Default length of one hour row in a time grid.
pub const DEFAULT_HOUR_UNIT: f64 = 64.0;

/// Default floor for the rendered length of a short event.
pub const DEFAULT_MIN_EXTENT: f64 = 20.0;
