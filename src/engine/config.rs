// Grid geometry
pub const GRID_RES: usize = 50; // rows and columns
pub const PLAYFIELD_SIZE: i32 = 500; // pixels per side
pub const CELL_SIZE: i32 = PLAYFIELD_SIZE / GRID_RES as i32; // pixels per cell

// Target radius range (pixels), inclusive
pub const TARGET_MIN_RADIUS: i32 = 5;
pub const TARGET_MAX_RADIUS: i32 = 15;

// Round start
pub const START_CELL: (usize, usize) = (0, 0);

// Tick cadence: 30 ticks per second, one tick per rendered frame
pub const DEFAULT_TICK_MS: u64 = 33;

// Default tick limit for a served round (~10 minutes at 33ms/tick)
pub const DEFAULT_MAX_TICKS: u64 = 18_000;
