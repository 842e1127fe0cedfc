/// Floor numbers are signed so out-of-range requests such as `-1` can be rejected instead of wrapping.
pub type Floor = i32;

pub const DEFAULT_NUM_ELEVATORS: usize = 2;
pub const DEFAULT_NUM_FLOORS: Floor = 10;
pub const DEFAULT_MAX_PASSENGERS: usize = 5;
pub const DEFAULT_TICK_PERIOD_MS: u64 = 1000;

pub const GROUND_FLOOR: Floor = 0;
