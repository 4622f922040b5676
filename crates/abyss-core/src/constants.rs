//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 20;

/// Milliseconds per tick.
pub const DT_MS: u64 = 1000 / TICK_RATE as u64;

// --- Vehicle ---

/// Number of cargo slots carried by every vehicle.
pub const INVENTORY_SLOTS: usize = 27;

/// Downward drift applied per tick while a vehicle is out of the water.
pub const FALL_SPEED: f64 = 0.4;

/// Fraction of max power below which the low-power warning fires.
pub const LOW_POWER_FRACTION: f64 = 0.1;

/// Ticks between motor hum events while the vehicle is moving.
pub const MOTOR_HUM_INTERVAL_TICKS: u64 = 20;

/// Health restored by a single repair.
pub const REPAIR_AMOUNT: f64 = 10.0;

/// Blocks below a surface placement that are searched for water.
pub const PLACEMENT_WATER_SEARCH_DEPTH: i32 = 3;

// --- Sonar ---

/// Sweep line angular speed (degrees per tick).
pub const SONAR_SWEEP_SPEED: f64 = 1.5;

/// Extra angular tolerance on top of the sweep step when revealing contacts (degrees).
pub const SONAR_REVEAL_TOLERANCE: f64 = 2.0;

/// Maximum detection range (blocks).
pub const SONAR_MAX_RANGE: f64 = 64.0;

/// Dead zone radius: contacts closer than this are not reported (blocks).
pub const SONAR_MIN_RANGE: f64 = 5.0;

/// Distance from the origin at which terrain rays start (blocks).
pub const SONAR_RAY_START: f64 = 5.0;

/// Angular spacing between terrain rays (degrees). 120 rays over a full circle.
pub const SONAR_RAY_SPACING: f64 = 3.0;

/// Width of a terrain de-duplication bucket (degrees).
pub const SONAR_TERRAIN_BUCKET: f64 = 2.0;

/// Unrevealed contacts are dropped after this long (ms).
pub const SONAR_UNREVEALED_EXPIRY_MS: u64 = 10_000;

/// Revealed contacts fade out over this window (ms).
pub const SONAR_FADE_MS: u64 = 2_000;

// --- Rate limiting (ms per command category) ---

pub const RATE_LIMIT_INPUT_MS: u64 = 50;
pub const RATE_LIMIT_FIRE_MS: u64 = 500;
pub const RATE_LIMIT_PING_MS: u64 = 1_000;
pub const RATE_LIMIT_MODE_TOGGLE_MS: u64 = 200;
pub const RATE_LIMIT_DISMOUNT_MS: u64 = 100;

/// Rate-limit entries older than this are swept (ms).
pub const RATE_LIMIT_ENTRY_TTL_MS: u64 = 5_000;

/// Probability that a rate-limit check triggers a sweep of stale entries.
pub const RATE_LIMIT_SWEEP_CHANCE: f64 = 0.001;
