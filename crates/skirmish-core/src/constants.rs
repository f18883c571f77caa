//! Simulation constants and tuning defaults.

/// Default simulation tick rate (Hz).
pub const TICKS_PER_SECOND: u32 = 20;

/// Seconds per tick at the default tick rate.
pub const DT: f64 = 1.0 / TICKS_PER_SECOND as f64;

/// Density shared by every dynamic body.
pub const BODY_DENSITY: f64 = 20.0;

// --- Agents ---

pub const AGENT_RADIUS: f64 = 0.5;

/// Meters per tick.
pub const AGENT_MAX_SPEED: f64 = 0.75;

/// Meters per tick, per tick.
pub const AGENT_MAX_STEERING_FORCE: f64 = 0.12;

/// Radians per tick (9 degrees).
pub const AGENT_MAX_ANGULAR_VELOCITY: f64 = 9.0 * std::f64::consts::PI / 180.0;

pub const AGENT_DRAG_FORCE: f64 = 0.015;

/// Field-of-view aperture in radians (140 degrees).
pub const AGENT_VISION_ANGLE: f64 = 140.0 * std::f64::consts::PI / 180.0;

/// Meters.
pub const AGENT_VISION_RADIUS: f64 = 60.0;

pub const AGENT_MAX_LIFE: f64 = 100.0;

// --- Shooting ---

pub const SHOOT_MAX_ENERGY: f64 = 200.0;

pub const SHOOT_ENERGY_COST: f64 = 0.0;

/// Energy regained every tick, capped at `SHOOT_MAX_ENERGY`.
pub const SHOOT_ENERGY_REPLENISH: f64 = 5.0;

/// Minimum tick distance between two accepted shots.
pub const SHOOT_COOLDOWN_TICKS: u64 = 2;

// --- Projectiles ---

pub const PROJECTILE_RADIUS: f64 = 0.3;

/// Meters per tick.
pub const PROJECTILE_SPEED: f64 = 5.0;

pub const PROJECTILE_DAMAGE: f64 = 30.0;

/// Time to live, in ticks.
pub const PROJECTILE_MAX_AGE: u64 = 60;

// --- Respawn ---

pub const RESPAWN_DELAY_TICKS: u64 = 5 * TICKS_PER_SECOND as u64;

// --- Geometry ---

/// Below this per-tick speed a body keeps its previous orientation.
pub const MIN_ORIENTATION_SPEED: f64 = 0.01;

/// Tolerance used by point-on-segment tests.
pub const POINT_ON_SEGMENT_TOLERANCE: f64 = 0.0001;

/// Distances shorter than this are treated as zero.
pub const GEOMETRY_EPSILON: f64 = 1e-9;
