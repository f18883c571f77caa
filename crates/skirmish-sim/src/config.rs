//! Arena configuration.
//!
//! Every field has a default so a partial JSON document is a valid config.

use serde::{Deserialize, Serialize};

use skirmish_core::constants::*;

/// Configuration for starting a new arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// RNG seed for determinism. Same seed = same respawn points.
    pub seed: u64,
    pub game_id: String,
    /// Conversion factor between per-tick velocities and engine velocities.
    pub ticks_per_second: u32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    pub respawn_delay_ticks: u64,
    /// Record visible obstacle chords as debug points.
    pub debug_vision: bool,
    pub agent: AgentSpecs,
    pub projectile: ProjectileSpecs,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game_id: "local".to_string(),
            ticks_per_second: TICKS_PER_SECOND,
            velocity_iterations: 8,
            position_iterations: 3,
            respawn_delay_ticks: RESPAWN_DELAY_TICKS,
            debug_vision: false,
            agent: AgentSpecs::default(),
            projectile: ProjectileSpecs::default(),
        }
    }
}

impl ArenaConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.ticks_per_second.max(1))
    }
}

/// Per-agent physical and sensory parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSpecs {
    pub radius: f64,
    pub max_speed: f64,
    pub max_steering_force: f64,
    pub max_angular_velocity: f64,
    pub drag_force: f64,
    pub vision_radius: f64,
    pub vision_angle: f64,
    pub max_life: f64,
    pub max_shoot_energy: f64,
    pub shoot_energy_cost: f64,
    pub shoot_energy_replenish: f64,
    pub shoot_cooldown_ticks: u64,
}

impl Default for AgentSpecs {
    fn default() -> Self {
        Self {
            radius: AGENT_RADIUS,
            max_speed: AGENT_MAX_SPEED,
            max_steering_force: AGENT_MAX_STEERING_FORCE,
            max_angular_velocity: AGENT_MAX_ANGULAR_VELOCITY,
            drag_force: AGENT_DRAG_FORCE,
            vision_radius: AGENT_VISION_RADIUS,
            vision_angle: AGENT_VISION_ANGLE,
            max_life: AGENT_MAX_LIFE,
            max_shoot_energy: SHOOT_MAX_ENERGY,
            shoot_energy_cost: SHOOT_ENERGY_COST,
            shoot_energy_replenish: SHOOT_ENERGY_REPLENISH,
            shoot_cooldown_ticks: SHOOT_COOLDOWN_TICKS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSpecs {
    pub radius: f64,
    /// Meters per tick.
    pub speed: f64,
    pub damage: f64,
    /// Time to live in ticks.
    pub max_age: u64,
}

impl Default for ProjectileSpecs {
    fn default() -> Self {
        Self {
            radius: PROJECTILE_RADIUS,
            speed: PROJECTILE_SPEED,
            damage: PROJECTILE_DAMAGE,
            max_age: PROJECTILE_MAX_AGE,
        }
    }
}
