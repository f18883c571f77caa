//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::AgentPerception;
use crate::types::{EntityId, Segment};

/// Marks an entity as an agent driven by an external controller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Agent;

/// Marks an entity as a projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile;

/// Physical limits applied by the steering system. Velocities in meters per tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovementLimits {
    pub max_speed: f64,
    pub max_steering_force: f64,
    /// Radians per tick.
    pub max_angular_velocity: f64,
    pub drag_force: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub max_life: f64,
    /// Always within `[0, max_life]`.
    pub life: f64,
}

/// Pending steering intents, agent-relative, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Steering {
    pub queue: VecDeque<DVec2>,
}

/// Pending aiming intents plus the bookkeeping that gates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shooting {
    pub queue: VecDeque<DVec2>,
    pub cooldown_ticks: u64,
    pub energy: f64,
    pub max_energy: f64,
    pub energy_cost: f64,
    pub energy_replenish: f64,
    /// Tick of the last accepted shot.
    pub last_shot: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifecycle {
    pub tick_birth: u64,
    /// `None` while alive.
    pub tick_death: Option<u64>,
    /// Ticks to live; 0 disables age-based death.
    pub max_age: u64,
    /// Set while dying or respawning. A locked entity takes no mutations and no damage.
    pub locked: bool,
    pub on_death: OnDeath,
}

/// Respawn scheduling for entities with `OnDeath::Respawn`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Respawn {
    pub delay_ticks: u64,
    /// Tick at which the entity comes back, while it is down.
    pub respawn_at: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perception {
    /// Full aperture in radians.
    pub vision_angle: f64,
    pub vision_radius: f64,
    /// Payload computed during the last tick, read by the transport.
    pub last: Option<AgentPerception>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Render {
    pub kind: BodyKind,
    /// Transient points for the debug overlay, rebuilt every tick.
    pub debug_points: Vec<DVec2>,
}

/// Damage dealt by this entity on contact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Impactor {
    pub damage: f64,
}

/// Emitter of a projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Owned {
    pub owner: EntityId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub hits_given: u32,
    pub hits_taken: u32,
    pub frags: u32,
    pub deaths: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub stats: PlayerStats,
}

/// World-space edges of a ground or obstacle polygon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticGeometry {
    pub map_id: String,
    pub edges: Vec<Segment>,
}
