//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// What a physical body stands for. Carried as user data on every rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Agent,
    Projectile,
    Obstacle,
    Ground,
}

impl BodyKind {
    /// Stable numeric code used when packing the kind into engine user data.
    pub fn code(self) -> u8 {
        match self {
            BodyKind::Agent => 1,
            BodyKind::Projectile => 2,
            BodyKind::Obstacle => 3,
            BodyKind::Ground => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(BodyKind::Agent),
            2 => Some(BodyKind::Projectile),
            3 => Some(BodyKind::Obstacle),
            4 => Some(BodyKind::Ground),
            _ => None,
        }
    }

    /// Static map geometry (never moves, never has Health).
    pub fn is_static(self) -> bool {
        matches!(self, BodyKind::Obstacle | BodyKind::Ground)
    }

    /// Agents and projectiles are circles; map geometry is polygonal.
    pub fn is_circular(self) -> bool {
        matches!(self, BodyKind::Agent | BodyKind::Projectile)
    }
}

/// Tag of a single item in an agent's vision list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionTag {
    Agent,
    Obstacle,
    Projectile,
}

impl From<BodyKind> for VisionTag {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Agent => VisionTag::Agent,
            BodyKind::Projectile => VisionTag::Projectile,
            BodyKind::Obstacle | BodyKind::Ground => VisionTag::Obstacle,
        }
    }
}

/// What happens when an entity's Lifecycle reaches its death tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnDeath {
    /// Dispose at the start of the following tick.
    #[default]
    Dispose,
    /// Lock, then resurrect after the respawn delay.
    Respawn,
}
