//! Fundamental identifier and vector types.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use glam::DVec2;

/// Opaque, stable identifier of a world entity.
///
/// The simulation derives it from its ECS entity bits; external collaborators
/// only ever echo it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A straight edge between two world-space points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.a + self.b) * 0.5
    }

    /// Both endpoints expressed relative to `origin`.
    pub fn relative_to(&self, origin: DVec2) -> Segment {
        Segment::new(self.a - origin, self.b - origin)
    }
}
