//! ECS systems that operate on the arena each tick.
//!
//! Systems are pure functions over the world model. They do not own state;
//! all state lives in components and the physics world. The orchestrator
//! calls them in a fixed order.

pub mod collisions;
pub mod death;
pub mod health;
pub mod lifecycle;
pub mod mutations;
pub mod perception;
pub mod physics_step;
pub mod respawn;
pub mod shooting;
pub mod snapshot;
pub mod steering;
