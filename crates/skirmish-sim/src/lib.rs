//! Simulation engine for the skirmish arena.
//!
//! Owns the hecs ECS world and the rapier2d rigid-body world, runs the tick
//! pipeline in a fixed order, and produces agent perceptions and viz frames.

pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod physics;
pub mod systems;
pub mod world;
pub mod world_setup;

pub use skirmish_core as core;
pub use config::ArenaConfig;
pub use engine::ArenaEngine;
pub use error::{ArenaError, MutationError};
pub use intake::{IntakeMessage, MutationIntake};
