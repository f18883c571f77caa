//! Core types and definitions for the skirmish arena.
//!
//! This crate defines the vocabulary shared by the geometry and simulation
//! crates: components, mutation commands, perception and viz payloads, map
//! input and constants. It has no dependency on the physics engine or any
//! transport.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod map;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
