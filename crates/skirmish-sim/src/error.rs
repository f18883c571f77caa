//! Error types for arena construction and mutation decoding.

use thiserror::Error;

use skirmish_core::types::EntityId;

/// Failures surfaced by the arena outside of a tick.
///
/// Map errors are fatal at construction. Body errors for entities spawned
/// mid-game are logged by the caller and the spawn is skipped.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("invalid polygon {id}: {reason}")]
    InvalidPolygon { id: String, reason: String },
    #[error("could not decode map: {0}")]
    MapDecode(#[from] serde_json::Error),
    #[error("map has no start points")]
    NoSpawnPoints,
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}

/// Why a single mutation inside a batch was not applied.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("unknown method {0:?}")]
    UnknownMethod(String),
    #[error("malformed arguments for {method}: {source}")]
    MalformedArguments {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("non-finite arguments for {0}")]
    NonFinite(String),
}
