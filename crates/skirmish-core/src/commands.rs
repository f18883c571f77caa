//! Mutation batches sent by agent controllers to the simulation.
//!
//! Batches are buffered by the intake and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

pub const METHOD_STEER: &str = "steer";
pub const METHOD_SHOOT: &str = "shoot";

/// One raw command. `args` is decoded by the method's handler, so a malformed
/// payload only invalidates this command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMutation {
    pub method: String,
    #[serde(alias = "arguments")]
    pub args: serde_json::Value,
}

impl AgentMutation {
    pub fn steer(x: f64, y: f64) -> Self {
        Self {
            method: METHOD_STEER.to_string(),
            args: serde_json::json!([x, y]),
        }
    }

    pub fn shoot(x: f64, y: f64) -> Self {
        Self {
            method: METHOD_SHOOT.to_string(),
            args: serde_json::json!([x, y]),
        }
    }
}

/// All commands one agent sent for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMutationBatch {
    pub agent_entity_id: EntityId,
    pub agent_proxy_id: String,
    pub mutations: Vec<AgentMutation>,
}
