//! Mutation system: turns command batches into queued intents.

use glam::DVec2;
use hecs::World;
use log::{debug, warn};

use skirmish_core::commands::{AgentMutation, AgentMutationBatch, METHOD_SHOOT, METHOD_STEER};
use skirmish_core::components::{Lifecycle, Shooting, Steering};

use crate::error::MutationError;
use crate::world::resolve_entity;

/// A decoded command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentCommand {
    Steer(DVec2),
    Shoot(DVec2),
}

/// Decode one mutation.
pub fn decode(mutation: &AgentMutation) -> Result<AgentCommand, MutationError> {
    let method = mutation.method.as_str();
    if method != METHOD_STEER && method != METHOD_SHOOT {
        return Err(MutationError::UnknownMethod(mutation.method.clone()));
    }
    let [x, y] = serde_json::from_value::<[f64; 2]>(mutation.args.clone()).map_err(|source| {
        MutationError::MalformedArguments {
            method: mutation.method.clone(),
            source,
        }
    })?;
    if !x.is_finite() || !y.is_finite() {
        return Err(MutationError::NonFinite(mutation.method.clone()));
    }
    let vector = DVec2::new(x, y);
    Ok(if method == METHOD_SHOOT {
        AgentCommand::Shoot(vector)
    } else {
        AgentCommand::Steer(vector)
    })
}

/// Apply batches. Returns the number of batches applied.
///
/// A batch for a missing or locked entity is discarded as a whole. Within a
/// batch, shoot intents are queued before steer intents so the shot leaves
/// from where the agent stood before moving.
pub fn run(world: &mut World, batches: &[AgentMutationBatch]) -> usize {
    let mut applied = 0;
    for batch in batches {
        let Some(entity) = resolve_entity(world, batch.agent_entity_id) else {
            warn!(
                "discarding batch from {} for unknown entity {}",
                batch.agent_proxy_id, batch.agent_entity_id
            );
            continue;
        };
        let locked = world
            .get::<&Lifecycle>(entity)
            .map(|lifecycle| lifecycle.locked)
            .unwrap_or(false);
        if locked {
            debug!(
                "discarding batch from {}: entity {} is locked",
                batch.agent_proxy_id, batch.agent_entity_id
            );
            continue;
        }

        let mut shots = Vec::new();
        let mut steers = Vec::new();
        for mutation in &batch.mutations {
            match decode(mutation) {
                Ok(AgentCommand::Shoot(aim)) => shots.push(aim),
                Ok(AgentCommand::Steer(steer)) => steers.push(steer),
                Err(MutationError::UnknownMethod(_)) => {}
                Err(err) => warn!("agent {}: skipping command: {err}", batch.agent_proxy_id),
            }
        }

        if let Ok(mut shooting) = world.get::<&mut Shooting>(entity) {
            shooting.queue.extend(shots);
        }
        if let Ok(mut steering) = world.get::<&mut Steering>(entity) {
            steering.queue.extend(steers);
        }
        applied += 1;
    }
    applied
}
