//! Respawn system: brings locked entities back once their delay elapsed.

use glam::DVec2;
use hecs::Entity;
use log::{info, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::components::{Health, Lifecycle, Respawn, Shooting, Steering};

use crate::physics::PhysicalBody;
use crate::world::{entity_id, WorldModel};

/// Resurrect due entities at a random start point. Returns how many came back.
///
/// Entities are visited in id order so the RNG stream does not depend on
/// storage layout.
pub fn run(model: &mut WorldModel, rng: &mut ChaCha8Rng, starts: &[DVec2], tick: u64) -> usize {
    let mut due: Vec<Entity> = model
        .entities
        .query::<(&Respawn, &Lifecycle)>()
        .iter()
        .filter(|(_, (respawn, lifecycle))| {
            lifecycle.locked && respawn.respawn_at.is_some_and(|at| at <= tick)
        })
        .map(|(entity, _)| entity)
        .collect();
    due.sort_by_key(|entity| entity.to_bits());

    for &entity in &due {
        let Ok((respawn, lifecycle, body, health, steering, shooting)) =
            model.entities.query_one_mut::<(
                &mut Respawn,
                &mut Lifecycle,
                &PhysicalBody,
                Option<&mut Health>,
                Option<&mut Steering>,
                Option<&mut Shooting>,
            )>(entity)
        else {
            continue;
        };

        if starts.is_empty() {
            warn!("no start points, {} respawns in place", entity_id(entity));
        } else {
            let start = starts[rng.gen_range(0..starts.len())];
            model.physics.set_position(body.handle, start);
        }
        model.physics.set_velocity(body.handle, DVec2::ZERO);

        respawn.respawn_at = None;
        lifecycle.locked = false;
        lifecycle.tick_death = None;
        lifecycle.tick_birth = tick;
        if let Some(health) = health {
            health.life = health.max_life;
        }
        if let Some(steering) = steering {
            steering.queue.clear();
        }
        if let Some(shooting) = shooting {
            shooting.queue.clear();
            shooting.energy = shooting.max_energy;
        }
        info!("tick {tick}: {} respawned", entity_id(entity));
    }
    due.len()
}
