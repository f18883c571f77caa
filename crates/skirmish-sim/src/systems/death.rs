//! Death processing, split in two passes.
//!
//! Non-respawning entities are disposed at the start of the tick after their
//! death, so the frame of the death tick still shows them. Respawning entities
//! are locked at the end of the tick they died in.

use glam::DVec2;
use hecs::Entity;
use log::info;

use skirmish_core::components::{Lifecycle, Player, Respawn, Shooting, Steering};
use skirmish_core::enums::OnDeath;

use crate::physics::PhysicalBody;
use crate::world::{entity_id, WorldModel};

/// Dispose entities with `OnDeath::Dispose` that died before `tick`.
pub fn dispose_expired(model: &mut WorldModel, tick: u64, buffer: &mut Vec<Entity>) -> usize {
    buffer.clear();
    for (entity, lifecycle) in model.entities.query::<&Lifecycle>().iter() {
        if lifecycle.on_death != OnDeath::Dispose {
            continue;
        }
        if matches!(lifecycle.tick_death, Some(death) if death < tick) {
            buffer.push(entity);
        }
    }
    model.dispose_all(buffer.drain(..))
}

/// Lock newly dead `OnDeath::Respawn` entities and schedule their return.
pub fn run_respawners(model: &mut WorldModel, tick: u64) -> usize {
    let mut downed = Vec::new();
    for (entity, (lifecycle, respawn, body)) in model
        .entities
        .query_mut::<(&mut Lifecycle, &mut Respawn, &PhysicalBody)>()
    {
        if lifecycle.on_death != OnDeath::Respawn || lifecycle.locked {
            continue;
        }
        if lifecycle.tick_death.is_none() {
            continue;
        }
        lifecycle.locked = true;
        respawn.respawn_at = Some(tick + respawn.delay_ticks);
        model.physics.set_velocity(body.handle, DVec2::ZERO);
        info!(
            "tick {tick}: {} down, respawn at tick {}",
            entity_id(entity),
            tick + respawn.delay_ticks
        );
        downed.push(entity);
    }

    for &entity in &downed {
        if let Ok(mut player) = model.entities.get::<&mut Player>(entity) {
            player.stats.deaths += 1;
        }
        if let Ok(mut steering) = model.entities.get::<&mut Steering>(entity) {
            steering.queue.clear();
        }
        if let Ok(mut shooting) = model.entities.get::<&mut Shooting>(entity) {
            shooting.queue.clear();
        }
    }
    downed.len()
}
