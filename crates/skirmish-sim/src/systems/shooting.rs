//! Shooting system: gates aiming intents and fires projectiles.

use glam::DVec2;
use log::{debug, warn};

use skirmish_core::components::Shooting;
use skirmish_geometry::local_to_absolute;

use crate::config::ProjectileSpecs;
use crate::physics::PhysicalBody;
use crate::world::WorldModel;
use crate::world_setup;

/// Why a shot was not fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotRejection {
    Cooldown,
    Energy,
}

/// Check and consume one shot. Energy and `last_shot` only change on success.
pub fn try_fire(shooting: &mut Shooting, tick: u64) -> Result<(), ShotRejection> {
    if let Some(last) = shooting.last_shot {
        if tick.saturating_sub(last) < shooting.cooldown_ticks {
            return Err(ShotRejection::Cooldown);
        }
    }
    if shooting.energy < shooting.energy_cost {
        return Err(ShotRejection::Energy);
    }
    shooting.last_shot = Some(tick);
    shooting.energy -= shooting.energy_cost;
    Ok(())
}

/// Replenish energy, pop one intent per shooter and spawn accepted projectiles
/// at the shooter's current position. Returns the number fired.
pub fn run(model: &mut WorldModel, specs: &ProjectileSpecs, tick: u64) -> usize {
    let mut shots = Vec::new();
    for (entity, (shooting, body)) in model
        .entities
        .query_mut::<(&mut Shooting, &PhysicalBody)>()
    {
        shooting.energy = (shooting.energy + shooting.energy_replenish).min(shooting.max_energy);
        let Some(aim) = shooting.queue.pop_front() else {
            continue;
        };
        match try_fire(shooting, tick) {
            Ok(()) => shots.push((entity, body.handle, aim)),
            Err(reason) => debug!("tick {tick}: shot rejected ({reason:?})"),
        }
    }

    let mut fired = 0;
    for (shooter, handle, aim) in shots {
        let Some(state) = model.physics.body_state(handle) else {
            continue;
        };
        let direction = aim.try_normalize().unwrap_or(DVec2::X);
        let velocity = local_to_absolute(state.orientation, direction, None) * specs.speed;
        match world_setup::spawn_projectile(model, specs, tick, shooter, state.position, velocity) {
            Ok(_) => fired += 1,
            Err(err) => warn!("tick {tick}: projectile spawn skipped: {err}"),
        }
    }
    fired
}
