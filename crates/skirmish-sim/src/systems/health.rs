//! Health/damage system: interprets collisions.

use hecs::{Entity, World};
use log::info;

use skirmish_core::components::{Health, Impactor, Lifecycle, Owned, Player};
use skirmish_core::enums::BodyKind;

use crate::physics::{PhysicalBody, PhysicsWorld};
use crate::systems::collisions::Collision;
use crate::world::{entity_id, resolve_entity};

/// Apply damage for every projectile contact and stop whatever touched.
///
/// A projectile is spent by its first contact: it stops, is marked dead at
/// `tick` and deals no further damage. A target whose life reaches zero is
/// marked dead at `tick`; locked targets take no damage. Returns the number of
/// kills.
pub fn run(world: &mut World, physics: &mut PhysicsWorld, collisions: &[Collision], tick: u64) -> usize {
    let mut kills = 0;
    for collision in collisions {
        for (entity, kind, other, _other_kind) in collision.sides() {
            if kind == BodyKind::Agent {
                stop(world, physics, entity);
            }
            if kind != BodyKind::Projectile {
                continue;
            }
            let spent = world
                .get::<&Lifecycle>(entity)
                .map(|lifecycle| lifecycle.tick_death.is_some())
                .unwrap_or(true);
            if spent {
                continue;
            }
            if let Ok(mut lifecycle) = world.get::<&mut Lifecycle>(entity) {
                lifecycle.tick_death = Some(tick);
            }
            stop(world, physics, entity);

            let damage = world
                .get::<&Impactor>(entity)
                .map(|impactor| impactor.damage)
                .unwrap_or(0.0);
            if damage > 0.0 && apply_damage(world, entity, other, damage, tick) {
                kills += 1;
            }
        }
    }
    kills
}

/// Returns true when this hit killed the target.
fn apply_damage(world: &mut World, projectile: Entity, target: Entity, damage: f64, tick: u64) -> bool {
    let locked = match world.get::<&Lifecycle>(target) {
        Ok(lifecycle) => lifecycle.locked,
        Err(_) => false,
    };
    if locked {
        return false;
    }
    let Ok(mut health) = world.get::<&mut Health>(target) else {
        return false;
    };
    health.life = (health.life - damage).clamp(0.0, health.max_life);
    let depleted = health.life <= 0.0;
    drop(health);

    let mut killed = false;
    if depleted {
        if let Ok(mut lifecycle) = world.get::<&mut Lifecycle>(target) {
            if lifecycle.tick_death.is_none() {
                lifecycle.tick_death = Some(tick);
                killed = true;
            }
        }
    }

    let owner = world
        .get::<&Owned>(projectile)
        .ok()
        .and_then(|owned| resolve_entity(world, owned.owner));
    if let Ok(mut victim) = world.get::<&mut Player>(target) {
        victim.stats.hits_taken += 1;
    }
    if let Some(owner) = owner {
        if let Ok(mut shooter) = world.get::<&mut Player>(owner) {
            shooter.stats.hits_given += 1;
            if killed {
                shooter.stats.frags += 1;
            }
        }
    }
    if killed {
        info!("tick {tick}: {} killed", entity_id(target));
    }
    killed
}

fn stop(world: &World, physics: &mut PhysicsWorld, entity: Entity) {
    if let Ok(body) = world.get::<&PhysicalBody>(entity) {
        physics.set_velocity(body.handle, glam::DVec2::ZERO);
    }
}
