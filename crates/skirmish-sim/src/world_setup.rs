//! Arena construction and entity factories.

use glam::DVec2;
use hecs::Entity;
use log::info;

use skirmish_core::components::*;
use skirmish_core::enums::{BodyKind, OnDeath};
use skirmish_core::map::ArenaMap;
use skirmish_core::types::Segment;

use crate::config::{AgentSpecs, ArenaConfig, ProjectileSpecs};
use crate::error::ArenaError;
use crate::physics::{BodyTag, Ccd, CircleSpawn, PhysicalBody};
use crate::world::{entity_id, WorldModel};

/// Create ground and obstacle entities for every polygon of the map.
///
/// Any invalid polygon aborts construction.
pub fn build_arena(model: &mut WorldModel, map: &ArenaMap) -> Result<(), ArenaError> {
    let mut grounds = 0;
    for ground in &map.grounds {
        for polygon in &ground.polygons {
            spawn_static(model, BodyKind::Ground, &ground.id, &polygon.loop_vertices())?;
            grounds += 1;
        }
    }
    for obstacle in &map.obstacles {
        spawn_static(
            model,
            BodyKind::Obstacle,
            &obstacle.id,
            &obstacle.polygon.loop_vertices(),
        )?;
    }
    info!(
        "arena built: {} ground polygons, {} obstacles, {} starts",
        grounds,
        map.obstacles.len(),
        map.starts.len()
    );
    Ok(())
}

fn spawn_static(
    model: &mut WorldModel,
    kind: BodyKind,
    map_id: &str,
    vertices: &[DVec2],
) -> Result<Entity, ArenaError> {
    let entity = model.entities.spawn((Render {
        kind,
        debug_points: Vec::new(),
    },));
    let handle = match model.physics.create_static_polygon(
        BodyTag::new(kind, entity_id(entity)),
        map_id,
        vertices,
    ) {
        Ok(handle) => handle,
        Err(err) => {
            let _ = model.entities.despawn(entity);
            return Err(err);
        }
    };

    let edges = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| Segment::new(*a, *b))
        .collect();
    let components = (
        PhysicalBody {
            handle,
            kind,
            radius: 0.0,
        },
        StaticGeometry {
            map_id: map_id.to_string(),
            edges,
        },
    );
    if model.entities.insert(entity, components).is_err() {
        model.physics.remove_body(handle);
        return Err(ArenaError::UnknownEntity(entity_id(entity)));
    }
    Ok(entity)
}

/// Spawn an agent with the configured specs, alive from `tick`.
pub fn spawn_agent(
    model: &mut WorldModel,
    config: &ArenaConfig,
    tick: u64,
    name: &str,
    position: DVec2,
    orientation: f64,
) -> Result<Entity, ArenaError> {
    let specs: &AgentSpecs = &config.agent;
    let entity = model.entities.spawn((
        Agent,
        Player {
            name: name.to_string(),
            stats: PlayerStats::default(),
        },
        MovementLimits {
            max_speed: specs.max_speed,
            max_steering_force: specs.max_steering_force,
            max_angular_velocity: specs.max_angular_velocity,
            drag_force: specs.drag_force,
        },
        Health {
            max_life: specs.max_life,
            life: specs.max_life,
        },
        Steering::default(),
        Shooting {
            queue: Default::default(),
            cooldown_ticks: specs.shoot_cooldown_ticks,
            energy: specs.max_shoot_energy,
            max_energy: specs.max_shoot_energy,
            energy_cost: specs.shoot_energy_cost,
            energy_replenish: specs.shoot_energy_replenish,
            last_shot: None,
        },
        Lifecycle {
            tick_birth: tick,
            tick_death: None,
            max_age: 0,
            locked: false,
            on_death: OnDeath::Respawn,
        },
        Respawn {
            delay_ticks: config.respawn_delay_ticks,
            respawn_at: None,
        },
        Perception {
            vision_angle: specs.vision_angle,
            vision_radius: specs.vision_radius,
            last: None,
        },
        Render {
            kind: BodyKind::Agent,
            debug_points: Vec::new(),
        },
    ));

    let spawn = CircleSpawn {
        position,
        velocity: DVec2::ZERO,
        radius: specs.radius,
        orientation,
        owner: None,
        ccd: Ccd::Off,
    };
    attach_circle(model, entity, BodyKind::Agent, &spawn)?;
    info!("agent {name} spawned as {} at {position}", entity_id(entity));
    Ok(entity)
}

/// Spawn a projectile fired by `owner`. Velocity in meters per tick.
pub fn spawn_projectile(
    model: &mut WorldModel,
    specs: &ProjectileSpecs,
    tick: u64,
    owner: Entity,
    position: DVec2,
    velocity: DVec2,
) -> Result<Entity, ArenaError> {
    let owner_id = entity_id(owner);
    if !model.entities.contains(owner) {
        return Err(ArenaError::UnknownEntity(owner_id));
    }
    let entity = model.entities.spawn((
        Projectile,
        Owned { owner: owner_id },
        Impactor {
            damage: specs.damage,
        },
        Lifecycle {
            tick_birth: tick,
            tick_death: None,
            max_age: specs.max_age,
            locked: false,
            on_death: OnDeath::Dispose,
        },
        Render {
            kind: BodyKind::Projectile,
            debug_points: Vec::new(),
        },
    ));

    let spawn = CircleSpawn {
        position,
        velocity,
        radius: specs.radius,
        orientation: skirmish_geometry::angle::heading(velocity),
        owner: Some(owner_id),
        // Full sweeps start once the shot has left its owner.
        ccd: Ccd::Soft,
    };
    attach_circle(model, entity, BodyKind::Projectile, &spawn)?;
    Ok(entity)
}

/// Create the body for a freshly spawned entity, or despawn it on failure.
fn attach_circle(
    model: &mut WorldModel,
    entity: Entity,
    kind: BodyKind,
    spawn: &CircleSpawn,
) -> Result<(), ArenaError> {
    let handle = match model
        .physics
        .create_dynamic_circle(BodyTag::new(kind, entity_id(entity)), spawn)
    {
        Ok(handle) => handle,
        Err(err) => {
            let _ = model.entities.despawn(entity);
            return Err(err);
        }
    };
    let body = PhysicalBody {
        handle,
        kind,
        radius: spawn.radius,
    };
    if model.entities.insert_one(entity, body).is_err() {
        model.physics.remove_body(handle);
        return Err(ArenaError::UnknownEntity(entity_id(entity)));
    }
    Ok(())
}
