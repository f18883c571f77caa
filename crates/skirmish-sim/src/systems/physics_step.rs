//! Physics step system.

use log::debug;

use skirmish_core::components::{MovementLimits, Owned};
use skirmish_core::constants::MIN_ORIENTATION_SPEED;
use skirmish_geometry::angle::heading;

use crate::physics::PhysicalBody;
use crate::world::{resolve_entity, WorldModel};

/// Face every moving body along its velocity, advance the rigid-body world by
/// `dt`, then re-apply speed limits to bodies that have them.
pub fn run(model: &mut WorldModel, dt: f64, velocity_iterations: usize, position_iterations: usize) {
    promote_ccd(model);

    for (_entity, body) in model.entities.query::<&PhysicalBody>().iter() {
        if body.kind.is_static() {
            continue;
        }
        let Some(state) = model.physics.body_state(body.handle) else {
            continue;
        };
        if state.velocity.length() > MIN_ORIENTATION_SPEED {
            model
                .physics
                .set_orientation(body.handle, heading(state.velocity));
        }
    }

    model.physics.step(dt, velocity_iterations, position_iterations);

    let mut clamped = 0;
    for (_entity, (body, limits)) in model
        .entities
        .query::<(&PhysicalBody, &MovementLimits)>()
        .iter()
    {
        let Some(state) = model.physics.body_state(body.handle) else {
            continue;
        };
        if state.velocity.length() > limits.max_speed {
            model
                .physics
                .set_velocity(body.handle, state.velocity.clamp_length_max(limits.max_speed));
            clamped += 1;
        }
    }
    if clamped > 0 {
        debug!("clamped {clamped} bodies to their max speed after step");
    }
}

/// Switch projectiles to full CCD once they no longer overlap their owner.
///
/// Full sweeps ignore the contact hooks, so a projectile still inside the
/// agent that fired it would be clamped against it.
fn promote_ccd(model: &mut WorldModel) {
    let mut cleared = Vec::new();
    for (_entity, (body, owned)) in model.entities.query::<(&PhysicalBody, &Owned)>().iter() {
        if model.physics.has_full_ccd(body.handle) {
            continue;
        }
        let Some(state) = model.physics.body_state(body.handle) else {
            continue;
        };
        let owner = resolve_entity(&model.entities, owned.owner).and_then(|owner| {
            let owner_body = model.entities.get::<&PhysicalBody>(owner).ok()?;
            let owner_state = model.physics.body_state(owner_body.handle)?;
            Some((owner_state.position, owner_body.radius))
        });
        let clear = match owner {
            Some((position, radius)) => state.position.distance(position) > radius + body.radius,
            None => true,
        };
        if clear {
            cleared.push(body.handle);
        }
    }
    for handle in cleared {
        model.physics.enable_full_ccd(handle);
    }
}
