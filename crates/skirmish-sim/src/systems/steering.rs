//! Steering system: turns one queued intent per agent into a velocity.

use glam::DVec2;

use skirmish_core::components::{MovementLimits, Steering};
use skirmish_geometry::local_to_absolute;

use crate::physics::PhysicalBody;
use crate::world::WorldModel;

/// Velocity resulting from an agent-relative steering intent.
///
/// The change in speed is limited to `max_steering_force`, the change in
/// heading to `max_angular_velocity`, and the result to `max_speed`. A zero
/// intent means "slow down, keep heading".
pub fn steer(intent: DVec2, velocity: DVec2, orientation: f64, limits: &MovementLimits) -> DVec2 {
    let current = velocity.length();
    let diff = intent.length() - current;
    let mut desired = intent;
    if diff.abs() > limits.max_steering_force {
        let speed = (current + limits.max_steering_force.copysign(diff)).max(0.0);
        desired = intent.try_normalize().unwrap_or(DVec2::X) * speed;
    }
    let absolute = local_to_absolute(orientation, desired, Some(limits.max_angular_velocity));
    absolute.clamp_length_max(limits.max_speed)
}

/// Pop one intent per entity and set its body velocity. Returns how many moved.
pub fn run(model: &mut WorldModel) -> usize {
    let mut steered = 0;
    for (_entity, (steering, body, limits)) in model
        .entities
        .query_mut::<(&mut Steering, &PhysicalBody, &MovementLimits)>()
    {
        let Some(intent) = steering.queue.pop_front() else {
            continue;
        };
        let Some(state) = model.physics.body_state(body.handle) else {
            continue;
        };
        let velocity = steer(intent, state.velocity, state.orientation, limits);
        model.physics.set_velocity(body.handle, velocity);
        steered += 1;
    }
    steered
}
