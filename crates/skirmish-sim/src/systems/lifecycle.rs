//! Lifecycle system: age-based deaths.

use hecs::World;

use skirmish_core::components::Lifecycle;

/// Mark entities that outlived their `max_age`. Returns how many died.
pub fn run(world: &mut World, tick: u64) -> usize {
    let mut expired = 0;
    for (_entity, lifecycle) in world.query_mut::<&mut Lifecycle>() {
        if lifecycle.tick_death.is_some() || lifecycle.max_age == 0 {
            continue;
        }
        if tick.saturating_sub(lifecycle.tick_birth) > lifecycle.max_age {
            lifecycle.tick_death = Some(tick);
            expired += 1;
        }
    }
    expired
}
