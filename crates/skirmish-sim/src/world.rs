//! The world model: ECS entities plus the rigid bodies they own.
//!
//! Entities are only destroyed through [`WorldModel::dispose`], which releases
//! the rigid body of a [`PhysicalBody`] before despawning. Systems never
//! despawn directly; they mark entities and let the orchestrator flush.

use hecs::{Entity, World};
use log::debug;

use skirmish_core::types::EntityId;

use crate::physics::{BodyState, PhysicalBody, PhysicsWorld};

pub struct WorldModel {
    pub entities: World,
    pub physics: PhysicsWorld,
    removal_queue: Vec<Entity>,
}

impl WorldModel {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            entities: World::new(),
            physics: PhysicsWorld::new(ticks_per_second),
            removal_queue: Vec::new(),
        }
    }

    /// Resolve an external id to a live entity.
    pub fn resolve(&self, id: EntityId) -> Option<Entity> {
        resolve_entity(&self.entities, id)
    }

    /// Position, velocity and orientation of an entity's body.
    pub fn body_state(&self, entity: Entity) -> Option<BodyState> {
        let handle = self.entities.get::<&PhysicalBody>(entity).ok()?.handle;
        self.physics.body_state(handle)
    }

    /// Destroy an entity and release its rigid body.
    ///
    /// Returns false if the entity was already gone, which makes repeated
    /// disposal harmless.
    pub fn dispose(&mut self, entity: Entity) -> bool {
        let handle = match self.entities.get::<&PhysicalBody>(entity) {
            Ok(body) => Some(body.handle),
            Err(hecs::ComponentError::NoSuchEntity) => return false,
            Err(hecs::ComponentError::MissingComponent(_)) => None,
        };
        if let Some(handle) = handle {
            self.physics.remove_body(handle);
        }
        let despawned = self.entities.despawn(entity).is_ok();
        if despawned {
            debug!("disposed entity {}", entity_id(entity));
        }
        despawned
    }

    /// Dispose every entity in `entities`. Returns how many were live.
    pub fn dispose_all(&mut self, entities: impl IntoIterator<Item = Entity>) -> usize {
        entities
            .into_iter()
            .filter(|&entity| self.dispose(entity))
            .count()
    }

    /// Queue an entity for the end-of-tick deletion pass.
    pub fn mark_for_removal(&mut self, entity: Entity) {
        if !self.removal_queue.contains(&entity) {
            self.removal_queue.push(entity);
        }
    }

    pub fn pending_removals(&self) -> &[Entity] {
        &self.removal_queue
    }

    /// Dispose everything marked for removal.
    pub fn flush_removals(&mut self) -> usize {
        let queue = std::mem::take(&mut self.removal_queue);
        self.dispose_all(queue)
    }
}

/// External id of an entity.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Live entity behind an external id, if any.
pub fn resolve_entity(world: &World, id: EntityId) -> Option<Entity> {
    let entity = Entity::from_bits(id.raw())?;
    world.contains(entity).then_some(entity)
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use skirmish_core::enums::BodyKind;

    use super::*;
    use crate::physics::{BodyTag, Ccd, CircleSpawn};

    fn spawn_ball(model: &mut WorldModel) -> Entity {
        let entity = model.entities.spawn(());
        let handle = model
            .physics
            .create_dynamic_circle(
                BodyTag::new(BodyKind::Agent, entity_id(entity)),
                &CircleSpawn {
                    position: DVec2::ZERO,
                    velocity: DVec2::ZERO,
                    radius: 0.5,
                    orientation: 0.0,
                    owner: None,
                    ccd: Ccd::Off,
                },
            )
            .unwrap();
        model
            .entities
            .insert_one(
                entity,
                PhysicalBody {
                    handle,
                    kind: BodyKind::Agent,
                    radius: 0.5,
                },
            )
            .unwrap();
        entity
    }

    #[test]
    fn test_entity_id_roundtrip() {
        let mut model = WorldModel::new(20);
        let entity = model.entities.spawn(());
        assert_eq!(model.resolve(entity_id(entity)), Some(entity));
        assert_eq!(model.resolve(EntityId(0)), None);
    }

    #[test]
    fn test_dispose_releases_body_once() {
        let mut model = WorldModel::new(20);
        let a = spawn_ball(&mut model);
        let _b = spawn_ball(&mut model);
        assert_eq!(model.physics.body_count(), 2);

        assert!(model.dispose(a));
        assert_eq!(model.physics.body_count(), 1);
        assert!(!model.dispose(a));
        assert_eq!(model.physics.body_count(), 1);
        assert!(model.resolve(entity_id(a)).is_none());
    }

    #[test]
    fn test_flush_deduplicates_marks() {
        let mut model = WorldModel::new(20);
        let a = spawn_ball(&mut model);
        model.mark_for_removal(a);
        model.mark_for_removal(a);
        assert_eq!(model.pending_removals().len(), 1);
        assert_eq!(model.flush_removals(), 1);
        assert_eq!(model.flush_removals(), 0);
        assert_eq!(model.physics.body_count(), 0);
    }

    #[test]
    fn test_dispose_entity_without_body() {
        let mut model = WorldModel::new(20);
        let entity = model.entities.spawn((1u32,));
        assert!(model.dispose(entity));
        assert!(!model.dispose(entity));
    }
}
