//! Arena engine: the tick orchestrator.
//!
//! `ArenaEngine` owns the world model, the mutation intake and the RNG, runs
//! every system in a fixed order once per tick, and returns the viz frame of
//! the tick. Completely headless and deterministic for a given seed and input.

use std::sync::mpsc::Sender;

use glam::DVec2;
use hecs::{Entity, World};
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use skirmish_core::commands::AgentMutationBatch;
use skirmish_core::components::{Lifecycle, Perception, Player, Shooting, Steering};
use skirmish_core::map::ArenaMap;
use skirmish_core::state::{AgentPerception, VizFrame};
use skirmish_core::types::EntityId;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::intake::{IntakeMessage, MutationIntake};
use crate::systems;
use crate::systems::perception::StaticEdges;
use crate::world::{entity_id, WorldModel};
use crate::world_setup;

pub struct ArenaEngine {
    config: ArenaConfig,
    model: WorldModel,
    intake: MutationIntake,
    rng: ChaCha8Rng,
    starts: Vec<DVec2>,
    statics: StaticEdges,
    tick: u64,
    despawn_buffer: Vec<Entity>,
}

impl ArenaEngine {
    /// Build the arena from map data. Invalid map geometry is fatal.
    pub fn new(config: ArenaConfig, map: &ArenaMap) -> Result<Self, ArenaError> {
        let mut model = WorldModel::new(config.ticks_per_second);
        world_setup::build_arena(&mut model, map)?;
        let statics = StaticEdges::collect(&model.entities);
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            model,
            intake: MutationIntake::new(),
            starts: map.start_points(),
            statics,
            tick: 0,
            despawn_buffer: Vec::new(),
        })
    }

    pub fn from_map_json(config: ArenaConfig, map_json: &str) -> Result<Self, ArenaError> {
        let map = ArenaMap::from_json(map_json)?;
        Self::new(config, &map)
    }

    /// Spawn an agent at a random start point.
    pub fn spawn_agent(&mut self, name: &str) -> Result<EntityId, ArenaError> {
        if self.starts.is_empty() {
            return Err(ArenaError::NoSpawnPoints);
        }
        let start = self.starts[self.rng.gen_range(0..self.starts.len())];
        self.spawn_agent_at(name, start, 0.0)
    }

    pub fn spawn_agent_at(
        &mut self,
        name: &str,
        position: DVec2,
        orientation: f64,
    ) -> Result<EntityId, ArenaError> {
        let entity = world_setup::spawn_agent(
            &mut self.model,
            &self.config,
            self.tick,
            name,
            position,
            orientation,
        )?;
        Ok(entity_id(entity))
    }

    /// Handle for the network side to push batches and disconnections.
    pub fn intake_sender(&self) -> Sender<IntakeMessage> {
        self.intake.sender()
    }

    /// Queue a batch for the next tick.
    pub fn queue_batch(&mut self, batch: AgentMutationBatch) {
        self.intake.push(batch);
    }

    /// Advance the arena by one tick and return its viz frame.
    ///
    /// Never fails: bad input is logged and dropped.
    pub fn step(&mut self, tick: u64, dt: f64, batches: Vec<AgentMutationBatch>) -> VizFrame {
        self.tick = tick;
        let input = self.intake.drain(batches);

        // 1. Dispose non-respawners that died in an earlier tick
        systems::death::dispose_expired(&mut self.model, tick, &mut self.despawn_buffer);
        // 2. Mutations (and disconnections)
        self.handle_disconnects(&input.disconnects, tick);
        systems::mutations::run(&mut self.model.entities, &input.batches);
        // 3. Shooting, then steering
        let fired = systems::shooting::run(&mut self.model, &self.config.projectile, tick);
        systems::steering::run(&mut self.model);
        // 4. Physics step
        systems::physics_step::run(
            &mut self.model,
            dt,
            self.config.velocity_iterations,
            self.config.position_iterations,
        );
        // 5. Collisions
        let collisions = systems::collisions::run(&mut self.model);
        // 6. Health/damage
        let kills = systems::health::run(
            &mut self.model.entities,
            &mut self.model.physics,
            &collisions,
            tick,
        );
        // 7. Lifecycle (age)
        systems::lifecycle::run(&mut self.model.entities, tick);
        // 8. Death of respawners
        systems::death::run_respawners(&mut self.model, tick);
        // 9. Respawn
        let respawned = systems::respawn::run(&mut self.model, &mut self.rng, &self.starts, tick);
        if respawned > 0 {
            self.model.physics.sync_query_index();
        }
        // 10. Perception
        systems::perception::run(&mut self.model, &self.statics, self.config.debug_vision);

        let frame = systems::snapshot::build_frame(&self.model, &self.config.game_id, tick);

        // 11. Deferred deletion
        let removed = self.model.flush_removals();

        debug!(
            "tick {tick}: {} collisions, {fired} shots, {kills} kills, {removed} removed",
            collisions.len()
        );
        frame
    }

    /// Lock disconnected agents, drop their pending intents and queue them for
    /// the end-of-tick deletion.
    fn handle_disconnects(&mut self, disconnects: &[EntityId], tick: u64) {
        for &id in disconnects {
            let Some(entity) = self.model.resolve(id) else {
                warn!("disconnect for unknown entity {id}");
                continue;
            };
            if let Ok(mut lifecycle) = self.model.entities.get::<&mut Lifecycle>(entity) {
                lifecycle.locked = true;
                lifecycle.tick_death.get_or_insert(tick);
            }
            if let Ok(mut steering) = self.model.entities.get::<&mut Steering>(entity) {
                steering.queue.clear();
            }
            if let Ok(mut shooting) = self.model.entities.get::<&mut Shooting>(entity) {
                shooting.queue.clear();
            }
            self.model.mark_for_removal(entity);
        }
    }

    /// Last perception computed for an agent.
    pub fn perception(&self, id: EntityId) -> Option<AgentPerception> {
        let entity = self.model.resolve(id)?;
        let perception = self.model.entities.get::<&Perception>(entity).ok()?;
        perception.last.clone()
    }

    /// Every agent's last perception, in id order.
    pub fn perceptions(&self) -> Vec<(EntityId, AgentPerception)> {
        let mut all: Vec<(EntityId, AgentPerception)> = self
            .model
            .entities
            .query::<&Perception>()
            .iter()
            .filter_map(|(entity, perception)| Some((entity_id(entity), perception.last.clone()?)))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    pub fn player(&self, id: EntityId) -> Option<Player> {
        let entity = self.model.resolve(id)?;
        let player = self.model.entities.get::<&Player>(entity).ok()?;
        Some((*player).clone())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.model.entities
    }

    pub fn model(&self) -> &WorldModel {
        &self.model
    }

    #[cfg(test)]
    pub fn model_mut(&mut self) -> &mut WorldModel {
        &mut self.model
    }

    /// Spawn a projectile directly (for tests).
    #[cfg(test)]
    pub fn spawn_test_projectile(
        &mut self,
        owner: EntityId,
        position: DVec2,
        velocity: DVec2,
    ) -> Result<EntityId, ArenaError> {
        let owner = self
            .model
            .resolve(owner)
            .ok_or(ArenaError::UnknownEntity(owner))?;
        let entity = world_setup::spawn_projectile(
            &mut self.model,
            &self.config.projectile,
            self.tick,
            owner,
            position,
            velocity,
        )?;
        Ok(entity_id(entity))
    }
}
