//! rapier2d adapter.
//!
//! [`PhysicsWorld`] owns the rigid-body simulation. Every body carries a
//! [`BodyTag`] (kind + entity) as user data; every dynamic collider carries the
//! raw id of its owner, if any, so the contact filter can run without touching
//! the ECS.
//!
//! Simulation systems speak meters per tick. The engine speaks meters per
//! second. The conversion happens here and nowhere else.

use std::num::NonZeroUsize;

use glam::DVec2;
use rapier2d_f64::parry::bounding_volume::Aabb as EngineAabb;
use rapier2d_f64::prelude::*;

use skirmish_core::constants::{BODY_DENSITY, GEOMETRY_EPSILON};
use skirmish_core::enums::BodyKind;
use skirmish_core::types::EntityId;
use skirmish_geometry::Aabb;

use crate::collision::{interaction_groups, Contact, ContactFilter};
use crate::error::ArenaError;

/// Identity of a rigid body, packed into engine user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyTag {
    pub kind: BodyKind,
    pub entity: EntityId,
}

impl BodyTag {
    pub fn new(kind: BodyKind, entity: EntityId) -> Self {
        Self { kind, entity }
    }

    pub fn to_user_data(self) -> u128 {
        (u128::from(self.kind.code()) << 64) | u128::from(self.entity.raw())
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        let kind = BodyKind::from_code((data >> 64) as u8)?;
        Some(Self {
            kind,
            entity: EntityId(data as u64),
        })
    }
}

/// ECS component owning exactly one rigid body.
#[derive(Debug, Clone, Copy)]
pub struct PhysicalBody {
    pub handle: RigidBodyHandle,
    pub kind: BodyKind,
    /// Zero for polygonal bodies.
    pub radius: f64,
}

/// Kinematic state of a body, velocity in meters per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: DVec2,
    pub velocity: DVec2,
    pub orientation: f64,
}

/// Parameters for a new circular body.
#[derive(Debug, Clone, Copy)]
pub struct CircleSpawn {
    pub position: DVec2,
    /// Meters per tick.
    pub velocity: DVec2,
    pub radius: f64,
    pub orientation: f64,
    pub owner: Option<EntityId>,
    /// Swept collision detection, for fast movers.
    pub ccd: Ccd,
}

/// How a dynamic body is protected against tunneling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ccd {
    Off,
    /// Predictive contacts over one tick of motion. They go through the
    /// contact hooks, so owner rules hold while the body overlaps its owner.
    Soft,
    /// Full time-of-impact sweeps. Only collision groups filter them.
    Full,
}

pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    ticks_per_second: f64,
    contacts: Vec<Contact>,
}

impl PhysicsWorld {
    /// A top-down world: no gravity.
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![0.0, 0.0],
            integration_params: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            ticks_per_second: f64::from(ticks_per_second.max(1)),
            contacts: Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    /// Create a fixed body whose boundary is the closed loop through `vertices`.
    pub fn create_static_polygon(
        &mut self,
        tag: BodyTag,
        id: &str,
        vertices: &[DVec2],
    ) -> Result<RigidBodyHandle, ArenaError> {
        validate_polygon(id, vertices)?;

        let points: Vec<Point<Real>> = vertices
            .iter()
            .map(|v| point![v.x, v.y])
            .collect();
        let n = points.len() as u32;
        let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();

        let body = RigidBodyBuilder::fixed()
            .user_data(tag.to_user_data())
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::polyline(points, Some(indices))
            .collision_groups(interaction_groups(tag.kind))
            .friction(0.0)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        Ok(handle)
    }

    /// Create a rotation-locked dynamic ball.
    pub fn create_dynamic_circle(
        &mut self,
        tag: BodyTag,
        spawn: &CircleSpawn,
    ) -> Result<RigidBodyHandle, ArenaError> {
        if !spawn.position.is_finite() || !spawn.velocity.is_finite() {
            return Err(ArenaError::InvalidBody {
                reason: format!(
                    "non-finite position {} or velocity {}",
                    spawn.position, spawn.velocity
                ),
            });
        }
        if !spawn.radius.is_finite() || spawn.radius <= 0.0 {
            return Err(ArenaError::InvalidBody {
                reason: format!("radius must be positive, got {}", spawn.radius),
            });
        }

        let velocity = spawn.velocity * self.ticks_per_second;
        let soft_prediction = match spawn.ccd {
            Ccd::Soft => spawn.velocity.length(),
            Ccd::Off | Ccd::Full => 0.0,
        };
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![spawn.position.x, spawn.position.y])
            .linvel(vector![velocity.x, velocity.y])
            .rotation(spawn.orientation)
            .lock_rotations()
            .ccd_enabled(spawn.ccd == Ccd::Full)
            .soft_ccd_prediction(soft_prediction)
            .user_data(tag.to_user_data())
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::ball(spawn.radius)
            .collision_groups(interaction_groups(tag.kind))
            .density(BODY_DENSITY)
            .friction(0.0)
            .restitution(0.0)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(ActiveHooks::FILTER_CONTACT_PAIRS)
            .user_data(u128::from(spawn.owner.map_or(0, EntityId::raw)))
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        Ok(handle)
    }

    /// Remove a body and its colliders. Returns false if it was already gone.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    pub fn body_state(&self, handle: RigidBodyHandle) -> Option<BodyState> {
        let rb = self.rigid_body_set.get(handle)?;
        let t = rb.translation();
        let v = rb.linvel();
        Some(BodyState {
            position: DVec2::new(t.x, t.y),
            velocity: DVec2::new(v.x, v.y) / self.ticks_per_second,
            orientation: rb.rotation().angle(),
        })
    }

    /// Set the velocity of a body, in meters per tick.
    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: DVec2) {
        let v = velocity * self.ticks_per_second;
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_linvel(vector![v.x, v.y], true);
        }
    }

    pub fn set_position(&mut self, handle: RigidBodyHandle, position: DVec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_translation(vector![position.x, position.y], true);
        }
    }

    pub fn set_orientation(&mut self, handle: RigidBodyHandle, orientation: f64) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_rotation(Rotation::new(orientation), true);
        }
    }

    pub fn has_full_ccd(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .is_some_and(|rb| rb.is_ccd_enabled())
    }

    /// Switch a body from soft to full swept collision detection.
    pub fn enable_full_ccd(&mut self, handle: RigidBodyHandle) {
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_soft_ccd_prediction(0.0);
            rb.enable_ccd(true);
        }
    }

    /// Bring collider poses and the spatial index up to date with bodies that
    /// were moved since the last step.
    pub fn sync_query_index(&mut self) {
        self.rigid_body_set
            .propagate_modified_body_positions_to_colliders(&mut self.collider_set);
        self.query_pipeline.update(&self.collider_set);
    }

    /// Advance the world by `dt` seconds and collect the contacts that started.
    pub fn step(&mut self, dt: f64, velocity_iterations: usize, position_iterations: usize) {
        self.integration_params.dt = dt;
        self.integration_params.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        self.integration_params.num_internal_pgs_iterations = position_iterations.max(1);

        let (collision_send, collision_recv) =
            rapier2d_f64::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d_f64::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &ContactFilter,
            &event_handler,
        );

        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                let query = self.spatial_query();
                if let (Some(a), Some(b)) = (query.collider_tag(h1), query.collider_tag(h2)) {
                    self.contacts.push(Contact::new(a, b));
                }
            }
        }
    }

    /// Take the contacts collected since the last call, in a stable order.
    pub fn pop_contacts(&mut self) -> Vec<Contact> {
        let mut contacts = std::mem::take(&mut self.contacts);
        contacts.sort_by_key(Contact::sort_key);
        contacts.dedup();
        contacts
    }

    /// Read-only view for spatial queries, shareable across threads.
    pub fn spatial_query(&self) -> SpatialQuery<'_> {
        SpatialQuery {
            query_pipeline: &self.query_pipeline,
            bodies: &self.rigid_body_set,
            colliders: &self.collider_set,
        }
    }
}

/// Spatial index and ray casts over the last stepped state.
///
/// The index is refreshed by [`PhysicsWorld::step`] and
/// [`PhysicsWorld::sync_query_index`].
#[derive(Clone, Copy)]
pub struct SpatialQuery<'a> {
    query_pipeline: &'a QueryPipeline,
    bodies: &'a RigidBodySet,
    colliders: &'a ColliderSet,
}

impl<'a> SpatialQuery<'a> {
    /// Tags of every body with a collider overlapping `aabb`, ordered by entity.
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<BodyTag> {
        let engine_aabb = EngineAabb::new(
            point![aabb.min.x, aabb.min.y],
            point![aabb.max.x, aabb.max.y],
        );
        let mut tags = Vec::new();
        self.query_pipeline
            .colliders_with_aabb_intersecting_aabb(&engine_aabb, |handle| {
                if let Some(tag) = self.collider_tag(*handle) {
                    tags.push(tag);
                }
                true
            });
        tags.sort_by_key(|tag| tag.entity);
        tags.dedup();
        tags
    }

    /// Whether an obstacle lies on the segment between two points.
    pub fn obstacle_between(&self, from: DVec2, to: DVec2) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance < GEOMETRY_EPSILON {
            return false;
        }
        let dir = delta / distance;
        let ray = Ray::new(
            point![from.x, from.y],
            vector![dir.x, dir.y],
        );
        let only_obstacles = |_handle: ColliderHandle, collider: &Collider| {
            self.tag_of(collider)
                .is_some_and(|tag| tag.kind == BodyKind::Obstacle)
        };
        let filter = QueryFilter::new().predicate(&only_obstacles);
        self.query_pipeline
            .cast_ray(
                self.bodies,
                self.colliders,
                &ray,
                distance,
                true,
                filter,
            )
            .is_some()
    }

    pub fn collider_tag(&self, handle: ColliderHandle) -> Option<BodyTag> {
        self.tag_of(self.colliders.get(handle)?)
    }

    fn tag_of(&self, collider: &Collider) -> Option<BodyTag> {
        let parent = self.bodies.get(collider.parent()?)?;
        BodyTag::from_user_data(parent.user_data)
    }
}

fn validate_polygon(id: &str, vertices: &[DVec2]) -> Result<(), ArenaError> {
    let invalid = |reason: String| ArenaError::InvalidPolygon {
        id: id.to_string(),
        reason,
    };
    if vertices.len() < 3 {
        return Err(invalid(format!("{} vertices, need at least 3", vertices.len())));
    }
    if let Some(v) = vertices.iter().find(|v| !v.is_finite()) {
        return Err(invalid(format!("non-finite vertex {v}")));
    }
    for (i, v) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        if v.distance(next) < GEOMETRY_EPSILON {
            return Err(invalid(format!("duplicate vertex {v} at index {i}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(kind: BodyKind, raw: u64) -> BodyTag {
        BodyTag::new(kind, EntityId(raw))
    }

    fn ball_at(position: DVec2, velocity: DVec2) -> CircleSpawn {
        CircleSpawn {
            position,
            velocity,
            radius: 0.5,
            orientation: 0.0,
            owner: None,
            ccd: Ccd::Off,
        }
    }

    #[test]
    fn test_body_tag_user_data_roundtrip() {
        let t = tag(BodyKind::Projectile, u64::MAX - 3);
        assert_eq!(BodyTag::from_user_data(t.to_user_data()), Some(t));
        assert_eq!(BodyTag::from_user_data(42), None);
    }

    #[test]
    fn test_rejects_degenerate_polygons() {
        let mut physics = PhysicsWorld::new(20);
        let two = [DVec2::ZERO, DVec2::X];
        assert!(matches!(
            physics.create_static_polygon(tag(BodyKind::Obstacle, 1), "o", &two),
            Err(ArenaError::InvalidPolygon { .. })
        ));
        let dup = [DVec2::ZERO, DVec2::X, DVec2::X, DVec2::Y];
        assert!(physics
            .create_static_polygon(tag(BodyKind::Obstacle, 1), "o", &dup)
            .is_err());
        let nan = [DVec2::ZERO, DVec2::X, DVec2::new(f64::NAN, 1.0)];
        assert!(physics
            .create_static_polygon(tag(BodyKind::Obstacle, 1), "o", &nan)
            .is_err());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_rejects_invalid_circle() {
        let mut physics = PhysicsWorld::new(20);
        let mut spawn = ball_at(DVec2::ZERO, DVec2::ZERO);
        spawn.radius = 0.0;
        assert!(physics
            .create_dynamic_circle(tag(BodyKind::Agent, 1), &spawn)
            .is_err());
        let spawn = ball_at(DVec2::new(f64::INFINITY, 0.0), DVec2::ZERO);
        assert!(physics
            .create_dynamic_circle(tag(BodyKind::Agent, 1), &spawn)
            .is_err());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_velocity_is_per_tick() {
        let mut physics = PhysicsWorld::new(20);
        let handle = physics
            .create_dynamic_circle(
                tag(BodyKind::Agent, 1),
                &ball_at(DVec2::ZERO, DVec2::new(0.5, 0.0)),
            )
            .unwrap();
        let state = physics.body_state(handle).unwrap();
        assert!((state.velocity.x - 0.5).abs() < 1e-6);

        physics.step(1.0 / 20.0, 8, 3);
        let state = physics.body_state(handle).unwrap();
        assert!((state.position.x - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_remove_body_is_idempotent() {
        let mut physics = PhysicsWorld::new(20);
        let handle = physics
            .create_dynamic_circle(tag(BodyKind::Agent, 1), &ball_at(DVec2::ZERO, DVec2::ZERO))
            .unwrap();
        assert!(physics.remove_body(handle));
        assert!(!physics.remove_body(handle));
        assert_eq!(physics.body_count(), 0);
        assert!(physics.body_state(handle).is_none());
    }

    #[test]
    fn test_sync_query_index_after_teleport() {
        let mut physics = PhysicsWorld::new(20);
        let handle = physics
            .create_dynamic_circle(tag(BodyKind::Agent, 1), &ball_at(DVec2::ZERO, DVec2::ZERO))
            .unwrap();
        physics.step(1.0 / 20.0, 8, 3);

        physics.set_position(handle, DVec2::new(30.0, 0.0));
        let around_new = Aabb {
            min: DVec2::new(29.0, -1.0),
            max: DVec2::new(31.0, 1.0),
        };
        assert!(physics.spatial_query().query_aabb(&around_new).is_empty());

        physics.sync_query_index();
        let found: Vec<u64> = physics
            .spatial_query()
            .query_aabb(&around_new)
            .iter()
            .map(|t| t.entity.raw())
            .collect();
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn test_full_ccd_crosses_ground_outline() {
        let mut physics = PhysicsWorld::new(20);
        let outline = [
            DVec2::new(-10.0, -10.0),
            DVec2::new(10.0, -10.0),
            DVec2::new(10.0, 10.0),
            DVec2::new(-10.0, 10.0),
        ];
        physics
            .create_static_polygon(tag(BodyKind::Ground, 9), "floor", &outline)
            .unwrap();
        let mut spawn = ball_at(DVec2::new(5.0, 0.0), DVec2::new(5.0, 0.0));
        spawn.radius = 0.3;
        spawn.ccd = Ccd::Full;
        let handle = physics
            .create_dynamic_circle(tag(BodyKind::Projectile, 1), &spawn)
            .unwrap();
        assert!(physics.has_full_ccd(handle));

        for _ in 0..3 {
            physics.step(1.0 / 20.0, 8, 3);
        }
        let state = physics.body_state(handle).unwrap();
        assert!((state.position.x - 20.0).abs() < 1e-6, "stuck at {}", state.position);
        assert!(physics.pop_contacts().is_empty());
    }

    #[test]
    fn test_query_aabb_and_occlusion() {
        let mut physics = PhysicsWorld::new(20);
        let wall = [
            DVec2::new(4.0, -2.0),
            DVec2::new(6.0, -2.0),
            DVec2::new(6.0, 2.0),
            DVec2::new(4.0, 2.0),
        ];
        physics
            .create_static_polygon(tag(BodyKind::Obstacle, 9), "wall", &wall)
            .unwrap();
        physics
            .create_dynamic_circle(tag(BodyKind::Agent, 1), &ball_at(DVec2::ZERO, DVec2::ZERO))
            .unwrap();
        physics
            .create_dynamic_circle(
                tag(BodyKind::Agent, 2),
                &ball_at(DVec2::new(10.0, 0.0), DVec2::ZERO),
            )
            .unwrap();
        physics.step(1.0 / 20.0, 8, 3);

        let query = physics.spatial_query();
        let found = query.query_aabb(&Aabb {
            min: DVec2::new(-1.0, -1.0),
            max: DVec2::new(5.0, 1.0),
        });
        let entities: Vec<u64> = found.iter().map(|t| t.entity.raw()).collect();
        assert_eq!(entities, vec![1, 9]);

        assert!(query.obstacle_between(DVec2::ZERO, DVec2::new(10.0, 0.0)));
        assert!(!query.obstacle_between(DVec2::new(0.0, 5.0), DVec2::new(10.0, 5.0)));
    }
}
