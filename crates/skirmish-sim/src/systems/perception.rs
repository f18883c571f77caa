//! Perception system: computes every agent's field-of-view payload.
//!
//! The world is first flattened into a read-only snapshot, then each viewer is
//! processed in parallel with rayon. Results are written back to each viewer's
//! own `Perception` slot after the join.

use std::collections::HashMap;

use glam::DVec2;
use hecs::{Entity, World};
use rayon::prelude::*;

use skirmish_core::components::{MovementLimits, Owned, Perception, Render, StaticGeometry};
use skirmish_core::constants::GEOMETRY_EPSILON;
use skirmish_core::enums::{BodyKind, VisionTag};
use skirmish_core::state::{
    AgentPerception, AgentSpecsView, ExternalPerception, InternalPerception, VisionItem,
};
use skirmish_core::types::{EntityId, Segment};
use skirmish_geometry::{to_heading_frame, VisionCone};

use crate::physics::{BodyState, PhysicalBody, SpatialQuery};
use crate::world::{entity_id, WorldModel};

/// World-space edges of every static body, keyed by entity.
///
/// Map geometry never moves, so this is collected once per arena.
#[derive(Debug, Clone, Default)]
pub struct StaticEdges {
    edges: HashMap<EntityId, Vec<Segment>>,
}

impl StaticEdges {
    pub fn collect(world: &World) -> Self {
        let edges = world
            .query::<&StaticGeometry>()
            .iter()
            .map(|(entity, geometry)| (entity_id(entity), geometry.edges.clone()))
            .collect();
        Self { edges }
    }

    pub fn get(&self, id: EntityId) -> Option<&[Segment]> {
        self.edges.get(&id).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, Copy)]
struct Viewer {
    entity: Entity,
    id: EntityId,
    state: BodyState,
    radius: f64,
    specs: AgentSpecsView,
}

#[derive(Debug, Clone, Copy)]
struct DynamicBody {
    kind: BodyKind,
    state: BodyState,
    radius: f64,
    owner: Option<EntityId>,
}

struct ViewerOutput {
    entity: Entity,
    perception: AgentPerception,
    debug_points: Vec<DVec2>,
}

/// Recompute the perception of every entity holding a `Perception` component.
/// Returns how many were computed.
pub fn run(model: &mut WorldModel, statics: &StaticEdges, debug_vision: bool) -> usize {
    let viewers = collect_viewers(model);
    let dynamics = collect_dynamics(model);

    let query = model.physics.spatial_query();
    let outputs: Vec<ViewerOutput> = viewers
        .par_iter()
        .map(|viewer| perceive(viewer, &query, &dynamics, statics, debug_vision))
        .collect();

    for (_entity, render) in model.entities.query_mut::<&mut Render>() {
        render.debug_points.clear();
    }
    let computed = outputs.len();
    for output in outputs {
        if let Ok(mut perception) = model.entities.get::<&mut Perception>(output.entity) {
            perception.last = Some(output.perception);
        }
        if let Ok(mut render) = model.entities.get::<&mut Render>(output.entity) {
            render.debug_points = output.debug_points;
        }
    }
    computed
}

fn collect_viewers(model: &WorldModel) -> Vec<Viewer> {
    let mut viewers: Vec<Viewer> = model
        .entities
        .query::<(&Perception, &PhysicalBody, Option<&MovementLimits>)>()
        .iter()
        .filter_map(|(entity, (perception, body, limits))| {
            let state = model.physics.body_state(body.handle)?;
            let limits = limits.copied().unwrap_or(MovementLimits {
                max_speed: 0.0,
                max_steering_force: 0.0,
                max_angular_velocity: 0.0,
                drag_force: 0.0,
            });
            Some(Viewer {
                entity,
                id: entity_id(entity),
                state,
                radius: body.radius,
                specs: AgentSpecsView {
                    max_speed: limits.max_speed,
                    max_steering_force: limits.max_steering_force,
                    max_angular_velocity: limits.max_angular_velocity,
                    vision_radius: perception.vision_radius,
                    vision_angle: perception.vision_angle,
                    drag_force: limits.drag_force,
                },
            })
        })
        .collect();
    viewers.sort_by_key(|viewer| viewer.id);
    viewers
}

fn collect_dynamics(model: &WorldModel) -> HashMap<EntityId, DynamicBody> {
    model
        .entities
        .query::<(&PhysicalBody, Option<&Owned>)>()
        .iter()
        .filter(|(_, (body, _))| body.kind.is_circular())
        .filter_map(|(entity, (body, owned))| {
            let state = model.physics.body_state(body.handle)?;
            Some((
                entity_id(entity),
                DynamicBody {
                    kind: body.kind,
                    state,
                    radius: body.radius,
                    owner: owned.map(|owned| owned.owner),
                },
            ))
        })
        .collect()
}

fn perceive(
    viewer: &Viewer,
    query: &SpatialQuery<'_>,
    dynamics: &HashMap<EntityId, DynamicBody>,
    statics: &StaticEdges,
    debug_vision: bool,
) -> ViewerOutput {
    let orientation = viewer.state.orientation;
    let cone = VisionCone::new(
        viewer.state.position,
        orientation,
        viewer.specs.vision_angle,
        viewer.specs.vision_radius,
    );

    let mut vision = Vec::new();
    let mut debug_points = Vec::new();
    for tag in query.query_aabb(&cone.aabb()) {
        if tag.entity == viewer.id {
            continue;
        }
        if tag.kind.is_circular() {
            let Some(body) = dynamics.get(&tag.entity) else {
                continue;
            };
            if body.owner == Some(viewer.id) {
                continue;
            }
            if let Some(item) = see_circle(&cone, body, query) {
                vision.push(item);
            }
        } else {
            let Some(edges) = statics.get(tag.entity) else {
                continue;
            };
            for edge in edges {
                let Some(chord) = cone.visible_chord(edge) else {
                    continue;
                };
                vision.push(chord_item(&cone, &chord));
                if debug_vision {
                    debug_points.extend([chord.a, chord.b]);
                }
            }
        }
    }

    ViewerOutput {
        entity: viewer.entity,
        perception: AgentPerception {
            specs: viewer.specs,
            internal: InternalPerception {
                velocity: to_heading_frame(viewer.state.velocity, orientation),
                proprioception: viewer.radius,
                magnetoreception: orientation,
            },
            external: ExternalPerception { vision },
        },
        debug_points,
    }
}

/// Vision item for an agent or projectile, if it is in range, inside the
/// aperture and, for agents, not hidden behind an obstacle.
fn see_circle(cone: &VisionCone, body: &DynamicBody, query: &SpatialQuery<'_>) -> Option<VisionItem> {
    let center = body.state.position - cone.origin;
    let dist_sq = center.length_squared();
    if dist_sq < GEOMETRY_EPSILON || dist_sq > cone.radius * cone.radius {
        return None;
    }

    // Diameter orthogonal to the line of sight; the near edge is on the left.
    let half = center.perp() / dist_sq.sqrt() * body.radius;
    let near_edge = center + half;
    let far_edge = center - half;
    if ![center, near_edge, far_edge]
        .into_iter()
        .any(|p| cone.contains_direction(p))
    {
        return None;
    }

    if body.kind == BodyKind::Agent && query.obstacle_between(cone.origin, body.state.position) {
        return None;
    }

    let orientation = cone.orientation;
    Some(VisionItem {
        tag: VisionTag::from(body.kind),
        near_edge: to_heading_frame(near_edge, orientation),
        center: to_heading_frame(center, orientation),
        far_edge: to_heading_frame(far_edge, orientation),
        velocity: to_heading_frame(body.state.velocity, orientation),
    })
}

/// Vision item for the visible chord of a static edge.
fn chord_item(cone: &VisionCone, chord: &Segment) -> VisionItem {
    let rel = chord.relative_to(cone.origin);
    let (near, far) = if rel.a.length_squared() <= rel.b.length_squared() {
        (rel.a, rel.b)
    } else {
        (rel.b, rel.a)
    };
    let orientation = cone.orientation;
    VisionItem {
        tag: VisionTag::Obstacle,
        near_edge: to_heading_frame(near, orientation),
        center: to_heading_frame(rel.midpoint(), orientation),
        far_edge: to_heading_frame(far, orientation),
        velocity: DVec2::ZERO,
    }
}
