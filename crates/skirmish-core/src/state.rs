//! Per-tick exports: agent perception payloads and spectator frames.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{BodyKind, VisionTag};
use crate::types::EntityId;

/// Everything an agent learns about the world in one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerception {
    pub specs: AgentSpecsView,
    pub internal: InternalPerception,
    pub external: ExternalPerception,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSpecsView {
    pub max_speed: f64,
    pub max_steering_force: f64,
    pub max_angular_velocity: f64,
    pub vision_radius: f64,
    pub vision_angle: f64,
    pub drag_force: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalPerception {
    /// Own velocity in the heading-relative frame, meters per tick.
    pub velocity: DVec2,
    /// Own radius.
    pub proprioception: f64,
    /// Own absolute orientation in radians.
    pub magnetoreception: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalPerception {
    pub vision: Vec<VisionItem>,
}

/// One visible thing. Every vector is relative to the viewer and rotated into
/// its heading frame (x axis points forward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionItem {
    pub tag: VisionTag,
    pub near_edge: DVec2,
    pub center: DVec2,
    pub far_edge: DVec2,
    pub velocity: DVec2,
}

/// Spectator frame emitted once per tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VizFrame {
    pub game_id: String,
    pub tick: u64,
    pub objects: Vec<VizObject>,
    pub debug_points: Vec<DVec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizObject {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: BodyKind,
    pub position: DVec2,
    /// Meters per tick.
    pub velocity: DVec2,
    pub radius: f64,
    pub orientation: f64,
}
