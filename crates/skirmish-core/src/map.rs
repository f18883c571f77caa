//! Arena map as delivered by the map builder.
//!
//! Polygons are ordered point lists; a trailing point equal to the first one
//! is accepted and ignored since every polygon is treated as a closed loop.

use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaMap {
    #[serde(default)]
    pub grounds: Vec<MapGround>,
    #[serde(default)]
    pub obstacles: Vec<MapObstacle>,
    #[serde(default)]
    pub starts: Vec<MapStart>,
}

/// Walkable area. Its outline edges stop agents but let projectiles through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGround {
    pub id: String,
    pub polygons: Vec<MapPolygon>,
}

/// Solid obstacle. Blocks agents, projectiles and sight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapObstacle {
    pub id: String,
    pub polygon: MapPolygon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapStart {
    pub id: String,
    pub point: [f64; 2],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapPolygon {
    pub points: Vec<[f64; 2]>,
}

impl ArenaMap {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn start_points(&self) -> Vec<DVec2> {
        self.starts
            .iter()
            .map(|s| DVec2::new(s.point[0], s.point[1]))
            .collect()
    }
}

impl MapPolygon {
    pub fn new(points: impl IntoIterator<Item = DVec2>) -> Self {
        Self {
            points: points.into_iter().map(|p| [p.x, p.y]).collect(),
        }
    }

    /// Axis-aligned rectangle, counter-clockwise from `min`.
    pub fn rect(min: DVec2, max: DVec2) -> Self {
        Self::new([
            min,
            DVec2::new(max.x, min.y),
            max,
            DVec2::new(min.x, max.y),
        ])
    }

    /// Vertices of the loop, without the redundant closing point.
    pub fn loop_vertices(&self) -> Vec<DVec2> {
        let mut vertices: Vec<DVec2> = self
            .points
            .iter()
            .map(|p| DVec2::new(p[0], p[1]))
            .collect();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        vertices
    }
}
