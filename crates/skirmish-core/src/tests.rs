#[cfg(test)]
mod tests {
    use glam::DVec2;

    use crate::commands::{AgentMutation, AgentMutationBatch, METHOD_SHOOT};
    use crate::enums::*;
    use crate::map::{ArenaMap, MapPolygon};
    use crate::state::{AgentPerception, VisionItem, VizFrame, VizObject};
    use crate::types::{EntityId, Segment};

    #[test]
    fn test_body_kind_code_roundtrip() {
        for kind in [
            BodyKind::Agent,
            BodyKind::Projectile,
            BodyKind::Obstacle,
            BodyKind::Ground,
        ] {
            assert_eq!(BodyKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(BodyKind::from_code(0), None);
        assert_eq!(BodyKind::from_code(9), None);
    }

    #[test]
    fn test_vision_tag_from_body_kind() {
        assert_eq!(VisionTag::from(BodyKind::Agent), VisionTag::Agent);
        assert_eq!(VisionTag::from(BodyKind::Projectile), VisionTag::Projectile);
        assert_eq!(VisionTag::from(BodyKind::Obstacle), VisionTag::Obstacle);
        assert_eq!(VisionTag::from(BodyKind::Ground), VisionTag::Obstacle);
    }

    #[test]
    fn test_vision_tag_serializes_lowercase() {
        let json = serde_json::to_string(&VisionTag::Projectile).unwrap();
        assert_eq!(json, "\"projectile\"");
    }

    #[test]
    fn test_batch_decodes_from_wire_json() {
        let json = r#"{
            "agentEntityId": 7,
            "agentProxyId": "proxy-a",
            "mutations": [
                {"method": "steer", "arguments": [1.0, 0.5]},
                {"method": "shoot", "args": [0.0, 1.0]}
            ]
        }"#;
        let batch: AgentMutationBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.agent_entity_id, EntityId(7));
        assert_eq!(batch.agent_proxy_id, "proxy-a");
        assert_eq!(batch.mutations.len(), 2);
        assert_eq!(batch.mutations[0], AgentMutation::steer(1.0, 0.5));
        assert_eq!(batch.mutations[1].method, METHOD_SHOOT);
    }

    #[test]
    fn test_perception_json_keys() {
        let mut perception = AgentPerception::default();
        perception.specs.max_speed = 0.75;
        perception.internal.proprioception = 0.5;
        perception.external.vision.push(VisionItem {
            tag: VisionTag::Agent,
            near_edge: DVec2::new(1.0, 0.5),
            center: DVec2::new(1.0, 0.0),
            far_edge: DVec2::new(1.0, -0.5),
            velocity: DVec2::ZERO,
        });

        let value = serde_json::to_value(&perception).unwrap();
        assert_eq!(value["specs"]["maxSpeed"], 0.75);
        assert_eq!(value["internal"]["proprioception"], 0.5);
        let item = &value["external"]["vision"][0];
        assert_eq!(item["tag"], "agent");
        assert_eq!(item["nearEdge"][0], 1.0);
        assert_eq!(item["farEdge"][1], -0.5);
    }

    #[test]
    fn test_viz_frame_json_keys() {
        let frame = VizFrame {
            game_id: "g1".into(),
            tick: 3,
            objects: vec![VizObject {
                id: EntityId(1),
                kind: BodyKind::Projectile,
                position: DVec2::new(2.0, 3.0),
                velocity: DVec2::new(5.0, 0.0),
                radius: 0.3,
                orientation: 0.0,
            }],
            debug_points: vec![DVec2::ONE],
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["gameId"], "g1");
        assert_eq!(value["objects"][0]["type"], "projectile");
        assert_eq!(value["objects"][0]["id"], 1);
        assert_eq!(value["debugPoints"][0][1], 1.0);
    }

    #[test]
    fn test_map_drops_closing_vertex() {
        let json = r#"{
            "grounds": [{"id": "g", "polygons": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}],
            "obstacles": [{"id": "o", "polygon": [[4,4],[6,4],[6,6]]}],
            "starts": [{"id": "s", "point": [1.0, 2.0]}]
        }"#;
        let map = ArenaMap::from_json(json).unwrap();
        assert_eq!(map.grounds[0].polygons[0].loop_vertices().len(), 4);
        assert_eq!(map.obstacles[0].polygon.loop_vertices().len(), 3);
        assert_eq!(map.start_points(), vec![DVec2::new(1.0, 2.0)]);
    }

    #[test]
    fn test_map_sections_default_to_empty() {
        let map = ArenaMap::from_json("{}").unwrap();
        assert!(map.grounds.is_empty());
        assert!(map.obstacles.is_empty());
        assert!(map.starts.is_empty());
    }

    #[test]
    fn test_rect_polygon() {
        let rect = MapPolygon::rect(DVec2::ZERO, DVec2::new(2.0, 1.0));
        let v = rect.loop_vertices();
        assert_eq!(v.len(), 4);
        assert_eq!(v[2], DVec2::new(2.0, 1.0));
    }

    #[test]
    fn test_segment_helpers() {
        let s = Segment::new(DVec2::new(1.0, 1.0), DVec2::new(3.0, 1.0));
        assert_eq!(s.midpoint(), DVec2::new(2.0, 1.0));
        let rel = s.relative_to(DVec2::new(1.0, 1.0));
        assert_eq!(rel.a, DVec2::ZERO);
        assert_eq!(rel.b, DVec2::new(2.0, 0.0));
    }
}
