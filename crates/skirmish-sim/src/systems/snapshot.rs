//! Builds the spectator frame from the current world state.

use skirmish_core::components::Render;
use skirmish_core::state::{VizFrame, VizObject};

use crate::physics::PhysicalBody;
use crate::world::{entity_id, WorldModel};

/// One object per dynamic body plus every debug point, both in entity order.
pub fn build_frame(model: &WorldModel, game_id: &str, tick: u64) -> VizFrame {
    let mut rows: Vec<(VizObject, Vec<glam::DVec2>)> = model
        .entities
        .query::<(&PhysicalBody, &Render)>()
        .iter()
        .filter_map(|(entity, (body, render))| {
            let state = model.physics.body_state(body.handle)?;
            Some((
                VizObject {
                    id: entity_id(entity),
                    kind: render.kind,
                    position: state.position,
                    velocity: state.velocity,
                    radius: body.radius,
                    orientation: state.orientation,
                },
                render.debug_points.clone(),
            ))
        })
        .collect();
    rows.sort_by_key(|(object, _)| object.id);

    let mut frame = VizFrame {
        game_id: game_id.to_string(),
        tick,
        ..Default::default()
    };
    for (object, debug_points) in rows {
        frame.debug_points.extend(debug_points);
        if object.kind.is_circular() {
            frame.objects.push(object);
        }
    }
    frame
}
