//! Collision drain: resolves raw contacts to live entities.

use hecs::Entity;

use skirmish_core::enums::BodyKind;

use crate::world::WorldModel;

/// A contact between two live entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub a: Entity,
    pub a_kind: BodyKind,
    pub b: Entity,
    pub b_kind: BodyKind,
}

impl Collision {
    /// Both orderings of the pair, for rules that care about one side.
    pub fn sides(&self) -> [(Entity, BodyKind, Entity, BodyKind); 2] {
        [
            (self.a, self.a_kind, self.b, self.b_kind),
            (self.b, self.b_kind, self.a, self.a_kind),
        ]
    }
}

/// Drain the contacts of the last step. Only valid after stepping.
pub fn run(model: &mut WorldModel) -> Vec<Collision> {
    model
        .physics
        .pop_contacts()
        .into_iter()
        .filter_map(|contact| {
            Some(Collision {
                a: model.resolve(contact.a.entity)?,
                a_kind: contact.a.kind,
                b: model.resolve(contact.b.entity)?,
                b_kind: contact.b.kind,
            })
        })
        .collect()
}
