//! Contact rules.
//!
//! [`should_collide`] decides which body pairs may interact at all. The
//! kind-level part is also baked into collider [`interaction_groups`], which
//! full CCD sweeps honor; the owner rule needs the rapier hook
//! [`ContactFilter`]. Contacts that survive are reported as [`Contact`]s after
//! each step.

use rapier2d_f64::prelude::*;

use skirmish_core::enums::BodyKind;
use skirmish_core::types::EntityId;

use crate::physics::BodyTag;

/// One side of a potential contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionSide {
    pub tag: BodyTag,
    /// Emitter of a projectile.
    pub owner: Option<EntityId>,
}

/// Whether two bodies may touch.
///
/// Projectiles fly over ground outlines, always stop on obstacles and other
/// projectiles, and never hit the agent that fired them. Everything else
/// collides.
pub fn should_collide(a: CollisionSide, b: CollisionSide) -> bool {
    use BodyKind::*;
    match (a.tag.kind, b.tag.kind) {
        (Projectile, Projectile) => true,
        (Projectile, Ground) | (Ground, Projectile) => false,
        (Projectile, Obstacle) | (Obstacle, Projectile) => true,
        (Projectile, Agent) => a.owner != Some(b.tag.entity),
        (Agent, Projectile) => b.owner != Some(a.tag.entity),
        _ => true,
    }
}

fn group(kind: BodyKind) -> Group {
    match kind {
        BodyKind::Agent => Group::GROUP_1,
        BodyKind::Projectile => Group::GROUP_2,
        BodyKind::Obstacle => Group::GROUP_3,
        BodyKind::Ground => Group::GROUP_4,
    }
}

/// Collision groups of a collider: projectiles and ground outlines ignore
/// each other, everything else may interact.
pub fn interaction_groups(kind: BodyKind) -> InteractionGroups {
    let filter = match kind {
        BodyKind::Projectile => Group::ALL.difference(group(BodyKind::Ground)),
        BodyKind::Ground => Group::ALL.difference(group(BodyKind::Projectile)),
        BodyKind::Agent | BodyKind::Obstacle => Group::ALL,
    };
    InteractionGroups::new(group(kind), filter)
}

/// A contact that started during the last physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyTag,
    pub b: BodyTag,
}

impl Contact {
    /// Sides are ordered by entity id.
    pub fn new(a: BodyTag, b: BodyTag) -> Self {
        if a.entity <= b.entity {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    pub fn sort_key(&self) -> (EntityId, EntityId) {
        (self.a.entity, self.b.entity)
    }
}

/// Physics hook applying [`should_collide`] before the solver accepts a pair.
pub struct ContactFilter;

impl ContactFilter {
    fn side(
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        body: Option<RigidBodyHandle>,
        collider: ColliderHandle,
    ) -> Option<CollisionSide> {
        let tag = BodyTag::from_user_data(bodies.get(body?)?.user_data)?;
        let owner = match colliders.get(collider)?.user_data as u64 {
            0 => None,
            raw => Some(EntityId(raw)),
        };
        Some(CollisionSide { tag, owner })
    }
}

impl PhysicsHooks for ContactFilter {
    fn filter_contact_pair(&self, context: &PairFilterContext) -> Option<SolverFlags> {
        let a = Self::side(
            context.bodies,
            context.colliders,
            context.rigid_body1,
            context.collider1,
        );
        let b = Self::side(
            context.bodies,
            context.colliders,
            context.rigid_body2,
            context.collider2,
        );
        match (a, b) {
            (Some(a), Some(b)) if !should_collide(a, b) => None,
            _ => Some(SolverFlags::COMPUTE_IMPULSES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(kind: BodyKind, raw: u64, owner: Option<u64>) -> CollisionSide {
        CollisionSide {
            tag: BodyTag::new(kind, EntityId(raw)),
            owner: owner.map(EntityId),
        }
    }

    #[test]
    fn test_non_projectiles_always_collide() {
        use BodyKind::*;
        for (a, b) in [
            (Agent, Agent),
            (Agent, Obstacle),
            (Agent, Ground),
            (Obstacle, Ground),
        ] {
            assert!(should_collide(side(a, 1, None), side(b, 2, None)));
            assert!(should_collide(side(b, 2, None), side(a, 1, None)));
        }
    }

    #[test]
    fn test_projectile_rules() {
        let shot = side(BodyKind::Projectile, 10, Some(1));
        let other_shot = side(BodyKind::Projectile, 11, Some(2));
        assert!(should_collide(shot, other_shot));
        assert!(!should_collide(shot, side(BodyKind::Ground, 3, None)));
        assert!(!should_collide(side(BodyKind::Ground, 3, None), shot));
        assert!(should_collide(shot, side(BodyKind::Obstacle, 4, None)));
        assert!(should_collide(side(BodyKind::Obstacle, 4, None), shot));
    }

    #[test]
    fn test_groups_agree_with_kind_rules() {
        use BodyKind::*;
        let kinds = [Agent, Projectile, Obstacle, Ground];
        for a in kinds {
            for b in kinds {
                let expected = should_collide(side(a, 1, None), side(b, 2, None));
                assert_eq!(
                    interaction_groups(a).test(interaction_groups(b)),
                    expected,
                    "{a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_projectile_never_hits_its_owner() {
        let owner = side(BodyKind::Agent, 1, None);
        let target = side(BodyKind::Agent, 2, None);
        let shot = side(BodyKind::Projectile, 10, Some(1));
        assert!(!should_collide(shot, owner));
        assert!(!should_collide(owner, shot));
        assert!(should_collide(shot, target));
        assert!(should_collide(target, shot));
    }

    #[test]
    fn test_contact_orders_sides() {
        let a = BodyTag::new(BodyKind::Agent, EntityId(7));
        let b = BodyTag::new(BodyKind::Projectile, EntityId(3));
        let contact = Contact::new(a, b);
        assert_eq!(contact.a, b);
        assert_eq!(contact.b, a);
        assert_eq!(Contact::new(b, a), contact);
    }
}
