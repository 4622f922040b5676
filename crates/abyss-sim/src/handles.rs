//! Conversion between hecs entities and the weak `EntityId` handles stored in
//! components and handed to hosts.

use hecs::{Entity, World};

use abyss_core::types::EntityId;

pub fn id_of(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Resolve a handle. `None` if the bits are invalid or the entity has been despawned.
pub fn resolve(world: &World, id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0).filter(|&e| world.contains(e))
}
