//! Cleanup system: despawns everything queued for removal this tick.

use hecs::{Entity, World};

/// Despawn queued entities. Duplicates and already-removed entities are ignored.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
