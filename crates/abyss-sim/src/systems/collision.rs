//! Bounding boxes and projectile-vs-entity overlap tests.

use glam::DVec3;
use hecs::{Entity, World};

use abyss_core::components::{Extent, Heading};
use abyss_core::enums::EntityKind;
use abyss_core::types::{Aabb, Position};

/// World-space box for a body. Oriented bodies rotate their footprint with the yaw
/// and are centred vertically on their position, so the box rides the travel line.
/// The rest stand on their position with a square footprint sized by the larger
/// horizontal dimension.
pub fn body_box(pos: &Position, extent: &Extent, yaw_deg: f64) -> Aabb {
    if !extent.oriented {
        let half = extent.width.max(extent.length) / 2.0;
        return Aabb::standing(pos.as_vec(), half, half, extent.height);
    }
    let (sin, cos) = yaw_deg.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let half_len = extent.length / 2.0;
    let half_wid = extent.width / 2.0;
    let base = pos.as_vec() - DVec3::Y * (extent.height / 2.0);
    Aabb::standing(
        base,
        sin * half_len + cos * half_wid,
        cos * half_len + sin * half_wid,
        extent.height,
    )
}

/// Current box of any entity that has a position and extent.
pub fn entity_box(world: &World, entity: Entity) -> Option<Aabb> {
    let mut query = world
        .query_one::<(&Position, &Extent, Option<&Heading>)>(entity)
        .ok()?;
    let (pos, extent, heading) = query.get()?;
    Some(body_box(pos, extent, heading.map_or(0.0, |h| h.yaw)))
}

/// Whether a projectile may strike this kind of entity.
pub fn is_strikeable(kind: EntityKind) -> bool {
    kind.is_living() || kind == EntityKind::Vehicle
}

/// Living or vehicle entity overlapping `swept` closest to `origin`, ignoring `exclude`.
pub fn first_entity_hit(
    world: &World,
    swept: &Aabb,
    origin: DVec3,
    exclude: &[Entity],
) -> Option<Entity> {
    let mut query = world.query::<(&Position, &Extent, &EntityKind, Option<&Heading>)>();
    query
        .iter()
        .filter(|(entity, (_, _, kind, _))| is_strikeable(**kind) && !exclude.contains(entity))
        .filter_map(|(entity, (pos, extent, _, heading))| {
            let bounds = body_box(pos, extent, heading.map_or(0.0, |h| h.yaw));
            bounds
                .intersects(swept)
                .then(|| (entity, bounds.center().distance_squared(origin)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}
