//! Fluid and collision queries over bounding boxes.

use abyss_core::types::Aabb;
use glam::IVec3;

use crate::Terrain;

const EDGE_EPSILON: f64 = 1e-7;

/// Every cell a box overlaps (faces touching a cell boundary do not count).
pub fn cells_overlapping(aabb: &Aabb) -> impl Iterator<Item = IVec3> {
    let lo = aabb.min.floor().as_ivec3();
    let hi = (aabb.max - EDGE_EPSILON).floor().as_ivec3().max(lo);
    (lo.y..=hi.y).flat_map(move |y| {
        (lo.z..=hi.z).flat_map(move |z| (lo.x..=hi.x).map(move |x| IVec3::new(x, y, z)))
    })
}

/// True if any part of the box is in water.
pub fn touches_water<T: Terrain + ?Sized>(terrain: &T, aabb: &Aabb) -> bool {
    cells_overlapping(aabb).any(|cell| terrain.is_water(cell))
}

/// True if the box overlaps any solid cell.
pub fn collides<T: Terrain + ?Sized>(terrain: &T, aabb: &Aabb) -> bool {
    cells_overlapping(aabb).any(|cell| terrain.block(cell).is_solid())
}

/// Whole blocks between `y` and the surface, never negative.
pub fn depth_below_surface<T: Terrain + ?Sized>(terrain: &T, y: f64) -> i32 {
    (terrain.sea_level() - y.floor() as i32).max(0)
}

/// Any water in the `depth` cells directly below `cell`.
pub fn water_below<T: Terrain + ?Sized>(terrain: &T, cell: IVec3, depth: i32) -> bool {
    (1..=depth).any(|d| terrain.is_water(cell - IVec3::new(0, d, 0)))
}
