//! Fluid-volume constraints: sinking when dry, the surface ceiling, depth,
//! and block collision for hull movement.

use glam::DVec3;

use abyss_core::constants::FALL_SPEED;
use abyss_core::types::Aabb;
use abyss_terrain::{fluid, Terrain};

pub fn is_submerged<T: Terrain + ?Sized>(terrain: &T, hull: &Aabb) -> bool {
    fluid::touches_water(terrain, hull)
}

/// A dry hull ignores its helm and sinks back toward the water.
pub fn apply_fluid_constraint(submerged: bool, movement: DVec3) -> DVec3 {
    if submerged {
        movement
    } else {
        DVec3::new(0.0, -FALL_SPEED, 0.0)
    }
}

/// Clip upward motion so the hull never rises past half its height above the surface.
pub fn clamp_to_surface<T: Terrain + ?Sized>(
    terrain: &T,
    y: f64,
    hull_height: f64,
    movement: DVec3,
) -> DVec3 {
    let max_y = terrain.sea_level() as f64 - hull_height / 2.0;
    let mut clamped = movement;
    if movement.y > 0.0 && y + movement.y > max_y {
        clamped.y = max_y - y;
    }
    clamped
}

pub fn depth<T: Terrain + ?Sized>(terrain: &T, y: f64) -> i32 {
    fluid::depth_below_surface(terrain, y)
}

/// Move a hull through the voxel world one axis at a time (y, then x, then z),
/// cancelling any axis that would push it into a solid block.
pub fn resolve_motion<T: Terrain + ?Sized>(terrain: &T, hull: &Aabb, movement: DVec3) -> DVec3 {
    let mut applied = DVec3::ZERO;
    for axis in [1, 0, 2] {
        if movement[axis] == 0.0 {
            continue;
        }
        let mut step = DVec3::ZERO;
        step[axis] = movement[axis];
        let current = hull.offset(applied);
        let candidate = current.offset(step);
        if !fluid::collides(terrain, &candidate) || fluid::collides(terrain, &current) {
            applied += step;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use abyss_terrain::VoxelGrid;

    #[test]
    fn test_dry_hull_sinks() {
        let m = apply_fluid_constraint(false, DVec3::new(0.3, 0.1, 0.0));
        assert_eq!(m, DVec3::new(0.0, -0.4, 0.0));
        let m = apply_fluid_constraint(true, DVec3::new(0.3, 0.1, 0.0));
        assert_eq!(m, DVec3::new(0.3, 0.1, 0.0));
    }

    #[test]
    fn test_surface_clamp_lands_exactly() {
        let grid = VoxelGrid::flat_ocean(16, 0, 20);
        // max_y = 20 - 1.25 = 18.75
        let m = clamp_to_surface(&grid, 18.7, 2.5, DVec3::new(0.0, 0.06, 0.1));
        assert!((18.7 + m.y - 18.75).abs() < 1e-12);
        assert_eq!(m.z, 0.1);

        let down = clamp_to_surface(&grid, 18.7, 2.5, DVec3::new(0.0, -0.06, 0.0));
        assert_eq!(down.y, -0.06);
    }

    #[test]
    fn test_motion_blocked_by_floor() {
        let grid = VoxelGrid::flat_ocean(16, 0, 20);
        let hull = Aabb::standing(DVec3::new(0.0, 1.05, 0.0), 1.0, 1.0, 2.0);
        let applied = resolve_motion(&grid, &hull, DVec3::new(0.2, -0.1, 0.0));
        assert_eq!(applied, DVec3::new(0.2, 0.0, 0.0));
    }
}
