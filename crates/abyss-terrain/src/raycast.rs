//! Segment traversal through the voxel grid.
//!
//! Visits every cell the segment passes through (a supercover walk in the
//! Amanatides-Woo style) and stops at the first solid one.

use glam::{DVec3, IVec3};

use crate::Terrain;

/// First solid cell on a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell: IVec3,
    /// Point where the segment enters the cell.
    pub point: DVec3,
    /// Distance from the segment start to `point`.
    pub distance: f64,
}

pub fn first_solid<T: Terrain + ?Sized>(terrain: &T, from: DVec3, to: DVec3) -> Option<RayHit> {
    let mut cell = from.floor().as_ivec3();
    if terrain.block(cell).is_solid() {
        return Some(RayHit {
            cell,
            point: from,
            distance: 0.0,
        });
    }

    let delta = to - from;
    let length = delta.length();
    if length <= f64::EPSILON {
        return None;
    }
    let dir = delta / length;

    let mut step = IVec3::ZERO;
    let mut t_max = DVec3::splat(f64::INFINITY);
    let mut t_delta = DVec3::splat(f64::INFINITY);
    for axis in 0..3 {
        let d = dir[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_max[axis] = ((cell[axis] + 1) as f64 - from[axis]) / d;
            t_delta[axis] = 1.0 / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_max[axis] = (from[axis] - cell[axis] as f64) / -d;
            t_delta[axis] = -1.0 / d;
        }
    }

    loop {
        let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
            0
        } else if t_max.y <= t_max.z {
            1
        } else {
            2
        };
        let t = t_max[axis];
        if t > length {
            return None;
        }
        cell[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        if terrain.block(cell).is_solid() {
            return Some(RayHit {
                cell,
                point: from + dir * t,
                distance: t,
            });
        }
    }
}
