//! Voxel world collaborator for ABYSS.
//!
//! The simulation only sees the world through the `Terrain` trait: a sea level,
//! per-cell block lookups, and a segment raycast. `VoxelGrid` is a dense
//! in-memory implementation used by the harness and tests.

pub use abyss_core as core;

pub mod fluid;
pub mod grid;
pub mod raycast;

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

pub use grid::VoxelGrid;
pub use raycast::RayHit;

/// Contents of a single world cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    #[default]
    Air,
    Water,
    Lava,
    Solid,
}

impl Block {
    pub fn is_water(self) -> bool {
        self == Block::Water
    }

    /// Blocks that stop movement and rays.
    pub fn is_solid(self) -> bool {
        self == Block::Solid
    }
}

/// Read-only view of the voxel world.
pub trait Terrain {
    /// Y of the water surface. Cells with `y < sea_level` may hold sea water.
    fn sea_level(&self) -> i32;

    fn block(&self, cell: IVec3) -> Block;

    fn is_water(&self, cell: IVec3) -> bool {
        self.block(cell).is_water()
    }

    /// First solid cell crossed by the segment `from -> to`.
    fn raycast(&self, from: DVec3, to: DVec3) -> Option<RayHit> {
        raycast::first_solid(self, from, to)
    }
}
