//! Dense voxel grid.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::{Block, Terrain};

/// Axis-aligned box of cells stored densely in x-major, then z, then y order.
/// Cells outside the box read as `Block::Air`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxelGrid {
    min: IVec3,
    size: IVec3,
    sea_level: i32,
    cells: Vec<Block>,
}

impl VoxelGrid {
    /// Empty (all air) grid covering `size` cells from `min`.
    pub fn new(min: IVec3, size: IVec3, sea_level: i32) -> Self {
        let size = size.max(IVec3::ZERO);
        let len = (size.x as usize) * (size.y as usize) * (size.z as usize);
        Self {
            min,
            size,
            sea_level,
            cells: vec![Block::Air; len],
        }
    }

    /// Square ocean `2 * half_extent` cells wide: a solid bed at `floor_y`,
    /// water up to the surface and a few layers of air above.
    pub fn flat_ocean(half_extent: i32, floor_y: i32, sea_level: i32) -> Self {
        let min = IVec3::new(-half_extent, floor_y, -half_extent);
        let size = IVec3::new(2 * half_extent, sea_level - floor_y + 8, 2 * half_extent);
        let mut grid = Self::new(min, size, sea_level);
        let max = min + size - IVec3::ONE;
        grid.fill(min, IVec3::new(max.x, floor_y, max.z), Block::Solid);
        if sea_level - 1 > floor_y {
            grid.fill(
                IVec3::new(min.x, floor_y + 1, min.z),
                IVec3::new(max.x, sea_level - 1, max.z),
                Block::Water,
            );
        }
        grid
    }

    pub fn min(&self) -> IVec3 {
        self.min
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    fn index(&self, cell: IVec3) -> Option<usize> {
        let local = cell - self.min;
        if local.cmplt(IVec3::ZERO).any() || local.cmpge(self.size).any() {
            return None;
        }
        let (x, y, z) = (local.x as usize, local.y as usize, local.z as usize);
        let (sx, sz) = (self.size.x as usize, self.size.z as usize);
        Some(x + sx * (z + sz * y))
    }

    /// Set one cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: IVec3, block: Block) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = block;
        }
    }

    /// Fill the inclusive box `a..=b`.
    pub fn fill(&mut self, a: IVec3, b: IVec3, block: Block) {
        let lo = a.min(b);
        let hi = a.max(b);
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                for x in lo.x..=hi.x {
                    self.set(IVec3::new(x, y, z), block);
                }
            }
        }
    }
}

impl Terrain for VoxelGrid {
    fn sea_level(&self) -> i32 {
        self.sea_level
    }

    fn block(&self, cell: IVec3) -> Block {
        self.index(cell).map_or(Block::Air, |i| self.cells[i])
    }
}
