use crate::error::UnpackError;
use crate::value::{Field, Inspect};

/// Integer block coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Absolute position of a block given in chunk-local packed form
    /// (`local_xz = x << 4 | z`).
    pub fn from_chunk_local(chunk: ChunkPos, local_xz: u8, y: i32) -> Self {
        let local_x = (local_xz >> 4) as i32;
        let local_z = (local_xz & 15) as i32;
        Self {
            x: chunk.x * 16 + local_x,
            y,
            z: chunk.z * 16 + local_z,
        }
    }
}

impl Inspect for BlockPos {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        Ok(vec![
            Field::new("x", self.x),
            Field::new("y", self.y),
            Field::new("z", self.z),
        ])
    }
}

/// Exact position, e.g. of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Inspect for Vec3d {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        Ok(vec![
            Field::new("x", self.x),
            Field::new("y", self.y),
            Field::new("z", self.z),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl Inspect for ChunkPos {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        Ok(vec![Field::new("x", self.x), Field::new("z", self.z)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_chunk_local() {
        let pos = BlockPos::from_chunk_local(ChunkPos::new(2, -1), 0x3A, 64);
        assert_eq!(pos, BlockPos::new(35, 64, -6));
    }
}
