//! Coordinate mapping between absolute tiles and chunks

use serde::{Deserialize, Serialize};

/// Edge length of a chunk, in tiles.
pub const CHUNK_SIZE: i32 = 12;

/// Tiles per chunk.
pub const TILES_PER_CHUNK: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Absolute tile position. The world has no edges, so coordinates may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours in north, south, west, east order. Neighbours past
    /// the edge of the `i32` plane are left out.
    pub fn neighbors(self) -> impl Iterator<Item = TilePos> {
        [
            self.y.checked_sub(1).map(|y| TilePos::new(self.x, y)),
            self.y.checked_add(1).map(|y| TilePos::new(self.x, y)),
            self.x.checked_sub(1).map(|x| TilePos::new(x, self.y)),
            self.x.checked_add(1).map(|x| TilePos::new(x, self.y)),
        ]
        .into_iter()
        .flatten()
    }

    /// Euclidean distance between two tiles.
    pub fn distance(self, other: TilePos) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn chunk(self) -> ChunkCoord {
        tile_to_chunk(self.x, self.y)
    }
}

/// Chunk coordinate; chunk `(cx, cy)` covers tiles `[cx*12, cx*12+12)` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `None` for the partial chunks at the edge of the `i32` plane.
    pub fn bounds(self) -> Option<ChunkBounds> {
        chunk_bounds(self.x, self.y)
    }
}

/// Half-open tile rectangle `[min_x, max_x) × [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl ChunkBounds {
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.min_x && pos.x < self.max_x && pos.y >= self.min_y && pos.y < self.max_y
    }

    /// Row-major iteration over every tile in the rectangle.
    pub fn positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        (self.min_y..self.max_y)
            .flat_map(move |y| (self.min_x..self.max_x).map(move |x| TilePos::new(x, y)))
    }
}

/// Chunk containing the tile. Uses floor division so `x = -1` lands in chunk `-1`.
pub fn tile_to_chunk(x: i32, y: i32) -> ChunkCoord {
    ChunkCoord {
        x: x.div_euclid(CHUNK_SIZE),
        y: y.div_euclid(CHUNK_SIZE),
    }
}

/// Tile rectangle of a chunk, or `None` when part of it falls outside `i32`.
///
/// Only whole chunks are addressable, so tiles with an axis below
/// `-2147483640` or from `2147483640` up have no chunk to live in.
pub fn chunk_bounds(chunk_x: i32, chunk_y: i32) -> Option<ChunkBounds> {
    let min_x = chunk_x.checked_mul(CHUNK_SIZE)?;
    let min_y = chunk_y.checked_mul(CHUNK_SIZE)?;
    Some(ChunkBounds {
        min_x,
        min_y,
        max_x: min_x.checked_add(CHUNK_SIZE)?,
        max_y: min_y.checked_add(CHUNK_SIZE)?,
    })
}

/// Home tile of every colony, inside the origin chunk.
pub const fn colony_anchor() -> TilePos {
    TilePos::new(6, 6)
}

/// Chunks in a `size × size` block centred on chunk (0,0), row-major.
pub fn centered_block(size: u32) -> Vec<ChunkCoord> {
    let size = size as i32;
    let low = -(size / 2);
    let high = low + size;
    let mut chunks = Vec::with_capacity((size * size).max(0) as usize);
    for cy in low..high {
        for cx in low..high {
            chunks.push(ChunkCoord::new(cx, cy));
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_tiles_use_floor_division() {
        assert_eq!(tile_to_chunk(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(tile_to_chunk(-12, 0), ChunkCoord::new(-1, 0));
        assert_eq!(tile_to_chunk(-13, 11), ChunkCoord::new(-2, 0));
        assert_eq!(tile_to_chunk(12, 23), ChunkCoord::new(1, 1));
    }

    #[test]
    fn test_bounds_contain_their_tiles() {
        for x in -30..30 {
            for y in [-25, -12, -1, 0, 5, 24] {
                let pos = TilePos::new(x, y);
                assert!(pos.chunk().bounds().unwrap().contains(pos), "{pos:?}");
            }
        }
    }

    #[test]
    fn test_bounds_cover_chunk_size() {
        let bounds = chunk_bounds(-1, 2).unwrap();
        assert_eq!(bounds.min_x, -12);
        assert_eq!(bounds.max_x, 0);
        assert_eq!(bounds.min_y, 24);
        assert_eq!(bounds.positions().count(), TILES_PER_CHUNK);
    }

    #[test]
    fn test_edge_of_plane_has_no_bounds() {
        assert_eq!(chunk_bounds(178_956_970, 0), None);
        assert_eq!(chunk_bounds(0, -178_956_971), None);
        assert_eq!(tile_to_chunk(i32::MAX, 0).bounds(), None);
        assert_eq!(tile_to_chunk(0, i32::MIN).bounds(), None);

        let last = chunk_bounds(178_956_969, -178_956_970).unwrap();
        assert_eq!(last.max_x, 2_147_483_640);
        assert_eq!(last.min_y, -2_147_483_640);
        let inside = TilePos::new(2_147_483_639, -2_147_483_640);
        assert!(inside.chunk().bounds().unwrap().contains(inside));
    }

    #[test]
    fn test_neighbors_stop_at_plane_edge() {
        let corner = TilePos::new(i32::MAX, i32::MIN);
        let around: Vec<_> = corner.neighbors().collect();
        assert_eq!(
            around,
            vec![TilePos::new(i32::MAX, i32::MIN + 1), TilePos::new(i32::MAX - 1, i32::MIN)]
        );
        assert_eq!(TilePos::new(0, 0).neighbors().count(), 4);
    }

    #[test]
    fn test_anchor_in_origin_chunk() {
        assert_eq!(colony_anchor().chunk(), ChunkCoord::new(0, 0));
    }

    #[test]
    fn test_centered_block() {
        let block = centered_block(3);
        assert_eq!(block.len(), 9);
        assert!(block.contains(&ChunkCoord::new(-1, -1)));
        assert!(block.contains(&ChunkCoord::new(1, 1)));
        assert!(centered_block(0).is_empty());
        assert_eq!(centered_block(1), vec![ChunkCoord::new(0, 0)]);
    }
}
