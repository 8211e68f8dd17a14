//! Player orbit and spiral chunk visiting

use chunkcache::{CacheStats, ChunkCache, Coord, Result};
use tracing::trace;

/// Placeholder for generated chunk data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk coordinate
    pub coord: Coord,
    /// Step at which the chunk was generated
    pub generated_at: u32,
}

/// Walk parameters
#[derive(Debug, Clone, Copy)]
pub struct WalkConfig {
    /// Chunks visited in each direction around the player
    pub render_distance: u32,
    /// Extra ring of chunks kept cached beyond the render distance
    pub cache_margin: u32,
    /// Orbit radius in blocks
    pub orbit_radius: f32,
    /// Orbit speed in radians per step
    pub angular_speed: f32,
    /// Chunk width in blocks
    pub chunk_width: i32,
}

impl WalkConfig {
    /// Chunks the cache must hold: a square of side `2 * (render + margin) + 1`
    pub fn cache_capacity(&self) -> usize {
        let side = 2 * (self.render_distance as usize + self.cache_margin as usize) + 1;
        side * side
    }

    /// Chunks visited per step
    pub fn visible_chunks(&self) -> usize {
        let side = 2 * self.render_distance as usize + 1;
        side * side
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Chunk the player stands in
    pub player_chunk: Coord,
    /// Visited chunks already cached
    pub loaded: usize,
    /// Visited chunks generated this step
    pub generated: usize,
}

/// Outward square spiral of offsets starting at (0, 0)
#[derive(Debug, Clone)]
pub struct Spiral {
    x: i32,
    z: i32,
    dx: i32,
    dz: i32,
    remaining: usize,
}

impl Spiral {
    /// Spiral covering a `side x side` square
    pub fn new(side: usize) -> Self {
        Self {
            x: 0,
            z: 0,
            dx: 0,
            dz: -1,
            remaining: side * side,
        }
    }
}

impl Iterator for Spiral {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let offset = (self.x, self.z);

        // Turn at the corners of each ring
        let (x, z) = offset;
        if x == z || (x < 0 && x == -z) || (x > 0 && x == 1 - z) {
            let dx = self.dx;
            self.dx = -self.dz;
            self.dz = dx;
        }
        self.x += self.dx;
        self.z += self.dz;

        Some(offset)
    }
}

/// Chunk containing a block position, truncating toward zero
pub fn chunk_of(block_x: f32, block_z: f32, chunk_width: i32) -> Coord {
    Coord::new(block_x as i32 / chunk_width, block_z as i32 / chunk_width)
}

/// Drives a player around a circle, streaming chunks through the cache
pub struct Walker {
    config: WalkConfig,
    cache: ChunkCache<Chunk>,
    step: u32,
}

impl Walker {
    /// Create a walker with a cache sized for the render distance
    pub fn new(config: WalkConfig) -> Result<Self> {
        let cache = ChunkCache::new(config.cache_capacity())?.with_eviction_hook(
            |coord, chunk: Chunk| {
                debug_assert_eq!(coord, chunk.coord);
                trace!(%coord, generated_at = chunk.generated_at, "unloaded chunk");
            },
        );

        Ok(Self {
            config,
            cache,
            step: 0,
        })
    }

    /// Player block position at the current step
    pub fn player_position(&self) -> (f32, f32) {
        let angle = self.step as f32 * self.config.angular_speed;
        (
            self.config.orbit_radius * angle.cos(),
            self.config.orbit_radius * angle.sin(),
        )
    }

    /// Advance one step: visit every chunk in render distance, nearest first
    pub fn step(&mut self) -> StepReport {
        let (block_x, block_z) = self.player_position();
        let player_chunk = chunk_of(block_x, block_z, self.config.chunk_width);
        let step = self.step;

        let mut report = StepReport {
            player_chunk,
            loaded: 0,
            generated: 0,
        };

        let side = 2 * self.config.render_distance as usize + 1;
        for (dx, dz) in Spiral::new(side) {
            let coord = Coord::new(player_chunk.x + dx, player_chunk.z + dz);

            // Load-then-insert
            if self.cache.get(coord).is_some() {
                report.loaded += 1;
            } else {
                self.cache.put(
                    coord,
                    Chunk {
                        coord,
                        generated_at: step,
                    },
                );
                report.generated += 1;
            }
        }

        self.step += 1;
        report
    }

    /// Cache statistics so far
    pub fn stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Chunks currently cached
    pub fn cached_chunks(&self) -> usize {
        self.cache.len()
    }

    /// Cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }
}
