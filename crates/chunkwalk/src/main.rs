//! ChunkWalk - headless chunk streaming driver
//!
//! Moves a player around a circle and streams the chunks around it through
//! a fixed-capacity LRU cache, then reports how the cache behaved.

mod walk;

use anyhow::{ensure, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::walk::{WalkConfig, Walker};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chunks visited in each direction around the player
    #[arg(short, long, default_value_t = 1)]
    render_distance: u32,

    /// Extra ring of chunks kept cached beyond the render distance
    #[arg(short = 'm', long, default_value_t = 2)]
    cache_margin: u32,

    /// Number of steps to simulate
    #[arg(short, long, default_value_t = 1000)]
    steps: u32,

    /// Orbit radius in blocks
    #[arg(long, default_value_t = 50.0)]
    orbit_radius: f32,

    /// Orbit speed in radians per step
    #[arg(long, default_value_t = 0.5)]
    angular_speed: f32,

    /// Chunk width in blocks
    #[arg(long, default_value_t = 16)]
    chunk_width: i32,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    ensure!(args.chunk_width > 0, "chunk width must be positive");

    let config = WalkConfig {
        render_distance: args.render_distance,
        cache_margin: args.cache_margin,
        orbit_radius: args.orbit_radius,
        angular_speed: args.angular_speed,
        chunk_width: args.chunk_width,
    };

    info!("Starting ChunkWalk v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Render distance: {} ({} chunks per step)",
        config.render_distance,
        config.visible_chunks()
    );
    info!("Cache capacity: {} chunks", config.cache_capacity());

    let mut walker = Walker::new(config)?;

    for _ in 0..args.steps {
        let report = walker.step();
        debug!(
            player_chunk = %report.player_chunk,
            loaded = report.loaded,
            generated = report.generated,
            "step"
        );
    }

    let stats = walker.stats();
    info!("Steps: {}", args.steps);
    info!("Cached chunks: {}/{}", walker.cached_chunks(), walker.capacity());
    info!(
        "Hits: {}  Misses: {}  Hit rate: {:.1}%",
        stats.hits(),
        stats.misses(),
        stats.hit_ratio() * 100.0
    );
    info!("Inserts: {}  Evictions: {}", stats.inserts(), stats.evictions());

    Ok(())
}
