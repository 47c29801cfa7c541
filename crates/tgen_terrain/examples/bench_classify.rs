//! Throughput benchmark for terrain classification.
//!
//! Classifies every tile of a square view around a center point, first with
//! cold caches and then again with warm ones. This is the work a renderer does
//! when a view is first drawn and then redrawn every frame.
//!
//! Usage:
//!   cargo run --release --example bench_classify -p tgen_terrain -- [OPTIONS]
//!
//! Options:
//!   --center X:Y         Center in world units (default: 20000:-15000)
//!   --view N             Tiles from the center to each edge (default: 64)
//!   --tile SIZE          Tile size in world units (default: 32)
//!   --frames N           Warm passes (default: 5)
//!   --config PATH        JSON terrain config (default: built-in)

use std::time::{Duration, Instant};
use tgen_terrain::{GraphicsContext, TerrainCategory, TerrainClassifier, TerrainConfig};

fn fmt_duration(d: Duration) -> String {
    if d.as_secs() >= 1 {
        format!("{:.3}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.3}ms", d.as_secs_f64() * 1e3)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1e6)
    }
}

fn classify_view(
    classifier: &TerrainClassifier,
    center: (f64, f64),
    view: i32,
    tile: f64,
) -> [u64; 3] {
    let mut counts = [0u64; 3];
    for ty in -view..=view {
        for tx in -view..=view {
            let x = center.0 + tx as f64 * tile;
            let y = center.1 + ty as f64 * tile;
            let slot = match classifier.classify(x, y) {
                TerrainCategory::Grass => 0,
                TerrainCategory::Sand => 1,
                TerrainCategory::Water => 2,
            };
            counts[slot] += 1;
        }
    }
    counts
}

fn main() {
    let mut center = (20_000.0, -15_000.0);
    let mut view: i32 = 64;
    let mut tile = 32.0;
    let mut frames = 5;
    let mut config = TerrainConfig::default();

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--center" => {
                i += 1;
                let parts: Vec<&str> = args[i].split(':').collect();
                if parts.len() != 2 {
                    panic!("Center must be X:Y");
                }
                center.0 = parts[0].parse().expect("Invalid center X");
                center.1 = parts[1].parse().expect("Invalid center Y");
            }
            "--view" => {
                i += 1;
                view = args[i].parse().expect("Invalid view");
                if view < 1 {
                    panic!("View must be >= 1");
                }
            }
            "--tile" => {
                i += 1;
                tile = args[i].parse().expect("Invalid tile size");
            }
            "--frames" => {
                i += 1;
                frames = args[i].parse().expect("Invalid frame count");
            }
            "--config" => {
                i += 1;
                config = TerrainConfig::load(&args[i])
                    .unwrap_or_else(|e| panic!("Failed to load {}: {}", args[i], e));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: bench_classify [--center X:Y] [--view N] [--tile SIZE] [--frames N] [--config PATH]"
                );
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let t_build = Instant::now();
    let mut classifier = TerrainClassifier::new(config).expect("Invalid terrain config");
    classifier
        .initialize(GraphicsContext::Headless)
        .expect("Failed to initialize");
    eprintln!("Built classifier in {}", fmt_duration(t_build.elapsed()));

    let side = (2 * view + 1) as u64;
    let tiles = side * side;

    let t_cold = Instant::now();
    let counts = classify_view(&classifier, center, view, tile);
    let cold = t_cold.elapsed();
    eprintln!(
        "Cold: {} tiles in {} ({:.1} ns/tile) grass={} sand={} water={}",
        tiles,
        fmt_duration(cold),
        cold.as_nanos() as f64 / tiles as f64,
        counts[0],
        counts[1],
        counts[2],
    );

    let mut warm = Duration::ZERO;
    for _ in 0..frames {
        let t = Instant::now();
        let again = classify_view(&classifier, center, view, tile);
        warm += t.elapsed();
        assert_eq!(again, counts, "warm pass disagrees with cold pass");
    }
    if frames > 0 {
        let per_frame = warm / frames;
        eprintln!(
            "Warm: {} per frame ({:.1} ns/tile)",
            fmt_duration(per_frame),
            per_frame.as_nanos() as f64 / tiles as f64,
        );
    }

    let stats = classifier.memo_stats().expect("classifier is initialized");
    eprintln!(
        "Buffer cache: {} entries, hit rate {:.1}%, {} clears",
        stats.buffer.entries,
        stats.buffer.hit_rate() * 100.0,
        stats.buffer.clears,
    );
    eprintln!(
        "Base cache: {} entries, hit rate {:.1}%, {} clears",
        stats.base.entries,
        stats.base.hit_rate() * 100.0,
        stats.base.clears,
    );
}
