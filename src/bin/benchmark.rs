//! Performance benchmark comparing the two compute backends

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sim_engine::{
    Animated, ComputeBackend, EngineConfig, GridSimulation, SequenceEngine,
    domain::{BitGrid, DEFAULT_DENSITY},
    telemetry,
};

fn benchmark_grid(compute: &ComputeBackend, size: usize, iterations: u32) -> Option<f64> {
    let mut grid = compute.create_grid(size, size).ok()?;
    grid.randomize_with(DEFAULT_DENSITY, &mut StdRng::seed_from_u64(42));

    let start = Instant::now();
    for _ in 0..iterations {
        grid.tick();
    }
    Some(start.elapsed().as_secs_f64() * 1000.0 / iterations as f64)
}

fn benchmark_range(engine: &dyn SequenceEngine, limit: u64) -> (f64, u64, usize) {
    let start = Instant::now();
    let best = engine.find_max_in_range(limit);
    (start.elapsed().as_secs_f64() * 1000.0, best.number, best.length)
}

fn cell(ms: Option<f64>) -> String {
    ms.map_or_else(|| format!("{:>12}", "-"), |ms| format!("{:>12.2}", ms))
}

fn main() {
    let config = EngineConfig::from_env();
    telemetry::init_tracing(&config);

    let fast = ComputeBackend::init_blocking(&config);
    let pure = ComputeBackend::fallback();
    println!("=== Backend Benchmark ===\n");
    println!("Selected: {} ({:?})\n", fast.backend(), fast.status());

    println!("--- Grid ticks (ms/gen) ---");
    println!("{:>12} {:>12} {:>12} {:>10}", "Size", "Fallback", "Fast", "Speedup");
    println!("{:-<50}", "");

    let iterations = 20;
    for size in [100, 500, 1000, 2000, 5000] {
        // The pure grid gets too slow to be worth waiting for
        let slow = (size <= 2000).then(|| benchmark_grid(&pure, size, iterations)).flatten();
        let quick = benchmark_grid(&fast, size, iterations);
        let speedup = match (slow, quick) {
            (Some(s), Some(q)) if q > 0.0 => format!("{:>9.1}x", s / q),
            _ => format!("{:>10}", "-"),
        };
        println!("{:>12} {} {} {}", format!("{}x{}", size, size), cell(slow), cell(quick), speedup);
    }

    println!("\n--- Longest sequence search (ms) ---");
    println!("{:>12} {:>12} {:>12} {:>16}", "Limit", "Fallback", "Fast", "Best");
    println!("{:-<56}", "");

    let pure_engine = pure.sequence_engine();
    let fast_engine = fast.sequence_engine();
    for limit in [10_000u64, 100_000, 1_000_000, 10_000_000] {
        let (slow_ms, number, length) = benchmark_range(pure_engine.as_ref(), limit);
        let (fast_ms, fast_number, fast_length) = benchmark_range(fast_engine.as_ref(), limit);
        if (number, length) != (fast_number, fast_length) {
            eprintln!("backend mismatch at limit {}: {} vs {}", limit, number, fast_number);
        }
        println!(
            "{:>12} {:>12.2} {:>12.2} {:>16}",
            limit,
            slow_ms,
            fast_ms,
            format!("{} ({})", number, length)
        );
    }

    println!("\n=== Memory Usage (10000x10000) ===\n");
    let size = 10_000;
    let pure_mem = size * size;
    match BitGrid::new(size, size) {
        Ok(packed) => {
            let packed_mem = packed.memory_bytes();
            println!("Fallback grid: {:>12} bytes ({:.1} MB)", pure_mem, pure_mem as f64 / 1_000_000.0);
            println!("Bit-packed:    {:>12} bytes ({:.1} MB)", packed_mem, packed_mem as f64 / 1_000_000.0);
            println!("Reduction:     {:>12.1}x", pure_mem as f64 / packed_mem as f64);
        }
        Err(err) => eprintln!("cannot allocate bit grid: {}", err),
    }
}
