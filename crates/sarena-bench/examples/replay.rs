//! Allocate → reset → allocate example.
//!
//! Demonstrates: fill an arena with records, reset it back to one region,
//! refill it well past its previous size, then rewind and replay the
//! grown chain without touching the memory provider.

use std::time::Instant;

use sarena::Arena;
use sarena_bench::frame_profile;
use sarena_test_utils::RECORD_SIZE;

fn fill(arena: &Arena, records: usize) {
    for _ in 0..records {
        arena.alloc(RECORD_SIZE).unwrap();
    }
}

fn main() {
    println!("=== SArena replay example ===\n");

    let arena = Arena::with_config(frame_profile()).unwrap();
    println!(
        "region capacity {} bytes, record {} bytes",
        arena.region_capacity(),
        RECORD_SIZE
    );

    fill(&arena, 10_000);
    println!("after 10,000 records: {:?}", arena.stats());

    arena.reset();
    println!("after reset:          {:?}", arena.stats());

    let start = Instant::now();
    fill(&arena, 1_000_000);
    println!(
        "after 1,000,000 records: {} regions in {:?}",
        arena.region_count(),
        start.elapsed()
    );

    arena.rewind();
    let start = Instant::now();
    fill(&arena, 1_000_000);
    println!(
        "replayed 1,000,000 records: {} regions in {:?}",
        arena.region_count(),
        start.elapsed()
    );

    println!("\nDone");
}
