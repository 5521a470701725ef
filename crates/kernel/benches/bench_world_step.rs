use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use rockyard_input::InputState;
use rockyard_kernel::config::ObstacleConfig;
use rockyard_kernel::{World, WorldConfig};

fn make_config(obstacle_count: usize, spacing: f32) -> WorldConfig {
    let side = (obstacle_count as f32).sqrt().ceil() as usize;
    let obstacles = (0..obstacle_count)
        .map(|i| ObstacleConfig {
            position: Vec3::new(
                (i % side) as f32 * spacing - 20.0,
                0.0,
                (i / side) as f32 * spacing - 20.0,
            ),
            scale: 1.0,
        })
        .collect();
    WorldConfig {
        obstacles,
        ..WorldConfig::default()
    }
}

fn bench_step(obstacle_count: usize, iterations: usize) {
    let mut world = World::new(make_config(obstacle_count, 4.0));
    let inputs = [
        InputState::forward(),
        InputState {
            right: true,
            ..InputState::idle()
        },
        InputState {
            back: true,
            left: true,
            ..InputState::idle()
        },
    ];

    let start = Instant::now();
    for i in 0..iterations {
        let input = inputs[(i / 90) % inputs.len()];
        world.step(black_box(&input), black_box(1.0 / 60.0));
        if i % 1024 == 0 {
            world.drain_events();
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  step ({obstacle_count} obstacles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_draw_list(obstacle_count: usize, iterations: usize) {
    let world = World::new(make_config(obstacle_count, 4.0));

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(world.draw_list());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  draw list ({obstacle_count} obstacles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== World Step Benchmarks ===\n");

    println!("Step:");
    bench_step(4, 100_000);
    bench_step(100, 10_000);
    bench_step(1000, 1_000);

    println!("\nDraw list:");
    bench_draw_list(4, 100_000);
    bench_draw_list(1000, 1_000);

    println!("\n=== Done ===");
}
