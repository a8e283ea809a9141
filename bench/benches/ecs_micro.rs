//! ECS microbenchmarks using Criterion.
//!
//! These benchmarks measure individual ECS operations in isolation:
//! - Component pool insert, lookup and swap-remove
//! - Entity creation and destruction through the deferred queues
//! - Walking a system's entity list
//! - Seeded churn across whole frames

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use tiny2d_bench::{components::*, workload};
use tiny2d_engine::ecs::{Entity, Pool, Registry, System};

// =============================================================================
// Pool Benchmarks
// =============================================================================

fn filled_pool(n: u32) -> Pool<Position> {
    let mut pool = Pool::with_capacity(n as usize);
    for id in 0..n {
        pool.set(
            Entity::new(id),
            Position {
                x: id as f32,
                y: 0.0,
            },
        );
    }
    pool
}

fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool");

    for count in [1_000u32, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("set", count), &count, |b, &n| {
            b.iter(|| black_box(filled_pool(n)));
        });

        group.bench_with_input(BenchmarkId::new("get", count), &count, |b, &n| {
            let pool = filled_pool(n);
            b.iter(|| {
                let mut sum = 0.0;
                for id in 0..n {
                    if let Some(position) = pool.get(Entity::new(id)) {
                        sum += position.x;
                    }
                }
                black_box(sum)
            });
        });

        // Front-to-back removal moves the last element into every hole
        group.bench_with_input(BenchmarkId::new("remove", count), &count, |b, &n| {
            b.iter_batched(
                || filled_pool(n),
                |mut pool| {
                    for id in 0..n {
                        black_box(pool.remove(Entity::new(id)));
                    }
                    pool
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("dense_iter", count), &count, |b, &n| {
            let mut pool = filled_pool(n);
            b.iter(|| {
                for position in pool.components_mut() {
                    position.x += 1.0;
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Lifecycle Benchmarks
// =============================================================================

fn bench_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        // Create, attach components and apply the pending additions
        group.bench_with_input(BenchmarkId::new("create_and_update", count), &count, |b, &n| {
            b.iter(|| black_box(workload::populated(n)));
        });

        group.bench_with_input(BenchmarkId::new("kill_and_update", count), &count, |b, &n| {
            b.iter_batched(
                || workload::populated(n),
                |(mut registry, entities)| {
                    for entity in entities {
                        registry.kill_entity(entity);
                    }
                    registry.update();
                    registry
                },
                BatchSize::SmallInput,
            );
        });

        // Freed ids are handed out again before the high-water mark grows
        group.bench_with_input(BenchmarkId::new("reuse_ids", count), &count, |b, &n| {
            b.iter_batched(
                || {
                    let (mut registry, entities) = workload::populated(n);
                    for entity in entities {
                        registry.kill_entity(entity);
                    }
                    registry.update();
                    registry
                },
                |mut registry| {
                    for index in 0..n {
                        black_box(workload::spawn(&mut registry, index));
                    }
                    registry.update();
                    registry
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// System Benchmarks
// =============================================================================

fn integrate(movement: &mut MovementSystem, registry: &mut Registry) {
    for &entity in movement.entities() {
        let Ok(&velocity) = registry.get_component::<Velocity>(entity) else {
            continue;
        };
        if let Ok(position) = registry.get_component_mut::<Position>(entity) {
            position.x += velocity.x;
            position.y += velocity.y;
        }
    }
}

fn bench_systems(c: &mut Criterion) {
    let mut group = c.benchmark_group("systems");

    for count in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("movement", count), &count, |b, &n| {
            let (mut registry, _) = workload::populated(n);
            b.iter(|| registry.with_system(integrate).map(black_box));
        });

        // Reads only, half the entities carry a sprite
        group.bench_with_input(BenchmarkId::new("render_walk", count), &count, |b, &n| {
            let (registry, _) = workload::populated(n);
            b.iter(|| {
                let render = registry.get_system::<RenderSystem>().map(|render| {
                    render
                        .entities()
                        .iter()
                        .filter_map(|&entity| registry.get_component::<Sprite>(entity).ok())
                        .map(|sprite| sprite.texture)
                        .sum::<u32>()
                });
                black_box(render)
            });
        });

        // An update with nothing queued should cost next to nothing
        group.bench_with_input(BenchmarkId::new("idle_update", count), &count, |b, &n| {
            let (mut registry, _) = workload::populated(n);
            b.iter(|| registry.update());
        });
    }

    group.finish();
}

// =============================================================================
// Churn Benchmarks
// =============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    for edits in [16, 128, 1_024] {
        group.throughput(Throughput::Elements(edits as u64 * 60));

        group.bench_with_input(BenchmarkId::new("sixty_frames", edits), &edits, |b, &edits| {
            b.iter_batched(
                || {
                    let (registry, live) = workload::populated(1_000);
                    (registry, live, workload::rng())
                },
                |(mut registry, mut live, mut rng)| {
                    black_box(workload::churn(&mut registry, &mut live, &mut rng, 60, edits));
                    registry
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_pool, bench_lifecycle, bench_systems, bench_churn);

criterion_main!(benches);
