//! Scene builders and seeded churn shared by the benchmarks and their sanity tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tiny2d_engine::ecs::{Entity, Registry};

use crate::components::{Health, MovementSystem, Position, RenderSystem, Sprite, Velocity};

/// Seed every benchmark uses, so runs are comparable.
pub const SEED: u64 = 0x7157_2d00;

pub fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(SEED)
}

/// A registry with both benchmark systems and `count` moving entities, every other one drawn.
///
/// The pending additions are already applied.
pub fn populated(count: usize) -> (Registry, Vec<Entity>) {
    let mut registry = Registry::with_capacity(count);
    registry.add_system(MovementSystem::new());
    registry.add_system(RenderSystem::new());

    let entities = (0..count)
        .map(|index| spawn(&mut registry, index))
        .collect::<Vec<_>>();
    registry.update();
    (registry, entities)
}

/// Create one entity in the shape [`populated`] uses.
pub fn spawn(registry: &mut Registry, index: usize) -> Entity {
    let entity = registry.create_entity();
    let mut handle = registry.entity_mut(entity);
    handle
        .add_component(Position {
            x: index as f32,
            y: 0.0,
        })
        .add_component(Velocity { x: 1.0, y: 0.5 });
    if index % 2 == 0 {
        handle.add_component(Sprite {
            texture: index as u32 % 8,
            z_index: 0,
            width: 16.0,
            height: 16.0,
        });
    }
    entity
}

/// Run `frames` frames of random kills, spawns and component edits against `live`.
///
/// Returns the number of entities killed.
pub fn churn(
    registry: &mut Registry,
    live: &mut Vec<Entity>,
    rng: &mut impl Rng,
    frames: usize,
    edits_per_frame: usize,
) -> usize {
    let mut killed = 0;
    for _ in 0..frames {
        for _ in 0..edits_per_frame {
            match rng.gen_range(0..4) {
                0 if !live.is_empty() => {
                    let entity = live.swap_remove(rng.gen_range(0..live.len()));
                    registry.kill_entity(entity);
                    killed += 1;
                }
                1 => {
                    let index = rng.gen_range(0..1024);
                    live.push(spawn(registry, index));
                }
                2 if !live.is_empty() => {
                    let entity = live[rng.gen_range(0..live.len())];
                    registry.add_component(
                        entity,
                        Health {
                            percentage: rng.gen_range(1..=100),
                        },
                    );
                }
                _ if !live.is_empty() => {
                    let entity = live[rng.gen_range(0..live.len())];
                    registry.remove_component::<Sprite>(entity);
                }
                _ => {}
            }
        }
        registry.update();
    }
    killed
}
