//! Scene setup and the per-frame system order.

use anyhow::Result;
use log::{debug, info};
use tiny2d_engine::ecs::{Entity, Registry};

use crate::{
    components::{BoxCollider, Health, ProjectileEmitter, RigidBody, Transform, Vec2},
    config::Config,
    systems::{
        CollisionSystem, DamageSystem, Hit, LifetimeSystem, MovementSystem, ProjectileEmitSystem,
    },
};

/// Running totals for the end-of-run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub frames: u64,
    pub projectiles_fired: usize,
    pub projectiles_expired: usize,
    pub hits: usize,
    pub enemies_destroyed: usize,
}

pub struct Game {
    registry: Registry,
    delta: f32,
    enemies: u32,
    stats: Stats,
}

impl Game {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: Registry::with_capacity(config.enemies as usize + 64),
            delta: config.delta,
            enemies: config.enemies,
            stats: Stats::default(),
        }
    }

    /// Register the systems and spawn the player and the enemy wave.
    pub fn setup(&mut self) {
        self.registry.add_system(MovementSystem::new());
        self.registry.add_system(ProjectileEmitSystem::new());
        self.registry.add_system(LifetimeSystem::new());
        self.registry.add_system(CollisionSystem::new());
        self.registry.add_system(DamageSystem::new());

        let player = self.registry.create_entity();
        self.registry
            .entity_mut(player)
            .tag("player")
            .add_component(Transform::at(Vec2::new(20.0, 100.0)))
            .add_component(RigidBody::default())
            .add_component(BoxCollider::square(16.0))
            .add_component(Health::default())
            .add_component(ProjectileEmitter {
                projectile_velocity: Vec2::new(240.0, 0.0),
                interval: 0.2,
                projectile_lifetime: 1.5,
                hit_damage: 34,
                is_friendly: true,
                elapsed: 0.0,
            });

        for index in 0..self.enemies {
            let enemy = self.registry.create_entity();
            self.registry
                .entity_mut(enemy)
                .group("enemies")
                .add_component(Transform::at(Vec2::new(160.0 + 24.0 * index as f32, 100.0)))
                .add_component(RigidBody {
                    velocity: Vec2::new(-10.0, 0.0),
                })
                .add_component(BoxCollider::square(16.0))
                .add_component(Health::default());
        }

        info!("scene ready: 1 player, {} enemies", self.enemies);
    }

    /// Advance one fixed step.
    ///
    /// Membership changes queued during the previous frame are applied first, then each system
    /// runs over its entity list.
    pub fn frame(&mut self) -> Result<()> {
        let dt = self.delta;
        self.registry.update();

        self.registry
            .with_system(|movement: &mut MovementSystem, registry| movement.update(registry, dt))?;

        let collisions = self
            .registry
            .get_system::<CollisionSystem>()?
            .detect(&self.registry);
        let hits = self.registry.with_system(|damage: &mut DamageSystem, registry| {
            collisions
                .iter()
                .map(|&(a, b)| damage.on_collision(registry, a, b))
                .filter(|hit| *hit != Hit::None)
                .collect::<Vec<_>>()
        })?;
        for hit in hits {
            self.stats.hits += 1;
            if let Hit::Destroyed(target) = hit {
                self.on_destroyed(target);
            }
        }

        self.stats.projectiles_fired += self
            .registry
            .with_system(|emit: &mut ProjectileEmitSystem, registry| emit.update(registry, dt))?;
        self.stats.projectiles_expired += self
            .registry
            .with_system(|lifetime: &mut LifetimeSystem, registry| lifetime.update(registry, dt))?;

        self.stats.frames += 1;
        debug!(
            "frame {} done: {} entities, {} pending kills",
            self.stats.frames,
            self.registry.entity_count(),
            self.registry.pending_kills().len()
        );
        Ok(())
    }

    fn on_destroyed(&mut self, target: Entity) {
        if self.registry.entity_belongs_to_group(target, "enemies") {
            self.stats.enemies_destroyed += 1;
            info!("enemy {} destroyed", target.id());
        } else if self.registry.entity_has_tag(target, "player") {
            info!("player destroyed");
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Enemies still alive, including any destroyed this frame.
    pub fn enemies_remaining(&self) -> usize {
        self.registry.get_entities_by_group("enemies").len()
    }
}
