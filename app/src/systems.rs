//! Game systems. Each one declares the components it needs and exposes its per-frame logic as
//! plain methods taking the registry.

use log::{debug, trace};
use tiny2d_engine::ecs::{Entity, Registry, System, SystemState};

use crate::components::{
    BoxCollider, Health, Lifetime, Projectile, ProjectileEmitter, RigidBody, Transform, Vec2,
};

/// Implements [`System`] for a struct with a `state: SystemState` field.
macro_rules! impl_system {
    ($($system:ty),* $(,)?) => {
        $(
            impl System for $system {
                fn state(&self) -> &SystemState {
                    &self.state
                }

                fn state_mut(&mut self) -> &mut SystemState {
                    &mut self.state
                }
            }
        )*
    };
}

impl_system!(
    MovementSystem,
    ProjectileEmitSystem,
    LifetimeSystem,
    CollisionSystem,
    DamageSystem,
);

/// Integrates velocity into position.
pub struct MovementSystem {
    state: SystemState,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self {
            state: SystemState::new().with::<Transform>().with::<RigidBody>(),
        }
    }

    pub fn update(&self, registry: &mut Registry, dt: f32) {
        for &entity in self.entities() {
            let Ok(body) = registry.get_component::<RigidBody>(entity) else {
                continue;
            };
            let velocity = body.velocity;
            if let Ok(transform) = registry.get_component_mut::<Transform>(entity) {
                transform.position += velocity * dt;
            }
        }
    }
}

/// Spawns projectiles from every emitter whose interval has elapsed.
pub struct ProjectileEmitSystem {
    state: SystemState,
}

impl ProjectileEmitSystem {
    pub fn new() -> Self {
        Self {
            state: SystemState::new()
                .with::<ProjectileEmitter>()
                .with::<Transform>(),
        }
    }

    /// Returns the number of projectiles spawned.
    pub fn update(&self, registry: &mut Registry, dt: f32) -> usize {
        let mut fired = 0;
        for &entity in self.entities() {
            let Ok(emitter) = registry.get_component_mut::<ProjectileEmitter>(entity) else {
                continue;
            };
            emitter.elapsed += dt;
            if emitter.interval <= 0.0 || emitter.elapsed < emitter.interval {
                continue;
            }
            emitter.elapsed -= emitter.interval;
            let emitter = *emitter;

            let Ok(transform) = registry.get_component::<Transform>(entity) else {
                continue;
            };
            let mut origin = transform.position;
            if let Ok(collider) = registry.get_component::<BoxCollider>(entity) {
                // Muzzle sits at the middle of the shooter's leading edge.
                origin += Vec2::new(
                    collider.width * transform.scale.x,
                    collider.height * transform.scale.y / 2.0,
                );
            }

            let projectile = spawn_projectile(registry, origin, &emitter);
            trace!("{entity} fired {projectile}");
            fired += 1;
        }
        fired
    }
}

fn spawn_projectile(registry: &mut Registry, origin: Vec2, emitter: &ProjectileEmitter) -> Entity {
    let projectile = registry.create_entity();
    registry
        .entity_mut(projectile)
        .group("projectiles")
        .add_component(Transform::at(origin))
        .add_component(RigidBody {
            velocity: emitter.projectile_velocity,
        })
        .add_component(BoxCollider::square(4.0))
        .add_component(Projectile {
            is_friendly: emitter.is_friendly,
            hit_damage: emitter.hit_damage,
        })
        .add_component(Lifetime {
            remaining: emitter.projectile_lifetime,
        });
    projectile
}

/// Counts down lifetimes and kills whatever runs out.
pub struct LifetimeSystem {
    state: SystemState,
}

impl LifetimeSystem {
    pub fn new() -> Self {
        Self {
            state: SystemState::new().with::<Lifetime>(),
        }
    }

    /// Returns the number of entities that expired this frame.
    pub fn update(&self, registry: &mut Registry, dt: f32) -> usize {
        let mut expired = 0;
        for &entity in self.entities() {
            let Ok(lifetime) = registry.get_component_mut::<Lifetime>(entity) else {
                continue;
            };
            lifetime.remaining -= dt;
            if lifetime.remaining <= 0.0 && !registry.is_pending_kill(entity) {
                registry.kill_entity(entity);
                expired += 1;
            }
        }
        expired
    }
}

/// Finds overlapping colliders.
pub struct CollisionSystem {
    state: SystemState,
}

/// World-space collider bounds.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self {
            state: SystemState::new().with::<Transform>().with::<BoxCollider>(),
        }
    }

    /// Every colliding pair, each reported once, in member order.
    pub fn detect(&self, registry: &Registry) -> Vec<(Entity, Entity)> {
        let bounds: Vec<(Entity, Bounds)> = self
            .entities()
            .iter()
            .filter_map(|&entity| {
                let transform = registry.get_component::<Transform>(entity).ok()?;
                let collider = registry.get_component::<BoxCollider>(entity).ok()?;
                let min = transform.position + collider.offset;
                let size = Vec2::new(
                    collider.width * transform.scale.x,
                    collider.height * transform.scale.y,
                );
                Some((entity, Bounds { min, max: min + size }))
            })
            .collect();

        let mut collisions = Vec::new();
        for (i, (a, a_bounds)) in bounds.iter().enumerate() {
            for (b, b_bounds) in &bounds[i + 1..] {
                if a_bounds.overlaps(b_bounds) {
                    trace!("{a} collided with {b}");
                    collisions.push((*a, *b));
                }
            }
        }
        collisions
    }
}

/// Applies projectile hits to entities with health.
pub struct DamageSystem {
    state: SystemState,
}

/// What a collision did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Nothing took damage.
    None,
    /// The target was damaged and survived.
    Damaged(Entity),
    /// The target's health reached zero.
    Destroyed(Entity),
}

impl DamageSystem {
    pub fn new() -> Self {
        Self {
            state: SystemState::new().with::<Health>().with::<BoxCollider>(),
        }
    }

    /// Resolve a collision between `a` and `b`.
    ///
    /// Only a projectile hitting one of this system's members does anything. Friendly projectiles
    /// hurt everything but the entity tagged `"player"`, hostile ones hurt only the player. A
    /// projectile is spent on its first hit.
    pub fn on_collision(&self, registry: &mut Registry, a: Entity, b: Entity) -> Hit {
        let members = self.state();
        let (projectile, target) = if members.contains(b) && registry.has_component::<Projectile>(a)
        {
            (a, b)
        } else if members.contains(a) && registry.has_component::<Projectile>(b) {
            (b, a)
        } else {
            return Hit::None;
        };

        if registry.is_pending_kill(projectile) || registry.is_pending_kill(target) {
            return Hit::None;
        }
        let Ok(&Projectile {
            is_friendly,
            hit_damage,
        }) = registry.get_component::<Projectile>(projectile)
        else {
            return Hit::None;
        };
        if is_friendly == registry.entity_has_tag(target, "player") {
            return Hit::None;
        }

        registry.kill_entity(projectile);
        let Ok(health) = registry.get_component_mut::<Health>(target) else {
            return Hit::None;
        };
        health.percentage = health.percentage.saturating_sub(hit_damage);
        debug!("{target} hit by {projectile}, health now {}%", health.percentage);

        if health.percentage == 0 {
            registry.kill_entity(target);
            Hit::Destroyed(target)
        } else {
            Hit::Damaged(target)
        }
    }
}
