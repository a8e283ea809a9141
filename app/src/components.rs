//! Game components. Plain data, no behavior beyond small math helpers.

use std::ops::{Add, AddAssign, Mul};

use tiny2d_engine::ecs::Component;

/// A 2D vector in world units.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    /// Degrees, clockwise.
    pub rotation: f32,
}

impl Transform {
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// World units per second.
    pub velocity: Vec2,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    /// 0 to 100.
    pub percentage: u8,
}

impl Default for Health {
    fn default() -> Self {
        Self { percentage: 100 }
    }
}

/// Seconds left before the entity is destroyed.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
}

/// Axis-aligned box, anchored at the transform's position plus `offset`, scaled with it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
}

impl BoxCollider {
    pub const fn square(size: f32) -> Self {
        Self {
            width: size,
            height: size,
            offset: Vec2::ZERO,
        }
    }
}

/// A projectile in flight.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Friendly projectiles hurt enemies, hostile ones hurt the player.
    pub is_friendly: bool,
    pub hit_damage: u8,
}

/// Fires projectiles on a fixed interval.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileEmitter {
    pub projectile_velocity: Vec2,
    /// Seconds between shots.
    pub interval: f32,
    /// Lifetime of each projectile in seconds.
    pub projectile_lifetime: f32,
    pub hit_damage: u8,
    pub is_friendly: bool,
    /// Seconds since the last shot.
    pub elapsed: f32,
}
