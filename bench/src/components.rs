//! Component and system types shared by the benchmarks.

use tiny2d_engine::ecs::{Component, System, SystemState};

/// 2D position (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// 2D velocity (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Sprite reference as it would be handed to a renderer (16 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Sprite {
    pub texture: u32,
    pub z_index: u32,
    pub width: f32,
    pub height: f32,
}

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Health {
    pub percentage: u8,
}

/// Entities with a position and a velocity.
#[derive(Debug)]
pub struct MovementSystem {
    state: SystemState,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self {
            state: SystemState::new().with::<Position>().with::<Velocity>(),
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn state(&self) -> &SystemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SystemState {
        &mut self.state
    }
}

/// Entities with a position and a sprite.
#[derive(Debug)]
pub struct RenderSystem {
    state: SystemState,
}

impl RenderSystem {
    pub fn new() -> Self {
        Self {
            state: SystemState::new().with::<Position>().with::<Sprite>(),
        }
    }
}

impl Default for RenderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RenderSystem {
    fn state(&self) -> &SystemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SystemState {
        &mut self.state
    }
}
