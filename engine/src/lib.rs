//! Entity-component-system core for a small 2D game engine.
//!
//! Game objects are plain [`ecs::Entity`] ids. Data lives in per-type component pools owned by
//! the [`ecs::Registry`], and game logic lives in systems that the registry keeps supplied with
//! the entities matching their required components. Entity creation, destruction and
//! component changes are applied to system membership once per frame by
//! [`ecs::Registry::update`].

// Lets `#[derive(Component)]` expand to `::tiny2d_engine::...` inside this crate as well.
extern crate self as tiny2d_engine;

pub mod ecs;
