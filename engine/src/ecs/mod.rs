pub mod component;
pub mod entity;
pub mod error;
pub mod registry;
pub mod signature;
pub mod storage;
pub mod system;

pub use component::Component;
pub use entity::{Entity, EntityMut, EntityRef};
pub use error::{EcsError, Result};
pub use registry::Registry;
pub use signature::{MAX_COMPONENTS, Signature};
pub use storage::Pool;
pub use system::{System, SystemState};
