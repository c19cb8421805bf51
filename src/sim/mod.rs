//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool index)
//! - No rendering or platform dependencies

pub mod arena;
pub mod entity;
pub mod motion;
pub mod region;
pub mod sat;
pub mod shape;

pub use arena::{AgentIntent, Arena, ArenaEvent, ArenaSnapshot, ProjectileSnapshot, TickInput};
pub use entity::{Agent, AgentId, Projectile, ProjectileId};
pub use motion::{ContactPolicy, DragModel, StandardDrag, integrate};
pub use region::{RegionGrid, RegionSet};
pub use sat::overlaps;
pub use shape::{Axis, Bounds, Extent, Projection, Shape, ShapeSnapshot, displacement};
