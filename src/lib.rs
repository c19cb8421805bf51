//! Spheroids - a two-player arena game kernel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (convex shapes, SAT overlap, drag integration, arena rounds)
//! - `settings`: Data-driven tuning loaded from JSON
//!
//! Rendering, input polling and frame pacing live outside this crate.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Number of region boundaries per axis (the grid has one more cell than this)
    pub const REGION_DIVS: usize = 4;

    /// Arena dimensions
    pub const ARENA_WIDTH: i32 = 800;
    pub const ARENA_HEIGHT: i32 = 800;

    /// Per-tick speed lost to drag
    pub const DRAG: f32 = 0.4;
    /// Per-tick speed gained while an agent is steered
    pub const ACCELERATION: f32 = 0.5;
    /// Speed added on top of the agent's own speed when firing
    pub const LAUNCH_SPEED: f32 = 20.0;

    /// Entity sizes (diameter of the diamond / side of the square)
    pub const AGENT_SIZE: i32 = 25;
    pub const AMMO_SIZE: i32 = 10;
    /// Projectiles in the pool (spawned in mirrored pairs)
    pub const AMMO_COUNT: usize = 10;

    /// Simulated milliseconds per tick
    pub const TICK_MS: u64 = 10;

    /// Scale applied to each axis of a diagonal steering input
    pub const ROOT_TWO_OVER_TWO: f32 = std::f32::consts::FRAC_1_SQRT_2;
}

/// Dot product of two integer points
#[inline]
pub fn dot(a: IVec2, b: IVec2) -> f32 {
    (a.x * b.x + a.y * b.y) as f32
}

/// Dot product of `p` with the axis vector `(1, slope)`
#[inline]
pub fn dot_slope(p: Vec2, slope: f32) -> f32 {
    p.x + slope * p.y
}

/// Euclidean length of `(x, y)`
#[inline]
pub fn magnitude(x: f32, y: f32) -> f32 {
    x.hypot(y)
}

/// Length of the axis vector `(1, slope)`
#[inline]
pub fn slope_magnitude(slope: f32) -> f32 {
    slope.hypot(1.0)
}
