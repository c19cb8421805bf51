//! Game entities built on `Shape`
//!
//! Agents are steerable diamonds that pick up, carry and fire projectiles.
//! Projectiles are small squares that bounce off the arena walls. Relations
//! between them are plain pool indices owned by the arena.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::motion::{ContactPolicy, DragModel, integrate};
use super::region::RegionGrid;
use super::shape::{Bounds, Shape};
use crate::consts::ROOT_TWO_OVER_TWO;
use crate::magnitude;

/// Index of an agent in the arena pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

/// Index of a projectile in the arena pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub usize);

/// A bouncing projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    shape: Shape,
    /// Agent carrying or last firing this projectile
    owner: Option<AgentId>,
    live: bool,
}

impl Projectile {
    /// Square projectile of side `size` centred at `spawn`
    pub fn new(spawn: Vec2, size: i32, bounds: Bounds, divisions: usize) -> Self {
        let span = size / 2;
        let outline = [
            IVec2::new(span, span),
            IVec2::new(-span, span),
            IVec2::new(-span, -span),
            IVec2::new(span, -span),
        ];
        Self {
            shape: Shape::new(spawn, &outline, bounds, divisions)
                .with_policy(ContactPolicy::Reflect),
            owner: None,
            live: false,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn owner(&self) -> Option<AgentId> {
        self.owner
    }

    /// In flight after being fired
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Lying on the field, free to be picked up
    pub fn is_idle(&self) -> bool {
        !self.live && self.owner.is_none()
    }

    pub(crate) fn attach(&mut self, owner: AgentId) {
        self.owner = Some(owner);
        self.live = false;
        self.shape.set_velocity(Vec2::ZERO);
    }

    pub(crate) fn launch(&mut self, owner: AgentId, vel: Vec2) {
        self.owner = Some(owner);
        self.shape.set_velocity(vel);
        self.live = true;
    }

    /// Advance one tick. A live projectile that comes to rest is spent:
    /// it stops being live and forgets its owner.
    pub fn integrate<D: DragModel + ?Sized>(&mut self, drag: &D) -> bool {
        let moved = integrate(&mut self.shape, drag);
        if self.live && self.shape.is_resting() {
            self.live = false;
            self.owner = None;
        }
        moved
    }

    pub fn reset(&mut self) {
        self.shape.reset();
        self.owner = None;
        self.live = false;
    }
}

/// A steerable player entity
#[derive(Debug, Clone)]
pub struct Agent {
    shape: Shape,
    carried: Option<ProjectileId>,
    /// Most recent non-zero velocity, used to aim launches
    last_vel: Vec2,
}

impl Agent {
    /// Diamond agent of width `size` centred at `spawn`.
    ///
    /// The centre is kept half a size away from every edge of `bounds`, but
    /// broad-phase regions are laid over all of `bounds` like every other entity.
    pub fn new(spawn: Vec2, size: i32, bounds: Bounds, divisions: usize) -> Self {
        let span = size / 2;
        let outline = [
            IVec2::new(span, 0),
            IVec2::new(0, span),
            IVec2::new(-span, 0),
            IVec2::new(0, -span),
        ];
        Self {
            shape: Shape::new(spawn, &outline, bounds.inset(span), divisions)
                .with_grid(RegionGrid::new(&bounds, divisions)),
            carried: None,
            last_vel: Vec2::X,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn carried(&self) -> Option<ProjectileId> {
        self.carried
    }

    pub fn is_loaded(&self) -> bool {
        self.carried.is_some()
    }

    pub fn last_velocity(&self) -> Vec2 {
        self.last_vel
    }

    /// Steer by `dir` (each component in -1..=1)
    ///
    /// Diagonal input is scaled so the total push equals `acceleration`.
    pub fn accelerate(&mut self, dir: IVec2, acceleration: f32) {
        let dir = dir.clamp(IVec2::splat(-1), IVec2::ONE);
        let mut push = dir.as_vec2() * acceleration;
        if dir.x != 0 && dir.y != 0 {
            push *= ROOT_TWO_OVER_TWO;
        }
        self.shape.add_velocity(push);
    }

    /// Advance one tick, remembering the heading for later launches
    pub fn integrate<D: DragModel + ?Sized>(&mut self, drag: &D) -> bool {
        let moved = integrate(&mut self.shape, drag);
        if !self.shape.is_resting() {
            self.last_vel = self.shape.velocity();
        }
        moved
    }

    /// Velocity a projectile leaves with when fired now
    ///
    /// Along a single axis the launch speed is added outward on that axis.
    /// Otherwise the heading is kept and the speed grows by `launch_speed`.
    pub fn launch_velocity(&self, launch_speed: f32) -> Vec2 {
        let last = self.last_vel;
        if last.x == 0.0 {
            Vec2::new(0.0, outward(last.y, launch_speed))
        } else if last.y == 0.0 {
            Vec2::new(outward(last.x, launch_speed), 0.0)
        } else {
            let speed = magnitude(last.x, last.y);
            last / speed * (speed + launch_speed)
        }
    }

    pub(crate) fn set_carried(&mut self, carried: Option<ProjectileId>) {
        self.carried = carried;
    }

    pub fn reset(&mut self) {
        self.shape.reset();
        self.carried = None;
    }
}

fn outward(value: f32, extra: f32) -> f32 {
    if value < 0.0 { value - extra } else { value + extra }
}
