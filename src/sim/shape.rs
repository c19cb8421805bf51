//! Convex polygon shapes
//!
//! A shape is a fixed, non-rotating convex outline translated around a
//! bounded area. Everything derived from the outline (SAT axes, their vertex
//! projections, the region grid) is computed once at construction. The only
//! runtime state is position and velocity, plus a lazily computed region set
//! that every position write throws away.

use std::cell::Cell;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::motion::ContactPolicy;
use super::region::{RegionGrid, RegionSet};
use crate::{dot_slope, slope_magnitude};

/// Axis-aligned rectangle of legal centre positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: IVec2,
    pub max: IVec2,
}

impl Bounds {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Bounds anchored at the origin
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(IVec2::ZERO, IVec2::new(width, height))
    }

    /// Shrink every side by `margin`
    pub fn inset(&self, margin: i32) -> Self {
        Self::new(self.min + IVec2::splat(margin), self.max - IVec2::splat(margin))
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x as f32
            && p.x <= self.max.x as f32
            && p.y >= self.min.y as f32
            && p.y <= self.max.y as f32
    }
}

/// A separating-axis candidate, stored as the slope of the edge normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Axis {
    /// Normal of a horizontal edge (infinite slope)
    Vertical,
    /// Direction `(1, slope)`
    Sloped(f32),
}

impl Axis {
    /// Axis normal to the edge running from `a` to `b`
    ///
    /// The negative reciprocal of the edge slope, `(b.x - a.x) / (a.y - b.y)`.
    /// A horizontal edge divides by zero and yields the vertical axis.
    pub fn normal_to(a: IVec2, b: IVec2) -> Self {
        debug_assert!(a != b, "degenerate polygon edge at {a}");
        let slope = (b.x - a.x) as f32 / (a.y - b.y) as f32;
        if slope.is_infinite() {
            Axis::Vertical
        } else {
            Axis::Sloped(slope)
        }
    }

    /// Slope of the axis, `±inf` folded to `+inf` for the vertical axis
    pub fn slope(&self) -> f32 {
        match self {
            Axis::Vertical => f32::INFINITY,
            Axis::Sloped(slope) => *slope,
        }
    }

    /// Scalar projection of `p` onto the axis
    #[inline]
    pub fn project(&self, p: Vec2) -> f32 {
        match self {
            Axis::Vertical => p.y,
            Axis::Sloped(slope) => dot_slope(p, *slope) / slope_magnitude(*slope),
        }
    }
}

/// Closed interval of projections onto one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Project every vertex onto `axis`
    pub fn of(axis: Axis, vertices: &[IVec2]) -> Self {
        vertices.iter().fold(
            Projection {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |acc, v| {
                let p = axis.project(v.as_vec2());
                Projection {
                    min: acc.min.min(p),
                    max: acc.max.max(p),
                }
            },
        )
    }
}

/// Extreme local vertex coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub min: IVec2,
    pub max: IVec2,
}

impl Extent {
    pub fn of(vertices: &[IVec2]) -> Self {
        vertices.iter().fold(
            Extent {
                min: IVec2::MAX,
                max: IVec2::MIN,
            },
            |acc, v| Extent {
                min: acc.min.min(*v),
                max: acc.max.max(*v),
            },
        )
    }
}

/// Read-only view of a shape for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Outline in world space
    pub vertices: Vec<Vec2>,
}

/// A translating convex polygon
#[derive(Debug, Clone)]
pub struct Shape {
    vertices: Vec<IVec2>,
    spawn: Vec2,
    pos: Vec2,
    vel: Vec2,
    bounds: Bounds,
    policy: ContactPolicy,
    axes: Vec<Axis>,
    projections: Vec<Projection>,
    extent: Extent,
    grid: RegionGrid,
    /// Cleared by `set_position`, refilled by `regions`
    region_cache: Cell<Option<RegionSet>>,
}

impl Shape {
    /// Build a shape centred at `spawn`.
    ///
    /// `vertices` must be an ordered convex outline relative to the centre.
    /// `divisions` is the number of region lines per axis across `bounds`.
    ///
    /// # Panics
    /// If fewer than three vertices are given or `divisions` is zero.
    pub fn new(spawn: Vec2, vertices: &[IVec2], bounds: Bounds, divisions: usize) -> Self {
        assert!(
            vertices.len() >= 3,
            "a convex shape needs at least 3 vertices, got {}",
            vertices.len()
        );

        let vertices = vertices.to_vec();
        let axes: Vec<Axis> = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(a, b)| Axis::normal_to(*a, *b))
            .collect();
        let projections = axes
            .iter()
            .map(|axis| Projection::of(*axis, &vertices))
            .collect();

        Self {
            extent: Extent::of(&vertices),
            grid: RegionGrid::new(&bounds, divisions),
            vertices,
            spawn,
            pos: spawn,
            vel: Vec2::ZERO,
            bounds,
            policy: ContactPolicy::default(),
            axes,
            projections,
            region_cache: Cell::new(None),
        }
    }

    /// Set how the shape behaves when it reaches its bounds
    pub fn with_policy(mut self, policy: ContactPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a region grid laid over a different area than the movement bounds
    ///
    /// Shapes only share broad-phase regions when they share a grid, so
    /// entities with tighter movement bounds should still be placed on the
    /// grid of the full playing area.
    pub fn with_grid(mut self, grid: RegionGrid) -> Self {
        self.grid = grid;
        self.region_cache.set(None);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Move the centre. This is the only way position changes.
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.region_cache.set(None);
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    pub fn add_velocity(&mut self, delta: Vec2) {
        self.vel += delta;
    }

    pub fn is_resting(&self) -> bool {
        self.vel == Vec2::ZERO
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn policy(&self) -> ContactPolicy {
        self.policy
    }

    pub fn vertices(&self) -> &[IVec2] {
        &self.vertices
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// Broad-phase regions for the current position (memoised)
    pub fn regions(&self) -> RegionSet {
        if let Some(regions) = self.region_cache.get() {
            return regions;
        }
        let regions = self.grid.locate(self.pos, &self.extent);
        self.region_cache.set(Some(regions));
        regions
    }

    pub fn has_cached_regions(&self) -> bool {
        self.region_cache.get().is_some()
    }

    /// Back to the spawn point at rest
    pub fn reset(&mut self) {
        self.vel = Vec2::ZERO;
        self.set_position(self.spawn);
    }

    /// Outline translated to the current position
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |v| self.pos + v.as_vec2())
    }

    pub fn snapshot(&self) -> ShapeSnapshot {
        ShapeSnapshot {
            position: self.pos,
            velocity: self.vel,
            vertices: self.world_vertices().collect(),
        }
    }

    /// Exact SAT overlap test against `other`
    pub fn overlaps(&self, other: &Shape) -> bool {
        super::sat::overlaps(self, other)
    }
}

/// Vector from `a`'s centre to `b`'s centre
#[inline]
pub fn displacement(a: &Shape, b: &Shape) -> Vec2 {
    b.position() - a.position()
}
