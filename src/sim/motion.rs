//! Per-tick motion integration
//!
//! Velocity is damped by a pluggable drag model, then added to position.
//! Shapes that leave their bounds are either stopped at the edge or bounced
//! back, depending on their contact policy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::Shape;
use crate::consts::DRAG;
use crate::magnitude;

/// Computes the per-tick velocity change caused by drag
pub trait DragModel {
    /// Delta to add to `vel` for a shape at `pos`
    fn drag(&self, pos: Vec2, vel: Vec2) -> Vec2;
}

impl<F> DragModel for F
where
    F: Fn(Vec2, Vec2) -> Vec2,
{
    fn drag(&self, pos: Vec2, vel: Vec2) -> Vec2 {
        self(pos, vel)
    }
}

/// Constant-magnitude drag that never reverses a velocity component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardDrag {
    /// Speed removed per tick along the direction of travel
    pub coefficient: f32,
}

impl Default for StandardDrag {
    fn default() -> Self {
        Self { coefficient: DRAG }
    }
}

impl StandardDrag {
    pub fn new(coefficient: f32) -> Self {
        Self { coefficient }
    }
}

impl DragModel for StandardDrag {
    fn drag(&self, _pos: Vec2, vel: Vec2) -> Vec2 {
        let speed = vel.abs();
        let limit = if vel.x != 0.0 && vel.y != 0.0 {
            // Split the coefficient along the direction of travel
            speed / magnitude(vel.x, vel.y) * self.coefficient
        } else {
            Vec2::splat(self.coefficient)
        };

        // Opposes travel; a resting axis gets a zero delta
        -signum_or_zero(vel) * speed.min(limit)
    }
}

fn signum_or_zero(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x == 0.0 { 0.0 } else { v.x.signum() },
        if v.y == 0.0 { 0.0 } else { v.y.signum() },
    )
}

/// What happens when a shape reaches the edge of its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactPolicy {
    /// Stop at the edge, zeroing velocity on that axis
    #[default]
    Clamp,
    /// Mirror back inside and invert velocity on that axis
    Reflect,
}

/// Advance `shape` by one tick.
///
/// A resting shape is left untouched and the drag model is not consulted.
/// Returns whether the shape moved.
pub fn integrate<D: DragModel + ?Sized>(shape: &mut Shape, drag: &D) -> bool {
    if shape.is_resting() {
        return false;
    }

    let vel = shape.velocity() + drag.drag(shape.position(), shape.velocity());
    let target = shape.position() + vel;
    let bounds = *shape.bounds();
    let (min, max) = (bounds.min.as_vec2(), bounds.max.as_vec2());

    let contact: fn(f32, f32, f32, f32) -> (f32, f32) = match shape.policy() {
        ContactPolicy::Clamp => clamp_axis,
        ContactPolicy::Reflect => reflect_axis,
    };
    let (x, vx) = contact(target.x, vel.x, min.x, max.x);
    let (y, vy) = contact(target.y, vel.y, min.y, max.y);

    shape.set_velocity(Vec2::new(vx, vy));
    shape.set_position(Vec2::new(x, y));
    true
}

fn clamp_axis(value: f32, vel: f32, min: f32, max: f32) -> (f32, f32) {
    let value = value.clamp(min, max);
    if value <= min || value >= max {
        (value, 0.0)
    } else {
        (value, vel)
    }
}

fn reflect_axis(value: f32, vel: f32, min: f32, max: f32) -> (f32, f32) {
    // Mirror about the crossed edge; the clamp catches overshoots wider than the bounds
    if value < min {
        ((2.0 * min - value).min(max), -vel)
    } else if value > max {
        ((2.0 * max - value).max(min), -vel)
    } else {
        (value, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::tests::square_at;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn no_drag(_: Vec2, _: Vec2) -> Vec2 {
        Vec2::ZERO
    }

    #[test]
    fn test_resting_shape_is_untouched() {
        let mut shape = square_at(400.0, 400.0);
        let regions = shape.regions();
        let calls = Cell::new(0);
        let counting = |_: Vec2, _: Vec2| {
            calls.set(calls.get() + 1);
            Vec2::new(-1.0, -1.0)
        };

        assert!(!integrate(&mut shape, &counting));
        assert_eq!(calls.get(), 0);
        assert_eq!(shape.position(), Vec2::new(400.0, 400.0));
        assert!(shape.has_cached_regions());
        assert_eq!(shape.regions(), regions);
    }

    #[test]
    fn test_drag_then_move() {
        let mut shape = square_at(400.0, 400.0);
        shape.set_velocity(Vec2::new(3.0, 0.0));
        let _ = shape.regions();

        let drag = |_: Vec2, _: Vec2| Vec2::new(-0.4, 0.0);
        assert!(integrate(&mut shape, &drag));

        assert!((shape.velocity().x - 2.6).abs() < 1e-6);
        assert_eq!(shape.velocity().y, 0.0);
        assert!((shape.position().x - 402.6).abs() < 1e-4);
        assert_eq!(shape.position().y, 400.0);
        assert!(!shape.has_cached_regions());
    }

    #[test]
    fn test_drag_sees_pre_move_state() {
        let mut shape = square_at(100.0, 200.0);
        shape.set_velocity(Vec2::new(1.0, 2.0));
        let seen = Cell::new((Vec2::ZERO, Vec2::ZERO));
        let recording = |pos: Vec2, vel: Vec2| {
            seen.set((pos, vel));
            Vec2::ZERO
        };

        integrate(&mut shape, &recording);
        assert_eq!(seen.get(), (Vec2::new(100.0, 200.0), Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_clamp_stops_at_edge() {
        let mut shape = square_at(795.0, 400.0);
        shape.set_velocity(Vec2::new(10.0, 3.0));

        integrate(&mut shape, &no_drag);
        assert_eq!(shape.position(), Vec2::new(800.0, 403.0));
        assert_eq!(shape.velocity(), Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_clamp_low_edge() {
        let mut shape = square_at(4.0, 2.0);
        shape.set_velocity(Vec2::new(-10.0, -10.0));

        integrate(&mut shape, &no_drag);
        assert_eq!(shape.position(), Vec2::ZERO);
        assert!(shape.is_resting());
    }

    #[test]
    fn test_reflect_bounces() {
        let mut shape = square_at(795.0, 5.0).with_policy(ContactPolicy::Reflect);
        shape.set_velocity(Vec2::new(10.0, -8.0));

        integrate(&mut shape, &no_drag);
        assert_eq!(shape.position(), Vec2::new(795.0, 3.0));
        assert_eq!(shape.velocity(), Vec2::new(-10.0, 8.0));
    }

    #[test]
    fn test_reflect_large_overshoot_stays_inside() {
        let mut shape = square_at(10.0, 400.0).with_policy(ContactPolicy::Reflect);
        shape.set_velocity(Vec2::new(-5000.0, 0.0));

        integrate(&mut shape, &no_drag);
        assert!(shape.bounds().contains(shape.position()));
        assert_eq!(shape.velocity().x, 5000.0);
    }

    #[test]
    fn test_standard_drag_single_axis() {
        let drag = StandardDrag::default();
        assert_eq!(drag.drag(Vec2::ZERO, Vec2::new(3.0, 0.0)), Vec2::new(-0.4, 0.0));
        assert_eq!(drag.drag(Vec2::ZERO, Vec2::new(0.0, -3.0)), Vec2::new(0.0, 0.4));
        // Never more than the remaining speed
        assert_eq!(drag.drag(Vec2::ZERO, Vec2::new(0.1, 0.0)), Vec2::new(-0.1, 0.0));
        assert_eq!(drag.drag(Vec2::ZERO, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_standard_drag_diagonal() {
        let drag = StandardDrag::new(0.5);
        let delta = drag.drag(Vec2::ZERO, Vec2::new(3.0, -4.0));
        assert!((delta.x + 0.3).abs() < 1e-6);
        assert!((delta.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_standard_drag_brings_shape_to_rest() {
        let mut shape = square_at(400.0, 400.0);
        shape.set_velocity(Vec2::new(2.0, -1.0));
        let drag = StandardDrag::default();

        let mut ticks = 0;
        while integrate(&mut shape, &drag) {
            ticks += 1;
            assert!(ticks < 100, "drag never settled");
        }
        assert!(shape.is_resting());
    }

    proptest! {
        #[test]
        fn prop_drag_never_overshoots(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            coefficient in 0.0f32..5.0,
        ) {
            let vel = Vec2::new(vx, vy);
            let next = vel + StandardDrag::new(coefficient).drag(Vec2::ZERO, vel);
            prop_assert!(next.x * vel.x >= 0.0);
            prop_assert!(next.y * vel.y >= 0.0);
            prop_assert!(next.x.abs() <= vel.x.abs());
            prop_assert!(next.y.abs() <= vel.y.abs());
        }
    }
}
