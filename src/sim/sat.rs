//! Separating Axis Theorem overlap test
//!
//! Two convex polygons are disjoint iff some edge normal of either one
//! separates their projections. Axes and the local projections of each
//! shape's own outline are precomputed, so a test only projects the other
//! shape's outline and the centre offset.

use super::shape::{Projection, Shape, displacement};

/// Exact overlap predicate for two translating convex shapes
///
/// Symmetric: the axes of both shapes are tried. Shapes whose broad-phase
/// regions do not intersect are rejected without any projection math.
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    test_direction(a, b) && test_direction(b, a)
}

/// Look for a separating axis among `b`'s axes
fn test_direction(a: &Shape, b: &Shape) -> bool {
    // Region ids are only comparable on the same grid
    if a.grid() == b.grid() && !a.regions().intersects(&b.regions()) {
        return false;
    }

    let offset = displacement(a, b);

    for (axis, own) in b.axes().iter().zip(b.projections()) {
        let center_dist = axis.project(offset);
        let other = Projection::of(*axis, a.vertices());

        // b's near side lies past a's far side along the axis
        if (center_dist >= 0.0 && center_dist > other.max - own.min)
            || (center_dist < 0.0 && center_dist < other.min - own.max)
        {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Agent, Projectile};
    use crate::sim::shape::tests::{polygon_strategy, square, square_at};
    use crate::sim::shape::{Bounds, Shape};
    use glam::{IVec2, Vec2};
    use proptest::prelude::*;

    fn triangle_at(x: f32, y: f32) -> Shape {
        let outline = [IVec2::new(0, -20), IVec2::new(20, 20), IVec2::new(-20, 20)];
        Shape::new(Vec2::new(x, y), &outline, Bounds::from_size(800, 800), 4)
    }

    fn diamond_at(x: f32, y: f32) -> Shape {
        let outline = [
            IVec2::new(12, 0),
            IVec2::new(0, 12),
            IVec2::new(-12, 0),
            IVec2::new(0, -12),
        ];
        Shape::new(Vec2::new(x, y), &outline, Bounds::from_size(800, 800), 4)
    }

    #[test]
    fn test_colocated_squares_overlap() {
        let a = square_at(400.0, 400.0);
        let b = square_at(400.0, 400.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_distant_squares_fast_reject() {
        let a = square_at(100.0, 100.0);
        let b = square_at(700.0, 700.0);
        assert!(!a.regions().intersects(&b.regions()));
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = square_at(400.0, 400.0);
        let b = square_at(420.0, 400.0);
        assert!(overlaps(&a, &b));

        let c = square_at(420.5, 400.0);
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn test_separated_in_same_region() {
        let a = square_at(330.0, 400.0);
        let b = square_at(370.0, 400.0);
        assert!(a.regions().intersects(&b.regions()));
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_overlap_across_region_line() {
        // Centres sit in neighbouring cells either side of x = 320
        let a = square_at(315.0, 400.0);
        let b = square_at(330.0, 400.0);
        assert_ne!(a.regions().as_slice()[0], b.regions().as_slice()[0]);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_diamond_corner_gap() {
        // Bounding boxes overlap but the diamond's sloped edge separates them
        let square = square_at(400.0, 400.0);
        let diamond = diamond_at(419.0, 419.0);
        assert!(!overlaps(&square, &diamond));
        assert!(!overlaps(&diamond, &square));

        let closer = diamond_at(412.0, 412.0);
        assert!(overlaps(&square, &closer));
    }

    #[test]
    fn test_triangle_needs_both_axis_sets() {
        // Only the triangle's sloped edge separates these two
        let tri = triangle_at(400.0, 400.0);
        let sq = square_at(425.0, 385.0);
        assert!(!overlaps(&tri, &sq));
        assert!(!overlaps(&sq, &tri));

        let inside = square_at(405.0, 400.0);
        assert!(overlaps(&tri, &inside));
    }

    #[test]
    fn test_agent_and_projectile_across_grid_line() {
        // Centres either side of x = 640 with the outlines overlapping by 6
        let bounds = Bounds::from_size(800, 800);
        let agent = Agent::new(Vec2::new(645.9, 400.0), 25, bounds, 4);
        let projectile = Projectile::new(Vec2::new(634.9, 400.0), 10, bounds, 4);
        assert_eq!(agent.shape().grid(), projectile.shape().grid());
        assert_eq!(agent.shape().grid().x_boundaries(), &[160, 320, 480, 640]);
        assert!(overlaps(agent.shape(), projectile.shape()));
        assert!(overlaps(projectile.shape(), agent.shape()));
    }

    #[test]
    fn test_different_grids_skip_fast_reject() {
        let bounds = Bounds::from_size(800, 800);
        let a = square_at(400.0, 400.0);
        let b = Shape::new(Vec2::new(405.0, 400.0), &square(10), bounds, 1);
        assert!(!a.regions().intersects(&b.regions()));
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));

        let far = Shape::new(Vec2::new(700.0, 700.0), &square(10), bounds, 1);
        assert!(!overlaps(&a, &far));
    }

    #[test]
    fn test_method_matches_free_function() {
        let a = square_at(400.0, 400.0);
        let b = diamond_at(410.0, 395.0);
        assert_eq!(a.overlaps(&b), overlaps(&a, &b));
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            a in polygon_strategy(),
            b in polygon_strategy(),
            pa in (100.0f32..700.0, 100.0f32..700.0),
            pb in (100.0f32..700.0, 100.0f32..700.0),
        ) {
            let bounds = Bounds::from_size(800, 800);
            let a = Shape::new(Vec2::new(pa.0, pa.1), &a, bounds, 4);
            let b = Shape::new(Vec2::new(pb.0, pb.1), &b, bounds, 4);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_disjoint_boxes_never_overlap(
            half_a in 1i32..40,
            half_b in 1i32..40,
            gap in 0.5f32..200.0,
            ax in 50.0f32..400.0,
            y in 50.0f32..750.0,
            dy in -30.0f32..30.0,
            divisions in 1usize..12,
        ) {
            let bounds = Bounds::from_size(800, 800);
            let bx = ax + (half_a + half_b) as f32 + gap;
            let a = Shape::new(Vec2::new(ax, y), &square(half_a), bounds, divisions);
            let b = Shape::new(Vec2::new(bx, y + dy), &square(half_b), bounds, divisions);
            prop_assert!(!overlaps(&a, &b));
        }

        #[test]
        fn prop_colocated_always_overlap(
            outline in polygon_strategy(),
            x in 0.0f32..800.0,
            y in 0.0f32..800.0,
            divisions in 1usize..12,
        ) {
            let bounds = Bounds::from_size(800, 800);
            let a = Shape::new(Vec2::new(x, y), &outline, bounds, divisions);
            let b = Shape::new(Vec2::new(x, y), &outline, bounds, divisions);
            prop_assert!(overlaps(&a, &b));
        }

        #[test]
        fn prop_agent_overlaps_nearby_projectile(
            x in 20.0f32..780.0,
            y in 20.0f32..780.0,
            dx in -6.0f32..6.0,
            dy in -6.0f32..6.0,
        ) {
            // The projectile centre stays inside the agent's diamond
            let bounds = Bounds::from_size(800, 800);
            let agent = Agent::new(Vec2::new(x, y), 25, bounds, 4);
            let projectile = Projectile::new(Vec2::new(x + dx, y + dy), 10, bounds, 4);
            prop_assert!(overlaps(agent.shape(), projectile.shape()));
            prop_assert!(overlaps(projectile.shape(), agent.shape()));
        }

        #[test]
        fn prop_agent_touches_projectile_edge_on(
            x in 20i32..760,
            y in 20i32..780,
            left in any::<bool>(),
        ) {
            // Diamond tip (12) meets the square's side (5) exactly
            let bounds = Bounds::from_size(800, 800);
            let gap = if left { -17.0 } else { 17.0 };
            let agent = Agent::new(Vec2::new(x as f32, y as f32), 25, bounds, 4);
            let projectile = Projectile::new(Vec2::new(x as f32 + gap, y as f32), 10, bounds, 4);
            prop_assert!(overlaps(agent.shape(), projectile.shape()));
            prop_assert!(overlaps(projectile.shape(), agent.shape()));
        }
    }
}
