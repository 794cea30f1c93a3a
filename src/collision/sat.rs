//! Narrow-phase intersection tests and the contact response primitive.

use crate::math::{Aabb, Vector2};
use crate::shapes::Obb;

/// Result of a narrow-phase shape test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Whether the shapes overlap
    pub collided: bool,

    /// Penetration depth along the separating axis of least overlap
    pub depth: f32,

    /// Unit contact normal, pointing from the AABB toward the OBB
    pub normal: Vector2,

    /// Minimum translation vector resolving the overlap
    pub mtv: Vector2,
}

impl Contact {
    /// A no-contact result with zero MTV
    #[inline]
    pub fn separated() -> Self {
        Self {
            collided: false,
            depth: 0.0,
            normal: Vector2::zero(),
            mtv: Vector2::zero(),
        }
    }
}

/// Projects a corner set onto an axis, returning the covered interval
fn project(corners: &[Vector2], axis: Vector2) -> (f32, f32) {
    let mut min = corners[0].dot(&axis);
    let mut max = min;
    for corner in corners.iter().skip(1) {
        let d = corner.dot(&axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Separating Axis Theorem test of an oriented box against an axis-aligned
/// box.
///
/// Projects both corner sets onto four axes: the OBB's two local axes first,
/// then the world axes. Any non-positive overlap proves separation. The
/// minimum-overlap axis defines the MTV; ties keep the first axis in test
/// order, and the normal's sign is chosen to point from the AABB toward the
/// OBB.
pub fn obb_vs_aabb(obb: &Obb, aabb: &Aabb) -> Contact {
    let obb_corners = obb.corners();
    let aabb_corners = [
        aabb.min,
        Vector2::new(aabb.max.x, aabb.min.y),
        aabb.max,
        Vector2::new(aabb.min.x, aabb.max.y),
    ];

    let [obb_x, obb_y] = obb.axes();
    let axes = [obb_x, obb_y, Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)];

    let mut depth = f32::MAX;
    let mut best_axis = axes[0];

    for axis in axes {
        let (min_a, max_a) = project(&obb_corners, axis);
        let (min_b, max_b) = project(&aabb_corners, axis);
        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap <= 0.0 {
            return Contact::separated();
        }
        if overlap < depth {
            depth = overlap;
            best_axis = axis;
        }
    }

    let mut normal = best_axis;
    if normal.dot(&(obb.center - aabb.center())) < 0.0 {
        normal = -normal;
    }

    Contact {
        collided: true,
        depth,
        normal,
        mtv: normal * depth,
    }
}

/// Closest-point circle-vs-AABB penetration test; returns the push-out
/// vector when the circle overlaps the box.
///
/// A center inside the box picks the smallest of four candidate separating
/// distances, in left/right/bottom/top order to match the SAT tie-break
/// convention.
pub fn circle_aabb_push(center: Vector2, radius: f32, aabb: &Aabb) -> Option<Vector2> {
    if aabb.contains_point(center) {
        let left = center.x - aabb.min.x + radius;
        let right = aabb.max.x - center.x + radius;
        let bottom = center.y - aabb.min.y + radius;
        let top = aabb.max.y - center.y + radius;

        let mut depth = left;
        let mut push = Vector2::new(-left, 0.0);
        if right < depth {
            depth = right;
            push = Vector2::new(right, 0.0);
        }
        if bottom < depth {
            depth = bottom;
            push = Vector2::new(0.0, -bottom);
        }
        if top < depth {
            push = Vector2::new(0.0, top);
        }
        return Some(push);
    }

    let closest = aabb.closest_point(center);
    let delta = center - closest;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius || dist_sq <= crate::math::EPSILON * crate::math::EPSILON {
        return None;
    }
    let dist = dist_sq.sqrt();
    Some(delta / dist * (radius - dist))
}

/// Applies restitution and friction to a contact velocity.
///
/// The velocity splits into a component along the unit `normal` and a
/// tangential remainder; the normal component reflects scaled by
/// `restitution` (0 absorbs, 1 fully reflects) and the tangential component
/// shrinks by `1 - friction`. Callers apply this once per contact per step.
pub fn apply_restitution_friction(
    velocity: Vector2,
    normal: Vector2,
    restitution: f32,
    friction: f32,
) -> Vector2 {
    let normal_speed = velocity.dot(&normal);
    let normal_part = normal * normal_speed;
    let tangent_part = velocity - normal_part;
    tangent_part * (1.0 - friction) - normal_part * restitution
}
