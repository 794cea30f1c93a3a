use crate::bodies::Body;
use crate::math::{Aabb, PixelRect, UnitMapper, Vector2};
use crate::shapes::{Obb, ObstacleShape};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// An immovable collision target derived from a non-activated page element.
///
/// The source layout rect is retained so the obstacle can be re-placed when
/// the viewport changes. Obstacles carry no physics state of their own.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct StaticObstacle {
    /// Key of the source page element
    pub element_id: u64,

    /// The element's layout rect in CSS pixels
    pub source_rect: PixelRect,

    /// Rotation of the element in radians; zero means an axis-aligned region
    pub angle: f32,

    /// The derived world-space collision region
    pub shape: ObstacleShape,
}

/// Tracks static obstacles and dispatches per-step collision resolution.
///
/// The system is a thin dispatcher: `apply` hands the obstacle list to the
/// body's own penetration methods, so collision response stays
/// body-type-specific while obstacle bookkeeping is shared. The obstacle
/// list is never mutated during a step.
pub struct CollisionSystem {
    mapper: UnitMapper,
    obstacles: Vec<StaticObstacle>,
    world_bounds: Aabb,
}

impl CollisionSystem {
    /// Creates a system for the given unit mapper; the containment region
    /// starts as the full mapped world
    pub fn new(mapper: UnitMapper) -> Self {
        Self {
            mapper,
            obstacles: Vec::new(),
            world_bounds: Aabb::new(Vector2::zero(), mapper.world_size()),
        }
    }

    /// The unit mapper currently in effect
    #[inline]
    pub fn mapper(&self) -> &UnitMapper {
        &self.mapper
    }

    /// The containment region bodies are clamped into
    #[inline]
    pub fn world_bounds(&self) -> Aabb {
        self.world_bounds
    }

    /// Re-derives the unit mapper for a new viewport and re-places every
    /// obstacle from its retained source rect
    pub fn set_viewport_dimensions(&mut self, width_px: f32, height_px: f32) {
        self.mapper = UnitMapper::from_viewport(width_px, height_px);
        self.world_bounds = Aabb::new(Vector2::zero(), self.mapper.world_size());
        for i in 0..self.obstacles.len() {
            let obstacle = self.obstacles[i];
            self.obstacles[i].shape =
                Self::derive_shape(&self.mapper, &obstacle.source_rect, obstacle.angle);
        }
    }

    /// Rebuilds the obstacle set from the current element layout
    pub fn refresh(&mut self, rects: &[(u64, PixelRect)]) {
        self.obstacles.clear();
        for (element_id, rect) in rects {
            self.add_obstacle(*element_id, *rect, 0.0);
        }
    }

    /// Adds one obstacle from a layout rect; a non-zero angle produces an
    /// oriented region
    pub fn add_obstacle(&mut self, element_id: u64, rect: PixelRect, angle: f32) {
        let shape = Self::derive_shape(&self.mapper, &rect, angle);
        self.obstacles.push(StaticObstacle {
            element_id,
            source_rect: rect,
            angle,
            shape,
        });
    }

    /// Removes the obstacle for an element; returns whether one was removed
    pub fn remove_obstacle(&mut self, element_id: u64) -> bool {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.element_id != element_id);
        self.obstacles.len() != before
    }

    /// Read-only view of the tracked obstacles
    #[inline]
    pub fn obstacles(&self) -> &[StaticObstacle] {
        &self.obstacles
    }

    /// Snapshot of every obstacle's world AABB, for debug overlays and the
    /// broad phase
    pub fn static_aabbs(&self) -> Vec<Aabb> {
        self.obstacles.iter().map(|o| o.shape.aabb()).collect()
    }

    /// Resolves one body against every static obstacle and clamps it into
    /// the containment region
    pub fn apply(&self, body: &mut dyn Body, damping: f32) {
        body.collide_with_obstacles(&self.obstacles, damping);
        body.constrain_within_aabb(&self.world_bounds, damping);
    }

    fn derive_shape(mapper: &UnitMapper, rect: &PixelRect, angle: f32) -> ObstacleShape {
        let (center, half_extents) = mapper.rect_to_world(rect);
        if crate::math::approx_zero(angle) {
            ObstacleShape::Aabb(Aabb::from_center_half_extents(center, half_extents))
        } else {
            ObstacleShape::Obb(Obb::new(center, half_extents, angle))
        }
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(UnitMapper::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_change_replaces_obstacles() {
        let mut system = CollisionSystem::default();
        system.add_obstacle(7, PixelRect::new(0.0, 0.0, 512.0, 384.0), 0.0);
        let before = system.static_aabbs()[0];

        system.set_viewport_dimensions(2048.0, 1536.0);
        let after = system.static_aabbs()[0];
        // same pixels cover half the world extent at double the density
        assert!((before.extents().x - 2.0 * after.extents().x).abs() < 1.0e-4);
    }

    #[test]
    fn remove_obstacle_by_element_id() {
        let mut system = CollisionSystem::default();
        system.add_obstacle(1, PixelRect::new(0.0, 0.0, 100.0, 100.0), 0.0);
        system.add_obstacle(2, PixelRect::new(200.0, 0.0, 100.0, 100.0), 0.0);
        assert!(system.remove_obstacle(1));
        assert!(!system.remove_obstacle(1));
        assert_eq!(system.obstacles().len(), 1);
        assert_eq!(system.obstacles()[0].element_id, 2);
    }
}
