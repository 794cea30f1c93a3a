use crate::math::Vector2;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// CSS reference density: one physical meter at 96 dpi
pub const CSS_PIXELS_PER_METER: f32 = 3779.5276;

/// The reference viewport in pixels (width, height)
pub const REFERENCE_VIEWPORT_PX: (f32, f32) = (1024.0, 768.0);

/// The canonical world extent the reference viewport maps onto, in meters
pub const REFERENCE_WORLD_M: (f32, f32) = (4.0, 3.0);

/// A DOM layout rectangle in CSS pixels, y growing downward
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    /// Creates a new pixel rectangle
    #[inline]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }
}

/// Converts between CSS pixel space and the canonical physics space.
///
/// The mapping is anchored to the reference viewport: 1024x768 px covers a
/// 4m x 3m world, so one canonical meter is 256 px at reference size. The
/// vertical axis flips because DOM y grows downward while physics y grows
/// upward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct UnitMapper {
    pixels_per_meter: f32,
    viewport_px: Vector2,
    world_size: Vector2,
}

impl UnitMapper {
    /// Creates a mapper for the given viewport dimensions in pixels
    pub fn from_viewport(width_px: f32, height_px: f32) -> Self {
        let pixels_per_meter = width_px / REFERENCE_WORLD_M.0;
        Self {
            pixels_per_meter,
            viewport_px: Vector2::new(width_px, height_px),
            world_size: Vector2::new(REFERENCE_WORLD_M.0, height_px / pixels_per_meter),
        }
    }

    /// Returns the canonical world size covered by the viewport, in meters
    #[inline]
    pub fn world_size(&self) -> Vector2 {
        self.world_size
    }

    /// Returns the viewport dimensions in pixels
    #[inline]
    pub fn viewport_px(&self) -> Vector2 {
        self.viewport_px
    }

    /// Converts a pixel length to meters
    #[inline]
    pub fn px_to_meters(&self, px: f32) -> f32 {
        px / self.pixels_per_meter
    }

    /// Converts a length in meters to pixels
    #[inline]
    pub fn meters_to_px(&self, meters: f32) -> f32 {
        meters * self.pixels_per_meter
    }

    /// Converts a DOM point (y-down) to a canonical world point (y-up)
    #[inline]
    pub fn point_to_world(&self, px: f32, py: f32) -> Vector2 {
        Vector2::new(
            self.px_to_meters(px),
            self.world_size.y - self.px_to_meters(py),
        )
    }

    /// Places a DOM layout rect in world space as (center, half extents)
    pub fn rect_to_world(&self, rect: &PixelRect) -> (Vector2, Vector2) {
        let half_extents = Vector2::new(
            self.px_to_meters(rect.width) * 0.5,
            self.px_to_meters(rect.height) * 0.5,
        );
        let top_left = self.point_to_world(rect.left, rect.top);
        let center = Vector2::new(top_left.x + half_extents.x, top_left.y - half_extents.y);
        (center, half_extents)
    }
}

impl Default for UnitMapper {
    fn default() -> Self {
        Self::from_viewport(REFERENCE_VIEWPORT_PX.0, REFERENCE_VIEWPORT_PX.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn reference_viewport_spans_reference_world() {
        let mapper = UnitMapper::default();
        let size = mapper.world_size();
        assert!(approx_eq(size.x, 4.0));
        assert!(approx_eq(size.y, 3.0));
    }

    #[test]
    fn dom_origin_maps_to_top_left_world() {
        let mapper = UnitMapper::default();
        let p = mapper.point_to_world(0.0, 0.0);
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(p.y, 3.0));
    }

    #[test]
    fn rect_center_round_trip() {
        let mapper = UnitMapper::default();
        let (center, half) = mapper.rect_to_world(&PixelRect::new(256.0, 192.0, 512.0, 384.0));
        assert!(approx_eq(center.x, 2.0));
        assert!(approx_eq(center.y, 1.5));
        assert!(approx_eq(half.x, 1.0));
        assert!(approx_eq(half.y, 0.75));
    }
}
