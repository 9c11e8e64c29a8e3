//! Screen-space geometry used by layout, hit testing, and rendering.
//!
//! All coordinates are canvas-local logical pixels with the origin at the
//! top-left corner and Y growing downwards.

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub const fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(ScreenPoint::new(x, y), ScreenPoint::new(x + width, y + height))
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Grow the rectangle horizontally by `margin` pixels on both sides.
    pub fn widened(&self, margin: f32) -> Self {
        Self::new(
            ScreenPoint::new(self.min.x - margin, self.min.y),
            ScreenPoint::new(self.max.x + margin, self.max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_edge_inclusive() {
        let rect = ScreenRect::from_origin_size(10.0, 10.0, 5.0, 5.0);
        assert!(rect.contains(ScreenPoint::new(10.0, 15.0)));
        assert!(!rect.contains(ScreenPoint::new(15.1, 12.0)));
    }

    #[test]
    fn widened_keeps_vertical_extent() {
        let rect = ScreenRect::from_origin_size(10.0, 0.0, 4.0, 8.0).widened(3.0);
        assert_eq!(rect.min, ScreenPoint::new(7.0, 0.0));
        assert_eq!(rect.max, ScreenPoint::new(17.0, 8.0));
    }
}
