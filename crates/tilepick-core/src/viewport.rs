//! Mapping between the visible viewport and the offscreen target.

use serde::{Deserialize, Serialize};

use crate::error::{PickError, Result};

/// Size of the visible viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ViewportSize {
    /// Creates a viewport size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Resolution of the offscreen pick target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TargetSize {
    /// Default pick target resolution, independent of the display size.
    pub const DEFAULT: Self = Self {
        width: 512,
        height: 512,
    };

    /// Creates a target size, rejecting empty targets.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Checks that the target has at least one pixel.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PickError::InvalidTargetSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Returns whether `(x, y)` is a pixel of the target.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A pixel of the offscreen target, in storage row order (bottom row first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetPixel {
    /// Column.
    pub x: u32,
    /// Storage row.
    pub y: u32,
}

/// Scales a viewport coordinate (origin top-left) to target space without
/// flipping rows. Returns `None` for points outside the viewport.
pub fn scale_to_target(
    x: f32,
    y: f32,
    viewport: ViewportSize,
    target: TargetSize,
) -> Option<(u32, u32)> {
    if viewport.width == 0 || viewport.height == 0 {
        return None;
    }
    if !(x >= 0.0 && y >= 0.0) {
        return None;
    }

    let tx = (x / viewport.width as f32 * target.width as f32).floor();
    let ty = (y / viewport.height as f32 * target.height as f32).floor();
    if tx >= target.width as f32 || ty >= target.height as f32 {
        return None;
    }

    Some((tx as u32, ty as u32))
}

/// Maps a viewport coordinate to the target pixel to read back.
///
/// Target rows are stored bottom-up, so the row is flipped.
pub fn map_to_target(
    x: f32,
    y: f32,
    viewport: ViewportSize,
    target: TargetSize,
) -> Option<TargetPixel> {
    let (tx, ty) = scale_to_target(x, y, viewport, target)?;
    Some(TargetPixel {
        x: tx,
        y: target.height - 1 - ty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_of_wide_viewport() {
        let viewport = ViewportSize::new(1024, 768);
        let target = TargetSize::DEFAULT;

        assert_eq!(scale_to_target(512.0, 384.0, viewport, target), Some((256, 256)));
        assert_eq!(
            map_to_target(512.0, 384.0, viewport, target),
            Some(TargetPixel { x: 256, y: 255 })
        );
    }

    #[test]
    fn test_corners() {
        let viewport = ViewportSize::new(800, 600);
        let target = TargetSize::DEFAULT;

        assert_eq!(
            map_to_target(0.0, 0.0, viewport, target),
            Some(TargetPixel { x: 0, y: 511 })
        );
        assert_eq!(
            map_to_target(799.9, 599.9, viewport, target),
            Some(TargetPixel { x: 511, y: 0 })
        );
    }

    #[test]
    fn test_outside_viewport() {
        let viewport = ViewportSize::new(800, 600);
        let target = TargetSize::DEFAULT;

        assert_eq!(map_to_target(800.0, 10.0, viewport, target), None);
        assert_eq!(map_to_target(10.0, 600.0, viewport, target), None);
        assert_eq!(map_to_target(-1.0, 10.0, viewport, target), None);
        assert_eq!(map_to_target(f32::NAN, 10.0, viewport, target), None);
    }

    #[test]
    fn test_zero_viewport() {
        let target = TargetSize::DEFAULT;
        assert_eq!(map_to_target(0.0, 0.0, ViewportSize::new(0, 600), target), None);
    }

    #[test]
    fn test_target_size_validation() {
        assert!(TargetSize::new(512, 512).is_ok());
        assert!(matches!(
            TargetSize::new(0, 512),
            Err(PickError::InvalidTargetSize { width: 0, height: 512 })
        ));
    }
}
