//! Renderable items as seen by the picking pass.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::feature::Feature;

/// Zoom levels at which an item is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    /// Lowest zoom the item is drawn at (inclusive).
    pub min: f32,
    /// Highest zoom the item is drawn at (inclusive).
    pub max: f32,
}

impl ZoomRange {
    /// A range that contains every zoom level.
    pub const ALL: Self = Self {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// Creates a zoom range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns whether `zoom` lies inside the range.
    pub fn contains(&self, zoom: f32) -> bool {
        zoom >= self.min && zoom <= self.max
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::ALL
    }
}

/// A drawable batch (one tile's layer, typically) that can take part in a
/// picking pass.
///
/// Implemented by the host's feature store. The picking pass only reads
/// items; it never keeps them past the frame tick it was handed them in.
pub trait RenderableItem {
    /// Zoom levels at which the item is drawn.
    fn zoom_range(&self) -> ZoomRange;

    /// Model transform for the current frame, or `None` when the item is not
    /// visible right now (culled, still loading).
    fn model_matrix(&self) -> Option<Mat4>;

    /// Current fade/opacity, `0.0` to `1.0`.
    fn fade(&self) -> f32;

    /// Features in this item. Position in the slice is the feature ordinal
    /// baked into the item's picking colors.
    fn features(&self) -> &[Feature];
}

impl<T: RenderableItem + ?Sized> RenderableItem for &T {
    fn zoom_range(&self) -> ZoomRange {
        (**self).zoom_range()
    }

    fn model_matrix(&self) -> Option<Mat4> {
        (**self).model_matrix()
    }

    fn fade(&self) -> f32 {
        (**self).fade()
    }

    fn features(&self) -> &[Feature] {
        (**self).features()
    }
}

impl<T: RenderableItem + ?Sized> RenderableItem for Box<T> {
    fn zoom_range(&self) -> ZoomRange {
        (**self).zoom_range()
    }

    fn model_matrix(&self) -> Option<Mat4> {
        (**self).model_matrix()
    }

    fn fade(&self) -> f32 {
        (**self).fade()
    }

    fn features(&self) -> &[Feature] {
        (**self).features()
    }
}
