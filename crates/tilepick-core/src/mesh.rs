//! CPU-side geometry with picking colors.

use crate::codec::{self, MAX_FEATURES_PER_ITEM};
use crate::error::{PickError, Result};
use crate::feature::Feature;

/// Triangle geometry of an item together with its picking colors.
///
/// Features are appended in order; each one's triangles are stamped with the
/// picking color of its ordinal, so positions, colors and features stay in
/// step.
#[derive(Debug, Clone, Default)]
pub struct FeatureMesh {
    positions: Vec<[f32; 3]>,
    picking_colors: Vec<[u8; 4]>,
    features: Vec<Feature>,
}

impl FeatureMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a feature drawn as a triangle list. Returns its ordinal.
    ///
    /// Trailing vertices that do not form a whole triangle are dropped.
    pub fn push_feature(&mut self, feature: Feature, triangles: &[[f32; 3]]) -> Result<u16> {
        if self.features.len() >= MAX_FEATURES_PER_ITEM {
            return Err(PickError::TooManyFeatures {
                limit: MAX_FEATURES_PER_ITEM,
            });
        }
        let ordinal = self.features.len() as u16;
        let whole = triangles.len() - triangles.len() % 3;

        self.positions.extend_from_slice(&triangles[..whole]);
        self.picking_colors
            .extend(std::iter::repeat(codec::picking_color(ordinal)).take(whole));
        self.features.push(feature);
        Ok(ordinal)
    }

    /// Appends a feature drawn as an axis-aligned rectangle at height `z`.
    pub fn push_rect(&mut self, feature: Feature, min: [f32; 2], max: [f32; 2], z: f32) -> Result<u16> {
        let [x0, y0] = min;
        let [x1, y1] = max;
        self.push_feature(
            feature,
            &[
                [x0, y0, z],
                [x1, y0, z],
                [x1, y1, z],
                [x0, y0, z],
                [x1, y1, z],
                [x0, y1, z],
            ],
        )
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Per-vertex picking colors, parallel to [`positions`](Self::positions).
    pub fn picking_colors(&self) -> &[[u8; 4]] {
        &self.picking_colors
    }

    /// Features in ordinal order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Splits the mesh into its parts.
    pub fn into_parts(self) -> (Vec<[f32; 3]>, Vec<[u8; 4]>, Vec<Feature>) {
        (self.positions, self.picking_colors, self.features)
    }
}
