//! GPU geometry of renderable items.

use glam::Mat4;
use tilepick_core::{Feature, FeatureMesh, RenderableItem, ZoomRange};

use crate::buffer::{create_picking_color_buffer, create_position_buffer};

/// A renderable item whose geometry lives in GPU buffers.
///
/// The two buffers are parallel: vertex `i` of the position buffer belongs to
/// the feature whose picking color is vertex `i` of the color buffer.
pub trait PickGeometry: RenderableItem {
    /// Vertex positions, `Float32x3`.
    fn position_buffer(&self) -> &wgpu::Buffer;

    /// Per-vertex picking colors, `Unorm8x4`.
    fn picking_color_buffer(&self) -> &wgpu::Buffer;

    /// Number of vertices to draw as a triangle list.
    fn vertex_count(&self) -> u32;
}

impl<T: PickGeometry + ?Sized> PickGeometry for &T {
    fn position_buffer(&self) -> &wgpu::Buffer {
        (**self).position_buffer()
    }

    fn picking_color_buffer(&self) -> &wgpu::Buffer {
        (**self).picking_color_buffer()
    }

    fn vertex_count(&self) -> u32 {
        (**self).vertex_count()
    }
}

impl<T: PickGeometry + ?Sized> PickGeometry for Box<T> {
    fn position_buffer(&self) -> &wgpu::Buffer {
        (**self).position_buffer()
    }

    fn picking_color_buffer(&self) -> &wgpu::Buffer {
        (**self).picking_color_buffer()
    }

    fn vertex_count(&self) -> u32 {
        (**self).vertex_count()
    }
}

/// An item uploaded once from a [`FeatureMesh`].
pub struct StaticItem {
    zoom_range: ZoomRange,
    model_matrix: Option<Mat4>,
    fade: f32,
    features: Vec<Feature>,
    position_buffer: wgpu::Buffer,
    picking_color_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl StaticItem {
    /// Uploads `mesh`. The item starts visible at every zoom with an identity
    /// transform and full opacity.
    pub fn upload(device: &wgpu::Device, mesh: FeatureMesh) -> Self {
        let vertex_count = mesh.vertex_count();
        let (positions, colors, features) = mesh.into_parts();
        Self {
            zoom_range: ZoomRange::ALL,
            model_matrix: Some(Mat4::IDENTITY),
            fade: 1.0,
            features,
            position_buffer: create_position_buffer(device, &positions),
            picking_color_buffer: create_picking_color_buffer(device, &colors),
            vertex_count,
        }
    }

    /// Restricts the zoom levels the item is drawn at.
    #[must_use]
    pub fn with_zoom_range(mut self, zoom_range: ZoomRange) -> Self {
        self.zoom_range = zoom_range;
        self
    }

    /// Sets the model transform; `None` hides the item.
    pub fn set_model_matrix(&mut self, model_matrix: Option<Mat4>) {
        self.model_matrix = model_matrix;
    }

    /// Sets the fade.
    pub fn set_fade(&mut self, fade: f32) {
        self.fade = fade;
    }
}

impl RenderableItem for StaticItem {
    fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    fn model_matrix(&self) -> Option<Mat4> {
        self.model_matrix
    }

    fn fade(&self) -> f32 {
        self.fade
    }

    fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl PickGeometry for StaticItem {
    fn position_buffer(&self) -> &wgpu::Buffer {
        &self.position_buffer
    }

    fn picking_color_buffer(&self) -> &wgpu::Buffer {
        &self.picking_color_buffer
    }

    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
