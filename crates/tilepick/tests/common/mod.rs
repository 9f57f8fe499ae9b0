//! Shared fixtures: a tile type and a CPU surface that paints it.

#![allow(dead_code)]

use tilepick::codec::{self, BACKGROUND};
use tilepick::{
    DrawCall, Feature, Mat4, PickSurface, PickTarget, RenderableItem, TargetPixel, TargetSize,
    ZoomRange,
};

/// A screen-space rectangle in viewport-normalized coordinates, origin
/// top-left: `[left, top, right, bottom]`.
pub type Rect = [f32; 4];

/// Covers the whole viewport.
pub const FULL: Rect = [0.0, 0.0, 1.0, 1.0];
/// Left half of the viewport.
pub const LEFT: Rect = [0.0, 0.0, 0.5, 1.0];
/// Right half of the viewport.
pub const RIGHT: Rect = [0.5, 0.0, 1.0, 1.0];
/// Top half of the viewport.
pub const TOP: Rect = [0.0, 0.0, 1.0, 0.5];
/// Bottom half of the viewport.
pub const BOTTOM: Rect = [0.0, 0.5, 1.0, 1.0];

/// A tile whose features are drawn as screen rectangles.
pub struct Tile {
    pub zoom: ZoomRange,
    pub visible: bool,
    pub fade: f32,
    pub features: Vec<Feature>,
    /// Feature ordinal and the rectangle it covers.
    pub rects: Vec<(u16, Rect)>,
}

impl Tile {
    pub fn new() -> Self {
        Self {
            zoom: ZoomRange::ALL,
            visible: true,
            fade: 1.0,
            features: Vec::new(),
            rects: Vec::new(),
        }
    }

    /// Adds a feature covering `rect`.
    pub fn with(mut self, feature: Feature, rect: Rect) -> Self {
        let ordinal = self.features.len() as u16;
        self.features.push(feature);
        self.rects.push((ordinal, rect));
        self
    }

    /// Adds a feature that is not drawn anywhere.
    pub fn with_hidden(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }
}

impl RenderableItem for Tile {
    fn zoom_range(&self) -> ZoomRange {
        self.zoom
    }

    fn model_matrix(&self) -> Option<Mat4> {
        self.visible.then_some(Mat4::IDENTITY)
    }

    fn fade(&self) -> f32 {
        self.fade
    }

    fn features(&self) -> &[Feature] {
        &self.features
    }
}

/// Rasterizes tiles on the CPU the way the GPU program does: later draws
/// cover earlier ones, faded items are discarded, rows are stored bottom-up.
pub struct PaintSurface {
    size: TargetSize,
    pixels: Vec<[u8; 4]>,
    pub passes: usize,
    pub reads: Vec<TargetPixel>,
    pub released: usize,
}

impl PaintSurface {
    pub fn new(size: TargetSize) -> Self {
        Self {
            size,
            pixels: vec![BACKGROUND; (size.width * size.height) as usize],
            passes: 0,
            reads: Vec::new(),
            released: 0,
        }
    }

    fn fill(&mut self, rect: Rect, color: [u8; 4]) {
        let (w, h) = (self.size.width as f32, self.size.height as f32);
        let [left, top, right, bottom] = rect;
        let x0 = (left * w).round() as u32;
        let x1 = (right * w).round() as u32;
        let y0 = (top * h).round() as u32;
        let y1 = (bottom * h).round() as u32;

        for y in y0..y1.min(self.size.height) {
            let row = self.size.height - 1 - y;
            for x in x0..x1.min(self.size.width) {
                self.pixels[(row * self.size.width + x) as usize] = color;
            }
        }
    }
}

impl Default for PaintSurface {
    fn default() -> Self {
        Self::new(TargetSize::DEFAULT)
    }
}

impl PickTarget for PaintSurface {
    fn target_size(&self) -> TargetSize {
        self.size
    }

    fn read_pixel(&mut self, pixel: TargetPixel) -> Option<[u8; 4]> {
        if self.released > 0 || !self.size.contains(pixel.x, pixel.y) {
            return None;
        }
        self.reads.push(pixel);
        Some(self.pixels[(pixel.y * self.size.width + pixel.x) as usize])
    }

    fn release(&mut self) {
        self.released += 1;
    }
}

impl PickSurface<Tile> for PaintSurface {
    fn render(&mut self, draws: &[DrawCall<'_, Tile>], _fog_distance: f32) {
        self.passes += 1;
        self.pixels.fill(BACKGROUND);
        for draw in draws {
            if draw.uniforms.fade <= 0.0 {
                continue;
            }
            let red = codec::red_from_index_ordinal(draw.uniforms.index_ordinal);
            for &(ordinal, rect) in &draw.item.rects {
                let [_, g, b, a] = codec::picking_color(ordinal);
                self.fill(rect, [red, g, b, a]);
            }
        }
    }
}
