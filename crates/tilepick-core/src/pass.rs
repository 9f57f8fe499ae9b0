//! One complete picking pass.
//!
//! [`run_pass`] is backend independent: it decides what gets drawn and how
//! the read-back pixel is interpreted, while a [`PickSurface`] does the
//! actual rendering and readback.

use glam::Mat4;

use crate::codec::{self, ItemHandle};
use crate::feature::PickResult;
use crate::group::{self, GroupIndex};
use crate::index::PassIndex;
use crate::item::RenderableItem;
use crate::viewport::{self, TargetPixel, TargetSize, ViewportSize};

/// Host state a pass reads from, handed in explicitly at frame time.
#[derive(Debug, Clone, Copy)]
pub struct PickContext<'a, I> {
    /// The current feature set, in drawing order.
    pub items: &'a [I],
    /// Current zoom level.
    pub zoom: f32,
    /// View-projection matrix of the active camera.
    pub view_projection: Mat4,
    /// Size of the visible viewport.
    pub viewport: ViewportSize,
    /// Fog distance of the main renderer. Fragments beyond it are not
    /// pickable; `0.0` disables the cut-off.
    pub fog_distance: f32,
}

impl<'a, I> PickContext<'a, I> {
    /// Creates a context with an identity camera and no fog.
    pub fn new(items: &'a [I], zoom: f32, viewport: ViewportSize) -> Self {
        Self {
            items,
            zoom,
            view_projection: Mat4::IDENTITY,
            viewport,
            fog_distance: 0.0,
        }
    }

    /// Sets the view-projection matrix.
    #[must_use]
    pub fn with_view_projection(mut self, view_projection: Mat4) -> Self {
        self.view_projection = view_projection;
        self
    }

    /// Sets the fog distance.
    #[must_use]
    pub fn with_fog_distance(mut self, fog_distance: f32) -> Self {
        self.fog_distance = fog_distance;
        self
    }
}

/// Per-draw values of the picking program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawUniforms {
    /// Model transform of the item.
    pub model_matrix: Mat4,
    /// `view_projection * model_matrix`.
    pub combined_matrix: Mat4,
    /// Fade of the item.
    pub fade: f32,
    /// Normalized red channel for this draw, see [`ItemHandle::index_ordinal`].
    pub index_ordinal: f32,
}

impl DrawUniforms {
    /// Uniforms for drawing an item as `handle`.
    pub fn new(handle: ItemHandle, model_matrix: Mat4, view_projection: Mat4, fade: f32) -> Self {
        Self {
            model_matrix,
            combined_matrix: view_projection * model_matrix,
            fade,
            index_ordinal: handle.index_ordinal(),
        }
    }
}

/// One draw call of a picking pass.
#[derive(Debug)]
pub struct DrawCall<'a, I> {
    /// The item to draw.
    pub item: &'a I,
    /// Draw ordinal of the item in this pass.
    pub handle: ItemHandle,
    /// Values for the picking program.
    pub uniforms: DrawUniforms,
}

/// The offscreen side of a pick surface: target size, readback and teardown.
pub trait PickTarget {
    /// Resolution of the offscreen target.
    fn target_size(&self) -> TargetSize;

    /// Reads one pixel of what was last rendered. Returns `None` when the
    /// target is gone or the readback fails.
    fn read_pixel(&mut self, pixel: TargetPixel) -> Option<[u8; 4]>;

    /// Releases the surface's resources. Later calls are no-ops.
    fn release(&mut self);
}

/// Offscreen target plus picking program, as driven by [`run_pass`].
///
/// Within a pass, `render` is called exactly once and `read_pixel` at most
/// once after it.
pub trait PickSurface<I>: PickTarget {
    /// Clears the target to [`codec::BACKGROUND`] and draws every call, in
    /// order, into it.
    fn render(&mut self, draws: &[DrawCall<'_, I>], fog_distance: f32);
}

/// Collects the draw calls for the visible items and registers them in
/// `index`.
///
/// Items outside the zoom window or without a model matrix are skipped.
/// Visible items beyond the draw ordinal capacity are dropped with a warning.
pub fn plan_draws<'a, I: RenderableItem>(
    ctx: &PickContext<'a, I>,
    index: &mut PassIndex<'a>,
) -> Vec<DrawCall<'a, I>> {
    let mut draws = Vec::new();
    let mut dropped = 0usize;

    for item in ctx.items {
        if !item.zoom_range().contains(ctx.zoom) {
            continue;
        }
        let Some(model_matrix) = item.model_matrix() else {
            continue;
        };
        let Some(handle) = index.push(item.features()) else {
            dropped += 1;
            continue;
        };
        draws.push(DrawCall {
            item,
            handle,
            uniforms: DrawUniforms::new(handle, model_matrix, ctx.view_projection, item.fade()),
        });
    }

    if dropped > 0 {
        log::warn!(
            "pick pass: {dropped} visible items not drawn, limit is {}",
            codec::MAX_ITEMS_PER_PASS
        );
    }
    draws
}

/// Runs a full picking pass for viewport point `(x, y)`.
///
/// Every miss resolves to `None`: background, stale indices, a point
/// outside the viewport, and failed readbacks alike. With `groups` the parts
/// are looked up in the prebuilt index, otherwise all items are rescanned.
pub fn run_pass<I, S>(
    surface: &mut S,
    ctx: &PickContext<'_, I>,
    x: f32,
    y: f32,
    grouping_property: &str,
    groups: Option<&GroupIndex<'_>>,
) -> Option<PickResult>
where
    I: RenderableItem,
    S: PickSurface<I> + ?Sized,
{
    let mut index = PassIndex::new();
    let draws = plan_draws(ctx, &mut index);
    surface.render(&draws, ctx.fog_distance);
    log::debug!("pick pass: {} draws", draws.len());

    let Some(pixel) = viewport::map_to_target(x, y, ctx.viewport, surface.target_size()) else {
        log::debug!("pick at ({x}, {y}) is outside the viewport");
        return None;
    };
    let Some([r, g, b, _]) = surface.read_pixel(pixel) else {
        log::warn!("pick readback failed at {pixel:?}");
        return None;
    };

    let decoded = codec::decode(r, g, b)?;
    let Some(feature) = index.resolve(decoded) else {
        log::debug!("pick color {r},{g},{b} does not resolve: {decoded:?}");
        return None;
    };

    let key = feature.grouping_key(grouping_property);
    let parts = match groups {
        Some(groups) => groups.parts(&key),
        None => group::collect_parts(ctx.items, &key, grouping_property),
    };
    log::debug!("picked {} with {} parts", feature.id, parts.len());

    Some(PickResult::new(feature, parts))
}
