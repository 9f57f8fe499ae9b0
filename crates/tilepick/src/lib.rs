//! tilepick: GPU feature picking for tiled map scenes.
//!
//! Answers "which feature is under this screen point?" by redrawing the
//! visible tiles into a small offscreen target, with every feature painted in
//! a color that encodes which tile and which feature it is, then reading back
//! the single pixel under the point. The hit is expanded to every part of the
//! same building across tiles.
//!
//! # Quick Start
//!
//! ```no_run
//! use tilepick::*;
//!
//! fn main() -> RenderResult<()> {
//!     init_logging();
//!
//!     let mut picker = headless_picker(PickOptions::default())?;
//!
//!     let mut mesh = FeatureMesh::new();
//!     mesh.push_rect(Feature::bare("park"), [-1.0, -1.0], [1.0, 1.0], 0.5)?;
//!     let items = vec![StaticItem::upload(picker.surface().device(), mesh)];
//!
//!     picker.pick(400.0, 300.0, |hit| {
//!         if let Some(hit) = hit {
//!             println!("picked {} ({} parts)", hit.id, hit.parts.len());
//!         }
//!     });
//!
//!     // Once per frame, outside the host's own render pass
//!     let ctx = PickContext::new(&items, 15.0, ViewportSize::new(800, 600));
//!     picker.on_frame(&ctx);
//!
//!     picker.destroy();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `tilepick-core` holds the backend-independent logic: the color codec,
//!   the per-pass index, cross-tile grouping and the frame-paced [`Picker`].
//! - `tilepick-render` implements [`PickSurface`] on wgpu with an
//!   [`OffscreenTarget`] and a [`PickingProgram`].

// Re-export core types
pub use tilepick_core::{
    codec, group, Aggregation, DecodedPick, DrawCall, DrawUniforms, Feature, FeatureId,
    FeatureMesh, GroupIndex, ItemHandle, PassIndex, PickCallback, PickContext, PickError,
    PickOptions, PickPart, PickResult, PickSurface, PickTarget, Picker, Properties,
    RenderableItem, Result, SchedulePolicy, TargetPixel, TargetSize, ViewportSize, ZoomRange,
    MAX_FEATURES_PER_ITEM, MAX_ITEMS_PER_PASS,
};

// Re-export render types
pub use tilepick_render::{
    GpuPickSurface, GpuPicker, OffscreenTarget, PickGeometry, PickingProgram, RenderError,
    RenderResult, StaticItem,
};

pub use glam::{Mat4, Vec3};

/// Initializes `env_logger` from `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Creates a picker on a new headless device.
pub fn headless_picker(options: PickOptions) -> RenderResult<GpuPicker> {
    let surface = GpuPickSurface::new_headless(&options)?;
    let picker = Picker::new(surface, options)?;
    log::info!("tilepick initialized (headless)");
    Ok(picker)
}

/// Creates a picker on the host's device.
pub fn picker(
    device: std::sync::Arc<wgpu::Device>,
    queue: std::sync::Arc<wgpu::Queue>,
    options: PickOptions,
) -> RenderResult<GpuPicker> {
    let surface = GpuPickSurface::new(device, queue, &options)?;
    Ok(Picker::new(surface, options)?)
}
