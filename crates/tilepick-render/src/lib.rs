//! wgpu backend for tilepick.
//!
//! This crate provides the GPU half of feature picking:
//! - [`OffscreenTarget`], a fixed-size color + depth target with single-pixel readback
//! - [`PickingProgram`], the pipeline that writes pick colors instead of shading
//! - [`GpuPickSurface`], which combines both into a [`tilepick_core::PickSurface`]
//! - [`StaticItem`], a renderable item uploaded from a [`tilepick_core::FeatureMesh`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Target sizes and uniform offsets are far below the truncation limits
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

pub mod buffer;
pub mod error;
pub mod geometry;
pub mod program;
pub mod surface;
pub mod target;

pub use buffer::{create_picking_color_buffer, create_position_buffer, create_vertex_buffer};
pub use error::{RenderError, RenderResult};
pub use geometry::{PickGeometry, StaticItem};
pub use program::{PickingProgram, PickingUniforms};
pub use surface::GpuPickSurface;
pub use target::{OffscreenTarget, COLOR_FORMAT, DEPTH_FORMAT};

/// A picker rendering on wgpu.
pub type GpuPicker = tilepick_core::Picker<GpuPickSurface>;
