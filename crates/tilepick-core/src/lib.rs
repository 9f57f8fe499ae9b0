//! Core picking logic for tilepick.
//!
//! This crate holds everything about GPU feature picking that does not touch
//! the GPU itself:
//! - [`codec`] maps draw ordinals and feature ordinals to pick colors and back
//! - [`index::PassIndex`] resolves decoded colors to features for one pass
//! - [`group`] collects the cross-tile parts belonging to a picked feature
//! - [`pass::run_pass`] drives one complete offscreen pass over a [`PickSurface`]
//! - [`Picker`] defers pick requests to the host's frame tick
//!
//! The GPU side lives in `tilepick-render`, which implements [`PickSurface`]
//! on top of wgpu.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Pick colors are byte-sized by construction
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod codec;
pub mod error;
pub mod feature;
pub mod group;
pub mod index;
pub mod item;
pub mod mesh;
pub mod options;
pub mod pass;
pub mod picker;
pub mod viewport;

pub use codec::{DecodedPick, ItemHandle, MAX_FEATURES_PER_ITEM, MAX_ITEMS_PER_PASS};
pub use error::{PickError, Result};
pub use feature::{Feature, FeatureId, PickPart, PickResult, Properties};
pub use group::GroupIndex;
pub use index::PassIndex;
pub use item::{RenderableItem, ZoomRange};
pub use mesh::FeatureMesh;
pub use options::{Aggregation, PickOptions, SchedulePolicy};
pub use pass::{DrawCall, DrawUniforms, PickContext, PickSurface, PickTarget};
pub use picker::{PickCallback, Picker};
pub use viewport::{TargetPixel, TargetSize, ViewportSize};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3};
