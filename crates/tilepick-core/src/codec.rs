//! Pick color encoding.
//!
//! Every fragment written by the picking pass carries three bytes:
//! - R holds the draw ordinal plus one, so a zero red channel is the
//!   background and can never be produced by a draw
//! - G and B hold the feature ordinal plus one, low byte in G
//!
//! The red channel is set per draw through the `index_ordinal` uniform. The
//! green and blue channels come from the per-vertex picking color authored
//! together with the geometry (see [`picking_color`]).

/// Number of draws a single pass can tell apart. Red value 0 is reserved for
/// the background, leaving 255 values for draws.
pub const MAX_ITEMS_PER_PASS: usize = 255;

/// Number of features addressable within one item.
pub const MAX_FEATURES_PER_ITEM: usize = 1 << 16;

/// The clear color of the offscreen target. Decodes to "no item hit".
pub const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Handle of an item drawn in the current pass. Only valid for that pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(u8);

impl ItemHandle {
    /// Creates a handle for draw ordinal `ordinal`, or `None` if the ordinal
    /// cannot be encoded in the red channel.
    pub fn new(ordinal: usize) -> Option<Self> {
        if ordinal < MAX_ITEMS_PER_PASS {
            Some(Self(ordinal as u8))
        } else {
            None
        }
    }

    /// The draw ordinal, starting at 0.
    pub fn ordinal(self) -> u8 {
        self.0
    }

    /// Red channel written for this draw.
    pub fn red(self) -> u8 {
        self.0 + 1
    }

    /// Normalized value uploaded as the `index_ordinal` uniform.
    ///
    /// The shader turns it back into the red byte with `round(v * 256) / 255`,
    /// which survives 8-bit unorm quantization exactly.
    pub fn index_ordinal(self) -> f32 {
        f32::from(self.red()) / 256.0
    }
}

/// A decoded pick color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedPick {
    /// Draw ordinal within the pass.
    pub item: u8,
    /// Feature ordinal within the item.
    pub feature: u16,
}

/// Per-vertex picking color for feature ordinal `feature`, as RGBA bytes.
///
/// The ordinal is offset by one and wraps, so every `u16` ordinal has a
/// distinct green/blue pair. Only the red channel marks the background.
pub fn picking_color(feature: u16) -> [u8; 4] {
    let [lo, hi] = feature.wrapping_add(1).to_le_bytes();
    [0, lo, hi, 255]
}

/// Color a fragment of `feature` gets when drawn as `item`.
pub fn encode(item: ItemHandle, feature: u16) -> [u8; 3] {
    let [_, g, b, _] = picking_color(feature);
    [item.red(), g, b]
}

/// Decodes a color read back from the target. Returns `None` for the
/// background.
pub fn decode(r: u8, g: u8, b: u8) -> Option<DecodedPick> {
    let item = r.checked_sub(1)?;
    let feature = u16::from_le_bytes([g, b]).wrapping_sub(1);
    Some(DecodedPick { item, feature })
}

/// Red byte the shader derives from an `index_ordinal` uniform value.
///
/// Mirrors the fragment shader so the quantization can be checked on the CPU.
pub fn red_from_index_ordinal(index_ordinal: f32) -> u8 {
    let normalized = (index_ordinal * 256.0).round() / 255.0;
    (normalized.clamp(0.0, 1.0) * 255.0).round() as u8
}
