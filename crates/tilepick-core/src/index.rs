//! The per-pass item index.

use crate::codec::{DecodedPick, ItemHandle};
use crate::feature::Feature;

/// Maps the draw ordinals of one pass to the features of the drawn items.
///
/// The index borrows the host's feature slices, so it cannot outlive the
/// frame tick it was built in. A fresh one is built for every pass.
#[derive(Debug, Default)]
pub struct PassIndex<'a> {
    items: Vec<&'a [Feature]>,
}

impl<'a> PassIndex<'a> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the next drawn item. Returns `None` once every draw ordinal
    /// is taken.
    pub fn push(&mut self, features: &'a [Feature]) -> Option<ItemHandle> {
        let handle = ItemHandle::new(self.items.len())?;
        self.items.push(features);
        Some(handle)
    }

    /// Number of items drawn so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Features of a drawn item.
    pub fn features(&self, handle: ItemHandle) -> Option<&'a [Feature]> {
        self.items.get(usize::from(handle.ordinal())).copied()
    }

    /// Resolves a decoded color to the feature it was drawn for.
    ///
    /// Indices that point past the drawn items or past an item's features
    /// resolve to `None`. This happens legitimately on blended edge pixels.
    pub fn resolve(&self, pick: DecodedPick) -> Option<&'a Feature> {
        self.items
            .get(usize::from(pick.item))?
            .get(usize::from(pick.feature))
    }
}
