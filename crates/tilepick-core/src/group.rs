//! Cross-tile aggregation of picked features.
//!
//! A building split across tiles shows up as several features: the parts
//! carry the building's id in their grouping property, and the building
//! itself may appear as a feature with that id. Picking any of them yields
//! all of them.

use std::collections::HashMap;

use crate::feature::{Feature, FeatureId, PickPart};
use crate::item::RenderableItem;

/// Returns whether `feature` belongs to the group keyed by `key`.
pub fn is_member(feature: &Feature, key: &FeatureId, property: &str) -> bool {
    feature.id == *key || feature.group_ref(property).as_ref() == Some(key)
}

/// Collects every feature of every item that belongs to `key`, in encounter
/// order.
///
/// Scans all items, not only the ones drawn in the current pass.
pub fn collect_parts<I: RenderableItem>(items: &[I], key: &FeatureId, property: &str) -> Vec<PickPart> {
    items
        .iter()
        .flat_map(|item| item.features())
        .filter(|feature| is_member(feature, key, property))
        .map(Feature::to_part)
        .collect()
}

/// Precomputed group membership for a whole feature set.
///
/// Gives the same parts as [`collect_parts`] without rescanning, which pays
/// off when several picks resolve against the same items.
#[derive(Debug, Default)]
pub struct GroupIndex<'a> {
    groups: HashMap<FeatureId, Vec<&'a Feature>>,
}

impl<'a> GroupIndex<'a> {
    /// Builds the index over every feature of `items`.
    pub fn build<I: RenderableItem>(items: &'a [I], property: &str) -> Self {
        let mut groups: HashMap<FeatureId, Vec<&'a Feature>> = HashMap::new();
        for feature in items.iter().flat_map(|item| item.features()) {
            groups.entry(feature.id.clone()).or_default().push(feature);
            if let Some(group) = feature.group_ref(property) {
                // A feature naming itself is listed once
                if group != feature.id {
                    groups.entry(group).or_default().push(feature);
                }
            }
        }
        Self { groups }
    }

    /// Parts of the group keyed by `key`, in encounter order.
    pub fn parts(&self, key: &FeatureId) -> Vec<PickPart> {
        self.groups
            .get(key)
            .map(|members| members.iter().map(|f| f.to_part()).collect())
            .unwrap_or_default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
