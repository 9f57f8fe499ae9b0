//! Features and pick results.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property bag attached to a feature.
pub type Properties = Map<String, Value>;

/// Stable identifier of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Creates an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads an identifier out of a property value.
    ///
    /// Strings are taken verbatim and nonzero numbers are formatted. Empty
    /// strings, zero, nulls, booleans and containers are not identifiers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => {
                Some(Self(n.to_string()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for FeatureId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// An application-level entity drawn as part of a renderable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Stable identifier.
    pub id: FeatureId,
    /// Arbitrary properties. A grouping property (`building` by default)
    /// links the feature to the parts of the same object in other tiles.
    #[serde(default)]
    pub properties: Properties,
}

impl Feature {
    /// Creates a feature.
    pub fn new(id: impl Into<FeatureId>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }

    /// Creates a feature without properties.
    pub fn bare(id: impl Into<FeatureId>) -> Self {
        Self::new(id, Properties::new())
    }

    /// Sets one property, builder style.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The identifier stored under `property`, if any.
    pub fn group_ref(&self, property: &str) -> Option<FeatureId> {
        self.properties.get(property).and_then(FeatureId::from_value)
    }

    /// The key this feature is grouped under: its `property` value when
    /// present, its own id otherwise.
    pub fn grouping_key(&self, property: &str) -> FeatureId {
        self.group_ref(property).unwrap_or_else(|| self.id.clone())
    }

    /// Projects the feature to a pick part.
    pub fn to_part(&self) -> PickPart {
        PickPart {
            id: self.id.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// One member of a picked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickPart {
    /// Identifier of the part.
    pub id: FeatureId,
    /// Properties of the part.
    pub properties: Properties,
}

/// Result of a successful pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickResult {
    /// Identifier of the feature under the cursor.
    pub id: FeatureId,
    /// Properties of the feature under the cursor.
    pub properties: Properties,
    /// Every feature sharing the picked feature's grouping key, across all
    /// items, in encounter order. Duplicates are kept.
    pub parts: Vec<PickPart>,
}

impl PickResult {
    /// Builds a result for `feature` with the given parts.
    pub fn new(feature: &Feature, parts: Vec<PickPart>) -> Self {
        Self {
            id: feature.id.clone(),
            properties: feature.properties.clone(),
            parts,
        }
    }
}
