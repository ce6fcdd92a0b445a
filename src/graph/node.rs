//! Node records for the synthesized directory graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// A directory object.
///
/// Every node carries:
/// - a store handle, stable for the run
/// - a kind from the closed [`NodeKind`] set
/// - a unique object identifier (SID for on-prem security principals,
///   opaque 128-bit identifier for cloud objects)
/// - a human-readable name
/// - a kind-specific attribute bag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Store handle for this node
    pub id: NodeId,

    /// Object kind
    pub kind: NodeKind,

    /// Human-readable name (secondary key)
    pub name: String,

    /// Unique object identifier within its namespace (secondary key)
    pub object_id: String,

    /// Kind-specific attributes
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(
        id: NodeId,
        kind: NodeKind,
        name: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Node {
            id,
            kind,
            name: name.into(),
            object_id: object_id.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_properties(
        id: NodeId,
        kind: NodeKind,
        name: impl Into<String>,
        object_id: impl Into<String>,
        properties: PropertyMap,
    ) -> Self {
        Node {
            id,
            kind,
            name: name.into(),
            object_id: object_id.into(),
            properties,
        }
    }

    /// Set a property value
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
