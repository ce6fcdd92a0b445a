//! Edge records for the synthesized directory graph

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, EdgeKind, NodeId};
use serde::{Deserialize, Serialize};

/// A directed, typed relationship between two node handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,

    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// Relationship label from the closed vocabulary
    pub kind: EdgeKind,

    /// Optional property bag (sync direction, grant justification, ...)
    pub properties: PropertyMap,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Edge {
            id,
            source,
            target,
            kind,
            properties: PropertyMap::new(),
        }
    }

    /// Create a new edge with properties
    pub fn with_properties(
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        properties: PropertyMap,
    ) -> Self {
        Edge {
            id,
            source,
            target,
            kind,
            properties,
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Check if this edge goes FROM a specific node
    pub fn starts_from(&self, node: NodeId) -> bool {
        self.source == node
    }

    /// Check if this edge goes TO a specific node
    pub fn ends_at(&self, node: NodeId) -> bool {
        self.target == node
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
