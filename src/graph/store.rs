//! In-memory graph storage for one generation run
//!
//! The store is the single mutable repository of nodes and edges. It is
//! write-only within a run: stages insert nodes and edges, maintain secondary
//! indices synchronously, and never remove anything. Resetting between runs is
//! constructing a fresh store.

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyMap;
use super::types::{EdgeId, EdgeKind, NodeId, NodeKind};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced at the synthesis boundary. Integrity violations inside a
/// run are defects and assert instead of recovering.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type SynthResult<T> = Result<T, SynthError>;

/// Namespaces for secondary-key lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryKey {
    Name,
    ObjectId,
}

/// Per-kind node counts and graph density, derivable read-only from a
/// finished store.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// edges / (nodes * (nodes - 1)), 0.0 for graphs with fewer than 2 nodes
    pub density: f64,
    pub nodes_per_kind: Vec<(NodeKind, usize)>,
    pub edges_per_kind: Vec<(EdgeKind, usize)>,
}

/// In-memory graph store.
///
/// Uses flat arenas for nodes and edges (the handle is the arena position)
/// and hash indices for the secondary keys:
/// - name -> NodeId
/// - object id -> NodeId
/// - kind -> Vec<NodeId> (insertion order preserved)
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,

    name_index: FxHashMap<String, NodeId>,
    object_id_index: FxHashMap<String, NodeId>,
    kind_index: FxHashMap<NodeKind, Vec<NodeId>>,

    /// Guard against re-inserting an identical (source, target, kind) edge.
    edge_keys: FxHashSet<(NodeId, NodeId, EdgeKind)>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        GraphStore {
            nodes: Vec::with_capacity(1024),
            edges: Vec::with_capacity(4096),
            name_index: FxHashMap::default(),
            object_id_index: FxHashMap::default(),
            kind_index: FxHashMap::default(),
            edge_keys: FxHashSet::default(),
        }
    }

    /// Insert a node and maintain the secondary indices.
    ///
    /// Returns the handle assigned to the node. Handles are assigned in
    /// insertion order and stay stable for the run.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        object_id: impl Into<String>,
        properties: PropertyMap,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u64);
        let node = Node::with_properties(id, kind, name, object_id, properties);

        self.name_index.insert(node.name.clone(), id);
        let displaced = self.object_id_index.insert(node.object_id.clone(), id);
        assert!(
            displaced.is_none(),
            "object identifier {} already allocated",
            node.object_id
        );
        self.kind_index.entry(kind).or_default().push(id);

        self.nodes.push(node);
        id
    }

    /// Insert a directed edge between two existing nodes.
    ///
    /// When either endpoint handle is invalid the edge is skipped and a
    /// warning is logged; conditional relationships in the pipeline rely on
    /// this rather than checking endpoint existence at every call site.
    /// An identical (source, target, kind) triple is inserted at most once.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, kind: EdgeKind) {
        self.add_edge_with_properties(source, target, kind, PropertyMap::new());
    }

    /// Insert a directed edge carrying a property bag.
    pub fn add_edge_with_properties(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        properties: PropertyMap,
    ) {
        if !self.has_node(source) || !self.has_node(target) {
            tracing::warn!(
                source = source.as_u64(),
                target = target.as_u64(),
                label = kind.as_str(),
                "skipping edge with invalid endpoint"
            );
            return;
        }
        if !self.edge_keys.insert((source, target, kind)) {
            return;
        }

        let id = EdgeId::new(self.edges.len() as u64);
        self.edges
            .push(Edge::with_properties(id, source, target, kind, properties));
    }

    /// Look up a node handle by secondary key.
    pub fn find(&self, namespace: SecondaryKey, key: &str) -> Option<NodeId> {
        match namespace {
            SecondaryKey::Name => self.name_index.get(key).copied(),
            SecondaryKey::ObjectId => self.object_id_index.get(key).copied(),
        }
    }

    /// Look up a node handle by name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.find(SecondaryKey::Name, name)
    }

    /// Look up a node handle by object identifier.
    pub fn find_by_object_id(&self, object_id: &str) -> Option<NodeId> {
        self.find(SecondaryKey::ObjectId, object_id)
    }

    /// All handles of a given kind, in insertion order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> &[NodeId] {
        self.kind_index.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get a node by handle
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.as_u64() as usize)
    }

    /// Get a mutable node by handle
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.as_u64() as usize)
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        (id.as_u64() as usize) < self.nodes.len()
    }

    /// Get an edge by handle
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.as_u64() as usize)
    }

    /// All nodes in insertion order
    pub fn all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order
    pub fn all_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Per-kind counts and density, computed read-only.
    pub fn statistics(&self) -> GraphStatistics {
        let n = self.node_count();
        let e = self.edge_count();
        let density = if n > 1 {
            e as f64 / (n as f64 * (n as f64 - 1.0))
        } else {
            0.0
        };

        let mut nodes_per_kind: Vec<(NodeKind, usize)> = self
            .kind_index
            .iter()
            .map(|(kind, ids)| (*kind, ids.len()))
            .collect();
        nodes_per_kind.sort();

        let mut edge_counts: FxHashMap<EdgeKind, usize> = FxHashMap::default();
        for edge in &self.edges {
            *edge_counts.entry(edge.kind).or_default() += 1;
        }
        let mut edges_per_kind: Vec<(EdgeKind, usize)> = edge_counts.into_iter().collect();
        edges_per_kind.sort();

        GraphStatistics {
            node_count: n,
            edge_count: e,
            density,
            nodes_per_kind,
            edges_per_kind,
        }
    }

    /// Clear all data from the store
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.name_index.clear();
        self.object_id_index.clear();
        self.kind_index.clear();
        self.edge_keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(store: &mut GraphStore, n: u32) -> NodeId {
        store.add_node(
            NodeKind::User,
            format!("USER{:05}@TESTLAB.LOCAL", n),
            format!("S-1-5-21-0-0-0-{}", 1000 + n),
            PropertyMap::new(),
        )
    }

    #[test]
    fn test_add_and_get_node() {
        let mut store = GraphStore::new();
        let id = user(&mut store, 1);

        assert_eq!(store.node_count(), 1);
        let node = store.get_node(id).unwrap();
        assert_eq!(node.kind, NodeKind::User);
        assert_eq!(node.name, "USER00001@TESTLAB.LOCAL");
    }

    #[test]
    fn test_handles_are_insertion_order() {
        let mut store = GraphStore::new();
        for n in 0..10 {
            let id = user(&mut store, n);
            assert_eq!(id.as_u64(), n as u64);
        }
    }

    #[test]
    fn test_secondary_indices() {
        let mut store = GraphStore::new();
        let id = user(&mut store, 3);

        assert_eq!(store.find_by_name("USER00003@TESTLAB.LOCAL"), Some(id));
        assert_eq!(store.find_by_object_id("S-1-5-21-0-0-0-1003"), Some(id));
        assert_eq!(store.find(SecondaryKey::Name, "NOBODY@TESTLAB.LOCAL"), None);
    }

    #[test]
    fn test_nodes_of_kind() {
        let mut store = GraphStore::new();
        user(&mut store, 1);
        user(&mut store, 2);
        store.add_node(NodeKind::Group, "G@X", "S-1-5-21-0-0-0-2000", PropertyMap::new());

        assert_eq!(store.nodes_of_kind(NodeKind::User).len(), 2);
        assert_eq!(store.nodes_of_kind(NodeKind::Group).len(), 1);
        assert!(store.nodes_of_kind(NodeKind::Gpo).is_empty());
    }

    #[test]
    fn test_add_edge() {
        let mut store = GraphStore::new();
        let a = user(&mut store, 1);
        let b = user(&mut store, 2);

        store.add_edge(a, b, EdgeKind::GenericAll);
        assert_eq!(store.edge_count(), 1);
        let edge = store.get_edge(EdgeId::new(0)).unwrap();
        assert_eq!(edge.source, a);
        assert_eq!(edge.target, b);
    }

    #[test]
    fn test_add_edge_invalid_endpoint_is_skipped() {
        let mut store = GraphStore::new();
        let a = user(&mut store, 1);

        store.add_edge(a, NodeId::new(99), EdgeKind::MemberOf);
        store.add_edge(NodeId::new(99), a, EdgeKind::MemberOf);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edge_is_inserted_once() {
        let mut store = GraphStore::new();
        let a = user(&mut store, 1);
        let b = user(&mut store, 2);

        store.add_edge(a, b, EdgeKind::MemberOf);
        store.add_edge(a, b, EdgeKind::MemberOf);
        store.add_edge(a, b, EdgeKind::GenericAll);
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_statistics() {
        let mut store = GraphStore::new();
        let a = user(&mut store, 1);
        let b = user(&mut store, 2);
        let g = store.add_node(NodeKind::Group, "G@X", "S-1-5-21-0-0-0-2000", PropertyMap::new());
        store.add_edge(a, g, EdgeKind::MemberOf);
        store.add_edge(b, g, EdgeKind::MemberOf);

        let stats = store.statistics();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 2);
        assert!((stats.density - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(
            stats.nodes_per_kind,
            vec![(NodeKind::User, 2), (NodeKind::Group, 1)]
        );
        assert_eq!(stats.edges_per_kind, vec![(EdgeKind::MemberOf, 2)]);
    }

    #[test]
    fn test_clear() {
        let mut store = GraphStore::new();
        let a = user(&mut store, 1);
        let b = user(&mut store, 2);
        store.add_edge(a, b, EdgeKind::HasSession);

        store.clear();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.find_by_name("USER00001@TESTLAB.LOCAL"), None);
        assert!(store.nodes_of_kind(NodeKind::User).is_empty());
    }
}
