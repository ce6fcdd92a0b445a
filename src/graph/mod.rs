//! In-memory directory graph model
//!
//! Nodes are directory objects from a closed kind set, edges carry labels from
//! a closed relationship vocabulary, and both hold attribute bags. The store
//! is the single mutable repository for one generation run.

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{GraphStatistics, GraphStore, SecondaryKey, SynthError, SynthResult};
pub use types::{EdgeId, EdgeKind, NodeId, NodeKind};
