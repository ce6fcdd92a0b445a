//! dirsynth
//!
//! A deterministic synthesizer for identity-infrastructure attack graphs.
//! One run builds an in-memory property graph of an organization's directory
//! (on-premises objects, cloud objects, or a hybrid of both) together with
//! deliberately injected, policy-bounded privilege-escalation paths, for use
//! as training and benchmark data by graph-based security analysis tooling.
//!
//! # Architecture
//!
//! - [`graph`]: the property graph model: typed nodes and edges with
//!   attribute bags, held in a single write-only [`GraphStore`] per run
//! - [`config`]: strongly-typed generation parameters with documented
//!   defaults, loaded from JSON
//! - [`synth`]: the synthesis engine, from skeleton builder through
//!   misconfiguration injection, all driven by one seeded RNG
//! - [`cloud`]: the structurally parallel cloud-directory generators
//! - [`hybrid`]: the injective on-premises/cloud sync mapping
//! - [`export`]: the JSON Lines writer consumed by downstream importers
//!
//! # Example
//!
//! ```rust
//! use dirsynth::{Config, Synthesizer};
//!
//! let cfg = Config::from_json_str(r#"{"seed": 7, "User": {"nUsers": 50}}"#).unwrap();
//! let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
//! synth.run_on_prem();
//!
//! let stats = synth.store().statistics();
//! assert!(stats.node_count > 0);
//! let jsonl = dirsynth::export::to_jsonl_string(synth.store());
//! assert!(!jsonl.is_empty());
//! ```

#![warn(clippy::all)]

pub mod cloud;
pub mod config;
pub mod export;
pub mod graph;
pub mod hybrid;
pub mod synth;

// Re-export main types for convenience
pub use config::{Config, SecurityLevel};
pub use graph::{
    Edge, EdgeId, EdgeKind, GraphStatistics, GraphStore, Node, NodeId, NodeKind, PropertyMap,
    PropertyValue, SecondaryKey, SynthError, SynthResult,
};
pub use hybrid::SyncMap;
pub use synth::{segregate, IdAllocator, NamePool, Synthesizer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
