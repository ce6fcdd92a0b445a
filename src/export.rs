//! JSON Lines export
//!
//! Serializes exactly what the store contains: one record per line, nodes
//! first, then edges, both in insertion order. The store is never mutated.
//! The record shape matches what the downstream bulk importer consumes.

use crate::graph::{Edge, GraphStore, Node, PropertyMap, PropertyValue};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct NodeRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: &'static str,
    labels: Vec<&'static str>,
    properties: PropertyMap,
}

#[derive(Serialize)]
struct EndpointRecord {
    id: String,
}

#[derive(Serialize)]
struct EdgeRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: &'static str,
    label: &'static str,
    start: EndpointRecord,
    end: EndpointRecord,
    properties: PropertyMap,
}

fn node_record(node: &Node) -> NodeRecord {
    let mut properties = PropertyMap::new();
    properties.insert("name".to_string(), PropertyValue::from(node.name.as_str()));
    properties.insert(
        "objectid".to_string(),
        PropertyValue::from(node.object_id.as_str()),
    );
    properties.extend(node.properties.clone());

    NodeRecord {
        id: node.id.as_u64().to_string(),
        record_type: "node",
        labels: vec![node.kind.as_str()],
        properties,
    }
}

fn edge_record(edge: &Edge) -> EdgeRecord {
    EdgeRecord {
        id: edge.id.as_u64().to_string(),
        record_type: "relationship",
        label: edge.kind.as_str(),
        start: EndpointRecord {
            id: edge.source.as_u64().to_string(),
        },
        end: EndpointRecord {
            id: edge.target.as_u64().to_string(),
        },
        properties: edge.properties.clone(),
    }
}

/// Write the finished graph as JSON Lines.
pub fn write_jsonl<W: Write>(store: &GraphStore, mut writer: W) -> io::Result<()> {
    for node in store.all_nodes() {
        serde_json::to_writer(&mut writer, &node_record(node))?;
        writer.write_all(b"\n")?;
    }
    for edge in store.all_edges() {
        serde_json::to_writer(&mut writer, &edge_record(edge))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Write the finished graph as JSON Lines to a file path.
pub fn write_to_path(
    store: &GraphStore,
    path: impl AsRef<std::path::Path>,
) -> crate::graph::SynthResult<()> {
    let file = std::fs::File::create(path)?;
    write_jsonl(store, io::BufWriter::new(file))?;
    Ok(())
}

/// Render the finished graph as a JSON Lines string.
pub fn to_jsonl_string(store: &GraphStore) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    write_jsonl(store, &mut buf).expect("in-memory write");
    String::from_utf8(buf).expect("JSON output is UTF-8")
}
