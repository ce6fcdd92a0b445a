//! Global graph invariants over finished runs
//!
//! Referential integrity, identifier uniqueness, RID monotonicity and the
//! tier rules must hold at the end of any successful run.

use dirsynth::{Config, EdgeKind, NodeKind, Synthesizer};
use std::collections::HashSet;

fn run(json: &str) -> Synthesizer {
    let cfg = Config::from_json_str(json).unwrap();
    let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
    synth.run_on_prem();
    synth
}

#[test]
fn test_every_edge_references_existing_nodes() {
    let synth = run(r#"{"seed": 7}"#);
    let store = synth.store();
    let node_count = store.node_count() as u64;

    for edge in store.all_edges() {
        assert!(edge.source.as_u64() < node_count);
        assert!(edge.target.as_u64() < node_count);
        assert!(store.get_node(edge.source).is_some());
        assert!(store.get_node(edge.target).is_some());
    }
}

#[test]
fn test_object_ids_are_unique() {
    let synth = run(r#"{"seed": 11}"#);
    let mut seen = HashSet::new();
    for node in synth.store().all_nodes() {
        assert!(
            seen.insert(node.object_id.as_str()),
            "duplicate object id {}",
            node.object_id
        );
    }
}

#[test]
fn test_generated_rids_are_strictly_increasing() {
    let synth = run(r#"{"seed": 13}"#);
    let base = "S-1-5-21-883232822-274137685-4173207997-";

    // Generated security principals appear in the store in allocation order;
    // their RIDs must increase strictly from 1000 with no reuse.
    let mut last: Option<u64> = None;
    for node in synth.store().all_nodes() {
        if !node.kind.is_security_principal() {
            continue;
        }
        let Some(rid) = node
            .object_id
            .strip_prefix(base)
            .and_then(|r| r.parse::<u64>().ok())
        else {
            continue;
        };
        if rid < 1000 {
            continue; // well-known principal
        }
        if let Some(prev) = last {
            assert!(rid > prev, "RID {} not greater than {}", rid, prev);
        } else {
            assert_eq!(rid, 1000);
        }
        last = Some(rid);
    }
    assert!(last.is_some());
}

#[test]
fn test_group_nesting_outside_misconfig_is_tier_monotone() {
    let synth = run(r#"{"seed": 17, "Group": {"nesting_probability": 100}}"#);
    let store = synth.store();

    for edge in store.all_edges() {
        if edge.kind != EdgeKind::MemberOf {
            continue;
        }
        if edge.get_property("misconfigured").and_then(|p| p.as_boolean()) == Some(true) {
            continue;
        }
        let source = store.get_node(edge.source).unwrap();
        let target = store.get_node(edge.target).unwrap();
        if source.kind != NodeKind::Group || target.kind != NodeKind::Group {
            continue;
        }
        let (Some(member_tier), Some(container_tier)) = (
            source.get_property("tier").and_then(|p| p.as_integer()),
            target.get_property("tier").and_then(|p| p.as_integer()),
        ) else {
            continue;
        };
        assert!(
            container_tier <= member_tier,
            "non-misconfigured nesting inverted tiers: {} contains {}",
            target.name,
            source.name
        );
    }
}

#[test]
fn test_tier0_misconfig_budget_holds_end_to_end() {
    let synth = run(
        r#"{
            "seed": 23,
            "perc_misconfig_permissions": {"Customized": 40, "Low": 10, "High": 2},
            "misconfig_permissions_to_tier_0": {"allow": 1, "limit": 1}
        }"#,
    );
    let store = synth.store();

    let tier0_hits = store
        .all_edges()
        .iter()
        .filter(|e| {
            e.get_property("misconfigured").and_then(|p| p.as_boolean()) == Some(true)
                && e.kind != EdgeKind::HasSession
                && e.kind != EdgeKind::MemberOf
                && store
                    .get_node(e.target)
                    .and_then(|n| n.get_property("tier"))
                    .and_then(|p| p.as_integer())
                    == Some(0)
        })
        .count();
    assert!(tier0_hits <= 1, "tier-0 budget exceeded: {}", tier0_hits);
}

#[test]
fn test_directed_toggle_off_doubles_permission_edges() {
    let run_with = |directed: bool| {
        let cfg = Config::from_json_str(&format!(
            r#"{{"seed": 29, "convert_to_directed_graphs": {}}}"#,
            directed
        ))
        .unwrap();
        let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
        synth.run_on_prem();
        synth
            .store()
            .all_edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::AdminTo)
            .count()
    };

    let directed = run_with(true);
    let undirected = run_with(false);
    assert_eq!(undirected, directed * 2);
}

#[test]
fn test_density_matches_definition() {
    let synth = run(r#"{"seed": 31}"#);
    let stats = synth.store().statistics();
    let n = stats.node_count as f64;
    let expected = stats.edge_count as f64 / (n * (n - 1.0));
    assert!((stats.density - expected).abs() < 1e-12);
}
