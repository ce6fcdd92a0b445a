//! End-to-end pipeline checks: the example configuration, population
//! bookkeeping, skeleton contents and export-to-disk.

use dirsynth::{export, Config, EdgeKind, NodeKind, Synthesizer};
use std::io::Read;

const EXAMPLE: &str = r#"{
    "seed": 7,
    "nTiers": 3,
    "User": {"nUsers": 100},
    "Computer": {"nComputers": 50},
    "Admin": {"Admin_Percentage": 10}
}"#;

#[test]
fn test_example_configuration_counts() {
    let run = || {
        let cfg = Config::from_json_str(EXAMPLE).unwrap();
        let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
        synth.run_on_prem();
        synth
    };
    let a = run();
    let b = run();

    for synth in [&a, &b] {
        let store = synth.store();
        // 100 generated users plus the 4 default accounts
        assert_eq!(store.nodes_of_kind(NodeKind::User).len(), 104);
        // 50 generated machines plus the domain controllers
        let dc_count = store
            .all_nodes()
            .iter()
            .filter(|n| {
                n.kind == NodeKind::Computer
                    && n.get_property("role").and_then(|p| p.as_string())
                        == Some("DomainController")
            })
            .count();
        assert_eq!(store.nodes_of_kind(NodeKind::Computer).len(), 50 + dc_count);
    }

    // Generated users take the RID sequence 1000..1099 in creation order,
    // identically in both runs.
    let rid_sequence = |synth: &Synthesizer| -> Vec<u64> {
        synth
            .store()
            .all_nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::User)
            .filter_map(|n| n.object_id.rsplit('-').next()?.parse::<u64>().ok())
            .filter(|rid| *rid >= 1000)
            .collect()
    };
    let rids_a = rid_sequence(&a);
    let rids_b = rid_sequence(&b);
    assert_eq!(rids_a, (1000..1100).collect::<Vec<u64>>());
    assert_eq!(rids_a, rids_b);
}

#[test]
fn test_admin_eligible_fraction_matches_percentage() {
    let cfg = Config::from_json_str(
        r#"{"seed": 7, "User": {"nUsers": 100, "enabled": 100}, "Admin": {"Admin_Percentage": 10},
            "nodeMisconfig": {"admin_regular": 0, "user_comp": 0}}"#,
    )
    .unwrap();
    let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
    let graph = synth.run_on_prem();

    // 10% of 100 enabled users are admin-eligible before misconfig splits.
    let admin_count: usize = graph.layout.admin_users.iter().map(Vec::len).sum();
    assert_eq!(admin_count, 10);
}

#[test]
fn test_skeleton_contains_expected_defaults() {
    let cfg = Config::from_json_str(r#"{"seed": 7}"#).unwrap();
    let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
    synth.run_on_prem();
    let store = synth.store();

    for name in [
        "DOMAIN ADMINS@TESTLAB.LOCALE",
        "ENTERPRISE ADMINS@TESTLAB.LOCALE",
        "ADMINISTRATORS@TESTLAB.LOCALE",
        "DOMAIN CONTROLLERS@TESTLAB.LOCALE",
        "ADMINISTRATOR@TESTLAB.LOCALE",
        "KRBTGT@TESTLAB.LOCALE",
        "DEFAULT DOMAIN POLICY@TESTLAB.LOCALE",
        "POLICIES@TESTLAB.LOCALE",
    ] {
        assert!(store.find_by_name(name).is_some(), "missing {}", name);
    }

    // Replication rights on the domain head for the DCSync path.
    let domain = store.find_by_name("TESTLAB.LOCALE").unwrap();
    let has_dcsync = store
        .all_edges()
        .iter()
        .any(|e| e.kind == EdgeKind::GetChangesAll && e.target == domain);
    assert!(has_dcsync);
}

#[test]
fn test_sessions_connect_machines_to_principals() {
    let cfg = Config::from_json_str(r#"{"seed": 7}"#).unwrap();
    let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
    synth.run_on_prem();
    let store = synth.store();

    let mut sessions = 0;
    for edge in store.all_edges() {
        if edge.kind != EdgeKind::HasSession {
            continue;
        }
        sessions += 1;
        assert_eq!(store.get_node(edge.source).unwrap().kind, NodeKind::Computer);
        assert_eq!(store.get_node(edge.target).unwrap().kind, NodeKind::User);
    }
    assert!(sessions > 0);
}

#[test]
fn test_export_writes_every_record_to_disk() {
    let cfg = Config::from_json_str(r#"{"seed": 7, "User": {"nUsers": 30}}"#).unwrap();
    let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
    synth.run_on_prem();
    let store = synth.store();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.json");
    let file = std::fs::File::create(&path).unwrap();
    export::write_jsonl(store, std::io::BufWriter::new(file)).unwrap();

    let mut contents = String::new();
    std::fs::File::open(&path)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();

    let lines = contents.lines().count();
    assert_eq!(lines, store.node_count() + store.edge_count());

    // Every line parses and node records precede relationship records.
    let mut seen_relationship = false;
    for line in contents.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        match value["type"].as_str().unwrap() {
            "node" => assert!(!seen_relationship),
            "relationship" => seen_relationship = true,
            other => panic!("unexpected record type {}", other),
        }
    }
    assert!(seen_relationship);
}

#[test]
fn test_store_reset_between_runs() {
    let cfg = Config::from_json_str(r#"{"seed": 7, "User": {"nUsers": 20}}"#).unwrap();
    let mut synth = Synthesizer::new(cfg.clone(), "TESTLAB.LOCALE", None);
    synth.run_on_prem();
    let first_count = synth.store().node_count();

    // A new synthesizer is a fresh store with fresh counters.
    let mut second = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
    second.run_on_prem();
    assert_eq!(second.store().node_count(), first_count);
}
