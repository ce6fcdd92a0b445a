//! Hybrid run properties: injective sync mapping, paired sync edges and
//! cross-environment permissions.

use dirsynth::{Config, EdgeKind, NodeKind, Synthesizer};
use std::collections::HashSet;

fn run(json: &str) -> (Synthesizer, dirsynth::SyncMap) {
    let cfg = Config::from_json_str(json).unwrap();
    let mut synth = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
    let sync = synth.run_hybrid();
    (synth, sync)
}

#[test]
fn test_sync_mapping_is_injective() {
    let (synth, sync) = run(r#"{"seed": 7, "User": {"nUsers": 100}}"#);
    let store = synth.store();

    let mut on_prem_seen = HashSet::new();
    let mut cloud_seen = HashSet::new();
    for (on_prem, cloud) in sync.pairs() {
        assert!(on_prem_seen.insert(*on_prem), "on-prem user synced twice");
        assert!(cloud_seen.insert(*cloud), "cloud user targeted twice");

        let on_prem_node = store.get_node(*on_prem).unwrap();
        let cloud_node = store.get_node(*cloud).unwrap();
        assert_eq!(on_prem_node.kind, NodeKind::User);
        assert_eq!(cloud_node.kind, NodeKind::CloudUser);

        // Forward and reverse lookups agree.
        assert_eq!(
            sync.cloud_for(&on_prem_node.name),
            Some(cloud_node.object_id.as_str())
        );
        assert_eq!(
            sync.on_prem_for(&cloud_node.object_id),
            Some(on_prem_node.name.as_str())
        );
    }
}

#[test]
fn test_sync_edge_count_is_twice_synced_identities() {
    let (synth, sync) = run(r#"{"seed": 11, "User": {"nUsers": 80}}"#);
    let store = synth.store();

    let synced_to = store
        .all_edges()
        .iter()
        .filter(|e| {
            e.kind == EdgeKind::SyncedTo
                && e.get_property("groupCorrespondence").is_none()
        })
        .count();
    let synced_from = store
        .all_edges()
        .iter()
        .filter(|e| {
            e.kind == EdgeKind::SyncedFrom
                && e.get_property("groupCorrespondence").is_none()
        })
        .count();

    assert_eq!(synced_to, sync.len());
    assert_eq!(synced_from, sync.len());
}

#[test]
fn test_sync_percentage_governs_volume() {
    let (synth, sync) = run(
        r#"{"seed": 13, "User": {"nUsers": 100, "enabled": 100}, "Hybrid": {"sync_percentage": 50}}"#,
    );
    // All 100 generated users are enabled; half of them sync.
    assert_eq!(sync.len(), 50);
}

#[test]
fn test_synced_cloud_users_carry_back_references() {
    let (synth, sync) = run(r#"{"seed": 17, "User": {"nUsers": 60}}"#);
    let store = synth.store();

    for (on_prem, cloud) in sync.pairs() {
        let on_prem_name = store.get_node(*on_prem).unwrap().name.clone();
        let cloud_node = store.get_node(*cloud).unwrap();
        assert_eq!(
            cloud_node
                .get_property("syncedFromOnPremises")
                .and_then(|p| p.as_boolean()),
            Some(true)
        );
        assert_eq!(
            cloud_node
                .get_property("onPremisesUserPrincipalName")
                .and_then(|p| p.as_string()),
            Some(on_prem_name.as_str())
        );
    }
}

#[test]
fn test_cloud_only_users_respect_minimum() {
    let (synth, _) = run(
        r#"{"seed": 19, "User": {"nUsers": 20}, "Hybrid": {"cloud_only_percentage": 15, "cloud_only_minimum": 10}}"#,
    );
    let cloud_only = synth
        .store()
        .all_nodes()
        .iter()
        .filter(|n| {
            n.kind == NodeKind::CloudUser
                && n.get_property("accountType").and_then(|p| p.as_string()) == Some("Cloud-Only")
        })
        .count();
    // 15% of 20 is 3, so the floor of 10 wins
    assert_eq!(cloud_only, 10);
}

#[test]
fn test_cross_environment_permissions_exist() {
    let (synth, _) = run(r#"{"seed": 23, "User": {"nUsers": 100}}"#);
    let store = synth.store();

    let hybrid_grants = store
        .all_edges()
        .iter()
        .filter(|e| {
            e.get_property("isHybridPermission")
                .and_then(|p| p.as_boolean())
                == Some(true)
        })
        .count();
    assert!(hybrid_grants > 0);

    // Cloud admins reach on-premises identities.
    let cross_reset = store.all_edges().iter().any(|e| {
        e.kind == EdgeKind::ForceChangePassword
            && store.get_node(e.source).unwrap().kind == NodeKind::CloudUser
            && store.get_node(e.target).unwrap().kind == NodeKind::User
    });
    assert!(cross_reset);
}

#[test]
fn test_hybrid_joined_computers_link_to_vms() {
    let (synth, _) = run(r#"{"seed": 29, "Computer": {"nComputers": 50}}"#);
    let store = synth.store();

    for edge in store.all_edges() {
        if edge.kind != EdgeKind::AzureAdJoined {
            continue;
        }
        assert_eq!(store.get_node(edge.source).unwrap().kind, NodeKind::Computer);
        assert_eq!(
            store.get_node(edge.target).unwrap().kind,
            NodeKind::VirtualMachine
        );
    }
}
