//! Hybrid synchronization
//!
//! Samples a fraction of the on-premises users, creates cloud counterparts
//! with back-references, records the injective sync mapping, and derives the
//! cross-environment permission edges that make hybrid identity a lateral
//! movement surface.

use crate::cloud::{self, CloudTenant};
use crate::graph::{EdgeKind, NodeId, NodeKind, PropertyValue};
use crate::synth::{ids, props, sampling, OnPremGraph, Synthesizer};
use rustc_hash::FxHashMap;

/// Injective mapping between on-premises identities and their cloud
/// counterparts, with reverse lookup. Both directions are checked on insert;
/// a collision is an integrity defect, not a recoverable state.
#[derive(Debug, Default)]
pub struct SyncMap {
    pairs: Vec<(NodeId, NodeId)>,
    forward: FxHashMap<String, String>,
    reverse: FxHashMap<String, String>,
}

impl SyncMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        on_prem: NodeId,
        cloud: NodeId,
        on_prem_key: String,
        cloud_object_id: String,
    ) {
        let prior_forward = self
            .forward
            .insert(on_prem_key.clone(), cloud_object_id.clone());
        let prior_reverse = self.reverse.insert(cloud_object_id, on_prem_key);
        assert!(
            prior_forward.is_none() && prior_reverse.is_none(),
            "sync mapping must stay injective"
        );
        self.pairs.push((on_prem, cloud));
    }

    /// Cloud object id synced from an on-premises identity.
    pub fn cloud_for(&self, on_prem_key: &str) -> Option<&str> {
        self.forward.get(on_prem_key).map(String::as_str)
    }

    /// On-premises identity behind a cloud object id.
    pub fn on_prem_for(&self, cloud_object_id: &str) -> Option<&str> {
        self.reverse.get(cloud_object_id).map(String::as_str)
    }

    /// Synced node pairs in creation order.
    pub fn pairs(&self) -> &[(NodeId, NodeId)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Build the cloud side of a hybrid run and wire it to the finished
/// on-premises structure.
pub(crate) fn generate(s: &mut Synthesizer, graph: &OnPremGraph) -> SyncMap {
    tracing::info!("creating cloud tenant for hybrid run");
    let mut tenant = cloud::generate_infrastructure(s);

    let mut sync = SyncMap::new();
    let synced = create_synced_cloud_users(s, graph, &tenant, &mut sync);
    let cloud_only = create_cloud_only_users(s, &tenant);

    let mut all_users = synced;
    all_users.extend_from_slice(&cloud_only);
    tenant.users = all_users.clone();

    tracing::info!("assigning cloud group memberships");
    cloud::assign_group_memberships(s, &tenant);
    tracing::info!("assigning cloud roles");
    cloud::assign_roles(s, &tenant, &all_users);
    tracing::info!("generating cloud permissions");
    cloud::create_permissions(s, &tenant, &all_users);

    tracing::info!(count = sync.len(), "creating sync relationships");
    create_sync_edges(s, &sync);

    tracing::info!("creating cross-environment permissions");
    create_cross_environment_permissions(s, graph, &tenant, &all_users, &sync);

    sync
}

/// One cloud user per sampled on-premises user, carrying a back-reference to
/// the source identity.
fn create_synced_cloud_users(
    s: &mut Synthesizer,
    graph: &OnPremGraph,
    tenant: &CloudTenant,
    sync: &mut SyncMap,
) -> Vec<NodeId> {
    let percentage = s.cfg.hybrid.sync_percentage;
    let wanted = graph.all_enabled_users.len() * percentage as usize / 100;
    let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, &graph.all_enabled_users, wanted)
        .into_iter()
        .copied()
        .collect();
    tracing::info!(count = chosen.len(), "syncing users to the cloud tenant");

    let tenant_oid = s
        .store
        .get_node(tenant.tenant)
        .map(|n| n.object_id.clone())
        .unwrap_or_default();
    let domain_lower = s.domain().to_lowercase();

    let mut cloud_users = Vec::with_capacity(chosen.len());
    for on_prem in chosen {
        let (on_prem_name, display, enabled) = {
            let Some(node) = s.store.get_node(on_prem) else {
                continue;
            };
            (
                node.name.clone(),
                node.get_property("displayname")
                    .and_then(|p| p.as_string())
                    .unwrap_or(node.name.as_str())
                    .to_string(),
                node.get_property("enabled")
                    .and_then(|p| p.as_boolean())
                    .unwrap_or(true),
            )
        };
        let local_part = on_prem_name
            .split('@')
            .next()
            .unwrap_or(on_prem_name.as_str())
            .to_lowercase();
        let upn = format!("{}@{}", local_part, domain_lower);

        let object_id = ids::new_object_id(&mut s.rng);
        let cloud_user = s.store.add_node(
            NodeKind::CloudUser,
            display.clone(),
            object_id.clone(),
            props([
                ("userPrincipalName", PropertyValue::from(upn)),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("enabled", PropertyValue::from(enabled)),
                ("displayName", PropertyValue::from(display)),
                ("syncedFromOnPremises", PropertyValue::from(true)),
                (
                    "onPremisesUserPrincipalName",
                    PropertyValue::from(on_prem_name.as_str()),
                ),
            ]),
        );
        s.store
            .add_edge(tenant.tenant, cloud_user, EdgeKind::AzContains);

        sync.insert(on_prem, cloud_user, on_prem_name, object_id);
        cloud_users.push(cloud_user);
    }
    cloud_users
}

/// Contractors and partners that exist only in the cloud directory.
fn create_cloud_only_users(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let from_percentage =
        s.cfg.user.n_users as usize * s.cfg.hybrid.cloud_only_percentage as usize / 100;
    let count = from_percentage.max(s.cfg.hybrid.cloud_only_minimum as usize);
    tracing::info!(count, "creating cloud-only users");

    let tenant_oid = s
        .store
        .get_node(tenant.tenant)
        .map(|n| n.object_id.clone())
        .unwrap_or_default();
    let domain_lower = s.domain().to_lowercase();

    let mut users = Vec::with_capacity(count);
    for _ in 0..count {
        let (first, last) = s.names.display_name(&mut s.rng);
        let display = format!("{} {}", first, last);
        let upn = format!(
            "{}.{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            domain_lower
        );
        let enabled = sampling::chance(&mut s.rng, 75);
        let user_type = if sampling::chance(&mut s.rng, 50) {
            "Member"
        } else {
            "Guest"
        };

        let object_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::CloudUser,
            display.clone(),
            object_id,
            props([
                ("userPrincipalName", PropertyValue::from(upn)),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("enabled", PropertyValue::from(enabled)),
                ("displayName", PropertyValue::from(display)),
                ("syncedFromOnPremises", PropertyValue::from(false)),
                ("userType", PropertyValue::from(user_type)),
                ("accountType", PropertyValue::from("Cloud-Only")),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        users.push(id);
    }
    users
}

/// A bidirectional pair of synchronization edges per synced identity.
fn create_sync_edges(s: &mut Synthesizer, sync: &SyncMap) {
    for (on_prem, cloud) in sync.pairs() {
        s.store.add_edge_with_properties(
            *on_prem,
            *cloud,
            EdgeKind::SyncedTo,
            props([
                ("syncType", PropertyValue::from("AADConnect")),
                ("syncDirection", PropertyValue::from("OnPremToAzure")),
            ]),
        );
        s.store.add_edge_with_properties(
            *cloud,
            *on_prem,
            EdgeKind::SyncedFrom,
            props([
                ("syncType", PropertyValue::from("AADConnect")),
                ("syncDirection", PropertyValue::from("AzureToOnPrem")),
            ]),
        );
    }
}

/// Permission edges that cross the environment boundary in both directions.
fn create_cross_environment_permissions(
    s: &mut Synthesizer,
    graph: &OnPremGraph,
    tenant: &CloudTenant,
    cloud_users: &[NodeId],
    sync: &SyncMap,
) {
    let on_prem_users = &graph.all_enabled_users;
    let on_prem_computers: Vec<NodeId> =
        s.store.nodes_of_kind(NodeKind::Computer).to_vec();

    // Cloud administrators reaching into the on-premises directory.
    let admin_count = cloud_users.len().min(8);
    let hybrid_admins: Vec<NodeId> = sampling::sample(&mut s.rng, cloud_users, admin_count)
        .into_iter()
        .copied()
        .collect();
    for admin in hybrid_admins {
        if let Some(target) = sampling::pick(&mut s.rng, on_prem_users).copied() {
            s.store.add_edge_with_properties(
                admin,
                target,
                EdgeKind::ForceChangePassword,
                props([
                    ("isHybridPermission", PropertyValue::from(true)),
                    (
                        "grantedVia",
                        PropertyValue::from("Azure AD Privileged Identity Management"),
                    ),
                ]),
            );
        }
        if let Some(target) = sampling::pick(&mut s.rng, &on_prem_computers).copied() {
            s.store.add_edge_with_properties(
                admin,
                target,
                EdgeKind::AdminTo,
                props([
                    ("isHybridPermission", PropertyValue::from(true)),
                    ("grantedVia", PropertyValue::from("Azure Arc")),
                ]),
            );
        }
    }

    // Service principals with on-premises read access.
    let sp_count = tenant.service_principals.len().min(3);
    let sps: Vec<NodeId> = sampling::sample(&mut s.rng, &tenant.service_principals, sp_count)
        .into_iter()
        .copied()
        .collect();
    for sp in sps {
        if let Some(target) = sampling::pick(&mut s.rng, on_prem_users).copied() {
            s.store.add_edge_with_properties(
                sp,
                target,
                EdgeKind::ReadLapsPassword,
                props([
                    ("isHybridPermission", PropertyValue::from(true)),
                    ("grantedVia", PropertyValue::from("Hybrid Identity")),
                ]),
            );
        }
    }

    // Synced identities whose cloud half carries rights derived from
    // on-premises membership.
    let synced_count = sync.len().min(15);
    let pairs: Vec<(NodeId, NodeId)> = sampling::sample(&mut s.rng, sync.pairs(), synced_count)
        .into_iter()
        .copied()
        .collect();
    for (_, cloud_user) in pairs {
        if let Some(group) = sampling::pick(&mut s.rng, &tenant.groups).copied() {
            s.store.add_edge_with_properties(
                cloud_user,
                group,
                EdgeKind::AzMemberOf,
                props([("grantedViaSync", PropertyValue::from(true))]),
            );
        }
        if sampling::chance(&mut s.rng, 30) {
            if let Some(vault) = sampling::pick(&mut s.rng, &tenant.key_vaults).copied() {
                s.store.add_edge_with_properties(
                    cloud_user,
                    vault,
                    EdgeKind::AzKeyVaultContributor,
                    props([
                        ("grantedViaSync", PropertyValue::from(true)),
                        (
                            "source",
                            PropertyValue::from("On-premises group membership"),
                        ),
                    ]),
                );
            }
        }
        if sampling::chance(&mut s.rng, 20) {
            if let Some(vm) = sampling::pick(&mut s.rng, &tenant.vms).copied() {
                s.store.add_edge_with_properties(
                    cloud_user,
                    vm,
                    EdgeKind::AzVmContributor,
                    props([
                        ("grantedViaSync", PropertyValue::from(true)),
                        ("source", PropertyValue::from("On-premises admin rights")),
                    ]),
                );
            }
        }
    }

    // Some cloud groups correspond to on-premises security groups.
    let on_prem_groups: Vec<NodeId> = (0..graph.layout.n_tiers)
        .flat_map(|t| graph.layout.groups[t].iter().copied())
        .collect();
    let corresponding = tenant.groups.len().min(on_prem_groups.len()).min(5);
    for i in 0..corresponding {
        let cloud_group = tenant.groups[i];
        let on_prem_group = on_prem_groups[i];
        s.store.add_edge_with_properties(
            on_prem_group,
            cloud_group,
            EdgeKind::SyncedTo,
            props([
                ("syncType", PropertyValue::from("AADConnect")),
                ("groupCorrespondence", PropertyValue::from(true)),
            ]),
        );
        s.store.add_edge_with_properties(
            cloud_group,
            on_prem_group,
            EdgeKind::SyncedFrom,
            props([
                ("syncType", PropertyValue::from("AADConnect")),
                ("groupCorrespondence", PropertyValue::from(true)),
            ]),
        );
    }

    // Hybrid-joined machines show up on the cloud side as well.
    let joined_count = on_prem_computers.len() * 40 / 100;
    let joined: Vec<NodeId> = sampling::sample(&mut s.rng, &on_prem_computers, joined_count)
        .into_iter()
        .copied()
        .collect();
    for computer in joined {
        if let Some(vm) = sampling::pick(&mut s.rng, &tenant.vms).copied() {
            s.store.add_edge_with_properties(
                computer,
                vm,
                EdgeKind::AzureAdJoined,
                props([
                    ("joinType", PropertyValue::from("Hybrid")),
                    ("managedBy", PropertyValue::from("Intune")),
                ]),
            );
        }
    }
}
