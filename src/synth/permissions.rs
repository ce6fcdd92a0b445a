//! Permission and administrative-right edges
//!
//! Two passes run over the same tier/principal structure: operational
//! (non-ACL) rights and ACL rights, each driven by a per-right weight table
//! and a principal-selection percentage. Default ACLs for the well-known
//! groups and the admin/local-admin rights follow. Cross-tier grants are the
//! misconfiguration engine's territory; everything here stays inside a tier.

use super::{props, sampling, OnPremGraph, Synthesizer};
use crate::graph::{EdgeKind, NodeId, PropertyMap, PropertyValue};

/// Which right family a permission pass distributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclMode {
    /// RDP, DCOM execution, delegation, LAPS reads
    Operational,
    /// Directory object rights (full control, write-property, ...)
    Acl,
}

/// Map a weight-table key to its edge label.
pub(crate) fn right_for(name: &str) -> Option<EdgeKind> {
    Some(match name {
        "CanRDP" => EdgeKind::CanRdp,
        "ExecuteDCOM" => EdgeKind::ExecuteDcom,
        "AllowedToDelegate" => EdgeKind::AllowedToDelegate,
        "ReadLAPSPassword" => EdgeKind::ReadLapsPassword,
        "GenericAll" => EdgeKind::GenericAll,
        "GenericWrite" => EdgeKind::GenericWrite,
        "WriteOwner" => EdgeKind::WriteOwner,
        "WriteDacl" => EdgeKind::WriteDacl,
        "AddMember" => EdgeKind::AddMember,
        "ForceChangePassword" => EdgeKind::ForceChangePassword,
        "AllExtendedRights" => EdgeKind::AllExtendedRights,
        "Owns" => EdgeKind::Owns,
        _ => return None,
    })
}

impl Synthesizer {
    /// Insert a permission edge; with the directed-graph toggle off the
    /// grant also gets a reverse companion edge (output shape only).
    pub(crate) fn grant(
        &mut self,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
        properties: PropertyMap,
    ) {
        self.store
            .add_edge_with_properties(source, target, kind, properties.clone());
        if !self.cfg.convert_to_directed_graphs {
            self.store
                .add_edge_with_properties(target, source, kind, properties);
        }
    }

    pub(crate) fn create_control_management_permissions(
        &mut self,
        graph: &OnPremGraph,
        mode: AclMode,
    ) {
        let (percentage, table) = match mode {
            AclMode::Operational => (
                self.cfg.non_acls.principal_percentage,
                self.cfg.non_acls.probability.clone(),
            ),
            AclMode::Acl => (
                self.cfg.acls.principal_percentage,
                self.cfg.acls.probability.clone(),
            ),
        };

        for tier in 0..graph.layout.n_tiers {
            let principals = graph.layout.principals(tier);
            let machines = graph.layout.machines(tier);
            let groups = &graph.layout.groups[tier];

            let selected = principals.len() * percentage as usize / 100;
            let sources = sampling::sample_indices(&mut self.rng, principals.len(), selected);

            for idx in sources {
                let source = principals[idx];
                let Some(right_name) = sampling::weighted_choice(&mut self.rng, &table) else {
                    continue;
                };
                let right_name = right_name.to_string();
                let Some(kind) = right_for(&right_name) else {
                    tracing::warn!(right = %right_name, "unrecognized right in weight table");
                    continue;
                };

                let target = match mode {
                    AclMode::Operational => sampling::pick(&mut self.rng, &machines).copied(),
                    AclMode::Acl => match kind {
                        EdgeKind::AddMember => sampling::pick(&mut self.rng, groups).copied(),
                        EdgeKind::ForceChangePassword => {
                            sampling::pick(&mut self.rng, &principals).copied()
                        }
                        _ => {
                            let mut pool = principals.clone();
                            pool.extend_from_slice(&machines);
                            pool.extend_from_slice(groups);
                            sampling::pick(&mut self.rng, &pool).copied()
                        }
                    },
                };
                let Some(target) = target else { continue };
                if target == source {
                    continue;
                }
                self.grant(source, target, kind, PropertyMap::new());
            }
        }
    }

    /// Tier admin groups administer their own tier's machines; Domain Admins
    /// administer the domain controllers.
    pub(crate) fn assign_administration_to_admin_principals(&mut self, graph: &OnPremGraph) {
        for tier in 0..graph.layout.n_tiers {
            let admin_group = graph.skeleton.tier_admin_groups[tier];
            for machine in graph.layout.machines(tier) {
                self.grant(admin_group, machine, EdgeKind::AdminTo, PropertyMap::new());
            }
        }

        if let Some(da) = self.default_group("DOMAIN ADMINS") {
            for dc in graph.domain_controllers.clone() {
                self.grant(da, dc, EdgeKind::AdminTo, PropertyMap::new());
            }
        }
    }

    /// Local-admin groups administer a bounded sample of their tier's
    /// machines.
    pub(crate) fn assign_local_admin_rights(&mut self, layout: &super::tiers::TierLayout) {
        for tier in 0..layout.n_tiers {
            let machines = layout.machines(tier);
            if machines.is_empty() {
                continue;
            }
            for group in layout.local_admin_groups[tier].clone() {
                let count = sampling::in_range(&mut self.rng, [1, self.cfg.group.resource_threshold])
                    as usize;
                let chosen: Vec<NodeId> = sampling::sample(&mut self.rng, &machines, count)
                    .into_iter()
                    .copied()
                    .collect();
                for machine in chosen {
                    self.grant(group, machine, EdgeKind::AdminTo, PropertyMap::new());
                }
            }
        }
    }

    /// Built-in ACLs for well-known groups, plus exploitable-GPO write paths.
    pub(crate) fn create_default_acls(&mut self, graph: &OnPremGraph) {
        let domain_node = graph.skeleton.domain_node;

        for short in ["DOMAIN ADMINS", "ENTERPRISE ADMINS", "ADMINISTRATORS"] {
            if let Some(group) = self.default_group(short) {
                self.grant(
                    group,
                    domain_node,
                    EdgeKind::AllExtendedRights,
                    PropertyMap::new(),
                );
            }
        }

        if let Some(da) = self.default_group("DOMAIN ADMINS") {
            self.grant(da, domain_node, EdgeKind::Owns, PropertyMap::new());
        }

        // Tier admin groups hold their tier root OU.
        for tier in 0..graph.layout.n_tiers {
            let admin_group = graph.skeleton.tier_admin_groups[tier];
            let tier_ou = graph.skeleton.tier_ous[tier];
            self.grant(admin_group, tier_ou, EdgeKind::GenericAll, PropertyMap::new());
            self.grant(admin_group, tier_ou, EdgeKind::Owns, PropertyMap::new());
        }

        if let Some(ea) = self.default_group("ENTERPRISE ADMINS") {
            for group in graph.skeleton.tier_admin_groups.clone() {
                self.grant(ea, group, EdgeKind::WriteDacl, PropertyMap::new());
                self.grant(ea, group, EdgeKind::WriteOwner, PropertyMap::new());
            }
        }

        // An exploitable GPO is writable by some regular user: the intended
        // GPO-based attack path.
        for gpo in graph.skeleton.exploitable_gpos.clone() {
            let Some(user) = sampling::pick(&mut self.rng, &graph.all_enabled_users).copied()
            else {
                break;
            };
            self.grant(
                user,
                gpo,
                EdgeKind::GenericWrite,
                props([("exploitable", PropertyValue::from(true))]),
            );
        }
    }
}
