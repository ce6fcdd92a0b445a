//! Tier placement
//!
//! Assigns principals, machines and groups to privilege tiers (0 is most
//! privileged) and to tier-scoped OUs. The [`TierLayout`] records what landed
//! where; the session and misconfiguration engines consume it later.

use super::{sampling, skeleton::Skeleton, Synthesizer};
use crate::graph::{EdgeKind, NodeId};

/// Per-tier bookkeeping of placed machines, principals and groups.
#[derive(Debug)]
pub struct TierLayout {
    pub n_tiers: usize,
    pub paw: Vec<Vec<NodeId>>,
    pub servers: Vec<Vec<NodeId>>,
    pub workstations: Vec<Vec<NodeId>>,
    pub admin_users: Vec<Vec<NodeId>>,
    pub enabled_users: Vec<Vec<NodeId>>,
    /// Security groups per tier (default and tier admin groups excluded)
    pub groups: Vec<Vec<NodeId>>,
    /// Distribution groups per tier
    pub distribution_groups: Vec<Vec<NodeId>>,
    pub local_admin_groups: Vec<Vec<NodeId>>,
    pub server_operators: Vec<NodeId>,
    pub print_operators: Vec<NodeId>,
}

impl TierLayout {
    pub fn new(n_tiers: usize) -> Self {
        TierLayout {
            n_tiers,
            paw: vec![Vec::new(); n_tiers],
            servers: vec![Vec::new(); n_tiers],
            workstations: vec![Vec::new(); n_tiers],
            admin_users: vec![Vec::new(); n_tiers],
            enabled_users: vec![Vec::new(); n_tiers],
            groups: vec![Vec::new(); n_tiers],
            distribution_groups: vec![Vec::new(); n_tiers],
            local_admin_groups: vec![Vec::new(); n_tiers],
            server_operators: Vec::new(),
            print_operators: Vec::new(),
        }
    }

    /// All machines recorded for a tier, PAWs first.
    pub fn machines(&self, tier: usize) -> Vec<NodeId> {
        let mut out = self.paw[tier].clone();
        out.extend_from_slice(&self.servers[tier]);
        out.extend_from_slice(&self.workstations[tier]);
        out
    }

    /// All principals recorded for a tier, admins first.
    pub fn principals(&self, tier: usize) -> Vec<NodeId> {
        let mut out = self.admin_users[tier].clone();
        out.extend_from_slice(&self.enabled_users[tier]);
        out
    }
}

impl Synthesizer {
    /// Distribute items across tiers by the configured weight table
    /// (uniform when none is configured). When the population is at least
    /// the tier count every tier receives at least one item; otherwise the
    /// lowest-numbered tiers fill first and the rest stay empty.
    pub(crate) fn distribute_across_tiers(&mut self, items: &[NodeId]) -> Vec<Vec<NodeId>> {
        let n_tiers = self.cfg.n_tiers;
        let mut weights = self.cfg.admin.tier_weights.clone();
        weights.resize(n_tiers, if weights.is_empty() { 1 } else { 0 });
        if weights.iter().all(|w| *w == 0) {
            weights = vec![1; n_tiers];
        }

        let mut buckets = vec![Vec::new(); n_tiers];
        if items.len() < n_tiers {
            for (tier, item) in items.iter().enumerate() {
                buckets[tier].push(*item);
            }
            return buckets;
        }

        // Minimum-one-per-tier guarantee, then weight-proportional placement.
        for (tier, item) in items[..n_tiers].iter().enumerate() {
            buckets[tier].push(*item);
        }
        for item in &items[n_tiers..] {
            let tier = sampling::weighted_index(&mut self.rng, &weights).unwrap_or(n_tiers - 1);
            buckets[tier].push(*item);
        }
        buckets
    }

    /// PAWs spread over every tier; servers and workstations stay out of
    /// tier 0. Misplaced users land in computer OUs on purpose.
    pub(crate) fn place_computers_in_tiers(
        &mut self,
        layout: &mut TierLayout,
        skeleton: &Skeleton,
        paw: &[NodeId],
        servers: &[NodeId],
        workstations: &[NodeId],
        misconfig_users_comps: &[NodeId],
    ) {
        let n_tiers = self.cfg.n_tiers;

        let paw_buckets = self.distribute_across_tiers(paw);
        for (tier, bucket) in paw_buckets.into_iter().enumerate() {
            for machine in bucket {
                self.place_machine(layout, skeleton, machine, tier, MachineClass::Paw);
            }
        }

        let lower_tiers: Vec<usize> = if n_tiers > 1 {
            (1..n_tiers).collect()
        } else {
            vec![0]
        };

        for machine in servers {
            let tier = *sampling::pick(&mut self.rng, &lower_tiers).unwrap();
            self.place_machine(layout, skeleton, *machine, tier, MachineClass::Server);
        }
        for machine in workstations {
            let tier = *sampling::pick(&mut self.rng, &lower_tiers).unwrap();
            self.place_machine(layout, skeleton, *machine, tier, MachineClass::Workstation);
        }

        // Users deliberately filed in a computers OU.
        for user in misconfig_users_comps {
            let tier = *sampling::pick(&mut self.rng, &lower_tiers).unwrap();
            self.store
                .add_edge(skeleton.tier_computer_ous[tier], *user, EdgeKind::Contains);
            self.set_tier(*user, tier);
            layout.enabled_users[tier].push(*user);
        }
    }

    /// Admin users join their tier's admin group and OU; a few lowest-tier
    /// admins are nominated into the operator groups for the DC session
    /// stage. Regular users misfiled into admin OUs ride along.
    pub(crate) fn place_admin_users_in_tiers(
        &mut self,
        layout: &mut TierLayout,
        skeleton: &Skeleton,
        admins: &[NodeId],
        misconfig_regular_users: &[NodeId],
    ) {
        let buckets = self.distribute_across_tiers(admins);
        for (tier, bucket) in buckets.into_iter().enumerate() {
            for user in bucket {
                self.store
                    .add_edge(skeleton.tier_user_ous[tier], user, EdgeKind::Contains);
                self.store
                    .add_edge(user, skeleton.tier_admin_groups[tier], EdgeKind::MemberOf);
                self.set_tier(user, tier);
                layout.admin_users[tier].push(user);
            }
        }

        // Server and Print Operators come from tier 0.
        let tier0 = layout.admin_users[0].clone();
        let server_ops = sampling::sample(&mut self.rng, &tier0, 2);
        for user in server_ops {
            if let Some(group) = self.default_group("SERVER OPERATORS") {
                self.store.add_edge(*user, group, EdgeKind::MemberOf);
            }
            layout.server_operators.push(*user);
        }
        let print_ops = sampling::sample(&mut self.rng, &tier0, 2);
        for user in print_ops {
            if let Some(group) = self.default_group("PRINT OPERATORS") {
                self.store.add_edge(*user, group, EdgeKind::MemberOf);
            }
            layout.print_operators.push(*user);
        }

        // Regular users dropped into admin OUs on purpose.
        for user in misconfig_regular_users {
            let tier = self.random_tier();
            self.store
                .add_edge(skeleton.tier_user_ous[tier], *user, EdgeKind::Contains);
            self.set_tier(*user, tier);
            layout.enabled_users[tier].push(*user);
        }
    }

    /// Regular users, disabled accounts and the remaining deliberate
    /// misplacements.
    pub(crate) fn place_normal_users_in_tiers(
        &mut self,
        layout: &mut TierLayout,
        skeleton: &Skeleton,
        enabled_users: &[NodeId],
        disabled_users: &[NodeId],
        misconfig_admins: &[NodeId],
        misconfig_workstations: &[NodeId],
    ) {
        let n_tiers = self.cfg.n_tiers;
        let lowest = n_tiers - 1;
        let lower_tiers: Vec<usize> = if n_tiers > 1 {
            (1..n_tiers).collect()
        } else {
            vec![0]
        };

        for user in enabled_users {
            let tier = *sampling::pick(&mut self.rng, &lower_tiers).unwrap();
            self.store
                .add_edge(skeleton.tier_user_ous[tier], *user, EdgeKind::Contains);
            self.set_tier(*user, tier);
            layout.enabled_users[tier].push(*user);
            if let Some(group) = self.default_group("DOMAIN USERS") {
                self.store.add_edge(*user, group, EdgeKind::MemberOf);
            }
        }

        for user in disabled_users {
            self.store
                .add_edge(skeleton.tier_user_ous[lowest], *user, EdgeKind::Contains);
            self.set_tier(*user, lowest);
            if let Some(group) = self.default_group("DOMAIN USERS") {
                self.store.add_edge(*user, group, EdgeKind::MemberOf);
            }
        }

        // Admins kept in the regular OU: tier-group membership without the
        // tier-scoped container.
        for user in misconfig_admins {
            let tier = self.random_tier();
            self.store
                .add_edge(skeleton.tier_user_ous[lowest], *user, EdgeKind::Contains);
            self.store
                .add_edge(*user, skeleton.tier_admin_groups[tier], EdgeKind::MemberOf);
            self.set_tier(*user, tier);
            layout.admin_users[tier].push(*user);
        }

        // Workstations filed in the tier 0 computers OU.
        for machine in misconfig_workstations {
            self.store
                .add_edge(skeleton.tier_computer_ous[0], *machine, EdgeKind::Contains);
            self.set_tier(*machine, 0);
            layout.workstations[0].push(*machine);
        }
    }

    fn place_machine(
        &mut self,
        layout: &mut TierLayout,
        skeleton: &Skeleton,
        machine: NodeId,
        tier: usize,
        class: MachineClass,
    ) {
        self.store
            .add_edge(skeleton.tier_computer_ous[tier], machine, EdgeKind::Contains);
        self.set_tier(machine, tier);
        match class {
            MachineClass::Paw => layout.paw[tier].push(machine),
            MachineClass::Server => layout.servers[tier].push(machine),
            MachineClass::Workstation => layout.workstations[tier].push(machine),
        }
    }

    pub(crate) fn set_tier(&mut self, id: NodeId, tier: usize) {
        if let Some(node) = self.store.get_node_mut(id) {
            node.set_property("tier", tier as i64);
        }
    }

    pub(crate) fn tier_of(&self, id: NodeId) -> Option<usize> {
        self.store
            .get_node(id)?
            .get_property("tier")?
            .as_integer()
            .map(|t| t as usize)
    }

    fn random_tier(&mut self) -> usize {
        use rand::Rng;
        self.rng.gen_range(0..self.cfg.n_tiers)
    }
}

#[derive(Clone, Copy)]
enum MachineClass {
    Paw,
    Server,
    Workstation,
}
