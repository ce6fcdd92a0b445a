//! Deliberate misconfiguration injection
//!
//! Every edge created here crosses a tier boundary in the wrong direction
//! and carries a `misconfigured` marker. Volumes scale with the security
//! level's percentage tables; edges that would terminate at tier 0 must also
//! fit the tier-0 allow/limit budget.

use super::{permissions::right_for, props, sampling, tiers::TierLayout, Synthesizer};
use crate::graph::{EdgeKind, NodeId, PropertyValue};
use rand::Rng;

/// Attempts per wanted edge before the draw is abandoned. Sparse tiers can
/// make a cross-tier pair impossible; this keeps the loop bounded.
const DRAW_ATTEMPTS: u32 = 16;

impl Synthesizer {
    /// A lower-tier machine hosts a higher-tier principal's session: the
    /// classic credential-theft opportunity.
    pub(crate) fn create_misconfig_sessions(&mut self, layout: &TierLayout, n_regular: usize) {
        if layout.n_tiers < 2 {
            return;
        }
        let percentage = self
            .cfg
            .perc_misconfig_sessions
            .value_for(self.cfg.security_level);
        let wanted = n_regular * percentage as usize / 100;

        for _ in 0..wanted {
            for _ in 0..DRAW_ATTEMPTS {
                let principal_tier = self.rng.gen_range(0..layout.n_tiers - 1);
                let machine_tier = self.rng.gen_range(principal_tier + 1..layout.n_tiers);

                let principals = layout.principals(principal_tier);
                let machines = layout.machines(machine_tier);
                let (Some(principal), Some(machine)) = (
                    sampling::pick(&mut self.rng, &principals).copied(),
                    sampling::pick(&mut self.rng, &machines).copied(),
                ) else {
                    continue;
                };

                self.store.add_edge_with_properties(
                    machine,
                    principal,
                    EdgeKind::HasSession,
                    props([("misconfigured", PropertyValue::from(true))]),
                );
                break;
            }
        }
    }

    /// Individual principals in lower tiers gain rights over higher-tier
    /// principals and machines.
    pub(crate) fn create_misconfig_permissions_on_individuals(
        &mut self,
        layout: &TierLayout,
        n_regular: usize,
    ) {
        if layout.n_tiers < 2 {
            return;
        }
        let percentage = self
            .cfg
            .perc_misconfig_permissions
            .value_for(self.cfg.security_level);
        let wanted = n_regular * percentage as usize / 100;
        let table = self.cfg.acls.probability.clone();

        for _ in 0..wanted {
            for _ in 0..DRAW_ATTEMPTS {
                let target_tier = self.rng.gen_range(0..layout.n_tiers - 1);
                let source_tier = self.rng.gen_range(target_tier + 1..layout.n_tiers);

                if target_tier == 0 && !self.tier0_budget_ok() {
                    continue;
                }

                let sources = layout.principals(source_tier);
                let mut targets = layout.principals(target_tier);
                targets.extend_from_slice(&layout.machines(target_tier));
                let (Some(source), Some(target)) = (
                    sampling::pick(&mut self.rng, &sources).copied(),
                    sampling::pick(&mut self.rng, &targets).copied(),
                ) else {
                    continue;
                };

                let Some(kind) = sampling::weighted_choice(&mut self.rng, &table)
                    .and_then(right_for)
                else {
                    continue;
                };

                self.add_misconfig_permission(source, target, target_tier, kind);
                break;
            }
        }
    }

    /// Lower-tier groups gain write rights over higher-tier OUs.
    pub(crate) fn create_misconfig_permissions_on_groups(
        &mut self,
        layout: &TierLayout,
        skeleton: &super::skeleton::Skeleton,
    ) {
        if layout.n_tiers < 2 {
            return;
        }
        let percentage = self
            .cfg
            .perc_misconfig_permissions
            .value_for(self.cfg.security_level);
        let num_local_admin_groups: usize =
            layout.local_admin_groups.iter().map(Vec::len).sum();
        let wanted = num_local_admin_groups * percentage as usize / 100;

        for _ in 0..wanted {
            for _ in 0..DRAW_ATTEMPTS {
                let target_tier = self.rng.gen_range(0..layout.n_tiers - 1);
                let source_tier = self.rng.gen_range(target_tier + 1..layout.n_tiers);

                if target_tier == 0 && !self.tier0_budget_ok() {
                    continue;
                }

                let Some(source) =
                    sampling::pick(&mut self.rng, &layout.groups[source_tier]).copied()
                else {
                    continue;
                };
                let target = skeleton.tier_ous[target_tier];
                let kind = if self.rng.gen_range(0..2) == 0 {
                    EdgeKind::GenericAll
                } else {
                    EdgeKind::GenericWrite
                };

                self.add_misconfig_permission(source, target, target_tier, kind);
                break;
            }
        }
    }

    /// Privilege-inverting group nesting: a lower-privilege container holds
    /// a higher-privilege group, within the configured budget.
    pub(crate) fn create_misconfig_group_nesting(
        &mut self,
        layout: &TierLayout,
        num_regular_groups: usize,
    ) {
        if layout.n_tiers < 2 {
            return;
        }
        let percentage = self
            .cfg
            .perc_misconfig_group_nesting
            .value_for(self.cfg.security_level);
        let budget = self.cfg.misconfig_group_nesting.clone();
        let wanted = (num_regular_groups * percentage as usize / 100) as u32;
        let mut used = 0u32;

        for _ in 0..wanted {
            if !budget.permits(used) {
                break;
            }
            for _ in 0..DRAW_ATTEMPTS {
                let contained_tier = self.rng.gen_range(0..layout.n_tiers - 1);
                let container_tier = self.rng.gen_range(contained_tier + 1..layout.n_tiers);

                let (Some(contained), Some(container)) = (
                    sampling::pick(&mut self.rng, &layout.groups[contained_tier]).copied(),
                    sampling::pick(&mut self.rng, &layout.groups[container_tier]).copied(),
                ) else {
                    continue;
                };

                self.store.add_edge_with_properties(
                    contained,
                    container,
                    EdgeKind::MemberOf,
                    props([("misconfigured", PropertyValue::from(true))]),
                );
                used += 1;
                break;
            }
        }
    }

    fn tier0_budget_ok(&self) -> bool {
        self.cfg
            .misconfig_permissions_to_tier_0
            .permits(self.tier0_budget_used)
    }

    fn add_misconfig_permission(
        &mut self,
        source: NodeId,
        target: NodeId,
        target_tier: usize,
        kind: EdgeKind,
    ) {
        self.grant(
            source,
            target,
            kind,
            props([("misconfigured", PropertyValue::from(true))]),
        );
        if target_tier == 0 {
            self.tier0_budget_used += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::synth::OnPremGraph;

    fn run(json: &str) -> (Synthesizer, OnPremGraph) {
        let cfg = Config::from_json_str(json).unwrap();
        let mut s = Synthesizer::new(cfg, "TESTLAB.LOCALE", None);
        let graph = s.build_on_prem_structure();
        (s, graph)
    }

    fn misconfig_edges(s: &Synthesizer, kind: EdgeKind) -> Vec<(NodeId, NodeId)> {
        s.store
            .all_edges()
            .iter()
            .filter(|e| {
                e.kind == kind
                    && e.get_property("misconfigured").and_then(|p| p.as_boolean()) == Some(true)
            })
            .map(|e| (e.source, e.target))
            .collect()
    }

    #[test]
    fn test_misconfig_sessions_cross_tiers_downward() {
        let (mut s, graph) = run(
            r#"{"seed": 7, "perc_misconfig_sessions": {"Customized": 20, "Low": 10, "High": 2}}"#,
        );
        // The structural pipeline already injected one round; add another and
        // check every tagged session still crosses tiers downward.
        s.create_misconfig_sessions(&graph.layout, graph.n_regular);

        let edges = misconfig_edges(&s, EdgeKind::HasSession);
        assert!(!edges.is_empty());
        for (machine, principal) in edges {
            let machine_tier = s.tier_of(machine).unwrap();
            let principal_tier = s.tier_of(principal).unwrap();
            assert!(machine_tier > principal_tier);
        }
    }

    #[test]
    fn test_tier0_budget_is_enforced() {
        let (mut s, graph) = run(
            r#"{
                "seed": 11,
                "perc_misconfig_permissions": {"Customized": 50, "Low": 10, "High": 2},
                "misconfig_permissions_to_tier_0": {"allow": 1, "limit": 1}
            }"#,
        );
        s.create_misconfig_permissions_on_individuals(&graph.layout, graph.n_regular);
        s.create_misconfig_permissions_on_groups(&graph.layout, &graph.skeleton);

        let tier0_hits = s
            .store
            .all_edges()
            .iter()
            .filter(|e| {
                e.get_property("misconfigured").and_then(|p| p.as_boolean()) == Some(true)
                    && e.kind != EdgeKind::HasSession
                    && e.kind != EdgeKind::MemberOf
                    && s.tier_of(e.target) == Some(0)
            })
            .count();
        assert!(tier0_hits <= 1);
    }

    #[test]
    fn test_tier0_budget_disabled_blocks_all() {
        let (mut s, graph) = run(
            r#"{
                "seed": 11,
                "nTiers": 2,
                "perc_misconfig_permissions": {"Customized": 80, "Low": 10, "High": 2},
                "misconfig_permissions_to_tier_0": {"allow": 0, "limit": 5}
            }"#,
        );
        s.create_misconfig_permissions_on_individuals(&graph.layout, graph.n_regular);

        // With two tiers every cross-tier permission targets tier 0, so the
        // disabled budget suppresses the entire pass.
        let hits = s
            .store
            .all_edges()
            .iter()
            .filter(|e| {
                e.get_property("misconfigured").and_then(|p| p.as_boolean()) == Some(true)
                    && e.kind != EdgeKind::HasSession
                    && s.tier_of(e.target) == Some(0)
            })
            .count();
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_misconfig_nesting_respects_budget_and_direction() {
        let (mut s, graph) = run(
            r#"{
                "seed": 5,
                "perc_misconfig_group_nesting": {"Customized": 100, "Low": 10, "High": 2},
                "misconfig_group_nesting": {"allow": 1, "limit": 2}
            }"#,
        );
        s.create_misconfig_group_nesting(&graph.layout, graph.num_regular_groups);

        let edges = misconfig_edges(&s, EdgeKind::MemberOf);
        assert!(edges.len() <= 2);
        for (contained, container) in edges {
            let contained_tier = s.tier_of(contained).unwrap();
            let container_tier = s.tier_of(container).unwrap();
            assert!(container_tier > contained_tier);
        }
    }

    #[test]
    fn test_single_tier_run_injects_nothing() {
        let (mut s, graph) = run(r#"{"seed": 3, "nTiers": 1}"#);
        let before = s.store.edge_count();
        s.create_misconfig_sessions(&graph.layout, graph.n_regular);
        s.create_misconfig_permissions_on_individuals(&graph.layout, graph.n_regular);
        s.create_misconfig_group_nesting(&graph.layout, graph.num_regular_groups);
        assert_eq!(s.store.edge_count(), before);
    }
}
