//! Logged-on-session edges
//!
//! A session edge goes from the machine to the principal whose credentials
//! are present on it. Within a tier, the configured percentage of machines
//! host a session for a principal of the same tier. Cross-tier sessions are
//! injected separately by the misconfiguration engine. Server and Print
//! Operators always hold sessions on the domain controllers.

use super::{props, sampling, tiers::TierLayout, Synthesizer};
use crate::graph::{EdgeKind, NodeId, PropertyValue};

impl Synthesizer {
    pub(crate) fn create_sessions(&mut self, layout: &TierLayout) {
        for tier in 0..layout.n_tiers {
            let principals = layout.principals(tier);
            if principals.is_empty() {
                continue;
            }
            let machines = layout.machines(tier);
            let percentage = self.cfg.session_percentage(tier);
            let hosting = machines.len() * percentage as usize / 100;

            let chosen = sampling::sample_indices(&mut self.rng, machines.len(), hosting);
            for idx in chosen {
                let principal = *sampling::pick(&mut self.rng, &principals).unwrap();
                self.store
                    .add_edge(machines[idx], principal, EdgeKind::HasSession);
            }
        }
    }

    /// Operator group members keep sessions on every domain controller.
    pub(crate) fn create_dc_sessions(
        &mut self,
        domain_controllers: &[NodeId],
        layout: &TierLayout,
    ) {
        for dc in domain_controllers {
            for operator in layout
                .server_operators
                .iter()
                .chain(layout.print_operators.iter())
            {
                self.store.add_edge_with_properties(
                    *dc,
                    *operator,
                    EdgeKind::HasSession,
                    props([("operator", PropertyValue::from(true))]),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::graph::NodeKind;
    use crate::synth::props as mkprops;

    fn synth(json: &str) -> Synthesizer {
        let cfg = Config::from_json_str(json).unwrap();
        Synthesizer::new(cfg, "TESTLAB.LOCALE", None)
    }

    fn add_nodes(s: &mut Synthesizer, kind: NodeKind, count: usize, offset: usize) -> Vec<NodeId> {
        (0..count)
            .map(|i| {
                s.store.add_node(
                    kind,
                    format!("{:?}{:05}@TESTLAB.LOCALE", kind, offset + i),
                    format!("S-1-5-21-0-0-0-{}", 9000 + offset + i),
                    mkprops([]),
                )
            })
            .collect()
    }

    #[test]
    fn test_session_count_follows_percentage() {
        let mut s = synth(r#"{"seed": 7, "nTiers": 1, "User": {"sessions_per_tier": [50]}}"#);
        let mut layout = TierLayout::new(1);
        layout.workstations[0] = add_nodes(&mut s, NodeKind::Computer, 40, 0);
        layout.enabled_users[0] = add_nodes(&mut s, NodeKind::User, 10, 100);

        s.create_sessions(&layout);

        let sessions = s
            .store
            .all_edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::HasSession)
            .count();
        assert_eq!(sessions, 20);
    }

    #[test]
    fn test_no_sessions_without_principals() {
        let mut s = synth(r#"{"seed": 7, "nTiers": 1}"#);
        let mut layout = TierLayout::new(1);
        layout.workstations[0] = add_nodes(&mut s, NodeKind::Computer, 10, 0);

        s.create_sessions(&layout);
        assert_eq!(s.store.edge_count(), 0);
    }

    #[test]
    fn test_operators_get_sessions_on_every_dc() {
        let mut s = synth(r#"{"seed": 7, "nTiers": 1}"#);
        let mut layout = TierLayout::new(1);
        let dcs = add_nodes(&mut s, NodeKind::Computer, 2, 0);
        let ops = add_nodes(&mut s, NodeKind::User, 3, 50);
        layout.server_operators = vec![ops[0], ops[1]];
        layout.print_operators = vec![ops[2]];

        s.create_dc_sessions(&dcs, &layout);

        let sessions = s
            .store
            .all_edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::HasSession)
            .count();
        assert_eq!(sessions, 6);
    }
}
