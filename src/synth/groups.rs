//! Group creation, nesting and membership
//!
//! Department groups are created per tier and location. Nesting may only put
//! a group inside a container of equal or higher privilege; candidates that
//! would invert that are rejected and redrawn up to the configured retry
//! limit. Deliberate inversions are the misconfiguration engine's job, not
//! this one's.

use super::{ids, props, sampling, skeleton::Skeleton, tiers::TierLayout, Synthesizer};
use crate::graph::{EdgeKind, NodeId, NodeKind, PropertyValue};

impl Synthesizer {
    /// Create the department/tier group taxonomy plus the per-department
    /// local-admin sets. Returns how many regular (non-local-admin) groups
    /// were created.
    pub(crate) fn create_groups(
        &mut self,
        layout: &mut TierLayout,
        skeleton: &Skeleton,
    ) -> usize {
        let departments: Vec<String> = self.cfg.group.departments.keys().cloned().collect();
        let mut regular = 0usize;

        for tier in 0..self.cfg.n_tiers {
            for location in 0..self.cfg.n_locations {
                for dept in &departments {
                    let count = sampling::in_range(&mut self.rng, self.cfg.group.groups_per_department);
                    for _ in 0..count {
                        let distribution =
                            sampling::chance(&mut self.rng, self.cfg.group.distribution_percentage);
                        let name = self.names.group_name(&self.domain, dept, tier, location);
                        let rid = self.ids.next_rid();
                        let group = self.store.add_node(
                            NodeKind::Group,
                            name,
                            ids::sid(&self.base_sid, rid),
                            props([
                                ("domain", PropertyValue::from(self.domain.as_str())),
                                ("department", PropertyValue::from(dept.as_str())),
                                ("tier", PropertyValue::from(tier as i64)),
                                ("securitygroup", PropertyValue::from(!distribution)),
                                ("highvalue", PropertyValue::from(false)),
                            ]),
                        );
                        self.store
                            .add_edge(skeleton.tier_ous[tier], group, EdgeKind::Contains);
                        if distribution {
                            layout.distribution_groups[tier].push(group);
                        } else {
                            layout.groups[tier].push(group);
                        }
                        regular += 1;
                    }
                }
            }
        }

        self.create_local_admin_groups(layout, skeleton, &departments);
        regular
    }

    /// One local-admin group per department per tier, staffed from that
    /// tier's admins. The AdminTo rights over machines come later in the
    /// permission pass.
    fn create_local_admin_groups(
        &mut self,
        layout: &mut TierLayout,
        skeleton: &Skeleton,
        departments: &[String],
    ) {
        for tier in 0..self.cfg.n_tiers {
            for dept in departments {
                let rid = self.ids.next_rid();
                let group = self.store.add_node(
                    NodeKind::Group,
                    self.qualified(&format!("{} LOCAL ADMINS T{}", dept, tier)),
                    ids::sid(&self.base_sid, rid),
                    props([
                        ("domain", PropertyValue::from(self.domain.as_str())),
                        ("department", PropertyValue::from(dept.as_str())),
                        ("tier", PropertyValue::from(tier as i64)),
                        ("securitygroup", PropertyValue::from(true)),
                        ("highvalue", PropertyValue::from(false)),
                    ]),
                );
                self.store
                    .add_edge(skeleton.tier_ous[tier], group, EdgeKind::Contains);

                let size =
                    sampling::in_range(&mut self.rng, self.cfg.group.local_admin_group_size)
                        as usize;
                let admins = layout.admin_users[tier].clone();
                for member in sampling::sample(&mut self.rng, &admins, size) {
                    self.store.add_edge(*member, group, EdgeKind::MemberOf);
                }

                layout.local_admin_groups[tier].push(group);
            }
        }
    }

    /// Nest security groups per the configured probability, redrawing any
    /// candidate whose tier is more privileged than its container's.
    pub(crate) fn nest_groups(&mut self, layout: &TierLayout) {
        let all_groups: Vec<(NodeId, usize)> = (0..layout.n_tiers)
            .flat_map(|tier| layout.groups[tier].iter().map(move |g| (*g, tier)))
            .collect();
        if all_groups.len() < 2 {
            return;
        }

        for tier in 0..layout.n_tiers {
            for container in layout.groups[tier].clone() {
                if !sampling::chance(&mut self.rng, self.cfg.group.nesting_probability) {
                    continue;
                }
                for _attempt in 0..self.cfg.group.nesting_retry_limit {
                    let (candidate, candidate_tier) =
                        *sampling::pick(&mut self.rng, &all_groups).unwrap();
                    if candidate == container || candidate_tier < tier {
                        continue;
                    }
                    self.store.add_edge(candidate, container, EdgeKind::MemberOf);
                    break;
                }
            }
        }
    }

    /// Put each tier's regular users into that tier's groups.
    pub(crate) fn place_users_in_groups(&mut self, layout: &TierLayout) {
        for tier in 0..layout.n_tiers {
            let mut tier_groups = layout.groups[tier].clone();
            tier_groups.extend_from_slice(&layout.distribution_groups[tier]);
            if tier_groups.is_empty() {
                continue;
            }

            for user in layout.enabled_users[tier].clone() {
                let count = sampling::in_range(&mut self.rng, self.cfg.group.groups_per_user) as usize;
                for group in sampling::sample(&mut self.rng, &tier_groups, count) {
                    self.store.add_edge(user, *group, EdgeKind::MemberOf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn synth(json: &str) -> Synthesizer {
        let cfg = Config::from_json_str(json).unwrap();
        Synthesizer::new(cfg, "TESTLAB.LOCALE", None)
    }

    fn build(s: &mut Synthesizer) -> (Skeleton, TierLayout, usize) {
        let mut skeleton = s.build_skeleton();
        s.create_tier_admin_groups(&mut skeleton);
        let users = s.generate_users(60);
        let mut layout = TierLayout::new(s.cfg.n_tiers);
        let admins: Vec<NodeId> = users.enabled.iter().copied().take(9).collect();
        let rest: Vec<NodeId> = users.enabled.iter().copied().skip(9).collect();
        s.place_admin_users_in_tiers(&mut layout, &skeleton, &admins, &[]);
        s.place_normal_users_in_tiers(&mut layout, &skeleton, &rest, &[], &[], &[]);
        let regular = s.create_groups(&mut layout, &skeleton);
        (skeleton, layout, regular)
    }

    #[test]
    fn test_create_groups_counts_and_tier_tags() {
        let mut s = synth(r#"{"seed": 7}"#);
        let (_, layout, regular) = build(&mut s);

        let recorded: usize = (0..3)
            .map(|t| layout.groups[t].len() + layout.distribution_groups[t].len())
            .sum();
        assert_eq!(recorded, regular);
        assert!(regular > 0);

        for tier in 0..3 {
            for group in &layout.groups[tier] {
                assert_eq!(s.tier_of(*group), Some(tier));
                let node = s.store.get_node(*group).unwrap();
                assert_eq!(
                    node.get_property("securitygroup").unwrap().as_boolean(),
                    Some(true)
                );
            }
        }
    }

    #[test]
    fn test_local_admin_groups_exist_per_department_per_tier() {
        let mut s = synth(r#"{"seed": 7}"#);
        let (_, layout, _) = build(&mut s);

        let departments = s.cfg.group.departments.len();
        for tier in 0..3 {
            assert_eq!(layout.local_admin_groups[tier].len(), departments);
        }
    }

    #[test]
    fn test_nesting_never_inverts_tiers() {
        let mut s = synth(r#"{"seed": 21, "Group": {"nesting_probability": 100}}"#);
        let (_, layout, _) = build(&mut s);
        s.nest_groups(&layout);

        for edge in s.store.all_edges() {
            if edge.kind != EdgeKind::MemberOf {
                continue;
            }
            let (Some(member_tier), Some(container_tier)) =
                (s.tier_of(edge.source), s.tier_of(edge.target))
            else {
                continue;
            };
            let source = s.store.get_node(edge.source).unwrap();
            if source.kind != NodeKind::Group {
                continue;
            }
            // container tier <= contained tier for every nesting edge
            assert!(
                container_tier <= member_tier,
                "group nesting inverted: container tier {} > member tier {}",
                container_tier,
                member_tier
            );
        }
    }

    #[test]
    fn test_users_join_groups_in_their_tier() {
        let mut s = synth(r#"{"seed": 5}"#);
        let (_, layout, _) = build(&mut s);
        let before = s.store.edge_count();
        s.place_users_in_groups(&layout);
        assert!(s.store.edge_count() > before);
    }
}
