//! Bulk principal population: users, machines and domain controllers
//!
//! Every per-account flag is an independent weighted Bernoulli draw governed
//! by its configured percentage. Output lists are handed to later stages,
//! which subdivide them further; nothing here decides tier placement.

use super::{ids, props, sampling, skeleton::Skeleton, Synthesizer};
use crate::graph::{EdgeKind, NodeId, NodeKind, PropertyValue};

const SECONDS_PER_DAY: i64 = 86_400;

/// Users produced by one generation pass, in creation order.
#[derive(Debug)]
pub struct UserPopulation {
    pub enabled: Vec<NodeId>,
    pub disabled: Vec<NodeId>,
}

/// Machines produced by one generation pass, split by role.
#[derive(Debug)]
pub struct ComputerPopulation {
    pub all: Vec<NodeId>,
    pub paw: Vec<NodeId>,
    pub servers: Vec<NodeId>,
    pub workstations: Vec<NodeId>,
}

impl Synthesizer {
    pub(crate) fn generate_users(&mut self, count: u32) -> UserPopulation {
        let mut enabled = Vec::new();
        let mut disabled = Vec::new();

        for _ in 0..count {
            let (name, display) = self.names.user_name(&mut self.rng, &self.domain);
            let rid = self.ids.next_rid();
            let object_id = ids::sid(&self.base_sid, rid);

            let is_enabled = sampling::chance(&mut self.rng, self.cfg.user.enabled);
            let dont_req_preauth = sampling::chance(&mut self.rng, self.cfg.user.dont_req_preauth);
            let has_spn = sampling::chance(&mut self.rng, self.cfg.user.has_spn);
            let password_not_reqd =
                sampling::chance(&mut self.rng, self.cfg.user.password_not_reqd);
            let pwd_never_expires =
                sampling::chance(&mut self.rng, self.cfg.user.pwd_never_expires);
            let sid_history = sampling::chance(&mut self.rng, self.cfg.user.sid_history);
            let unconstrained =
                sampling::chance(&mut self.rng, self.cfg.user.unconstrained_delegation);
            let saved_credentials =
                sampling::chance(&mut self.rng, self.cfg.user.saved_credentials);

            let pwd_age_days = self.rng_range_days(365);
            let logon_age_days = self.rng_range_days(30);

            let mut properties = props([
                ("domain", PropertyValue::from(self.domain.as_str())),
                ("displayname", PropertyValue::from(display)),
                ("enabled", PropertyValue::from(is_enabled)),
                (
                    "pwdlastset",
                    PropertyValue::from(self.cfg.reference_time - pwd_age_days * SECONDS_PER_DAY),
                ),
                (
                    "lastlogon",
                    PropertyValue::from(self.cfg.reference_time - logon_age_days * SECONDS_PER_DAY),
                ),
                ("dontreqpreauth", PropertyValue::from(dont_req_preauth)),
                ("hasspn", PropertyValue::from(has_spn)),
                ("passwordnotreqd", PropertyValue::from(password_not_reqd)),
                ("pwdneverexpires", PropertyValue::from(pwd_never_expires)),
                ("sidhistory", PropertyValue::from(sid_history)),
                ("unconstraineddelegation", PropertyValue::from(unconstrained)),
                ("savedcredentials", PropertyValue::from(saved_credentials)),
            ]);
            if has_spn {
                let host = format!("HOST{:05}", self.rng_range_days(99_999));
                properties.insert(
                    "serviceprincipalnames".to_string(),
                    PropertyValue::Array(vec![PropertyValue::from(format!("HTTP/{}", host))]),
                );
            }

            let id = self.store.add_node(NodeKind::User, name, object_id, properties);
            if is_enabled {
                enabled.push(id);
            } else {
                disabled.push(id);
            }
        }

        UserPopulation { enabled, disabled }
    }

    pub(crate) fn generate_computers(&mut self, count: u32) -> ComputerPopulation {
        let mut all = Vec::new();
        let mut paw = Vec::new();
        let mut servers = Vec::new();
        let mut workstations = Vec::new();

        for _ in 0..count {
            let role = sampling::weighted_choice(&mut self.rng, &self.cfg.computer.role_probability)
                .unwrap_or("Workstation")
                .to_string();
            let prefix = match role.as_str() {
                "PAW" => "PAW",
                "Server" => "SRV",
                _ => "WS",
            };
            let name = self.names.computer_name(&self.domain, prefix);
            let rid = self.ids.next_rid();
            let object_id = ids::sid(&self.base_sid, rid);

            let os = sampling::weighted_choice(&mut self.rng, &self.cfg.computer.os_probability)
                .unwrap_or("Windows 10 Pro")
                .to_string();
            let enabled = sampling::chance(&mut self.rng, self.cfg.computer.enabled);
            let unconstrained =
                sampling::chance(&mut self.rng, self.cfg.computer.unconstrained_delegation);
            let has_laps = sampling::chance(&mut self.rng, self.cfg.computer.has_laps);

            let id = self.store.add_node(
                NodeKind::Computer,
                name,
                object_id,
                props([
                    ("domain", PropertyValue::from(self.domain.as_str())),
                    ("operatingsystem", PropertyValue::from(os)),
                    ("enabled", PropertyValue::from(enabled)),
                    ("unconstraineddelegation", PropertyValue::from(unconstrained)),
                    ("haslaps", PropertyValue::from(has_laps)),
                    ("role", PropertyValue::from(role.as_str())),
                ]),
            );

            if let Some(dcg) = self.default_group("DOMAIN COMPUTERS") {
                self.store.add_edge(id, dcg, EdgeKind::MemberOf);
            }

            all.push(id);
            match role.as_str() {
                "PAW" => paw.push(id),
                "Server" => servers.push(id),
                _ => workstations.push(id),
            }
        }

        ComputerPopulation {
            all,
            paw,
            servers,
            workstations,
        }
    }

    /// Domain controllers live in the DC OU, join the Domain Controllers
    /// group and run an operating system no older than the domain functional
    /// level.
    pub(crate) fn generate_dcs(&mut self, skeleton: &Skeleton) -> Vec<NodeId> {
        let os_table = consistent_os_table(
            &self.cfg.dc.os_probability,
            &skeleton.functional_level,
        );

        let mut dcs = Vec::new();
        for i in 0..self.cfg.dc.n_dcs {
            let name = format!("DC{:02}.{}", i + 1, self.domain);
            let rid = self.ids.next_rid();
            let object_id = ids::sid(&self.base_sid, rid);

            let os = sampling::weighted_choice(&mut self.rng, &os_table)
                .unwrap_or("Windows Server 2016 Datacenter")
                .to_string();
            let enabled = sampling::chance(&mut self.rng, self.cfg.dc.enabled);

            let id = self.store.add_node(
                NodeKind::Computer,
                name,
                object_id,
                props([
                    ("domain", PropertyValue::from(self.domain.as_str())),
                    ("operatingsystem", PropertyValue::from(os)),
                    ("enabled", PropertyValue::from(enabled)),
                    ("unconstraineddelegation", PropertyValue::from(true)),
                    ("haslaps", PropertyValue::from(false)),
                    ("role", PropertyValue::from("DomainController")),
                    ("tier", PropertyValue::from(0i64)),
                    ("highvalue", PropertyValue::from(true)),
                ]),
            );

            self.store.add_edge(skeleton.dc_ou, id, EdgeKind::Contains);
            if let Some(group) = self.default_group("DOMAIN CONTROLLERS") {
                self.store.add_edge(id, group, EdgeKind::MemberOf);
            }
            dcs.push(id);
        }
        dcs
    }

    /// Finishing pass: a bounded number of SPN-bearing enabled users get
    /// crackable service credentials.
    pub(crate) fn mark_kerberoastable(&mut self) {
        let candidates: Vec<NodeId> = self
            .store
            .nodes_of_kind(NodeKind::User)
            .iter()
            .copied()
            .filter(|id| {
                self.store
                    .get_node(*id)
                    .map(|n| {
                        n.get_property("hasspn").and_then(|p| p.as_boolean()) == Some(true)
                            && n.get_property("enabled").and_then(|p| p.as_boolean())
                                == Some(true)
                    })
                    .unwrap_or(false)
            })
            .collect();

        let wanted = sampling::in_range(&mut self.rng, self.cfg.user.kerberoastable) as usize;
        let chosen = sampling::sample_indices(&mut self.rng, candidates.len(), wanted);
        for idx in chosen {
            if let Some(node) = self.store.get_node_mut(candidates[idx]) {
                node.set_property("kerberoastable", true);
            }
        }
    }

    fn rng_range_days(&mut self, max: i64) -> i64 {
        use rand::Rng;
        self.rng.gen_range(0..=max)
    }
}

fn os_year(value: &str) -> Option<u32> {
    value
        .split_whitespace()
        .find_map(|tok| tok.parse::<u32>().ok().filter(|y| *y >= 2000))
}

/// Restrict an OS table to releases no older than the functional level.
/// Falls back to the full table when the filter would empty it.
fn consistent_os_table(
    table: &crate::config::WeightTable,
    functional_level: &str,
) -> crate::config::WeightTable {
    let Some(fl_year) = os_year(functional_level) else {
        return table.clone();
    };
    let filtered: crate::config::WeightTable = table
        .iter()
        .filter(|(os, _)| os_year(os).map(|y| y >= fl_year).unwrap_or(false))
        .map(|(os, w)| (os.clone(), *w))
        .collect();
    if filtered.is_empty() {
        table.clone()
    } else {
        filtered
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

    #[test]
    fn test_generate_users_counts_and_rids() {
        let mut s = synth(r#"{"seed": 7, "User": {"nUsers": 100}}"#);
        s.build_skeleton();
        let issued_before = s.ids.issued();

        let users = s.generate_users(100);
        assert_eq!(users.enabled.len() + users.disabled.len(), 100);
        assert_eq!(s.ids.issued() - issued_before, 100);
        assert_eq!(s.store.nodes_of_kind(NodeKind::User).len(), 100 + 4);
    }

    #[test]
    fn test_user_enabled_split_is_percentage_driven() {
        let mut s = synth(r#"{"seed": 7, "User": {"enabled": 100}}"#);
        let users = s.generate_users(50);
        assert_eq!(users.enabled.len(), 50);
        assert!(users.disabled.is_empty());

        let mut s = synth(r#"{"seed": 7, "User": {"enabled": 0}}"#);
        let users = s.generate_users(50);
        assert!(users.enabled.is_empty());
        assert_eq!(users.disabled.len(), 50);
    }

    #[test]
    fn test_spn_users_carry_service_principal_names() {
        let mut s = synth(r#"{"seed": 3, "User": {"has_spn": 100}}"#);
        let users = s.generate_users(10);
        for id in users.enabled.iter().chain(users.disabled.iter()) {
            let node = s.store.get_node(*id).unwrap();
            assert_eq!(node.get_property("hasspn").unwrap().as_boolean(), Some(true));
            assert!(!node
                .get_property("serviceprincipalnames")
                .unwrap()
                .as_array()
                .unwrap()
                .is_empty());
        }
    }

    #[test]
    fn test_generate_computers_role_split() {
        let mut s = synth(r#"{"seed": 11, "Computer": {"nComputers": 120}}"#);
        s.build_skeleton();
        let computers = s.generate_computers(120);

        assert_eq!(computers.all.len(), 120);
        assert_eq!(
            computers.paw.len() + computers.servers.len() + computers.workstations.len(),
            120
        );
        assert!(!computers.workstations.is_empty());
    }

    #[test]
    fn test_dcs_are_tier0_members_of_dc_group() {
        let mut s = synth(r#"{"seed": 5, "DC": {"nDCs": 3}}"#);
        let skeleton = s.build_skeleton();
        let dcs = s.generate_dcs(&skeleton);

        assert_eq!(dcs.len(), 3);
        for dc in &dcs {
            let node = s.store.get_node(*dc).unwrap();
            assert_eq!(node.get_property("tier").unwrap().as_integer(), Some(0));
        }
        let group = s.default_group("DOMAIN CONTROLLERS").unwrap();
        let member_edges = s
            .store
            .all_edges()
            .iter()
            .filter(|e| e.kind == EdgeKind::MemberOf && e.target == group)
            .count();
        assert_eq!(member_edges, 3);
    }

    #[test]
    fn test_os_table_respects_functional_level() {
        let table: crate::config::WeightTable = [
            ("Windows Server 2016 Datacenter".to_string(), 60u32),
            ("Windows Server 2012 R2 Datacenter".to_string(), 30),
            ("Windows Server 2008 R2 Datacenter".to_string(), 10),
        ]
        .into_iter()
        .collect();

        let filtered = consistent_os_table(&table, "2012 R2");
        assert!(filtered.contains_key("Windows Server 2016 Datacenter"));
        assert!(filtered.contains_key("Windows Server 2012 R2 Datacenter"));
        assert!(!filtered.contains_key("Windows Server 2008 R2 Datacenter"));

        // Unparsable level keeps the full table
        let full = consistent_os_table(&table, "unknown");
        assert_eq!(full.len(), 3);
    }

    #[test]
    fn test_mark_kerberoastable_is_bounded() {
        let mut s = synth(
            r#"{"seed": 9, "User": {"nUsers": 40, "has_spn": 100, "enabled": 100, "kerberoastable": [5, 5]}}"#,
        );
        s.generate_users(40);
        s.mark_kerberoastable();

        let marked = s
            .store
            .nodes_of_kind(NodeKind::User)
            .iter()
            .filter(|id| {
                s.store
                    .get_node(**id)
                    .and_then(|n| n.get_property("kerberoastable"))
                    .and_then(|p| p.as_boolean())
                    == Some(true)
            })
            .count();
        assert_eq!(marked, 5);
    }
}
