//! Domain skeleton: root domain object, OU structure, default groups,
//! default accounts and default group policy objects
//!
//! Well-known principals take their fixed RIDs below 1000; everything else
//! draws from the run allocator. Forest-scoped groups are filed under the
//! previous run's domain name when one is supplied, so references stay valid
//! across a teardown and re-creation.

use super::{ids, props, sampling, Synthesizer};
use crate::graph::{EdgeKind, NodeId, NodeKind, PropertyValue};

/// Well-known domain groups and their RIDs.
const DEFAULT_GROUPS: &[(&str, u64)] = &[
    ("DOMAIN ADMINS", 512),
    ("DOMAIN USERS", 513),
    ("DOMAIN GUESTS", 514),
    ("DOMAIN COMPUTERS", 515),
    ("DOMAIN CONTROLLERS", 516),
    ("GROUP POLICY CREATOR OWNERS", 520),
    ("READ-ONLY DOMAIN CONTROLLERS", 521),
    ("CLONEABLE DOMAIN CONTROLLERS", 522),
    ("PROTECTED USERS", 525),
    ("KEY ADMINS", 526),
];

/// Forest-scoped groups, filed under the forest root domain.
const FOREST_GROUPS: &[(&str, u64)] = &[
    ("ENTERPRISE ADMINS", 519),
    ("SCHEMA ADMINS", 518),
    ("ENTERPRISE KEY ADMINS", 527),
    ("ENTERPRISE READ-ONLY DOMAIN CONTROLLERS", 498),
];

/// Builtin groups, qualified by domain name rather than domain SID.
const BUILTIN_GROUPS: &[(&str, u64)] = &[
    ("ADMINISTRATORS", 544),
    ("USERS", 545),
    ("GUESTS", 546),
    ("ACCOUNT OPERATORS", 548),
    ("SERVER OPERATORS", 549),
    ("PRINT OPERATORS", 550),
    ("BACKUP OPERATORS", 551),
    ("REMOTE DESKTOP USERS", 555),
];

/// Default accounts and their RIDs; the bool is the enabled flag.
const DEFAULT_ACCOUNTS: &[(&str, u64, bool)] = &[
    ("ADMINISTRATOR", 500, true),
    ("GUEST", 501, false),
    ("KRBTGT", 502, false),
    ("DEFAULTACCOUNT", 503, false),
];

const HIGH_VALUE_GROUPS: &[&str] = &["DOMAIN ADMINS", "ENTERPRISE ADMINS", "ADMINISTRATORS"];

/// Handles produced by the skeleton stage and reused by every later stage.
#[derive(Debug)]
pub struct Skeleton {
    pub domain_node: NodeId,
    pub functional_level: String,
    /// Per-tier root OUs, indexed by tier
    pub tier_ous: Vec<NodeId>,
    /// Per-tier user OUs, indexed by tier
    pub tier_user_ous: Vec<NodeId>,
    /// Per-tier computer OUs, indexed by tier
    pub tier_computer_ous: Vec<NodeId>,
    pub dc_ou: NodeId,
    pub gpo_container: NodeId,
    /// Per-tier admin groups, indexed by tier
    pub tier_admin_groups: Vec<NodeId>,
    /// Generated GPOs flagged exploitable
    pub exploitable_gpos: Vec<NodeId>,
}

impl Synthesizer {
    /// Name of a well-known object under this run's domain.
    pub(crate) fn qualified(&self, short: &str) -> String {
        format!("{}@{}", short, self.domain)
    }

    /// Handle of a default group created by the skeleton stage.
    pub(crate) fn default_group(&self, short: &str) -> Option<NodeId> {
        let domain = if FOREST_GROUPS.iter().any(|(name, _)| *name == short) {
            self.forest_domain()
        } else {
            self.domain.clone()
        };
        self.store.find_by_name(&format!("{}@{}", short, domain))
    }

    pub(crate) fn build_skeleton(&mut self) -> Skeleton {
        let functional_level = self.draw_functional_level();

        let domain_node = self.store.add_node(
            NodeKind::Domain,
            self.domain.clone(),
            self.base_sid.clone(),
            props([
                ("domain", PropertyValue::from(self.domain.as_str())),
                ("highvalue", PropertyValue::from(true)),
                (
                    "functionallevel",
                    PropertyValue::from(functional_level.as_str()),
                ),
                (
                    "distinguishedname",
                    PropertyValue::from(domain_dn(&self.domain)),
                ),
            ]),
        );

        // Tier OU skeleton: one OU per tier with user and computer sub-OUs.
        let mut tier_ous = Vec::with_capacity(self.cfg.n_tiers);
        let mut tier_user_ous = Vec::with_capacity(self.cfg.n_tiers);
        let mut tier_computer_ous = Vec::with_capacity(self.cfg.n_tiers);
        for tier in 0..self.cfg.n_tiers {
            let tier_ou = self.add_ou(&format!("TIER{}", tier), tier);
            self.store.add_edge(domain_node, tier_ou, EdgeKind::Contains);
            tier_ous.push(tier_ou);

            let users_ou = self.add_ou(&format!("TIER{} USERS", tier), tier);
            self.store.add_edge(tier_ou, users_ou, EdgeKind::Contains);
            tier_user_ous.push(users_ou);

            let computers_ou = self.add_ou(&format!("TIER{} COMPUTERS", tier), tier);
            self.store.add_edge(tier_ou, computers_ou, EdgeKind::Contains);
            tier_computer_ous.push(computers_ou);
        }

        let dc_ou = self.add_ou("DOMAIN CONTROLLERS", 0);
        self.store.add_edge(domain_node, dc_ou, EdgeKind::Contains);

        let gpo_container = {
            let object_id = ids::new_object_id(&mut self.rng);
            self.store.add_node(
                NodeKind::Container,
                self.qualified("POLICIES"),
                object_id,
                props([("domain", PropertyValue::from(self.domain.as_str()))]),
            )
        };
        self.store
            .add_edge(domain_node, gpo_container, EdgeKind::Contains);

        // Default policies plus the tier baseline/restriction set.
        let mut all_gpos = Vec::new();
        let ddp = self.add_gpo("DEFAULT DOMAIN POLICY", false);
        self.store.add_edge(ddp, domain_node, EdgeKind::GpLink);
        all_gpos.push(ddp);

        let ddcp = self.add_gpo("DEFAULT DOMAIN CONTROLLERS POLICY", false);
        self.store.add_edge(ddcp, dc_ou, EdgeKind::GpLink);
        all_gpos.push(ddcp);

        for tier in 0..self.cfg.n_tiers {
            let baseline = self.add_gpo(&format!("TIER {} BASELINE POLICY", tier), false);
            self.store.add_edge(baseline, tier_ous[tier], EdgeKind::GpLink);
            all_gpos.push(baseline);

            // Logon restrictions keep lower-tier credentials off privileged hosts.
            if tier > 0 {
                let restriction = self.add_gpo(&format!("TIER {} LOGON RESTRICTION", tier), false);
                self.store
                    .add_edge(restriction, tier_user_ous[tier], EdgeKind::GpLink);
                all_gpos.push(restriction);
            }
        }

        let mut exploitable_gpos = Vec::new();
        for i in 0..self.cfg.gpo.n_gpos {
            let exploitable = sampling::chance(&mut self.rng, self.cfg.gpo.exploitable);
            let gpo = self.add_gpo(&format!("POLICY{:05}", i + 1), exploitable);
            if exploitable {
                exploitable_gpos.push(gpo);
            }
            all_gpos.push(gpo);
        }

        for gpo in &all_gpos {
            self.store.add_edge(gpo_container, *gpo, EdgeKind::Contains);
        }

        self.create_default_groups();
        self.create_default_accounts(domain_node);
        self.create_default_memberships();
        self.create_default_acls_for_defaults(domain_node);

        Skeleton {
            domain_node,
            functional_level,
            tier_ous,
            tier_user_ous,
            tier_computer_ous,
            dc_ou,
            gpo_container,
            tier_admin_groups: Vec::new(),
            exploitable_gpos,
        }
    }

    /// Per-tier admin groups. Runs after the population generators so that
    /// generated user accounts take the first RIDs.
    pub(crate) fn create_tier_admin_groups(&mut self, skeleton: &mut Skeleton) {
        for tier in 0..self.cfg.n_tiers {
            let rid = self.ids.next_rid();
            let group = self.store.add_node(
                NodeKind::Group,
                self.qualified(&format!("TIER {} ADMINS", tier)),
                ids::sid(&self.base_sid, rid),
                props([
                    ("domain", PropertyValue::from(self.domain.as_str())),
                    ("tier", PropertyValue::from(tier as i64)),
                    ("highvalue", PropertyValue::from(tier == 0)),
                    ("securitygroup", PropertyValue::from(true)),
                ]),
            );
            self.store
                .add_edge(skeleton.domain_node, group, EdgeKind::Contains);
            skeleton.tier_admin_groups.push(group);
        }
    }

    fn draw_functional_level(&mut self) -> String {
        sampling::weighted_choice(&mut self.rng, &self.cfg.domain.functional_level_probability)
            .unwrap_or("2016")
            .to_string()
    }

    fn add_ou(&mut self, short: &str, tier: usize) -> NodeId {
        let object_id = ids::new_object_id(&mut self.rng);
        self.store.add_node(
            NodeKind::Ou,
            self.qualified(short),
            object_id,
            props([
                ("domain", PropertyValue::from(self.domain.as_str())),
                ("tier", PropertyValue::from(tier as i64)),
                ("blocksinheritance", PropertyValue::from(false)),
            ]),
        )
    }

    fn add_gpo(&mut self, short: &str, exploitable: bool) -> NodeId {
        let object_id = ids::new_object_id(&mut self.rng);
        self.store.add_node(
            NodeKind::Gpo,
            self.qualified(short),
            object_id,
            props([
                ("domain", PropertyValue::from(self.domain.as_str())),
                ("exploitable", PropertyValue::from(exploitable)),
            ]),
        )
    }

    fn create_default_groups(&mut self) {
        let domain = self.domain.clone();
        let forest = self.forest_domain();

        for (short, rid) in DEFAULT_GROUPS {
            self.add_default_group(&domain, short, ids::sid(&self.base_sid, *rid));
        }
        for (short, rid) in FOREST_GROUPS {
            let object_id = ids::sid(&self.base_sid, *rid);
            self.add_default_group(&forest, short, object_id);
        }
        for (short, rid) in BUILTIN_GROUPS {
            let object_id = ids::builtin_sid(&domain, *rid);
            self.add_default_group(&domain, short, object_id);
        }
    }

    fn add_default_group(&mut self, domain: &str, short: &str, object_id: String) {
        let high_value = HIGH_VALUE_GROUPS.contains(&short);
        let group = self.store.add_node(
            NodeKind::Group,
            format!("{}@{}", short, domain),
            object_id,
            props([
                ("domain", PropertyValue::from(domain)),
                ("highvalue", PropertyValue::from(high_value)),
                ("securitygroup", PropertyValue::from(true)),
                ("tier", PropertyValue::from(0i64)),
            ]),
        );
        if let Some(domain_node) = self.store.find_by_name(&self.domain) {
            self.store.add_edge(domain_node, group, EdgeKind::Contains);
        }
    }

    fn create_default_accounts(&mut self, domain_node: NodeId) {
        for (short, rid, enabled) in DEFAULT_ACCOUNTS {
            let account = self.store.add_node(
                NodeKind::User,
                self.qualified(short),
                ids::sid(&self.base_sid, *rid),
                props([
                    ("domain", PropertyValue::from(self.domain.as_str())),
                    ("enabled", PropertyValue::from(*enabled)),
                    ("highvalue", PropertyValue::from(*short == "ADMINISTRATOR")),
                    ("pwdlastset", PropertyValue::from(self.cfg.reference_time)),
                ]),
            );
            self.store.add_edge(domain_node, account, EdgeKind::Contains);
        }
    }

    fn create_default_memberships(&mut self) {
        let memberships: &[(&str, &str)] = &[
            ("ADMINISTRATOR", "DOMAIN ADMINS"),
            ("ADMINISTRATOR", "ADMINISTRATORS"),
            ("ADMINISTRATOR", "ENTERPRISE ADMINS"),
            ("KRBTGT", "DOMAIN USERS"),
            ("DEFAULTACCOUNT", "DOMAIN USERS"),
            ("GUEST", "DOMAIN GUESTS"),
            ("GUEST", "GUESTS"),
            ("DOMAIN ADMINS", "ADMINISTRATORS"),
            ("ENTERPRISE ADMINS", "ADMINISTRATORS"),
            ("DOMAIN USERS", "USERS"),
            ("DOMAIN GUESTS", "GUESTS"),
        ];

        for (member, group) in memberships {
            let member_id = self
                .store
                .find_by_name(&self.qualified(member))
                .or_else(|| self.default_group(member));
            let group_id = self.default_group(group);
            if let (Some(m), Some(g)) = (member_id, group_id) {
                self.store.add_edge(m, g, EdgeKind::MemberOf);
            }
        }
    }

    /// Baseline ACLs over the domain head and the default accounts.
    fn create_default_acls_for_defaults(&mut self, domain_node: NodeId) {
        // High-value groups hold the domain.
        for short in HIGH_VALUE_GROUPS {
            if let Some(group) = self.default_group(short) {
                self.store.add_edge(group, domain_node, EdgeKind::GenericAll);
                self.store.add_edge(group, domain_node, EdgeKind::GetChanges);
                self.store
                    .add_edge(group, domain_node, EdgeKind::GetChangesAll);
            }
        }

        // Replication rights for the DC groups.
        if let Some(erodc) = self.default_group("ENTERPRISE READ-ONLY DOMAIN CONTROLLERS") {
            self.store.add_edge(erodc, domain_node, EdgeKind::GetChanges);
        }
        if let Some(dcs) = self.default_group("DOMAIN CONTROLLERS") {
            self.store.add_edge(dcs, domain_node, EdgeKind::GetChanges);
            self.store.add_edge(dcs, domain_node, EdgeKind::GetChangesAll);
        }

        // Domain Admins control the default accounts.
        if let Some(da) = self.default_group("DOMAIN ADMINS") {
            for (short, _, _) in DEFAULT_ACCOUNTS {
                if let Some(account) = self.store.find_by_name(&self.qualified(short)) {
                    self.store.add_edge(da, account, EdgeKind::GenericAll);
                }
            }
        }
    }
}

/// Distinguished name of the domain head, e.g. "DC=TESTLAB,DC=LOCALE".
pub fn domain_dn(domain: &str) -> String {
    domain
        .split('.')
        .map(|part| format!("DC={}", part))
        .collect::<Vec<_>>()
        .join(",")
}
