//! Generation parameters
//!
//! The configuration is a strongly-typed tree populated from a JSON document.
//! Every field has a documented default: missing keys take the default and
//! unknown keys are ignored, so a partial settings file is always usable.
//! Percentage combinations that exceed the safety bound are replaced with the
//! section defaults (logged as a warning), never treated as fatal.

use crate::graph::SynthResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Weight tables need not sum to 100; draws normalize by the actual sum.
pub type WeightTable = IndexMap<String, u32>;

/// Inclusive `[low, high]` range used for sizing draws.
pub type Range2 = [u32; 2];

/// Security posture of the generated environment. Low security yields more
/// injected misconfigurations, High fewer; Customized reads the explicit
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SecurityLevel {
    #[default]
    Customized,
    Low,
    High,
}

/// A percentage table keyed by [`SecurityLevel`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelTable {
    #[serde(rename = "Customized", default = "defaults::level_customized")]
    pub customized: u32,
    #[serde(rename = "Low", default = "defaults::level_low")]
    pub low: u32,
    #[serde(rename = "High", default = "defaults::level_high")]
    pub high: u32,
}

impl LevelTable {
    pub fn value_for(&self, level: SecurityLevel) -> u32 {
        match level {
            SecurityLevel::Customized => self.customized,
            SecurityLevel::Low => self.low,
            SecurityLevel::High => self.high,
        }
    }
}

/// Allow/limit budget for a class of injected misconfiguration edges.
/// `allow == 0` disables the class; otherwise at most `limit` edges are
/// created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MisconfigBudget {
    pub allow: u32,
    pub limit: u32,
}

impl MisconfigBudget {
    pub fn permits(&self, used: u32) -> bool {
        self.allow > 0 && used < self.limit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSection {
    /// Functional level draw weights (value -> weight)
    #[serde(default = "defaults::functional_levels")]
    pub functional_level_probability: WeightTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSection {
    /// Percentage of generated users that are admin-eligible
    #[serde(rename = "Admin_Percentage", default = "defaults::admin_percentage")]
    pub admin_percentage: u32,
    /// Per-tier placement weights; empty means uniform
    #[serde(default)]
    pub tier_weights: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSection {
    #[serde(rename = "nUsers", default = "defaults::n_users")]
    pub n_users: u32,
    #[serde(default = "defaults::user_enabled")]
    pub enabled: u32,
    /// Kerberos pre-authentication disabled
    #[serde(default = "defaults::dont_req_preauth")]
    pub dont_req_preauth: u32,
    /// Carries service principal names
    #[serde(default = "defaults::has_spn")]
    pub has_spn: u32,
    #[serde(default = "defaults::password_not_reqd")]
    pub password_not_reqd: u32,
    #[serde(default = "defaults::pwd_never_expires")]
    pub pwd_never_expires: u32,
    #[serde(default = "defaults::sid_history")]
    pub sid_history: u32,
    #[serde(default = "defaults::user_unconstrained_delegation")]
    pub unconstrained_delegation: u32,
    #[serde(default = "defaults::saved_credentials")]
    pub saved_credentials: u32,
    /// How many SPN users end up offline-crackable, drawn from this range
    #[serde(default = "defaults::kerberoastable")]
    pub kerberoastable: Range2,
    /// Percentage of each tier's machines that host sessions; indexed by
    /// tier, last entry reused for deeper tiers
    #[serde(default = "defaults::sessions_per_tier")]
    pub sessions_per_tier: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputerSection {
    #[serde(rename = "nComputers", default = "defaults::n_computers")]
    pub n_computers: u32,
    #[serde(default = "defaults::computer_enabled")]
    pub enabled: u32,
    #[serde(default = "defaults::computer_os")]
    pub os_probability: WeightTable,
    /// PAW / Server / Workstation split
    #[serde(default = "defaults::computer_roles")]
    pub role_probability: WeightTable,
    #[serde(default = "defaults::computer_unconstrained_delegation")]
    pub unconstrained_delegation: u32,
    #[serde(default = "defaults::has_laps")]
    pub has_laps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcSection {
    #[serde(rename = "nDCs", default = "defaults::n_dcs")]
    pub n_dcs: u32,
    #[serde(default = "defaults::dc_enabled")]
    pub enabled: u32,
    #[serde(default = "defaults::dc_os")]
    pub os_probability: WeightTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSection {
    /// Department draw weights
    #[serde(default = "defaults::departments")]
    pub departments: WeightTable,
    /// Security groups created per department per tier, drawn from this range
    #[serde(default = "defaults::groups_per_department")]
    pub groups_per_department: Range2,
    /// Percentage of created groups that are distribution groups
    #[serde(default = "defaults::distribution_percentage")]
    pub distribution_percentage: u32,
    /// Chance that a group nests another group
    #[serde(default = "defaults::nesting_probability")]
    pub nesting_probability: u32,
    /// Candidate retries before giving up on a nesting edge
    #[serde(default = "defaults::nesting_retry_limit")]
    pub nesting_retry_limit: u32,
    #[serde(rename = "nGroupsPerUsers", default = "defaults::groups_per_user")]
    pub groups_per_user: Range2,
    /// Members drawn into each local-admin group
    #[serde(default = "defaults::local_admin_group_size")]
    pub local_admin_group_size: Range2,
    /// Most machines a single local-admin group administers
    #[serde(default = "defaults::resource_threshold")]
    pub resource_threshold: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpoSection {
    #[serde(rename = "nGPOs", default = "defaults::n_gpos")]
    pub n_gpos: u32,
    /// Percentage of generated GPOs flagged exploitable
    #[serde(default = "defaults::gpo_exploitable")]
    pub exploitable: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclSection {
    /// Percentage of each tier's principals receiving a right
    #[serde(default = "defaults::acl_principal_percentage")]
    pub principal_percentage: u32,
    /// Right draw weights
    #[serde(default = "defaults::acl_rights")]
    pub probability: WeightTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonAclSection {
    #[serde(default = "defaults::nonacl_principal_percentage")]
    pub principal_percentage: u32,
    #[serde(default = "defaults::nonacl_rights")]
    pub probability: WeightTable,
}

/// Percentages of principals deliberately placed in the wrong container
/// class (admins in regular OUs, users in computer OUs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMisconfigSection {
    #[serde(default = "defaults::misconfig_admin_regular")]
    pub admin_regular: u32,
    #[serde(default = "defaults::misconfig_user_comp")]
    pub user_comp: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridSection {
    /// Percentage of on-premises users synced to the cloud directory
    #[serde(default = "defaults::sync_percentage")]
    pub sync_percentage: u32,
    /// Cloud-only users as a percentage of the on-premises user count...
    #[serde(default = "defaults::cloud_only_percentage")]
    pub cloud_only_percentage: u32,
    /// ...but never fewer than this many
    #[serde(default = "defaults::cloud_only_minimum")]
    pub cloud_only_minimum: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzSubscriptionSection {
    #[serde(rename = "nSubscriptions", default = "defaults::n_subscriptions")]
    pub n_subscriptions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzRoleSection {
    #[serde(rename = "nRoles", default = "defaults::n_roles")]
    pub n_roles: u32,
    #[serde(rename = "defaultRoles", default = "defaults::role_names")]
    pub default_roles: Vec<String>,
    #[serde(rename = "assignChanceUsers", default = "defaults::assign_chance_users")]
    pub assign_chance_users: u32,
    #[serde(rename = "assignChanceGroups", default = "defaults::assign_chance_groups")]
    pub assign_chance_groups: u32,
    #[serde(
        rename = "assignChanceServicePrincipals",
        default = "defaults::assign_chance_sps"
    )]
    pub assign_chance_service_principals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzUserSection {
    #[serde(rename = "nUsers", default = "defaults::n_cloud_users")]
    pub n_users: u32,
    #[serde(default = "defaults::cloud_user_enabled")]
    pub enabled: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzGroupSection {
    #[serde(rename = "nGroups", default = "defaults::n_cloud_groups")]
    pub n_groups: u32,
    #[serde(rename = "nMembersPerGroup", default = "defaults::members_per_group")]
    pub members_per_group: Range2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzManagementGroupSection {
    #[serde(rename = "nManagementGroups", default = "defaults::n_management_groups")]
    pub n_management_groups: u32,
    #[serde(rename = "subscriptionsPerGroup", default = "defaults::subscriptions_per_group")]
    pub subscriptions_per_group: Range2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzServicePrincipalSection {
    #[serde(rename = "nServicePrincipals", default = "defaults::n_service_principals")]
    pub n_service_principals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzAppSection {
    #[serde(rename = "nApplications", default = "defaults::n_applications")]
    pub n_applications: u32,
    #[serde(rename = "spAssignmentProbability", default = "defaults::sp_assignment_probability")]
    pub sp_assignment_probability: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzKeyVaultSection {
    #[serde(rename = "nKeyVaults", default = "defaults::n_key_vaults")]
    pub n_key_vaults: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzVmSection {
    #[serde(rename = "nVMs", default = "defaults::n_vms")]
    pub n_vms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzMisconfigSection {
    #[serde(default = "defaults::az_reset_password")]
    pub reset_password: u32,
    #[serde(default = "defaults::az_add_member")]
    pub add_member: u32,
    #[serde(default = "defaults::az_add_secret")]
    pub add_secret: u32,
    #[serde(default = "defaults::az_owns_resource")]
    pub owns_resource: u32,
    #[serde(default = "defaults::az_misconfig_group_members")]
    pub misconfig_group_members: u32,
    #[serde(default = "defaults::az_overprivileged_users")]
    pub overprivileged_users: u32,
}

/// Resolved generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Deterministic seed; 0 seeds from OS entropy
    #[serde(default = "defaults::seed")]
    pub seed: u64,
    /// Wall-clock anchor for generated timestamps (pwdlastset, lastlogon)
    #[serde(default = "defaults::reference_time")]
    pub reference_time: i64,
    #[serde(rename = "nTiers", default = "defaults::n_tiers")]
    pub n_tiers: usize,
    #[serde(rename = "nLocations", default = "defaults::n_locations")]
    pub n_locations: u32,
    /// When false, permission edges gain a reverse companion edge
    #[serde(default = "defaults::convert_to_directed_graphs")]
    pub convert_to_directed_graphs: bool,
    #[serde(default)]
    pub security_level: SecurityLevel,

    #[serde(rename = "Domain", default)]
    pub domain: DomainSection,
    #[serde(rename = "Admin", default)]
    pub admin: AdminSection,
    #[serde(rename = "User", default)]
    pub user: UserSection,
    #[serde(rename = "Computer", default)]
    pub computer: ComputerSection,
    #[serde(rename = "DC", default)]
    pub dc: DcSection,
    #[serde(rename = "Group", default)]
    pub group: GroupSection,
    #[serde(rename = "GPO", default)]
    pub gpo: GpoSection,
    #[serde(rename = "ACLs", default)]
    pub acls: AclSection,
    #[serde(rename = "nonACLs", default)]
    pub non_acls: NonAclSection,
    #[serde(rename = "nodeMisconfig", default)]
    pub node_misconfig: NodeMisconfigSection,

    #[serde(default = "defaults::perc_misconfig_sessions")]
    pub perc_misconfig_sessions: LevelTable,
    #[serde(default = "defaults::perc_misconfig_permissions")]
    pub perc_misconfig_permissions: LevelTable,
    #[serde(default = "defaults::perc_misconfig_group_nesting")]
    pub perc_misconfig_group_nesting: LevelTable,
    /// Cross-tier permission edges allowed to terminate at tier 0
    #[serde(default = "defaults::tier0_budget")]
    pub misconfig_permissions_to_tier_0: MisconfigBudget,
    /// Privilege-inverting group-nesting edges allowed per run
    #[serde(default = "defaults::nesting_budget")]
    pub misconfig_group_nesting: MisconfigBudget,

    #[serde(rename = "Hybrid", default)]
    pub hybrid: HybridSection,

    #[serde(rename = "AZSubscription", default)]
    pub az_subscription: AzSubscriptionSection,
    #[serde(rename = "AZRole", default)]
    pub az_role: AzRoleSection,
    #[serde(rename = "AZUser", default)]
    pub az_user: AzUserSection,
    #[serde(rename = "AZGroup", default)]
    pub az_group: AzGroupSection,
    #[serde(rename = "AZManagementGroup", default)]
    pub az_management_group: AzManagementGroupSection,
    #[serde(rename = "AZServicePrincipal", default)]
    pub az_service_principal: AzServicePrincipalSection,
    #[serde(rename = "AZApp", default)]
    pub az_app: AzAppSection,
    #[serde(rename = "AZKeyVault", default)]
    pub az_key_vault: AzKeyVaultSection,
    #[serde(rename = "AZVM", default)]
    pub az_vm: AzVmSection,
    #[serde(rename = "AZMisconfig", default)]
    pub az_misconfig: AzMisconfigSection,
}

impl Config {
    /// Parse a configuration from a JSON document. Missing keys take their
    /// documented defaults; unknown keys are ignored.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let mut cfg: Config = serde_json::from_str(json)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Parse a configuration from a reader.
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        let mut cfg: Config = serde_json::from_reader(reader)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SynthResult<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::from_reader(std::io::BufReader::new(file))?)
    }

    /// Replace percentage combinations that exceed their safety bound with
    /// the section defaults. Rejection is a warning, never an error.
    pub fn sanitize(&mut self) {
        if self.node_misconfig.admin_regular > 50 {
            tracing::warn!(
                admin_regular = self.node_misconfig.admin_regular,
                "node misconfiguration percentage exceeds safety bound, using default"
            );
            self.node_misconfig.admin_regular = defaults::misconfig_admin_regular();
        }
        if self.node_misconfig.admin_regular + self.node_misconfig.user_comp > 50 {
            tracing::warn!(
                admin_regular = self.node_misconfig.admin_regular,
                user_comp = self.node_misconfig.user_comp,
                "combined node misconfiguration percentages exceed safety bound, using defaults"
            );
            self.node_misconfig.admin_regular = defaults::misconfig_admin_regular();
            self.node_misconfig.user_comp = defaults::misconfig_user_comp();
        }
        if self.admin.admin_percentage > 100 {
            tracing::warn!(
                admin_percentage = self.admin.admin_percentage,
                "admin percentage above 100, using default"
            );
            self.admin.admin_percentage = defaults::admin_percentage();
        }
        if self.n_tiers == 0 {
            tracing::warn!("tier count must be at least 1, using default");
            self.n_tiers = defaults::n_tiers();
        }
    }

    /// Session percentage for a tier; the last configured entry covers all
    /// deeper tiers.
    pub fn session_percentage(&self, tier: usize) -> u32 {
        let table = &self.user.sessions_per_tier;
        match table.get(tier) {
            Some(p) => *p,
            None => table.last().copied().unwrap_or(0),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // The unwrap is safe: an empty object deserializes purely from the
        // field defaults.
        serde_json::from_str("{}").unwrap()
    }
}

macro_rules! section_default {
    ($($ty:ty),* $(,)?) => {
        $(impl Default for $ty {
            fn default() -> Self {
                serde_json::from_str("{}").unwrap()
            }
        })*
    };
}

section_default!(
    DomainSection,
    AdminSection,
    UserSection,
    ComputerSection,
    DcSection,
    GroupSection,
    GpoSection,
    AclSection,
    NonAclSection,
    NodeMisconfigSection,
    HybridSection,
    AzSubscriptionSection,
    AzRoleSection,
    AzUserSection,
    AzGroupSection,
    AzManagementGroupSection,
    AzServicePrincipalSection,
    AzAppSection,
    AzKeyVaultSection,
    AzVmSection,
    AzMisconfigSection,
);

/// Documented defaults for every configuration field.
mod defaults {
    use super::{LevelTable, MisconfigBudget, Range2, WeightTable};

    fn table(entries: &[(&str, u32)]) -> WeightTable {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    pub fn seed() -> u64 {
        1
    }
    pub fn reference_time() -> i64 {
        1_700_000_000
    }
    pub fn n_tiers() -> usize {
        3
    }
    pub fn n_locations() -> u32 {
        2
    }
    pub fn convert_to_directed_graphs() -> bool {
        true
    }

    pub fn functional_levels() -> WeightTable {
        table(&[
            ("2008", 4),
            ("2008 R2", 5),
            ("2012", 10),
            ("2012 R2", 30),
            ("2016", 51),
        ])
    }

    pub fn admin_percentage() -> u32 {
        10
    }

    pub fn n_users() -> u32 {
        300
    }
    pub fn user_enabled() -> u32 {
        85
    }
    pub fn dont_req_preauth() -> u32 {
        5
    }
    pub fn has_spn() -> u32 {
        10
    }
    pub fn password_not_reqd() -> u32 {
        5
    }
    pub fn pwd_never_expires() -> u32 {
        50
    }
    pub fn sid_history() -> u32 {
        5
    }
    pub fn user_unconstrained_delegation() -> u32 {
        2
    }
    pub fn saved_credentials() -> u32 {
        15
    }
    pub fn kerberoastable() -> Range2 {
        [5, 15]
    }
    pub fn sessions_per_tier() -> Vec<u32> {
        vec![40, 30, 20]
    }

    pub fn n_computers() -> u32 {
        150
    }
    pub fn computer_enabled() -> u32 {
        90
    }
    pub fn computer_os() -> WeightTable {
        table(&[
            ("Windows 10 Pro", 40),
            ("Windows 10 Enterprise", 20),
            ("Windows 7 Professional", 8),
            ("Windows XP Professional", 2),
            ("Windows Server 2016 Standard", 15),
            ("Windows Server 2012 R2 Standard", 10),
            ("Windows Server 2008 R2 Enterprise", 5),
        ])
    }
    pub fn computer_roles() -> WeightTable {
        table(&[("PAW", 10), ("Server", 30), ("Workstation", 60)])
    }
    pub fn computer_unconstrained_delegation() -> u32 {
        5
    }
    pub fn has_laps() -> u32 {
        10
    }

    pub fn n_dcs() -> u32 {
        2
    }
    pub fn dc_enabled() -> u32 {
        100
    }
    pub fn dc_os() -> WeightTable {
        table(&[
            ("Windows Server 2016 Datacenter", 60),
            ("Windows Server 2012 R2 Datacenter", 30),
            ("Windows Server 2008 R2 Datacenter", 10),
        ])
    }

    pub fn departments() -> WeightTable {
        table(&[
            ("IT", 25),
            ("ENGINEERING", 25),
            ("SALES", 20),
            ("HR", 15),
            ("FINANCE", 15),
        ])
    }
    pub fn groups_per_department() -> Range2 {
        [1, 3]
    }
    pub fn distribution_percentage() -> u32 {
        20
    }
    pub fn nesting_probability() -> u32 {
        30
    }
    pub fn nesting_retry_limit() -> u32 {
        10
    }
    pub fn groups_per_user() -> Range2 {
        [1, 5]
    }
    pub fn local_admin_group_size() -> Range2 {
        [1, 3]
    }
    pub fn resource_threshold() -> u32 {
        5
    }

    pub fn n_gpos() -> u32 {
        10
    }
    pub fn gpo_exploitable() -> u32 {
        20
    }

    pub fn acl_principal_percentage() -> u32 {
        30
    }
    pub fn acl_rights() -> WeightTable {
        table(&[
            ("GenericAll", 10),
            ("GenericWrite", 15),
            ("WriteOwner", 10),
            ("WriteDacl", 10),
            ("AddMember", 15),
            ("ForceChangePassword", 20),
            ("AllExtendedRights", 10),
            ("Owns", 10),
        ])
    }
    pub fn nonacl_principal_percentage() -> u32 {
        30
    }
    pub fn nonacl_rights() -> WeightTable {
        table(&[
            ("CanRDP", 40),
            ("ExecuteDCOM", 20),
            ("AllowedToDelegate", 10),
            ("ReadLAPSPassword", 30),
        ])
    }

    pub fn misconfig_admin_regular() -> u32 {
        5
    }
    pub fn misconfig_user_comp() -> u32 {
        5
    }

    pub fn level_customized() -> u32 {
        5
    }
    pub fn level_low() -> u32 {
        10
    }
    pub fn level_high() -> u32 {
        2
    }
    fn level_table() -> LevelTable {
        LevelTable {
            customized: level_customized(),
            low: level_low(),
            high: level_high(),
        }
    }
    pub fn perc_misconfig_sessions() -> LevelTable {
        level_table()
    }
    pub fn perc_misconfig_permissions() -> LevelTable {
        level_table()
    }
    pub fn perc_misconfig_group_nesting() -> LevelTable {
        level_table()
    }
    pub fn tier0_budget() -> MisconfigBudget {
        MisconfigBudget { allow: 1, limit: 1 }
    }
    pub fn nesting_budget() -> MisconfigBudget {
        MisconfigBudget { allow: 1, limit: 3 }
    }

    pub fn sync_percentage() -> u32 {
        70
    }
    pub fn cloud_only_percentage() -> u32 {
        15
    }
    pub fn cloud_only_minimum() -> u32 {
        10
    }

    pub fn n_subscriptions() -> u32 {
        2
    }
    pub fn n_roles() -> u32 {
        5
    }
    pub fn role_names() -> Vec<String> {
        [
            "Global Administrator",
            "Privileged Role Administrator",
            "User Administrator",
            "Contributor",
            "Reader",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
    pub fn assign_chance_users() -> u32 {
        30
    }
    pub fn assign_chance_groups() -> u32 {
        20
    }
    pub fn assign_chance_sps() -> u32 {
        25
    }
    pub fn n_cloud_users() -> u32 {
        100
    }
    pub fn cloud_user_enabled() -> u32 {
        90
    }
    pub fn n_cloud_groups() -> u32 {
        10
    }
    pub fn members_per_group() -> Range2 {
        [1, 10]
    }
    pub fn n_management_groups() -> u32 {
        2
    }
    pub fn subscriptions_per_group() -> Range2 {
        [1, 3]
    }
    pub fn n_service_principals() -> u32 {
        10
    }
    pub fn n_applications() -> u32 {
        8
    }
    pub fn sp_assignment_probability() -> u32 {
        50
    }
    pub fn n_key_vaults() -> u32 {
        5
    }
    pub fn n_vms() -> u32 {
        10
    }

    pub fn az_reset_password() -> u32 {
        5
    }
    pub fn az_add_member() -> u32 {
        5
    }
    pub fn az_add_secret() -> u32 {
        5
    }
    pub fn az_owns_resource() -> u32 {
        5
    }
    pub fn az_misconfig_group_members() -> u32 {
        5
    }
    pub fn az_overprivileged_users() -> u32 {
        3
    }
}
