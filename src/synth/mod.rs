//! The synthesis engine
//!
//! A [`Synthesizer`] owns everything one generation run needs: the graph
//! store, the seeded RNG, the identifier allocator, the name pools and the
//! resolved configuration. Stages execute in a fixed total order and draw
//! from the single RNG, which makes a run fully reproducible from its seed.
//! Resetting between runs is constructing a new `Synthesizer`.

pub mod groups;
pub mod ids;
pub mod misconfig;
pub mod names;
pub mod permissions;
pub mod population;
pub mod sampling;
pub mod segregate;
pub mod sessions;
pub mod skeleton;
pub mod tiers;

pub use ids::IdAllocator;
pub use names::NamePool;
pub use segregate::segregate;

use crate::config::Config;
use crate::graph::{GraphStore, NodeId, PropertyMap, PropertyValue};
use rand::rngs::StdRng;
use rand::SeedableRng;
use skeleton::Skeleton;
use tiers::TierLayout;

/// Base SID used when the caller does not supply one.
pub const DEFAULT_BASE_SID: &str = "S-1-5-21-883232822-274137685-4173207997";

/// Default domain name for runs that do not configure one.
pub const DEFAULT_DOMAIN: &str = "TESTLAB.LOCALE";

/// Build a property bag from key/value pairs.
pub(crate) fn props<I>(pairs: I) -> PropertyMap
where
    I: IntoIterator<Item = (&'static str, PropertyValue)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Everything the structural half of an on-premises run produces, consumed
/// by the permission passes and (in hybrid mode) the sync mapper.
#[derive(Debug)]
pub struct OnPremGraph {
    pub skeleton: Skeleton,
    pub layout: TierLayout,
    pub domain_controllers: Vec<NodeId>,
    /// All enabled users in creation order (admin-eligible included)
    pub all_enabled_users: Vec<NodeId>,
    /// Population size the misconfiguration percentages scale against
    pub n_regular: usize,
    /// Department/distribution groups created outside the default set
    pub num_regular_groups: usize,
}

/// One generation run over one exclusively-owned store.
pub struct Synthesizer {
    pub(crate) store: GraphStore,
    pub(crate) rng: StdRng,
    pub(crate) ids: IdAllocator,
    pub(crate) names: NamePool,
    pub(crate) cfg: Config,
    pub(crate) domain: String,
    pub(crate) base_sid: String,
    pub(crate) previous_domain: Option<String>,
    /// Cross-tier permission edges already terminated at tier 0
    pub(crate) tier0_budget_used: u32,
}

impl Synthesizer {
    /// Create a run for `domain` with the given configuration. `previous_domain`
    /// keeps forest-scoped names consistent between a teardown and re-creation.
    pub fn new(cfg: Config, domain: impl Into<String>, previous_domain: Option<String>) -> Self {
        let rng = if cfg.seed > 0 {
            StdRng::seed_from_u64(cfg.seed)
        } else {
            StdRng::from_entropy()
        };
        Synthesizer {
            store: GraphStore::new(),
            rng,
            ids: IdAllocator::new(),
            names: NamePool::new(),
            cfg,
            domain: domain.into().to_uppercase(),
            base_sid: DEFAULT_BASE_SID.to_string(),
            previous_domain: previous_domain.map(|d| d.to_uppercase()),
            tier0_budget_used: 0,
        }
    }

    /// Override the domain base SID.
    pub fn with_base_sid(mut self, base_sid: impl Into<String>) -> Self {
        self.base_sid = base_sid.into();
        self
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Consume the run and yield the finished store.
    pub fn into_store(self) -> GraphStore {
        self.store
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Domain name the forest-scoped default groups are filed under.
    pub(crate) fn forest_domain(&self) -> String {
        self.previous_domain
            .clone()
            .unwrap_or_else(|| self.domain.clone())
    }

    /// Generate a full on-premises directory graph.
    pub fn run_on_prem(&mut self) -> OnPremGraph {
        let graph = self.build_on_prem_structure();
        self.apply_on_prem_permissions(&graph);
        self.log_statistics();
        graph
    }

    /// Generate a cloud-directory-only graph.
    pub fn run_cloud(&mut self) {
        let tenant = crate::cloud::generate(self);
        tracing::info!(tenant = tenant.as_u64(), "cloud tenant generated");
        self.log_statistics();
    }

    /// Generate a hybrid graph: on-premises structure, a cloud tenant, an
    /// injective sync mapping between them, then the on-premises permission
    /// passes.
    pub fn run_hybrid(&mut self) -> crate::hybrid::SyncMap {
        let graph = self.build_on_prem_structure();
        let sync = crate::hybrid::generate(self, &graph);
        self.apply_on_prem_permissions(&graph);
        self.log_statistics();
        sync
    }

    /// Stages 1-9 of the fixed order: skeleton, populations, partitions,
    /// tier placement, groups, memberships and sessions.
    pub(crate) fn build_on_prem_structure(&mut self) -> OnPremGraph {
        tracing::info!(domain = %self.domain, "initiating directory domain");
        let mut skeleton = self.build_skeleton();

        let n_users = self.cfg.user.n_users;
        tracing::info!(count = n_users, "creating users");
        let users = self.generate_users(n_users);

        // Admin-eligible vs regular, then the deliberate out-of-policy splits.
        let perc_admin = self.cfg.admin.admin_percentage;
        let admin_buckets = segregate(&users.enabled, &[perc_admin, 100 - perc_admin]);
        let (all_admins, all_enabled) = (admin_buckets[0].clone(), admin_buckets[1].clone());

        let misconfig_admin_regular = self.cfg.node_misconfig.admin_regular;
        let misconfig_user_comp = self.cfg.node_misconfig.user_comp;

        let admin_split = segregate(
            &all_admins,
            &[100 - misconfig_admin_regular, misconfig_admin_regular],
        );
        let (admin, misconfig_admin) = (admin_split[0].clone(), admin_split[1].clone());

        let enabled_split = segregate(
            &all_enabled,
            &[
                100 - misconfig_admin_regular - misconfig_user_comp,
                misconfig_admin_regular,
                misconfig_user_comp,
            ],
        );
        let (enabled_users, misconfig_regular_users, misconfig_users_comps) = (
            enabled_split[0].clone(),
            enabled_split[1].clone(),
            enabled_split[2].clone(),
        );

        let n_computers = self.cfg.computer.n_computers;
        tracing::info!(count = n_computers, "generating computers");
        let computers = self.generate_computers(n_computers);

        tracing::info!("creating domain controllers");
        let domain_controllers = self.generate_dcs(&skeleton);

        tracing::info!("creating tier admin groups");
        self.create_tier_admin_groups(&mut skeleton);

        let ws_split = segregate(
            &computers.workstations,
            &[100 - misconfig_user_comp, misconfig_user_comp],
        );
        let (workstations, misconfig_workstations) = (ws_split[0].clone(), ws_split[1].clone());

        let mut layout = TierLayout::new(self.cfg.n_tiers);

        tracing::info!("placing computers in tiers");
        self.place_computers_in_tiers(
            &mut layout,
            &skeleton,
            &computers.paw,
            &computers.servers,
            &workstations,
            &misconfig_users_comps,
        );

        tracing::info!("allocating admin users to tiers");
        self.place_admin_users_in_tiers(&mut layout, &skeleton, &admin, &misconfig_regular_users);

        tracing::info!("allocating non-admin users to tiers");
        self.place_normal_users_in_tiers(
            &mut layout,
            &skeleton,
            &enabled_users,
            &users.disabled,
            &misconfig_admin,
            &misconfig_workstations,
        );

        tracing::info!("creating distribution groups and security groups");
        let num_regular_groups = self.create_groups(&mut layout, &skeleton);

        tracing::info!("nesting groups");
        self.nest_groups(&layout);

        tracing::info!("adding users to groups");
        self.place_users_in_groups(&layout);

        let n_regular = enabled_users.len() + admin.len();

        tracing::info!("generating sessions");
        self.create_sessions(&layout);

        tracing::info!("generating cross-tier sessions");
        self.create_misconfig_sessions(&layout, n_regular);

        tracing::info!("granting operator sessions on domain controllers");
        self.create_dc_sessions(&domain_controllers, &layout);

        OnPremGraph {
            skeleton,
            layout,
            domain_controllers,
            all_enabled_users: users.enabled,
            n_regular,
            num_regular_groups,
        }
    }

    /// Stages 10-15: permission passes, misconfiguration overlays, default
    /// ACLs and the kerberoastable finishing pass.
    pub(crate) fn apply_on_prem_permissions(&mut self, graph: &OnPremGraph) {
        tracing::info!("generating operational permissions");
        self.create_control_management_permissions(graph, permissions::AclMode::Operational);

        tracing::info!("generating misconfigured permissions on individuals");
        self.create_misconfig_permissions_on_individuals(&graph.layout, graph.n_regular);

        tracing::info!("generating misconfigured permissions on groups");
        self.create_misconfig_permissions_on_groups(&graph.layout, &graph.skeleton);

        tracing::info!("generating misconfigured group nesting");
        self.create_misconfig_group_nesting(&graph.layout, graph.num_regular_groups);

        tracing::info!("creating ACL permissions");
        self.create_control_management_permissions(graph, permissions::AclMode::Acl);

        tracing::info!("adding admin rights");
        self.assign_administration_to_admin_principals(graph);

        tracing::info!("adding local admin rights");
        self.assign_local_admin_rights(&graph.layout);

        tracing::info!("creating default ACLs");
        self.create_default_acls(graph);

        tracing::info!("marking kerberoastable users");
        self.mark_kerberoastable();
    }

    fn log_statistics(&self) {
        let stats = self.store.statistics();
        tracing::info!(
            nodes = stats.node_count,
            edges = stats.edge_count,
            density = stats.density,
            "generation finished"
        );
        for (kind, count) in &stats.nodes_per_kind {
            tracing::info!(kind = kind.as_str(), count, "node kind");
        }
    }
}
