//! Cloud directory generators
//!
//! Structurally parallel to the on-premises stages but over the cloud object
//! kinds: tenant, subscriptions, roles, users, groups, management groups,
//! service principals, applications, key vaults and virtual machines, plus
//! their containment, membership, role-assignment and misconfigured
//! permission edges. Containment always points from container to contained.

use crate::graph::{EdgeKind, NodeId, NodeKind, PropertyValue};
use crate::synth::{ids, props, sampling, Synthesizer};

pub const GLOBAL_ADMIN_ROLE: &str = "Global Administrator";
pub const GLOBAL_ADMIN_USER: &str = "Global Admin";

/// Handles produced while populating one tenant.
#[derive(Debug, Default)]
pub struct CloudTenant {
    pub tenant: NodeId,
    pub subscriptions: Vec<NodeId>,
    pub roles: Vec<NodeId>,
    pub users: Vec<NodeId>,
    pub groups: Vec<NodeId>,
    pub management_groups: Vec<NodeId>,
    pub service_principals: Vec<NodeId>,
    pub applications: Vec<NodeId>,
    pub key_vaults: Vec<NodeId>,
    pub vms: Vec<NodeId>,
}

/// Generate a complete standalone cloud tenant.
pub(crate) fn generate(s: &mut Synthesizer) -> NodeId {
    let mut tenant = generate_infrastructure(s);
    tenant.users = create_users(s, &tenant);
    assign_group_memberships(s, &tenant);
    assign_roles(s, &tenant, &tenant.users.clone());
    create_permissions(s, &tenant, &tenant.users.clone());
    tenant.tenant
}

/// Tenant plus every non-user population. Hybrid runs add synced and
/// cloud-only users before memberships and role assignment.
pub(crate) fn generate_infrastructure(s: &mut Synthesizer) -> CloudTenant {
    let mut tenant = CloudTenant {
        tenant: create_tenant(s),
        ..CloudTenant::default()
    };

    tracing::info!("creating cloud subscriptions");
    tenant.subscriptions = create_subscriptions(s, &tenant);
    tracing::info!("creating cloud roles");
    tenant.roles = create_roles(s, &tenant);
    tracing::info!("creating cloud groups");
    tenant.groups = create_groups(s, &tenant);
    tracing::info!("creating management groups");
    tenant.management_groups = create_management_groups(s, &tenant);
    tracing::info!("creating service principals");
    tenant.service_principals = create_service_principals(s, &tenant);
    tracing::info!("creating applications");
    tenant.applications = create_applications(s, &tenant);
    tracing::info!("creating key vaults");
    tenant.key_vaults = create_key_vaults(s, &tenant);
    tracing::info!("creating virtual machines");
    tenant.vms = create_vms(s, &tenant);

    tenant
}

fn tenant_object_id(s: &Synthesizer, tenant: &CloudTenant) -> String {
    s.store
        .get_node(tenant.tenant)
        .map(|n| n.object_id.clone())
        .unwrap_or_default()
}

pub(crate) fn create_tenant(s: &mut Synthesizer) -> NodeId {
    let object_id = ids::new_object_id(&mut s.rng);
    let name = s.domain().to_string();
    s.store.add_node(
        NodeKind::Tenant,
        name.clone(),
        object_id.clone(),
        props([
            ("displayName", PropertyValue::from(name.as_str())),
            ("tenantid", PropertyValue::from(object_id.as_str())),
        ]),
    )
}

fn create_subscriptions(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut subscriptions = Vec::new();
    for i in 0..s.cfg.az_subscription.n_subscriptions {
        let object_id = ids::new_object_id(&mut s.rng);
        let subscription_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::Subscription,
            format!("{}_Subscription_{}", s.domain(), i + 1),
            object_id,
            props([
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("subscriptionId", PropertyValue::from(subscription_id)),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        subscriptions.push(id);
    }
    subscriptions
}

fn create_roles(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let role_names = s.cfg.az_role.default_roles.clone();
    let mut roles = Vec::new();
    for i in 0..s.cfg.az_role.n_roles as usize {
        let name = role_names[i % role_names.len()].clone();
        let object_id = ids::new_object_id(&mut s.rng);
        let template_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::CloudRole,
            name.clone(),
            object_id,
            props([
                ("displayName", PropertyValue::from(name)),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("roleTemplateId", PropertyValue::from(template_id)),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        roles.push(id);
    }
    roles
}

/// Default principals first (the tenant's Global Admin and Guest), then the
/// random user population.
pub(crate) fn create_users(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut users = Vec::new();

    let domain_lower = s.domain().to_lowercase();
    let defaults = [
        (GLOBAL_ADMIN_USER, format!("admin@{}", domain_lower), true),
        ("Guest User", format!("guest@{}", domain_lower), false),
    ];
    for (name, upn, is_admin) in defaults {
        let object_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::CloudUser,
            name,
            object_id,
            props([
                ("userPrincipalName", PropertyValue::from(upn)),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("enabled", PropertyValue::from(true)),
                ("displayName", PropertyValue::from(name)),
                ("isAdmin", PropertyValue::from(is_admin)),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        if is_admin {
            if let Some(role) = find_role(s, tenant, GLOBAL_ADMIN_ROLE) {
                s.store.add_edge_with_properties(
                    id,
                    role,
                    EdgeKind::AzHasRole,
                    props([("scope", PropertyValue::from(tenant_oid.as_str()))]),
                );
            }
        }
        users.push(id);
    }

    for _ in 0..s.cfg.az_user.n_users {
        let (first, last) = s.names.display_name(&mut s.rng);
        let display = format!("{} {}", first, last);
        let upn = format!(
            "{}.{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            domain_lower
        );
        let enabled = sampling::chance(&mut s.rng, s.cfg.az_user.enabled);
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
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        users.push(id);
    }
    users
}

fn create_groups(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut groups = Vec::new();

    for (name, privileged) in [("All Users", false), ("Global Admins", true)] {
        let object_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::CloudGroup,
            name,
            object_id,
            props([
                ("displayName", PropertyValue::from(name)),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("highvalue", PropertyValue::from(privileged)),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        groups.push(id);
    }

    for i in 0..s.cfg.az_group.n_groups {
        let name = format!("Group_{}", i + 1);
        let object_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::CloudGroup,
            name.clone(),
            object_id,
            props([
                ("displayName", PropertyValue::from(name)),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("highvalue", PropertyValue::from(false)),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        groups.push(id);
    }
    groups
}

fn create_management_groups(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut management_groups = Vec::new();
    for i in 0..s.cfg.az_management_group.n_management_groups {
        let name = format!("MG_{}", i + 1);
        let object_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::ManagementGroup,
            name.clone(),
            object_id,
            props([
                ("displayName", PropertyValue::from(format!("Management Group {}", i + 1))),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);

        let wanted =
            sampling::in_range(&mut s.rng, s.cfg.az_management_group.subscriptions_per_group)
                as usize;
        let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, &tenant.subscriptions, wanted)
            .into_iter()
            .copied()
            .collect();
        for sub in chosen {
            s.store.add_edge(id, sub, EdgeKind::AzContains);
        }
        management_groups.push(id);
    }
    management_groups
}

fn create_service_principals(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut sps = Vec::new();
    for i in 0..s.cfg.az_service_principal.n_service_principals {
        let object_id = ids::new_object_id(&mut s.rng);
        let app_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::ServicePrincipal,
            format!("SP_{}", i + 1),
            object_id,
            props([
                ("displayName", PropertyValue::from(format!("Service Principal {}", i + 1))),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("appId", PropertyValue::from(app_id)),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        sps.push(id);
    }
    sps
}

fn create_applications(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut apps = Vec::new();

    // The portal is the one application every new tenant starts with.
    let object_id = ids::new_object_id(&mut s.rng);
    let app_id = ids::new_object_id(&mut s.rng);
    let portal = s.store.add_node(
        NodeKind::Application,
        "Azure Portal",
        object_id,
        props([
            ("displayName", PropertyValue::from("Azure Portal")),
            ("tenantid", PropertyValue::from(tenant_oid.as_str())),
            ("appId", PropertyValue::from(app_id)),
        ]),
    );
    s.store.add_edge(tenant.tenant, portal, EdgeKind::AzContains);
    if let Some(sp) = sampling::pick(&mut s.rng, &tenant.service_principals).copied() {
        s.store.add_edge(portal, sp, EdgeKind::AzRunsAs);
    }
    apps.push(portal);

    for i in 0..s.cfg.az_app.n_applications {
        let object_id = ids::new_object_id(&mut s.rng);
        let app_id = ids::new_object_id(&mut s.rng);
        let id = s.store.add_node(
            NodeKind::Application,
            format!("App_{}", i + 1),
            object_id,
            props([
                ("displayName", PropertyValue::from(format!("Application {}", i + 1))),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
                ("appId", PropertyValue::from(app_id)),
            ]),
        );
        s.store.add_edge(tenant.tenant, id, EdgeKind::AzContains);
        if sampling::chance(&mut s.rng, s.cfg.az_app.sp_assignment_probability) {
            if let Some(sp) = sampling::pick(&mut s.rng, &tenant.service_principals).copied() {
                s.store.add_edge(id, sp, EdgeKind::AzRunsAs);
            }
        }
        apps.push(id);
    }
    apps
}

fn create_key_vaults(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut key_vaults = Vec::new();
    for i in 0..s.cfg.az_key_vault.n_key_vaults {
        let object_id = ids::new_object_id(&mut s.rng);
        let parent = sampling::pick(&mut s.rng, &tenant.subscriptions)
            .copied()
            .unwrap_or(tenant.tenant);
        let id = s.store.add_node(
            NodeKind::KeyVault,
            format!("KeyVault_{}", i + 1),
            object_id,
            props([
                ("displayName", PropertyValue::from(format!("Key Vault {}", i + 1))),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
            ]),
        );
        s.store.add_edge(parent, id, EdgeKind::AzContains);
        key_vaults.push(id);
    }
    key_vaults
}

fn create_vms(s: &mut Synthesizer, tenant: &CloudTenant) -> Vec<NodeId> {
    let tenant_oid = tenant_object_id(s, tenant);
    let mut vms = Vec::new();
    for i in 0..s.cfg.az_vm.n_vms {
        let object_id = ids::new_object_id(&mut s.rng);
        let parent = sampling::pick(&mut s.rng, &tenant.subscriptions)
            .copied()
            .unwrap_or(tenant.tenant);
        let id = s.store.add_node(
            NodeKind::VirtualMachine,
            format!("VM_{}", i + 1),
            object_id,
            props([
                ("displayName", PropertyValue::from(format!("Virtual Machine {}", i + 1))),
                ("tenantid", PropertyValue::from(tenant_oid.as_str())),
            ]),
        );
        s.store.add_edge(parent, id, EdgeKind::AzContains);
        vms.push(id);
    }
    vms
}

pub(crate) fn find_role(s: &Synthesizer, tenant: &CloudTenant, name: &str) -> Option<NodeId> {
    tenant
        .roles
        .iter()
        .copied()
        .find(|id| s.store.get_node(*id).map(|n| n.name == name).unwrap_or(false))
}

fn find_user(s: &Synthesizer, users: &[NodeId], name: &str) -> Option<NodeId> {
    users
        .iter()
        .copied()
        .find(|id| s.store.get_node(*id).map(|n| n.name == name).unwrap_or(false))
}

/// Each group draws a member count from the configured range and samples
/// that many users.
pub(crate) fn assign_group_memberships(s: &mut Synthesizer, tenant: &CloudTenant) {
    let users = tenant.users.clone();
    for group in tenant.groups.clone() {
        let wanted = sampling::in_range(&mut s.rng, s.cfg.az_group.members_per_group) as usize;
        let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, &users, wanted)
            .into_iter()
            .copied()
            .collect();
        for user in chosen {
            s.store.add_edge(user, group, EdgeKind::AzMemberOf);
        }
    }
}

/// Role assignment by principal class. The Global Administrator role scopes
/// to the tenant; everything else scopes to a subscription. A configured
/// fraction of users is deliberately overprivileged with tenant-scoped
/// Global Administrator.
pub(crate) fn assign_roles(s: &mut Synthesizer, tenant: &CloudTenant, users: &[NodeId]) {
    let tenant_oid = tenant_object_id(s, tenant);
    let subscription_scope = tenant
        .subscriptions
        .first()
        .and_then(|id| s.store.get_node(*id))
        .map(|n| n.object_id.clone())
        .unwrap_or_else(|| tenant_oid.clone());

    let global_admin_role = find_role(s, tenant, GLOBAL_ADMIN_ROLE);
    let global_admin_user = find_user(s, users, GLOBAL_ADMIN_USER);
    let lesser_roles: Vec<NodeId> = tenant
        .roles
        .iter()
        .copied()
        .filter(|r| Some(*r) != global_admin_role)
        .collect();

    let eligible: Vec<NodeId> = users
        .iter()
        .copied()
        .filter(|u| Some(*u) != global_admin_user)
        .collect();

    for user in &eligible {
        if sampling::chance(&mut s.rng, s.cfg.az_role.assign_chance_users) {
            if let Some(role) = sampling::pick(&mut s.rng, &lesser_roles).copied() {
                s.store.add_edge_with_properties(
                    *user,
                    role,
                    EdgeKind::AzHasRole,
                    props([("scope", PropertyValue::from(subscription_scope.as_str()))]),
                );
            }
        }
    }

    if let Some(role) = global_admin_role {
        let wanted = users.len() * s.cfg.az_misconfig.overprivileged_users as usize / 100;
        let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, &eligible, wanted)
            .into_iter()
            .copied()
            .collect();
        for user in chosen {
            s.store.add_edge_with_properties(
                user,
                role,
                EdgeKind::AzHasRole,
                props([("scope", PropertyValue::from(tenant_oid.as_str()))]),
            );
        }
    }

    for group in tenant.groups.clone() {
        if sampling::chance(&mut s.rng, s.cfg.az_role.assign_chance_groups) {
            if let Some(role) = sampling::pick(&mut s.rng, &tenant.roles).copied() {
                let scope = if Some(role) == global_admin_role {
                    tenant_oid.clone()
                } else {
                    subscription_scope.clone()
                };
                s.store.add_edge_with_properties(
                    group,
                    role,
                    EdgeKind::AzHasRole,
                    props([("scope", PropertyValue::from(scope))]),
                );
            }
        }
    }

    for sp in tenant.service_principals.clone() {
        if sampling::chance(&mut s.rng, s.cfg.az_role.assign_chance_service_principals) {
            if let Some(role) = sampling::pick(&mut s.rng, &lesser_roles).copied() {
                s.store.add_edge_with_properties(
                    sp,
                    role,
                    EdgeKind::AzHasRole,
                    props([("scope", PropertyValue::from(subscription_scope.as_str()))]),
                );
            }
        }
    }
}

/// Misconfigured cloud permission edges: password resets, group-member
/// control, secret control and resource ownership.
pub(crate) fn create_permissions(s: &mut Synthesizer, tenant: &CloudTenant, users: &[NodeId]) {
    let groups = tenant.groups.clone();
    let sps = tenant.service_principals.clone();
    let mut resources = tenant.key_vaults.clone();
    resources.extend_from_slice(&tenant.vms);

    let wanted = users.len() * s.cfg.az_misconfig.reset_password as usize / 100;
    let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, users, wanted)
        .into_iter()
        .copied()
        .collect();
    for user in chosen {
        let others: Vec<NodeId> = users.iter().copied().filter(|u| *u != user).collect();
        if let Some(target) = sampling::pick(&mut s.rng, &others).copied() {
            s.store.add_edge(user, target, EdgeKind::AzResetPassword);
        }
    }

    let wanted = users.len() * s.cfg.az_misconfig.add_member as usize / 100;
    let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, users, wanted)
        .into_iter()
        .copied()
        .collect();
    for user in chosen {
        if let Some(group) = sampling::pick(&mut s.rng, &groups).copied() {
            s.store.add_edge(user, group, EdgeKind::AzAddMembers);
        }
    }

    let mut principals = users.to_vec();
    principals.extend_from_slice(&sps);

    let wanted = principals.len() * s.cfg.az_misconfig.add_secret as usize / 100;
    let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, &principals, wanted)
        .into_iter()
        .copied()
        .collect();
    for principal in chosen {
        let others: Vec<NodeId> = sps.iter().copied().filter(|sp| *sp != principal).collect();
        if let Some(target) = sampling::pick(&mut s.rng, &others).copied() {
            s.store.add_edge(principal, target, EdgeKind::AzAddSecret);
        }
    }

    let wanted = principals.len() * s.cfg.az_misconfig.owns_resource as usize / 100;
    let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, &principals, wanted)
        .into_iter()
        .copied()
        .collect();
    for principal in chosen {
        if let Some(target) = sampling::pick(&mut s.rng, &resources).copied() {
            s.store.add_edge(principal, target, EdgeKind::AzOwns);
        }
    }

    let wanted = users.len() * s.cfg.az_misconfig.misconfig_group_members as usize / 100;
    let chosen: Vec<NodeId> = sampling::sample(&mut s.rng, users, wanted)
        .into_iter()
        .copied()
        .collect();
    for user in chosen {
        if let Some(group) = sampling::pick(&mut s.rng, &groups).copied() {
            s.store.add_edge(user, group, EdgeKind::AzMemberOf);
        }
    }
}
