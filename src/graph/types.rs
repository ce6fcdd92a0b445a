//! Core type definitions for the synthesized graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node (its position in the store for one run)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        EdgeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        EdgeId(id)
    }
}

/// The closed set of directory object kinds.
///
/// On-premises kinds carry a SID-based object identifier; cloud kinds carry
/// an opaque 128-bit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum NodeKind {
    Domain,
    Ou,
    User,
    Computer,
    Group,
    Gpo,
    Container,
    Tenant,
    CloudUser,
    CloudGroup,
    CloudRole,
    ServicePrincipal,
    Application,
    KeyVault,
    VirtualMachine,
    ManagementGroup,
    Subscription,
}

impl NodeKind {
    /// Export label, matching what downstream graph tooling ingests.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Domain => "Domain",
            NodeKind::Ou => "OU",
            NodeKind::User => "User",
            NodeKind::Computer => "Computer",
            NodeKind::Group => "Group",
            NodeKind::Gpo => "GPO",
            NodeKind::Container => "Container",
            NodeKind::Tenant => "AZTenant",
            NodeKind::CloudUser => "AZUser",
            NodeKind::CloudGroup => "AZGroup",
            NodeKind::CloudRole => "AZRole",
            NodeKind::ServicePrincipal => "AZServicePrincipal",
            NodeKind::Application => "AZApp",
            NodeKind::KeyVault => "AZKeyVault",
            NodeKind::VirtualMachine => "AZVM",
            NodeKind::ManagementGroup => "AZManagementGroup",
            NodeKind::Subscription => "AZSubscription",
        }
    }

    /// True for kinds that consume a RID from the domain's allocator.
    pub fn is_security_principal(&self) -> bool {
        matches!(self, NodeKind::User | NodeKind::Computer | NodeKind::Group)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed relationship vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum EdgeKind {
    // Containment and policy
    Contains,
    MemberOf,
    GpLink,
    // Sessions
    HasSession,
    // Administrative and operational rights
    AdminTo,
    CanRdp,
    ExecuteDcom,
    AllowedToDelegate,
    ReadLapsPassword,
    // ACL rights
    GenericAll,
    GenericWrite,
    WriteOwner,
    WriteDacl,
    AddMember,
    ForceChangePassword,
    AllExtendedRights,
    Owns,
    GetChanges,
    GetChangesAll,
    // Hybrid synchronization
    SyncedTo,
    SyncedFrom,
    AzureAdJoined,
    // Cloud directory
    AzContains,
    AzMemberOf,
    AzHasRole,
    AzRunsAs,
    AzResetPassword,
    AzAddMembers,
    AzAddSecret,
    AzOwns,
    AzKeyVaultContributor,
    AzVmContributor,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Contains => "Contains",
            EdgeKind::MemberOf => "MemberOf",
            EdgeKind::GpLink => "GPLink",
            EdgeKind::HasSession => "HasSession",
            EdgeKind::AdminTo => "AdminTo",
            EdgeKind::CanRdp => "CanRDP",
            EdgeKind::ExecuteDcom => "ExecuteDCOM",
            EdgeKind::AllowedToDelegate => "AllowedToDelegate",
            EdgeKind::ReadLapsPassword => "ReadLAPSPassword",
            EdgeKind::GenericAll => "GenericAll",
            EdgeKind::GenericWrite => "GenericWrite",
            EdgeKind::WriteOwner => "WriteOwner",
            EdgeKind::WriteDacl => "WriteDacl",
            EdgeKind::AddMember => "AddMember",
            EdgeKind::ForceChangePassword => "ForceChangePassword",
            EdgeKind::AllExtendedRights => "AllExtendedRights",
            EdgeKind::Owns => "Owns",
            EdgeKind::GetChanges => "GetChanges",
            EdgeKind::GetChangesAll => "GetChangesAll",
            EdgeKind::SyncedTo => "SyncedTo",
            EdgeKind::SyncedFrom => "SyncedFrom",
            EdgeKind::AzureAdJoined => "AzureADJoined",
            EdgeKind::AzContains => "AZContains",
            EdgeKind::AzMemberOf => "AZMemberOf",
            EdgeKind::AzHasRole => "AZHasRole",
            EdgeKind::AzRunsAs => "AZRunsAs",
            EdgeKind::AzResetPassword => "AZResetPassword",
            EdgeKind::AzAddMembers => "AZAddMembers",
            EdgeKind::AzAddSecret => "AZAddSecret",
            EdgeKind::AzOwns => "AZOwns",
            EdgeKind::AzKeyVaultContributor => "AZKeyVaultContributor",
            EdgeKind::AzVmContributor => "AZVMContributor",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "NodeId(42)");

        let id2: NodeId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(NodeKind::Gpo.as_str(), "GPO");
        assert_eq!(NodeKind::CloudUser.as_str(), "AZUser");
        assert_eq!(EdgeKind::CanRdp.as_str(), "CanRDP");
        assert_eq!(EdgeKind::AzContains.as_str(), "AZContains");
    }

    #[test]
    fn test_security_principal_kinds() {
        assert!(NodeKind::User.is_security_principal());
        assert!(NodeKind::Group.is_security_principal());
        assert!(!NodeKind::Gpo.is_security_principal());
        assert!(!NodeKind::CloudUser.is_security_principal());
    }

    #[test]
    fn test_id_ordering() {
        let id1 = NodeId::new(1);
        let id2 = NodeId::new(2);
        assert!(id1 < id2);
    }
}
