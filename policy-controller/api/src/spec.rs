/// Fabric mode value selecting external (ACI) policy enforcement.
pub const INFRA_TYPE_ACI: &str = "aci";

/// Fabric mode value for stand-alone enforcement.
pub const INFRA_TYPE_DEFAULT: &str = "default";

/// Body of `POST /api/tenants/{tenantName}/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenantSpec {
    pub tenant_name: String,

    /// Name of the tenant's default network; may be set before the network
    /// itself is created.
    pub default_network: String,
}

/// Body of `POST /api/networks/{tenantName}:{networkName}/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkSpec {
    pub tenant_name: String,
    pub network_name: String,

    /// Encapsulation kind: `vlan` or `vxlan`.
    pub encap: String,

    /// Packet tag carried on the wire for this network.
    pub pkt_tag: u32,

    /// The network's subnet, in CIDR notation.
    pub subnet: String,

    /// Gateway address within the subnet.
    pub gateway: String,
}

/// Body of `POST /api/endpointGroups/{tenantName}:{networkName}:{groupName}/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointGroupSpec {
    pub tenant_name: String,
    pub network_name: String,
    pub group_name: String,

    /// Names of policies attached to the group. Membership is a set; order
    /// carries no meaning.
    pub policies: Vec<String>,
}

/// Body of `POST /api/policys/{tenantName}:{policyName}/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySpec {
    pub tenant_name: String,
    pub policy_name: String,
}

/// Body of `POST /api/rules/{tenantName}:{policyName}:{ruleId}/`.
///
/// Exactly one selector class (`*EndpointGroup`, `*Network`, `*IpAddress`)
/// may be populated per direction side; empty strings mean "unset". `in`
/// rules use the `from*` side, `out` rules the `to*` side, and `both` rules
/// may use one class on each.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSpec {
    pub tenant_name: String,
    pub policy_name: String,
    pub rule_id: String,

    /// Higher priorities win ties between matching rules.
    pub priority: u32,

    /// `in`, `out`, or `both`.
    pub direction: String,

    /// `allow` or `deny`.
    pub action: String,

    /// `tcp`, `udp`, `icmp`, or empty for any.
    pub protocol: String,

    /// Destination port; zero matches any.
    pub port: u16,

    /// Peer group, as `group` or `network:group`.
    pub from_endpoint_group: String,
    pub from_network: String,

    /// Peer address or CIDR.
    pub from_ip_address: String,

    pub to_endpoint_group: String,
    pub to_network: String,
    pub to_ip_address: String,
}

/// Body of `POST /api/globals/{name}/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSpec {
    pub name: String,

    /// `aci`, or `default`/`stand-alone` for local enforcement.
    pub network_infra_type: String,
}
