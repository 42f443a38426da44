use crate::{error::Error, group::Group, Index, Result};
use ahash::AHashMap as HashMap;
use fabric_policy_controller_api::{NetworkKey, NetworkSpec};
use ipnet::IpNet;
use std::{fmt, net::IpAddr};
use tracing::{debug, instrument};

/// Encapsulation carried on the wire for a network.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encap {
    Vlan,
    Vxlan,
}

/// An L2/L3 broadcast domain within a tenant.
#[derive(Debug)]
pub(crate) struct Network {
    pub(crate) encap: Encap,
    pub(crate) pkt_tag: u32,
    pub(crate) subnet: IpNet,
    pub(crate) gateway: IpAddr,

    /// Endpoint groups owned by the network, by name.
    pub(crate) groups: HashMap<String, Group>,
}

// === impl Encap ===

impl std::str::FromStr for Encap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vlan" => Ok(Self::Vlan),
            "vxlan" => Ok(Self::Vxlan),
            encap => Err(Error::Validation(format!("invalid encap: {encap:?}"))),
        }
    }
}

impl fmt::Display for Encap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vlan => "vlan".fmt(f),
            Self::Vxlan => "vxlan".fmt(f),
        }
    }
}

// === impl Index ===

impl Index {
    #[instrument(skip(self, spec), fields(tenant = %spec.tenant_name, network = %spec.network_name))]
    pub fn apply_network(&mut self, spec: NetworkSpec) -> Result<()> {
        let network = mk_network(&spec)?;

        let tenant = self.tenant_mut(&spec.tenant_name)?;
        if tenant.networks.contains_key(&spec.network_name) {
            let key = NetworkKey::new(&spec.tenant_name, &spec.network_name);
            return Err(Error::conflict("network", key));
        }

        tenant.networks.insert(spec.network_name, network);
        debug!("Created network");
        Ok(())
    }

    /// Deletes a network. Fails while the network still owns endpoint groups
    /// unless `cascade` is set. Cascading only removes the groups; policies
    /// they referenced are unaffected.
    #[instrument(skip(self, key), fields(network = %key))]
    pub fn delete_network(&mut self, key: &NetworkKey, cascade: bool) -> Result<()> {
        let tenant = self.tenant_mut(&key.tenant)?;
        let network = tenant
            .networks
            .get(&key.network)
            .ok_or_else(|| Error::not_found("network", key))?;

        if !cascade && !network.groups.is_empty() {
            let mut dependents = network.groups.keys().cloned().collect::<Vec<_>>();
            dependents.sort();
            return Err(Error::Dependency {
                kind: "network",
                key: key.to_string(),
                dependents,
            });
        }

        tenant.networks.remove(&key.network);
        debug!("Removed network");
        Ok(())
    }

    /// Snapshot of a tenant's networks, in name order.
    pub fn networks(&self, tenant: &str) -> Result<Vec<NetworkSpec>> {
        let mut networks = self
            .tenant(tenant)?
            .networks
            .iter()
            .map(|(name, n)| NetworkSpec {
                tenant_name: tenant.to_string(),
                network_name: name.clone(),
                encap: n.encap.to_string(),
                pkt_tag: n.pkt_tag,
                subnet: n.subnet.to_string(),
                gateway: n.gateway.to_string(),
            })
            .collect::<Vec<_>>();
        networks.sort_by(|a, b| a.network_name.cmp(&b.network_name));
        Ok(networks)
    }
}

fn mk_network(spec: &NetworkSpec) -> Result<Network> {
    if spec.network_name.is_empty() {
        return Err(Error::Validation("network has no name".into()));
    }

    let encap = spec.encap.parse::<Encap>()?;

    if spec.subnet.is_empty() {
        return Err(Error::Validation(format!(
            "network {} has no subnet",
            spec.network_name
        )));
    }
    let subnet = spec
        .subnet
        .parse::<IpNet>()
        .map_err(|_| Error::Validation(format!("invalid subnet: {:?}", spec.subnet)))?;

    let gateway = spec
        .gateway
        .parse::<IpAddr>()
        .map_err(|_| Error::Validation(format!("invalid gateway: {:?}", spec.gateway)))?;
    if !subnet.contains(&gateway) {
        return Err(Error::Validation(format!(
            "gateway {} is outside subnet {}",
            gateway, subnet
        )));
    }

    Ok(Network {
        encap,
        pkt_tag: spec.pkt_tag,
        subnet,
        gateway,
        groups: HashMap::default(),
    })
}
