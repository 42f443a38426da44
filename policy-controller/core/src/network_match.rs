use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::IpAddr;

/// Matches a peer endpoint's address against an IP range.
///
/// A bare address converts to a /32 (or /128) network, so exact-address
/// selectors and CIDR selectors evaluate uniformly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkMatch {
    /// The network to match against.
    pub net: IpNet,
}

// === impl NetworkMatch ===

impl NetworkMatch {
    pub fn matches(&self, addr: IpAddr) -> bool {
        self.net.contains(&addr)
    }
}

impl From<IpAddr> for NetworkMatch {
    fn from(addr: IpAddr) -> Self {
        IpNet::from(addr).into()
    }
}

impl From<IpNet> for NetworkMatch {
    fn from(net: IpNet) -> Self {
        Self { net }
    }
}

impl From<Ipv4Net> for NetworkMatch {
    fn from(net: Ipv4Net) -> Self {
        IpNet::from(net).into()
    }
}

impl From<Ipv6Net> for NetworkMatch {
    fn from(net: Ipv6Net) -> Self {
        IpNet::from(net).into()
    }
}
