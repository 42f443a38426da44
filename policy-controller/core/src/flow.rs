use ahash::AHashSet as HashSet;
use std::{fmt, net::IpAddr};

/// Identifies an endpoint group within its tenant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupRef {
    /// The network the group lives in.
    pub network: String,

    /// The group's name, unique within the network.
    pub group: String,
}

/// L4 protocols a rule may constrain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

/// One side of a candidate flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// The tenant the endpoint belongs to.
    pub tenant: String,

    /// The network the endpoint is attached to.
    pub network: String,

    /// The endpoint's address on that network.
    pub addr: IpAddr,

    /// Endpoint groups the endpoint is currently a member of.
    pub groups: HashSet<GroupRef>,
}

/// A candidate flow to be classified.
///
/// The destination port is carried on the flow; source ports are ephemeral
/// and never constrained by policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flow {
    pub src: Endpoint,
    pub dst: Endpoint,
    pub protocol: Protocol,
    pub port: u16,
}

// === impl GroupRef ===

impl GroupRef {
    pub fn new(network: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.network, self.group)
    }
}

// === impl Protocol ===

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => "tcp".fmt(f),
            Self::Udp => "udp".fmt(f),
            Self::Icmp => "icmp".fmt(f),
        }
    }
}

// === impl Endpoint ===

impl Endpoint {
    /// Whether the endpoint is currently a member of the referenced group.
    pub fn in_group(&self, group: &GroupRef) -> bool {
        self.groups.contains(group)
    }
}
