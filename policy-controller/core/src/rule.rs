use crate::{
    flow::{Endpoint, GroupRef, Protocol},
    network_match::NetworkMatch,
};
use std::fmt;

/// Whether a matching rule admits or refuses the flow.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuleAction {
    Allow,
    Deny,
}

/// Which side of a connection a rule constrains.
///
/// `In` rules apply to traffic arriving at an endpoint and select on the
/// flow's source; `Out` rules apply to traffic leaving an endpoint and select
/// on the flow's destination. A `both` rule in the wire model is normalized
/// into one instance of each before it reaches the evaluator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

/// Match criterion applied to the peer endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerMatch {
    /// Matches any peer.
    Any,

    /// Matches peers that are members of the referenced endpoint group.
    Group(GroupRef),

    /// Matches peers attached to the named network.
    Network(String),

    /// Matches peers whose address falls within the given range.
    Addr(NetworkMatch),
}

/// A single ACL entry, fully resolved for evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub direction: Direction,
    pub action: RuleAction,

    /// Higher priorities win; equal-priority conflicts resolve to deny.
    pub priority: u32,

    /// Constrained protocol; `None` matches any.
    pub protocol: Option<Protocol>,

    /// Constrained destination port; zero matches any.
    pub port: u16,

    /// Selector for the peer endpoint.
    pub peer: PeerMatch,
}

// === impl PeerMatch ===

impl PeerMatch {
    pub fn matches(&self, peer: &Endpoint) -> bool {
        match self {
            Self::Any => true,
            Self::Group(group) => peer.in_group(group),
            Self::Network(network) => peer.network == *network,
            Self::Addr(range) => range.matches(peer.addr),
        }
    }
}

impl Default for PeerMatch {
    fn default() -> Self {
        Self::Any
    }
}

// === impl RuleAction ===

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => "allow".fmt(f),
            Self::Deny => "deny".fmt(f),
        }
    }
}

// === impl Direction ===

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => "in".fmt(f),
            Self::Out => "out".fmt(f),
        }
    }
}
