#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod evaluate;
mod flow;
mod network_match;
mod rule;

pub use self::{
    evaluate::{evaluate, Verdict},
    flow::{Endpoint, Flow, GroupRef, Protocol},
    network_match::NetworkMatch,
    rule::{Direction, PeerMatch, Rule, RuleAction},
};
pub use ipnet::{IpNet, Ipv4Net, Ipv6Net};

pub const POLICY_CONTROLLER_NAME: &str = "fabric.io/policy-controller";
