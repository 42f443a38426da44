//! The control-plane leadership record.
//!
//! Each control-plane replica registers itself in a shared key-value
//! namespace; exactly one holds the `leader` role at a time. The policy model
//! only consumes this record: leadership changes must never alter the outcome
//! of rule evaluation for unchanged policy state.

/// Key prefix under which replicas register.
pub const LEADER_KEY_BASE: &str = "/contiv.io/service/netmaster";

/// The `Role` value of the active leader. Any other value is a follower.
pub const ROLE_LEADER: &str = "leader";

/// A replica's registration, as stored in the key-value namespace.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct LeaderRecord {
    #[serde(rename = "Role")]
    pub role: String,

    #[serde(rename = "HostAddr")]
    pub host_addr: String,
}

/// Builds the registration key for a replica: `{base}/{host}:{port}`.
pub fn leader_key(host: &str, port: u16) -> String {
    format!("{}/{}:{}", LEADER_KEY_BASE, host, port)
}

// === impl LeaderRecord ===

impl LeaderRecord {
    pub fn is_leader(&self) -> bool {
        self.role == ROLE_LEADER
    }
}
