// Switch state records
//
// Immutable snapshots produced by one parse of one page. Label fields use
// the enums from `labels`, which serialize as the web UI's own text.

use serde::{Deserialize, Serialize};

use crate::labels::{CableStatus, FlowControl, LinkStatus, PortSpeed};

/// Number of wire pairs in a twisted-pair cable.
pub const CABLE_PAIRS: usize = 4;

/// One row of the port settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    /// 1-based port number.
    pub port: u32,
    pub enabled: bool,
    pub configured_speed: PortSpeed,
    pub actual_speed: PortSpeed,
    pub configured_flow_control: FlowControl,
    pub actual_flow_control: FlowControl,
    /// LAG / trunk group id; 0 when the port is not aggregated.
    pub lag_group: i64,
}

impl PortInfo {
    /// "Enabled" / "Disabled", as the web UI shows it.
    pub fn state_label(&self) -> &'static str {
        state_label(self.enabled)
    }
}

/// One row of the port statistics page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatistics {
    pub port: u32,
    pub enabled: bool,
    pub link_status: LinkStatus,
    pub tx_good_packets: u64,
    pub tx_bad_packets: u64,
    pub rx_good_packets: u64,
    pub rx_bad_packets: u64,
}

impl PortStatistics {
    pub fn state_label(&self) -> &'static str {
        state_label(self.enabled)
    }
}

fn state_label(enabled: bool) -> &'static str {
    if enabled { "Enabled" } else { "Disabled" }
}

/// One 802.1Q VLAN.
///
/// `member_ports` is always the ascending union of `tagged_ports` and
/// `untagged_ports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanInfo {
    pub vlan_id: u16,
    pub name: String,
    pub tagged_ports: Vec<u32>,
    pub untagged_ports: Vec<u32>,
    pub member_ports: Vec<u32>,
}

/// How a port participates in a VLAN when creating or modifying it.
///
/// The discriminant is the `selType_<port>` code the switch expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VlanMembership {
    Untagged = 0,
    Tagged = 1,
    #[default]
    NotMember = 2,
}

impl VlanMembership {
    pub fn code(self) -> u8 {
        match self {
            Self::Untagged => 0,
            Self::Tagged => 1,
            Self::NotMember => 2,
        }
    }
}

/// Cable diagnostic result for one tested port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableTestResult {
    pub port: u32,
    pub status: CableStatus,
    /// The switch reports one aggregate verdict, so all four pairs repeat it.
    pub pairs: [CablePairResult; CABLE_PAIRS],
    /// Cable length in metres, never negative.
    pub cable_length: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CablePairResult {
    /// 1 through 4.
    pub pair: u8,
    pub status: CableStatus,
    pub length: u32,
}
