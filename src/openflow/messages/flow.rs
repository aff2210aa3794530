//! Flow table messages and the two match formats

use crate::openflow::fields::{
    FlowModCommand, FlowModFlags, FlowRemovedReason, PacketInReason, WildcardsV10,
};
use crate::openflow::messages::action::{Action, Instruction};
use crate::openflow::messages::oxm::{MacAddr, MatchEntry};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// The fixed 40 byte match of OpenFlow 1.0.
///
/// Every field is always present on the wire, the wildcards only tell
/// which of them are ignored when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchV10 {
    pub wildcards: WildcardsV10,
    pub in_port: u16,
    pub dl_src: MacAddr,
    pub dl_dst: MacAddr,
    pub dl_vlan: u16,
    pub dl_vlan_pcp: u8,
    pub dl_type: u16,
    pub nw_tos: u8,
    pub nw_proto: u8,
    pub nw_src: Ipv4Addr,
    pub nw_dst: Ipv4Addr,
    pub tp_src: u16,
    pub tp_dst: u16,
}

impl Default for MatchV10 {
    fn default() -> MatchV10 {
        MatchV10 {
            wildcards: WildcardsV10::default(),
            in_port: 0,
            dl_src: [0; 6],
            dl_dst: [0; 6],
            dl_vlan: 0,
            dl_vlan_pcp: 0,
            dl_type: 0,
            nw_tos: 0,
            nw_proto: 0,
            nw_src: Ipv4Addr::UNSPECIFIED,
            nw_dst: Ipv4Addr::UNSPECIFIED,
            tp_src: 0,
            tp_dst: 0,
        }
    }
}

fn network(addr: Ipv4Addr, prefix: u8) -> Option<Ipv4Network> {
    Ipv4Network::new(addr, prefix).ok()
}

impl MatchV10 {
    /// The matched IPv4 source network, `None` for an invalid prefix
    pub fn nw_src_network(&self) -> Option<Ipv4Network> {
        network(self.nw_src, self.wildcards.nw_src_prefix)
    }

    /// The matched IPv4 destination network
    pub fn nw_dst_network(&self) -> Option<Ipv4Network> {
        network(self.nw_dst, self.wildcards.nw_dst_prefix)
    }
}

/// A match in the format of the message's version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    V10(MatchV10),
    Oxm(Vec<MatchEntry>),
}

impl Default for Match {
    fn default() -> Match {
        Match::Oxm(vec![])
    }
}

/// Modifies a flow table.
///
/// `actions` is only used by 1.0, `instructions` and the table fields
/// only by 1.3 and later. `importance` exists since 1.4.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowMod {
    pub cookie: u64,
    pub cookie_mask: u64,
    pub table_id: u8,
    pub command: FlowModCommand,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub priority: u16,
    pub buffer_id: u32,
    pub out_port: u32,
    pub out_group: u32,
    pub flags: FlowModFlags,
    pub importance: u16,
    pub matches: Match,
    pub instructions: Vec<Instruction>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowRemoved {
    pub cookie: u64,
    pub priority: u16,
    pub reason: FlowRemovedReason,
    /// 1.3+
    pub table_id: u8,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub idle_timeout: u16,
    /// 1.3+
    pub hard_timeout: u16,
    pub packet_count: u64,
    pub byte_count: u64,
    pub matches: Match,
}

/// A packet sent to the controller. 1.0 reports the ingress port
/// directly, later versions report it inside the OXM match.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketIn {
    pub buffer_id: u32,
    pub total_len: u16,
    pub reason: PacketInReason,
    /// 1.3+
    pub table_id: u8,
    /// 1.3+
    pub cookie: u64,
    /// 1.0 only
    pub in_port: u16,
    /// 1.3+
    pub matches: Vec<MatchEntry>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacketOut {
    pub buffer_id: u32,
    pub in_port: u32,
    pub actions: Vec<Action>,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v10_networks() {
        let mut m = MatchV10::default();
        m.nw_src = Ipv4Addr::new(10, 1, 2, 3);
        m.wildcards.nw_src_prefix = 16;
        let net = m.nw_src_network().unwrap();
        assert_eq!(16, net.prefix());
        assert_eq!(Ipv4Addr::new(10, 1, 0, 0), net.network());
        assert_eq!(32, m.nw_dst_network().unwrap().prefix());
        m.wildcards.nw_dst_prefix = 40;
        assert_eq!(None, m.nw_dst_network());
    }
}
