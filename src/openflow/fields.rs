/*!
Decoders for fixed-width enumerations and bitmaps

Bit positions differ between OpenFlow 1.0 and 1.3+, so every flag struct
is decoded against a `Version`. Bits that have no meaning in a version
are ignored in both directions.
*/

use crate::openflow::version::Version;

/// Defines a closed wire enumeration with an `Other` variant for
/// values this codec does not know.
macro_rules! wire_enum {
    ($(#[$meta:meta])* pub enum $name:ident: $raw:ty { $($variant:ident = $val:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other($raw),
        }

        impl $name {
            pub fn from_raw(raw: $raw) -> $name {
                match raw {
                    $($val => $name::$variant,)+
                    other => $name::Other(other),
                }
            }

            pub fn raw(self) -> $raw {
                match self {
                    $($name::$variant => $val,)+
                    $name::Other(raw) => raw,
                }
            }
        }
    };
}

wire_enum! {
    pub enum FlowModCommand: u16 {
        Add = 0,
        Modify = 1,
        ModifyStrict = 2,
        Delete = 3,
        DeleteStrict = 4,
    }
}

wire_enum! {
    pub enum PacketInReason: u8 {
        NoMatch = 0,
        Action = 1,
        InvalidTtl = 2,
        ActionSet = 3,
        Group = 4,
        PacketOut = 5,
    }
}

wire_enum! {
    pub enum FlowRemovedReason: u8 {
        IdleTimeout = 0,
        HardTimeout = 1,
        Delete = 2,
        GroupDelete = 3,
        MeterDelete = 4,
        Eviction = 5,
    }
}

wire_enum! {
    pub enum PortReason: u8 {
        Add = 0,
        Delete = 1,
        Modify = 2,
    }
}

wire_enum! {
    pub enum GroupModCommand: u16 {
        Add = 0,
        Modify = 1,
        Delete = 2,
    }
}

wire_enum! {
    pub enum GroupType: u8 {
        All = 0,
        Select = 1,
        Indirect = 2,
        FastFailover = 3,
    }
}

wire_enum! {
    pub enum MeterModCommand: u16 {
        Add = 0,
        Modify = 1,
        Delete = 2,
    }
}

wire_enum! {
    /// Role of a controller towards a switch
    pub enum ControllerRole: u32 {
        NoChange = 0,
        Equal = 1,
        Master = 2,
        Slave = 3,
    }
}

/// A struct of named booleans backed by a version dependent bitmap.
///
/// Implementors only list which bit maps to which field; the provided
/// methods do the conversion.
pub trait VersionedFlags: Clone + Default {
    /// The bit position of every field that exists in `version`
    fn layout(&mut self, version: Version) -> Vec<(u32, &mut bool)>;

    fn from_raw(raw: u32, version: Version) -> Self {
        let mut flags = Self::default();
        for (bit, flag) in flags.layout(version) {
            *flag = raw & (1 << bit) != 0;
        }
        flags
    }

    fn to_raw(&self, version: Version) -> u32 {
        let mut copy = self.clone();
        let layout = copy.layout(version);
        layout
            .into_iter()
            .filter(|&(_, ref flag)| **flag)
            .fold(0, |acc, (bit, _)| acc | 1 << bit)
    }
}

/// Switch capabilities from the features reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub flow_stats: bool,
    pub table_stats: bool,
    pub port_stats: bool,
    /// 1.3+
    pub group_stats: bool,
    /// 1.0 only
    pub stp: bool,
    pub ip_reasm: bool,
    pub queue_stats: bool,
    /// 1.0 only
    pub arp_match_ip: bool,
    /// 1.3+
    pub port_blocked: bool,
}

impl VersionedFlags for Capabilities {
    fn layout(&mut self, version: Version) -> Vec<(u32, &mut bool)> {
        match version {
            Version::V1_0 => vec![
                (0, &mut self.flow_stats),
                (1, &mut self.table_stats),
                (2, &mut self.port_stats),
                (3, &mut self.stp),
                (5, &mut self.ip_reasm),
                (6, &mut self.queue_stats),
                (7, &mut self.arp_match_ip),
            ],
            _ => vec![
                (0, &mut self.flow_stats),
                (1, &mut self.table_stats),
                (2, &mut self.port_stats),
                (3, &mut self.group_stats),
                (5, &mut self.ip_reasm),
                (6, &mut self.queue_stats),
                (8, &mut self.port_blocked),
            ],
        }
    }
}

/// Administrative port settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortConfig {
    pub port_down: bool,
    /// 1.0 only
    pub no_stp: bool,
    pub no_recv: bool,
    /// 1.0 only
    pub no_recv_stp: bool,
    /// 1.0 only
    pub no_flood: bool,
    pub no_fwd: bool,
    pub no_packet_in: bool,
}

impl VersionedFlags for PortConfig {
    fn layout(&mut self, version: Version) -> Vec<(u32, &mut bool)> {
        match version {
            Version::V1_0 => vec![
                (0, &mut self.port_down),
                (1, &mut self.no_stp),
                (2, &mut self.no_recv),
                (3, &mut self.no_recv_stp),
                (4, &mut self.no_flood),
                (5, &mut self.no_fwd),
                (6, &mut self.no_packet_in),
            ],
            _ => vec![
                (0, &mut self.port_down),
                (2, &mut self.no_recv),
                (5, &mut self.no_fwd),
                (6, &mut self.no_packet_in),
            ],
        }
    }
}

/// Spanning tree state of a 1.0 port, bits 8 and 9 of the port state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StpState {
    Listen,
    Learn,
    Forward,
    Block,
}

const STP_SHIFT: u32 = 8;

impl StpState {
    fn from_raw(raw: u32) -> StpState {
        match (raw >> STP_SHIFT) & 0x3 {
            0 => StpState::Listen,
            1 => StpState::Learn,
            2 => StpState::Forward,
            _ => StpState::Block,
        }
    }

    fn raw(self) -> u32 {
        let value = match self {
            StpState::Listen => 0,
            StpState::Learn => 1,
            StpState::Forward => 2,
            StpState::Block => 3,
        };
        value << STP_SHIFT
    }
}

/// Current port state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortState {
    pub link_down: bool,
    /// 1.3+
    pub blocked: bool,
    /// 1.3+
    pub live: bool,
    /// Only present in 1.0
    pub stp: Option<StpState>,
}

impl VersionedFlags for PortState {
    fn layout(&mut self, version: Version) -> Vec<(u32, &mut bool)> {
        match version {
            Version::V1_0 => vec![(0, &mut self.link_down)],
            _ => vec![
                (0, &mut self.link_down),
                (1, &mut self.blocked),
                (2, &mut self.live),
            ],
        }
    }

    fn from_raw(raw: u32, version: Version) -> Self {
        let mut state = PortState::default();
        for (bit, flag) in state.layout(version) {
            *flag = raw & (1 << bit) != 0;
        }
        if version == Version::V1_0 {
            state.stp = Some(StpState::from_raw(raw));
        }
        state
    }

    fn to_raw(&self, version: Version) -> u32 {
        let mut copy = *self;
        let mut raw = copy
            .layout(version)
            .into_iter()
            .filter(|&(_, ref flag)| **flag)
            .fold(0, |acc, (bit, _)| acc | 1 << bit);
        if version == Version::V1_0 {
            raw |= self.stp.map(StpState::raw).unwrap_or(0);
        }
        raw
    }
}

/// Port speed and medium features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortFeatures {
    pub hd_10mb: bool,
    pub fd_10mb: bool,
    pub hd_100mb: bool,
    pub fd_100mb: bool,
    pub hd_1gb: bool,
    pub fd_1gb: bool,
    pub fd_10gb: bool,
    pub fd_40gb: bool,
    pub fd_100gb: bool,
    pub fd_1tb: bool,
    pub other: bool,
    pub copper: bool,
    pub fiber: bool,
    pub autoneg: bool,
    pub pause: bool,
    pub pause_asym: bool,
}

impl VersionedFlags for PortFeatures {
    fn layout(&mut self, version: Version) -> Vec<(u32, &mut bool)> {
        let mut layout = vec![
            (0, &mut self.hd_10mb),
            (1, &mut self.fd_10mb),
            (2, &mut self.hd_100mb),
            (3, &mut self.fd_100mb),
            (4, &mut self.hd_1gb),
            (5, &mut self.fd_1gb),
            (6, &mut self.fd_10gb),
        ];
        match version {
            Version::V1_0 => layout.extend(vec![
                (7, &mut self.copper),
                (8, &mut self.fiber),
                (9, &mut self.autoneg),
                (10, &mut self.pause),
                (11, &mut self.pause_asym),
            ]),
            _ => layout.extend(vec![
                (7, &mut self.fd_40gb),
                (8, &mut self.fd_100gb),
                (9, &mut self.fd_1tb),
                (10, &mut self.other),
                (11, &mut self.copper),
                (12, &mut self.fiber),
                (13, &mut self.autoneg),
                (14, &mut self.pause),
                (15, &mut self.pause_asym),
            ]),
        }
        layout
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowModFlags {
    pub send_flow_rem: bool,
    pub check_overlap: bool,
    /// 1.0 only
    pub emergency: bool,
    /// 1.3+
    pub reset_counts: bool,
    /// 1.3+
    pub no_packet_counts: bool,
    /// 1.3+
    pub no_byte_counts: bool,
}

impl VersionedFlags for FlowModFlags {
    fn layout(&mut self, version: Version) -> Vec<(u32, &mut bool)> {
        match version {
            Version::V1_0 => vec![
                (0, &mut self.send_flow_rem),
                (1, &mut self.check_overlap),
                (2, &mut self.emergency),
            ],
            _ => vec![
                (0, &mut self.send_flow_rem),
                (1, &mut self.check_overlap),
                (2, &mut self.reset_counts),
                (3, &mut self.no_packet_counts),
                (4, &mut self.no_byte_counts),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeterFlags {
    pub kbps: bool,
    pub pktps: bool,
    pub burst: bool,
    pub stats: bool,
}

impl VersionedFlags for MeterFlags {
    fn layout(&mut self, _version: Version) -> Vec<(u32, &mut bool)> {
        vec![
            (0, &mut self.kbps),
            (1, &mut self.pktps),
            (2, &mut self.burst),
            (3, &mut self.stats),
        ]
    }
}

const NW_SRC_SHIFT: u32 = 8;
const NW_DST_SHIFT: u32 = 14;
const NW_BITS_MASK: u32 = 0x3f;

/// The wildcard word of the 1.0 match. The IPv4 source and destination
/// wildcards are 6 bit counts of ignored low-order address bits and are
/// kept here as prefix lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildcardsV10 {
    pub in_port: bool,
    pub dl_vlan: bool,
    pub dl_src: bool,
    pub dl_dst: bool,
    pub dl_type: bool,
    pub nw_proto: bool,
    pub tp_src: bool,
    pub tp_dst: bool,
    pub dl_vlan_pcp: bool,
    pub nw_tos: bool,
    pub nw_src_prefix: u8,
    pub nw_dst_prefix: u8,
}

impl Default for WildcardsV10 {
    fn default() -> WildcardsV10 {
        WildcardsV10 {
            in_port: false,
            dl_vlan: false,
            dl_src: false,
            dl_dst: false,
            dl_type: false,
            nw_proto: false,
            tp_src: false,
            tp_dst: false,
            dl_vlan_pcp: false,
            nw_tos: false,
            nw_src_prefix: 32,
            nw_dst_prefix: 32,
        }
    }
}

// Any count of 32 or more wildcards the whole address.
fn prefix_from_bits(raw: u32, shift: u32) -> u8 {
    let ignored = (raw >> shift) & NW_BITS_MASK;
    (32 - ignored.min(32)) as u8
}

fn bits_from_prefix(prefix: u8, shift: u32) -> u32 {
    (32 - u32::from(prefix.min(32))) << shift
}

impl WildcardsV10 {
    fn layout(&mut self) -> Vec<(u32, &mut bool)> {
        vec![
            (0, &mut self.in_port),
            (1, &mut self.dl_vlan),
            (2, &mut self.dl_src),
            (3, &mut self.dl_dst),
            (4, &mut self.dl_type),
            (5, &mut self.nw_proto),
            (6, &mut self.tp_src),
            (7, &mut self.tp_dst),
            (20, &mut self.dl_vlan_pcp),
            (21, &mut self.nw_tos),
        ]
    }

    pub fn from_raw(raw: u32) -> WildcardsV10 {
        let mut wildcards = WildcardsV10::default();
        for (bit, flag) in wildcards.layout() {
            *flag = raw & (1 << bit) != 0;
        }
        wildcards.nw_src_prefix = prefix_from_bits(raw, NW_SRC_SHIFT);
        wildcards.nw_dst_prefix = prefix_from_bits(raw, NW_DST_SHIFT);
        wildcards
    }

    pub fn to_raw(&self) -> u32 {
        let mut copy = *self;
        let flags = copy
            .layout()
            .into_iter()
            .filter(|&(_, ref flag)| **flag)
            .fold(0, |acc, (bit, _)| acc | 1 << bit);
        flags
            | bits_from_prefix(self.nw_src_prefix, NW_SRC_SHIFT)
            | bits_from_prefix(self.nw_dst_prefix, NW_DST_SHIFT)
    }
}
