/*!
OpenFlow Extensible Match entries

An entry is identified by its class and field. All fields of the
OpenFlow basic class get a typed value, entries of any other class keep
their raw payload.
*/

use std::net::{Ipv4Addr, Ipv6Addr};

/// An Ethernet hardware address
pub type MacAddr = [u8; 6];

/// The OXM class of the OpenFlow basic fields
pub const OXM_CLASS_OPENFLOW_BASIC: u16 = 0x8000;
/// The OXM class of experimenter fields, followed by an experimenter id
pub const OXM_CLASS_EXPERIMENTER: u16 = 0xffff;

/// The VLAN_VID bit that marks a tagged packet
pub const VLAN_PRESENT: u16 = 0x1000;

/// A match value with an optional bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Masked<T> {
    pub value: T,
    pub mask: Option<T>,
}

impl<T> Masked<T> {
    pub fn exact(value: T) -> Masked<T> {
        Masked { value, mask: None }
    }

    pub fn with_mask(value: T, mask: T) -> Masked<T> {
        Masked {
            value,
            mask: Some(mask),
        }
    }
}

/// A typed OpenFlow basic match field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OxmField {
    InPort(u32),
    InPhyPort(u32),
    Metadata(Masked<u64>),
    EthDst(Masked<MacAddr>),
    EthSrc(Masked<MacAddr>),
    EthType(u16),
    VlanVid {
        vid: u16,
        /// The CFI bit, set for any tagged packet
        present: bool,
        mask: Option<u16>,
    },
    VlanPcp(u8),
    IpDscp(u8),
    IpEcn(u8),
    IpProto(u8),
    Ipv4Src(Masked<Ipv4Addr>),
    Ipv4Dst(Masked<Ipv4Addr>),
    TcpSrc(u16),
    TcpDst(u16),
    UdpSrc(u16),
    UdpDst(u16),
    SctpSrc(u16),
    SctpDst(u16),
    Icmpv4Type(u8),
    Icmpv4Code(u8),
    ArpOp(u16),
    ArpSpa(Masked<Ipv4Addr>),
    ArpTpa(Masked<Ipv4Addr>),
    ArpSha(Masked<MacAddr>),
    ArpTha(Masked<MacAddr>),
    Ipv6Src(Masked<Ipv6Addr>),
    Ipv6Dst(Masked<Ipv6Addr>),
    Ipv6Flabel(Masked<u32>),
    Icmpv6Type(u8),
    Icmpv6Code(u8),
    Ipv6NdTarget(Ipv6Addr),
    Ipv6NdSll(MacAddr),
    Ipv6NdTll(MacAddr),
    MplsLabel(u32),
    MplsTc(u8),
    MplsBos(u8),
    /// A 24 bit service instance id
    PbbIsid(Masked<u32>),
    TunnelId(Masked<u64>),
    Ipv6Exthdr(Masked<u16>),
    PbbUca(u8),
    TcpFlags(Masked<u16>),
    ActsetOutput(u32),
    PacketType { namespace: u16, ns_type: u16 },
}

impl OxmField {
    /// The field number within the OpenFlow basic class
    pub fn code(&self) -> u8 {
        use self::OxmField::*;
        match *self {
            InPort(_) => 0,
            InPhyPort(_) => 1,
            Metadata(_) => 2,
            EthDst(_) => 3,
            EthSrc(_) => 4,
            EthType(_) => 5,
            VlanVid { .. } => 6,
            VlanPcp(_) => 7,
            IpDscp(_) => 8,
            IpEcn(_) => 9,
            IpProto(_) => 10,
            Ipv4Src(_) => 11,
            Ipv4Dst(_) => 12,
            TcpSrc(_) => 13,
            TcpDst(_) => 14,
            UdpSrc(_) => 15,
            UdpDst(_) => 16,
            SctpSrc(_) => 17,
            SctpDst(_) => 18,
            Icmpv4Type(_) => 19,
            Icmpv4Code(_) => 20,
            ArpOp(_) => 21,
            ArpSpa(_) => 22,
            ArpTpa(_) => 23,
            ArpSha(_) => 24,
            ArpTha(_) => 25,
            Ipv6Src(_) => 26,
            Ipv6Dst(_) => 27,
            Ipv6Flabel(_) => 28,
            Icmpv6Type(_) => 29,
            Icmpv6Code(_) => 30,
            Ipv6NdTarget(_) => 31,
            Ipv6NdSll(_) => 32,
            Ipv6NdTll(_) => 33,
            MplsLabel(_) => 34,
            MplsTc(_) => 35,
            MplsBos(_) => 36,
            PbbIsid(_) => 37,
            TunnelId(_) => 38,
            Ipv6Exthdr(_) => 39,
            PbbUca(_) => 40,
            TcpFlags(_) => 41,
            ActsetOutput(_) => 42,
            PacketType { .. } => 44,
        }
    }

    /// True if the entry carries a mask after its value
    pub fn has_mask(&self) -> bool {
        use self::OxmField::*;
        match *self {
            Metadata(ref m) | TunnelId(ref m) => m.mask.is_some(),
            EthDst(ref m) | EthSrc(ref m) | ArpSha(ref m) | ArpTha(ref m) => m.mask.is_some(),
            Ipv4Src(ref m) | Ipv4Dst(ref m) | ArpSpa(ref m) | ArpTpa(ref m) => m.mask.is_some(),
            Ipv6Src(ref m) | Ipv6Dst(ref m) => m.mask.is_some(),
            Ipv6Flabel(ref m) | PbbIsid(ref m) => m.mask.is_some(),
            Ipv6Exthdr(ref m) | TcpFlags(ref m) => m.mask.is_some(),
            VlanVid { mask, .. } => mask.is_some(),
            _ => false,
        }
    }
}

/// One entry of an OXM match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEntry {
    Basic(OxmField),
    Experimenter {
        experimenter: u32,
        field: u8,
        has_mask: bool,
        data: Vec<u8>,
    },
    /// Any other class, or a basic field that could not be typed
    Opaque {
        class: u16,
        field: u8,
        has_mask: bool,
        data: Vec<u8>,
    },
}

/// An OXM header without a value, as listed by table features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OxmId {
    pub class: u16,
    pub field: u8,
    pub has_mask: bool,
    pub length: u8,
    /// Only for the experimenter class
    pub experimenter: Option<u32>,
}
