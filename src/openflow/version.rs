/*!
Protocol versions and the per-version message type numbering

Type numbers are not stable across OpenFlow versions, so every lookup
is keyed by the `Version` first. The tables below are the only place
where type codes are spelled out; both the registry bootstrap and the
encoder read them.
*/

use std::fmt;
use std::str::FromStr;

/// A supported OpenFlow wire version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    V1_0,
    V1_3,
    V1_4,
    V1_5,
}

impl Version {
    /// All supported versions, oldest first.
    pub const ALL: [Version; 4] = [Version::V1_0, Version::V1_3, Version::V1_4, Version::V1_5];

    /// The raw header version byte
    pub fn wire(self) -> u8 {
        match self {
            Version::V1_0 => 0x01,
            Version::V1_3 => 0x04,
            Version::V1_4 => 0x05,
            Version::V1_5 => 0x06,
        }
    }

    pub fn from_wire(raw: u8) -> Option<Version> {
        match raw {
            0x01 => Some(Version::V1_0),
            0x04 => Some(Version::V1_3),
            0x05 => Some(Version::V1_4),
            0x06 => Some(Version::V1_5),
            _ => None,
        }
    }

    /// True for the OXM based family (1.3 and later)
    pub fn is_oxm(self) -> bool {
        self != Version::V1_0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            Version::V1_0 => "1.0",
            Version::V1_3 => "1.3",
            Version::V1_4 => "1.4",
            Version::V1_5 => "1.5",
        };
        f.write_str(s)
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Version, Self::Err> {
        match s.trim() {
            "1.0" | "0x01" | "1" => Ok(Version::V1_0),
            "1.3" | "0x04" | "4" => Ok(Version::V1_3),
            "1.4" | "0x05" | "5" => Ok(Version::V1_4),
            "1.5" | "0x06" | "6" => Ok(Version::V1_5),
            other => Err(format!("unknown OpenFlow version '{}'", other)),
        }
    }
}

/// The logical kind of a top-level message, independent of its wire number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Hello,
    Error,
    EchoRequest,
    EchoReply,
    /// Vendor in OpenFlow 1.0
    Experimenter,
    FeaturesRequest,
    FeaturesReply,
    GetConfigRequest,
    GetConfigReply,
    SetConfig,
    PacketIn,
    FlowRemoved,
    PortStatus,
    PacketOut,
    FlowMod,
    GroupMod,
    PortMod,
    TableMod,
    /// Stats Request in OpenFlow 1.0
    MultipartRequest,
    /// Stats Reply in OpenFlow 1.0
    MultipartReply,
    BarrierRequest,
    BarrierReply,
    QueueGetConfigRequest,
    QueueGetConfigReply,
    RoleRequest,
    RoleReply,
    GetAsyncRequest,
    GetAsyncReply,
    SetAsync,
    MeterMod,
}

use self::MessageKind::*;

const OF10_TYPES: &[(u8, MessageKind)] = &[
    (0, Hello),
    (1, Error),
    (2, EchoRequest),
    (3, EchoReply),
    (4, Experimenter),
    (5, FeaturesRequest),
    (6, FeaturesReply),
    (7, GetConfigRequest),
    (8, GetConfigReply),
    (9, SetConfig),
    (10, PacketIn),
    (11, FlowRemoved),
    (12, PortStatus),
    (13, PacketOut),
    (14, FlowMod),
    (15, PortMod),
    (16, MultipartRequest),
    (17, MultipartReply),
    (18, BarrierRequest),
    (19, BarrierReply),
    (20, QueueGetConfigRequest),
    (21, QueueGetConfigReply),
];

const OF13_TYPES: &[(u8, MessageKind)] = &[
    (0, Hello),
    (1, Error),
    (2, EchoRequest),
    (3, EchoReply),
    (4, Experimenter),
    (5, FeaturesRequest),
    (6, FeaturesReply),
    (7, GetConfigRequest),
    (8, GetConfigReply),
    (9, SetConfig),
    (10, PacketIn),
    (11, FlowRemoved),
    (12, PortStatus),
    (13, PacketOut),
    (14, FlowMod),
    (15, GroupMod),
    (16, PortMod),
    (17, TableMod),
    (18, MultipartRequest),
    (19, MultipartReply),
    (20, BarrierRequest),
    (21, BarrierReply),
    (22, QueueGetConfigRequest),
    (23, QueueGetConfigReply),
    (24, RoleRequest),
    (25, RoleReply),
    (26, GetAsyncRequest),
    (27, GetAsyncReply),
    (28, SetAsync),
    (29, MeterMod),
];

// Only the types whose body layout did not change since 1.3.
const OF14_TYPES: &[(u8, MessageKind)] = &[
    (0, Hello),
    (1, Error),
    (2, EchoRequest),
    (3, EchoReply),
    (4, Experimenter),
    (5, FeaturesRequest),
    (6, FeaturesReply),
    (7, GetConfigRequest),
    (8, GetConfigReply),
    (9, SetConfig),
    (10, PacketIn),
    (11, FlowRemoved),
    (13, PacketOut),
    (14, FlowMod),
    (15, GroupMod),
    (18, MultipartRequest),
    (19, MultipartReply),
    (20, BarrierRequest),
    (21, BarrierReply),
    (24, RoleRequest),
    (25, RoleReply),
    (26, GetAsyncRequest),
    (29, MeterMod),
];

const OF15_TYPES: &[(u8, MessageKind)] = &[
    (0, Hello),
    (1, Error),
    (2, EchoRequest),
    (3, EchoReply),
    (4, Experimenter),
    (5, FeaturesRequest),
    (6, FeaturesReply),
    (7, GetConfigRequest),
    (8, GetConfigReply),
    (9, SetConfig),
    (10, PacketIn),
    (14, FlowMod),
    (18, MultipartRequest),
    (19, MultipartReply),
    (20, BarrierRequest),
    (21, BarrierReply),
    (24, RoleRequest),
    (25, RoleReply),
    (26, GetAsyncRequest),
    (29, MeterMod),
];

/// The message types defined (and supported) for `version`.
pub fn message_types(version: Version) -> &'static [(u8, MessageKind)] {
    match version {
        Version::V1_0 => OF10_TYPES,
        Version::V1_3 => OF13_TYPES,
        Version::V1_4 => OF14_TYPES,
        Version::V1_5 => OF15_TYPES,
    }
}

/// Looks up the wire type code of `kind` in `version`.
pub fn type_code(version: Version, kind: MessageKind) -> Option<u8> {
    message_types(version)
        .iter()
        .find(|&&(_, k)| k == kind)
        .map(|&(code, _)| code)
}
