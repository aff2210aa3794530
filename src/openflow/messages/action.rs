/*!
Actions and instructions

Both families share one action type. Variants that exist only in one
family are rejected by the encoder of the other one.
*/

use crate::openflow::messages::experimenter::ExperimenterBody;
use crate::openflow::messages::oxm::{MacAddr, MatchEntry};
use std::net::Ipv4Addr;

pub const ACTION_EXPERIMENTER: u16 = 0xffff;
pub const INSTRUCTION_EXPERIMENTER: u16 = 0xffff;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The port is 16 bit wide in 1.0
    Output { port: u32, max_len: u16 },
    CopyTtlOut,
    CopyTtlIn,
    SetMplsTtl(u8),
    DecMplsTtl,
    PushVlan(u16),
    PopVlan,
    PushMpls(u16),
    PopMpls(u16),
    SetQueue(u32),
    Group(u32),
    SetNwTtl(u8),
    DecNwTtl,
    SetField(MatchEntry),
    PushPbb(u16),
    PopPbb,
    /// 1.5 only
    Meter(u32),
    // 1.0 only
    SetVlanVid(u16),
    SetVlanPcp(u8),
    StripVlan,
    SetDlSrc(MacAddr),
    SetDlDst(MacAddr),
    SetNwSrc(Ipv4Addr),
    SetNwDst(Ipv4Addr),
    SetNwTos(u8),
    SetTpSrc(u16),
    SetTpDst(u16),
    Enqueue { port: u16, queue_id: u32 },
    /// Vendor action in 1.0
    Experimenter {
        experimenter: u32,
        body: ExperimenterBody,
    },
    /// An action type this codec does not know
    Opaque { typ: u16, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    GotoTable(u8),
    WriteMetadata { metadata: u64, mask: u64 },
    WriteActions(Vec<Action>),
    ApplyActions(Vec<Action>),
    ClearActions,
    Meter(u32),
    Experimenter {
        experimenter: u32,
        body: ExperimenterBody,
    },
    Opaque { typ: u16, data: Vec<u8> },
}

/// An action or instruction header without a body, as listed by table
/// features properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvId {
    pub typ: u16,
    /// Only for experimenter ids
    pub experimenter: Option<u32>,
}
