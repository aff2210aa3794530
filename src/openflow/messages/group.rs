//! Groups, meters and queues

use crate::openflow::fields::{GroupModCommand, GroupType, MeterFlags, MeterModCommand};
use crate::openflow::messages::action::Action;
use crate::openflow::messages::experimenter::ExperimenterBody;

pub const METER_BAND_DROP: u16 = 1;
pub const METER_BAND_DSCP_REMARK: u16 = 2;
pub const METER_BAND_EXPERIMENTER: u16 = 0xffff;

pub const QUEUE_PROP_MIN_RATE: u16 = 1;
pub const QUEUE_PROP_MAX_RATE: u16 = 2;
pub const QUEUE_PROP_EXPERIMENTER: u16 = 0xffff;

/// An action bucket of a group
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub weight: u16,
    pub watch_port: u32,
    pub watch_group: u32,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMod {
    pub command: GroupModCommand,
    pub group_type: GroupType,
    pub group_id: u32,
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeterBand {
    Drop {
        rate: u32,
        burst_size: u32,
    },
    DscpRemark {
        rate: u32,
        burst_size: u32,
        prec_level: u8,
    },
    Experimenter {
        rate: u32,
        burst_size: u32,
        experimenter: u32,
        body: ExperimenterBody,
    },
    /// A band type this codec does not know, `data` follows the burst size
    Opaque {
        typ: u16,
        rate: u32,
        burst_size: u32,
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeterMod {
    pub command: MeterModCommand,
    pub flags: MeterFlags,
    pub meter_id: u32,
    pub bands: Vec<MeterBand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueProperty {
    /// Rate in 1/10 of a percent
    MinRate(u16),
    /// 1.3+
    MaxRate(u16),
    Experimenter {
        experimenter: u32,
        body: ExperimenterBody,
    },
    Opaque { typ: u16, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacketQueue {
    pub queue_id: u32,
    /// 1.3+
    pub port: u32,
    pub properties: Vec<QueueProperty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueGetConfigRequest {
    pub port: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueGetConfigReply {
    pub port: u32,
    pub queues: Vec<PacketQueue>,
}
