/*!
Multipart (stats in 1.0) requests and replies

Reply bodies of the list kinds hold one entry per record found in the
message; their count follows from the message length alone.
*/

use crate::openflow::fields::{FlowModFlags, GroupType, MeterFlags, WildcardsV10};
use crate::openflow::messages::action::{Action, Instruction, TlvId};
use crate::openflow::messages::experimenter::ExperimenterBody;
use crate::openflow::messages::flow::Match;
use crate::openflow::messages::group::{Bucket, MeterBand};
use crate::openflow::messages::oxm::OxmId;
use crate::openflow::messages::switch::Port;

pub const MULTIPART_DESC: u16 = 0;
pub const MULTIPART_FLOW: u16 = 1;
pub const MULTIPART_AGGREGATE: u16 = 2;
pub const MULTIPART_TABLE: u16 = 3;
pub const MULTIPART_PORT_STATS: u16 = 4;
pub const MULTIPART_QUEUE: u16 = 5;
pub const MULTIPART_GROUP: u16 = 6;
pub const MULTIPART_GROUP_DESC: u16 = 7;
pub const MULTIPART_GROUP_FEATURES: u16 = 8;
pub const MULTIPART_METER: u16 = 9;
pub const MULTIPART_METER_CONFIG: u16 = 10;
pub const MULTIPART_METER_FEATURES: u16 = 11;
pub const MULTIPART_TABLE_FEATURES: u16 = 12;
pub const MULTIPART_PORT_DESC: u16 = 13;
pub const MULTIPART_EXPERIMENTER: u16 = 0xffff;

/// Body of a flow or aggregate stats request
#[derive(Debug, Clone, PartialEq)]
pub struct FlowStatsRequest {
    pub table_id: u8,
    pub out_port: u32,
    /// 1.3+
    pub out_group: u32,
    /// 1.3+
    pub cookie: u64,
    /// 1.3+
    pub cookie_mask: u64,
    pub matches: Match,
}

/// Experimenter multipart body, in both directions
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartExperimenter {
    pub experimenter: u32,
    /// Not present in 1.0
    pub exp_type: u32,
    pub body: ExperimenterBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultipartRequestBody {
    Desc,
    Flow(FlowStatsRequest),
    Aggregate(FlowStatsRequest),
    Table,
    PortStats { port_no: u32 },
    Queue { port_no: u32, queue_id: u32 },
    Group { group_id: u32 },
    GroupDesc,
    GroupFeatures,
    Meter { meter_id: u32 },
    MeterConfig { meter_id: u32 },
    MeterFeatures,
    TableFeatures(Vec<TableFeatures>),
    PortDesc,
    Experimenter(MultipartExperimenter),
    /// A body type that is not registered for the message's version
    Opaque { typ: u16, data: Vec<u8> },
}

impl MultipartRequestBody {
    /// The multipart type code of this body
    pub fn code(&self) -> u16 {
        use self::MultipartRequestBody::*;
        match *self {
            Desc => MULTIPART_DESC,
            Flow(_) => MULTIPART_FLOW,
            Aggregate(_) => MULTIPART_AGGREGATE,
            Table => MULTIPART_TABLE,
            PortStats { .. } => MULTIPART_PORT_STATS,
            Queue { .. } => MULTIPART_QUEUE,
            Group { .. } => MULTIPART_GROUP,
            GroupDesc => MULTIPART_GROUP_DESC,
            GroupFeatures => MULTIPART_GROUP_FEATURES,
            Meter { .. } => MULTIPART_METER,
            MeterConfig { .. } => MULTIPART_METER_CONFIG,
            MeterFeatures => MULTIPART_METER_FEATURES,
            TableFeatures(_) => MULTIPART_TABLE_FEATURES,
            PortDesc => MULTIPART_PORT_DESC,
            Experimenter(_) => MULTIPART_EXPERIMENTER,
            Opaque { typ, .. } => typ,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartRequest {
    pub more: bool,
    pub body: MultipartRequestBody,
}

/// Switch description strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Desc {
    pub mfr_desc: String,
    pub hw_desc: String,
    pub sw_desc: String,
    pub serial_num: String,
    pub dp_desc: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowStats {
    pub table_id: u8,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub priority: u16,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    /// 1.3+
    pub flags: FlowModFlags,
    /// 1.4+
    pub importance: u16,
    pub cookie: u64,
    pub packet_count: u64,
    pub byte_count: u64,
    pub matches: Match,
    /// 1.3+
    pub instructions: Vec<Instruction>,
    /// 1.0 only
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub table_id: u8,
    /// 1.0 only
    pub name: String,
    /// 1.0 only
    pub wildcards: WildcardsV10,
    /// 1.0 only
    pub max_entries: u32,
    pub active_count: u32,
    pub lookup_count: u64,
    pub matched_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortStats {
    pub port_no: u32,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_frame_err: u64,
    pub rx_over_err: u64,
    pub rx_crc_err: u64,
    pub collisions: u64,
    /// 1.3+
    pub duration_sec: u32,
    /// 1.3+
    pub duration_nsec: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub port_no: u32,
    pub queue_id: u32,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
    /// 1.3+
    pub duration_sec: u32,
    /// 1.3+
    pub duration_nsec: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounter {
    pub packet_count: u64,
    pub byte_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub group_id: u32,
    pub ref_count: u32,
    pub packet_count: u64,
    pub byte_count: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub bucket_stats: Vec<BucketCounter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDesc {
    pub group_type: GroupType,
    pub group_id: u32,
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupFeatures {
    pub types: u32,
    pub capabilities: u32,
    pub max_groups: [u32; 4],
    pub actions: [u32; 4],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeterBandStats {
    pub packet_band_count: u64,
    pub byte_band_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterStats {
    pub meter_id: u32,
    pub flow_count: u32,
    pub packet_in_count: u64,
    pub byte_in_count: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub band_stats: Vec<MeterBandStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeterConfig {
    pub flags: MeterFlags,
    pub meter_id: u32,
    pub bands: Vec<MeterBand>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeterFeatures {
    pub max_meter: u32,
    pub band_types: u32,
    pub capabilities: u32,
    pub max_bands: u8,
    pub max_color: u8,
}

pub const TFP_INSTRUCTIONS: u16 = 0;
pub const TFP_INSTRUCTIONS_MISS: u16 = 1;
pub const TFP_NEXT_TABLES: u16 = 2;
pub const TFP_NEXT_TABLES_MISS: u16 = 3;
pub const TFP_WRITE_ACTIONS: u16 = 4;
pub const TFP_WRITE_ACTIONS_MISS: u16 = 5;
pub const TFP_APPLY_ACTIONS: u16 = 6;
pub const TFP_APPLY_ACTIONS_MISS: u16 = 7;
pub const TFP_MATCH: u16 = 8;
pub const TFP_WILDCARDS: u16 = 10;
pub const TFP_WRITE_SETFIELD: u16 = 12;
pub const TFP_WRITE_SETFIELD_MISS: u16 = 13;
pub const TFP_APPLY_SETFIELD: u16 = 14;
pub const TFP_APPLY_SETFIELD_MISS: u16 = 15;
pub const TFP_EXPERIMENTER: u16 = 0xfffe;
pub const TFP_EXPERIMENTER_MISS: u16 = 0xffff;

/// A table features property. The `miss` variants describe the
/// table-miss flow entry.
#[derive(Debug, Clone, PartialEq)]
pub enum TableFeatureProperty {
    Instructions { miss: bool, ids: Vec<TlvId> },
    NextTables { miss: bool, tables: Vec<u8> },
    WriteActions { miss: bool, ids: Vec<TlvId> },
    ApplyActions { miss: bool, ids: Vec<TlvId> },
    Match(Vec<OxmId>),
    Wildcards(Vec<OxmId>),
    WriteSetfield { miss: bool, ids: Vec<OxmId> },
    ApplySetfield { miss: bool, ids: Vec<OxmId> },
    Experimenter {
        miss: bool,
        experimenter: u32,
        exp_type: u32,
        body: ExperimenterBody,
    },
    Opaque { typ: u16, data: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableFeatures {
    pub table_id: u8,
    /// 1.5+, how the switch applies this table description
    pub command: u8,
    /// 1.5+, the table capability bitmap
    pub features: u32,
    pub name: String,
    pub metadata_match: u64,
    pub metadata_write: u64,
    pub config: u32,
    pub max_entries: u32,
    pub properties: Vec<TableFeatureProperty>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultipartReplyBody {
    Desc(Desc),
    Flow(Vec<FlowStats>),
    Aggregate(AggregateStats),
    Table(Vec<TableStats>),
    PortStats(Vec<PortStats>),
    Queue(Vec<QueueStats>),
    Group(Vec<GroupStats>),
    GroupDesc(Vec<GroupDesc>),
    GroupFeatures(GroupFeatures),
    Meter(Vec<MeterStats>),
    MeterConfig(Vec<MeterConfig>),
    MeterFeatures(MeterFeatures),
    TableFeatures(Vec<TableFeatures>),
    PortDesc(Vec<Port>),
    Experimenter(MultipartExperimenter),
    /// A body type that is not registered for the message's version
    Opaque { typ: u16, data: Vec<u8> },
}

impl MultipartReplyBody {
    /// The multipart type code of this body
    pub fn code(&self) -> u16 {
        use self::MultipartReplyBody::*;
        match *self {
            Desc(_) => MULTIPART_DESC,
            Flow(_) => MULTIPART_FLOW,
            Aggregate(_) => MULTIPART_AGGREGATE,
            Table(_) => MULTIPART_TABLE,
            PortStats(_) => MULTIPART_PORT_STATS,
            Queue(_) => MULTIPART_QUEUE,
            Group(_) => MULTIPART_GROUP,
            GroupDesc(_) => MULTIPART_GROUP_DESC,
            GroupFeatures(_) => MULTIPART_GROUP_FEATURES,
            Meter(_) => MULTIPART_METER,
            MeterConfig(_) => MULTIPART_METER_CONFIG,
            MeterFeatures(_) => MULTIPART_METER_FEATURES,
            TableFeatures(_) => MULTIPART_TABLE_FEATURES,
            PortDesc(_) => MULTIPART_PORT_DESC,
            Experimenter(_) => MULTIPART_EXPERIMENTER,
            Opaque { typ, .. } => typ,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartReply {
    pub more: bool,
    pub body: MultipartReplyBody,
}
