/*!
Multipart requests and replies of the OXM family

Every body type is registered per version, a body type without a
registration decodes to an opaque body. Reply bodies that are lists
are read record by record until the message is exhausted.
*/

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::fields::{FlowModFlags, GroupType, MeterFlags, VersionedFlags};
use crate::openflow::messages::multipart::TableFeatureProperty as P;
use crate::openflow::messages::multipart::*;
use crate::openflow::messages::{Match, Message};
use crate::openflow::of13::action::{read_instructions, read_tlv_id, write_instructions, write_tlv_id};
use crate::openflow::of13::oxm::{read_match, read_oxm_id, write_match, write_oxm_id};
use crate::openflow::of13::oxm_match;
use crate::openflow::of13::structs::*;
use crate::openflow::registry::{
    Context, ExperimenterScope, MultipartReplyDecoder, MultipartRequestDecoder, Registry,
};
use crate::openflow::serialize::{
    length_placeholder, patch_length, write_alignment, write_fixed_string, write_padding,
};
use crate::openflow::version::Version;

pub const MULTIPART_MORE: u16 = 1;

pub const DESC_STR_LEN: usize = 256;
pub const SERIAL_NUM_LEN: usize = 32;
const TABLE_NAME_LEN: usize = 32;

const OF13_MULTIPART: &[u16] = &[
    MULTIPART_DESC,
    MULTIPART_FLOW,
    MULTIPART_AGGREGATE,
    MULTIPART_TABLE,
    MULTIPART_PORT_STATS,
    MULTIPART_QUEUE,
    MULTIPART_GROUP,
    MULTIPART_GROUP_DESC,
    MULTIPART_GROUP_FEATURES,
    MULTIPART_METER,
    MULTIPART_METER_CONFIG,
    MULTIPART_METER_FEATURES,
    MULTIPART_TABLE_FEATURES,
    MULTIPART_PORT_DESC,
    MULTIPART_EXPERIMENTER,
];

const OF14_MULTIPART: &[u16] = &[
    MULTIPART_DESC,
    MULTIPART_FLOW,
    MULTIPART_AGGREGATE,
    MULTIPART_TABLE,
    MULTIPART_GROUP,
    MULTIPART_GROUP_DESC,
    MULTIPART_GROUP_FEATURES,
    MULTIPART_METER,
    MULTIPART_METER_CONFIG,
    MULTIPART_METER_FEATURES,
    MULTIPART_TABLE_FEATURES,
    MULTIPART_EXPERIMENTER,
];

const OF15_MULTIPART: &[u16] = &[
    MULTIPART_DESC,
    MULTIPART_TABLE,
    MULTIPART_GROUP,
    MULTIPART_METER,
    MULTIPART_METER_CONFIG,
    MULTIPART_TABLE_FEATURES,
    MULTIPART_EXPERIMENTER,
];

/// The multipart body types with a codec in `version`
pub fn multipart_types(version: Version) -> &'static [u16] {
    match version {
        Version::V1_0 => &[],
        Version::V1_3 => OF13_MULTIPART,
        Version::V1_4 => OF14_MULTIPART,
        Version::V1_5 => OF15_MULTIPART,
    }
}

pub fn register(registry: &mut Registry, version: Version) {
    for &code in multipart_types(version) {
        if let Some(decoder) = request_decoder(code) {
            registry.register_multipart_request(version, code, decoder);
        }
        if let Some(decoder) = reply_decoder(code) {
            registry.register_multipart_reply(version, code, decoder);
        }
    }
}

macro_rules! empty_body {
    ($name:ident, $body:ident :: $variant:ident) => {
        fn $name(_: &Context, _: &mut Reader) -> Result<$body> {
            Ok($body::$variant)
        }
    };
}

empty_body!(desc_request, MultipartRequestBody::Desc);
empty_body!(table_request, MultipartRequestBody::Table);
empty_body!(group_desc_request, MultipartRequestBody::GroupDesc);
empty_body!(group_features_request, MultipartRequestBody::GroupFeatures);
empty_body!(meter_features_request, MultipartRequestBody::MeterFeatures);
empty_body!(port_desc_request, MultipartRequestBody::PortDesc);

fn request_decoder(code: u16) -> Option<MultipartRequestDecoder> {
    let decoder: MultipartRequestDecoder = match code {
        MULTIPART_DESC => desc_request,
        MULTIPART_FLOW => flow_request,
        MULTIPART_AGGREGATE => aggregate_request,
        MULTIPART_TABLE => table_request,
        MULTIPART_PORT_STATS => port_stats_request,
        MULTIPART_QUEUE => queue_request,
        MULTIPART_GROUP => group_request,
        MULTIPART_GROUP_DESC => group_desc_request,
        MULTIPART_GROUP_FEATURES => group_features_request,
        MULTIPART_METER => meter_request,
        MULTIPART_METER_CONFIG => meter_config_request,
        MULTIPART_METER_FEATURES => meter_features_request,
        MULTIPART_TABLE_FEATURES => table_features_request,
        MULTIPART_PORT_DESC => port_desc_request,
        MULTIPART_EXPERIMENTER => experimenter_request,
        _ => return None,
    };
    Some(decoder)
}

fn reply_decoder(code: u16) -> Option<MultipartReplyDecoder> {
    let decoder: MultipartReplyDecoder = match code {
        MULTIPART_DESC => desc_reply,
        MULTIPART_FLOW => flow_reply,
        MULTIPART_AGGREGATE => aggregate_reply,
        MULTIPART_TABLE => table_reply,
        MULTIPART_PORT_STATS => port_stats_reply,
        MULTIPART_QUEUE => queue_reply,
        MULTIPART_GROUP => group_reply,
        MULTIPART_GROUP_DESC => group_desc_reply,
        MULTIPART_GROUP_FEATURES => group_features_reply,
        MULTIPART_METER => meter_reply,
        MULTIPART_METER_CONFIG => meter_config_reply,
        MULTIPART_METER_FEATURES => meter_features_reply,
        MULTIPART_TABLE_FEATURES => table_features_reply,
        MULTIPART_PORT_DESC => port_desc_reply,
        MULTIPART_EXPERIMENTER => experimenter_reply,
        _ => return None,
    };
    Some(decoder)
}

/// Rejects bodies that have no codec in `version`
pub fn check_type(version: Version, code: u16, opaque: bool) -> Result<()> {
    if opaque || multipart_types(version).contains(&code) {
        Ok(())
    }
    else {
        Err(Error::NotInVersion {
            what: "multipart type",
            version,
        })
    }
}

fn read_header(r: &mut Reader) -> Result<(u16, bool)> {
    let typ = r.read_u16()?;
    let flags = r.read_u16()?;
    r.skip_padding(4)?;
    Ok((typ, flags & MULTIPART_MORE != 0))
}

fn write_header(code: u16, more: bool, out: &mut Vec<u8>) -> Result<()> {
    out.write_u16::<NetworkEndian>(code)?;
    out.write_u16::<NetworkEndian>(if more { MULTIPART_MORE } else { 0 })?;
    write_padding(out, 4);
    Ok(())
}

pub fn read_multipart_request(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let (typ, more) = read_header(r)?;
    let body = match ctx.registry.lookup_multipart_request(ctx.version, typ) {
        Some(decoder) => decoder(ctx, r)?,
        None => {
            debug!("No multipart request decoder for type {} in {}", typ, ctx.version);
            MultipartRequestBody::Opaque {
                typ,
                data: r.rest().to_vec(),
            }
        }
    };
    Ok(Message::MultipartRequest(MultipartRequest { more, body }))
}

pub fn read_multipart_reply(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let (typ, more) = read_header(r)?;
    let body = match ctx.registry.lookup_multipart_reply(ctx.version, typ) {
        Some(decoder) => decoder(ctx, r)?,
        None => {
            debug!("No multipart reply decoder for type {} in {}", typ, ctx.version);
            MultipartReplyBody::Opaque {
                typ,
                data: r.rest().to_vec(),
            }
        }
    };
    Ok(Message::MultipartReply(MultipartReply { more, body }))
}

fn read_flow_stats_request(r: &mut Reader) -> Result<FlowStatsRequest> {
    let table_id = r.read_u8()?;
    r.skip_padding(3)?;
    let out_port = r.read_u32()?;
    let out_group = r.read_u32()?;
    r.skip_padding(4)?;
    Ok(FlowStatsRequest {
        table_id,
        out_port,
        out_group,
        cookie: r.read_u64()?,
        cookie_mask: r.read_u64()?,
        matches: Match::Oxm(read_match(r)?),
    })
}

fn flow_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    Ok(MultipartRequestBody::Flow(read_flow_stats_request(r)?))
}

fn aggregate_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    Ok(MultipartRequestBody::Aggregate(read_flow_stats_request(r)?))
}

fn port_stats_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let port_no = r.read_u32()?;
    r.skip_padding(4)?;
    Ok(MultipartRequestBody::PortStats { port_no })
}

fn queue_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    Ok(MultipartRequestBody::Queue {
        port_no: r.read_u32()?,
        queue_id: r.read_u32()?,
    })
}

fn group_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let group_id = r.read_u32()?;
    r.skip_padding(4)?;
    Ok(MultipartRequestBody::Group { group_id })
}

fn meter_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let meter_id = r.read_u32()?;
    r.skip_padding(4)?;
    Ok(MultipartRequestBody::Meter { meter_id })
}

fn meter_config_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let meter_id = r.read_u32()?;
    r.skip_padding(4)?;
    Ok(MultipartRequestBody::MeterConfig { meter_id })
}

fn table_features_request(ctx: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let tables = r.read_repeated(|r| read_table_features(ctx, r))?;
    Ok(MultipartRequestBody::TableFeatures(tables))
}

fn read_multipart_experimenter(
    ctx: &Context,
    scope: ExperimenterScope,
    r: &mut Reader,
) -> Result<MultipartExperimenter> {
    let experimenter = r.read_u32()?;
    let exp_type = r.read_u32()?;
    let data = r.rest();
    Ok(MultipartExperimenter {
        experimenter,
        exp_type,
        body: ctx.experimenter(scope, experimenter, exp_type, data)?,
    })
}

fn experimenter_request(ctx: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let body = read_multipart_experimenter(ctx, ExperimenterScope::MultipartRequest, r)?;
    Ok(MultipartRequestBody::Experimenter(body))
}

fn desc_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Desc(read_desc(r)?))
}

/// The description strings are laid out alike in all versions
pub fn read_desc(r: &mut Reader) -> Result<Desc> {
    Ok(Desc {
        mfr_desc: r.read_fixed_string(DESC_STR_LEN)?,
        hw_desc: r.read_fixed_string(DESC_STR_LEN)?,
        sw_desc: r.read_fixed_string(DESC_STR_LEN)?,
        serial_num: r.read_fixed_string(SERIAL_NUM_LEN)?,
        dp_desc: r.read_fixed_string(DESC_STR_LEN)?,
    })
}

pub fn write_desc(desc: &Desc, out: &mut Vec<u8>) -> Result<()> {
    write_fixed_string(out, &desc.mfr_desc, DESC_STR_LEN)?;
    write_fixed_string(out, &desc.hw_desc, DESC_STR_LEN)?;
    write_fixed_string(out, &desc.sw_desc, DESC_STR_LEN)?;
    write_fixed_string(out, &desc.serial_num, SERIAL_NUM_LEN)?;
    write_fixed_string(out, &desc.dp_desc, DESC_STR_LEN)
}

fn read_flow_stats(ctx: &Context, r: &mut Reader) -> Result<FlowStats> {
    let len = r.read_u16()?;
    let mut body = record(r, len, 2)?;
    let table_id = body.read_u8()?;
    body.skip_padding(1)?;
    let duration_sec = body.read_u32()?;
    let duration_nsec = body.read_u32()?;
    let priority = body.read_u16()?;
    let idle_timeout = body.read_u16()?;
    let hard_timeout = body.read_u16()?;
    let flags = FlowModFlags::from_raw(u32::from(body.read_u16()?), ctx.version);
    let importance = if ctx.version >= Version::V1_4 {
        let importance = body.read_u16()?;
        body.skip_padding(2)?;
        importance
    }
    else {
        body.skip_padding(4)?;
        0
    };
    let cookie = body.read_u64()?;
    let packet_count = body.read_u64()?;
    let byte_count = body.read_u64()?;
    let matches = Match::Oxm(read_match(&mut body)?);
    let instructions = read_instructions(ctx, &mut body)?;
    Ok(FlowStats {
        table_id,
        duration_sec,
        duration_nsec,
        priority,
        idle_timeout,
        hard_timeout,
        flags,
        importance,
        cookie,
        packet_count,
        byte_count,
        matches,
        instructions,
        actions: vec![],
    })
}

fn flow_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Flow(
        r.read_repeated(|r| read_flow_stats(ctx, r))?,
    ))
}

pub fn read_aggregate(r: &mut Reader) -> Result<AggregateStats> {
    let stats = AggregateStats {
        packet_count: r.read_u64()?,
        byte_count: r.read_u64()?,
        flow_count: r.read_u32()?,
    };
    r.skip_padding(4)?;
    Ok(stats)
}

pub fn write_aggregate(stats: &AggregateStats, out: &mut Vec<u8>) -> Result<()> {
    out.write_u64::<NetworkEndian>(stats.packet_count)?;
    out.write_u64::<NetworkEndian>(stats.byte_count)?;
    out.write_u32::<NetworkEndian>(stats.flow_count)?;
    write_padding(out, 4);
    Ok(())
}

fn aggregate_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Aggregate(read_aggregate(r)?))
}

fn table_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let tables = r.read_repeated(|r| {
        let table_id = r.read_u8()?;
        r.skip_padding(3)?;
        Ok(TableStats {
            table_id,
            name: String::new(),
            wildcards: Default::default(),
            max_entries: 0,
            active_count: r.read_u32()?,
            lookup_count: r.read_u64()?,
            matched_count: r.read_u64()?,
        })
    })?;
    Ok(MultipartReplyBody::Table(tables))
}

fn port_stats_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let ports = r.read_repeated(|r| {
        let port_no = r.read_u32()?;
        r.skip_padding(4)?;
        Ok(PortStats {
            port_no,
            rx_packets: r.read_u64()?,
            tx_packets: r.read_u64()?,
            rx_bytes: r.read_u64()?,
            tx_bytes: r.read_u64()?,
            rx_dropped: r.read_u64()?,
            tx_dropped: r.read_u64()?,
            rx_errors: r.read_u64()?,
            tx_errors: r.read_u64()?,
            rx_frame_err: r.read_u64()?,
            rx_over_err: r.read_u64()?,
            rx_crc_err: r.read_u64()?,
            collisions: r.read_u64()?,
            duration_sec: r.read_u32()?,
            duration_nsec: r.read_u32()?,
        })
    })?;
    Ok(MultipartReplyBody::PortStats(ports))
}

fn queue_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let queues = r.read_repeated(|r| {
        Ok(QueueStats {
            port_no: r.read_u32()?,
            queue_id: r.read_u32()?,
            tx_bytes: r.read_u64()?,
            tx_packets: r.read_u64()?,
            tx_errors: r.read_u64()?,
            duration_sec: r.read_u32()?,
            duration_nsec: r.read_u32()?,
        })
    })?;
    Ok(MultipartReplyBody::Queue(queues))
}

fn read_group_stats(r: &mut Reader) -> Result<GroupStats> {
    let len = r.read_u16()?;
    let mut body = record(r, len, 2)?;
    body.skip_padding(2)?;
    let group_id = body.read_u32()?;
    let ref_count = body.read_u32()?;
    body.skip_padding(4)?;
    Ok(GroupStats {
        group_id,
        ref_count,
        packet_count: body.read_u64()?,
        byte_count: body.read_u64()?,
        duration_sec: body.read_u32()?,
        duration_nsec: body.read_u32()?,
        bucket_stats: body.read_repeated(|r| {
            Ok(BucketCounter {
                packet_count: r.read_u64()?,
                byte_count: r.read_u64()?,
            })
        })?,
    })
}

fn group_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Group(r.read_repeated(read_group_stats)?))
}

fn read_group_desc(ctx: &Context, r: &mut Reader) -> Result<GroupDesc> {
    let len = r.read_u16()?;
    let mut body = record(r, len, 2)?;
    let group_type = GroupType::from_raw(body.read_u8()?);
    body.skip_padding(1)?;
    Ok(GroupDesc {
        group_type,
        group_id: body.read_u32()?,
        buckets: read_buckets(ctx, &mut body)?,
    })
}

fn group_desc_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::GroupDesc(
        r.read_repeated(|r| read_group_desc(ctx, r))?,
    ))
}

fn group_features_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let mut features = GroupFeatures {
        types: r.read_u32()?,
        capabilities: r.read_u32()?,
        ..Default::default()
    };
    for max in features.max_groups.iter_mut() {
        *max = r.read_u32()?;
    }
    for actions in features.actions.iter_mut() {
        *actions = r.read_u32()?;
    }
    Ok(MultipartReplyBody::GroupFeatures(features))
}

fn read_meter_stats(r: &mut Reader) -> Result<MeterStats> {
    let meter_id = r.read_u32()?;
    let len = r.read_u16()?;
    let mut body = record(r, len, 6)?;
    body.skip_padding(6)?;
    Ok(MeterStats {
        meter_id,
        flow_count: body.read_u32()?,
        packet_in_count: body.read_u64()?,
        byte_in_count: body.read_u64()?,
        duration_sec: body.read_u32()?,
        duration_nsec: body.read_u32()?,
        band_stats: body.read_repeated(|r| {
            Ok(MeterBandStats {
                packet_band_count: r.read_u64()?,
                byte_band_count: r.read_u64()?,
            })
        })?,
    })
}

fn meter_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Meter(r.read_repeated(read_meter_stats)?))
}

fn read_meter_config(ctx: &Context, r: &mut Reader) -> Result<MeterConfig> {
    let len = r.read_u16()?;
    let mut body = record(r, len, 2)?;
    Ok(MeterConfig {
        flags: MeterFlags::from_raw(u32::from(body.read_u16()?), ctx.version),
        meter_id: body.read_u32()?,
        bands: read_meter_bands(ctx, &mut body)?,
    })
}

fn meter_config_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::MeterConfig(
        r.read_repeated(|r| read_meter_config(ctx, r))?,
    ))
}

fn meter_features_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let features = MeterFeatures {
        max_meter: r.read_u32()?,
        band_types: r.read_u32()?,
        capabilities: r.read_u32()?,
        max_bands: r.read_u8()?,
        max_color: r.read_u8()?,
    };
    r.skip_padding(2)?;
    Ok(MultipartReplyBody::MeterFeatures(features))
}

fn table_features_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let tables = r.read_repeated(|r| read_table_features(ctx, r))?;
    Ok(MultipartReplyBody::TableFeatures(tables))
}

fn port_desc_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let ports = r.read_repeated(|r| read_port(ctx.version, r))?;
    Ok(MultipartReplyBody::PortDesc(ports))
}

fn experimenter_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let body = read_multipart_experimenter(ctx, ExperimenterScope::MultipartReply, r)?;
    Ok(MultipartReplyBody::Experimenter(body))
}

fn read_table_features(ctx: &Context, r: &mut Reader) -> Result<TableFeatures> {
    let len = r.read_u16()?;
    let mut body = record(r, len, 2)?;
    let table_id = body.read_u8()?;
    let (command, features) = if ctx.version >= Version::V1_5 {
        (body.read_u8()?, body.read_u32()?)
    }
    else {
        body.skip_padding(5)?;
        (0, 0)
    };
    Ok(TableFeatures {
        table_id,
        command,
        features,
        name: body.read_fixed_string(TABLE_NAME_LEN)?,
        metadata_match: body.read_u64()?,
        metadata_write: body.read_u64()?,
        config: body.read_u32()?,
        max_entries: body.read_u32()?,
        properties: body.read_repeated(|r| read_table_feature_property(ctx, r))?,
    })
}

/// Property lengths exclude the padding that aligns each property
fn read_table_feature_property(ctx: &Context, r: &mut Reader) -> Result<TableFeatureProperty> {
    let (typ, mut body) = r.read_tlv()?;
    r.skip_alignment(body.len() + 4)?;
    let miss = typ & 1 != 0;
    let property = match typ {
        TFP_INSTRUCTIONS | TFP_INSTRUCTIONS_MISS => P::Instructions {
            miss,
            ids: body.read_repeated(read_tlv_id)?,
        },
        TFP_NEXT_TABLES | TFP_NEXT_TABLES_MISS => P::NextTables {
            miss,
            tables: body.rest().to_vec(),
        },
        TFP_WRITE_ACTIONS | TFP_WRITE_ACTIONS_MISS => P::WriteActions {
            miss,
            ids: body.read_repeated(read_tlv_id)?,
        },
        TFP_APPLY_ACTIONS | TFP_APPLY_ACTIONS_MISS => P::ApplyActions {
            miss,
            ids: body.read_repeated(read_tlv_id)?,
        },
        TFP_MATCH => P::Match(body.read_repeated(read_oxm_id)?),
        TFP_WILDCARDS => P::Wildcards(body.read_repeated(read_oxm_id)?),
        TFP_WRITE_SETFIELD | TFP_WRITE_SETFIELD_MISS => P::WriteSetfield {
            miss,
            ids: body.read_repeated(read_oxm_id)?,
        },
        TFP_APPLY_SETFIELD | TFP_APPLY_SETFIELD_MISS => P::ApplySetfield {
            miss,
            ids: body.read_repeated(read_oxm_id)?,
        },
        TFP_EXPERIMENTER | TFP_EXPERIMENTER_MISS => {
            let experimenter = body.read_u32()?;
            let exp_type = body.read_u32()?;
            let data = body.rest();
            P::Experimenter {
                miss,
                experimenter,
                exp_type,
                body: ctx.experimenter(
                    ExperimenterScope::TableFeatureProperty,
                    experimenter,
                    exp_type,
                    data,
                )?,
            }
        }
        _ => {
            debug!("Unknown table features property {}, keeping it opaque", typ);
            P::Opaque {
                typ,
                data: body.rest().to_vec(),
            }
        }
    };
    body.finish()?;
    Ok(property)
}

fn property_type(property: &TableFeatureProperty) -> u16 {
    let (base, miss) = match *property {
        P::Instructions { miss, .. } => (TFP_INSTRUCTIONS, miss),
        P::NextTables { miss, .. } => (TFP_NEXT_TABLES, miss),
        P::WriteActions { miss, .. } => (TFP_WRITE_ACTIONS, miss),
        P::ApplyActions { miss, .. } => (TFP_APPLY_ACTIONS, miss),
        P::Match(_) => (TFP_MATCH, false),
        P::Wildcards(_) => (TFP_WILDCARDS, false),
        P::WriteSetfield { miss, .. } => (TFP_WRITE_SETFIELD, miss),
        P::ApplySetfield { miss, .. } => (TFP_APPLY_SETFIELD, miss),
        P::Experimenter { miss, .. } => (TFP_EXPERIMENTER, miss),
        P::Opaque { typ, .. } => (typ, false),
    };
    if miss {
        base | 1
    }
    else {
        base
    }
}

fn write_table_feature_property(property: &TableFeatureProperty, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    out.write_u16::<NetworkEndian>(property_type(property))?;
    let at = length_placeholder(out);
    match *property {
        P::Instructions { ref ids, .. } | P::WriteActions { ref ids, .. } | P::ApplyActions { ref ids, .. } => {
            for id in ids {
                write_tlv_id(id, out)?;
            }
        }
        P::NextTables { ref tables, .. } => out.extend_from_slice(tables),
        P::Match(ref ids)
        | P::Wildcards(ref ids)
        | P::WriteSetfield { ref ids, .. }
        | P::ApplySetfield { ref ids, .. } => {
            for id in ids {
                write_oxm_id(id, out)?;
            }
        }
        P::Experimenter {
            experimenter,
            exp_type,
            ref body,
            ..
        } => {
            out.write_u32::<NetworkEndian>(experimenter)?;
            out.write_u32::<NetworkEndian>(exp_type)?;
            out.extend_from_slice(&body.to_bytes()?);
        }
        P::Opaque { ref data, .. } => out.extend_from_slice(data),
    }
    patch_length(out, at, start, "table features property")?;
    write_alignment(out, start);
    Ok(())
}

fn write_table_features(version: Version, tables: &[TableFeatures], out: &mut Vec<u8>) -> Result<()> {
    for table in tables {
        let start = out.len();
        let at = length_placeholder(out);
        out.write_u8(table.table_id)?;
        if version >= Version::V1_5 {
            out.write_u8(table.command)?;
            out.write_u32::<NetworkEndian>(table.features)?;
        }
        else {
            write_padding(out, 5);
        }
        write_fixed_string(out, &table.name, TABLE_NAME_LEN)?;
        out.write_u64::<NetworkEndian>(table.metadata_match)?;
        out.write_u64::<NetworkEndian>(table.metadata_write)?;
        out.write_u32::<NetworkEndian>(table.config)?;
        out.write_u32::<NetworkEndian>(table.max_entries)?;
        for property in &table.properties {
            write_table_feature_property(property, out)?;
        }
        patch_length(out, at, start, "table features")?;
    }
    Ok(())
}

fn write_flow_stats_request(version: Version, req: &FlowStatsRequest, out: &mut Vec<u8>) -> Result<()> {
    out.write_u8(req.table_id)?;
    write_padding(out, 3);
    out.write_u32::<NetworkEndian>(req.out_port)?;
    out.write_u32::<NetworkEndian>(req.out_group)?;
    write_padding(out, 4);
    out.write_u64::<NetworkEndian>(req.cookie)?;
    out.write_u64::<NetworkEndian>(req.cookie_mask)?;
    write_match(oxm_match(version, &req.matches)?, out)
}

fn write_multipart_experimenter(body: &MultipartExperimenter, out: &mut Vec<u8>) -> Result<()> {
    out.write_u32::<NetworkEndian>(body.experimenter)?;
    out.write_u32::<NetworkEndian>(body.exp_type)?;
    out.extend_from_slice(&body.body.to_bytes()?);
    Ok(())
}

pub fn write_multipart_request(version: Version, req: &MultipartRequest, out: &mut Vec<u8>) -> Result<()> {
    use crate::openflow::messages::multipart::MultipartRequestBody as Body;

    let code = req.body.code();
    let opaque = match req.body {
        Body::Opaque { .. } => true,
        _ => false,
    };
    check_type(version, code, opaque)?;
    write_header(code, req.more, out)?;
    match req.body {
        Body::Desc | Body::Table | Body::GroupDesc | Body::GroupFeatures | Body::MeterFeatures | Body::PortDesc => {}
        Body::Flow(ref flow) | Body::Aggregate(ref flow) => write_flow_stats_request(version, flow, out)?,
        Body::PortStats { port_no } => {
            out.write_u32::<NetworkEndian>(port_no)?;
            write_padding(out, 4);
        }
        Body::Queue { port_no, queue_id } => {
            out.write_u32::<NetworkEndian>(port_no)?;
            out.write_u32::<NetworkEndian>(queue_id)?;
        }
        Body::Group { group_id: id } | Body::Meter { meter_id: id } | Body::MeterConfig { meter_id: id } => {
            out.write_u32::<NetworkEndian>(id)?;
            write_padding(out, 4);
        }
        Body::TableFeatures(ref tables) => write_table_features(version, tables, out)?,
        Body::Experimenter(ref body) => write_multipart_experimenter(body, out)?,
        Body::Opaque { ref data, .. } => out.extend_from_slice(data),
    }
    Ok(())
}

fn write_flow_stats(version: Version, stats: &FlowStats, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    let at = length_placeholder(out);
    out.write_u8(stats.table_id)?;
    write_padding(out, 1);
    out.write_u32::<NetworkEndian>(stats.duration_sec)?;
    out.write_u32::<NetworkEndian>(stats.duration_nsec)?;
    out.write_u16::<NetworkEndian>(stats.priority)?;
    out.write_u16::<NetworkEndian>(stats.idle_timeout)?;
    out.write_u16::<NetworkEndian>(stats.hard_timeout)?;
    out.write_u16::<NetworkEndian>(stats.flags.to_raw(version) as u16)?;
    if version >= Version::V1_4 {
        out.write_u16::<NetworkEndian>(stats.importance)?;
        write_padding(out, 2);
    }
    else {
        write_padding(out, 4);
    }
    out.write_u64::<NetworkEndian>(stats.cookie)?;
    out.write_u64::<NetworkEndian>(stats.packet_count)?;
    out.write_u64::<NetworkEndian>(stats.byte_count)?;
    write_match(oxm_match(version, &stats.matches)?, out)?;
    write_instructions(version, &stats.instructions, out)?;
    patch_length(out, at, start, "flow stats")
}

pub fn write_multipart_reply(version: Version, reply: &MultipartReply, out: &mut Vec<u8>) -> Result<()> {
    use crate::openflow::messages::multipart::MultipartReplyBody as Body;

    let code = reply.body.code();
    let opaque = match reply.body {
        Body::Opaque { .. } => true,
        _ => false,
    };
    check_type(version, code, opaque)?;
    write_header(code, reply.more, out)?;
    match reply.body {
        Body::Desc(ref desc) => write_desc(desc, out)?,
        Body::Flow(ref flows) => {
            for stats in flows {
                write_flow_stats(version, stats, out)?;
            }
        }
        Body::Aggregate(ref stats) => write_aggregate(stats, out)?,
        Body::Table(ref tables) => {
            for table in tables {
                out.write_u8(table.table_id)?;
                write_padding(out, 3);
                out.write_u32::<NetworkEndian>(table.active_count)?;
                out.write_u64::<NetworkEndian>(table.lookup_count)?;
                out.write_u64::<NetworkEndian>(table.matched_count)?;
            }
        }
        Body::PortStats(ref ports) => {
            for port in ports {
                out.write_u32::<NetworkEndian>(port.port_no)?;
                write_padding(out, 4);
                for counter in &[
                    port.rx_packets,
                    port.tx_packets,
                    port.rx_bytes,
                    port.tx_bytes,
                    port.rx_dropped,
                    port.tx_dropped,
                    port.rx_errors,
                    port.tx_errors,
                    port.rx_frame_err,
                    port.rx_over_err,
                    port.rx_crc_err,
                    port.collisions,
                ] {
                    out.write_u64::<NetworkEndian>(*counter)?;
                }
                out.write_u32::<NetworkEndian>(port.duration_sec)?;
                out.write_u32::<NetworkEndian>(port.duration_nsec)?;
            }
        }
        Body::Queue(ref queues) => {
            for queue in queues {
                out.write_u32::<NetworkEndian>(queue.port_no)?;
                out.write_u32::<NetworkEndian>(queue.queue_id)?;
                out.write_u64::<NetworkEndian>(queue.tx_bytes)?;
                out.write_u64::<NetworkEndian>(queue.tx_packets)?;
                out.write_u64::<NetworkEndian>(queue.tx_errors)?;
                out.write_u32::<NetworkEndian>(queue.duration_sec)?;
                out.write_u32::<NetworkEndian>(queue.duration_nsec)?;
            }
        }
        Body::Group(ref groups) => {
            for group in groups {
                let start = out.len();
                let at = length_placeholder(out);
                write_padding(out, 2);
                out.write_u32::<NetworkEndian>(group.group_id)?;
                out.write_u32::<NetworkEndian>(group.ref_count)?;
                write_padding(out, 4);
                out.write_u64::<NetworkEndian>(group.packet_count)?;
                out.write_u64::<NetworkEndian>(group.byte_count)?;
                out.write_u32::<NetworkEndian>(group.duration_sec)?;
                out.write_u32::<NetworkEndian>(group.duration_nsec)?;
                for bucket in &group.bucket_stats {
                    out.write_u64::<NetworkEndian>(bucket.packet_count)?;
                    out.write_u64::<NetworkEndian>(bucket.byte_count)?;
                }
                patch_length(out, at, start, "group stats")?;
            }
        }
        Body::GroupDesc(ref groups) => {
            for group in groups {
                let start = out.len();
                let at = length_placeholder(out);
                out.write_u8(group.group_type.raw())?;
                write_padding(out, 1);
                out.write_u32::<NetworkEndian>(group.group_id)?;
                write_buckets(version, &group.buckets, out)?;
                patch_length(out, at, start, "group description")?;
            }
        }
        Body::GroupFeatures(ref features) => {
            out.write_u32::<NetworkEndian>(features.types)?;
            out.write_u32::<NetworkEndian>(features.capabilities)?;
            for value in features.max_groups.iter().chain(features.actions.iter()) {
                out.write_u32::<NetworkEndian>(*value)?;
            }
        }
        Body::Meter(ref meters) => {
            for meter in meters {
                let start = out.len();
                out.write_u32::<NetworkEndian>(meter.meter_id)?;
                let at = length_placeholder(out);
                write_padding(out, 6);
                out.write_u32::<NetworkEndian>(meter.flow_count)?;
                out.write_u64::<NetworkEndian>(meter.packet_in_count)?;
                out.write_u64::<NetworkEndian>(meter.byte_in_count)?;
                out.write_u32::<NetworkEndian>(meter.duration_sec)?;
                out.write_u32::<NetworkEndian>(meter.duration_nsec)?;
                for band in &meter.band_stats {
                    out.write_u64::<NetworkEndian>(band.packet_band_count)?;
                    out.write_u64::<NetworkEndian>(band.byte_band_count)?;
                }
                patch_length(out, at, start, "meter stats")?;
            }
        }
        Body::MeterConfig(ref configs) => {
            for config in configs {
                let start = out.len();
                let at = length_placeholder(out);
                out.write_u16::<NetworkEndian>(config.flags.to_raw(version) as u16)?;
                out.write_u32::<NetworkEndian>(config.meter_id)?;
                write_meter_bands(&config.bands, out)?;
                patch_length(out, at, start, "meter config")?;
            }
        }
        Body::MeterFeatures(ref features) => {
            out.write_u32::<NetworkEndian>(features.max_meter)?;
            out.write_u32::<NetworkEndian>(features.band_types)?;
            out.write_u32::<NetworkEndian>(features.capabilities)?;
            out.write_u8(features.max_bands)?;
            out.write_u8(features.max_color)?;
            write_padding(out, 2);
        }
        Body::TableFeatures(ref tables) => write_table_features(version, tables, out)?,
        Body::PortDesc(ref ports) => {
            for port in ports {
                write_port(version, port, out)?;
            }
        }
        Body::Experimenter(ref body) => write_multipart_experimenter(body, out)?,
        Body::Opaque { ref data, .. } => out.extend_from_slice(data),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openflow::messages::action::{Action, Instruction, TlvId};
    use crate::openflow::messages::group::{Bucket, MeterBand};
    use crate::openflow::messages::oxm::{MatchEntry, OxmField, OxmId};

    fn bootstrap(version: Version) -> Registry {
        let mut registry = Registry::new();
        register(&mut registry, version);
        registry
    }

    fn decode_reply(version: Version, bytes: &[u8]) -> MultipartReply {
        let registry = bootstrap(version);
        let ctx = Context::new(&registry, version);
        let mut r = Reader::new(bytes);
        let msg = read_multipart_reply(&ctx, &mut r).unwrap();
        r.finish().unwrap();
        match msg {
            Message::MultipartReply(reply) => reply,
            other => panic!("unexpected {:?}", other),
        }
    }

    fn flow_stats_bytes(importance: u16) -> Vec<u8> {
        let mut bytes = vec![0x00, 0x01, 0x00, 0x01, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0x00, 0x48, 0x02, 0x00]); // length, table
        bytes.extend_from_slice(&[0, 0, 0, 10, 0, 0, 0, 20]); // duration
        bytes.extend_from_slice(&[0x80, 0x00, 0, 30, 0, 0, 0x00, 0x01]); // prio, idle, hard, flags
        bytes.extend_from_slice(&[(importance >> 8) as u8, importance as u8, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x0c]); // cookie
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x05]); // packets
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0x01, 0x00]); // bytes
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x0c, 0x80, 0x00, 0x00, 0x04]);
        bytes.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 0]); // in_port 1
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x08, 0x03, 0, 0, 0]); // goto 3
        bytes
    }

    #[test]
    fn flow_stats_of13() {
        let bytes = flow_stats_bytes(0);
        let reply = decode_reply(Version::V1_3, &bytes);
        assert!(reply.more);
        let flows = match reply.body {
            MultipartReplyBody::Flow(ref flows) => flows.clone(),
            ref other => panic!("unexpected {:?}", other),
        };
        assert_eq!(1, flows.len());
        assert_eq!(2, flows[0].table_id);
        assert_eq!(0x8000, flows[0].priority);
        assert!(flows[0].flags.send_flow_rem);
        assert_eq!(Match::Oxm(vec![MatchEntry::Basic(OxmField::InPort(1))]), flows[0].matches);
        assert_eq!(vec![Instruction::GotoTable(3)], flows[0].instructions);

        let mut out = vec![];
        write_multipart_reply(Version::V1_3, &reply, &mut out).unwrap();
        assert_eq!(bytes, out);
    }

    #[test]
    fn flow_stats_importance_since_1_4() {
        let bytes = flow_stats_bytes(7);
        match decode_reply(Version::V1_4, &bytes).body {
            MultipartReplyBody::Flow(flows) => assert_eq!(7, flows[0].importance),
            other => panic!("unexpected {:?}", other),
        }
        match decode_reply(Version::V1_3, &bytes).body {
            MultipartReplyBody::Flow(flows) => assert_eq!(0, flows[0].importance),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unregistered_body_is_opaque() {
        // port stats exist in 1.3 only
        let bytes = [0x00, 0x04, 0x00, 0x00, 0, 0, 0, 0, 1, 2, 3];
        let reply = decode_reply(Version::V1_4, &bytes);
        assert_eq!(
            MultipartReplyBody::Opaque {
                typ: 4,
                data: vec![1, 2, 3]
            },
            reply.body
        );
        let mut out = vec![];
        write_multipart_reply(Version::V1_4, &reply, &mut out).unwrap();
        assert_eq!(&bytes[..], &out[..]);

        let stats = MultipartReply {
            more: false,
            body: MultipartReplyBody::PortStats(vec![]),
        };
        assert!(write_multipart_reply(Version::V1_4, &stats, &mut vec![]).is_err());
    }

    #[test]
    fn table_features_properties() {
        let mut bytes = vec![0x00, 0x0c, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0x00, 0x68, 0x01, 0, 0, 0, 0, 0]);
        let mut name = b"flows".to_vec();
        name.resize(32, 0);
        bytes.extend_from_slice(&name);
        bytes.extend_from_slice(&[0xff; 16]); // metadata match and write
        bytes.extend_from_slice(&[0, 0, 0, 3, 0, 0, 0x10, 0]);
        // instructions: goto table and apply actions, padded to 16
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0c, 0x00, 0x01, 0x00, 0x04]);
        bytes.extend_from_slice(&[0x00, 0x04, 0x00, 0x04, 0, 0, 0, 0]);
        // next tables miss: 2, 3
        bytes.extend_from_slice(&[0x00, 0x03, 0x00, 0x06, 0x02, 0x03, 0, 0]);
        // match: in_port, eth_dst masked
        bytes.extend_from_slice(&[0x00, 0x08, 0x00, 0x0c, 0x80, 0x00, 0x00, 0x04]);
        bytes.extend_from_slice(&[0x80, 0x00, 0x07, 0x0c, 0, 0, 0, 0]);
        assert_eq!(0x68 + 8, bytes.len());

        let reply = decode_reply(Version::V1_3, &bytes);
        let tables = match reply.body {
            MultipartReplyBody::TableFeatures(ref tables) => tables.clone(),
            ref other => panic!("unexpected {:?}", other),
        };
        assert_eq!("flows", tables[0].name);
        assert_eq!(0x1000, tables[0].max_entries);
        assert_eq!(
            vec![
                TableFeatureProperty::Instructions {
                    miss: false,
                    ids: vec![
                        TlvId {
                            typ: 1,
                            experimenter: None
                        },
                        TlvId {
                            typ: 4,
                            experimenter: None
                        },
                    ],
                },
                TableFeatureProperty::NextTables {
                    miss: true,
                    tables: vec![2, 3],
                },
                TableFeatureProperty::Match(vec![
                    OxmId {
                        class: 0x8000,
                        field: 0,
                        has_mask: false,
                        length: 4,
                        experimenter: None,
                    },
                    OxmId {
                        class: 0x8000,
                        field: 3,
                        has_mask: true,
                        length: 12,
                        experimenter: None,
                    },
                ]),
            ],
            tables[0].properties
        );

        let mut out = vec![];
        write_multipart_reply(Version::V1_3, &reply, &mut out).unwrap();
        assert_eq!(bytes, out);
    }

    fn decode_request(version: Version, bytes: &[u8]) -> MultipartRequest {
        let registry = bootstrap(version);
        let ctx = Context::new(&registry, version);
        let mut r = Reader::new(bytes);
        let msg = read_multipart_request(&ctx, &mut r).unwrap();
        r.finish().unwrap();
        match msg {
            Message::MultipartRequest(req) => req,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn table_features_command_since_1_5() {
        let mut bytes = vec![0x00, 0x0c, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0x00, 0x40, 0x03, 0x01, 0x00, 0x00, 0x00, 0x03]);
        let mut name = b"acl".to_vec();
        name.resize(32, 0);
        bytes.extend_from_slice(&name);
        bytes.extend_from_slice(&[0; 16]); // metadata match and write
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0x01, 0]);

        let req = decode_request(Version::V1_5, &bytes);
        match req.body {
            MultipartRequestBody::TableFeatures(ref tables) => {
                assert_eq!(1, tables.len());
                assert_eq!(3, tables[0].table_id);
                assert_eq!(1, tables[0].command);
                assert_eq!(3, tables[0].features);
                assert_eq!("acl", tables[0].name);
                assert_eq!(0x100, tables[0].max_entries);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        let mut out = vec![];
        write_multipart_request(Version::V1_5, &req, &mut out).unwrap();
        assert_eq!(bytes, out);

        // the same bytes are padding before 1.5
        let req = decode_request(Version::V1_4, &bytes);
        match req.body {
            MultipartRequestBody::TableFeatures(ref tables) => {
                assert_eq!(0, tables[0].command);
                assert_eq!(0, tables[0].features);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        let mut out = vec![];
        write_multipart_request(Version::V1_4, &req, &mut out).unwrap();
        assert_eq!(&[0x00, 0x40, 0x03, 0, 0, 0, 0, 0], &out[8..16]);
    }

    fn encode_reply(version: Version, reply: &MultipartReply) -> Vec<u8> {
        let mut out = vec![];
        write_multipart_reply(version, reply, &mut out).unwrap();
        out
    }

    #[test]
    fn group_stats_with_bucket_counters() {
        let mut bytes = vec![0x00, 0x06, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0x00, 0x48, 0, 0, 0, 0, 0, 0x07]); // length, group 7
        bytes.extend_from_slice(&[0, 0, 0, 0x02, 0, 0, 0, 0]); // ref count
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x0a]); // packets
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0x03, 0xe8]); // bytes
        bytes.extend_from_slice(&[0, 0, 0, 0x05, 0, 0, 0, 0x06]); // duration
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x04, 0, 0, 0, 0, 0, 0, 0x01, 0x90]);
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x06, 0, 0, 0, 0, 0, 0, 0x02, 0x58]);
        bytes.extend_from_slice(&[0x00, 0x28, 0, 0, 0, 0, 0, 0x08]); // no buckets
        bytes.extend_from_slice(&[0; 32]);

        let reply = decode_reply(Version::V1_3, &bytes);
        match reply.body {
            MultipartReplyBody::Group(ref groups) => {
                assert_eq!(2, groups.len());
                assert_eq!(7, groups[0].group_id);
                assert_eq!(2, groups[0].ref_count);
                assert_eq!(10, groups[0].packet_count);
                assert_eq!(1000, groups[0].byte_count);
                assert_eq!((5, 6), (groups[0].duration_sec, groups[0].duration_nsec));
                assert_eq!(
                    vec![
                        BucketCounter {
                            packet_count: 4,
                            byte_count: 400,
                        },
                        BucketCounter {
                            packet_count: 6,
                            byte_count: 600,
                        },
                    ],
                    groups[0].bucket_stats
                );
                assert_eq!(8, groups[1].group_id);
                assert!(groups[1].bucket_stats.is_empty());
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode_reply(Version::V1_3, &reply));
    }

    #[test]
    fn group_desc_with_buckets() {
        let mut bytes = vec![0x00, 0x07, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0x00, 0x28, 0x01, 0x00, 0, 0, 0, 0x01]); // select group 1
        bytes.extend_from_slice(&[0x00, 0x20, 0x00, 0x32, 0xff, 0xff, 0xff, 0xff]); // weight 50
        bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x10, 0, 0, 0, 0x03]); // output 3
        bytes.extend_from_slice(&[0xff, 0xe5, 0, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0x00, 0x38, 0x03, 0x00, 0, 0, 0, 0x02]); // fast failover 2
        bytes.extend_from_slice(&[0x00, 0x20, 0x00, 0x00, 0, 0, 0, 0x01]); // watch port 1
        bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x10, 0, 0, 0, 0x01]);
        bytes.extend_from_slice(&[0x00, 0x80, 0, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0x00, 0x10, 0x00, 0x00, 0, 0, 0, 0x02]); // watch port 2, drop
        bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);

        let reply = decode_reply(Version::V1_3, &bytes);
        match reply.body {
            MultipartReplyBody::GroupDesc(ref groups) => {
                assert_eq!(2, groups.len());
                assert_eq!(GroupType::Select, groups[0].group_type);
                assert_eq!(1, groups[0].group_id);
                assert_eq!(
                    vec![Bucket {
                        weight: 50,
                        watch_port: 0xffff_ffff,
                        watch_group: 0xffff_ffff,
                        actions: vec![Action::Output {
                            port: 3,
                            max_len: 0xffe5,
                        }],
                    }],
                    groups[0].buckets
                );
                assert_eq!(GroupType::FastFailover, groups[1].group_type);
                assert_eq!(2, groups[1].buckets.len());
                assert_eq!(1, groups[1].buckets[0].watch_port);
                assert_eq!(2, groups[1].buckets[1].watch_port);
                assert!(groups[1].buckets[1].actions.is_empty());
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode_reply(Version::V1_3, &reply));
    }

    #[test]
    fn group_features_fixed_layout() {
        let mut bytes = vec![0x00, 0x08, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0, 0, 0, 0x0f, 0, 0, 0, 0x07]); // types, capabilities
        bytes.extend_from_slice(&[0, 0, 0x01, 0, 0, 0, 0, 0x40, 0, 0, 0, 0x20, 0, 0, 0, 0x10]);
        bytes.extend_from_slice(&[0, 0, 0, 0x01, 0, 0, 0, 0x03, 0, 0, 0, 0x01, 0, 0, 0, 0x01]);

        let reply = decode_reply(Version::V1_3, &bytes);
        match reply.body {
            MultipartReplyBody::GroupFeatures(ref features) => {
                assert_eq!(0x0f, features.types);
                assert_eq!(0x07, features.capabilities);
                assert_eq!([0x100, 0x40, 0x20, 0x10], features.max_groups);
                assert_eq!([1, 3, 1, 1], features.actions);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode_reply(Version::V1_3, &reply));
    }

    #[test]
    fn meter_stats_with_band_counters() {
        let mut bytes = vec![0x00, 0x09, 0x00, 0x01, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0, 0, 0, 0x01, 0x00, 0x38, 0, 0]); // meter 1, length
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x03]); // flow count
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x64]); // packets in
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0x27, 0x10]); // bytes in
        bytes.extend_from_slice(&[0, 0, 0, 0x09, 0, 0, 0, 0x0a]); // duration
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x0c, 0, 0, 0, 0, 0, 0, 0x04, 0xb0]);
        bytes.extend_from_slice(&[0, 0, 0, 0x02, 0x00, 0x28, 0, 0]); // meter 2, no bands
        bytes.extend_from_slice(&[0; 32]);

        let reply = decode_reply(Version::V1_3, &bytes);
        assert!(reply.more);
        match reply.body {
            MultipartReplyBody::Meter(ref meters) => {
                assert_eq!(2, meters.len());
                assert_eq!(1, meters[0].meter_id);
                assert_eq!(3, meters[0].flow_count);
                assert_eq!(100, meters[0].packet_in_count);
                assert_eq!(10_000, meters[0].byte_in_count);
                assert_eq!((9, 10), (meters[0].duration_sec, meters[0].duration_nsec));
                assert_eq!(
                    vec![MeterBandStats {
                        packet_band_count: 12,
                        byte_band_count: 1200,
                    }],
                    meters[0].band_stats
                );
                assert_eq!(2, meters[1].meter_id);
                assert!(meters[1].band_stats.is_empty());
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode_reply(Version::V1_3, &reply));
    }

    #[test]
    fn meter_config_with_bands() {
        let mut bytes = vec![0x00, 0x0a, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0x00, 0x18, 0x00, 0x09, 0, 0, 0, 0x01]); // kbps and stats
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x10, 0, 0, 0x03, 0xe8]); // drop at 1000
        bytes.extend_from_slice(&[0, 0, 0, 0x64, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0x00, 0x28, 0x00, 0x02, 0, 0, 0, 0x02]); // pktps
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x10, 0, 0, 0x00, 0x0a]);
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[0x00, 0x02, 0x00, 0x10, 0, 0, 0x00, 0x05]); // dscp remark
        bytes.extend_from_slice(&[0, 0, 0, 0x01, 0x02, 0, 0, 0]);

        let reply = decode_reply(Version::V1_3, &bytes);
        match reply.body {
            MultipartReplyBody::MeterConfig(ref configs) => {
                assert_eq!(2, configs.len());
                assert_eq!(1, configs[0].meter_id);
                assert!(configs[0].flags.kbps && configs[0].flags.stats);
                assert!(!configs[0].flags.pktps && !configs[0].flags.burst);
                assert_eq!(
                    vec![MeterBand::Drop {
                        rate: 1000,
                        burst_size: 100,
                    }],
                    configs[0].bands
                );
                assert_eq!(2, configs[1].meter_id);
                assert!(configs[1].flags.pktps);
                assert_eq!(
                    MeterBand::DscpRemark {
                        rate: 5,
                        burst_size: 1,
                        prec_level: 2,
                    },
                    configs[1].bands[1]
                );
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode_reply(Version::V1_3, &reply));
    }

    #[test]
    fn meter_features_fixed_layout() {
        let mut bytes = vec![0x00, 0x0b, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0, 0, 0x10, 0, 0, 0, 0, 0x06]); // max meter, band types
        bytes.extend_from_slice(&[0, 0, 0, 0x0f, 0x02, 0x08, 0, 0]);

        let reply = decode_reply(Version::V1_3, &bytes);
        match reply.body {
            MultipartReplyBody::MeterFeatures(ref features) => assert_eq!(
                MeterFeatures {
                    max_meter: 0x1000,
                    band_types: 0x06,
                    capabilities: 0x0f,
                    max_bands: 2,
                    max_color: 8,
                },
                *features
            ),
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode_reply(Version::V1_3, &reply));
    }

    fn port_bytes(port_no: u8, name: &str) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, port_no, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, port_no, 0, 0]);
        let mut padded = name.as_bytes().to_vec();
        padded.resize(16, 0);
        bytes.extend_from_slice(&padded);
        bytes.extend_from_slice(&[0, 0, 0, 0x01, 0, 0, 0, 0x04]); // down, live
        bytes.extend_from_slice(&[0, 0, 0x08, 0x20, 0, 0, 0x28, 0x20]); // curr, advertised
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]); // supported, peer
        bytes.extend_from_slice(&[0, 0x0f, 0x42, 0x40, 0, 0x0f, 0x42, 0x40]); // speeds
        bytes
    }

    #[test]
    fn port_desc_two_ports() {
        let mut bytes = vec![0x00, 0x0d, 0x00, 0x00, 0, 0, 0, 0];
        bytes.extend(port_bytes(1, "eth1"));
        bytes.extend(port_bytes(2, "eth2"));

        let reply = decode_reply(Version::V1_3, &bytes);
        match reply.body {
            MultipartReplyBody::PortDesc(ref ports) => {
                assert_eq!(2, ports.len());
                assert_eq!(1, ports[0].port_no);
                assert_eq!([0x02, 0, 0, 0, 0, 0x01], ports[0].hw_addr);
                assert_eq!("eth1", ports[0].name);
                assert!(ports[0].config.port_down);
                assert!(ports[0].state.live && !ports[0].state.link_down);
                assert!(ports[0].curr.fd_1gb && ports[0].curr.copper);
                assert!(ports[0].advertised.autoneg && !ports[0].curr.autoneg);
                assert_eq!(1_000_000, ports[0].curr_speed);
                assert_eq!(2, ports[1].port_no);
                assert_eq!("eth2", ports[1].name);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode_reply(Version::V1_3, &reply));
    }

    #[test]
    fn flow_stats_request() {
        let bytes = [
            0x00, 0x01, 0x00, 0x00, 0, 0, 0, 0, // header
            0xff, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0x00, 0x01, 0x00, 0x04, 0, 0, 0, 0, // empty match
        ];
        let registry = bootstrap(Version::V1_3);
        let ctx = Context::new(&registry, Version::V1_3);
        let mut r = Reader::new(&bytes);
        let msg = read_multipart_request(&ctx, &mut r).unwrap();
        r.finish().unwrap();
        match msg {
            Message::MultipartRequest(ref req) => match req.body {
                MultipartRequestBody::Flow(ref flow) => {
                    assert_eq!(0xff, flow.table_id);
                    assert_eq!(0xffff_ffff, flow.out_port);
                    assert_eq!(Match::Oxm(vec![]), flow.matches);
                }
                ref other => panic!("unexpected {:?}", other),
            },
            ref other => panic!("unexpected {:?}", other),
        }
    }
}
