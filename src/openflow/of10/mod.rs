/*!
Message bodies of OpenFlow 1.0

Ports are 16 bit wide here, the fixed 40 byte match replaces OXM and
flow entries carry plain action lists.
*/

pub mod action;
pub mod match_v10;
pub mod stats;

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::common;
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::fields::*;
use crate::openflow::messages::*;
use crate::openflow::of13::structs::{read_packet_queue, write_packet_queue};
use crate::openflow::registry::{Context, MessageDecoder, Registry};
use crate::openflow::serialize::{length_u16, write_fixed_string, write_padding};
use crate::openflow::version::{message_types, MessageKind, Version};

use self::action::{read_actions, write_actions};
use self::match_v10::{read_match, v10_match, write_match};

pub const PORT_LEN: usize = 48;
const NAME_LEN: usize = 16;

/// Registers the message and statistics decoders of 1.0
pub fn register(registry: &mut Registry) {
    for &(code, kind) in message_types(Version::V1_0) {
        match decoder(kind) {
            Some(decoder) => registry.register_message(Version::V1_0, code, kind, decoder),
            None => warn!("No 1.0 decoder for {:?}", kind),
        }
    }
    stats::register(registry);
}

fn decoder(kind: MessageKind) -> Option<MessageDecoder> {
    use crate::openflow::version::MessageKind as K;

    let decoder: MessageDecoder = match kind {
        K::Hello => common::read_hello,
        K::Error => common::read_error,
        K::EchoRequest => common::read_echo_request,
        K::EchoReply => common::read_echo_reply,
        K::Experimenter => common::read_experimenter,
        K::FeaturesRequest => common::read_features_request,
        K::FeaturesReply => read_features_reply,
        K::GetConfigRequest => common::read_get_config_request,
        K::GetConfigReply => common::read_get_config_reply,
        K::SetConfig => common::read_set_config,
        K::PacketIn => read_packet_in,
        K::FlowRemoved => read_flow_removed,
        K::PortStatus => read_port_status,
        K::PacketOut => read_packet_out,
        K::FlowMod => read_flow_mod,
        K::PortMod => read_port_mod,
        K::MultipartRequest => stats::read_stats_request,
        K::MultipartReply => stats::read_stats_reply,
        K::BarrierRequest => common::read_barrier_request,
        K::BarrierReply => common::read_barrier_reply,
        K::QueueGetConfigRequest => read_queue_get_config_request,
        K::QueueGetConfigReply => read_queue_get_config_reply,
        _ => return None,
    };
    Some(decoder)
}

/// 1.0 port numbers are 16 bit wide
pub(crate) fn port_u16(port: u32, what: &'static str) -> Result<u16> {
    if port > u32::from(u16::max_value()) {
        return Err(Error::Oversized(what));
    }
    Ok(port as u16)
}

pub fn read_port(r: &mut Reader) -> Result<Port> {
    let port_no = u32::from(r.read_u16()?);
    let hw_addr = r.read_mac()?;
    let v = Version::V1_0;
    Ok(Port {
        port_no,
        hw_addr,
        name: r.read_fixed_string(NAME_LEN)?,
        config: PortConfig::from_raw(r.read_u32()?, v),
        state: PortState::from_raw(r.read_u32()?, v),
        curr: PortFeatures::from_raw(r.read_u32()?, v),
        advertised: PortFeatures::from_raw(r.read_u32()?, v),
        supported: PortFeatures::from_raw(r.read_u32()?, v),
        peer: PortFeatures::from_raw(r.read_u32()?, v),
        curr_speed: 0,
        max_speed: 0,
    })
}

pub fn write_port(port: &Port, out: &mut Vec<u8>) -> Result<()> {
    let v = Version::V1_0;
    out.write_u16::<NetworkEndian>(port_u16(port.port_no, "port number")?)?;
    out.extend_from_slice(&port.hw_addr);
    write_fixed_string(out, &port.name, NAME_LEN)?;
    out.write_u32::<NetworkEndian>(port.config.to_raw(v))?;
    out.write_u32::<NetworkEndian>(port.state.to_raw(v))?;
    for features in &[&port.curr, &port.advertised, &port.supported, &port.peer] {
        out.write_u32::<NetworkEndian>(features.to_raw(v))?;
    }
    Ok(())
}

fn read_features_reply(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let datapath_id = r.read_u64()?;
    let n_buffers = r.read_u32()?;
    let n_tables = r.read_u8()?;
    r.skip_padding(3)?;
    Ok(Message::FeaturesReply(FeaturesReply {
        datapath_id,
        n_buffers,
        n_tables,
        auxiliary_id: 0,
        capabilities: Capabilities::from_raw(r.read_u32()?, ctx.version),
        actions: r.read_u32()?,
        ports: r.read_repeated(read_port)?,
    }))
}

fn read_packet_in(_: &Context, r: &mut Reader) -> Result<Message> {
    let buffer_id = r.read_u32()?;
    let total_len = r.read_u16()?;
    let in_port = r.read_u16()?;
    let reason = PacketInReason::from_raw(r.read_u8()?);
    r.skip_padding(1)?;
    Ok(Message::PacketIn(PacketIn {
        buffer_id,
        total_len,
        reason,
        table_id: 0,
        cookie: 0,
        in_port,
        matches: vec![],
        data: r.rest().to_vec(),
    }))
}

fn read_flow_removed(_: &Context, r: &mut Reader) -> Result<Message> {
    let matches = Match::V10(read_match(r)?);
    let cookie = r.read_u64()?;
    let priority = r.read_u16()?;
    let reason = FlowRemovedReason::from_raw(r.read_u8()?);
    r.skip_padding(1)?;
    let duration_sec = r.read_u32()?;
    let duration_nsec = r.read_u32()?;
    let idle_timeout = r.read_u16()?;
    r.skip_padding(2)?;
    Ok(Message::FlowRemoved(FlowRemoved {
        cookie,
        priority,
        reason,
        table_id: 0,
        duration_sec,
        duration_nsec,
        idle_timeout,
        hard_timeout: 0,
        packet_count: r.read_u64()?,
        byte_count: r.read_u64()?,
        matches,
    }))
}

fn read_port_status(_: &Context, r: &mut Reader) -> Result<Message> {
    let reason = PortReason::from_raw(r.read_u8()?);
    r.skip_padding(7)?;
    Ok(Message::PortStatus(PortStatus {
        reason,
        desc: read_port(r)?,
    }))
}

fn read_packet_out(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let buffer_id = r.read_u32()?;
    let in_port = u32::from(r.read_u16()?);
    let actions_len = r.read_u16()? as usize;
    let mut actions = r.sub(actions_len)?;
    Ok(Message::PacketOut(PacketOut {
        buffer_id,
        in_port,
        actions: read_actions(ctx, &mut actions)?,
        data: r.rest().to_vec(),
    }))
}

fn read_flow_mod(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let matches = Match::V10(read_match(r)?);
    let cookie = r.read_u64()?;
    let command = FlowModCommand::from_raw(r.read_u16()?);
    let idle_timeout = r.read_u16()?;
    let hard_timeout = r.read_u16()?;
    let priority = r.read_u16()?;
    let buffer_id = r.read_u32()?;
    let out_port = u32::from(r.read_u16()?);
    let flags = FlowModFlags::from_raw(u32::from(r.read_u16()?), ctx.version);
    Ok(Message::FlowMod(FlowMod {
        cookie,
        cookie_mask: 0,
        table_id: 0,
        command,
        idle_timeout,
        hard_timeout,
        priority,
        buffer_id,
        out_port,
        out_group: 0,
        flags,
        importance: 0,
        matches,
        instructions: vec![],
        actions: read_actions(ctx, r)?,
    }))
}

fn read_port_mod(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let port_no = u32::from(r.read_u16()?);
    let hw_addr = r.read_mac()?;
    let port_mod = PortMod {
        port_no,
        hw_addr,
        config: PortConfig::from_raw(r.read_u32()?, ctx.version),
        mask: PortConfig::from_raw(r.read_u32()?, ctx.version),
        advertise: PortFeatures::from_raw(r.read_u32()?, ctx.version),
    };
    r.skip_padding(4)?;
    Ok(Message::PortMod(port_mod))
}

fn read_queue_get_config_request(_: &Context, r: &mut Reader) -> Result<Message> {
    let port = u32::from(r.read_u16()?);
    r.skip_padding(2)?;
    Ok(Message::QueueGetConfigRequest(QueueGetConfigRequest { port }))
}

fn read_queue_get_config_reply(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let port = u32::from(r.read_u16()?);
    r.skip_padding(6)?;
    Ok(Message::QueueGetConfigReply(QueueGetConfigReply {
        port,
        queues: r.read_repeated(|r| read_packet_queue(ctx, r))?,
    }))
}

/// Encodes the body of `message` in the 1.0 layout
pub fn write_body(message: &Message, out: &mut Vec<u8>) -> Result<()> {
    let version = Version::V1_0;
    if common::write_body(version, message, out)? {
        return Ok(());
    }
    match *message {
        Message::FeaturesReply(ref features) => {
            out.write_u64::<NetworkEndian>(features.datapath_id)?;
            out.write_u32::<NetworkEndian>(features.n_buffers)?;
            out.write_u8(features.n_tables)?;
            write_padding(out, 3);
            out.write_u32::<NetworkEndian>(features.capabilities.to_raw(version))?;
            out.write_u32::<NetworkEndian>(features.actions)?;
            for port in &features.ports {
                write_port(port, out)?;
            }
        }
        Message::PacketIn(ref packet_in) => {
            out.write_u32::<NetworkEndian>(packet_in.buffer_id)?;
            out.write_u16::<NetworkEndian>(packet_in.total_len)?;
            out.write_u16::<NetworkEndian>(packet_in.in_port)?;
            out.write_u8(packet_in.reason.raw())?;
            write_padding(out, 1);
            out.extend_from_slice(&packet_in.data);
        }
        Message::FlowRemoved(ref removed) => {
            write_match(v10_match(&removed.matches)?, out)?;
            out.write_u64::<NetworkEndian>(removed.cookie)?;
            out.write_u16::<NetworkEndian>(removed.priority)?;
            out.write_u8(removed.reason.raw())?;
            write_padding(out, 1);
            out.write_u32::<NetworkEndian>(removed.duration_sec)?;
            out.write_u32::<NetworkEndian>(removed.duration_nsec)?;
            out.write_u16::<NetworkEndian>(removed.idle_timeout)?;
            write_padding(out, 2);
            out.write_u64::<NetworkEndian>(removed.packet_count)?;
            out.write_u64::<NetworkEndian>(removed.byte_count)?;
        }
        Message::PortStatus(ref status) => {
            out.write_u8(status.reason.raw())?;
            write_padding(out, 7);
            write_port(&status.desc, out)?;
        }
        Message::PacketOut(ref packet_out) => {
            out.write_u32::<NetworkEndian>(packet_out.buffer_id)?;
            out.write_u16::<NetworkEndian>(port_u16(packet_out.in_port, "packet out port")?)?;
            let mut actions = vec![];
            write_actions(&packet_out.actions, &mut actions)?;
            out.write_u16::<NetworkEndian>(length_u16(actions.len(), "packet out actions")?)?;
            out.extend_from_slice(&actions);
            out.extend_from_slice(&packet_out.data);
        }
        Message::FlowMod(ref flow_mod) => {
            write_match(v10_match(&flow_mod.matches)?, out)?;
            out.write_u64::<NetworkEndian>(flow_mod.cookie)?;
            out.write_u16::<NetworkEndian>(flow_mod.command.raw())?;
            out.write_u16::<NetworkEndian>(flow_mod.idle_timeout)?;
            out.write_u16::<NetworkEndian>(flow_mod.hard_timeout)?;
            out.write_u16::<NetworkEndian>(flow_mod.priority)?;
            out.write_u32::<NetworkEndian>(flow_mod.buffer_id)?;
            out.write_u16::<NetworkEndian>(port_u16(flow_mod.out_port, "flow mod out port")?)?;
            out.write_u16::<NetworkEndian>(flow_mod.flags.to_raw(version) as u16)?;
            write_actions(&flow_mod.actions, out)?;
        }
        Message::PortMod(ref port_mod) => {
            out.write_u16::<NetworkEndian>(port_u16(port_mod.port_no, "port number")?)?;
            out.extend_from_slice(&port_mod.hw_addr);
            out.write_u32::<NetworkEndian>(port_mod.config.to_raw(version))?;
            out.write_u32::<NetworkEndian>(port_mod.mask.to_raw(version))?;
            out.write_u32::<NetworkEndian>(port_mod.advertise.to_raw(version))?;
            write_padding(out, 4);
        }
        Message::MultipartRequest(ref req) => stats::write_stats_request(req, out)?,
        Message::MultipartReply(ref reply) => stats::write_stats_reply(reply, out)?,
        Message::QueueGetConfigRequest(ref req) => {
            out.write_u16::<NetworkEndian>(port_u16(req.port, "queue port")?)?;
            write_padding(out, 2);
        }
        Message::QueueGetConfigReply(ref reply) => {
            out.write_u16::<NetworkEndian>(port_u16(reply.port, "queue port")?)?;
            write_padding(out, 6);
            for queue in &reply.queues {
                write_packet_queue(version, queue, out)?;
            }
        }
        _ => {
            return Err(Error::NotInVersion {
                what: "message",
                version,
            })
        }
    }
    Ok(())
}
