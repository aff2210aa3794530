/*!
Message bodies of OpenFlow 1.3, 1.4 and 1.5

The three versions share their layouts for every message type listed
in their type tables. The few differences (flow importance since 1.4,
the meter action of 1.5) are decided on `Context::version`.
*/

pub mod action;
pub mod multipart;
pub mod oxm;
pub mod structs;

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::common;
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::fields::*;
use crate::openflow::messages::*;
use crate::openflow::registry::{Context, MessageDecoder, Registry};
use crate::openflow::serialize::{length_u16, write_padding};
use crate::openflow::version::{message_types, MessageKind, Version};

use self::action::{read_actions, read_instructions, write_actions, write_instructions};
use self::oxm::{read_match, write_match};
use self::structs::*;

/// Registers the message and multipart decoders of `version`
pub fn register(registry: &mut Registry, version: Version) {
    for &(code, kind) in message_types(version) {
        registry.register_message(version, code, kind, decoder(kind));
    }
    multipart::register(registry, version);
}

fn decoder(kind: MessageKind) -> MessageDecoder {
    use crate::openflow::version::MessageKind as K;

    match kind {
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
        K::GroupMod => read_group_mod,
        K::PortMod => read_port_mod,
        K::TableMod => read_table_mod,
        K::MultipartRequest => multipart::read_multipart_request,
        K::MultipartReply => multipart::read_multipart_reply,
        K::BarrierRequest => common::read_barrier_request,
        K::BarrierReply => common::read_barrier_reply,
        K::QueueGetConfigRequest => read_queue_get_config_request,
        K::QueueGetConfigReply => read_queue_get_config_reply,
        K::RoleRequest => read_role_request,
        K::RoleReply => read_role_reply,
        K::GetAsyncRequest => read_get_async_request,
        K::GetAsyncReply => read_get_async_reply,
        K::SetAsync => read_set_async,
        K::MeterMod => read_meter_mod,
    }
}

/// The OXM entries of `matches`, a 1.0 match has no representation here
pub fn oxm_match(version: Version, matches: &Match) -> Result<&[MatchEntry]> {
    match *matches {
        Match::Oxm(ref entries) => Ok(entries),
        Match::V10(_) => Err(Error::NotInVersion {
            what: "1.0 match",
            version,
        }),
    }
}

fn read_features_reply(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let datapath_id = r.read_u64()?;
    let n_buffers = r.read_u32()?;
    let n_tables = r.read_u8()?;
    let auxiliary_id = r.read_u8()?;
    r.skip_padding(2)?;
    Ok(Message::FeaturesReply(FeaturesReply {
        datapath_id,
        n_buffers,
        n_tables,
        auxiliary_id,
        capabilities: Capabilities::from_raw(r.read_u32()?, ctx.version),
        actions: r.read_u32()?,
        ports: vec![],
    }))
}

fn read_packet_in(_: &Context, r: &mut Reader) -> Result<Message> {
    let buffer_id = r.read_u32()?;
    let total_len = r.read_u16()?;
    let reason = PacketInReason::from_raw(r.read_u8()?);
    let table_id = r.read_u8()?;
    let cookie = r.read_u64()?;
    let matches = read_match(r)?;
    r.skip_padding(2)?;
    Ok(Message::PacketIn(PacketIn {
        buffer_id,
        total_len,
        reason,
        table_id,
        cookie,
        in_port: 0,
        matches,
        data: r.rest().to_vec(),
    }))
}

fn read_flow_removed(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::FlowRemoved(FlowRemoved {
        cookie: r.read_u64()?,
        priority: r.read_u16()?,
        reason: FlowRemovedReason::from_raw(r.read_u8()?),
        table_id: r.read_u8()?,
        duration_sec: r.read_u32()?,
        duration_nsec: r.read_u32()?,
        idle_timeout: r.read_u16()?,
        hard_timeout: r.read_u16()?,
        packet_count: r.read_u64()?,
        byte_count: r.read_u64()?,
        matches: Match::Oxm(read_match(r)?),
    }))
}

fn read_port_status(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let reason = PortReason::from_raw(r.read_u8()?);
    r.skip_padding(7)?;
    Ok(Message::PortStatus(PortStatus {
        reason,
        desc: read_port(ctx.version, r)?,
    }))
}

fn read_packet_out(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let buffer_id = r.read_u32()?;
    let in_port = r.read_u32()?;
    let actions_len = r.read_u16()? as usize;
    r.skip_padding(6)?;
    let mut actions = r.sub(actions_len)?;
    Ok(Message::PacketOut(PacketOut {
        buffer_id,
        in_port,
        actions: read_actions(ctx, &mut actions)?,
        data: r.rest().to_vec(),
    }))
}

fn read_flow_mod(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let cookie = r.read_u64()?;
    let cookie_mask = r.read_u64()?;
    let table_id = r.read_u8()?;
    let command = FlowModCommand::from_raw(u16::from(r.read_u8()?));
    let idle_timeout = r.read_u16()?;
    let hard_timeout = r.read_u16()?;
    let priority = r.read_u16()?;
    let buffer_id = r.read_u32()?;
    let out_port = r.read_u32()?;
    let out_group = r.read_u32()?;
    let flags = FlowModFlags::from_raw(u32::from(r.read_u16()?), ctx.version);
    let importance = if ctx.version >= Version::V1_4 {
        r.read_u16()?
    }
    else {
        r.skip_padding(2)?;
        0
    };
    let matches = Match::Oxm(read_match(r)?);
    Ok(Message::FlowMod(FlowMod {
        cookie,
        cookie_mask,
        table_id,
        command,
        idle_timeout,
        hard_timeout,
        priority,
        buffer_id,
        out_port,
        out_group,
        flags,
        importance,
        matches,
        instructions: read_instructions(ctx, r)?,
        actions: vec![],
    }))
}

fn read_group_mod(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let command = GroupModCommand::from_raw(r.read_u16()?);
    let group_type = GroupType::from_raw(r.read_u8()?);
    r.skip_padding(1)?;
    Ok(Message::GroupMod(GroupMod {
        command,
        group_type,
        group_id: r.read_u32()?,
        buckets: read_buckets(ctx, r)?,
    }))
}

fn read_port_mod(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let port_no = r.read_u32()?;
    r.skip_padding(4)?;
    let hw_addr = r.read_mac()?;
    r.skip_padding(2)?;
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

fn read_table_mod(_: &Context, r: &mut Reader) -> Result<Message> {
    let table_id = r.read_u8()?;
    r.skip_padding(3)?;
    Ok(Message::TableMod(TableMod {
        table_id,
        config: r.read_u32()?,
    }))
}

fn read_queue_get_config_request(_: &Context, r: &mut Reader) -> Result<Message> {
    let port = r.read_u32()?;
    r.skip_padding(4)?;
    Ok(Message::QueueGetConfigRequest(QueueGetConfigRequest { port }))
}

fn read_queue_get_config_reply(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let port = r.read_u32()?;
    r.skip_padding(4)?;
    Ok(Message::QueueGetConfigReply(QueueGetConfigReply {
        port,
        queues: r.read_repeated(|r| read_packet_queue(ctx, r))?,
    }))
}

fn read_role(r: &mut Reader) -> Result<Role> {
    let role = ControllerRole::from_raw(r.read_u32()?);
    r.skip_padding(4)?;
    Ok(Role {
        role,
        generation_id: r.read_u64()?,
    })
}

fn read_role_request(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::RoleRequest(read_role(r)?))
}

fn read_role_reply(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::RoleReply(read_role(r)?))
}

fn read_get_async_request(_: &Context, _: &mut Reader) -> Result<Message> {
    Ok(Message::GetAsyncRequest)
}

fn read_async_config(r: &mut Reader) -> Result<AsyncConfig> {
    let mut config = AsyncConfig::default();
    for mask in config
        .packet_in_mask
        .iter_mut()
        .chain(config.port_status_mask.iter_mut())
        .chain(config.flow_removed_mask.iter_mut())
    {
        *mask = r.read_u32()?;
    }
    Ok(config)
}

fn read_get_async_reply(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::GetAsyncReply(read_async_config(r)?))
}

fn read_set_async(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::SetAsync(read_async_config(r)?))
}

fn read_meter_mod(ctx: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::MeterMod(MeterMod {
        command: MeterModCommand::from_raw(r.read_u16()?),
        flags: MeterFlags::from_raw(u32::from(r.read_u16()?), ctx.version),
        meter_id: r.read_u32()?,
        bands: read_meter_bands(ctx, r)?,
    }))
}

fn write_flow_mod(version: Version, flow_mod: &FlowMod, out: &mut Vec<u8>) -> Result<()> {
    let command = flow_mod.command.raw();
    if command > u16::from(u8::max_value()) {
        return Err(Error::Oversized("flow mod command"));
    }
    out.write_u64::<NetworkEndian>(flow_mod.cookie)?;
    out.write_u64::<NetworkEndian>(flow_mod.cookie_mask)?;
    out.write_u8(flow_mod.table_id)?;
    out.write_u8(command as u8)?;
    out.write_u16::<NetworkEndian>(flow_mod.idle_timeout)?;
    out.write_u16::<NetworkEndian>(flow_mod.hard_timeout)?;
    out.write_u16::<NetworkEndian>(flow_mod.priority)?;
    out.write_u32::<NetworkEndian>(flow_mod.buffer_id)?;
    out.write_u32::<NetworkEndian>(flow_mod.out_port)?;
    out.write_u32::<NetworkEndian>(flow_mod.out_group)?;
    out.write_u16::<NetworkEndian>(flow_mod.flags.to_raw(version) as u16)?;
    if version >= Version::V1_4 {
        out.write_u16::<NetworkEndian>(flow_mod.importance)?;
    }
    else {
        write_padding(out, 2);
    }
    write_match(oxm_match(version, &flow_mod.matches)?, out)?;
    write_instructions(version, &flow_mod.instructions, out)
}

fn write_async_config(config: &AsyncConfig, out: &mut Vec<u8>) -> Result<()> {
    for mask in config
        .packet_in_mask
        .iter()
        .chain(config.port_status_mask.iter())
        .chain(config.flow_removed_mask.iter())
    {
        out.write_u32::<NetworkEndian>(*mask)?;
    }
    Ok(())
}

/// Encodes the body of `message`. The caller has already checked that
/// the message type exists in `version`.
pub fn write_body(version: Version, message: &Message, out: &mut Vec<u8>) -> Result<()> {
    if common::write_body(version, message, out)? {
        return Ok(());
    }
    match *message {
        Message::FeaturesReply(ref features) => {
            out.write_u64::<NetworkEndian>(features.datapath_id)?;
            out.write_u32::<NetworkEndian>(features.n_buffers)?;
            out.write_u8(features.n_tables)?;
            out.write_u8(features.auxiliary_id)?;
            write_padding(out, 2);
            out.write_u32::<NetworkEndian>(features.capabilities.to_raw(version))?;
            out.write_u32::<NetworkEndian>(features.actions)?;
        }
        Message::PacketIn(ref packet_in) => {
            out.write_u32::<NetworkEndian>(packet_in.buffer_id)?;
            out.write_u16::<NetworkEndian>(packet_in.total_len)?;
            out.write_u8(packet_in.reason.raw())?;
            out.write_u8(packet_in.table_id)?;
            out.write_u64::<NetworkEndian>(packet_in.cookie)?;
            write_match(&packet_in.matches, out)?;
            write_padding(out, 2);
            out.extend_from_slice(&packet_in.data);
        }
        Message::FlowRemoved(ref removed) => {
            out.write_u64::<NetworkEndian>(removed.cookie)?;
            out.write_u16::<NetworkEndian>(removed.priority)?;
            out.write_u8(removed.reason.raw())?;
            out.write_u8(removed.table_id)?;
            out.write_u32::<NetworkEndian>(removed.duration_sec)?;
            out.write_u32::<NetworkEndian>(removed.duration_nsec)?;
            out.write_u16::<NetworkEndian>(removed.idle_timeout)?;
            out.write_u16::<NetworkEndian>(removed.hard_timeout)?;
            out.write_u64::<NetworkEndian>(removed.packet_count)?;
            out.write_u64::<NetworkEndian>(removed.byte_count)?;
            write_match(oxm_match(version, &removed.matches)?, out)?;
        }
        Message::PortStatus(ref status) => {
            out.write_u8(status.reason.raw())?;
            write_padding(out, 7);
            write_port(version, &status.desc, out)?;
        }
        Message::PacketOut(ref packet_out) => {
            out.write_u32::<NetworkEndian>(packet_out.buffer_id)?;
            out.write_u32::<NetworkEndian>(packet_out.in_port)?;
            let mut actions = vec![];
            write_actions(version, &packet_out.actions, &mut actions)?;
            out.write_u16::<NetworkEndian>(length_u16(actions.len(), "packet out actions")?)?;
            write_padding(out, 6);
            out.extend_from_slice(&actions);
            out.extend_from_slice(&packet_out.data);
        }
        Message::FlowMod(ref flow_mod) => write_flow_mod(version, flow_mod, out)?,
        Message::GroupMod(ref group_mod) => {
            out.write_u16::<NetworkEndian>(group_mod.command.raw())?;
            out.write_u8(group_mod.group_type.raw())?;
            write_padding(out, 1);
            out.write_u32::<NetworkEndian>(group_mod.group_id)?;
            write_buckets(version, &group_mod.buckets, out)?;
        }
        Message::PortMod(ref port_mod) => {
            out.write_u32::<NetworkEndian>(port_mod.port_no)?;
            write_padding(out, 4);
            out.extend_from_slice(&port_mod.hw_addr);
            write_padding(out, 2);
            out.write_u32::<NetworkEndian>(port_mod.config.to_raw(version))?;
            out.write_u32::<NetworkEndian>(port_mod.mask.to_raw(version))?;
            out.write_u32::<NetworkEndian>(port_mod.advertise.to_raw(version))?;
            write_padding(out, 4);
        }
        Message::TableMod(ref table_mod) => {
            out.write_u8(table_mod.table_id)?;
            write_padding(out, 3);
            out.write_u32::<NetworkEndian>(table_mod.config)?;
        }
        Message::MultipartRequest(ref req) => multipart::write_multipart_request(version, req, out)?,
        Message::MultipartReply(ref reply) => multipart::write_multipart_reply(version, reply, out)?,
        Message::QueueGetConfigRequest(ref req) => {
            out.write_u32::<NetworkEndian>(req.port)?;
            write_padding(out, 4);
        }
        Message::QueueGetConfigReply(ref reply) => {
            out.write_u32::<NetworkEndian>(reply.port)?;
            write_padding(out, 4);
            for queue in &reply.queues {
                write_packet_queue(version, queue, out)?;
            }
        }
        Message::RoleRequest(ref role) | Message::RoleReply(ref role) => {
            out.write_u32::<NetworkEndian>(role.role.raw())?;
            write_padding(out, 4);
            out.write_u64::<NetworkEndian>(role.generation_id)?;
        }
        Message::GetAsyncRequest => {}
        Message::GetAsyncReply(ref config) | Message::SetAsync(ref config) => {
            write_async_config(config, out)?
        }
        Message::MeterMod(ref meter_mod) => {
            out.write_u16::<NetworkEndian>(meter_mod.command.raw())?;
            out.write_u16::<NetworkEndian>(meter_mod.flags.to_raw(version) as u16)?;
            out.write_u32::<NetworkEndian>(meter_mod.meter_id)?;
            write_meter_bands(&meter_mod.bands, out)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn decode(version: Version, kind: MessageKind, bytes: &[u8]) -> Message {
        let mut registry = Registry::new();
        register(&mut registry, version);
        let ctx = Context::new(&registry, version);
        let mut r = Reader::new(bytes);
        let msg = decoder(kind)(&ctx, &mut r).unwrap();
        r.finish().unwrap();
        msg
    }

    fn encode(version: Version, msg: &Message) -> Vec<u8> {
        let mut out = vec![];
        write_body(version, msg, &mut out).unwrap();
        out
    }

    fn flow_mod_bytes(importance: u16) -> Vec<u8> {
        let mut bytes = vec![
            0, 0, 0, 0, 0, 0, 0, 0x2a, // cookie
            0, 0, 0, 0, 0, 0, 0, 0, // cookie mask
            0x02, 0x00, 0x00, 0x3c, 0x00, 0x00, 0x01, 0x00, // table, add, idle 60, hard, priority
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // buffer, ports
            0x00, 0x01, // send flow removed
        ];
        bytes.extend_from_slice(&[(importance >> 8) as u8, importance as u8]);
        bytes.extend_from_slice(&[
            0x00, 0x01, 0x00, 0x16, // match
            0x80, 0x00, 0x0a, 0x02, 0x08, 0x00, // eth_type ipv4
            0x80, 0x00, 0x17, 0x08, 0x0a, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, // ipv4_dst/8
            0, 0,
            0x00, 0x04, 0x00, 0x18, 0, 0, 0, 0, // apply actions
            0x00, 0x00, 0x00, 0x10, 0xff, 0xff, 0xff, 0xfd, 0xff, 0xff, 0, 0, 0, 0, 0, 0,
        ]);
        bytes
    }

    #[test]
    fn flow_mod() {
        let bytes = flow_mod_bytes(0);
        let msg = decode(Version::V1_3, MessageKind::FlowMod, &bytes);
        match msg {
            Message::FlowMod(ref flow_mod) => {
                assert_eq!(42, flow_mod.cookie);
                assert_eq!(2, flow_mod.table_id);
                assert_eq!(FlowModCommand::Add, flow_mod.command);
                assert_eq!(60, flow_mod.idle_timeout);
                assert_eq!(256, flow_mod.priority);
                assert!(flow_mod.flags.send_flow_rem);
                assert_eq!(
                    Match::Oxm(vec![
                        MatchEntry::Basic(OxmField::EthType(0x0800)),
                        MatchEntry::Basic(OxmField::Ipv4Dst(Masked::with_mask(
                            Ipv4Addr::new(10, 0, 0, 0),
                            Ipv4Addr::new(255, 0, 0, 0)
                        ))),
                    ]),
                    flow_mod.matches
                );
                assert_eq!(
                    vec![Instruction::ApplyActions(vec![Action::Output {
                        port: 0xffff_fffd,
                        max_len: 0xffff
                    }])],
                    flow_mod.instructions
                );
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(bytes, encode(Version::V1_3, &msg));
    }

    #[test]
    fn flow_mod_importance() {
        let bytes = flow_mod_bytes(0x0102);
        match decode(Version::V1_4, MessageKind::FlowMod, &bytes) {
            Message::FlowMod(ref flow_mod) => assert_eq!(0x0102, flow_mod.importance),
            other => panic!("unexpected {:?}", other),
        }
        match decode(Version::V1_3, MessageKind::FlowMod, &bytes) {
            Message::FlowMod(ref flow_mod) => assert_eq!(0, flow_mod.importance),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn packet_in() {
        let bytes = [
            0xff, 0xff, 0xff, 0xff, 0x00, 0x04, 0x01, 0x00, // buffer, total_len, action, table
            0, 0, 0, 0, 0, 0, 0, 0, // cookie
            0x00, 0x01, 0x00, 0x0c, 0x80, 0x00, 0x00, 0x04, 0, 0, 0, 3, 0, 0, 0, 0, // in_port 3
            0, 0, // pad
            0xde, 0xad, 0xbe, 0xef,
        ];
        let msg = decode(Version::V1_3, MessageKind::PacketIn, &bytes);
        match msg {
            Message::PacketIn(ref packet_in) => {
                assert_eq!(PacketInReason::Action, packet_in.reason);
                assert_eq!(vec![MatchEntry::Basic(OxmField::InPort(3))], packet_in.matches);
                assert_eq!(vec![0xde, 0xad, 0xbe, 0xef], packet_in.data);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(&bytes[..], &encode(Version::V1_3, &msg)[..]);
    }

    #[test]
    fn packet_out_actions_length() {
        let bytes = [
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfd, 0x00, 0x10, 0, 0, 0, 0, 0, 0,
            0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0, 0, 0, 0, 0, 0,
            0x01, 0x02,
        ];
        let msg = decode(Version::V1_3, MessageKind::PacketOut, &bytes);
        match msg {
            Message::PacketOut(ref packet_out) => {
                assert_eq!(1, packet_out.actions.len());
                assert_eq!(vec![1, 2], packet_out.data);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(&bytes[..], &encode(Version::V1_3, &msg)[..]);
    }

    #[test]
    fn features_reply() {
        let bytes = [
            0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0xfe, 0, 0, 0, 0, 0, 0x01, 0x4f, 0, 0, 0, 0,
        ];
        match decode(Version::V1_3, MessageKind::FeaturesReply, &bytes) {
            Message::FeaturesReply(features) => {
                assert_eq!(1, features.datapath_id);
                assert_eq!(256, features.n_buffers);
                assert_eq!(254, features.n_tables);
                assert!(features.capabilities.flow_stats);
                assert!(features.capabilities.group_stats);
                assert!(features.capabilities.port_blocked);
                assert!(!features.capabilities.stp);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn role_and_async() {
        let role = [0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7];
        let msg = decode(Version::V1_3, MessageKind::RoleRequest, &role);
        assert_eq!(
            Message::RoleRequest(Role {
                role: ControllerRole::Master,
                generation_id: 7
            }),
            msg
        );
        assert_eq!(&role[..], &encode(Version::V1_3, &msg)[..]);

        let config = [0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0, 5, 0, 0, 0, 6];
        match decode(Version::V1_3, MessageKind::SetAsync, &config) {
            Message::SetAsync(config) => {
                assert_eq!([1, 2], config.packet_in_mask);
                assert_eq!([5, 6], config.flow_removed_mask);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group_and_meter_mod() {
        let group = [
            0x00, 0x00, 0x01, 0x00, 0, 0, 0, 5, // add select group 5
            0x00, 0x20, 0x00, 0x32, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0,
            0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0, 0, 0, 0, 0, 0,
        ];
        let msg = decode(Version::V1_3, MessageKind::GroupMod, &group);
        match msg {
            Message::GroupMod(ref group_mod) => {
                assert_eq!(GroupType::Select, group_mod.group_type);
                assert_eq!(50, group_mod.buckets[0].weight);
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(&group[..], &encode(Version::V1_3, &msg)[..]);

        let meter = [
            0x00, 0x00, 0x00, 0x05, 0, 0, 0, 1, // add, kbps and burst, meter 1
            0x00, 0x01, 0x00, 0x10, 0, 0, 0x27, 0x10, 0, 0, 0x03, 0xe8, 0, 0, 0, 0,
        ];
        let msg = decode(Version::V1_3, MessageKind::MeterMod, &meter);
        match msg {
            Message::MeterMod(ref meter_mod) => {
                assert!(meter_mod.flags.kbps && meter_mod.flags.burst);
                assert_eq!(
                    vec![MeterBand::Drop {
                        rate: 10_000,
                        burst_size: 1000
                    }],
                    meter_mod.bands
                );
            }
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(&meter[..], &encode(Version::V1_3, &msg)[..]);
    }

    #[test]
    fn of10_match_is_rejected() {
        let removed = FlowRemoved {
            cookie: 0,
            priority: 0,
            reason: FlowRemovedReason::Delete,
            table_id: 0,
            duration_sec: 0,
            duration_nsec: 0,
            idle_timeout: 0,
            hard_timeout: 0,
            packet_count: 0,
            byte_count: 0,
            matches: Match::V10(MatchV10::default()),
        };
        let mut out = vec![];
        match write_body(Version::V1_3, &Message::FlowRemoved(removed), &mut out) {
            Err(Error::NotInVersion { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
