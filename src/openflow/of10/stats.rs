/*!
Statistics requests and replies of OpenFlow 1.0

They share the body model of the OXM family multipart messages. The
1.0 header has no padding after the flags and the vendor body has no
subtype.
*/

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::messages::multipart::*;
use crate::openflow::messages::{Match, Message};
use crate::openflow::of10::action::{read_actions, write_actions};
use crate::openflow::of10::match_v10::{read_match, v10_match, write_match};
use crate::openflow::of10::port_u16;
use crate::openflow::of13::multipart::{read_aggregate, read_desc, write_aggregate, write_desc, MULTIPART_MORE};
use crate::openflow::of13::structs::record;
use crate::openflow::registry::{
    Context, ExperimenterScope, MultipartReplyDecoder, MultipartRequestDecoder, Registry,
};
use crate::openflow::serialize::{length_placeholder, patch_length, write_fixed_string, write_padding};
use crate::openflow::fields::WildcardsV10;
use crate::openflow::version::Version;

const TABLE_NAME_LEN: usize = 32;
const TABLE_STATS_LEN: usize = 64;

pub const STATS_TYPES: &[u16] = &[
    MULTIPART_DESC,
    MULTIPART_FLOW,
    MULTIPART_AGGREGATE,
    MULTIPART_TABLE,
    MULTIPART_PORT_STATS,
    MULTIPART_QUEUE,
    MULTIPART_EXPERIMENTER,
];

pub fn register(registry: &mut Registry) {
    for &code in STATS_TYPES {
        let (request, reply): (MultipartRequestDecoder, MultipartReplyDecoder) = match code {
            MULTIPART_DESC => (desc_request, desc_reply),
            MULTIPART_FLOW => (flow_request, flow_reply),
            MULTIPART_AGGREGATE => (aggregate_request, aggregate_reply),
            MULTIPART_TABLE => (table_request, table_reply),
            MULTIPART_PORT_STATS => (port_request, port_reply),
            MULTIPART_QUEUE => (queue_request, queue_reply),
            _ => (vendor_request, vendor_reply),
        };
        registry.register_multipart_request(Version::V1_0, code, request);
        registry.register_multipart_reply(Version::V1_0, code, reply);
    }
}

fn not_in_version() -> Error {
    Error::NotInVersion {
        what: "stats type",
        version: Version::V1_0,
    }
}

fn check_type(code: u16, opaque: bool) -> Result<()> {
    if opaque || STATS_TYPES.contains(&code) {
        Ok(())
    }
    else {
        Err(not_in_version())
    }
}

fn read_header(r: &mut Reader) -> Result<(u16, bool)> {
    let typ = r.read_u16()?;
    let flags = r.read_u16()?;
    Ok((typ, flags & MULTIPART_MORE != 0))
}

fn write_header(code: u16, more: bool, out: &mut Vec<u8>) -> Result<()> {
    out.write_u16::<NetworkEndian>(code)?;
    out.write_u16::<NetworkEndian>(if more { MULTIPART_MORE } else { 0 })?;
    Ok(())
}

pub fn read_stats_request(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let (typ, more) = read_header(r)?;
    let body = match ctx.registry.lookup_multipart_request(ctx.version, typ) {
        Some(decoder) => decoder(ctx, r)?,
        None => {
            debug!("No stats request decoder for type {}", typ);
            MultipartRequestBody::Opaque {
                typ,
                data: r.rest().to_vec(),
            }
        }
    };
    Ok(Message::MultipartRequest(MultipartRequest { more, body }))
}

pub fn read_stats_reply(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let (typ, more) = read_header(r)?;
    let body = match ctx.registry.lookup_multipart_reply(ctx.version, typ) {
        Some(decoder) => decoder(ctx, r)?,
        None => {
            debug!("No stats reply decoder for type {}", typ);
            MultipartReplyBody::Opaque {
                typ,
                data: r.rest().to_vec(),
            }
        }
    };
    Ok(Message::MultipartReply(MultipartReply { more, body }))
}

fn desc_request(_: &Context, _: &mut Reader) -> Result<MultipartRequestBody> {
    Ok(MultipartRequestBody::Desc)
}

fn table_request(_: &Context, _: &mut Reader) -> Result<MultipartRequestBody> {
    Ok(MultipartRequestBody::Table)
}

fn read_flow_stats_request(r: &mut Reader) -> Result<FlowStatsRequest> {
    let matches = Match::V10(read_match(r)?);
    let table_id = r.read_u8()?;
    r.skip_padding(1)?;
    Ok(FlowStatsRequest {
        table_id,
        out_port: u32::from(r.read_u16()?),
        out_group: 0,
        cookie: 0,
        cookie_mask: 0,
        matches,
    })
}

fn flow_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    Ok(MultipartRequestBody::Flow(read_flow_stats_request(r)?))
}

fn aggregate_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    Ok(MultipartRequestBody::Aggregate(read_flow_stats_request(r)?))
}

fn port_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let port_no = u32::from(r.read_u16()?);
    r.skip_padding(6)?;
    Ok(MultipartRequestBody::PortStats { port_no })
}

fn queue_request(_: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let port_no = u32::from(r.read_u16()?);
    r.skip_padding(2)?;
    Ok(MultipartRequestBody::Queue {
        port_no,
        queue_id: r.read_u32()?,
    })
}

fn read_vendor(ctx: &Context, scope: ExperimenterScope, r: &mut Reader) -> Result<MultipartExperimenter> {
    let experimenter = r.read_u32()?;
    let data = r.rest();
    Ok(MultipartExperimenter {
        experimenter,
        exp_type: 0,
        body: ctx.experimenter(scope, experimenter, 0, data)?,
    })
}

fn vendor_request(ctx: &Context, r: &mut Reader) -> Result<MultipartRequestBody> {
    let body = read_vendor(ctx, ExperimenterScope::MultipartRequest, r)?;
    Ok(MultipartRequestBody::Experimenter(body))
}

fn desc_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Desc(read_desc(r)?))
}

fn read_flow_stats(ctx: &Context, r: &mut Reader) -> Result<FlowStats> {
    let len = r.read_u16()?;
    let mut body = record(r, len, 2)?;
    let table_id = body.read_u8()?;
    body.skip_padding(1)?;
    let matches = Match::V10(read_match(&mut body)?);
    let duration_sec = body.read_u32()?;
    let duration_nsec = body.read_u32()?;
    let priority = body.read_u16()?;
    let idle_timeout = body.read_u16()?;
    let hard_timeout = body.read_u16()?;
    body.skip_padding(6)?;
    Ok(FlowStats {
        table_id,
        duration_sec,
        duration_nsec,
        priority,
        idle_timeout,
        hard_timeout,
        flags: Default::default(),
        importance: 0,
        cookie: body.read_u64()?,
        packet_count: body.read_u64()?,
        byte_count: body.read_u64()?,
        matches,
        instructions: vec![],
        actions: read_actions(ctx, &mut body)?,
    })
}

fn flow_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Flow(
        r.read_repeated(|r| read_flow_stats(ctx, r))?,
    ))
}

fn aggregate_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    Ok(MultipartReplyBody::Aggregate(read_aggregate(r)?))
}

fn table_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let mut tables = vec![];
    while r.remaining() >= TABLE_STATS_LEN {
        let table_id = r.read_u8()?;
        r.skip_padding(3)?;
        tables.push(TableStats {
            table_id,
            name: r.read_fixed_string(TABLE_NAME_LEN)?,
            wildcards: WildcardsV10::from_raw(r.read_u32()?),
            max_entries: r.read_u32()?,
            active_count: r.read_u32()?,
            lookup_count: r.read_u64()?,
            matched_count: r.read_u64()?,
        });
    }
    if !r.is_empty() {
        debug!("Ignoring {} bytes after the table stats", r.remaining());
        r.rest();
    }
    Ok(MultipartReplyBody::Table(tables))
}

fn port_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let ports = r.read_repeated(|r| {
        let port_no = u32::from(r.read_u16()?);
        r.skip_padding(6)?;
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
            duration_sec: 0,
            duration_nsec: 0,
        })
    })?;
    Ok(MultipartReplyBody::PortStats(ports))
}

fn queue_reply(_: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let queues = r.read_repeated(|r| {
        let port_no = u32::from(r.read_u16()?);
        r.skip_padding(2)?;
        Ok(QueueStats {
            port_no,
            queue_id: r.read_u32()?,
            tx_bytes: r.read_u64()?,
            tx_packets: r.read_u64()?,
            tx_errors: r.read_u64()?,
            duration_sec: 0,
            duration_nsec: 0,
        })
    })?;
    Ok(MultipartReplyBody::Queue(queues))
}

fn vendor_reply(ctx: &Context, r: &mut Reader) -> Result<MultipartReplyBody> {
    let body = read_vendor(ctx, ExperimenterScope::MultipartReply, r)?;
    Ok(MultipartReplyBody::Experimenter(body))
}

fn write_vendor(body: &MultipartExperimenter, out: &mut Vec<u8>) -> Result<()> {
    out.write_u32::<NetworkEndian>(body.experimenter)?;
    out.extend_from_slice(&body.body.to_bytes()?);
    Ok(())
}

pub fn write_stats_request(req: &MultipartRequest, out: &mut Vec<u8>) -> Result<()> {
    use crate::openflow::messages::multipart::MultipartRequestBody as Body;

    let code = req.body.code();
    let opaque = match req.body {
        Body::Opaque { .. } => true,
        _ => false,
    };
    check_type(code, opaque)?;
    write_header(code, req.more, out)?;
    match req.body {
        Body::Desc | Body::Table => {}
        Body::Flow(ref flow) | Body::Aggregate(ref flow) => {
            write_match(v10_match(&flow.matches)?, out)?;
            out.write_u8(flow.table_id)?;
            write_padding(out, 1);
            out.write_u16::<NetworkEndian>(port_u16(flow.out_port, "port number")?)?;
        }
        Body::PortStats { port_no } => {
            out.write_u16::<NetworkEndian>(port_u16(port_no, "port number")?)?;
            write_padding(out, 6);
        }
        Body::Queue { port_no, queue_id } => {
            out.write_u16::<NetworkEndian>(port_u16(port_no, "port number")?)?;
            write_padding(out, 2);
            out.write_u32::<NetworkEndian>(queue_id)?;
        }
        Body::Experimenter(ref body) => write_vendor(body, out)?,
        Body::Opaque { ref data, .. } => out.extend_from_slice(data),
        _ => return Err(not_in_version()),
    }
    Ok(())
}

fn write_flow_stats(stats: &FlowStats, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    let at = length_placeholder(out);
    out.write_u8(stats.table_id)?;
    write_padding(out, 1);
    write_match(v10_match(&stats.matches)?, out)?;
    out.write_u32::<NetworkEndian>(stats.duration_sec)?;
    out.write_u32::<NetworkEndian>(stats.duration_nsec)?;
    out.write_u16::<NetworkEndian>(stats.priority)?;
    out.write_u16::<NetworkEndian>(stats.idle_timeout)?;
    out.write_u16::<NetworkEndian>(stats.hard_timeout)?;
    write_padding(out, 6);
    out.write_u64::<NetworkEndian>(stats.cookie)?;
    out.write_u64::<NetworkEndian>(stats.packet_count)?;
    out.write_u64::<NetworkEndian>(stats.byte_count)?;
    write_actions(&stats.actions, out)?;
    patch_length(out, at, start, "flow stats")
}

pub fn write_stats_reply(reply: &MultipartReply, out: &mut Vec<u8>) -> Result<()> {
    use crate::openflow::messages::multipart::MultipartReplyBody as Body;

    let code = reply.body.code();
    let opaque = match reply.body {
        Body::Opaque { .. } => true,
        _ => false,
    };
    check_type(code, opaque)?;
    write_header(code, reply.more, out)?;
    match reply.body {
        Body::Desc(ref desc) => write_desc(desc, out)?,
        Body::Flow(ref flows) => {
            for stats in flows {
                write_flow_stats(stats, out)?;
            }
        }
        Body::Aggregate(ref stats) => write_aggregate(stats, out)?,
        Body::Table(ref tables) => {
            for table in tables {
                out.write_u8(table.table_id)?;
                write_padding(out, 3);
                write_fixed_string(out, &table.name, TABLE_NAME_LEN)?;
                out.write_u32::<NetworkEndian>(table.wildcards.to_raw())?;
                out.write_u32::<NetworkEndian>(table.max_entries)?;
                out.write_u32::<NetworkEndian>(table.active_count)?;
                out.write_u64::<NetworkEndian>(table.lookup_count)?;
                out.write_u64::<NetworkEndian>(table.matched_count)?;
            }
        }
        Body::PortStats(ref ports) => {
            for port in ports {
                out.write_u16::<NetworkEndian>(port_u16(port.port_no, "port number")?)?;
                write_padding(out, 6);
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
            }
        }
        Body::Queue(ref queues) => {
            for queue in queues {
                out.write_u16::<NetworkEndian>(port_u16(queue.port_no, "port number")?)?;
                write_padding(out, 2);
                out.write_u32::<NetworkEndian>(queue.queue_id)?;
                out.write_u64::<NetworkEndian>(queue.tx_bytes)?;
                out.write_u64::<NetworkEndian>(queue.tx_packets)?;
                out.write_u64::<NetworkEndian>(queue.tx_errors)?;
            }
        }
        Body::Experimenter(ref body) => write_vendor(body, out)?,
        Body::Opaque { ref data, .. } => out.extend_from_slice(data),
        _ => return Err(not_in_version()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openflow::messages::action::Action;
    use crate::openflow::messages::MatchV10;

    fn decode(f: fn(&Context, &mut Reader) -> Result<Message>, bytes: &[u8]) -> Message {
        let mut registry = Registry::new();
        register(&mut registry);
        let ctx = Context::new(&registry, Version::V1_0);
        let mut r = Reader::new(bytes);
        let msg = f(&ctx, &mut r).unwrap();
        r.finish().unwrap();
        msg
    }

    fn flow_stats_bytes() -> Vec<u8> {
        let mut bytes = vec![0x00, 0x01, 0x00, 0x01]; // flow, more
        bytes.extend_from_slice(&[0x00, 0x60, 0x00, 0x00]); // length 96, table 0
        let mut m = vec![0; 40];
        m[0..4].copy_from_slice(&[0x00, 0x38, 0x20, 0xff]);
        bytes.extend_from_slice(&m);
        bytes.extend_from_slice(&[
            0, 0, 0, 10, 0, 0, 0, 0, // duration
            0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0, 0, 0, 0, 0, 0, // priority, timeouts, pad
            0, 0, 0, 0, 0, 0, 0, 1, // cookie
            0, 0, 0, 0, 0, 0, 0, 5, // packets
            0, 0, 0, 0, 0, 0, 1, 0, // bytes
            0x00, 0x00, 0x00, 0x08, 0x00, 0x01, 0x00, 0x00, // output port 1
        ]);
        bytes
    }

    #[test]
    fn flow_stats_reply() {
        let bytes = flow_stats_bytes();
        let msg = decode(read_stats_reply, &bytes);
        match msg {
            Message::MultipartReply(ref reply) => {
                assert!(reply.more);
                match reply.body {
                    MultipartReplyBody::Flow(ref flows) => {
                        assert_eq!(1, flows.len());
                        assert_eq!(0x8000, flows[0].priority);
                        assert_eq!(5, flows[0].packet_count);
                        assert_eq!(vec![Action::Output { port: 1, max_len: 0 }], flows[0].actions);
                        match flows[0].matches {
                            Match::V10(ref m) => assert!(m.wildcards.in_port),
                            ref other => panic!("unexpected {:?}", other),
                        }
                    }
                    ref other => panic!("unexpected {:?}", other),
                }
            }
            ref other => panic!("unexpected {:?}", other),
        }
        let mut out = vec![];
        match msg {
            Message::MultipartReply(ref reply) => write_stats_reply(reply, &mut out).unwrap(),
            _ => unreachable!(),
        }
        assert_eq!(bytes, out);
    }

    #[test]
    fn table_stats_ignore_short_tail() {
        let mut bytes = vec![0x00, 0x03, 0x00, 0x00];
        let mut table = vec![0; TABLE_STATS_LEN];
        table[4..9].copy_from_slice(b"table");
        table[43] = 0x10; // max_entries
        bytes.extend_from_slice(&table);
        bytes.extend_from_slice(&[0, 0, 0]);
        match decode(read_stats_reply, &bytes) {
            Message::MultipartReply(MultipartReply {
                body: MultipartReplyBody::Table(tables),
                ..
            }) => {
                assert_eq!(1, tables.len());
                assert_eq!("table", tables[0].name);
                assert_eq!(16, tables[0].max_entries);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn queue_stats_request() {
        let bytes = [0x00, 0x05, 0x00, 0x00, 0x00, 0x03, 0, 0, 0xff, 0xff, 0xff, 0xff];
        let msg = decode(read_stats_request, &bytes);
        assert_eq!(
            Message::MultipartRequest(MultipartRequest {
                more: false,
                body: MultipartRequestBody::Queue {
                    port_no: 3,
                    queue_id: 0xffff_ffff
                },
            }),
            msg
        );
    }

    #[test]
    fn oxm_only_bodies_rejected() {
        let req = MultipartRequest {
            more: false,
            body: MultipartRequestBody::GroupDesc,
        };
        match write_stats_request(&req, &mut vec![]) {
            Err(Error::NotInVersion { what, .. }) => assert_eq!("stats type", what),
            other => panic!("unexpected {:?}", other),
        }
        let req = MultipartRequest {
            more: false,
            body: MultipartRequestBody::Flow(FlowStatsRequest {
                table_id: 0xff,
                out_port: 0xffff,
                out_group: 0,
                cookie: 0,
                cookie_mask: 0,
                matches: Match::Oxm(vec![]),
            }),
        };
        assert!(write_stats_request(&req, &mut vec![]).is_err());
        let req = MultipartRequest {
            more: false,
            body: MultipartRequestBody::Flow(FlowStatsRequest {
                table_id: 0xff,
                out_port: 0xffff,
                out_group: 0,
                cookie: 0,
                cookie_mask: 0,
                matches: Match::V10(MatchV10::default()),
            }),
        };
        let mut out = vec![];
        write_stats_request(&req, &mut out).unwrap();
        assert_eq!(4 + 40 + 4, out.len());
    }

    #[test]
    fn port_numbers_are_16_bit() {
        let req = MultipartRequest {
            more: false,
            body: MultipartRequestBody::PortStats { port_no: 0xffff_fffc },
        };
        match write_stats_request(&req, &mut vec![]) {
            Err(Error::Oversized(what)) => assert_eq!("port number", what),
            other => panic!("unexpected {:?}", other),
        }
        let req = MultipartRequest {
            more: false,
            body: MultipartRequestBody::PortStats { port_no: 0xfffc },
        };
        let mut out = vec![];
        write_stats_request(&req, &mut out).unwrap();
        assert_eq!(vec![0x00, 0x04, 0x00, 0x00, 0xff, 0xfc, 0, 0, 0, 0, 0, 0], out);
    }
}
