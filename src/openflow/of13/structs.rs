//! Ports, buckets, meter bands and queues of the OXM family

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::fields::{PortConfig, PortFeatures, PortState, VersionedFlags};
use crate::openflow::messages::group::*;
use crate::openflow::messages::switch::Port;
use crate::openflow::of13::action::{read_actions, write_actions};
use crate::openflow::registry::{Context, ExperimenterScope};
use crate::openflow::serialize::{
    length_placeholder, patch_length, write_fixed_string, write_padding, write_tlv,
};
use crate::openflow::version::Version;

pub const PORT_LEN: usize = 64;
const NAME_LEN: usize = 16;

pub fn read_port(version: Version, r: &mut Reader) -> Result<Port> {
    let port_no = r.read_u32()?;
    r.skip_padding(4)?;
    let hw_addr = r.read_mac()?;
    r.skip_padding(2)?;
    Ok(Port {
        port_no,
        hw_addr,
        name: r.read_fixed_string(NAME_LEN)?,
        config: PortConfig::from_raw(r.read_u32()?, version),
        state: PortState::from_raw(r.read_u32()?, version),
        curr: PortFeatures::from_raw(r.read_u32()?, version),
        advertised: PortFeatures::from_raw(r.read_u32()?, version),
        supported: PortFeatures::from_raw(r.read_u32()?, version),
        peer: PortFeatures::from_raw(r.read_u32()?, version),
        curr_speed: r.read_u32()?,
        max_speed: r.read_u32()?,
    })
}

pub fn write_port(version: Version, port: &Port, out: &mut Vec<u8>) -> Result<()> {
    out.write_u32::<NetworkEndian>(port.port_no)?;
    write_padding(out, 4);
    out.extend_from_slice(&port.hw_addr);
    write_padding(out, 2);
    write_fixed_string(out, &port.name, NAME_LEN)?;
    out.write_u32::<NetworkEndian>(port.config.to_raw(version))?;
    out.write_u32::<NetworkEndian>(port.state.to_raw(version))?;
    for features in &[&port.curr, &port.advertised, &port.supported, &port.peer] {
        out.write_u32::<NetworkEndian>(features.to_raw(version))?;
    }
    out.write_u32::<NetworkEndian>(port.curr_speed)?;
    out.write_u32::<NetworkEndian>(port.max_speed)?;
    Ok(())
}

/// Slices a record whose u16 length field was just read and covers
/// `header` bytes read so far
pub fn record<'a>(r: &mut Reader<'a>, len: u16, header: usize) -> Result<Reader<'a>> {
    let len = len as usize;
    if len < header {
        return Err(Error::LengthMismatch {
            declared: len,
            consumed: header,
        });
    }
    r.sub(len - header)
}

pub fn read_bucket(ctx: &Context, r: &mut Reader) -> Result<Bucket> {
    let len = r.read_u16()?;
    let mut body = record(r, len, 2)?;
    let weight = body.read_u16()?;
    let watch_port = body.read_u32()?;
    let watch_group = body.read_u32()?;
    body.skip_padding(4)?;
    Ok(Bucket {
        weight,
        watch_port,
        watch_group,
        actions: read_actions(ctx, &mut body)?,
    })
}

pub fn read_buckets(ctx: &Context, r: &mut Reader) -> Result<Vec<Bucket>> {
    r.read_repeated(|r| read_bucket(ctx, r))
}

pub fn write_buckets(version: Version, buckets: &[Bucket], out: &mut Vec<u8>) -> Result<()> {
    for bucket in buckets {
        let start = out.len();
        let at = length_placeholder(out);
        out.write_u16::<NetworkEndian>(bucket.weight)?;
        out.write_u32::<NetworkEndian>(bucket.watch_port)?;
        out.write_u32::<NetworkEndian>(bucket.watch_group)?;
        write_padding(out, 4);
        write_actions(version, &bucket.actions, out)?;
        patch_length(out, at, start, "bucket")?;
    }
    Ok(())
}

pub fn read_meter_band(ctx: &Context, r: &mut Reader) -> Result<MeterBand> {
    let (typ, mut body) = r.read_tlv()?;
    let rate = body.read_u32()?;
    let burst_size = body.read_u32()?;
    let band = match typ {
        METER_BAND_DROP => {
            body.skip_padding(4)?;
            MeterBand::Drop { rate, burst_size }
        }
        METER_BAND_DSCP_REMARK => {
            let prec_level = body.read_u8()?;
            body.skip_padding(3)?;
            MeterBand::DscpRemark {
                rate,
                burst_size,
                prec_level,
            }
        }
        METER_BAND_EXPERIMENTER => {
            let experimenter = body.read_u32()?;
            let data = body.rest();
            MeterBand::Experimenter {
                rate,
                burst_size,
                experimenter,
                body: ctx.experimenter(ExperimenterScope::MeterBand, experimenter, 0, data)?,
            }
        }
        _ => {
            debug!("Unknown meter band type {}, keeping it opaque", typ);
            MeterBand::Opaque {
                typ,
                rate,
                burst_size,
                data: body.rest().to_vec(),
            }
        }
    };
    body.skip_tail_padding()?;
    Ok(band)
}

pub fn read_meter_bands(ctx: &Context, r: &mut Reader) -> Result<Vec<MeterBand>> {
    r.read_repeated(|r| read_meter_band(ctx, r))
}

pub fn write_meter_bands(bands: &[MeterBand], out: &mut Vec<u8>) -> Result<()> {
    for band in bands {
        let (typ, rate, burst_size) = match *band {
            MeterBand::Drop { rate, burst_size } => (METER_BAND_DROP, rate, burst_size),
            MeterBand::DscpRemark {
                rate, burst_size, ..
            } => (METER_BAND_DSCP_REMARK, rate, burst_size),
            MeterBand::Experimenter {
                rate, burst_size, ..
            } => (METER_BAND_EXPERIMENTER, rate, burst_size),
            MeterBand::Opaque {
                typ,
                rate,
                burst_size,
                ..
            } => (typ, rate, burst_size),
        };
        write_tlv(out, typ, "meter band", |o| {
            o.write_u32::<NetworkEndian>(rate)?;
            o.write_u32::<NetworkEndian>(burst_size)?;
            match *band {
                MeterBand::Drop { .. } => write_padding(o, 4),
                MeterBand::DscpRemark { prec_level, .. } => {
                    o.write_u8(prec_level)?;
                    write_padding(o, 3);
                }
                MeterBand::Experimenter {
                    experimenter,
                    ref body,
                    ..
                } => {
                    o.write_u32::<NetworkEndian>(experimenter)?;
                    o.extend_from_slice(&body.to_bytes()?);
                }
                MeterBand::Opaque { ref data, .. } => o.extend_from_slice(data),
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Queue properties share their layout between all versions, only the
/// max rate property is missing from 1.0.
pub fn read_queue_property(ctx: &Context, r: &mut Reader) -> Result<QueueProperty> {
    let (typ, mut body) = r.read_tlv()?;
    body.skip_padding(4)?;
    let property = match typ {
        QUEUE_PROP_MIN_RATE => {
            let rate = body.read_u16()?;
            body.skip_padding(6)?;
            QueueProperty::MinRate(rate)
        }
        QUEUE_PROP_MAX_RATE if ctx.version.is_oxm() => {
            let rate = body.read_u16()?;
            body.skip_padding(6)?;
            QueueProperty::MaxRate(rate)
        }
        QUEUE_PROP_EXPERIMENTER if ctx.version.is_oxm() => {
            let experimenter = body.read_u32()?;
            body.skip_padding(4)?;
            let data = body.rest();
            QueueProperty::Experimenter {
                experimenter,
                body: ctx.experimenter(ExperimenterScope::QueueProperty, experimenter, 0, data)?,
            }
        }
        _ => {
            debug!("Unknown queue property {}, keeping it opaque", typ);
            QueueProperty::Opaque {
                typ,
                data: body.rest().to_vec(),
            }
        }
    };
    body.skip_tail_padding()?;
    Ok(property)
}

pub fn write_queue_property(version: Version, property: &QueueProperty, out: &mut Vec<u8>) -> Result<()> {
    let typ = match *property {
        QueueProperty::MinRate(_) => QUEUE_PROP_MIN_RATE,
        QueueProperty::MaxRate(_) => QUEUE_PROP_MAX_RATE,
        QueueProperty::Experimenter { .. } => QUEUE_PROP_EXPERIMENTER,
        QueueProperty::Opaque { typ, .. } => typ,
    };
    let oxm_only = match *property {
        QueueProperty::MaxRate(_) | QueueProperty::Experimenter { .. } => true,
        _ => false,
    };
    if oxm_only && !version.is_oxm() {
        return Err(Error::NotInVersion {
            what: "queue property",
            version,
        });
    }
    write_tlv(out, typ, "queue property", |o| {
        write_padding(o, 4);
        match *property {
            QueueProperty::MinRate(rate) | QueueProperty::MaxRate(rate) => {
                o.write_u16::<NetworkEndian>(rate)?;
                write_padding(o, 6);
            }
            QueueProperty::Experimenter {
                experimenter,
                ref body,
            } => {
                o.write_u32::<NetworkEndian>(experimenter)?;
                write_padding(o, 4);
                o.extend_from_slice(&body.to_bytes()?);
            }
            QueueProperty::Opaque { ref data, .. } => o.extend_from_slice(data),
        }
        Ok(())
    })
}

/// Decodes a queue description. 1.0 queues have no port field and an
/// 8 byte header, 1.3 queues a 16 byte one.
pub fn read_packet_queue(ctx: &Context, r: &mut Reader) -> Result<PacketQueue> {
    let queue_id = r.read_u32()?;
    let (port, mut body) = if ctx.version.is_oxm() {
        let port = r.read_u32()?;
        let len = r.read_u16()?;
        let mut body = record(r, len, 10)?;
        body.skip_padding(6)?;
        (port, body)
    }
    else {
        let len = r.read_u16()?;
        let mut body = record(r, len, 6)?;
        body.skip_padding(2)?;
        (0, body)
    };
    let properties = body.read_repeated(|r| read_queue_property(ctx, r))?;
    Ok(PacketQueue {
        queue_id,
        port,
        properties,
    })
}

pub fn write_packet_queue(version: Version, queue: &PacketQueue, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    out.write_u32::<NetworkEndian>(queue.queue_id)?;
    if version.is_oxm() {
        out.write_u32::<NetworkEndian>(queue.port)?;
    }
    let at = length_placeholder(out);
    write_padding(out, if version.is_oxm() { 6 } else { 2 });
    for property in &queue.properties {
        write_queue_property(version, property, out)?;
    }
    patch_length(out, at, start, "queue")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openflow::messages::action::Action;
    use crate::openflow::registry::Registry;

    #[test]
    fn port_layout() {
        let mut bytes = vec![0, 0, 0, 3, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 0, 0];
        bytes.extend_from_slice(b"eth3\0\0\0\0\0\0\0\0\0\0\0\0");
        bytes.extend_from_slice(&[0, 0, 0, 0x01]); // port down
        bytes.extend_from_slice(&[0, 0, 0, 0x04]); // live
        bytes.extend_from_slice(&[0, 0, 0x28, 0x20]); // 1GB_FD, COPPER, AUTONEG
        bytes.extend_from_slice(&[0; 12]);
        bytes.extend_from_slice(&[0, 0x0f, 0x42, 0x40, 0, 0x0f, 0x42, 0x40]);
        assert_eq!(PORT_LEN, bytes.len());

        let port = read_port(Version::V1_3, &mut Reader::new(&bytes)).unwrap();
        assert_eq!(3, port.port_no);
        assert_eq!("eth3", port.name);
        assert!(port.config.port_down);
        assert!(port.state.live);
        assert!(port.curr.fd_1gb && port.curr.copper && port.curr.autoneg);
        assert_eq!(1_000_000, port.max_speed);

        let mut out = vec![];
        write_port(Version::V1_3, &port, &mut out).unwrap();
        assert_eq!(bytes, out);
    }

    #[test]
    fn bucket_with_action() {
        let bytes = [
            0x00, 0x20, 0x00, 0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0,
            0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0, 0, 0, 0, 0, 0,
        ];
        let registry = Registry::new();
        let ctx = Context::new(&registry, Version::V1_3);
        let buckets = read_buckets(&ctx, &mut Reader::new(&bytes)).unwrap();
        assert_eq!(1, buckets.len());
        assert_eq!(1, buckets[0].weight);
        assert_eq!(vec![Action::Output { port: 5, max_len: 0 }], buckets[0].actions);

        let mut out = vec![];
        write_buckets(Version::V1_3, &buckets, &mut out).unwrap();
        assert_eq!(&bytes[..], &out[..]);
    }

    #[test]
    fn bucket_shorter_than_header() {
        let registry = Registry::new();
        let ctx = Context::new(&registry, Version::V1_3);
        match read_buckets(&ctx, &mut Reader::new(&[0, 1, 0, 0])) {
            Err(Error::LengthMismatch { declared, consumed }) => {
                assert_eq!(1, declared);
                assert_eq!(2, consumed);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn meter_bands() {
        let bytes = [
            0x00, 0x01, 0x00, 0x10, 0, 0, 0x03, 0xe8, 0, 0, 0, 0x64, 0, 0, 0, 0, // drop
            0x00, 0x02, 0x00, 0x10, 0, 0, 0x07, 0xd0, 0, 0, 0, 0xc8, 0x02, 0, 0, 0, // remark
            0x00, 0x05, 0x00, 0x0c, 0, 0, 0, 1, 0, 0, 0, 2, // unknown
        ];
        let registry = Registry::new();
        let ctx = Context::new(&registry, Version::V1_3);
        let bands = read_meter_bands(&ctx, &mut Reader::new(&bytes)).unwrap();
        assert_eq!(
            vec![
                MeterBand::Drop {
                    rate: 1000,
                    burst_size: 100
                },
                MeterBand::DscpRemark {
                    rate: 2000,
                    burst_size: 200,
                    prec_level: 2
                },
                MeterBand::Opaque {
                    typ: 5,
                    rate: 1,
                    burst_size: 2,
                    data: vec![]
                },
            ],
            bands
        );
        let mut out = vec![];
        write_meter_bands(&bands, &mut out).unwrap();
        assert_eq!(&bytes[..], &out[..]);
    }

    #[test]
    fn queues_per_version() {
        let of13 = [
            0, 0, 0, 1, 0, 0, 0, 2, 0x00, 0x20, 0, 0, 0, 0, 0, 0, // header
            0x00, 0x02, 0x00, 0x10, 0, 0, 0, 0, 0x01, 0xf4, 0, 0, 0, 0, 0, 0, // max rate
        ];
        let of10 = [
            0, 0, 0, 1, 0x00, 0x18, 0, 0, // header
            0x00, 0x01, 0x00, 0x10, 0, 0, 0, 0, 0x00, 0x64, 0, 0, 0, 0, 0, 0, // min rate
        ];
        let registry = Registry::new();

        let ctx = Context::new(&registry, Version::V1_3);
        let queue = read_packet_queue(&ctx, &mut Reader::new(&of13)).unwrap();
        assert_eq!(2, queue.port);
        assert_eq!(vec![QueueProperty::MaxRate(500)], queue.properties);
        let mut out = vec![];
        write_packet_queue(Version::V1_3, &queue, &mut out).unwrap();
        assert_eq!(&of13[..], &out[..]);
        assert!(write_packet_queue(Version::V1_0, &queue, &mut vec![]).is_err());

        let ctx = Context::new(&registry, Version::V1_0);
        let queue = read_packet_queue(&ctx, &mut Reader::new(&of10)).unwrap();
        assert_eq!(0, queue.port);
        assert_eq!(vec![QueueProperty::MinRate(100)], queue.properties);
        let mut out = vec![];
        write_packet_queue(Version::V1_0, &queue, &mut out).unwrap();
        assert_eq!(&of10[..], &out[..]);
    }
}
