/*!
OXM match codec

A match is a 4 byte header (type, length) followed by the OXM entries,
padded to 8 bytes. The length field excludes the padding.
*/

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::{padding_for, Reader};
use crate::openflow::error::{Error, Result};
use crate::openflow::messages::oxm::*;
use crate::openflow::serialize::{length_placeholder, patch_length, write_alignment};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Match type of an OXM match
pub const OFPMT_OXM: u16 = 1;
const MATCH_HEADER_LEN: usize = 4;

/// A fixed size value of an OXM entry
trait OxmValue: Sized {
    fn read(r: &mut Reader) -> Result<Self>;
    fn write(&self, out: &mut Vec<u8>) -> Result<()>;
}

impl OxmValue for u8 {
    fn read(r: &mut Reader) -> Result<u8> {
        r.read_u8()
    }
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        Ok(out.write_u8(*self)?)
    }
}

impl OxmValue for u16 {
    fn read(r: &mut Reader) -> Result<u16> {
        r.read_u16()
    }
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        Ok(out.write_u16::<NetworkEndian>(*self)?)
    }
}

impl OxmValue for u32 {
    fn read(r: &mut Reader) -> Result<u32> {
        r.read_u32()
    }
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        Ok(out.write_u32::<NetworkEndian>(*self)?)
    }
}

impl OxmValue for u64 {
    fn read(r: &mut Reader) -> Result<u64> {
        r.read_u64()
    }
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        Ok(out.write_u64::<NetworkEndian>(*self)?)
    }
}

impl OxmValue for MacAddr {
    fn read(r: &mut Reader) -> Result<MacAddr> {
        r.read_mac()
    }
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self);
        Ok(())
    }
}

impl OxmValue for Ipv4Addr {
    fn read(r: &mut Reader) -> Result<Ipv4Addr> {
        Ok(Ipv4Addr::from(r.read_u32()?))
    }
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.octets());
        Ok(())
    }
}

impl OxmValue for Ipv6Addr {
    fn read(r: &mut Reader) -> Result<Ipv6Addr> {
        Ok(Ipv6Addr::from(r.read_array16()?))
    }
    fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.octets());
        Ok(())
    }
}

fn masked<T: OxmValue>(r: &mut Reader, has_mask: bool) -> Result<Masked<T>> {
    let value = T::read(r)?;
    let mask = if has_mask { Some(T::read(r)?) } else { None };
    Ok(Masked { value, mask })
}

fn write_masked<T: OxmValue>(m: &Masked<T>, out: &mut Vec<u8>) -> Result<()> {
    m.value.write(out)?;
    if let Some(ref mask) = m.mask {
        mask.write(out)?;
    }
    Ok(())
}

fn read_isid(r: &mut Reader, has_mask: bool) -> Result<Masked<u32>> {
    let value = r.read_u24()?;
    let mask = if has_mask { Some(r.read_u24()?) } else { None };
    Ok(Masked { value, mask })
}

fn write_isid(m: &Masked<u32>, out: &mut Vec<u8>) -> Result<()> {
    out.write_u24::<NetworkEndian>(m.value & 0xff_ffff)?;
    if let Some(mask) = m.mask {
        out.write_u24::<NetworkEndian>(mask & 0xff_ffff)?;
    }
    Ok(())
}

/// Decodes the value of an OpenFlow basic field. Returns `None` for
/// unknown fields and for a mask on a field that cannot be masked.
fn read_basic(field: u8, has_mask: bool, r: &mut Reader) -> Result<Option<OxmField>> {
    use crate::openflow::messages::oxm::OxmField::*;
    let value = match (field, has_mask) {
        (0, false) => InPort(r.read_u32()?),
        (1, false) => InPhyPort(r.read_u32()?),
        (2, _) => Metadata(masked(r, has_mask)?),
        (3, _) => EthDst(masked(r, has_mask)?),
        (4, _) => EthSrc(masked(r, has_mask)?),
        (5, false) => EthType(r.read_u16()?),
        (6, _) => {
            let raw = r.read_u16()?;
            let mask = if has_mask { Some(r.read_u16()?) } else { None };
            VlanVid {
                vid: raw & 0x0fff,
                present: raw & VLAN_PRESENT != 0,
                mask,
            }
        }
        (7, false) => VlanPcp(r.read_u8()?),
        (8, false) => IpDscp(r.read_u8()?),
        (9, false) => IpEcn(r.read_u8()?),
        (10, false) => IpProto(r.read_u8()?),
        (11, _) => Ipv4Src(masked(r, has_mask)?),
        (12, _) => Ipv4Dst(masked(r, has_mask)?),
        (13, false) => TcpSrc(r.read_u16()?),
        (14, false) => TcpDst(r.read_u16()?),
        (15, false) => UdpSrc(r.read_u16()?),
        (16, false) => UdpDst(r.read_u16()?),
        (17, false) => SctpSrc(r.read_u16()?),
        (18, false) => SctpDst(r.read_u16()?),
        (19, false) => Icmpv4Type(r.read_u8()?),
        (20, false) => Icmpv4Code(r.read_u8()?),
        (21, false) => ArpOp(r.read_u16()?),
        (22, _) => ArpSpa(masked(r, has_mask)?),
        (23, _) => ArpTpa(masked(r, has_mask)?),
        (24, _) => ArpSha(masked(r, has_mask)?),
        (25, _) => ArpTha(masked(r, has_mask)?),
        (26, _) => Ipv6Src(masked(r, has_mask)?),
        (27, _) => Ipv6Dst(masked(r, has_mask)?),
        (28, _) => Ipv6Flabel(masked(r, has_mask)?),
        (29, false) => Icmpv6Type(r.read_u8()?),
        (30, false) => Icmpv6Code(r.read_u8()?),
        (31, false) => Ipv6NdTarget(Ipv6Addr::read(r)?),
        (32, false) => Ipv6NdSll(r.read_mac()?),
        (33, false) => Ipv6NdTll(r.read_mac()?),
        (34, false) => MplsLabel(r.read_u32()?),
        (35, false) => MplsTc(r.read_u8()?),
        (36, false) => MplsBos(r.read_u8()?),
        (37, _) => PbbIsid(read_isid(r, has_mask)?),
        (38, _) => TunnelId(masked(r, has_mask)?),
        (39, _) => Ipv6Exthdr(masked(r, has_mask)?),
        (40, false) => PbbUca(r.read_u8()?),
        (41, _) => TcpFlags(masked(r, has_mask)?),
        (42, false) => ActsetOutput(r.read_u32()?),
        (44, false) => PacketType {
            namespace: r.read_u16()?,
            ns_type: r.read_u16()?,
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn write_basic(field: &OxmField, out: &mut Vec<u8>) -> Result<()> {
    use crate::openflow::messages::oxm::OxmField::*;
    match *field {
        InPort(v) | InPhyPort(v) | MplsLabel(v) | ActsetOutput(v) => v.write(out),
        Metadata(ref m) | TunnelId(ref m) => write_masked(m, out),
        EthDst(ref m) | EthSrc(ref m) | ArpSha(ref m) | ArpTha(ref m) => write_masked(m, out),
        EthType(v) | TcpSrc(v) | TcpDst(v) | UdpSrc(v) | UdpDst(v) | SctpSrc(v)
        | SctpDst(v) | ArpOp(v) => v.write(out),
        VlanVid { vid, present, mask } => {
            let present = if present { VLAN_PRESENT } else { 0 };
            ((vid & 0x0fff) | present).write(out)?;
            if let Some(mask) = mask {
                mask.write(out)?;
            }
            Ok(())
        }
        VlanPcp(v) | IpDscp(v) | IpEcn(v) | IpProto(v) | Icmpv4Type(v) | Icmpv4Code(v)
        | Icmpv6Type(v) | Icmpv6Code(v) | MplsTc(v) | MplsBos(v) | PbbUca(v) => v.write(out),
        Ipv4Src(ref m) | Ipv4Dst(ref m) | ArpSpa(ref m) | ArpTpa(ref m) => write_masked(m, out),
        Ipv6Src(ref m) | Ipv6Dst(ref m) => write_masked(m, out),
        Ipv6Flabel(ref m) => write_masked(m, out),
        Ipv6NdTarget(ref addr) => addr.write(out),
        Ipv6NdSll(ref mac) | Ipv6NdTll(ref mac) => mac.write(out),
        PbbIsid(ref m) => write_isid(m, out),
        Ipv6Exthdr(ref m) | TcpFlags(ref m) => write_masked(m, out),
        PacketType { namespace, ns_type } => {
            namespace.write(out)?;
            ns_type.write(out)
        }
    }
}

/// Decodes a single OXM entry
pub fn read_entry(r: &mut Reader) -> Result<MatchEntry> {
    let class = r.read_u16()?;
    let field_and_mask = r.read_u8()?;
    let length = r.read_u8()? as usize;
    let field = field_and_mask >> 1;
    let has_mask = field_and_mask & 1 != 0;
    let mut body = r.sub(length)?;
    let entry = match class {
        OXM_CLASS_OPENFLOW_BASIC => match read_basic(field, has_mask, &mut body)? {
            Some(value) => {
                body.finish()?;
                MatchEntry::Basic(value)
            }
            None => {
                debug!("Keeping OXM basic field {} (mask: {}) opaque", field, has_mask);
                MatchEntry::Opaque {
                    class,
                    field,
                    has_mask,
                    data: body.rest().to_vec(),
                }
            }
        },
        OXM_CLASS_EXPERIMENTER => MatchEntry::Experimenter {
            experimenter: body.read_u32()?,
            field,
            has_mask,
            data: body.rest().to_vec(),
        },
        _ => MatchEntry::Opaque {
            class,
            field,
            has_mask,
            data: body.rest().to_vec(),
        },
    };
    Ok(entry)
}

fn write_oxm_header(
    out: &mut Vec<u8>,
    class: u16,
    field: u8,
    has_mask: bool,
    length: usize,
) -> Result<()> {
    if length > u8::max_value() as usize {
        return Err(Error::Oversized("OXM entry"));
    }
    let hasmask_u32 = if has_mask { 1 } else { 0 };
    let header = (u32::from(class) << 16)
        | (u32::from(field & 0x7f) << 9)
        | (hasmask_u32 << 8)
        | length as u32;
    Ok(out.write_u32::<NetworkEndian>(header)?)
}

/// Encodes a single OXM entry
pub fn write_entry(entry: &MatchEntry, out: &mut Vec<u8>) -> Result<()> {
    let mut payload = vec![];
    let (class, field, has_mask) = match *entry {
        MatchEntry::Basic(ref value) => {
            write_basic(value, &mut payload)?;
            (OXM_CLASS_OPENFLOW_BASIC, value.code(), value.has_mask())
        }
        MatchEntry::Experimenter {
            experimenter,
            field,
            has_mask,
            ref data,
        } => {
            payload.write_u32::<NetworkEndian>(experimenter)?;
            payload.extend_from_slice(data);
            (OXM_CLASS_EXPERIMENTER, field, has_mask)
        }
        MatchEntry::Opaque {
            class,
            field,
            has_mask,
            ref data,
        } => {
            payload.extend_from_slice(data);
            (class, field, has_mask)
        }
    };
    write_oxm_header(out, class, field, has_mask, payload.len())?;
    out.extend_from_slice(&payload);
    Ok(())
}

/// Decodes an OXM match including its trailing padding
pub fn read_match(r: &mut Reader) -> Result<Vec<MatchEntry>> {
    let typ = r.read_u16()?;
    let length = r.read_u16()? as usize;
    if length < MATCH_HEADER_LEN {
        return Err(Error::LengthMismatch {
            declared: length,
            consumed: MATCH_HEADER_LEN,
        });
    }
    if typ != OFPMT_OXM {
        debug!("Decoding match of type {} as OXM", typ);
    }
    let mut entries = r.sub(length - MATCH_HEADER_LEN)?;
    let matches = entries.read_repeated(read_entry)?;
    r.skip_padding(padding_for(length))?;
    Ok(matches)
}

/// Encodes an OXM match including its trailing padding
pub fn write_match(entries: &[MatchEntry], out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    out.write_u16::<NetworkEndian>(OFPMT_OXM)?;
    let at = length_placeholder(out);
    for entry in entries {
        write_entry(entry, out)?;
    }
    patch_length(out, at, start, "match")?;
    write_alignment(out, start);
    Ok(())
}

/// Decodes an OXM header without value
pub fn read_oxm_id(r: &mut Reader) -> Result<OxmId> {
    let class = r.read_u16()?;
    let field_and_mask = r.read_u8()?;
    let length = r.read_u8()?;
    let experimenter = if class == OXM_CLASS_EXPERIMENTER {
        Some(r.read_u32()?)
    }
    else {
        None
    };
    Ok(OxmId {
        class,
        field: field_and_mask >> 1,
        has_mask: field_and_mask & 1 != 0,
        length,
        experimenter,
    })
}

pub fn write_oxm_id(id: &OxmId, out: &mut Vec<u8>) -> Result<()> {
    write_oxm_header(out, id.class, id.field, id.has_mask, id.length as usize)?;
    if id.class == OXM_CLASS_EXPERIMENTER {
        out.write_u32::<NetworkEndian>(id.experimenter.unwrap_or(0))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_match(bytes: &[u8]) -> Result<Vec<MatchEntry>> {
        let mut r = Reader::new(bytes);
        let entries = read_match(&mut r)?;
        r.finish()?;
        Ok(entries)
    }

    #[test]
    fn basic_entries() {
        let bytes = [
            0x00, 0x01, 0x00, 0x2a, // type, length 42
            0x80, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, // in_port 1
            0x80, 0x00, 0x17, 0x08, 0x0a, 0x00, 0x00, 0x01, 0x00, 0x00, 0xff, 0x00, // ipv4_src
            0x80, 0x00, 0x4b, 0x06, 0x00, 0x00, 0x02, 0x00, 0x00, 0x01, // pbb_isid
            0x80, 0x00, 0x58, 0x04, 0x00, 0x01, 0x89, 0x4f, // packet_type
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // padding
        ];
        let entries = decode_match(&bytes).unwrap();
        assert_eq!(
            vec![
                MatchEntry::Basic(OxmField::InPort(1)),
                MatchEntry::Basic(OxmField::Ipv4Src(Masked::with_mask(
                    Ipv4Addr::new(10, 0, 0, 1),
                    Ipv4Addr::new(0, 0, 255, 0)
                ))),
                MatchEntry::Basic(OxmField::PbbIsid(Masked::with_mask(2, 1))),
                MatchEntry::Basic(OxmField::PacketType {
                    namespace: 1,
                    ns_type: 0x894f
                }),
            ],
            entries
        );

        let mut out = vec![];
        write_match(&entries, &mut out).unwrap();
        assert_eq!(&bytes[..], &out[..]);
    }

    #[test]
    fn vlan_present_bit() {
        let bytes = [0x80, 0x00, 0x0d, 0x04, 0x10, 0x0a, 0x1f, 0xff];
        let entry = read_entry(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(
            MatchEntry::Basic(OxmField::VlanVid {
                vid: 10,
                present: true,
                mask: Some(0x1fff)
            }),
            entry
        );
    }

    #[test]
    fn unknown_class_and_field_stay_opaque() {
        let bytes = [0x00, 0x01, 0x02, 0x02, 0xaa, 0xbb];
        assert_eq!(
            MatchEntry::Opaque {
                class: 1,
                field: 1,
                has_mask: false,
                data: vec![0xaa, 0xbb]
            },
            read_entry(&mut Reader::new(&bytes)).unwrap()
        );

        // field 43 has no typed value
        let bytes = [0x80, 0x00, 0x56, 0x01, 0x07];
        assert_eq!(
            MatchEntry::Opaque {
                class: 0x8000,
                field: 43,
                has_mask: false,
                data: vec![7]
            },
            read_entry(&mut Reader::new(&bytes)).unwrap()
        );
    }

    #[test]
    fn experimenter_entry() {
        let bytes = [0xff, 0xff, 0x03, 0x06, 0x00, 0x00, 0x23, 0x20, 0x01, 0x02];
        let entry = read_entry(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(
            MatchEntry::Experimenter {
                experimenter: 0x2320,
                field: 1,
                has_mask: true,
                data: vec![1, 2]
            },
            entry
        );
        let mut out = vec![];
        write_entry(&entry, &mut out).unwrap();
        assert_eq!(&bytes[..], &out[..]);
    }

    #[test]
    fn wrong_value_length() {
        // in_port with a 6 byte payload
        let bytes = [0x80, 0x00, 0x00, 0x06, 0, 0, 0, 1, 0, 0];
        match read_entry(&mut Reader::new(&bytes)) {
            Err(Error::LengthMismatch { declared, consumed }) => {
                assert_eq!(6, declared);
                assert_eq!(4, consumed);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_match_padding() {
        let bytes = [0x00, 0x01, 0x00, 0x0c, 0x80, 0x00, 0x00, 0x04, 0, 0, 0, 1];
        match decode_match(&bytes) {
            Err(Error::BufferUnderrun { .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_match() {
        let bytes = [0x00, 0x01, 0x00, 0x04, 0, 0, 0, 0];
        assert_eq!(Vec::<MatchEntry>::new(), decode_match(&bytes).unwrap());
    }

    #[test]
    fn oxm_ids() {
        let bytes = [0x80, 0x00, 0x06, 0x02, 0xff, 0xff, 0x00, 0x08, 0, 0, 0x23, 0x20];
        let mut r = Reader::new(&bytes);
        let ids = r.read_repeated(read_oxm_id).unwrap();
        assert_eq!(2, ids.len());
        assert_eq!(3, ids[0].field);
        assert_eq!(Some(0x2320), ids[1].experimenter);
        let mut out = vec![];
        for id in &ids {
            write_oxm_id(id, &mut out).unwrap();
        }
        assert_eq!(&bytes[..], &out[..]);
    }
}
