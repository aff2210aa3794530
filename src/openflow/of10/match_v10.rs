//! The fixed 40 byte match of OpenFlow 1.0

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::fields::WildcardsV10;
use crate::openflow::messages::{Match, MatchV10};
use crate::openflow::serialize::write_padding;
use crate::openflow::version::Version;
use std::net::Ipv4Addr;

pub const MATCH_LEN: usize = 40;

pub fn read_match(r: &mut Reader) -> Result<MatchV10> {
    let wildcards = WildcardsV10::from_raw(r.read_u32()?);
    let in_port = r.read_u16()?;
    let dl_src = r.read_mac()?;
    let dl_dst = r.read_mac()?;
    let dl_vlan = r.read_u16()?;
    let dl_vlan_pcp = r.read_u8()?;
    r.skip_padding(1)?;
    let dl_type = r.read_u16()?;
    let nw_tos = r.read_u8()?;
    let nw_proto = r.read_u8()?;
    r.skip_padding(2)?;
    Ok(MatchV10 {
        wildcards,
        in_port,
        dl_src,
        dl_dst,
        dl_vlan,
        dl_vlan_pcp,
        dl_type,
        nw_tos,
        nw_proto,
        nw_src: Ipv4Addr::from(r.read_u32()?),
        nw_dst: Ipv4Addr::from(r.read_u32()?),
        tp_src: r.read_u16()?,
        tp_dst: r.read_u16()?,
    })
}

pub fn write_match(m: &MatchV10, out: &mut Vec<u8>) -> Result<()> {
    out.write_u32::<NetworkEndian>(m.wildcards.to_raw())?;
    out.write_u16::<NetworkEndian>(m.in_port)?;
    out.extend_from_slice(&m.dl_src);
    out.extend_from_slice(&m.dl_dst);
    out.write_u16::<NetworkEndian>(m.dl_vlan)?;
    out.write_u8(m.dl_vlan_pcp)?;
    write_padding(out, 1);
    out.write_u16::<NetworkEndian>(m.dl_type)?;
    out.write_u8(m.nw_tos)?;
    out.write_u8(m.nw_proto)?;
    write_padding(out, 2);
    out.write_u32::<NetworkEndian>(u32::from(m.nw_src))?;
    out.write_u32::<NetworkEndian>(u32::from(m.nw_dst))?;
    out.write_u16::<NetworkEndian>(m.tp_src)?;
    out.write_u16::<NetworkEndian>(m.tp_dst)?;
    Ok(())
}

/// The 1.0 match of `matches`, OXM matches cannot be written in 1.0
pub fn v10_match(matches: &Match) -> Result<&MatchV10> {
    match *matches {
        Match::V10(ref m) => Ok(m),
        Match::Oxm(_) => Err(Error::NotInVersion {
            what: "OXM match",
            version: Version::V1_0,
        }),
    }
}
