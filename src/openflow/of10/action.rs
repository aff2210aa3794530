//! Action codec of OpenFlow 1.0

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::messages::action::*;
use crate::openflow::of10::port_u16;
use crate::openflow::registry::{Context, ExperimenterScope};
use crate::openflow::serialize::{write_padding, write_tlv};
use crate::openflow::version::Version;
use std::net::Ipv4Addr;

const OUTPUT: u16 = 0;
const SET_VLAN_VID: u16 = 1;
const SET_VLAN_PCP: u16 = 2;
const STRIP_VLAN: u16 = 3;
const SET_DL_SRC: u16 = 4;
const SET_DL_DST: u16 = 5;
const SET_NW_SRC: u16 = 6;
const SET_NW_DST: u16 = 7;
const SET_NW_TOS: u16 = 8;
const SET_TP_SRC: u16 = 9;
const SET_TP_DST: u16 = 10;
const ENQUEUE: u16 = 11;

pub fn read_action(ctx: &Context, r: &mut Reader) -> Result<Action> {
    let (typ, mut body) = r.read_tlv()?;
    let action = match typ {
        OUTPUT => Action::Output {
            port: u32::from(body.read_u16()?),
            max_len: body.read_u16()?,
        },
        SET_VLAN_VID => {
            let vid = body.read_u16()?;
            body.skip_padding(2)?;
            Action::SetVlanVid(vid)
        }
        SET_VLAN_PCP => {
            let pcp = body.read_u8()?;
            body.skip_padding(3)?;
            Action::SetVlanPcp(pcp)
        }
        STRIP_VLAN => {
            body.skip_padding(4)?;
            Action::StripVlan
        }
        SET_DL_SRC | SET_DL_DST => {
            let mac = body.read_mac()?;
            body.skip_padding(6)?;
            if typ == SET_DL_SRC {
                Action::SetDlSrc(mac)
            }
            else {
                Action::SetDlDst(mac)
            }
        }
        SET_NW_SRC => Action::SetNwSrc(Ipv4Addr::from(body.read_u32()?)),
        SET_NW_DST => Action::SetNwDst(Ipv4Addr::from(body.read_u32()?)),
        SET_NW_TOS => {
            let tos = body.read_u8()?;
            body.skip_padding(3)?;
            Action::SetNwTos(tos)
        }
        SET_TP_SRC | SET_TP_DST => {
            let tp = body.read_u16()?;
            body.skip_padding(2)?;
            if typ == SET_TP_SRC {
                Action::SetTpSrc(tp)
            }
            else {
                Action::SetTpDst(tp)
            }
        }
        ENQUEUE => {
            let port = body.read_u16()?;
            body.skip_padding(6)?;
            Action::Enqueue {
                port,
                queue_id: body.read_u32()?,
            }
        }
        ACTION_EXPERIMENTER => {
            let experimenter = body.read_u32()?;
            let data = body.rest();
            Action::Experimenter {
                experimenter,
                body: ctx.experimenter(ExperimenterScope::Action, experimenter, 0, data)?,
            }
        }
        _ => {
            debug!("Unknown 1.0 action type {}, keeping it opaque", typ);
            Action::Opaque {
                typ,
                data: body.rest().to_vec(),
            }
        }
    };
    body.skip_tail_padding()?;
    Ok(action)
}

pub fn read_actions(ctx: &Context, r: &mut Reader) -> Result<Vec<Action>> {
    r.read_repeated(|r| read_action(ctx, r))
}

fn not_in_version() -> Error {
    Error::NotInVersion {
        what: "action",
        version: Version::V1_0,
    }
}

fn action_type(action: &Action) -> Result<u16> {
    Ok(match *action {
        Action::Output { .. } => OUTPUT,
        Action::SetVlanVid(_) => SET_VLAN_VID,
        Action::SetVlanPcp(_) => SET_VLAN_PCP,
        Action::StripVlan => STRIP_VLAN,
        Action::SetDlSrc(_) => SET_DL_SRC,
        Action::SetDlDst(_) => SET_DL_DST,
        Action::SetNwSrc(_) => SET_NW_SRC,
        Action::SetNwDst(_) => SET_NW_DST,
        Action::SetNwTos(_) => SET_NW_TOS,
        Action::SetTpSrc(_) => SET_TP_SRC,
        Action::SetTpDst(_) => SET_TP_DST,
        Action::Enqueue { .. } => ENQUEUE,
        Action::Experimenter { .. } => ACTION_EXPERIMENTER,
        Action::Opaque { typ, .. } => typ,
        _ => return Err(not_in_version()),
    })
}

pub fn write_action(action: &Action, out: &mut Vec<u8>) -> Result<()> {
    let typ = action_type(action)?;
    write_tlv(out, typ, "action", |o| {
        match *action {
            Action::Output { port, max_len } => {
                o.write_u16::<NetworkEndian>(port_u16(port, "output port")?)?;
                o.write_u16::<NetworkEndian>(max_len)?;
            }
            Action::SetVlanVid(value) | Action::SetTpSrc(value) | Action::SetTpDst(value) => {
                o.write_u16::<NetworkEndian>(value)?;
                write_padding(o, 2);
            }
            Action::SetVlanPcp(value) | Action::SetNwTos(value) => {
                o.write_u8(value)?;
                write_padding(o, 3);
            }
            Action::StripVlan => write_padding(o, 4),
            Action::SetDlSrc(ref mac) | Action::SetDlDst(ref mac) => {
                o.extend_from_slice(mac);
                write_padding(o, 6);
            }
            Action::SetNwSrc(addr) | Action::SetNwDst(addr) => {
                o.write_u32::<NetworkEndian>(u32::from(addr))?
            }
            Action::Enqueue { port, queue_id } => {
                o.write_u16::<NetworkEndian>(port)?;
                write_padding(o, 6);
                o.write_u32::<NetworkEndian>(queue_id)?;
            }
            Action::Experimenter {
                experimenter,
                ref body,
            } => {
                o.write_u32::<NetworkEndian>(experimenter)?;
                o.extend_from_slice(&body.to_bytes()?);
            }
            Action::Opaque { ref data, .. } => o.extend_from_slice(data),
            _ => return Err(not_in_version()),
        }
        Ok(())
    })
}

pub fn write_actions(actions: &[Action], out: &mut Vec<u8>) -> Result<()> {
    for action in actions {
        write_action(action, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openflow::messages::oxm::{MatchEntry, OxmField};
    use crate::openflow::registry::Registry;

    fn decode(bytes: &[u8]) -> Result<Vec<Action>> {
        let registry = Registry::new();
        let ctx = Context::new(&registry, Version::V1_0);
        read_actions(&ctx, &mut Reader::new(bytes))
    }

    #[test]
    fn rewrite_and_output() {
        let bytes = [
            0x00, 0x05, 0x00, 0x10, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0, // dl_dst
            0x00, 0x07, 0x00, 0x08, 10, 0, 0, 1, // nw_dst
            0x00, 0x0a, 0x00, 0x08, 0x1f, 0x90, 0, 0, // tp_dst 8080
            0x00, 0x0b, 0x00, 0x10, 0x00, 0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7, // enqueue
            0x00, 0x00, 0x00, 0x08, 0xff, 0xfb, 0x00, 0x80, // output flood
        ];
        let actions = decode(&bytes).unwrap();
        assert_eq!(
            vec![
                Action::SetDlDst([2, 0, 0, 0, 0, 1]),
                Action::SetNwDst(Ipv4Addr::new(10, 0, 0, 1)),
                Action::SetTpDst(8080),
                Action::Enqueue {
                    port: 2,
                    queue_id: 7
                },
                Action::Output {
                    port: 0xfffb,
                    max_len: 128
                },
            ],
            actions
        );
        let mut out = vec![];
        write_actions(&actions, &mut out).unwrap();
        assert_eq!(&bytes[..], &out[..]);
    }

    #[test]
    fn vendor_action_stays_raw() {
        let bytes = [0xff, 0xff, 0x00, 0x10, 0x00, 0x00, 0x23, 0x20, 0, 1, 2, 3, 4, 5, 6, 7];
        match decode(&bytes).unwrap()[0] {
            Action::Experimenter {
                experimenter,
                ref body,
            } => {
                assert_eq!(0x2320, experimenter);
                assert_eq!(vec![0, 1, 2, 3, 4, 5, 6, 7], body.to_bytes().unwrap());
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn oxm_family_actions_rejected() {
        let mut out = vec![];
        match write_action(&Action::SetField(MatchEntry::Basic(OxmField::IpProto(6))), &mut out) {
            Err(Error::NotInVersion { what, .. }) => assert_eq!("action", what),
            other => panic!("unexpected {:?}", other),
        }
        match write_action(
            &Action::Output {
                port: 0xffff_fffd,
                max_len: 0
            },
            &mut out
        ) {
            Err(Error::Oversized(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
