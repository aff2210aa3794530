/*!
Message bodies with the same layout in every supported version

Hello, error, echo and switch configuration messages look alike in 1.0
and the OXM family. Both version families register these decoders and
hand these messages to `write_body`.
*/

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::error_codes::EXPERIMENTER_ERROR;
use crate::openflow::messages::hello::HELLO_ELEM_VERSIONBITMAP;
use crate::openflow::messages::*;
use crate::openflow::registry::{Context, ExperimenterScope};
use crate::openflow::serialize::{length_placeholder, patch_length, write_alignment};
use crate::openflow::version::Version;

pub fn read_hello(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let mut hello = Hello::default();
    if ctx.version == Version::V1_0 {
        if !r.is_empty() {
            debug!("Ignoring {} bytes of a 1.0 hello body", r.remaining());
        }
        r.rest();
        return Ok(Message::Hello(hello));
    }
    while !r.is_empty() {
        let (typ, mut body) = r.read_tlv()?;
        r.skip_alignment(body.len() + 4)?;
        match typ {
            HELLO_ELEM_VERSIONBITMAP => {
                let mut bitmap = Vec::with_capacity(body.len() * 8);
                while !body.is_empty() {
                    let word = body.read_u32()?;
                    bitmap.extend((0..32).map(|bit| word & (1 << bit) != 0));
                }
                hello.elements.push(HelloElement::VersionBitmap(bitmap));
            }
            _ => debug!("Skipping unknown hello element type {}", typ),
        }
    }
    Ok(Message::Hello(hello))
}

fn write_hello(version: Version, hello: &Hello, out: &mut Vec<u8>) -> Result<()> {
    if version == Version::V1_0 {
        if !hello.elements.is_empty() {
            return Err(Error::NotInVersion {
                what: "hello element",
                version,
            });
        }
        return Ok(());
    }
    for element in &hello.elements {
        let start = out.len();
        match *element {
            HelloElement::VersionBitmap(ref bitmap) => {
                out.write_u16::<NetworkEndian>(HELLO_ELEM_VERSIONBITMAP)?;
                let at = length_placeholder(out);
                for word in bitmap.chunks(32) {
                    let raw = word
                        .iter()
                        .enumerate()
                        .filter(|&(_, set)| *set)
                        .fold(0u32, |acc, (bit, _)| acc | 1 << bit);
                    out.write_u32::<NetworkEndian>(raw)?;
                }
                patch_length(out, at, start, "hello element")?;
            }
        }
        write_alignment(out, start);
    }
    Ok(())
}

pub fn read_error(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let typ = r.read_u16()?;
    if typ == EXPERIMENTER_ERROR && ctx.version.is_oxm() {
        let exp_type = r.read_u16()?;
        let experimenter = r.read_u32()?;
        let data = r.rest();
        let body = ctx.experimenter(
            ExperimenterScope::Error,
            experimenter,
            u32::from(exp_type),
            data,
        )?;
        return Ok(Message::ExperimenterError(ExperimenterError {
            exp_type,
            experimenter,
            body,
        }));
    }
    let code = r.read_u16()?;
    let data = r.rest().to_vec();
    Ok(Message::Error(ErrorMsg::new(ctx.version, typ, code, data)))
}

pub fn read_echo_request(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::EchoRequest(r.rest().to_vec()))
}

pub fn read_echo_reply(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::EchoReply(r.rest().to_vec()))
}

/// 1.0 vendor messages carry no subtype, their payload is looked up
/// with subtype 0
pub fn read_experimenter(ctx: &Context, r: &mut Reader) -> Result<Message> {
    let experimenter = r.read_u32()?;
    let exp_type = if ctx.version.is_oxm() { r.read_u32()? } else { 0 };
    let data = r.rest();
    Ok(Message::Experimenter(ExperimenterMsg {
        experimenter,
        exp_type,
        body: ctx.experimenter(ExperimenterScope::Message, experimenter, exp_type, data)?,
    }))
}

fn read_switch_config(r: &mut Reader) -> Result<SwitchConfig> {
    Ok(SwitchConfig {
        flags: r.read_u16()?,
        miss_send_len: r.read_u16()?,
    })
}

pub fn read_get_config_reply(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::GetConfigReply(read_switch_config(r)?))
}

pub fn read_set_config(_: &Context, r: &mut Reader) -> Result<Message> {
    Ok(Message::SetConfig(read_switch_config(r)?))
}

pub fn read_features_request(_: &Context, _: &mut Reader) -> Result<Message> {
    Ok(Message::FeaturesRequest)
}

pub fn read_get_config_request(_: &Context, _: &mut Reader) -> Result<Message> {
    Ok(Message::GetConfigRequest)
}

pub fn read_barrier_request(_: &Context, _: &mut Reader) -> Result<Message> {
    Ok(Message::BarrierRequest)
}

pub fn read_barrier_reply(_: &Context, _: &mut Reader) -> Result<Message> {
    Ok(Message::BarrierReply)
}

/// Encodes the messages decoded by this module. Returns `Ok(false)` for
/// every other message.
pub fn write_body(version: Version, message: &Message, out: &mut Vec<u8>) -> Result<bool> {
    match *message {
        Message::Hello(ref hello) => write_hello(version, hello, out)?,
        Message::Error(ref err) => {
            out.write_u16::<NetworkEndian>(err.typ)?;
            out.write_u16::<NetworkEndian>(err.code)?;
            if let Some(ref data) = err.data {
                out.extend_from_slice(data);
            }
        }
        Message::ExperimenterError(ref err) => {
            if !version.is_oxm() {
                return Err(Error::NotInVersion {
                    what: "experimenter error",
                    version,
                });
            }
            out.write_u16::<NetworkEndian>(EXPERIMENTER_ERROR)?;
            out.write_u16::<NetworkEndian>(err.exp_type)?;
            out.write_u32::<NetworkEndian>(err.experimenter)?;
            out.extend_from_slice(&err.body.to_bytes()?);
        }
        Message::EchoRequest(ref data) | Message::EchoReply(ref data) => out.extend_from_slice(data),
        Message::Experimenter(ref msg) => {
            out.write_u32::<NetworkEndian>(msg.experimenter)?;
            if version.is_oxm() {
                out.write_u32::<NetworkEndian>(msg.exp_type)?;
            }
            out.extend_from_slice(&msg.body.to_bytes()?);
        }
        Message::GetConfigReply(config) | Message::SetConfig(config) => {
            out.write_u16::<NetworkEndian>(config.flags)?;
            out.write_u16::<NetworkEndian>(config.miss_send_len)?;
        }
        Message::FeaturesRequest
        | Message::GetConfigRequest
        | Message::BarrierRequest
        | Message::BarrierReply => {}
        _ => return Ok(false),
    }
    Ok(true)
}
