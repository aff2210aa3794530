//! Action and instruction codec of OpenFlow 1.3 and later

use byteorder::{NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::messages::action::*;
use crate::openflow::of13::oxm;
use crate::openflow::registry::{Context, ExperimenterScope};
use crate::openflow::serialize::{write_alignment, write_padding, write_tlv};
use crate::openflow::version::Version;

const OUTPUT: u16 = 0;
const COPY_TTL_OUT: u16 = 11;
const COPY_TTL_IN: u16 = 12;
const SET_MPLS_TTL: u16 = 15;
const DEC_MPLS_TTL: u16 = 16;
const PUSH_VLAN: u16 = 17;
const POP_VLAN: u16 = 18;
const PUSH_MPLS: u16 = 19;
const POP_MPLS: u16 = 20;
const SET_QUEUE: u16 = 21;
const GROUP: u16 = 22;
const SET_NW_TTL: u16 = 23;
const DEC_NW_TTL: u16 = 24;
const SET_FIELD: u16 = 25;
const PUSH_PBB: u16 = 26;
const POP_PBB: u16 = 27;
const METER: u16 = 29;

const GOTO_TABLE: u16 = 1;
const WRITE_METADATA: u16 = 2;
const WRITE_ACTIONS: u16 = 3;
const APPLY_ACTIONS: u16 = 4;
const CLEAR_ACTIONS: u16 = 5;
const INSTRUCTION_METER: u16 = 6;

/// Decodes one action including its trailing padding
pub fn read_action(ctx: &Context, r: &mut Reader) -> Result<Action> {
    let (typ, mut body) = r.read_tlv()?;
    let action = match typ {
        OUTPUT => {
            let port = body.read_u32()?;
            let max_len = body.read_u16()?;
            body.skip_padding(6)?;
            Action::Output { port, max_len }
        }
        COPY_TTL_OUT => {
            body.skip_padding(4)?;
            Action::CopyTtlOut
        }
        COPY_TTL_IN => {
            body.skip_padding(4)?;
            Action::CopyTtlIn
        }
        SET_MPLS_TTL => {
            let ttl = body.read_u8()?;
            body.skip_padding(3)?;
            Action::SetMplsTtl(ttl)
        }
        DEC_MPLS_TTL => {
            body.skip_padding(4)?;
            Action::DecMplsTtl
        }
        PUSH_VLAN | PUSH_MPLS | POP_MPLS | PUSH_PBB => {
            let ethertype = body.read_u16()?;
            body.skip_padding(2)?;
            match typ {
                PUSH_VLAN => Action::PushVlan(ethertype),
                PUSH_MPLS => Action::PushMpls(ethertype),
                POP_MPLS => Action::PopMpls(ethertype),
                _ => Action::PushPbb(ethertype),
            }
        }
        POP_VLAN => {
            body.skip_padding(4)?;
            Action::PopVlan
        }
        SET_QUEUE => Action::SetQueue(body.read_u32()?),
        GROUP => Action::Group(body.read_u32()?),
        SET_NW_TTL => {
            let ttl = body.read_u8()?;
            body.skip_padding(3)?;
            Action::SetNwTtl(ttl)
        }
        DEC_NW_TTL => {
            body.skip_padding(4)?;
            Action::DecNwTtl
        }
        SET_FIELD => Action::SetField(oxm::read_entry(&mut body)?),
        POP_PBB => {
            body.skip_padding(4)?;
            Action::PopPbb
        }
        METER if ctx.version >= Version::V1_5 => Action::Meter(body.read_u32()?),
        ACTION_EXPERIMENTER => {
            let experimenter = body.read_u32()?;
            let data = body.rest();
            Action::Experimenter {
                experimenter,
                body: ctx.experimenter(ExperimenterScope::Action, experimenter, 0, data)?,
            }
        }
        _ => {
            debug!("Unknown action type {}, keeping it opaque", typ);
            Action::Opaque {
                typ,
                data: body.rest().to_vec(),
            }
        }
    };
    body.skip_tail_padding()?;
    Ok(action)
}

/// Decodes actions until the reader is exhausted
pub fn read_actions(ctx: &Context, r: &mut Reader) -> Result<Vec<Action>> {
    r.read_repeated(|r| read_action(ctx, r))
}

fn not_in_version(version: Version) -> Error {
    Error::NotInVersion {
        what: "action",
        version,
    }
}

fn write_action_body(version: Version, action: &Action, o: &mut Vec<u8>) -> Result<()> {
    // the TLV header was written right before
    let start = o.len() - 4;
    match *action {
        Action::Output { port, max_len } => {
            o.write_u32::<NetworkEndian>(port)?;
            o.write_u16::<NetworkEndian>(max_len)?;
            write_padding(o, 6);
        }
        Action::CopyTtlOut
        | Action::CopyTtlIn
        | Action::DecMplsTtl
        | Action::PopVlan
        | Action::DecNwTtl
        | Action::PopPbb => write_padding(o, 4),
        Action::SetMplsTtl(ttl) | Action::SetNwTtl(ttl) => {
            o.write_u8(ttl)?;
            write_padding(o, 3);
        }
        Action::PushVlan(ethertype)
        | Action::PushMpls(ethertype)
        | Action::PopMpls(ethertype)
        | Action::PushPbb(ethertype) => {
            o.write_u16::<NetworkEndian>(ethertype)?;
            write_padding(o, 2);
        }
        Action::SetQueue(id) | Action::Group(id) => o.write_u32::<NetworkEndian>(id)?,
        Action::SetField(ref entry) => {
            oxm::write_entry(entry, o)?;
            write_alignment(o, start);
        }
        Action::Meter(meter_id) => {
            if version < Version::V1_5 {
                return Err(not_in_version(version));
            }
            o.write_u32::<NetworkEndian>(meter_id)?;
        }
        Action::Experimenter {
            experimenter,
            ref body,
        } => {
            o.write_u32::<NetworkEndian>(experimenter)?;
            o.extend_from_slice(&body.to_bytes()?);
        }
        Action::Opaque { ref data, .. } => o.extend_from_slice(data),
        _ => return Err(not_in_version(version)),
    }
    Ok(())
}

fn action_type(action: &Action) -> u16 {
    match *action {
        Action::Output { .. } => OUTPUT,
        Action::CopyTtlOut => COPY_TTL_OUT,
        Action::CopyTtlIn => COPY_TTL_IN,
        Action::SetMplsTtl(_) => SET_MPLS_TTL,
        Action::DecMplsTtl => DEC_MPLS_TTL,
        Action::PushVlan(_) => PUSH_VLAN,
        Action::PopVlan => POP_VLAN,
        Action::PushMpls(_) => PUSH_MPLS,
        Action::PopMpls(_) => POP_MPLS,
        Action::SetQueue(_) => SET_QUEUE,
        Action::Group(_) => GROUP,
        Action::SetNwTtl(_) => SET_NW_TTL,
        Action::DecNwTtl => DEC_NW_TTL,
        Action::SetField(_) => SET_FIELD,
        Action::PushPbb(_) => PUSH_PBB,
        Action::PopPbb => POP_PBB,
        Action::Meter(_) => METER,
        Action::Experimenter { .. } => ACTION_EXPERIMENTER,
        Action::Opaque { typ, .. } => typ,
        // rejected by write_action_body
        _ => 0,
    }
}

pub fn write_action(version: Version, action: &Action, out: &mut Vec<u8>) -> Result<()> {
    write_tlv(out, action_type(action), "action", |o| {
        write_action_body(version, action, o)
    })
}

pub fn write_actions(version: Version, actions: &[Action], out: &mut Vec<u8>) -> Result<()> {
    for action in actions {
        write_action(version, action, out)?;
    }
    Ok(())
}

/// Decodes one instruction, recursing into action lists
pub fn read_instruction(ctx: &Context, r: &mut Reader) -> Result<Instruction> {
    let (typ, mut body) = r.read_tlv()?;
    let instruction = match typ {
        GOTO_TABLE => {
            let table_id = body.read_u8()?;
            body.skip_padding(3)?;
            Instruction::GotoTable(table_id)
        }
        WRITE_METADATA => {
            body.skip_padding(4)?;
            Instruction::WriteMetadata {
                metadata: body.read_u64()?,
                mask: body.read_u64()?,
            }
        }
        WRITE_ACTIONS => {
            body.skip_padding(4)?;
            Instruction::WriteActions(read_actions(ctx, &mut body)?)
        }
        APPLY_ACTIONS => {
            body.skip_padding(4)?;
            Instruction::ApplyActions(read_actions(ctx, &mut body)?)
        }
        CLEAR_ACTIONS => {
            body.skip_padding(4)?;
            Instruction::ClearActions
        }
        INSTRUCTION_METER => Instruction::Meter(body.read_u32()?),
        INSTRUCTION_EXPERIMENTER => {
            let experimenter = body.read_u32()?;
            let data = body.rest();
            Instruction::Experimenter {
                experimenter,
                body: ctx.experimenter(ExperimenterScope::Instruction, experimenter, 0, data)?,
            }
        }
        _ => {
            debug!("Unknown instruction type {}, keeping it opaque", typ);
            Instruction::Opaque {
                typ,
                data: body.rest().to_vec(),
            }
        }
    };
    body.skip_tail_padding()?;
    Ok(instruction)
}

pub fn read_instructions(ctx: &Context, r: &mut Reader) -> Result<Vec<Instruction>> {
    r.read_repeated(|r| read_instruction(ctx, r))
}

pub fn write_instruction(version: Version, instruction: &Instruction, out: &mut Vec<u8>) -> Result<()> {
    let typ = match *instruction {
        Instruction::GotoTable(_) => GOTO_TABLE,
        Instruction::WriteMetadata { .. } => WRITE_METADATA,
        Instruction::WriteActions(_) => WRITE_ACTIONS,
        Instruction::ApplyActions(_) => APPLY_ACTIONS,
        Instruction::ClearActions => CLEAR_ACTIONS,
        Instruction::Meter(_) => INSTRUCTION_METER,
        Instruction::Experimenter { .. } => INSTRUCTION_EXPERIMENTER,
        Instruction::Opaque { typ, .. } => typ,
    };
    write_tlv(out, typ, "instruction", |o| {
        match *instruction {
            Instruction::GotoTable(table_id) => {
                o.write_u8(table_id)?;
                write_padding(o, 3);
            }
            Instruction::WriteMetadata { metadata, mask } => {
                write_padding(o, 4);
                o.write_u64::<NetworkEndian>(metadata)?;
                o.write_u64::<NetworkEndian>(mask)?;
            }
            Instruction::WriteActions(ref actions) | Instruction::ApplyActions(ref actions) => {
                write_padding(o, 4);
                write_actions(version, actions, o)?;
            }
            Instruction::ClearActions => write_padding(o, 4),
            Instruction::Meter(meter_id) => o.write_u32::<NetworkEndian>(meter_id)?,
            Instruction::Experimenter {
                experimenter,
                ref body,
            } => {
                o.write_u32::<NetworkEndian>(experimenter)?;
                o.extend_from_slice(&body.to_bytes()?);
            }
            Instruction::Opaque { ref data, .. } => o.extend_from_slice(data),
        }
        Ok(())
    })
}

pub fn write_instructions(version: Version, instructions: &[Instruction], out: &mut Vec<u8>) -> Result<()> {
    for instruction in instructions {
        write_instruction(version, instruction, out)?;
    }
    Ok(())
}

/// Decodes a body-less action or instruction header of table features
pub fn read_tlv_id(r: &mut Reader) -> Result<TlvId> {
    let (typ, mut body) = r.read_tlv()?;
    let experimenter = if typ == ACTION_EXPERIMENTER && body.remaining() >= 4 {
        Some(body.read_u32()?)
    }
    else {
        None
    };
    body.skip_tail_padding()?;
    Ok(TlvId { typ, experimenter })
}

pub fn write_tlv_id(id: &TlvId, out: &mut Vec<u8>) -> Result<()> {
    write_tlv(out, id.typ, "id", |o| {
        if let Some(experimenter) = id.experimenter {
            o.write_u32::<NetworkEndian>(experimenter)?;
        }
        Ok(())
    })
}
