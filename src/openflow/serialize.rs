/*!
Writer helpers shared by all encoders

Every encoder writes into a `Vec<u8>` so that length fields can be
patched once the variable part of a structure is known. Only the
top-level `Codec::encode` writes to an arbitrary `Write` stream.
*/

use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use crate::openflow::deserialize::padding_for;
use crate::openflow::error::{Error, Result};
use std::io::Write;

/// Writes `n` zero bytes.
pub fn write_padding(out: &mut Vec<u8>, n: usize) {
    out.extend(std::iter::repeat(0).take(n));
}

/// Pads the structure that started at `start` to a multiple of 8 bytes.
pub fn write_alignment(out: &mut Vec<u8>, start: usize) {
    let pad = padding_for(out.len() - start);
    write_padding(out, pad);
}

/// Writes `s` into a NUL padded field of exactly `n` bytes.
/// A longer string is cut at the last char boundary that fits, so names
/// decoded with replacement characters can be written back.
pub fn write_fixed_string(out: &mut Vec<u8>, s: &str, n: usize) -> Result<()> {
    let mut end = s.len().min(n);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    if end < s.len() {
        debug!("Cutting string {:?} to {} bytes", s, end);
    }
    out.write_all(&s.as_bytes()[..end])?;
    write_padding(out, n - end);
    Ok(())
}

/// Checks that `len` fits into a 16 bit length field.
pub fn length_u16(len: usize, what: &'static str) -> Result<u16> {
    if len > u16::max_value() as usize {
        Err(Error::Oversized(what))
    }
    else {
        Ok(len as u16)
    }
}

/// Writes a length placeholder and returns its position for `patch_length`.
pub fn length_placeholder(out: &mut Vec<u8>) -> usize {
    let at = out.len();
    out.extend_from_slice(&[0, 0]);
    at
}

/// Overwrites the placeholder at `at` with the number of bytes written
/// since `start`.
pub fn patch_length(out: &mut Vec<u8>, at: usize, start: usize, what: &'static str) -> Result<()> {
    let len = length_u16(out.len() - start, what)?;
    NetworkEndian::write_u16(&mut out[at..at + 2], len);
    Ok(())
}

/// Writes a type/length framed structure whose length covers the
/// 4 byte header and everything `body` writes. No padding is added.
pub fn write_tlv<F>(out: &mut Vec<u8>, typ: u16, what: &'static str, body: F) -> Result<()>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let start = out.len();
    out.write_u16::<NetworkEndian>(typ)?;
    let at = length_placeholder(out);
    body(out)?;
    patch_length(out, at, start, what)
}
