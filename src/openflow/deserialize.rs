/*!
The primitive reader all decoders are built on

A `Reader` wraps a borrowed byte slice with a cursor. Every composite
structure is decoded from a sub-reader that was sliced to exactly the
structure's declared length, and `finish` checks that the budget was
consumed completely.
*/

use byteorder::{ByteOrder, NetworkEndian};
use crate::openflow::error::{Error, Result};

/// OpenFlow aligns variable sized structures to 64 bits.
pub const ALIGNMENT: usize = 8;

/// Number of padding bytes needed to align `len` to `ALIGNMENT`.
pub fn padding_for(len: usize) -> usize {
    (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
}

/// A cursor over a network byte order buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Reader<'a> {
        Reader { bytes, pos: 0 }
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Bytes read so far
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// The length this reader was created with
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::BufferUnderrun {
                wanted: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(NetworkEndian::read_u16(self.take(2)?))
    }

    /// Reads a 24 bit unsigned integer, used by the PBB I-SID
    pub fn read_u24(&mut self) -> Result<u32> {
        Ok(NetworkEndian::read_u24(self.take(3)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(NetworkEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(NetworkEndian::read_u64(self.take(8)?))
    }

    /// Reads the `n` next bytes without copying them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Reads the `n` next bytes into an owned buffer.
    pub fn read_vec(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    /// Reads a six byte hardware address.
    pub fn read_mac(&mut self) -> Result<[u8; 6]> {
        let b = self.take(6)?;
        Ok([b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    pub fn read_array16(&mut self) -> Result<[u8; 16]> {
        let mut out = [0; 16];
        out.copy_from_slice(self.take(16)?);
        Ok(out)
    }

    /// Reads a NUL padded string field of exactly `n` bytes.
    /// Everything from the first NUL on is dropped.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let raw = self.take(n)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Skips `n` bytes of padding. The content is not checked, switches
    /// are known to send non-zero padding.
    pub fn skip_padding(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Consumes everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.bytes[self.pos..];
        self.pos = self.bytes.len();
        slice
    }

    /// Slices the next `n` bytes into a reader of their own.
    pub fn sub(&mut self, n: usize) -> Result<Reader<'a>> {
        Ok(Reader::new(self.take(n)?))
    }

    /// Reads a u16 at `offset` bytes ahead without moving the cursor.
    pub fn peek_u16(&self, offset: usize) -> Result<u16> {
        let mut ahead = self.clone();
        ahead.skip_padding(offset)?;
        ahead.read_u16()
    }

    /// Reads a u32 at `offset` bytes ahead without moving the cursor.
    pub fn peek_u32(&self, offset: usize) -> Result<u32> {
        let mut ahead = self.clone();
        ahead.skip_padding(offset)?;
        ahead.read_u32()
    }

    /// Reads a TLV header of type (u16) and length (u16) where the length
    /// covers the header itself. Returns the type and a reader over the
    /// remaining `length - 4` bytes.
    pub fn read_tlv(&mut self) -> Result<(u16, Reader<'a>)> {
        let typ = self.read_u16()?;
        let length = self.read_u16()? as usize;
        if length < 4 {
            return Err(Error::LengthMismatch {
                declared: length,
                consumed: 4,
            });
        }
        let body = self.sub(length - 4)?;
        Ok((typ, body))
    }

    /// Skips the padding that aligns a structure of declared length `len`
    /// to 64 bits. The padding may be cut short at the end of the buffer.
    pub fn skip_alignment(&mut self, len: usize) -> Result<()> {
        let pad = padding_for(len).min(self.remaining());
        self.skip_padding(pad)
    }

    /// Skips the unused tail of a TLV whose declared length exceeds its
    /// natural body size. More than seven bytes are not padding.
    pub fn skip_tail_padding(&mut self) -> Result<()> {
        if self.remaining() >= ALIGNMENT {
            return Err(self.mismatch());
        }
        self.rest();
        Ok(())
    }

    /// Decodes records with `f` until the buffer is exhausted.
    pub fn read_repeated<T, F>(&mut self, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Reader<'a>) -> Result<T>,
    {
        let mut out = vec![];
        while !self.is_empty() {
            out.push(f(self)?);
        }
        Ok(out)
    }

    fn mismatch(&self) -> Error {
        Error::LengthMismatch {
            declared: self.len(),
            consumed: self.consumed(),
        }
    }

    /// Fails unless the whole budget of this reader was consumed.
    pub fn finish(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        }
        else {
            Err(self.mismatch())
        }
    }
}
