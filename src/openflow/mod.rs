/*!
Implements an OpenFlow wire codec for the protocol versions 1.0, 1.3, 1.4
and 1.5.

Every message starts with the 8 byte header. The dispatcher reads it, looks
up the body decoder registered for the header's version and type code and
checks that the decoder consumed exactly the declared length. Encoding goes
the other way round and recomputes the header length.
*/

pub mod common;
pub mod deserialize;
pub mod error;
pub mod error_codes;
pub mod fields;
pub mod messages;
pub mod of10;
pub mod of13;
pub mod registry;
pub mod serialize;
pub mod version;

use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};

use crate::openflow::deserialize::Reader;
use crate::openflow::error::{Error, Result};
use crate::openflow::messages::Message;
use crate::openflow::registry::{Context, Registry};
use crate::openflow::serialize::length_u16;
use crate::openflow::version::{type_code, Version};

use std::io::Write;
use std::sync::Arc;

pub const HEADER_LEN: usize = 8;

/// The header in front of every OpenFlow message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfpHeader {
    pub version: u8,
    pub typ: u8,
    pub length: u16,
    pub xid: u32,
}

impl OfpHeader {
    /// Deserializes an OpenFlow header
    pub fn deserialize(bytes: &[u8; HEADER_LEN]) -> OfpHeader {
        OfpHeader {
            version: bytes[0],
            typ: bytes[1],
            length: NetworkEndian::read_u16(&bytes[2..4]),
            xid: NetworkEndian::read_u32(&bytes[4..]),
        }
    }

    /// Returns the body length in byte, zero for a header that declares
    /// less than its own size
    pub fn body_length(&self) -> usize {
        (self.length as usize).saturating_sub(HEADER_LEN)
    }

    /// Serializes this header on the given stream
    pub fn serialize<S: Write>(&self, stream: &mut S) -> Result<()> {
        stream.write_all(&[self.version, self.typ])?;
        stream.write_u16::<NetworkEndian>(self.length)?;
        stream.write_u32::<NetworkEndian>(self.xid)?;
        Ok(())
    }
}

/// A decoded message together with its header values
#[derive(Debug, Clone, PartialEq)]
pub struct OfpMessage {
    pub version: Version,
    pub xid: u32,
    pub message: Message,
}

/// The declared length of the message at the start of `bytes`, `None`
/// while fewer than 8 bytes are available.
///
/// Transports use this to cut a byte stream into messages before handing
/// them to `Codec::decode`.
pub fn frame_length(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < HEADER_LEN {
        return None;
    }
    Some(NetworkEndian::read_u16(&bytes[2..4]) as usize)
}

/// Decodes and encodes whole messages. Cloning is cheap, all clones share
/// one read-only registry.
#[derive(Clone)]
pub struct Codec {
    registry: Arc<Registry>,
}

impl Default for Codec {
    fn default() -> Codec {
        Codec::with_defaults()
    }
}

impl Codec {
    /// A codec over a registry the caller has filled, e.g. with experimenter
    /// decoders on top of `Registry::bootstrap`
    pub fn new(registry: Registry) -> Codec {
        Codec {
            registry: Arc::new(registry),
        }
    }

    /// A codec with the decoders of all supported versions
    pub fn with_defaults() -> Codec {
        Codec::new(Registry::bootstrap())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decodes one complete message. `bytes` must hold exactly the number of
    /// bytes the header declares.
    pub fn decode(&self, bytes: &[u8]) -> Result<OfpMessage> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::BufferUnderrun {
                wanted: HEADER_LEN,
                remaining: bytes.len(),
            });
        }
        let mut hbuf = [0; HEADER_LEN];
        hbuf.copy_from_slice(&bytes[..HEADER_LEN]);
        let header = OfpHeader::deserialize(&hbuf);
        trace!("Incoming message: {:?}", header);

        let declared = header.length as usize;
        if declared < HEADER_LEN || declared != bytes.len() {
            return Err(Error::BadHeaderLength {
                declared,
                available: bytes.len(),
            });
        }
        let version = Version::from_wire(header.version).ok_or(Error::UnsupportedVersion(header.version))?;
        let (kind, decoder) = self
            .registry
            .lookup_message(version, header.typ)
            .ok_or(Error::UnsupportedMessageType(version, header.typ))?;

        let ctx = Context::new(&self.registry, version);
        let mut body = Reader::new(&bytes[HEADER_LEN..]);
        let message = decoder(&ctx, &mut body)
            .and_then(|message| body.finish().map(|_| message))
            .map_err(|cause| Error::Message {
                kind,
                version,
                cause: Box::new(cause),
            })?;
        debug!("Decoded {:?} with xid {} in version {}", kind, header.xid, version);
        Ok(OfpMessage {
            version,
            xid: header.xid,
            message,
        })
    }

    /// Encodes `message` as a `version` message with the transaction id
    /// `xid` on the given stream
    pub fn encode<S: Write>(&self, version: Version, xid: u32, message: &Message, stream: &mut S) -> Result<()> {
        let kind = message.kind();
        let typ = type_code(version, kind).ok_or(Error::NotInVersion {
            what: "message type",
            version,
        })?;
        let mut body = vec![];
        if version.is_oxm() {
            of13::write_body(version, message, &mut body)?;
        }
        else {
            of10::write_body(message, &mut body)?;
        }
        let header = OfpHeader {
            version: version.wire(),
            typ,
            length: length_u16(HEADER_LEN + body.len(), "message")?,
            xid,
        };
        debug!("Outgoing message: {:?}", header);
        header.serialize(stream)?;
        stream.write_all(&body)?;
        Ok(())
    }

    /// Encodes `message` into a new buffer
    pub fn to_bytes(&self, version: Version, xid: u32, message: &Message) -> Result<Vec<u8>> {
        let mut out = vec![];
        self.encode(version, xid, message, &mut out)?;
        Ok(out)
    }
}
