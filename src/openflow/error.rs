use crate::openflow::version::{MessageKind, Version};
use std::error;
use std::fmt;
use std::io;
use std::result;

/// Everything that can go wrong while decoding or encoding a single message.
///
/// Structural violations (`BufferUnderrun`, `LengthMismatch`, `BadHeaderLength`)
/// are fatal for the message they occur in. Unknown enumeration values and
/// unknown TLV type codes are never reported here, they decode to sentinel or
/// opaque values instead.
#[derive(Debug)]
pub enum Error {
    /// A primitive read wanted more bytes than were left.
    BufferUnderrun { wanted: usize, remaining: usize },
    /// A structure consumed a different number of bytes than it declared.
    LengthMismatch { declared: usize, consumed: usize },
    /// The header's length field disagrees with the buffer handed in.
    BadHeaderLength { declared: usize, available: usize },
    /// The header's version byte is not a supported OpenFlow version.
    UnsupportedVersion(u8),
    /// No decoder is registered for this version and type code.
    UnsupportedMessageType(Version, u8),
    /// A structural error inside the body of a message.
    Message {
        kind: MessageKind,
        version: Version,
        cause: Box<Error>,
    },
    /// The value has no wire representation in the requested version.
    NotInVersion { what: &'static str, version: Version },
    /// A length does not fit into its wire field.
    Oversized(&'static str),
    Io(io::Error),
}

impl Error {
    /// Strips any `Error::Message` wrapping and returns the structural cause.
    pub fn root_cause(&self) -> &Error {
        match *self {
            Error::Message { ref cause, .. } => cause.root_cause(),
            ref e => e,
        }
    }

    /// True for errors that only reject the current message.
    ///
    /// The stream itself is still in sync, the caller may log and continue.
    pub fn is_recoverable(&self) -> bool {
        match *self {
            Error::UnsupportedMessageType(..) | Error::UnsupportedVersion(_) => true,
            Error::Message { .. } => true,
            _ => false,
        }
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        "OpenFlow codec error"
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BufferUnderrun { wanted, remaining } => write!(
                f,
                "buffer underrun: wanted {} bytes, {} remaining",
                wanted, remaining
            ),
            Error::LengthMismatch { declared, consumed } => write!(
                f,
                "length mismatch: declared {} bytes, consumed {}",
                declared, consumed
            ),
            Error::BadHeaderLength {
                declared,
                available,
            } => write!(
                f,
                "header declares {} bytes but {} are available",
                declared, available
            ),
            Error::UnsupportedVersion(v) => write!(f, "unsupported OpenFlow version 0x{:02x}", v),
            Error::UnsupportedMessageType(version, typ) => {
                write!(f, "no decoder for message type {} in OpenFlow {}", typ, version)
            }
            Error::Message {
                kind,
                version,
                ref cause,
            } => write!(f, "malformed {:?} (OpenFlow {}): {}", kind, version, cause),
            Error::NotInVersion { what, version } => {
                write!(f, "{} cannot be encoded in OpenFlow {}", what, version)
            }
            Error::Oversized(what) => write!(f, "{} exceeds its length field", what),
            Error::Io(ref e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = result::Result<T, Error>;
