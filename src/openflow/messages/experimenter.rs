//! Vendor extension payloads

use std::any::Any;
use std::fmt::Debug;
use std::io;
use std::sync::Arc;

/// A decoded experimenter payload.
///
/// Implemented by whoever registers an experimenter decoder. The codec
/// only needs to write the payload back out.
pub trait ExperimenterData: Debug + Send + Sync {
    /// Writes the payload as it follows the experimenter header
    fn serialize(&self, out: &mut Vec<u8>) -> io::Result<()>;

    fn as_any(&self) -> &dyn Any;
}

/// The payload that follows an experimenter id (and subtype)
#[derive(Debug, Clone)]
pub enum ExperimenterBody {
    /// No decoder was registered for the experimenter, the bytes are kept
    Raw(Vec<u8>),
    Decoded(Arc<dyn ExperimenterData>),
}

impl ExperimenterBody {
    /// The wire representation of this payload
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        match *self {
            ExperimenterBody::Raw(ref bytes) => Ok(bytes.clone()),
            ExperimenterBody::Decoded(ref data) => {
                let mut out = vec![];
                data.serialize(&mut out)?;
                Ok(out)
            }
        }
    }

    /// Downcasts a decoded payload to the registering decoder's type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match *self {
            ExperimenterBody::Raw(_) => None,
            ExperimenterBody::Decoded(ref data) => data.as_any().downcast_ref::<T>(),
        }
    }
}

impl Default for ExperimenterBody {
    fn default() -> ExperimenterBody {
        ExperimenterBody::Raw(vec![])
    }
}

// Two payloads are equal when they serialize to the same bytes.
impl PartialEq for ExperimenterBody {
    fn eq(&self, other: &ExperimenterBody) -> bool {
        match (self.to_bytes(), other.to_bytes()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    impl ExperimenterData for Counter {
        fn serialize(&self, out: &mut Vec<u8>) -> io::Result<()> {
            out.extend_from_slice(&self.0.to_be_bytes());
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn equality_by_wire_bytes() {
        let decoded = ExperimenterBody::Decoded(Arc::new(Counter(7)));
        assert_eq!(ExperimenterBody::Raw(vec![0, 0, 0, 7]), decoded);
        assert!(ExperimenterBody::Raw(vec![0, 0, 0, 8]) != decoded);
    }

    #[test]
    fn downcast() {
        let decoded = ExperimenterBody::Decoded(Arc::new(Counter(7)));
        assert_eq!(Some(&Counter(7)), decoded.downcast_ref::<Counter>());
        assert_eq!(None, ExperimenterBody::Raw(vec![]).downcast_ref::<Counter>());
    }
}
