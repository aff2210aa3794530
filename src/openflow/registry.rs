/*!
The decoder registry

Decoders are keyed strictly per version: the same type number means
different messages in different OpenFlow versions. A `Registry` is
filled once, then shared read-only (usually behind an `Arc`) by every
thread that decodes.
*/

use crate::openflow::deserialize::Reader;
use crate::openflow::error::Result;
use crate::openflow::messages::{
    ExperimenterBody, ExperimenterData, Message, MultipartReplyBody, MultipartRequestBody,
};
use crate::openflow::version::{MessageKind, Version};
use crate::openflow::{of10, of13};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a decoder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Message,
    MultipartRequest,
    MultipartReply,
}

/// Looks up a decoder by version, wire type code and target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecKey {
    pub version: Version,
    pub code: u16,
    pub target: Target,
}

impl CodecKey {
    pub fn new(version: Version, code: u16, target: Target) -> CodecKey {
        CodecKey {
            version,
            code,
            target,
        }
    }
}

/// The structure an experimenter payload was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimenterScope {
    Message,
    Error,
    MultipartRequest,
    MultipartReply,
    Action,
    Instruction,
    MeterBand,
    TableFeatureProperty,
    QueueProperty,
}

/// Looks up an experimenter decoder. `subtype` is the wire exp_type of
/// structures that carry one and 0 for all others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExperimenterKey {
    pub scope: ExperimenterScope,
    pub experimenter: u32,
    pub subtype: u32,
}

impl ExperimenterKey {
    pub fn new(scope: ExperimenterScope, experimenter: u32, subtype: u32) -> ExperimenterKey {
        ExperimenterKey {
            scope,
            experimenter,
            subtype,
        }
    }
}

pub type MessageDecoder = fn(&Context, &mut Reader) -> Result<Message>;
pub type MultipartRequestDecoder = fn(&Context, &mut Reader) -> Result<MultipartRequestBody>;
pub type MultipartReplyDecoder = fn(&Context, &mut Reader) -> Result<MultipartReplyBody>;

/// Decodes the bytes that follow an experimenter header
pub type ExperimenterDecoder =
    Arc<dyn Fn(Version, &[u8]) -> Result<Arc<dyn ExperimenterData>> + Send + Sync>;

#[derive(Clone, Copy)]
enum Decoder {
    Message(MessageKind, MessageDecoder),
    MultipartRequest(MultipartRequestDecoder),
    MultipartReply(MultipartReplyDecoder),
}

/// Everything a body decoder needs besides its bytes
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub registry: &'a Registry,
    pub version: Version,
}

impl<'a> Context<'a> {
    pub fn new(registry: &'a Registry, version: Version) -> Context<'a> {
        Context { registry, version }
    }

    /// Hands an experimenter payload to its registered decoder. Without a
    /// registration the bytes are kept as they are.
    pub fn experimenter(
        &self,
        scope: ExperimenterScope,
        experimenter: u32,
        subtype: u32,
        bytes: &[u8],
    ) -> Result<ExperimenterBody> {
        let key = ExperimenterKey::new(scope, experimenter, subtype);
        match self.registry.lookup_experimenter(&key) {
            Some(decoder) => Ok(ExperimenterBody::Decoded(decoder(self.version, bytes)?)),
            None => {
                debug!(
                    "No decoder for experimenter 0x{:08x} subtype {} in {:?}, keeping {} raw bytes",
                    experimenter,
                    subtype,
                    scope,
                    bytes.len()
                );
                Ok(ExperimenterBody::Raw(bytes.to_vec()))
            }
        }
    }
}

/// Maps codec keys to decoders
#[derive(Default)]
pub struct Registry {
    decoders: HashMap<CodecKey, Decoder>,
    experimenters: HashMap<ExperimenterKey, ExperimenterDecoder>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Registry {
        Registry::default()
    }

    /// A registry with the decoders of all supported versions
    pub fn bootstrap() -> Registry {
        let mut registry = Registry::new();
        of10::register(&mut registry);
        for version in &[Version::V1_3, Version::V1_4, Version::V1_5] {
            of13::register(&mut registry, *version);
        }
        debug!("Registered {} decoders", registry.decoders.len());
        registry
    }

    pub fn register_message(
        &mut self,
        version: Version,
        code: u8,
        kind: MessageKind,
        decoder: MessageDecoder,
    ) {
        let key = CodecKey::new(version, u16::from(code), Target::Message);
        self.decoders.insert(key, Decoder::Message(kind, decoder));
    }

    pub fn register_multipart_request(
        &mut self,
        version: Version,
        code: u16,
        decoder: MultipartRequestDecoder,
    ) {
        let key = CodecKey::new(version, code, Target::MultipartRequest);
        self.decoders.insert(key, Decoder::MultipartRequest(decoder));
    }

    pub fn register_multipart_reply(
        &mut self,
        version: Version,
        code: u16,
        decoder: MultipartReplyDecoder,
    ) {
        let key = CodecKey::new(version, code, Target::MultipartReply);
        self.decoders.insert(key, Decoder::MultipartReply(decoder));
    }

    /// Registers a vendor extension decoder, replacing an earlier one
    pub fn register_experimenter<F>(&mut self, key: ExperimenterKey, decoder: F)
    where
        F: Fn(Version, &[u8]) -> Result<Arc<dyn ExperimenterData>> + Send + Sync + 'static,
    {
        self.experimenters.insert(key, Arc::new(decoder));
    }

    pub fn lookup_message(&self, version: Version, code: u8) -> Option<(MessageKind, MessageDecoder)> {
        let key = CodecKey::new(version, u16::from(code), Target::Message);
        match self.decoders.get(&key) {
            Some(&Decoder::Message(kind, decoder)) => Some((kind, decoder)),
            _ => None,
        }
    }

    pub fn lookup_multipart_request(&self, version: Version, code: u16) -> Option<MultipartRequestDecoder> {
        let key = CodecKey::new(version, code, Target::MultipartRequest);
        match self.decoders.get(&key) {
            Some(&Decoder::MultipartRequest(decoder)) => Some(decoder),
            _ => None,
        }
    }

    pub fn lookup_multipart_reply(&self, version: Version, code: u16) -> Option<MultipartReplyDecoder> {
        let key = CodecKey::new(version, code, Target::MultipartReply);
        match self.decoders.get(&key) {
            Some(&Decoder::MultipartReply(decoder)) => Some(decoder),
            _ => None,
        }
    }

    pub fn lookup_experimenter(&self, key: &ExperimenterKey) -> Option<&ExperimenterDecoder> {
        self.experimenters.get(key)
    }

    /// True if a decoder exists for `key`
    pub fn contains(&self, key: &CodecKey) -> bool {
        self.decoders.contains_key(key)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry")
            .field("decoders", &self.decoders.len())
            .field("experimenters", &self.experimenters.len())
            .finish()
    }
}
