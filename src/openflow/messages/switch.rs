//! Symmetric, handshake, switch configuration and port messages

use crate::openflow::error_codes;
use crate::openflow::fields::{
    Capabilities, ControllerRole, PortConfig, PortFeatures, PortReason, PortState,
};
use crate::openflow::messages::experimenter::ExperimenterBody;
use crate::openflow::messages::oxm::MacAddr;
use crate::openflow::version::Version;

/// An error reported by the peer.
///
/// The names are resolved against the message's version when decoding;
/// unknown values map to `UNKNOWN_TYPE` and `UNKNOWN_CODE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMsg {
    pub typ: u16,
    pub code: u16,
    pub type_name: &'static str,
    pub code_name: &'static str,
    /// At least 64 bytes of the failed request, if the switch sent any
    pub data: Option<Vec<u8>>,
}

impl ErrorMsg {
    pub fn new(version: Version, typ: u16, code: u16, data: Vec<u8>) -> ErrorMsg {
        ErrorMsg {
            typ,
            code,
            type_name: error_codes::type_name(version, typ),
            code_name: error_codes::code_name(version, typ, code),
            data: if data.is_empty() { None } else { Some(data) },
        }
    }
}

/// An error of type experimenter, 1.3 and later
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimenterError {
    pub exp_type: u16,
    pub experimenter: u32,
    pub body: ExperimenterBody,
}

/// The Experimenter (Vendor in 1.0) message. 1.0 has no `exp_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimenterMsg {
    pub experimenter: u32,
    pub exp_type: u32,
    pub body: ExperimenterBody,
}

/// Describes a physical port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub port_no: u32,
    pub hw_addr: MacAddr,
    pub name: String,
    pub config: PortConfig,
    pub state: PortState,
    pub curr: PortFeatures,
    pub advertised: PortFeatures,
    pub supported: PortFeatures,
    pub peer: PortFeatures,
    /// 1.3+
    pub curr_speed: u32,
    /// 1.3+
    pub max_speed: u32,
}

/// The reply to a features request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturesReply {
    pub datapath_id: u64,
    pub n_buffers: u32,
    pub n_tables: u8,
    /// 1.3+
    pub auxiliary_id: u8,
    pub capabilities: Capabilities,
    /// The supported actions bitmap of 1.0, reserved since 1.3
    pub actions: u32,
    /// 1.0 only, later versions use a port description multipart request
    pub ports: Vec<Port>,
}

/// Used by the get config reply and set config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchConfig {
    /// IP fragment handling
    pub flags: u16,
    pub miss_send_len: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortStatus {
    pub reason: PortReason,
    pub desc: Port,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMod {
    pub port_no: u32,
    pub hw_addr: MacAddr,
    pub config: PortConfig,
    pub mask: PortConfig,
    pub advertise: PortFeatures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMod {
    pub table_id: u8,
    pub config: u32,
}

/// Role request and reply body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub role: ControllerRole,
    pub generation_id: u64,
}

/// Asynchronous message filter, index 0 for the master or equal role
/// and index 1 for the slave role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsyncConfig {
    pub packet_in_mask: [u32; 2],
    pub port_status_mask: [u32; 2],
    pub flow_removed_mask: [u32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_names_resolved() {
        let err = ErrorMsg::new(Version::V1_3, 0x20, 5, vec![0, 1, 2, 3]);
        assert_eq!("UNKNOWN_TYPE", err.type_name);
        assert_eq!("UNKNOWN_CODE", err.code_name);
        assert_eq!(Some(vec![0, 1, 2, 3]), err.data);

        let err = ErrorMsg::new(Version::V1_3, 0, 0, vec![]);
        assert_eq!("HELLOFAILED", err.type_name);
        assert_eq!(None, err.data);
    }
}
