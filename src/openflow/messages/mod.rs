/*!
The logical OpenFlow message model shared by all supported versions

Fields that only exist in some versions are documented as such. The
decoders fill them with zero or empty values in the other versions and
the encoders ignore them there.
*/

pub mod action;
pub mod experimenter;
pub mod flow;
pub mod group;
pub mod hello;
pub mod multipart;
pub mod oxm;
pub mod switch;

pub use self::action::{Action, Instruction, TlvId};
pub use self::experimenter::{ExperimenterBody, ExperimenterData};
pub use self::flow::{FlowMod, FlowRemoved, Match, MatchV10, PacketIn, PacketOut};
pub use self::group::{
    Bucket, GroupMod, MeterBand, MeterMod, PacketQueue, QueueGetConfigReply,
    QueueGetConfigRequest, QueueProperty,
};
pub use self::hello::{Hello, HelloElement};
pub use self::multipart::{
    MultipartExperimenter, MultipartReply, MultipartReplyBody, MultipartRequest,
    MultipartRequestBody,
};
pub use self::oxm::{MacAddr, Masked, MatchEntry, OxmField, OxmId};
pub use self::switch::{
    AsyncConfig, ErrorMsg, ExperimenterError, ExperimenterMsg, FeaturesReply, Port, PortMod,
    PortStatus, Role, SwitchConfig, TableMod,
};

use crate::openflow::version::MessageKind;

/// A decoded top-level message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Hello(Hello),
    Error(ErrorMsg),
    /// An error of type experimenter, shares the error type code
    ExperimenterError(ExperimenterError),
    EchoRequest(Vec<u8>),
    EchoReply(Vec<u8>),
    Experimenter(ExperimenterMsg),
    FeaturesRequest,
    FeaturesReply(FeaturesReply),
    GetConfigRequest,
    GetConfigReply(SwitchConfig),
    SetConfig(SwitchConfig),
    PacketIn(PacketIn),
    FlowRemoved(FlowRemoved),
    PortStatus(PortStatus),
    PacketOut(PacketOut),
    FlowMod(FlowMod),
    GroupMod(GroupMod),
    PortMod(PortMod),
    TableMod(TableMod),
    MultipartRequest(MultipartRequest),
    MultipartReply(MultipartReply),
    BarrierRequest,
    BarrierReply,
    QueueGetConfigRequest(QueueGetConfigRequest),
    QueueGetConfigReply(QueueGetConfigReply),
    RoleRequest(Role),
    RoleReply(Role),
    GetAsyncRequest,
    GetAsyncReply(AsyncConfig),
    SetAsync(AsyncConfig),
    MeterMod(MeterMod),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match *self {
            Message::Hello(_) => MessageKind::Hello,
            Message::Error(_) | Message::ExperimenterError(_) => MessageKind::Error,
            Message::EchoRequest(_) => MessageKind::EchoRequest,
            Message::EchoReply(_) => MessageKind::EchoReply,
            Message::Experimenter(_) => MessageKind::Experimenter,
            Message::FeaturesRequest => MessageKind::FeaturesRequest,
            Message::FeaturesReply(_) => MessageKind::FeaturesReply,
            Message::GetConfigRequest => MessageKind::GetConfigRequest,
            Message::GetConfigReply(_) => MessageKind::GetConfigReply,
            Message::SetConfig(_) => MessageKind::SetConfig,
            Message::PacketIn(_) => MessageKind::PacketIn,
            Message::FlowRemoved(_) => MessageKind::FlowRemoved,
            Message::PortStatus(_) => MessageKind::PortStatus,
            Message::PacketOut(_) => MessageKind::PacketOut,
            Message::FlowMod(_) => MessageKind::FlowMod,
            Message::GroupMod(_) => MessageKind::GroupMod,
            Message::PortMod(_) => MessageKind::PortMod,
            Message::TableMod(_) => MessageKind::TableMod,
            Message::MultipartRequest(_) => MessageKind::MultipartRequest,
            Message::MultipartReply(_) => MessageKind::MultipartReply,
            Message::BarrierRequest => MessageKind::BarrierRequest,
            Message::BarrierReply => MessageKind::BarrierReply,
            Message::QueueGetConfigRequest(_) => MessageKind::QueueGetConfigRequest,
            Message::QueueGetConfigReply(_) => MessageKind::QueueGetConfigReply,
            Message::RoleRequest(_) => MessageKind::RoleRequest,
            Message::RoleReply(_) => MessageKind::RoleReply,
            Message::GetAsyncRequest => MessageKind::GetAsyncRequest,
            Message::GetAsyncReply(_) => MessageKind::GetAsyncReply,
            Message::SetAsync(_) => MessageKind::SetAsync,
            Message::MeterMod(_) => MessageKind::MeterMod,
        }
    }
}
