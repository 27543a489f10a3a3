//! Identifier → message kind mapping for the handshake protocol.
//! Classification is a pure function of the identifier: no state, no
//! dependency on earlier frames, no dependency on the frame format.
use crate::error::ConfigError;
use crate::protocol::transport::can_id::{CanId, EXTENDED_ID_MAX};

//==================================================================================IDENTIFIERS
/// Master → slave: end the data phase.
pub const ID_MASTER_STOP_CMD: u32 = 0x0A0;
/// Master → slave: start the data phase.
pub const ID_MASTER_START_CMD: u32 = 0x0A1;
/// Master → slave: presence check opening a cycle.
pub const ID_MASTER_PING: u32 = 0x0A2;
/// Slave → master: acknowledges the stop command.
pub const ID_SLAVE_STOP_RESP: u32 = 0x0B0;
/// Slave → master: one data sample.
pub const ID_SLAVE_DATA: u32 = 0x0B1;
/// Slave → master: answers the ping.
pub const ID_SLAVE_PING_RESP: u32 = 0x0B2;

//==================================================================================MESSAGE_KIND
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Semantic tag of a frame, derived solely from its identifier.
pub enum MessageKind {
    Ping,
    PingResponse,
    StartCommand,
    Data,
    StopCommand,
    StopResponse,
    /// Any identifier outside the protocol table (foreign bus traffic).
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Which side of the handshake emits a message.
pub enum Origin {
    Master,
    Slave,
    Unknown,
}

impl MessageKind {
    /// Every protocol kind, `Unknown` excluded.
    pub const PROTOCOL: [MessageKind; 6] = [
        MessageKind::Ping,
        MessageKind::PingResponse,
        MessageKind::StartCommand,
        MessageKind::Data,
        MessageKind::StopCommand,
        MessageKind::StopResponse,
    ];

    pub fn origin(&self) -> Origin {
        match self {
            MessageKind::Ping | MessageKind::StartCommand | MessageKind::StopCommand => {
                Origin::Master
            }
            MessageKind::PingResponse | MessageKind::Data | MessageKind::StopResponse => {
                Origin::Slave
            }
            MessageKind::Unknown => Origin::Unknown,
        }
    }

    pub fn is_protocol(&self) -> bool {
        !matches!(self, MessageKind::Unknown)
    }
}

//==================================================================================PROTOCOL_IDS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Identifier table of the six protocol messages.
pub struct ProtocolIds {
    pub stop_command: u32,
    pub start_command: u32,
    pub ping: u32,
    pub stop_response: u32,
    pub data: u32,
    pub ping_response: u32,
}

impl ProtocolIds {
    /// The fixed table used on the reference network.
    pub const fn standard() -> Self {
        Self {
            stop_command: ID_MASTER_STOP_CMD,
            start_command: ID_MASTER_START_CMD,
            ping: ID_MASTER_PING,
            stop_response: ID_SLAVE_STOP_RESP,
            data: ID_SLAVE_DATA,
            ping_response: ID_SLAVE_PING_RESP,
        }
    }

    /// Map an identifier onto its message kind. Total: anything not in the
    /// table is [`MessageKind::Unknown`].
    pub fn classify(&self, id: CanId) -> MessageKind {
        let id = id.raw();
        self.entries()
            .into_iter()
            .find(|(_, known)| *known == id)
            .map_or(MessageKind::Unknown, |(kind, _)| kind)
    }

    /// Identifier assigned to `kind`, `None` for [`MessageKind::Unknown`].
    pub fn id_of(&self, kind: MessageKind) -> Option<CanId> {
        self.entries()
            .into_iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, id)| CanId(id))
    }

    /// Reject tables that would make classification ambiguous.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self.entries();
        for (index, (_, id)) in entries.iter().enumerate() {
            if *id > EXTENDED_ID_MAX {
                return Err(ConfigError::IdentifierOutOfRange { id: *id });
            }
            if entries[index + 1..].iter().any(|(_, other)| other == id) {
                return Err(ConfigError::DuplicateIdentifier { id: *id });
            }
        }
        Ok(())
    }

    fn entries(&self) -> [(MessageKind, u32); 6] {
        [
            (MessageKind::StopCommand, self.stop_command),
            (MessageKind::StartCommand, self.start_command),
            (MessageKind::Ping, self.ping),
            (MessageKind::StopResponse, self.stop_response),
            (MessageKind::Data, self.data),
            (MessageKind::PingResponse, self.ping_response),
        ]
    }
}

impl Default for ProtocolIds {
    fn default() -> Self {
        Self::standard()
    }
}

/// Classify against the standard identifier table.
pub fn classify(id: CanId) -> MessageKind {
    ProtocolIds::standard().classify(id)
}
