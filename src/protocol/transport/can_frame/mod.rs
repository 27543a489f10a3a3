//! In-memory representation of a classic CAN frame as delivered by a
//! listen-only controller.
use embedded_can::{Frame, Id};

use crate::error::FrameError;
use crate::protocol::transport::{can_id::CanId, CLASSIC_CAN_MAX_DLC};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Received bus frame. Immutable once built: the constructors enforce the
/// identifier width and the 0..=8 length bound.
pub struct CanFrame {
    id: Id,
    remote: bool,
    dlc: usize,
    data: [u8; CLASSIC_CAN_MAX_DLC],
}

impl CanFrame {
    /// Data frame with an 11-bit identifier.
    pub fn standard(id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        Self::data_frame(CanId(id), false, payload)
    }

    /// Data frame with a 29-bit identifier.
    pub fn extended(id: u32, payload: &[u8]) -> Result<Self, FrameError> {
        Self::data_frame(CanId(id), true, payload)
    }

    /// Data frame in the requested format.
    pub fn data_frame(id: CanId, extended: bool, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > CLASSIC_CAN_MAX_DLC {
            return Err(FrameError::PayloadTooLong { len: payload.len() });
        }
        let id = id
            .to_id(extended)
            .ok_or(FrameError::IdentifierOutOfRange { id: id.raw() })?;

        let mut data = [0u8; CLASSIC_CAN_MAX_DLC];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            remote: false,
            dlc: payload.len(),
            data,
        })
    }

    /// Remote-request frame: carries a length code but no payload bytes.
    pub fn remote_frame(id: CanId, extended: bool, dlc: usize) -> Result<Self, FrameError> {
        if dlc > CLASSIC_CAN_MAX_DLC {
            return Err(FrameError::PayloadTooLong { len: dlc });
        }
        let id = id
            .to_id(extended)
            .ok_or(FrameError::IdentifierOutOfRange { id: id.raw() })?;
        Ok(Self {
            id,
            remote: true,
            dlc,
            data: [0u8; CLASSIC_CAN_MAX_DLC],
        })
    }

    /// Copy any `embedded-can` frame (HAL driver output) into a `CanFrame`.
    pub fn from_hal<F: Frame>(frame: &F) -> Option<Self> {
        if frame.is_remote_frame() {
            <Self as Frame>::new_remote(frame.id(), frame.dlc())
        } else {
            <Self as Frame>::new(frame.id(), frame.data())
        }
    }

    /// Numeric identifier used for classification.
    pub fn can_id(&self) -> CanId {
        CanId::from(self.id)
    }

    /// `true` for 29-bit identifiers.
    pub fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    /// `true` for remote-request frames.
    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Data length code (0 to 8).
    pub fn dlc(&self) -> usize {
        self.dlc
    }

    /// Payload bytes. Always empty for remote-request frames.
    pub fn payload(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            &self.data[..self.dlc]
        }
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let id = id.into();
        Self::data_frame(CanId::from(id), matches!(id, Id::Extended(_)), data).ok()
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        let id = id.into();
        Self::remote_frame(CanId::from(id), matches!(id, Id::Extended(_)), dlc).ok()
    }

    fn is_extended(&self) -> bool {
        CanFrame::is_extended(self)
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
