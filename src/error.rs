//! Error definitions shared across library modules.
//! Only a hard bus fault escapes the reception loop; timeouts and
//! out-of-sequence frames are absorbed and reported as observations.
use core::fmt::Debug;
use thiserror_no_std::Error;

//==================================================================================OBSERVER_ERROR
#[derive(Error, Debug)]
/// Terminal failures of an observation run.
pub enum ObserverError<E: Debug> {
    /// The bus interface reported a controller-level fault (bus-off, driver
    /// error...). The loop stops immediately and never retries.
    #[error("Bus fault after {frames_observed} frames: {error:?}")]
    BusFault {
        /// Diagnostic returned by the bus interface.
        error: E,
        /// Frames successfully processed before the fault.
        frames_observed: u32,
        /// Handshake cycles completed before the fault.
        completed_cycles: u32,
    },

    /// The listen-only controller could not be installed.
    #[error("Bus driver install error: {0:?}")]
    Install(E),

    /// The observer configuration was rejected before the run started.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

//==================================================================================CONFIG_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Invalid observer configuration.
pub enum ConfigError {
    /// A zero receive timeout would turn the loop into a busy spin.
    #[error("Receive timeout must be greater than zero")]
    ZeroTimeout,
    /// Two protocol messages share the same identifier.
    #[error("Identifier {id:#X} is assigned to more than one message")]
    DuplicateIdentifier { id: u32 },
    /// Identifier does not fit in 29 bits.
    #[error("Identifier {id:#X} exceeds the 29-bit CAN range")]
    IdentifierOutOfRange { id: u32 },
}

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while building a [`CanFrame`](crate::protocol::transport::can_frame::CanFrame).
pub enum FrameError {
    /// Classic CAN carries at most eight payload bytes.
    #[error("Payload too long: {len} bytes (max 8)")]
    PayloadTooLong { len: usize },
    /// Identifier is wider than its frame format allows.
    #[error("Identifier {id:#X} out of range for the frame format")]
    IdentifierOutOfRange { id: u32 },
}
