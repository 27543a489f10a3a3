//! CAN transport layer as seen by a listen-only node: frame and identifier
//! representations, controller configuration, and the bus/timer traits.
//!
//! ## Timing Constants
//!
//! Defaults used by the reception loop when the caller does not override them.

pub mod bus_config;
pub mod can_frame;
pub mod can_id;
pub mod traits;

/// Maximum payload of a classic CAN frame (bytes).
pub const CLASSIC_CAN_MAX_DLC: usize = 8;

/// Default window for a single receive call (ms).
///
/// The handshake master pings continuously, so one second without traffic is
/// an idle bus rather than a fault. A timeout only costs one loop turn: it never
/// consumes the iteration budget.
pub const DEFAULT_RECEIVE_TIMEOUT_MS: u32 = 1000;

/// Default number of frames observed before the run ends normally.
pub const DEFAULT_ITERATION_BUDGET: u32 = 30_000;
