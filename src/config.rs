//! Observer configuration: receive window, iteration budget, identifier
//! table and sequence policy. Plain data with fluent setters, validated once
//! before a run starts.
use embassy_time::Duration;

use crate::error::ConfigError;
use crate::protocol::handshake::classifier::ProtocolIds;
use crate::protocol::handshake::phase_tracker::SequencePolicy;
use crate::protocol::transport::{DEFAULT_ITERATION_BUDGET, DEFAULT_RECEIVE_TIMEOUT_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Configuration surface of the reception loop.
pub struct ObserverConfig {
    /// Window granted to each receive call (ms).
    pub receive_timeout_ms: u32,
    /// Frames to observe before the run ends normally.
    pub iteration_budget: u32,
    /// Identifiers of the six protocol messages.
    pub ids: ProtocolIds,
    /// What an out-of-sequence frame does to the live cycle.
    pub policy: SequencePolicy,
    /// Stop after this many consecutive empty receive windows.
    /// `None`: an idle bus never ends the run.
    pub max_consecutive_timeouts: Option<u32>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT_MS,
            iteration_budget: DEFAULT_ITERATION_BUDGET,
            ids: ProtocolIds::standard(),
            policy: SequencePolicy::Tolerant,
            max_consecutive_timeouts: None,
        }
    }
}

impl ObserverConfig {
    /// Receive window, truncated to whole milliseconds (saturates at `u32::MAX`).
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout_ms = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        self
    }

    /// Receive window in milliseconds.
    pub fn with_receive_timeout_ms(mut self, millis: u32) -> Self {
        self.receive_timeout_ms = millis;
        self
    }

    /// Number of frames to observe per run.
    pub fn with_iteration_budget(mut self, budget: u32) -> Self {
        self.iteration_budget = budget;
        self
    }

    /// Replace the protocol identifier table.
    pub fn with_ids(mut self, ids: ProtocolIds) -> Self {
        self.ids = ids;
        self
    }

    /// Select the out-of-sequence policy of the tracker.
    pub fn with_policy(mut self, policy: SequencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// End the run after `max_consecutive_timeouts` empty windows in a row.
    pub fn with_idle_limit(mut self, max_consecutive_timeouts: u32) -> Self {
        self.max_consecutive_timeouts = Some(max_consecutive_timeouts);
        self
    }

    /// Receive window as an [`embassy_time::Duration`].
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms as u64)
    }

    /// Check the receive window and the identifier table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.receive_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.ids.validate()
    }
}
