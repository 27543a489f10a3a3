//! Listen-only state machine following the ping → start → data → stop
//! handshake.
//!
//! The tracker never participates in the exchange: it consumes classified
//! frames in arrival order and reports what each one meant for the cycle.
//! The bus is shared with unrelated traffic, so a frame that does not fit the
//! current phase is reported as out-of-sequence and, under the default
//! [`SequencePolicy::Tolerant`], leaves the phase untouched.
use crate::protocol::handshake::classifier::{MessageKind, ProtocolIds};
use crate::protocol::transport::can_frame::CanFrame;

//==================================================================================PHASE
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Position inside one exchange cycle.
///
/// The stop command is accepted directly from [`Phase::ReceivingData`], so
/// there is no separate state waiting for it.
pub enum Phase {
    /// Idle, waiting for the master to open a cycle.
    AwaitingPing,
    AwaitingPingResponse,
    AwaitingStart,
    /// Data frames stream in until the master sends the stop command.
    ReceivingData,
    AwaitingStopResponse,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::AwaitingPing,
        Phase::AwaitingPingResponse,
        Phase::AwaitingStart,
        Phase::ReceivingData,
        Phase::AwaitingStopResponse,
    ];

    /// Kinds accepted in this phase.
    pub fn expected(&self) -> &'static [MessageKind] {
        match self {
            Phase::AwaitingPing => &[MessageKind::Ping],
            Phase::AwaitingPingResponse => &[MessageKind::PingResponse],
            Phase::AwaitingStart => &[MessageKind::StartCommand],
            Phase::ReceivingData => &[MessageKind::Data, MessageKind::StopCommand],
            Phase::AwaitingStopResponse => &[MessageKind::StopResponse],
        }
    }

    /// Transition table. `None` when `kind` is not expected here.
    fn next(&self, kind: MessageKind) -> Option<Phase> {
        match (self, kind) {
            (Phase::AwaitingPing, MessageKind::Ping) => Some(Phase::AwaitingPingResponse),
            (Phase::AwaitingPingResponse, MessageKind::PingResponse) => Some(Phase::AwaitingStart),
            (Phase::AwaitingStart, MessageKind::StartCommand) => Some(Phase::ReceivingData),
            (Phase::ReceivingData, MessageKind::Data) => Some(Phase::ReceivingData),
            (Phase::ReceivingData, MessageKind::StopCommand) => Some(Phase::AwaitingStopResponse),
            (Phase::AwaitingStopResponse, MessageKind::StopResponse) => Some(Phase::AwaitingPing),
            _ => None,
        }
    }
}

//==================================================================================POLICY
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What an out-of-sequence frame does to the current cycle.
pub enum SequencePolicy {
    /// Report it, keep the phase. Survives partial captures and interleaved noise.
    #[default]
    Tolerant,
    /// An unexpected protocol message abandons the cycle and returns to
    /// [`Phase::AwaitingPing`]; an unexpected ping opens the next cycle right
    /// away. Unknown identifiers are still only reported.
    ResetOnUnexpected,
}

//==================================================================================PHASE_EVENT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Outcome of feeding one frame to the tracker.
pub enum PhaseEvent {
    /// Expected frame that does not move the phase (data inside the data phase).
    NoOp(MessageKind),
    PhaseAdvanced { from: Phase, to: Phase },
    /// The stop response closed a cycle; `count` is the new completed total.
    CycleCompleted { from: Phase, to: Phase, count: u32 },
    /// Frame did not match the phase. `reset` tells whether the cycle was
    /// abandoned (only under [`SequencePolicy::ResetOnUnexpected`]).
    OutOfSequence {
        observed: MessageKind,
        expected: &'static [MessageKind],
        reset: bool,
    },
    /// A ping arrived mid-cycle under [`SequencePolicy::ResetOnUnexpected`]:
    /// the cycle in `abandoned` was dropped and the ping opened a new one.
    CycleRestarted { abandoned: Phase, to: Phase },
}

//==================================================================================STATS
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Counters maintained alongside the phase.
pub struct TrackerStats {
    pub completed_cycles: u32,
    /// Data frames seen in the cycle currently in progress.
    pub data_frames: u32,
    /// Data frames carried by the last completed cycle.
    pub last_cycle_data_frames: u32,
    pub out_of_sequence: u32,
    /// Frames whose identifier is outside the protocol table.
    pub unknown_frames: u32,
    /// Cycles abandoned by [`SequencePolicy::ResetOnUnexpected`].
    pub resets: u32,
}

//==================================================================================PHASE_TRACKER
#[derive(Clone, Debug)]
/// Owns the live exchange cycle and the completed-cycle counter.
pub struct PhaseTracker {
    ids: ProtocolIds,
    policy: SequencePolicy,
    phase: Phase,
    stats: TrackerStats,
}

impl PhaseTracker {
    /// Tolerant tracker over the standard identifier table.
    pub fn new() -> Self {
        Self::with_table(ProtocolIds::standard(), SequencePolicy::Tolerant)
    }

    pub fn with_policy(policy: SequencePolicy) -> Self {
        Self::with_table(ProtocolIds::standard(), policy)
    }

    pub fn with_table(ids: ProtocolIds, policy: SequencePolicy) -> Self {
        Self {
            ids,
            policy,
            phase: Phase::AwaitingPing,
            stats: TrackerStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn completed_cycles(&self) -> u32 {
        self.stats.completed_cycles
    }

    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    pub fn policy(&self) -> SequencePolicy {
        self.policy
    }

    /// Classify `frame` with the tracker's table and feed the result.
    pub fn on_frame(&mut self, frame: &CanFrame) -> PhaseEvent {
        let kind = self.ids.classify(frame.can_id());
        self.on_kind(kind)
    }

    /// Advance the state machine with an already classified frame.
    pub fn on_kind(&mut self, kind: MessageKind) -> PhaseEvent {
        let from = self.phase;
        let Some(to) = from.next(kind) else {
            return self.out_of_sequence(kind);
        };

        match (from, to) {
            (Phase::ReceivingData, Phase::ReceivingData) => {
                self.stats.data_frames = self.stats.data_frames.saturating_add(1);
                PhaseEvent::NoOp(kind)
            }
            (Phase::AwaitingStopResponse, Phase::AwaitingPing) => {
                self.stats.completed_cycles = self.stats.completed_cycles.saturating_add(1);
                self.stats.last_cycle_data_frames = self.stats.data_frames;
                self.stats.data_frames = 0;
                self.phase = to;

                #[cfg(feature = "defmt")]
                defmt::info!(
                    "Handshake cycle {} completed ({} data frames)",
                    self.stats.completed_cycles,
                    self.stats.last_cycle_data_frames
                );

                PhaseEvent::CycleCompleted {
                    from,
                    to,
                    count: self.stats.completed_cycles,
                }
            }
            _ => {
                self.phase = to;
                PhaseEvent::PhaseAdvanced { from, to }
            }
        }
    }

    /// Abandon the live cycle without touching the cumulative counters.
    pub fn reset(&mut self) {
        self.phase = Phase::AwaitingPing;
        self.stats.data_frames = 0;
    }

    fn out_of_sequence(&mut self, observed: MessageKind) -> PhaseEvent {
        let expected = self.phase.expected();
        self.stats.out_of_sequence = self.stats.out_of_sequence.saturating_add(1);
        if observed == MessageKind::Unknown {
            self.stats.unknown_frames = self.stats.unknown_frames.saturating_add(1);
        }

        let abandoned = self.phase;
        let reset = self.policy == SequencePolicy::ResetOnUnexpected
            && observed.is_protocol()
            && abandoned != Phase::AwaitingPing;
        if reset {
            self.reset();
            self.stats.resets = self.stats.resets.saturating_add(1);

            if observed == MessageKind::Ping {
                self.phase = Phase::AwaitingPingResponse;

                #[cfg(feature = "defmt")]
                defmt::debug!("Ping during {}: cycle restarted", abandoned);

                return PhaseEvent::CycleRestarted {
                    abandoned,
                    to: self.phase,
                };
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Out-of-sequence {} (expected {}), reset: {}",
            observed,
            expected,
            reset
        );

        PhaseEvent::OutOfSequence {
            observed,
            expected,
            reset,
        }
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
