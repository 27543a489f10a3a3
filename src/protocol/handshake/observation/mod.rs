//! Observation sink: where the reception loop reports what it saw.
//!
//! The loop itself performs no I/O. Every received frame and every tracker
//! outcome is handed to an [`ObservationSink`]; the caller decides whether
//! that becomes a log line, a counter, or nothing at all.
use crate::protocol::handshake::classifier::MessageKind;
use crate::protocol::handshake::phase_tracker::PhaseEvent;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;

//==================================================================================FRAME_OBSERVATION
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw detail of one received frame plus its classification.
pub struct FrameObservation<'a> {
    pub id: CanId,
    pub extended: bool,
    pub remote: bool,
    /// Data length code as sent on the wire (non-zero possible for remote frames).
    pub dlc: usize,
    /// Payload bytes; empty for remote-request frames.
    pub payload: &'a [u8],
    pub kind: MessageKind,
}

impl<'a> FrameObservation<'a> {
    pub fn new(frame: &'a CanFrame, kind: MessageKind) -> Self {
        Self {
            id: frame.can_id(),
            extended: frame.is_extended(),
            remote: frame.is_remote(),
            dlc: frame.dlc(),
            payload: frame.payload(),
            kind,
        }
    }
}

//==================================================================================SINK
/// Receiver of structured observer events.
pub trait ObservationSink {
    /// Called once per received frame, before the phase event.
    fn on_frame(&mut self, frame: &FrameObservation<'_>);
    /// Called once per received frame with the tracker's verdict.
    fn on_phase(&mut self, event: &PhaseEvent);
    /// Receive window elapsed without traffic.
    fn on_timeout(&mut self) {}
}

/// Discard everything.
impl ObservationSink for () {
    fn on_frame(&mut self, _frame: &FrameObservation<'_>) {}
    fn on_phase(&mut self, _event: &PhaseEvent) {}
}

//==================================================================================LOG_SINK
/// Sink printing every observation through `defmt`.
#[cfg(feature = "defmt")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

#[cfg(feature = "defmt")]
impl ObservationSink for LogSink {
    fn on_frame(&mut self, frame: &FrameObservation<'_>) {
        if frame.extended {
            defmt::info!("Message is in Extended Format");
        } else {
            defmt::info!("Message is in Standard Format");
        }
        defmt::info!("ID is {} ({})", frame.id.raw(), frame.kind);
        if !frame.remote {
            for (index, byte) in frame.payload.iter().enumerate() {
                defmt::info!("Data byte {} = {}", index, byte);
            }
        }
    }

    fn on_phase(&mut self, event: &PhaseEvent) {
        match event {
            PhaseEvent::NoOp(_) => {}
            PhaseEvent::PhaseAdvanced { from, to } => defmt::info!("Phase {} -> {}", from, to),
            PhaseEvent::CycleCompleted { count, .. } => defmt::info!("Cycle {} completed", count),
            PhaseEvent::OutOfSequence {
                observed, expected, ..
            } => defmt::warn!("Out-of-sequence {} (expected {})", observed, expected),
            PhaseEvent::CycleRestarted { abandoned, .. } => {
                defmt::warn!("Cycle abandoned in {}, restarted by ping", abandoned)
            }
        }
    }

    fn on_timeout(&mut self) {
        defmt::debug!("Receive window elapsed");
    }
}
