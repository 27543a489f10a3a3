//! Bounded reception loop: pull frames off a listen-only bus, classify them,
//! feed the phase tracker and report everything to an [`ObservationSink`].
//!
//! Termination is an explicit value ([`Termination`]) rather than an early
//! return buried in the loop:
//! * budget exhausted, stop requested, or idle limit reached → `Ok(report)`;
//! * bus fault → `Err(ObserverError::BusFault)`, no further receive call.
//!
//! An empty receive window is a normal event on an idle bus: it is reported
//! to the sink and does not consume budget.
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use futures_util::{
    future::{select, Either},
    pin_mut,
};

use crate::config::ObserverConfig;
use crate::error::{ConfigError, ObserverError};
use crate::protocol::handshake::observation::{FrameObservation, ObservationSink};
use crate::protocol::handshake::phase_tracker::{PhaseTracker, TrackerStats};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::{bus_timer::BusTimer, can_listener::CanListener};

//==================================================================================STOP
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Payload of the stop [`Signal`].
pub struct StopRequest;

/// Cooperative stop flag, checked between two receive calls.
pub trait StopFlag {
    fn stop_requested(&self) -> bool;
}

impl<M: RawMutex, T: Send> StopFlag for Signal<M, T> {
    fn stop_requested(&self) -> bool {
        self.signaled()
    }
}

impl StopFlag for AtomicBool {
    fn stop_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

//==================================================================================BUDGET
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Remaining number of frames to observe. Only ever decreases.
pub struct ReceptionBudget {
    remaining: u32,
}

impl ReceptionBudget {
    pub fn new(frames: u32) -> Self {
        Self { remaining: frames }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Account for one processed frame.
    pub fn consume(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

//==================================================================================REPORT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Why a run ended without error.
pub enum Termination {
    BudgetExhausted,
    /// The stop flag was raised.
    Stopped,
    /// `max_consecutive_timeouts` empty windows in a row.
    IdleLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Final statistics of a run.
pub struct ObserverReport {
    pub termination: Termination,
    /// Frames received during this run.
    pub frames_observed: u32,
    /// Empty receive windows during this run.
    pub timeouts: u32,
    /// Tracker counters (cumulative across runs of the same loop).
    pub tracker: TrackerStats,
}

impl ObserverReport {
    pub fn completed_cycles(&self) -> u32 {
        self.tracker.completed_cycles
    }
}

//==================================================================================RECEPTION_LOOP
enum ReceiveOutcome<E> {
    Frame(CanFrame),
    Timeout,
    Fault(E),
}

/// Single-worker reception loop. Owns the phase tracker; borrows the bus
/// exclusively for the duration of [`run`](Self::run).
pub struct ReceptionLoop<'a> {
    config: ObserverConfig,
    tracker: PhaseTracker,
    stop: Option<&'a (dyn StopFlag + Sync)>,
}

impl<'a> ReceptionLoop<'a> {
    /// Validate `config` and prepare a tracker in [`Phase::AwaitingPing`].
    ///
    /// [`Phase::AwaitingPing`]: crate::protocol::handshake::phase_tracker::Phase::AwaitingPing
    pub fn new(config: ObserverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            tracker: PhaseTracker::with_table(config.ids, config.policy),
            stop: None,
        })
    }

    /// Attach a cooperative stop flag, usually raised from another task.
    pub fn with_stop(mut self, stop: &'a (dyn StopFlag + Sync)) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn tracker(&self) -> &PhaseTracker {
        &self.tracker
    }

    /// Observe the bus until the budget is spent, a stop is requested, the
    /// idle limit is hit, or the bus faults.
    ///
    /// A stop request never interrupts a receive call: it is honoured once the
    /// current call has returned a frame or its window has elapsed.
    pub async fn run<C, T, O>(
        &mut self,
        bus: &mut C,
        timer: &mut T,
        sink: &mut O,
    ) -> Result<ObserverReport, ObserverError<C::Error>>
    where
        C: CanListener,
        T: BusTimer,
        O: ObservationSink,
    {
        let mut budget = ReceptionBudget::new(self.config.iteration_budget);
        let mut frames_observed: u32 = 0;
        let mut timeouts: u32 = 0;
        let mut idle_windows: u32 = 0;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Listening: budget {} frames, window {} ms",
            budget.remaining(),
            self.config.receive_timeout_ms
        );

        let termination = loop {
            if budget.is_exhausted() {
                break Termination::BudgetExhausted;
            }
            if self.stop.is_some_and(|stop| stop.stop_requested()) {
                break Termination::Stopped;
            }

            match receive(bus, timer, self.config.receive_timeout_ms).await {
                ReceiveOutcome::Frame(frame) => {
                    budget.consume();
                    frames_observed = frames_observed.saturating_add(1);
                    idle_windows = 0;

                    let kind = self.config.ids.classify(frame.can_id());
                    sink.on_frame(&FrameObservation::new(&frame, kind));
                    let event = self.tracker.on_kind(kind);
                    sink.on_phase(&event);
                }
                ReceiveOutcome::Timeout => {
                    timeouts = timeouts.saturating_add(1);
                    idle_windows = idle_windows.saturating_add(1);
                    sink.on_timeout();

                    if self
                        .config
                        .max_consecutive_timeouts
                        .is_some_and(|limit| idle_windows >= limit)
                    {
                        break Termination::IdleLimit;
                    }
                }
                ReceiveOutcome::Fault(error) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("Failed to receive message after {} frames", frames_observed);

                    return Err(ObserverError::BusFault {
                        error,
                        frames_observed,
                        completed_cycles: self.tracker.completed_cycles(),
                    });
                }
            }
        };

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Observation ended ({}): {} frames, {} cycles",
            termination,
            frames_observed,
            self.tracker.completed_cycles()
        );

        Ok(ObserverReport {
            termination,
            frames_observed,
            timeouts,
            tracker: *self.tracker.stats(),
        })
    }
}

/// Race one receive call against the receive window.
async fn receive<C: CanListener, T: BusTimer>(
    bus: &mut C,
    timer: &mut T,
    window_ms: u32,
) -> ReceiveOutcome<C::Error> {
    let recv = bus.recv();
    let window = timer.delay_ms(window_ms);
    pin_mut!(recv);
    pin_mut!(window);

    // A frame already waiting wins over an elapsed window.
    match select(recv, window).await {
        Either::Left((Ok(frame), _)) => ReceiveOutcome::Frame(frame),
        Either::Left((Err(error), _)) => ReceiveOutcome::Fault(error),
        Either::Right(_) => ReceiveOutcome::Timeout,
    }
}
