/// Test doubles simulating a listen-only CAN bus, its driver, timers and an
/// observation sink during integration tests.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};
use twai_observer::protocol::{
    handshake::{
        classifier::MessageKind,
        observation::{FrameObservation, ObservationSink},
        phase_tracker::PhaseEvent,
    },
    transport::{
        bus_config::BusConfig,
        can_frame::CanFrame,
        can_id::CanId,
        traits::{bus_driver::BusDriver, bus_timer::BusTimer, can_listener::CanListener},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Diagnostic code reported by the simulated controller.
pub struct MockBusError(pub u8);

#[derive(Debug, Clone)]
#[allow(dead_code)]
/// One scripted answer to a receive call.
pub enum Step {
    Frame(CanFrame),
    /// Nothing arrives: the receive window elapses.
    Silence,
    Fault(u8),
}

#[allow(dead_code)]
/// Standard data frame step.
pub fn frame(id: u32, payload: &[u8]) -> Step {
    Step::Frame(CanFrame::standard(id, payload).expect("valid test frame"))
}

#[allow(dead_code)]
/// Steps of one handshake cycle carrying `data_frames` samples.
pub fn cycle(data_frames: u8) -> Vec<Step> {
    let mut steps = vec![frame(0x0A2, &[]), frame(0x0B2, &[]), frame(0x0A1, &[])];
    for sample in 0..data_frames {
        steps.push(frame(0x0B1, &[sample, 0xAA]));
    }
    steps.push(frame(0x0A0, &[]));
    steps.push(frame(0x0B0, &[]));
    steps
}

//==================================================================================SCRIPTED_BUS
/// Bus replaying a script; silent forever once the script runs out.
pub struct ScriptedBus {
    steps: VecDeque<Step>,
    /// Number of receive calls issued by the observer.
    pub calls: usize,
}

#[allow(dead_code)]
impl ScriptedBus {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            calls: 0,
        }
    }

    /// Bus on which nothing ever arrives.
    pub fn silent() -> Self {
        Self::new([])
    }
}

impl CanListener for ScriptedBus {
    type Error = MockBusError;

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        self.calls += 1;
        match self.steps.pop_front() {
            Some(Step::Frame(frame)) => Ok(frame),
            Some(Step::Fault(code)) => Err(MockBusError(code)),
            Some(Step::Silence) | None => std::future::pending().await,
        }
    }
}

//==================================================================================CHANNEL_BUS
#[derive(Clone)]
#[allow(dead_code)]
/// Receive side of an in-memory bus fed by a simulated master/slave pair.
pub struct ChannelBus {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<CanFrame>>>,
}

#[allow(dead_code)]
impl ChannelBus {
    /// Build the observer's listener and the sender used by the simulated nodes.
    pub fn create() -> (Self, mpsc::UnboundedSender<CanFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                rx: Arc::new(Mutex::new(rx)),
            },
            tx,
        )
    }
}

impl CanListener for ChannelBus {
    type Error = MockBusError;

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(MockBusError(0xFF))
    }
}

//==================================================================================TIMERS
#[derive(Default)]
#[allow(dead_code)]
/// Timer whose windows elapse immediately; records the requested durations.
pub struct InstantTimer {
    pub windows: Vec<u32>,
}

impl BusTimer for InstantTimer {
    async fn delay_ms(&mut self, millis: u32) {
        self.windows.push(millis);
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive real receive windows.
pub struct MockTimer;

impl BusTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

//==================================================================================SINK
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
/// Owned copy of a [`FrameObservation`].
pub struct RecordedFrame {
    pub id: CanId,
    pub extended: bool,
    pub remote: bool,
    pub dlc: usize,
    pub payload: Vec<u8>,
    pub kind: MessageKind,
}

#[allow(dead_code)]
/// Sink keeping every observation; can raise a stop flag after N timeouts.
pub struct RecordingSink<'a> {
    pub frames: Vec<RecordedFrame>,
    pub events: Vec<PhaseEvent>,
    pub timeouts: u32,
    stop_after_timeouts: Option<(u32, &'a AtomicBool)>,
}

#[allow(dead_code)]
impl<'a> RecordingSink<'a> {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            events: Vec::new(),
            timeouts: 0,
            stop_after_timeouts: None,
        }
    }

    pub fn stopping_after(timeouts: u32, stop: &'a AtomicBool) -> Self {
        Self {
            stop_after_timeouts: Some((timeouts, stop)),
            ..Self::new()
        }
    }
}

impl ObservationSink for RecordingSink<'_> {
    fn on_frame(&mut self, frame: &FrameObservation<'_>) {
        self.frames.push(RecordedFrame {
            id: frame.id,
            extended: frame.extended,
            remote: frame.remote,
            dlc: frame.dlc,
            payload: frame.payload.to_vec(),
            kind: frame.kind,
        });
    }

    fn on_phase(&mut self, event: &PhaseEvent) {
        self.events.push(*event);
    }

    fn on_timeout(&mut self) {
        self.timeouts += 1;
        if let Some((limit, stop)) = self.stop_after_timeouts {
            if self.timeouts >= limit {
                stop.store(true, Ordering::Release);
            }
        }
    }
}

//==================================================================================DRIVER
#[derive(Default)]
#[allow(dead_code)]
/// Driver handing out a [`ScriptedBus`] and counting lifecycle calls.
pub struct MockDriver {
    pub script: Vec<Step>,
    pub fail_install: Option<u8>,
    pub installed_with: Option<BusConfig>,
    pub installs: usize,
    pub uninstalls: usize,
    /// Receive calls issued on the last uninstalled bus.
    pub last_calls: usize,
}

impl BusDriver for MockDriver {
    type Error = MockBusError;
    type Listener = ScriptedBus;

    async fn install<'a>(&'a mut self, config: &'a BusConfig) -> Result<Self::Listener, Self::Error> {
        if let Some(code) = self.fail_install {
            return Err(MockBusError(code));
        }
        self.installs += 1;
        self.installed_with = Some(*config);
        Ok(ScriptedBus::new(self.script.drain(..)))
    }

    async fn uninstall<'a>(&'a mut self, listener: Self::Listener) {
        self.uninstalls += 1;
        self.last_calls = listener.calls;
    }
}
