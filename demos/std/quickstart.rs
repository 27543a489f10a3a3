//! # Quickstart Example
//!
//! Replays one recorded handshake capture through the observer:
//! - Build a listen-only bus configuration
//! - Classify raw identifiers
//! - Run the reception loop and print every observation
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use std::collections::VecDeque;

use twai_observer::config::ObserverConfig;
use twai_observer::protocol::handshake::classifier::classify;
use twai_observer::protocol::handshake::observation::{FrameObservation, ObservationSink};
use twai_observer::protocol::handshake::phase_tracker::PhaseEvent;
use twai_observer::protocol::handshake::reception_loop::ReceptionLoop;
use twai_observer::protocol::transport::bus_config::{BusConfig, APB_CLOCK_HZ};
use twai_observer::protocol::transport::can_frame::CanFrame;
use twai_observer::protocol::transport::can_id::CanId;
use twai_observer::protocol::transport::traits::{bus_timer::BusTimer, can_listener::CanListener};

/// Capture replayed frame by frame, then silent.
struct Replay(VecDeque<CanFrame>);

impl CanListener for Replay {
    type Error = ();

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        match self.0.pop_front() {
            Some(frame) => Ok(frame),
            None => std::future::pending().await,
        }
    }
}

/// Windows elapse at once: the capture is already complete.
struct NoWait;

impl BusTimer for NoWait {
    async fn delay_ms(&mut self, _millis: u32) {}
}

/// Console sink mirroring what the firmware would log.
struct PrintSink;

impl ObservationSink for PrintSink {
    fn on_frame(&mut self, frame: &FrameObservation<'_>) {
        let format = if frame.extended { "Extended" } else { "Standard" };
        println!("   [{format}] ID {} ({:?}) data {:02X?}", frame.id, frame.kind, frame.payload);
    }

    fn on_phase(&mut self, event: &PhaseEvent) {
        println!("      -> {:?}", event);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== twai-observer Quickstart ===\n");

    // ======================================================================
    // 1. Describe the listen-only controller
    // ======================================================================
    let bus_config = BusConfig::default();
    println!("1. Controller configuration");
    println!(
        "   Bit rate: {} bit/s",
        bus_config.timing.bitrate(APB_CLOCK_HZ).unwrap_or(0)
    );
    println!("   Accepts 0x0A2: {}\n", bus_config.filter.accepts(0x0A2, false));

    // ======================================================================
    // 2. Classify a few identifiers
    // ======================================================================
    println!("2. Classification");
    for id in [0x0A2, 0x0B1, 0x123] {
        println!("   {} => {:?}", CanId(id), classify(CanId(id)));
    }
    println!();

    // ======================================================================
    // 3. Replay a capture
    // ======================================================================
    println!("3. Replaying a capture");
    let capture = [0x0A2, 0x0B2, 0x0A1, 0x0B1, 0x0B1, 0x0A0, 0x0B0]
        .into_iter()
        .enumerate()
        .filter_map(|(index, id)| CanFrame::standard(id, &[index as u8]).ok())
        .collect();
    let mut bus = Replay(capture);
    let config = ObserverConfig::default().with_iteration_budget(7);

    let mut reception = match ReceptionLoop::new(config) {
        Ok(reception) => reception,
        Err(e) => {
            eprintln!("   Invalid configuration: {e}");
            return;
        }
    };

    match reception.run(&mut bus, &mut NoWait, &mut PrintSink).await {
        Ok(report) => {
            println!("\n   Ended: {:?}", report.termination);
            println!("   Frames observed: {}", report.frames_observed);
            println!("   Completed cycles: {}", report.completed_cycles());
        }
        Err(e) => eprintln!("   Observation failed: {e}"),
    }

    println!("\nQuickstart complete.");
}
