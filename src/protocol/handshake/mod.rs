//! Passive view of the master/slave handshake: classify each frame by
//! identifier, track the ping → start → data → stop cycle, and drive the
//! whole thing from a bounded reception loop.
pub mod classifier;
pub mod observation;
pub mod observer_service;
pub mod phase_tracker;
pub mod reception_loop;
