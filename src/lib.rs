//! `twai-observer` library: a `no_std` listen-only node for a shared CAN/TWAI
//! bus. It pulls frames off an already-initialized controller, classifies them
//! by identifier, and tracks a master/slave ping → start → data → stop
//! handshake without ever transmitting or acknowledging anything.
#![no_std]
//==================================================================================
/// Observer configuration: receive timeout, iteration budget, identifier table.
pub mod config;
/// Errors surfaced by the reception loop, the startup glue and frame construction.
pub mod error;
/// Handshake tracking (classifier, phase tracker, reception loop) and the
/// CAN transport abstractions it listens through.
pub mod protocol;
//==================================================================================
