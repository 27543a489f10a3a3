//! Listen-only protocol stack: the handshake observer and the CAN transport
//! layer it consumes.
pub mod handshake;
pub mod transport;
