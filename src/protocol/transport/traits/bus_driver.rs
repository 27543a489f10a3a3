//! Controller lifecycle used by the startup glue: bring a listen-only
//! controller up, hand its receive side to the observer, tear it down.
use crate::protocol::transport::{bus_config::BusConfig, traits::can_listener::CanListener};

/// Installs and uninstalls a listen-only CAN controller.
pub trait BusDriver {
    /// Driver diagnostic, shared by install failures and receive faults.
    type Error: core::fmt::Debug;
    /// Receive handle produced by a successful install.
    type Listener: CanListener<Error = Self::Error>;

    /// Configure the controller (timing, acceptance filter, listen-only mode)
    /// and start it.
    fn install<'a>(
        &'a mut self,
        config: &'a BusConfig,
    ) -> impl core::future::Future<Output = Result<Self::Listener, Self::Error>> + 'a;

    /// Stop the controller and release the handle.
    fn uninstall<'a>(
        &'a mut self,
        listener: Self::Listener,
    ) -> impl core::future::Future<Output = ()> + 'a;
}
