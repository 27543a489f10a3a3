//! Startup glue around the reception loop: install a listen-only controller,
//! observe until the run ends, uninstall the controller.
//!
//! The controller is uninstalled on every exit path that got past install,
//! including a bus fault, so the caller can decide to start a fresh run.
use crate::config::ObserverConfig;
use crate::error::ObserverError;
use crate::protocol::handshake::observation::ObservationSink;
use crate::protocol::handshake::reception_loop::{ObserverReport, ReceptionLoop, StopFlag};
use crate::protocol::transport::bus_config::BusConfig;
use crate::protocol::transport::traits::{bus_driver::BusDriver, bus_timer::BusTimer};

/// Service owning a bus driver and the configuration of both the controller
/// and the observer.
pub struct ObserverService<D: BusDriver> {
    driver: D,
    bus_config: BusConfig,
    config: ObserverConfig,
}

impl<D: BusDriver> ObserverService<D> {
    /// Bundle a driver with the controller and observer configuration.
    /// Nothing is installed until [`run`](Self::run).
    pub fn new(driver: D, bus_config: BusConfig, config: ObserverConfig) -> Self {
        Self {
            driver,
            bus_config,
            config,
        }
    }

    /// The wrapped driver, e.g. to inspect it between two runs.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Run one observation session.
    ///
    /// The configuration is validated before anything touches the
    /// controller; an install failure is reported as [`ObserverError::Install`].
    pub async fn run<T, O>(
        &mut self,
        timer: &mut T,
        sink: &mut O,
        stop: Option<&(dyn StopFlag + Sync)>,
    ) -> Result<ObserverReport, ObserverError<D::Error>>
    where
        T: BusTimer,
        O: ObservationSink,
    {
        let mut reception = ReceptionLoop::new(self.config)?;
        if let Some(stop) = stop {
            reception = reception.with_stop(stop);
        }

        let mut listener = self
            .driver
            .install(&self.bus_config)
            .await
            .map_err(ObserverError::Install)?;

        #[cfg(feature = "defmt")]
        defmt::info!("Driver installed");

        let result = reception.run(&mut listener, timer, sink).await;

        self.driver.uninstall(listener).await;

        #[cfg(feature = "defmt")]
        defmt::info!("Driver uninstalled");

        result
    }
}
