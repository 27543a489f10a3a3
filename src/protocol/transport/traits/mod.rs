//! Abstraction traits used by the observer (listen-only bus, timer, driver).
pub mod bus_driver;
pub mod bus_timer;
pub mod can_listener;
