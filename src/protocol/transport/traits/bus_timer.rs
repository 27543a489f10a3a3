//! Asynchronous timer abstraction bounding each receive call.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait BusTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}

/// [`BusTimer`] backed by the `embassy-time` driver of the target.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyTimer;

impl BusTimer for EmbassyTimer {
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a {
        embassy_time::Timer::after(embassy_time::Duration::from_millis(millis as u64))
    }
}
