/// Condition that makes an interrupt source fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Rising edge on a data-ready / end-of-conversion line.
    RisingEdge,
    /// Free-running timer, for boards where the device line is not wired out.
    Periodic { period_us: u32 },
}

/// The pin/timer side of asynchronous mode.
///
/// A driver's `init_async` arms the source; the board's interrupt handler then
/// calls the driver's callback method (`on_data_ready`, `on_conversion_complete`)
/// once per qualifying event.
pub trait InterruptSource {
    fn listen(&mut self, trigger: Trigger);
    fn unlisten(&mut self);
}

/// Free-running millisecond counter. Wraps at `u32::MAX`.
pub trait TimeSource {
    fn now_ms(&self) -> u32;
}

impl<T: InterruptSource + ?Sized> InterruptSource for &mut T {
    fn listen(&mut self, trigger: Trigger) {
        (**self).listen(trigger)
    }

    fn unlisten(&mut self) {
        (**self).unlisten()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
