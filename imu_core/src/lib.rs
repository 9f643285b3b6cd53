#![cfg_attr(not(any(test, feature = "testing")), no_std)]

pub mod registers;
pub mod bus;
pub mod shared_i2c;
pub mod core_data_types;
pub mod core_filters;
pub mod core_calibrate;
pub mod simple_ring_buffer;
pub mod callbacks;
pub mod irq;
pub mod stream;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use core::fmt::{Debug, Formatter};

pub use bus::{CompatibleI2c, RegisterDevice};
pub use callbacks::Callback;
pub use core_calibrate::OffsetAccumulator;
pub use core_data_types::{RawSample, ThreeAxes};
pub use core_filters::{low_pass_filter_3axes, low_pass_filter_float, FilteredAxes};
pub use irq::{InterruptSource, TimeSource, Trigger};
pub use registers::{NamedRegister, RegConfig, RegOp, Register};
pub use shared_i2c::{SharedBus, SharedI2c};
pub use simple_ring_buffer::RingBuffer;
pub use stream::{Reading, StreamBuffer};

// Used by the `registers!` macro expansion in the driver crates.
#[doc(hidden)]
pub use paste as __paste;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    I2c(E),
    InvalidDevice { expected: u8, found: u8 },
}

impl<E: Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "i2c bus error: {:?}", e),
            Error::InvalidDevice { expected, found } => {
                write!(f, "unexpected device id {:#04x} (expected {:#04x})", found, expected)
            }
        }
    }
}
