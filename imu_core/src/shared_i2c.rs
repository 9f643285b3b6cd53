use core::cell::RefCell;
use critical_section::Mutex;

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

/// One physical I2C bus shared by several drivers.
///
/// Every transaction issued through a [`SharedI2c`] handle runs inside a
/// critical section, so a driver running from an interrupt can never interleave
/// with a transaction already in flight from the main context.
pub struct SharedBus<I2C> {
    bus: Mutex<RefCell<I2C>>,
}

impl<I2C> SharedBus<I2C> {
    pub const fn new(i2c: I2C) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(i2c)),
        }
    }

    /// Hands out a handle that implements `I2c` and can be given to a driver.
    pub fn device(&self) -> SharedI2c<'_, I2C> {
        SharedI2c { bus: &self.bus }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut I2C) -> R) -> R {
        critical_section::with(|cs| {
            let mut i2c = self.bus.borrow_ref_mut(cs);
            f(&mut i2c)
        })
    }

    pub fn into_inner(self) -> I2C {
        self.bus.into_inner().into_inner()
    }
}

pub struct SharedI2c<'a, I2C> {
    bus: &'a Mutex<RefCell<I2C>>,
}

// Required by the embedded-hal I2c trait
impl<I2C: ErrorType> ErrorType for SharedI2c<'_, I2C> {
    type Error = I2C::Error;
}

impl<I2C: I2c> I2c for SharedI2c<'_, I2C> {
    fn read(&mut self, addr: SevenBitAddress, buffer: &mut [u8]) -> Result<(), Self::Error> {
        critical_section::with(|cs| self.bus.borrow_ref_mut(cs).read(addr, buffer))
    }

    fn write(&mut self, addr: SevenBitAddress, bytes: &[u8]) -> Result<(), Self::Error> {
        critical_section::with(|cs| self.bus.borrow_ref_mut(cs).write(addr, bytes))
    }

    fn write_read(
        &mut self,
        addr: SevenBitAddress,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        critical_section::with(|cs| self.bus.borrow_ref_mut(cs).write_read(addr, bytes, buffer))
    }

    fn transaction(
        &mut self,
        addr: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        critical_section::with(|cs| self.bus.borrow_ref_mut(cs).transaction(addr, operations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::RegisterDevice;
    use crate::testing::MockI2c;

    #[test]
    fn two_devices_share_one_bus() {
        let mut mock = MockI2c::new(0x53);
        mock.add_device(0x69);
        let bus = SharedBus::new(mock);

        let mut accel = RegisterDevice::new(bus.device(), 0x53);
        let mut gyro = RegisterDevice::new(bus.device(), 0x69);

        accel.write_reg(0x2D, 0x08).unwrap();
        gyro.write_reg(0x20, 0x0F).unwrap();
        assert_eq!(accel.read_reg(0x2D).unwrap(), 0x08);

        let accel_writes = bus.with(|i2c| i2c.writes().to_vec());
        let gyro_writes = bus.with(|i2c| i2c.device(0x69).map(|d| d.writes().to_vec()));
        assert_eq!(accel_writes, vec![(0x2D, 0x08)]);
        assert_eq!(gyro_writes, Some(vec![(0x20, 0x0F)]));
    }

    #[test]
    fn into_inner_returns_bus() {
        let bus = SharedBus::new(MockI2c::new(0x77));
        bus.device().write(0x77, &[0xF4, 0x2E]).unwrap();
        let mock = bus.into_inner();
        assert_eq!(mock.reg(0xF4), 0x2E);
    }
}
