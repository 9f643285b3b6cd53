use core::fmt::Debug;

use embedded_hal::i2c::I2c;
use log::debug;

use crate::registers::{NamedRegister, RegConfig, RegOp, Register};
use crate::Error;

/// Trait alias to support both I2c<SevenBitAddress> and I2c without address mode.
pub trait CompatibleI2c<E>: I2c<Error = E> {}
impl<T, E> CompatibleI2c<E> for T where T: I2c<Error = E> {}

/// Addressed single-byte and burst register access against one bus device.
///
/// Every call is one complete bus transaction; the caller's context is blocked
/// until the HAL returns.
pub struct RegisterDevice<I2C, E> {
    i2c: I2C,
    address: u8,
    _error: core::marker::PhantomData<E>,
}

impl<I2C, E> RegisterDevice<I2C, E> {
    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I2C, E> RegisterDevice<I2C, E>
where
    I2C: CompatibleI2c<E>,
    E: Debug,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            _error: core::marker::PhantomData,
        }
    }

    pub fn destroy(self) -> I2C {
        self.i2c
    }

    pub fn read_reg(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let mut buf = [0u8];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    pub fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(self.address, &[reg, val])
            .map_err(Error::I2c)?;
        Ok(())
    }

    /// Reads `buffer.len()` consecutive registers starting at `start_reg` in one
    /// transaction. Devices that need an explicit auto-increment flag expect the
    /// caller to have set it in `start_reg`.
    pub fn read_burst(&mut self, start_reg: u8, buffer: &mut [u8]) -> Result<(), Error<E>> {
        self.i2c
            .write_read(self.address, &[start_reg], buffer)
            .map_err(Error::I2c)
    }

    /// Read-modify-write: bits in `mask` are replaced by the matching bits of `value`.
    pub fn modify_reg(&mut self, reg: u8, mask: u8, value: u8) -> Result<u8, Error<E>> {
        let current = self.read_reg(reg)?;
        let updated = (current & !mask) | (value & mask);
        self.write_reg(reg, updated)?;
        Ok(updated)
    }

    /// Accepts any register type that implements the `Register` trait
    pub fn apply_config<R>(&mut self, config: &[RegConfig<R>]) -> Result<(), Error<E>>
    where
        R: Register + NamedRegister + Copy,
    {
        for entry in config {
            let addr = entry.reg.addr();
            match entry.op {
                RegOp::Write => {
                    debug!("write_reg {:<21}({:#04X}) = {:#04x}", entry.reg.name(), addr, entry.value);
                    self.write_reg(addr, entry.value)?
                }
                RegOp::Read => {
                    let data = self.read_reg(addr)?;
                    debug!("read_reg {:<21}({:#04X}) = {:#04x}", entry.reg.name(), addr, data);
                }
            }
        }
        Ok(())
    }

    pub fn dump_config<R>(&mut self, regs: &[R]) -> Result<(), Error<E>>
    where
        R: NamedRegister + Copy,
    {
        fn show(label: &str, reg: u8, val: Result<u8, impl Debug>) {
            match val {
                Ok(v) => debug!("{:<21}({:#04x}): 0x{:02X} ({:>3}) 0b{:08b}", label, reg, v, v, v),
                Err(e) => debug!("{:<16}: Error: {:?}", label, e),
            }
        }

        for reg in regs {
            let label = reg.name();
            let addr = reg.addr();
            show(label, addr, self.read_reg(addr));
        }

        Ok(())
    }
}
