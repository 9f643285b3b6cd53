#![cfg_attr(not(test), no_std)]

pub mod registers;
pub mod configs;

use core::fmt::Debug;

use imu_core::{
    Callback, CompatibleI2c, Error, InterruptSource, OffsetAccumulator, RawSample, RegisterDevice,
    Trigger,
};
use log::{debug, info, warn};

use registers::*;

pub use configs::*;
pub use registers::FullScale;

pub const DEFAULT_ADDRESS: u8 = 0x69;
/// Address with SDO pulled low.
pub const ALT_ADDRESS: u8 = 0x68;

/// L3G4200D gyroscope.
///
/// Rotational velocity is delivered in raw LSBs with the zero-rate bias
/// removed; multiply by [`resolution`](Self::resolution) for dps.
pub struct L3g4200d<'cb, I2C, E> {
    dev: RegisterDevice<I2C, E>,
    config: GyroConfig,
    full_scale: FullScale,
    initialized: bool,
    async_mode: bool,
    zero_rate: Option<RawSample>,
    on_rotation: Callback<'cb, RawSample>,
    on_overrun: Callback<'cb, ()>,
}

impl<'cb, I2C, E> L3g4200d<'cb, I2C, E> {
    pub fn i2c(&mut self) -> &mut I2C {
        self.dev.i2c()
    }
}

impl<'cb, I2C, E> L3g4200d<'cb, I2C, E>
where
    I2C: CompatibleI2c<E>,
    E: Debug,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, GyroConfig::default())
    }

    pub fn default(i2c: I2C) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_config(i2c: I2C, address: u8, config: GyroConfig) -> Self {
        Self {
            dev: RegisterDevice::new(i2c, address),
            config,
            full_scale: FullScale::Dps250,
            initialized: false,
            async_mode: false,
            zero_rate: None,
            on_rotation: Callback::new(),
            on_overrun: Callback::new(),
        }
    }

    pub fn destroy(self) -> I2C {
        self.dev.destroy()
    }

    pub fn who_am_i(&mut self) -> Result<u8, Error<E>> {
        self.dev.read_reg(GyroReg::WhoAmI.into())
    }

    pub fn verify(&mut self) -> Result<(), Error<E>> {
        let found = self.who_am_i()?;
        if found != DEVICE_ID {
            return Err(Error::InvalidDevice { expected: DEVICE_ID, found });
        }
        Ok(())
    }

    /// Logs every register at debug level.
    pub fn dump_registers(&mut self) -> Result<(), Error<E>> {
        self.dev.dump_config(GYRO_REGS)
    }

    pub fn register_rotational_velocity_callback(&mut self, cb: &'cb mut dyn FnMut(RawSample)) {
        self.on_rotation.register(cb);
    }

    pub fn register_overrun_callback(&mut self, cb: &'cb mut dyn FnMut(())) {
        self.on_overrun.register(cb);
    }

    pub fn init(&mut self) -> Result<(), Error<E>> {
        if self.initialized {
            return Ok(());
        }
        self.dev.write_reg(GyroReg::CtrlReg1.into(), CTRL_REG1_ACTIVE)?;
        self.initialized = true;
        info!("l3g4200d: active, {:?}", self.full_scale);
        Ok(())
    }

    /// Powers the device down, arms the configured trigger and powers it back up.
    pub fn init_async<IRQ: InterruptSource>(&mut self, irq: &mut IRQ) -> Result<(), Error<E>> {
        self.dev.apply_config(CONFIG_POWER_DOWN)?;
        self.initialized = false;

        match self.config.trigger {
            AsyncTrigger::Timer { period_us } => {
                debug!("l3g4200d: timer trigger every {} us", period_us);
                irq.listen(Trigger::Periodic { period_us });
            }
            AsyncTrigger::DataReadyLine => {
                self.dev
                    .write_reg(GyroReg::CtrlReg3.into(), CtrlReg3Flags::I2_DRDY.bits())?;
                irq.listen(Trigger::RisingEdge);
            }
        }
        self.async_mode = true;

        self.init()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_async(&self) -> bool {
        self.async_mode
    }

    pub fn full_scale(&self) -> FullScale {
        self.full_scale
    }

    /// Current sensitivity in dps per LSB.
    pub fn resolution(&self) -> f32 {
        self.full_scale.dps_per_lsb()
    }

    /// Changes the measurement range. The zero-rate bias is kept as is.
    pub fn set_full_scale(&mut self, full_scale: FullScale) -> Result<(), Error<E>> {
        self.dev
            .modify_reg(GyroReg::CtrlReg4.into(), CTRL_REG4_FS_MASK, full_scale.bits())?;
        self.full_scale = full_scale;
        debug!("l3g4200d: {:?} -> {} dps/LSB", full_scale, self.resolution());
        Ok(())
    }

    pub fn zero_rate(&self) -> Option<RawSample> {
        self.zero_rate
    }

    /// Measures the at-rest output and stores its negation as the bias.
    ///
    /// Needs an initialized device. Runs once per driver; later calls return
    /// immediately.
    pub fn calibrate_zero_rate(&mut self) -> Result<(), Error<E>> {
        if !self.initialized {
            warn!("l3g4200d: zero-rate calibration before init ignored");
            return Ok(());
        }
        if self.zero_rate.is_some() {
            return Ok(());
        }

        let mut acc = OffsetAccumulator::new(self.config.zero_rate_samples);
        while !acc.is_complete() {
            self.wait_data_ready()?;
            let raw = self.read_raw()?;
            acc.feed(raw);
        }
        let bias = acc.negated_mean().unwrap_or_default();
        info!("l3g4200d: zero-rate bias {:?}", bias);
        self.zero_rate = Some(bias);
        Ok(())
    }

    fn status(&mut self) -> Result<StatusFlags, Error<E>> {
        let bits = self.dev.read_reg(GyroReg::StatusReg.into())?;
        Ok(StatusFlags::from_bits_truncate(bits))
    }

    fn wait_data_ready(&mut self) -> Result<(), Error<E>> {
        while !self.status()?.contains(StatusFlags::ZYXDA) {}
        Ok(())
    }

    pub fn read_raw(&mut self) -> Result<RawSample, Error<E>> {
        let mut buf = [0u8; 6];
        self.dev
            .read_burst(u8::from(GyroReg::OutXL) | AUTO_INCREMENT, &mut buf)?;
        Ok(RawSample::from_le_bytes(&buf))
    }

    fn compensated(&self, raw: RawSample) -> RawSample {
        match self.zero_rate {
            Some(bias) => raw.wrapping_add(bias),
            None => raw,
        }
    }

    /// Polling read of the bias-corrected rate. `None` in asynchronous mode.
    pub fn read_rotation(&mut self) -> Result<Option<RawSample>, Error<E>> {
        if self.async_mode {
            warn!("l3g4200d: polling read rejected in async mode");
            return Ok(None);
        }
        self.wait_data_ready()?;
        let raw = self.read_raw()?;
        Ok(Some(self.compensated(raw)))
    }

    /// Timer tick or INT2 data-ready handler.
    pub fn on_data_ready(&mut self) -> Result<(), Error<E>> {
        let status = self.status()?;

        if status.contains(StatusFlags::ZYXDA) && self.on_rotation.is_registered() {
            let raw = self.read_raw()?;
            let rate = self.compensated(raw);
            self.on_rotation.emit(rate);
        }

        if status.contains(StatusFlags::ZYXOR) {
            self.on_overrun.emit(());
        }
        Ok(())
    }
}
