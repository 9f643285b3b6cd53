#![cfg_attr(not(test), no_std)]

pub mod registers;
pub mod configs;
pub mod orientation;

use core::fmt::Debug;

use imu_core::{
    low_pass_filter_3axes, Callback, CompatibleI2c, Error, FilteredAxes, InterruptSource,
    OffsetAccumulator, RawSample, RegisterDevice, ThreeAxes, Trigger,
};
use log::{debug, info, warn};

use registers::*;

pub use configs::*;
pub use orientation::pitch_roll;
pub use registers::Range;

pub const DEFAULT_ADDRESS: u8 = 0x53;
/// Address with the ALT ADDRESS pin pulled high.
pub const ALT_ADDRESS: u8 = 0x1D;

/// ADXL345 accelerometer.
///
/// Either call [`init`](Self::init) and poll, or call
/// [`init_async`](Self::init_async) and forward every data-ready edge to
/// [`on_data_ready`](Self::on_data_ready). The two modes are not meant to be mixed
/// on one instance.
pub struct Adxl345<'cb, I2C, E> {
    dev: RegisterDevice<I2C, E>,
    config: AccelConfig,
    range: Range,
    full_resolution: bool,
    resolution: f32,
    initialized: bool,
    async_mode: bool,
    /// Negated mean of the calibration samples, in LSBs.
    calibration: Option<RawSample>,
    filter: FilteredAxes,
    on_acceleration: Callback<'cb, (RawSample, ThreeAxes)>,
    on_pitch_roll: Callback<'cb, (f32, f32)>,
    on_overrun: Callback<'cb, ()>,
}

impl<'cb, I2C, E> Adxl345<'cb, I2C, E> {
    pub fn i2c(&mut self) -> &mut I2C {
        self.dev.i2c()
    }
}

impl<'cb, I2C, E> Adxl345<'cb, I2C, E>
where
    I2C: CompatibleI2c<E>,
    E: Debug,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, AccelConfig::default())
    }

    pub fn default(i2c: I2C) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }

    /// The device powers up at ±2 g, 10-bit; resolution starts there.
    pub fn with_config(i2c: I2C, address: u8, config: AccelConfig) -> Self {
        Self {
            dev: RegisterDevice::new(i2c, address),
            config,
            range: Range::G2,
            full_resolution: false,
            resolution: resolution_mg_per_lsb(Range::G2, false),
            initialized: false,
            async_mode: false,
            calibration: None,
            filter: FilteredAxes::new(),
            on_acceleration: Callback::new(),
            on_pitch_roll: Callback::new(),
            on_overrun: Callback::new(),
        }
    }

    pub fn destroy(self) -> I2C {
        self.dev.destroy()
    }

    pub fn who_am_i(&mut self) -> Result<u8, Error<E>> {
        self.dev.read_reg(AccelReg::DevId.into())
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
        self.dev.dump_config(ACCEL_REGS)
    }

    pub fn register_acceleration_callback(&mut self, cb: &'cb mut dyn FnMut((RawSample, ThreeAxes))) {
        self.on_acceleration.register(cb);
    }

    pub fn register_pitch_roll_callback(&mut self, cb: &'cb mut dyn FnMut((f32, f32))) {
        self.on_pitch_roll.register(cb);
    }

    pub fn register_overrun_callback(&mut self, cb: &'cb mut dyn FnMut(())) {
        self.on_overrun.register(cb);
    }

    /// Enters measurement mode. Does nothing if already measuring.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        if self.initialized {
            return Ok(());
        }
        self.dev.write_reg(AccelReg::PowerCtl.into(), PowerCtlFlags::MEASURE.bits())?;
        self.initialized = true;
        info!("adxl345: measuring, {} mg/LSB", self.resolution);
        Ok(())
    }

    /// Reconfigures the device for interrupt-driven delivery: only data-ready
    /// is enabled, routed to the configured pin, and `irq` is armed for its
    /// rising edge.
    pub fn init_async<IRQ: InterruptSource>(&mut self, irq: &mut IRQ) -> Result<(), Error<E>> {
        self.dev.apply_config(CONFIG_STANDBY)?;
        self.initialized = false;

        let map = match self.config.int_pin {
            IntPin::Int1 => IntFlags::empty(),
            IntPin::Int2 => IntFlags::DATA_READY,
        };
        self.dev.write_reg(AccelReg::IntMap.into(), map.bits())?;

        irq.listen(Trigger::RisingEdge);
        self.dev.write_reg(AccelReg::IntEnable.into(), IntFlags::DATA_READY.bits())?;
        self.async_mode = true;

        self.init()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_async(&self) -> bool {
        self.async_mode
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn full_resolution(&self) -> bool {
        self.full_resolution
    }

    /// Current scale in mg per LSB.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    pub fn calibration_mean(&self) -> Option<RawSample> {
        self.calibration
    }

    pub fn set_range(&mut self, range: Range) -> Result<(), Error<E>> {
        let format = self
            .dev
            .modify_reg(AccelReg::DataFormat.into(), DATA_FORMAT_RANGE_MASK, range as u8)?;
        self.update_resolution(format);
        self.calibrate_offset()
    }

    pub fn set_full_resolution(&mut self, enabled: bool) -> Result<(), Error<E>> {
        let bits = if enabled { DataFormatFlags::FULL_RES.bits() } else { 0 };
        let format = self
            .dev
            .modify_reg(AccelReg::DataFormat.into(), DataFormatFlags::FULL_RES.bits(), bits)?;
        self.update_resolution(format);
        self.calibrate_offset()
    }

    /// Takes range and FULL_RES from the DATA_FORMAT byte just written, so
    /// bits left over in the device from before a host reset are honoured.
    fn update_resolution(&mut self, format: u8) {
        self.range = Range::from_bits(format);
        self.full_resolution = DataFormatFlags::from_bits_truncate(format).contains(DataFormatFlags::FULL_RES);
        self.resolution = resolution_mg_per_lsb(self.range, self.full_resolution);
        debug!(
            "adxl345: range {:?} full_res {} -> {} mg/LSB",
            self.range, self.full_resolution, self.resolution
        );
    }

    /// Writes the hardware offset registers.
    ///
    /// The first call clears the offsets and averages `calibration_samples`
    /// readings (blocking on data-ready for each). Later calls reuse that mean
    /// and only re-scale it to the current resolution.
    pub fn calibrate_offset(&mut self) -> Result<(), Error<E>> {
        let mean = match self.calibration {
            Some(mean) => mean,
            None => {
                let mean = self.accumulate_offset()?;
                self.calibration = Some(mean);
                info!("adxl345: calibration mean {:?}", mean);
                mean
            }
        };
        let offsets = offset_register_values(mean, self.resolution);
        self.write_offsets(offsets)
    }

    fn accumulate_offset(&mut self) -> Result<RawSample, Error<E>> {
        self.write_offsets([0; 3])?;
        let mut acc = OffsetAccumulator::new(self.config.calibration_samples);
        while !acc.is_complete() {
            self.wait_data_ready()?;
            let raw = self.read_raw()?;
            acc.feed(raw);
        }
        Ok(acc.negated_mean().unwrap_or_default())
    }

    fn write_offsets(&mut self, offsets: [i8; 3]) -> Result<(), Error<E>> {
        debug!("adxl345: offsets {:?}", offsets);
        self.dev.write_reg(AccelReg::Ofsx.into(), offsets[0] as u8)?;
        self.dev.write_reg(AccelReg::Ofsy.into(), offsets[1] as u8)?;
        self.dev.write_reg(AccelReg::Ofsz.into(), offsets[2] as u8)
    }

    fn int_source(&mut self) -> Result<IntFlags, Error<E>> {
        let bits = self.dev.read_reg(AccelReg::IntSource.into())?;
        Ok(IntFlags::from_bits_truncate(bits))
    }

    fn wait_data_ready(&mut self) -> Result<(), Error<E>> {
        while !self.int_source()?.contains(IntFlags::DATA_READY) {}
        Ok(())
    }

    pub fn read_raw(&mut self) -> Result<RawSample, Error<E>> {
        let mut buf = [0u8; 6];
        self.dev.read_burst(AccelReg::DataX0.into(), &mut buf)?;
        Ok(RawSample::from_le_bytes(&buf))
    }

    /// Polling read: waits for data-ready and returns the raw sample and its
    /// unfiltered mg value. `None` while asynchronous mode owns the device.
    pub fn read_acceleration(&mut self) -> Result<Option<(RawSample, ThreeAxes)>, Error<E>> {
        if self.async_mode {
            warn!("adxl345: polling read rejected in async mode");
            return Ok(None);
        }
        self.wait_data_ready()?;
        let raw = self.read_raw()?;
        Ok(Some((raw, raw.scaled(self.resolution))))
    }

    /// Data-ready interrupt handler.
    pub fn on_data_ready(&mut self) -> Result<(), Error<E>> {
        let source = self.int_source()?;

        let wants_data = self.on_acceleration.is_registered() || self.on_pitch_roll.is_registered();
        if source.contains(IntFlags::DATA_READY) && wants_data {
            let raw = self.read_raw()?;
            let mut mg = raw.scaled(self.resolution);
            if self.config.low_pass {
                low_pass_filter_3axes(&mg, &mut self.filter, LPF_ALPHA);
                mg = self.filter.data;
            }
            let (pitch, roll) = pitch_roll(&mg);

            self.on_acceleration.emit((raw, mg));
            self.on_pitch_roll.emit((pitch, roll));
        }

        if source.contains(IntFlags::OVERRUN) {
            self.on_overrun.emit(());
        }
        Ok(())
    }
}
