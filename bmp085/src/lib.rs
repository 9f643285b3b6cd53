#![cfg_attr(not(test), no_std)]

pub mod registers;
pub mod configs;
pub mod compensation;
pub mod altitude;

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use imu_core::{Callback, CompatibleI2c, Error, InterruptSource, RegisterDevice, TimeSource, Trigger};
use log::{debug, info, warn};

use registers::*;

pub use altitude::{pressure_to_altitude, PressureAverage, VerticalSpeed};
pub use compensation::{celsius_to_fahrenheit, Coefficients};
pub use configs::*;

pub const DEFAULT_ADDRESS: u8 = 0x77;

/// Which result the next end-of-conversion edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    AwaitingTemperature,
    /// Temperature is in hand, a pressure conversion is running.
    AwaitingPressure { raw_temperature: i32 },
}

/// One compensated reading from the polling path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub raw_temperature: i32,
    pub raw_pressure: i32,
    pub temperature_c: f32,
    pub pressure_pa: i32,
    pub pressure_hpa: f32,
    pub altitude_m: f32,
}

/// BMP085 barometer.
///
/// In asynchronous mode every end-of-conversion edge is handed to
/// [`on_conversion_complete`](Self::on_conversion_complete), which alternates
/// temperature and pressure conversions forever.
pub struct Bmp085<'cb, I2C, E, CLK> {
    dev: RegisterDevice<I2C, E>,
    clock: CLK,
    config: BaroConfig,
    coefficients: Coefficients,
    initialized: bool,
    async_mode: bool,
    state: ConversionState,
    average: PressureAverage,
    vertical_speed: VerticalSpeed,
    on_temperature: Callback<'cb, (i32, f32, f32)>,
    on_pressure: Callback<'cb, (i32, f32, f32)>,
    on_vertical_speed: Callback<'cb, (f32, f32)>,
}

impl<'cb, I2C, E, CLK> Bmp085<'cb, I2C, E, CLK> {
    pub fn i2c(&mut self) -> &mut I2C {
        self.dev.i2c()
    }
}

impl<'cb, I2C, E, CLK> Bmp085<'cb, I2C, E, CLK>
where
    I2C: CompatibleI2c<E>,
    E: Debug,
    CLK: TimeSource,
{
    pub fn new(i2c: I2C, clock: CLK) -> Self {
        Self::with_config(i2c, DEFAULT_ADDRESS, clock, BaroConfig::default())
    }

    pub fn with_config(i2c: I2C, address: u8, clock: CLK, config: BaroConfig) -> Self {
        Self {
            dev: RegisterDevice::new(i2c, address),
            clock,
            config,
            coefficients: Coefficients::default(),
            initialized: false,
            async_mode: false,
            state: ConversionState::AwaitingTemperature,
            average: PressureAverage::new(),
            vertical_speed: VerticalSpeed::new(config.vertical_speed_interval),
            on_temperature: Callback::new(),
            on_pressure: Callback::new(),
            on_vertical_speed: Callback::new(),
        }
    }

    pub fn destroy(self) -> (I2C, CLK) {
        (self.dev.destroy(), self.clock)
    }

    pub fn who_am_i(&mut self) -> Result<u8, Error<E>> {
        self.dev.read_reg(BaroReg::ChipId.into())
    }

    pub fn verify(&mut self) -> Result<(), Error<E>> {
        let found = self.who_am_i()?;
        if found != CHIP_ID {
            return Err(Error::InvalidDevice { expected: CHIP_ID, found });
        }
        Ok(())
    }

    pub fn dump_registers(&mut self) -> Result<(), Error<E>> {
        self.dev.dump_config(BARO_REGS)
    }

    /// `(raw, °C, °F)` once per cycle.
    pub fn register_temperature_callback(&mut self, cb: &'cb mut dyn FnMut((i32, f32, f32))) {
        self.on_temperature.register(cb);
    }

    /// `(raw, hPa, altitude m)` once per cycle.
    pub fn register_pressure_callback(&mut self, cb: &'cb mut dyn FnMut((i32, f32, f32))) {
        self.on_pressure.register(cb);
    }

    /// `(m/s, ft/s)` every `vertical_speed_interval` cycles.
    pub fn register_vertical_speed_callback(&mut self, cb: &'cb mut dyn FnMut((f32, f32))) {
        self.on_vertical_speed.register(cb);
    }

    /// Reads the calibration EEPROM. Only the first call touches the bus.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        if self.initialized {
            return Ok(());
        }
        let mut buf = [0u8; COEFFICIENTS_LEN];
        self.dev.read_burst(BaroReg::Ac1.into(), &mut buf)?;
        self.coefficients = Coefficients::from_be_bytes(&buf);
        self.initialized = true;
        info!("bmp085: coefficients {:?}", self.coefficients);
        Ok(())
    }

    pub fn init_async<IRQ: InterruptSource>(&mut self, irq: &mut IRQ) -> Result<(), Error<E>> {
        self.init()?;
        irq.listen(Trigger::RisingEdge);
        self.start_temperature()?;
        self.state = ConversionState::AwaitingTemperature;
        self.async_mode = true;
        Ok(())
    }

    pub fn is_async(&self) -> bool {
        self.async_mode
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub fn sea_level_pressure(&self) -> f32 {
        self.config.sea_level_hpa
    }

    /// Sets the altitude datum in hPa.
    pub fn set_sea_level_pressure(&mut self, hpa: f32) {
        self.config.sea_level_hpa = hpa;
    }

    fn start_temperature(&mut self) -> Result<(), Error<E>> {
        self.dev.write_reg(BaroReg::CtrlMeas.into(), CMD_TEMPERATURE)
    }

    fn start_pressure(&mut self, oversampling: Oversampling) -> Result<(), Error<E>> {
        let cmd = CMD_PRESSURE | (oversampling.oss() << CTRL_MEAS_OSS_LOC);
        self.dev.write_reg(BaroReg::CtrlMeas.into(), cmd)
    }

    fn read_temperature_result(&mut self) -> Result<i32, Error<E>> {
        let mut buf = [0u8; 2];
        self.dev.read_burst(BaroReg::OutMsb.into(), &mut buf)?;
        Ok(u16::from_be_bytes(buf) as i32)
    }

    fn read_pressure_result(&mut self, oversampling: Oversampling) -> Result<i32, Error<E>> {
        let mut buf = [0u8; 3];
        self.dev.read_burst(BaroReg::OutMsb.into(), &mut buf)?;
        let raw = (buf[0] as i32) << 16 | (buf[1] as i32) << 8 | buf[2] as i32;
        Ok(raw >> (8 - oversampling.oss()))
    }

    /// Blocking temperature conversion. Returns 0 in asynchronous mode.
    pub fn read_raw_temperature_sync<D: DelayNs>(&mut self, delay: &mut D) -> Result<i32, Error<E>> {
        if self.async_mode {
            warn!("bmp085: sync temperature read rejected in async mode");
            return Ok(0);
        }
        self.start_temperature()?;
        delay.delay_us(TEMPERATURE_DELAY_US);
        self.read_temperature_result()
    }

    /// Blocking pressure conversion at `oss` (0..=3). Returns 0 in
    /// asynchronous mode or for an out-of-range `oss`.
    pub fn read_raw_pressure_sync<D: DelayNs>(&mut self, oss: u8, delay: &mut D) -> Result<i32, Error<E>> {
        if self.async_mode {
            warn!("bmp085: sync pressure read rejected in async mode");
            return Ok(0);
        }
        let Ok(oversampling) = Oversampling::try_from(oss) else {
            warn!("bmp085: invalid oversampling setting {}", oss);
            return Ok(0);
        };
        self.start_pressure(oversampling)?;
        delay.delay_us(oversampling.conversion_delay_us());
        self.read_pressure_result(oversampling)
    }

    /// Polling temperature + pressure + altitude at the configured
    /// oversampling. Unfiltered. `None` in asynchronous mode.
    pub fn read_sync<D: DelayNs>(&mut self, delay: &mut D) -> Result<Option<Measurement>, Error<E>> {
        if self.async_mode {
            warn!("bmp085: sync read rejected in async mode");
            return Ok(None);
        }
        self.init()?;
        let oversampling = self.config.oversampling;
        let raw_temperature = self.read_raw_temperature_sync(delay)?;
        let raw_pressure = self.read_raw_pressure_sync(oversampling.oss(), delay)?;

        let (t, p) = self
            .coefficients
            .compensate(raw_temperature, raw_pressure, oversampling.oss());
        let pressure_hpa = p as f32 / 100.0;
        Ok(Some(Measurement {
            raw_temperature,
            raw_pressure,
            temperature_c: t as f32 / 10.0,
            pressure_pa: p,
            pressure_hpa,
            altitude_m: pressure_to_altitude(pressure_hpa, self.config.sea_level_hpa),
        }))
    }

    /// End-of-conversion handler. Reads the finished result and starts the
    /// other conversion.
    pub fn on_conversion_complete(&mut self) -> Result<(), Error<E>> {
        let oversampling = self.config.oversampling;
        match self.state {
            ConversionState::AwaitingTemperature => {
                let raw_temperature = self.read_temperature_result()?;
                self.start_pressure(oversampling)?;
                self.state = ConversionState::AwaitingPressure { raw_temperature };
            }
            ConversionState::AwaitingPressure { raw_temperature } => {
                let raw_pressure = self.read_pressure_result(oversampling)?;
                self.publish(raw_temperature, raw_pressure, oversampling);
                self.start_temperature()?;
                self.state = ConversionState::AwaitingTemperature;
            }
        }
        debug!("bmp085: -> {:?}", self.state);
        Ok(())
    }

    fn publish(&mut self, raw_temperature: i32, raw_pressure: i32, oversampling: Oversampling) {
        let (t, p) = self
            .coefficients
            .compensate(raw_temperature, raw_pressure, oversampling.oss());

        let celsius = t as f32 / 10.0;
        self.on_temperature
            .emit((raw_temperature, celsius, celsius_to_fahrenheit(celsius)));

        let p = if self.config.pressure_filter { self.average.apply(p) } else { p };
        let hpa = p as f32 / 100.0;
        let altitude = pressure_to_altitude(hpa, self.config.sea_level_hpa);
        self.on_pressure.emit((raw_pressure, hpa, altitude));

        if let Some(mps) = self.vertical_speed.update(altitude, self.clock.now_ms()) {
            self.on_vertical_speed.emit((mps, mps * FEET_PER_METER));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use imu_core::testing::{MockClock, MockDelay, MockI2c, MockInterrupt, Transfer};

    const CTRL_MEAS: u8 = 0xF4;
    const OUT_MSB: u8 = 0xF6;

    // AC1..MD from the datasheet example
    const DATASHEET_EEPROM: [u8; 22] = [
        0x01, 0x98, 0xFF, 0xB8, 0xC7, 0xD1, 0x7F, 0xE5, 0x7F, 0xF5, 0x5A, 0x71,
        0x18, 0x2E, 0x00, 0x04, 0x80, 0x00, 0xDD, 0xF9, 0x0B, 0x34,
    ];
    const UT: [u8; 2] = [0x6C, 0xFA]; // 27898
    const UP_OSS0: [u8; 3] = [0x5D, 0x23, 0x00]; // 23843 << 8

    fn mock() -> MockI2c {
        let mut i2c = MockI2c::new(DEFAULT_ADDRESS);
        i2c.set_reg(0xD0, CHIP_ID);
        i2c.set_regs(0xAA, &DATASHEET_EEPROM);
        i2c
    }

    fn coefficient_reads(i2c: &MockI2c) -> usize {
        i2c.transfers()
            .iter()
            .filter(|t| matches!(t, Transfer::WriteRead { reg: 0xAA, len: 22 }))
            .count()
    }

    #[test]
    fn init_reads_coefficients_once() {
        let clock = MockClock::new(0);
        let mut baro = Bmp085::new(mock(), &clock);
        baro.verify().unwrap();
        baro.init().unwrap();
        baro.init().unwrap();

        assert_eq!(coefficient_reads(baro.i2c()), 1);
        assert_eq!(baro.coefficients().ac1, 408);
        assert_eq!(baro.coefficients().ac4, 32741);
        assert_eq!(baro.coefficients().mb, -32768);
        assert_eq!(baro.coefficients().md, 2868);
    }

    #[test]
    fn sync_reads_use_conversion_delays() {
        let clock = MockClock::new(0);
        let mut i2c = mock();
        i2c.set_regs(OUT_MSB, &[0x6C, 0xFA, 0x80]);
        let mut baro = Bmp085::new(i2c, &clock);
        let mut delay = MockDelay::default();

        assert_eq!(baro.read_raw_temperature_sync(&mut delay).unwrap(), 27898);
        assert_eq!(delay.total_us(), 4_500);

        let raw = baro.read_raw_pressure_sync(3, &mut delay).unwrap();
        assert_eq!(raw, (0x6CFA80 >> 5) as i32);
        assert_eq!(delay.total_us(), 4_500 + 25_500);
        assert_eq!(baro.i2c().writes_to(CTRL_MEAS), vec![0x2E, 0xF4]);
    }

    #[test]
    fn bad_oversampling_returns_zero_without_bus_traffic() {
        let clock = MockClock::new(0);
        let mut baro = Bmp085::new(mock(), &clock);
        let mut delay = MockDelay::default();

        assert_eq!(baro.read_raw_pressure_sync(4, &mut delay).unwrap(), 0);
        assert!(baro.i2c().transfers().is_empty());
        assert_eq!(delay.calls, 0);
    }

    #[test]
    fn sync_reads_rejected_in_async_mode() {
        let clock = MockClock::new(0);
        let mut baro = Bmp085::new(mock(), &clock);
        let mut delay = MockDelay::default();
        baro.init_async(&mut MockInterrupt::default()).unwrap();
        baro.i2c().clear_log();

        assert_eq!(baro.read_raw_temperature_sync(&mut delay).unwrap(), 0);
        assert_eq!(baro.read_raw_pressure_sync(0, &mut delay).unwrap(), 0);
        assert_eq!(baro.read_sync(&mut delay).unwrap(), None);
        assert!(baro.i2c().transfers().is_empty());
    }

    #[test]
    fn read_sync_matches_datasheet() {
        let clock = MockClock::new(0);
        let mut i2c = mock();
        i2c.queue_read(OUT_MSB, &UT);
        i2c.queue_read(OUT_MSB, &UP_OSS0);
        let mut baro = Bmp085::new(i2c, &clock);

        let m = baro.read_sync(&mut MockDelay::default()).unwrap().unwrap();
        assert_eq!(m.raw_temperature, 27898);
        assert_eq!(m.raw_pressure, 23843);
        assert_eq!(m.temperature_c, 15.0);
        assert_eq!(m.pressure_pa, 69964);
        assert!((m.altitude_m - pressure_to_altitude(699.64, 1013.25)).abs() < 1e-2);
    }

    #[test]
    fn init_async_starts_temperature_conversion() {
        let clock = MockClock::new(0);
        let mut irq = MockInterrupt::default();
        let mut baro = Bmp085::new(mock(), &clock);
        baro.init_async(&mut irq).unwrap();

        assert_eq!(irq.listening, Some(Trigger::RisingEdge));
        assert_eq!(baro.i2c().writes_to(CTRL_MEAS), vec![0x2E]);
        assert_eq!(baro.state(), ConversionState::AwaitingTemperature);
    }

    #[test]
    fn two_edges_complete_one_cycle() {
        let clock = MockClock::new(0);
        let mut i2c = mock();
        i2c.queue_read(OUT_MSB, &UT);
        i2c.queue_read(OUT_MSB, &UP_OSS0);

        let temps = RefCell::new(Vec::new());
        let pressures = RefCell::new(Vec::new());
        let mut on_temp = |t: (i32, f32, f32)| temps.borrow_mut().push(t);
        let mut on_press = |p: (i32, f32, f32)| pressures.borrow_mut().push(p);

        let mut baro = Bmp085::new(i2c, &clock);
        baro.register_temperature_callback(&mut on_temp);
        baro.register_pressure_callback(&mut on_press);
        baro.init_async(&mut MockInterrupt::default()).unwrap();
        baro.i2c().clear_log();

        baro.on_conversion_complete().unwrap();
        assert_eq!(baro.state(), ConversionState::AwaitingPressure { raw_temperature: 27898 });
        assert!(temps.borrow().is_empty());

        baro.on_conversion_complete().unwrap();
        assert_eq!(baro.state(), ConversionState::AwaitingTemperature);
        assert_eq!(baro.i2c().writes_to(CTRL_MEAS), vec![0x34, 0x2E]);

        assert_eq!(temps.borrow().as_slice(), &[(27898, 15.0, 59.0)]);
        let pressures = pressures.borrow();
        assert_eq!(pressures.len(), 1);
        let (raw, hpa, alt) = pressures[0];
        assert_eq!(raw, 23843);
        assert!((hpa - 699.64).abs() < 1e-3);
        assert!((alt - pressure_to_altitude(699.64, 1013.25)).abs() < 1e-2);
    }

    #[test]
    fn oversampling_selects_pressure_command() {
        let clock = MockClock::new(0);
        let config = BaroConfig { oversampling: Oversampling::HighResolution, ..BaroConfig::default() };
        let mut baro = Bmp085::with_config(mock(), DEFAULT_ADDRESS, &clock, config);
        baro.init_async(&mut MockInterrupt::default()).unwrap();
        baro.on_conversion_complete().unwrap();
        assert_eq!(baro.i2c().writes_to(CTRL_MEAS), vec![0x2E, 0xB4]);
    }

    #[test]
    fn vertical_speed_every_kth_cycle() {
        let clock = MockClock::new(1_000);
        let config = BaroConfig { vertical_speed_interval: 2, ..BaroConfig::default() };
        let speeds = Cell::new(0);
        let mut on_speed = |(mps, fps): (f32, f32)| {
            // constant pressure, no climb
            assert!(mps.abs() < 1e-3);
            assert!((fps - mps * FEET_PER_METER).abs() < 1e-6);
            speeds.set(speeds.get() + 1);
        };

        let mut i2c = mock();
        for _ in 0..6 {
            i2c.queue_read(OUT_MSB, &UT);
            i2c.queue_read(OUT_MSB, &UP_OSS0);
        }
        let mut baro = Bmp085::with_config(i2c, DEFAULT_ADDRESS, &clock, config);
        baro.register_vertical_speed_callback(&mut on_speed);
        baro.init_async(&mut MockInterrupt::default()).unwrap();

        for _ in 0..6 {
            clock.advance(50);
            baro.on_conversion_complete().unwrap();
            baro.on_conversion_complete().unwrap();
        }
        // cycle 2 primes, cycles 4 and 6 report
        assert_eq!(speeds.get(), 2);
    }

    #[test]
    fn sea_level_datum_shifts_altitude() {
        let clock = MockClock::new(0);
        let mut i2c = mock();
        i2c.queue_read(OUT_MSB, &UT);
        i2c.queue_read(OUT_MSB, &UP_OSS0);
        let mut baro = Bmp085::new(i2c, &clock);
        baro.set_sea_level_pressure(699.64);
        assert_eq!(baro.sea_level_pressure(), 699.64);

        let m = baro.read_sync(&mut MockDelay::default()).unwrap().unwrap();
        assert!(m.altitude_m.abs() < 1e-2);
    }
}
