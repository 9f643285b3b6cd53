use core::cell::RefCell;

use imu_core::testing::{MockI2c, MockInterrupt, Transfer};
use imu_core::{RawSample, Reading, SharedBus, StreamBuffer, Trigger};
use l3g4200d::registers::AUTO_INCREMENT;
use l3g4200d::{GyroConfig, L3g4200d, DEFAULT_ADDRESS};

const STATUS: u8 = 0x27;
const OUT_X_L: u8 = 0x28;
const OUT_X_L_BURST: u8 = OUT_X_L | AUTO_INCREMENT;

fn le(x: i16, y: i16, z: i16) -> [u8; 6] {
    let (x, y, z) = (x.to_le_bytes(), y.to_le_bytes(), z.to_le_bytes());
    [x[0], x[1], y[0], y[1], z[0], z[1]]
}

#[test]
fn timer_ticks_stream_bias_corrected_rates() {
    let mut mock = MockI2c::new(DEFAULT_ADDRESS).with_auto_increment_bit(AUTO_INCREMENT);
    mock.set_reg(0x0F, 0xD3);
    mock.set_reg(STATUS, 0x08);
    mock.set_regs(OUT_X_L, &le(-15, 20, 5));
    let bus = SharedBus::new(mock);

    let stream: RefCell<StreamBuffer<Reading, 4>> = RefCell::new(StreamBuffer::new());
    let mut on_rate = |rate: RawSample| stream.borrow_mut().push(Reading::RotationalVelocity(rate));
    let mut on_overrun = |_: ()| stream.borrow_mut().push(Reading::Overrun);

    let config = GyroConfig { zero_rate_samples: 5, ..GyroConfig::default() };
    let mut gyro = L3g4200d::with_config(bus.device(), DEFAULT_ADDRESS, config);
    gyro.verify().unwrap();

    let mut timer = MockInterrupt::default();
    gyro.init_async(&mut timer).unwrap();
    assert_eq!(timer.listening, Some(Trigger::Periodic { period_us: 100_000 }));

    gyro.calibrate_zero_rate().unwrap();
    assert_eq!(gyro.zero_rate(), Some(RawSample::new(15, -20, -5)));

    gyro.register_rotational_velocity_callback(&mut on_rate);
    gyro.register_overrun_callback(&mut on_overrun);

    // tick 1: fresh data
    bus.with(|i2c| i2c.set_regs(OUT_X_L, &le(-5, 20, 105)));
    gyro.on_data_ready().unwrap();
    // tick 2: nothing new
    bus.with(|i2c| i2c.set_reg(STATUS, 0x00));
    gyro.on_data_ready().unwrap();
    // tick 3: data plus overrun
    bus.with(|i2c| i2c.set_reg(STATUS, 0x88));
    gyro.on_data_ready().unwrap();

    let bursts = bus.with(|i2c| {
        i2c.transfers()
            .iter()
            .filter(|t| matches!(t, Transfer::WriteRead { reg, len: 6 } if *reg == OUT_X_L_BURST))
            .count()
    });
    assert_eq!(bursts, 5 + 2);

    let mut stream = stream.borrow_mut();
    assert_eq!(stream.pop(), Some(Reading::RotationalVelocity(RawSample::new(10, 0, 100))));
    assert_eq!(stream.pop(), Some(Reading::RotationalVelocity(RawSample::new(10, 0, 100))));
    assert_eq!(stream.pop(), Some(Reading::Overrun));
    assert!(stream.is_empty());
}
