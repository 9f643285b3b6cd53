use imu_core::{RawSample, RegConfig, RegOp};
use libm::roundf;

use crate::registers::*;

/// Scale in full-resolution mode, independent of range.
pub const FULL_RES_MG_PER_LSB: f32 = 3.9;
/// OFSX/OFSY/OFSZ scale factor.
pub const OFFSET_MG_PER_LSB: f32 = 15.6;
/// Nominal gravity seen on Z when the board lies flat.
pub const GRAVITY_MG: f32 = 1000.0;
pub const LPF_ALPHA: f32 = 0.5;

/// Which device pin data-ready is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntPin {
    Int1,
    Int2,
}

#[derive(Debug, Clone, Copy)]
pub struct AccelConfig {
    /// Single-pole low-pass on the mg vector before pitch/roll.
    pub low_pass: bool,
    pub calibration_samples: u16,
    pub int_pin: IntPin,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            low_pass: true,
            calibration_samples: 32,
            int_pin: IntPin::Int1,
        }
    }
}

/// Interrupts off, then standby. First step of asynchronous setup.
pub const CONFIG_STANDBY: &[RegConfig<AccelReg>] = &[
    RegConfig {
        op: RegOp::Write,
        reg: AccelReg::IntEnable,
        value: 0x00,
    },
    RegConfig {
        op: RegOp::Write,
        reg: AccelReg::PowerCtl,
        value: 0x00,
    },
];

/// mg per LSB for the given DATA_FORMAT contents.
pub fn resolution_mg_per_lsb(range: Range, full_resolution: bool) -> f32 {
    if full_resolution {
        FULL_RES_MG_PER_LSB
    } else {
        (1u32 << (range as u32 + 1)) as f32 / 512.0 * 1000.0
    }
}

/// Converts a cached calibration mean (raw LSBs at `resolution`) into the
/// OFSX/OFSY/OFSZ register counts. Z also cancels the 1 g it reads at rest.
pub fn offset_register_values(mean: RawSample, resolution: f32) -> [i8; 3] {
    let counts = |axis: i16, bias_mg: f32| -> i8 {
        let value = roundf((axis as f32 * resolution + bias_mg) / OFFSET_MG_PER_LSB);
        value.clamp(i8::MIN as f32, i8::MAX as f32) as i8
    };
    [
        counts(mean.x, 0.0),
        counts(mean.y, 0.0),
        counts(mean.z, GRAVITY_MG),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_matches_closed_form_for_every_range() {
        let expected = [3.90625, 7.8125, 15.625, 31.25];
        for (range, mg) in Range::ALL.iter().zip(expected) {
            assert_eq!(resolution_mg_per_lsb(*range, false), mg);
            assert_eq!(resolution_mg_per_lsb(*range, true), FULL_RES_MG_PER_LSB);
        }
    }

    #[test]
    fn offsets_follow_register_scale() {
        // Device flat: x/y read a small bias, z reads +1 g.
        let resolution = resolution_mg_per_lsb(Range::G2, false);
        let mean = RawSample::new(-20, 7, -256);
        let [x, y, z] = offset_register_values(mean, resolution);

        let exact = |axis: i16, bias: f32| (axis as f32 * resolution + bias) / OFFSET_MG_PER_LSB;
        assert!((x as f32 - exact(-20, 0.0)).abs() <= 1.0);
        assert!((y as f32 - exact(7, 0.0)).abs() <= 1.0);
        assert!((z as f32 - exact(-256, GRAVITY_MG)).abs() <= 1.0);
        assert_eq!([x, y, z], [-5, 2, 0]);
    }

    #[test]
    fn offsets_saturate_to_register_width() {
        let [x, _, z] = offset_register_values(RawSample::new(i16::MAX, 0, i16::MIN), 31.25);
        assert_eq!(x, i8::MAX);
        assert_eq!(z, i8::MIN);
    }
}
