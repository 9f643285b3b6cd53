use imu_core::ThreeAxes;
use libm::{atan2f, sqrtf};

const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Pitch and roll in degrees from a gravity vector.
///
/// pitch = atan2(y, sqrt(x² + z²)), roll = atan2(-x, z). A zero vector is not
/// guarded: it yields whatever `atan2(0, 0)` gives, and NaN inputs come out NaN.
pub fn pitch_roll(accel: &ThreeAxes) -> (f32, f32) {
    let pitch = atan2f(accel.y, sqrtf(accel.x * accel.x + accel.z * accel.z)) * RAD_TO_DEG;
    let roll = atan2f(-accel.x, accel.z) * RAD_TO_DEG;
    (pitch, roll)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn level_board_is_zero_zero() {
        let (pitch, roll) = pitch_roll(&ThreeAxes::new(0.0, 0.0, 1000.0));
        assert!(close(pitch, 0.0));
        assert!(close(roll, 0.0));
    }

    #[test]
    fn gravity_along_x_is_minus_ninety_roll() {
        let (pitch, roll) = pitch_roll(&ThreeAxes::new(1000.0, 0.0, 0.0));
        assert!(close(pitch, 0.0));
        assert!(close(roll, -90.0));
    }

    #[test]
    fn gravity_along_y_is_ninety_pitch() {
        let (pitch, _) = pitch_roll(&ThreeAxes::new(0.0, 1000.0, 0.0));
        assert!(close(pitch, 90.0));
    }

    #[test]
    fn nan_propagates() {
        let (pitch, roll) = pitch_roll(&ThreeAxes::new(f32::NAN, 0.0, 1000.0));
        assert!(pitch.is_nan());
        assert!(roll.is_nan());
    }
}
