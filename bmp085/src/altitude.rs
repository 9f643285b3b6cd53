use imu_core::RingBuffer;
use libm::powf;

use crate::configs::PRESSURE_FILTER_DEPTH;

/// International barometric formula, metres above the `sea_level_hpa` datum.
pub fn pressure_to_altitude(pressure_hpa: f32, sea_level_hpa: f32) -> f32 {
    44330.0 * (1.0 - powf(pressure_hpa / sea_level_hpa, 1.0 / 5.255))
}

/// Moving average of the last `PRESSURE_FILTER_DEPTH` compensated pressures.
pub struct PressureAverage {
    window: RingBuffer<i32, PRESSURE_FILTER_DEPTH>,
}

impl PressureAverage {
    pub fn new() -> Self {
        Self { window: RingBuffer::new() }
    }

    /// Adds `pressure_pa` and returns the truncated mean of the window.
    pub fn apply(&mut self, pressure_pa: i32) -> i32 {
        self.window.push_cyclic(pressure_pa);
        let sum: i64 = self.window.iter().map(i64::from).sum();
        (sum / self.window.count() as i64) as i32
    }
}

impl Default for PressureAverage {
    fn default() -> Self {
        Self::new()
    }
}

/// Differentiates altitude over every `interval`-th sample.
pub struct VerticalSpeed {
    interval: u16,
    cycles: u16,
    last: Option<(f32, u32)>,
}

impl VerticalSpeed {
    pub fn new(interval: u16) -> Self {
        Self {
            interval: interval.max(1),
            cycles: 0,
            last: None,
        }
    }

    /// Returns m/s on every `interval`-th call once a previous fix exists.
    pub fn update(&mut self, altitude_m: f32, now_ms: u32) -> Option<f32> {
        self.cycles += 1;
        if self.cycles < self.interval {
            return None;
        }
        self.cycles = 0;

        let Some((prev_alt, prev_ms)) = self.last else {
            self.last = Some((altitude_m, now_ms));
            return None;
        };
        let dt_ms = now_ms.wrapping_sub(prev_ms);
        if dt_ms == 0 {
            return None;
        }
        self.last = Some((altitude_m, now_ms));
        Some((altitude_m - prev_alt) * 1000.0 / dt_ms as f32)
    }
}
