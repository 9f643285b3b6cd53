use crate::core_data_types::RawSample;

/// Sums raw samples until `required_samples` have been fed, then yields the
/// negated per-axis mean (the value that, added to a reading, cancels the bias).
#[derive(Debug, Clone)]
pub struct OffsetAccumulator {
    required_samples: u16,
    sample_count: u16,
    sum: [i32; 3],
}

impl OffsetAccumulator {
    pub fn new(required_samples: u16) -> Self {
        Self {
            required_samples: required_samples.max(1),
            sample_count: 0,
            sum: [0; 3],
        }
    }

    /// Returns `true` once enough samples have been collected.
    pub fn feed(&mut self, sample: RawSample) -> bool {
        if self.is_complete() {
            return true;
        }
        self.sum[0] += sample.x as i32;
        self.sum[1] += sample.y as i32;
        self.sum[2] += sample.z as i32;
        self.sample_count += 1;
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.sample_count >= self.required_samples
    }

    /// Negated mean, truncated toward zero and saturated to `i16`. `None`
    /// until complete.
    pub fn negated_mean(&self) -> Option<RawSample> {
        if !self.is_complete() {
            return None;
        }
        let n = self.sample_count as i32;
        let axis = |sum: i32| (-sum / n).clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        Some(RawSample::new(axis(self.sum[0]), axis(self.sum[1]), axis(self.sum[2])))
    }
}
