use heapless::spsc::Queue;

use crate::core_data_types::{RawSample, ThreeAxes};

/// One output of any of the drivers, tagged by channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Acceleration { raw: RawSample, mg: ThreeAxes },
    PitchRoll { pitch_deg: f32, roll_deg: f32 },
    RotationalVelocity(RawSample),
    Temperature { raw: i32, celsius: f32, fahrenheit: f32 },
    Pressure { raw: i32, hpa: f32, altitude_m: f32 },
    VerticalSpeed { mps: f32, fps: f32 },
    Overrun,
}

/// Hand-off from the interrupt callbacks to the main loop (or a telemetry
/// task feeding the display).
pub struct StreamBuffer<T, const N: usize> {
    queue: Queue<T, N>,
    dropped: u32,
}

impl<T, const N: usize> StreamBuffer<T, N> {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            dropped: 0,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.queue.enqueue(sample).is_err() {
            // silently drop if full
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        self.queue.dequeue()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<T, const N: usize> Default for StreamBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_and_drop_when_full() {
        // heapless spsc queues hold N - 1 elements
        let mut stream: StreamBuffer<Reading, 3> = StreamBuffer::new();
        stream.push(Reading::Overrun);
        stream.push(Reading::PitchRoll { pitch_deg: 1.0, roll_deg: 2.0 });
        stream.push(Reading::VerticalSpeed { mps: 0.0, fps: 0.0 });

        assert_eq!(stream.len(), 2);
        assert_eq!(stream.dropped(), 1);
        assert_eq!(stream.pop(), Some(Reading::Overrun));
        assert_eq!(stream.pop(), Some(Reading::PitchRoll { pitch_deg: 1.0, roll_deg: 2.0 }));
        assert!(stream.is_empty());
    }
}
