/// One three-axis reading in device LSBs, straight off the bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawSample {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// X/Y/Z pairs, low byte first (ADXL345, L3G4200D).
    pub fn from_le_bytes(buf: &[u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([buf[0], buf[1]]),
            y: i16::from_le_bytes([buf[2], buf[3]]),
            z: i16::from_le_bytes([buf[4], buf[5]]),
        }
    }

    /// X/Y/Z pairs, high byte first.
    pub fn from_be_bytes(buf: &[u8; 6]) -> Self {
        Self {
            x: i16::from_be_bytes([buf[0], buf[1]]),
            y: i16::from_be_bytes([buf[2], buf[3]]),
            z: i16::from_be_bytes([buf[4], buf[5]]),
        }
    }

    /// Per-axis add with two's-complement wraparound.
    pub fn wrapping_add(self, other: RawSample) -> RawSample {
        RawSample {
            x: self.x.wrapping_add(other.x),
            y: self.y.wrapping_add(other.y),
            z: self.z.wrapping_add(other.z),
        }
    }

    pub fn scaled(self, factor: f32) -> ThreeAxes {
        ThreeAxes {
            x: self.x as f32 * factor,
            y: self.y as f32 * factor,
            z: self.z as f32 * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThreeAxes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ThreeAxes {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
