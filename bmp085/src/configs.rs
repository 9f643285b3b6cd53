/// Temperature conversion time.
pub const TEMPERATURE_DELAY_US: u32 = 4_500;
pub const DEFAULT_SEA_LEVEL_HPA: f32 = 1013.25;
/// Depth of the moving average over compensated pressure.
pub const PRESSURE_FILTER_DEPTH: usize = 8;
pub const FEET_PER_METER: f32 = 3.28084;

/// Pressure oversampling setting (`oss`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    UltraLowPower = 0,
    Standard = 1,
    HighResolution = 2,
    UltraHighResolution = 3,
}

impl Oversampling {
    pub fn oss(self) -> u8 {
        self as u8
    }

    /// Maximum pressure conversion time for this setting.
    pub fn conversion_delay_us(self) -> u32 {
        match self {
            Oversampling::UltraLowPower => 4_500,
            Oversampling::Standard => 7_500,
            Oversampling::HighResolution => 13_500,
            Oversampling::UltraHighResolution => 25_500,
        }
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = u8;

    fn try_from(oss: u8) -> Result<Self, Self::Error> {
        match oss {
            0 => Ok(Oversampling::UltraLowPower),
            1 => Ok(Oversampling::Standard),
            2 => Ok(Oversampling::HighResolution),
            3 => Ok(Oversampling::UltraHighResolution),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BaroConfig {
    pub oversampling: Oversampling,
    /// Moving average over the last `PRESSURE_FILTER_DEPTH` pressures.
    pub pressure_filter: bool,
    pub sea_level_hpa: f32,
    /// Vertical speed is updated every this many pressure cycles.
    pub vertical_speed_interval: u16,
}

impl Default for BaroConfig {
    fn default() -> Self {
        Self {
            oversampling: Oversampling::UltraLowPower,
            pressure_filter: true,
            sea_level_hpa: DEFAULT_SEA_LEVEL_HPA,
            vertical_speed_interval: 5,
        }
    }
}
