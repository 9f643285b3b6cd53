use imu_core::registers;

registers! {
    AccelReg, ACCEL_REGS {
        DevId       = 0x00,
        ThreshTap   = 0x1D,
        Ofsx        = 0x1E,
        Ofsy        = 0x1F,
        Ofsz        = 0x20,
        Dur         = 0x21,
        Latent      = 0x22,
        Window      = 0x23,
        ThreshAct   = 0x24,
        ThreshInact = 0x25,
        TimeInact   = 0x26,
        ActInactCtl = 0x27,
        ThreshFf    = 0x28,
        TimeFf      = 0x29,
        TapAxes     = 0x2A,
        ActTapStatus = 0x2B,
        BwRate      = 0x2C,
        PowerCtl    = 0x2D,
        IntEnable   = 0x2E,
        IntMap      = 0x2F,
        IntSource   = 0x30,
        DataFormat  = 0x31,
        DataX0      = 0x32,
        DataX1      = 0x33,
        DataY0      = 0x34,
        DataY1      = 0x35,
        DataZ0      = 0x36,
        DataZ1      = 0x37,
        FifoCtl     = 0x38,
        FifoStatus  = 0x39,
    }
}

pub const DEVICE_ID: u8 = 0xE5;

/* POWER_CTL
 * B7   B6   B5   B4         B3      B2    B1      B0
 * 0    0    LINK AUTO_SLEEP MEASURE SLEEP WAKEUP1 WAKEUP0
*/
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PowerCtlFlags: u8 {
        const LINK       = 1 << 5;
        const AUTO_SLEEP = 1 << 4;
        const MEASURE    = 1 << 3;
        const SLEEP      = 1 << 2;
    }
}

/* INT_ENABLE / INT_MAP / INT_SOURCE share one bit layout.
 * B7         B6         B5         B4       B3         B2        B1        B0
 * DATA_READY SINGLE_TAP DOUBLE_TAP ACTIVITY INACTIVITY FREE_FALL WATERMARK OVERRUN
*/
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntFlags: u8 {
        const DATA_READY = 1 << 7;
        const SINGLE_TAP = 1 << 6;
        const DOUBLE_TAP = 1 << 5;
        const ACTIVITY   = 1 << 4;
        const INACTIVITY = 1 << 3;
        const FREE_FALL  = 1 << 2;
        const WATERMARK  = 1 << 1;
        const OVERRUN    = 1 << 0;
    }
}

/* DATA_FORMAT
 * B7        B6  B5         B4  B3       B2      B1     B0
 * SELF_TEST SPI INT_INVERT 0   FULL_RES JUSTIFY RANGE1 RANGE0
*/
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DataFormatFlags: u8 {
        const SELF_TEST  = 1 << 7;
        const SPI_3WIRE  = 1 << 6;
        const INT_INVERT = 1 << 5;
        const FULL_RES   = 1 << 3;
        const JUSTIFY    = 1 << 2;
    }
}

pub const DATA_FORMAT_RANGE_MASK: u8 = 0x03;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    G2  = 0,
    G4  = 1,
    G8  = 2,
    G16 = 3,
}

impl Range {
    pub const ALL: [Range; 4] = [Range::G2, Range::G4, Range::G8, Range::G16];

    pub fn from_bits(bits: u8) -> Range {
        match bits & DATA_FORMAT_RANGE_MASK {
            0 => Range::G2,
            1 => Range::G4,
            2 => Range::G8,
            _ => Range::G16,
        }
    }
}
