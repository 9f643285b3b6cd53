use imu_core::registers;

registers! {
    GyroReg, GYRO_REGS {
        WhoAmI       = 0x0F,
        CtrlReg1     = 0x20,
        CtrlReg2     = 0x21,
        CtrlReg3     = 0x22,
        CtrlReg4     = 0x23,
        CtrlReg5     = 0x24,
        Reference    = 0x25,
        OutTemp      = 0x26,
        StatusReg    = 0x27,
        OutXL        = 0x28,
        OutXH        = 0x29,
        OutYL        = 0x2A,
        OutYH        = 0x2B,
        OutZL        = 0x2C,
        OutZH        = 0x2D,
        FifoCtrlReg  = 0x2E,
        FifoSrcReg   = 0x2F,
        Int1Cfg      = 0x30,
        Int1Src      = 0x31,
        Int1ThsXH    = 0x32,
        Int1ThsXL    = 0x33,
        Int1ThsYH    = 0x34,
        Int1ThsYL    = 0x35,
        Int1ThsZH    = 0x36,
        Int1ThsZL    = 0x37,
        Int1Duration = 0x38,
    }
}

pub const DEVICE_ID: u8 = 0xD3;

/// Set on the sub-address to make multi-byte reads auto-increment.
pub const AUTO_INCREMENT: u8 = 0x80;

/* CTRL_REG1
 * B7  B6  B5  B4  B3 B2 B1 B0
 * DR1 DR0 BW1 BW0 PD Zen Yen Xen
*/
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CtrlReg1Flags: u8 {
        const DR1 = 1 << 7;
        const DR0 = 1 << 6;
        const BW1 = 1 << 5;
        const BW0 = 1 << 4;
        const PD  = 1 << 3;
        const ZEN = 1 << 2;
        const YEN = 1 << 1;
        const XEN = 1 << 0;
    }
}

/* CTRL_REG3
 * B7      B6      B5       B4        B3      B2      B1      B0
 * I1_INT1 I1_BOOT H_LACTIVE PP_OD    I2_DRDY I2_WTM  I2_ORUN I2_EMPTY
*/
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CtrlReg3Flags: u8 {
        const I1_INT1   = 1 << 7;
        const I1_BOOT   = 1 << 6;
        const H_LACTIVE = 1 << 5;
        const PP_OD     = 1 << 4;
        const I2_DRDY   = 1 << 3;
        const I2_WTM    = 1 << 2;
        const I2_ORUN   = 1 << 1;
        const I2_EMPTY  = 1 << 0;
    }
}

/* STATUS_REG
 * B7    B6  B5  B4  B3    B2  B1  B0
 * ZYXOR ZOR YOR XOR ZYXDA ZDA YDA XDA
*/
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const ZYXOR = 1 << 7;
        const ZOR   = 1 << 6;
        const YOR   = 1 << 5;
        const XOR   = 1 << 4;
        const ZYXDA = 1 << 3;
        const ZDA   = 1 << 2;
        const YDA   = 1 << 1;
        const XDA   = 1 << 0;
    }
}

pub const CTRL_REG4_FS_LOC: u8 = 4;
pub const CTRL_REG4_FS_MASK: u8 = 0b11 << CTRL_REG4_FS_LOC;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullScale {
    Dps250  = 0b00,
    Dps500  = 0b01,
    Dps2000 = 0b10,
}

impl FullScale {
    /// Sensitivity in degrees per second per LSB.
    pub fn dps_per_lsb(self) -> f32 {
        match self {
            FullScale::Dps250 => 0.00875,
            FullScale::Dps500 => 0.0175,
            FullScale::Dps2000 => 0.07,
        }
    }

    pub fn bits(self) -> u8 {
        (self as u8) << CTRL_REG4_FS_LOC
    }
}
