use imu_core::registers;

registers! {
    BaroReg, BARO_REGS {
        Ac1   = 0xAA,
        Ac2   = 0xAC,
        Ac3   = 0xAE,
        Ac4   = 0xB0,
        Ac5   = 0xB2,
        Ac6   = 0xB4,
        B1    = 0xB6,
        B2    = 0xB8,
        Mb    = 0xBA,
        Mc    = 0xBC,
        Md    = 0xBE,
        ChipId    = 0xD0,
        SoftReset = 0xE0,
        CtrlMeas  = 0xF4,
        OutMsb    = 0xF6,
        OutLsb    = 0xF7,
        OutXlsb   = 0xF8,
    }
}

pub const CHIP_ID: u8 = 0x55;

/// AC1..MD, eleven big-endian words starting at `BaroReg::Ac1`.
pub const COEFFICIENTS_LEN: usize = 22;

pub const CMD_TEMPERATURE: u8 = 0x2E;
/// OR'd with the oversampling setting shifted to bits 7:6.
pub const CMD_PRESSURE: u8 = 0x34;
pub const CTRL_MEAS_OSS_LOC: u8 = 6;
