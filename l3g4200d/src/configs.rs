use imu_core::{RegConfig, RegOp};

use crate::registers::*;

/// Timer period used when the data-ready line is not wired (10 Hz).
pub const DEFAULT_TIMER_PERIOD_US: u32 = 100_000;

/// What drives `on_data_ready` in asynchronous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncTrigger {
    /// Periodic timer; the callback polls STATUS_REG on every tick.
    Timer { period_us: u32 },
    /// DRDY routed to INT2, rising edge.
    DataReadyLine,
}

#[derive(Debug, Clone, Copy)]
pub struct GyroConfig {
    pub trigger: AsyncTrigger,
    pub zero_rate_samples: u16,
}

impl Default for GyroConfig {
    fn default() -> Self {
        Self {
            // most breakout boards leave INT2 unconnected
            trigger: AsyncTrigger::Timer { period_us: DEFAULT_TIMER_PERIOD_US },
            zero_rate_samples: 50,
        }
    }
}

/// DR = 00, BW = 00 (100 Hz, 12.5 Hz cut-off), normal mode, all axes on.
pub const CTRL_REG1_ACTIVE: u8 = CtrlReg1Flags::PD.bits()
    | CtrlReg1Flags::ZEN.bits()
    | CtrlReg1Flags::YEN.bits()
    | CtrlReg1Flags::XEN.bits();

/// Power down and detach every interrupt output.
pub const CONFIG_POWER_DOWN: &[RegConfig<GyroReg>] = &[
    RegConfig {
        op: RegOp::Write,
        reg: GyroReg::CtrlReg1,
        value: 0x00,
    },
    RegConfig {
        op: RegOp::Write,
        reg: GyroReg::CtrlReg3,
        value: 0x00,
    },
];
