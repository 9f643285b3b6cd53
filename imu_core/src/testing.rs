//! Host-side test doubles for the drivers: a register-map I2C device, a
//! recording delay, an interrupt source and a settable clock.

use std::cell::Cell;
use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

use crate::irq::{InterruptSource, TimeSource, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    AddressNack(u8),
    BusFault,
}

impl i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        match self {
            MockError::AddressNack(_) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            MockError::BusFault => ErrorKind::Bus,
        }
    }
}

/// Bus-level record of one transaction, as the device saw it. `reg` is the
/// register byte exactly as sent, auto-increment flag included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Write { reg: u8, len: usize },
    WriteRead { reg: u8, len: usize },
}

pub struct MockDevice {
    address: u8,
    regs: [u8; 256],
    queued: VecDeque<(u8, Vec<u8>)>,
    writes: Vec<(u8, u8)>,
    transfers: Vec<Transfer>,
}

impl MockDevice {
    fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 256],
            queued: VecDeque::new(),
            writes: Vec::new(),
            transfers: Vec::new(),
        }
    }

    pub fn set_reg(&mut self, reg: u8, value: u8) {
        self.regs[reg as usize] = value;
    }

    pub fn set_regs(&mut self, start: u8, values: &[u8]) {
        for (i, v) in values.iter().enumerate() {
            self.regs[start.wrapping_add(i as u8) as usize] = *v;
        }
    }

    pub fn reg(&self, reg: u8) -> u8 {
        self.regs[reg as usize]
    }

    /// The next read starting at `reg` returns `bytes` instead of the register
    /// map. Queued responses for the same register are served in order.
    pub fn queue_read(&mut self, reg: u8, bytes: &[u8]) {
        self.queued.push_back((reg, bytes.to_vec()));
    }

    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.transfers.clear();
    }

    fn read_into(&mut self, reg: u8, buf: &mut [u8]) {
        let queued = self.queued.iter().position(|(r, _)| *r == reg);
        let mut filled = 0;
        if let Some(pos) = queued {
            if let Some((_, bytes)) = self.queued.remove(pos) {
                filled = bytes.len().min(buf.len());
                buf[..filled].copy_from_slice(&bytes[..filled]);
            }
        }
        for (i, b) in buf.iter_mut().enumerate().skip(filled) {
            *b = self.regs[reg.wrapping_add(i as u8) as usize];
        }
    }
}

/// Register-map I2C device (or several, one per address) implementing the
/// embedded-hal `I2c` trait. Writes land in the map, reads auto-increment.
pub struct MockI2c {
    devices: Vec<MockDevice>,
    auto_increment_bit: u8,
    fail: bool,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            devices: vec![MockDevice::new(address)],
            auto_increment_bit: 0,
            fail: false,
        }
    }

    /// Devices that flag multi-byte reads in the register byte (L3G4200D uses bit 7).
    pub fn with_auto_increment_bit(mut self, bit: u8) -> Self {
        self.auto_increment_bit = bit;
        self
    }

    pub fn add_device(&mut self, address: u8) -> &mut MockDevice {
        self.devices.push(MockDevice::new(address));
        let last = self.devices.len() - 1;
        &mut self.devices[last]
    }

    pub fn device(&mut self, address: u8) -> Option<&mut MockDevice> {
        self.devices.iter_mut().find(|d| d.address == address)
    }

    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    fn primary(&self) -> &MockDevice {
        &self.devices[0]
    }

    fn primary_mut(&mut self) -> &mut MockDevice {
        &mut self.devices[0]
    }

    pub fn set_reg(&mut self, reg: u8, value: u8) {
        self.primary_mut().set_reg(reg, value);
    }

    pub fn set_regs(&mut self, start: u8, values: &[u8]) {
        self.primary_mut().set_regs(start, values);
    }

    pub fn reg(&self, reg: u8) -> u8 {
        self.primary().reg(reg)
    }

    pub fn queue_read(&mut self, reg: u8, bytes: &[u8]) {
        self.primary_mut().queue_read(reg, bytes);
    }

    pub fn writes(&self) -> &[(u8, u8)] {
        self.primary().writes()
    }

    /// Values written to `reg`, oldest first.
    pub fn writes_to(&self, reg: u8) -> Vec<u8> {
        self.writes().iter().filter(|(r, _)| *r == reg).map(|(_, v)| *v).collect()
    }

    pub fn transfers(&self) -> &[Transfer] {
        self.primary().transfers()
    }

    pub fn clear_log(&mut self) {
        self.primary_mut().clear_log();
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

impl i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockError::BusFault);
        }
        let strip = !self.auto_increment_bit;
        let device = self
            .devices
            .iter_mut()
            .find(|d| d.address == address)
            .ok_or(MockError::AddressNack(address))?;

        let mut pointer: Option<u8> = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let Some((&raw, data)) = bytes.split_first() else {
                        continue;
                    };
                    let reg = raw & strip;
                    for (i, v) in data.iter().enumerate() {
                        let r = reg.wrapping_add(i as u8);
                        device.regs[r as usize] = *v;
                        device.writes.push((r, *v));
                    }
                    if !data.is_empty() {
                        device.transfers.push(Transfer::Write { reg: raw, len: data.len() });
                    }
                    pointer = Some(raw);
                }
                Operation::Read(buf) => {
                    let raw = pointer.unwrap_or(0);
                    device.read_into(raw & strip, buf);
                    device.transfers.push(Transfer::WriteRead { reg: raw, len: buf.len() });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl MockDelay {
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += us as u64 * 1_000;
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
        self.calls += 1;
    }
}

#[derive(Debug, Default)]
pub struct MockInterrupt {
    pub listening: Option<Trigger>,
    pub history: Vec<Trigger>,
}

impl InterruptSource for MockInterrupt {
    fn listen(&mut self, trigger: Trigger) {
        self.listening = Some(trigger);
        self.history.push(trigger);
    }

    fn unlisten(&mut self) {
        self.listening = None;
    }
}

#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u32>,
}

impl MockClock {
    pub fn new(start_ms: u32) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl TimeSource for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
