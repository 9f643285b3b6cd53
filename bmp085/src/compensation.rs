//! Integer temperature/pressure compensation from the BMP085 datasheet.
//!
//! Intermediates are `i32` with arithmetic right shifts and truncating
//! division; `B4` and `B7` are unsigned. All products and sums wrap, so a
//! blank or corrupt EEPROM gives garbage readings rather than a panic.

use crate::registers::COEFFICIENTS_LEN;

/// Factory calibration words read from the device EEPROM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coefficients {
    pub ac1: i16,
    pub ac2: i16,
    pub ac3: i16,
    pub ac4: u16,
    pub ac5: u16,
    pub ac6: u16,
    pub b1: i16,
    pub b2: i16,
    pub mb: i16,
    pub mc: i16,
    pub md: i16,
}

impl Coefficients {
    pub fn from_be_bytes(buf: &[u8; COEFFICIENTS_LEN]) -> Self {
        let word = |i: usize| [buf[2 * i], buf[2 * i + 1]];
        Self {
            ac1: i16::from_be_bytes(word(0)),
            ac2: i16::from_be_bytes(word(1)),
            ac3: i16::from_be_bytes(word(2)),
            ac4: u16::from_be_bytes(word(3)),
            ac5: u16::from_be_bytes(word(4)),
            ac6: u16::from_be_bytes(word(5)),
            b1: i16::from_be_bytes(word(6)),
            b2: i16::from_be_bytes(word(7)),
            mb: i16::from_be_bytes(word(8)),
            mc: i16::from_be_bytes(word(9)),
            md: i16::from_be_bytes(word(10)),
        }
    }

    /// `B5`, shared by the temperature and pressure formulas.
    fn b5(&self, ut: i32) -> i32 {
        let x1 = ut.wrapping_sub(self.ac6 as i32).wrapping_mul(self.ac5 as i32) >> 15;
        // all-zero EEPROM would otherwise divide by zero
        let x2 = ((self.mc as i32) << 11)
            .checked_div(x1.wrapping_add(self.md as i32))
            .unwrap_or(0);
        x1.wrapping_add(x2)
    }

    /// True temperature in 0.1 °C.
    pub fn temperature(&self, ut: i32) -> i32 {
        self.b5(ut).wrapping_add(8) >> 4
    }

    /// True pressure in Pa. `up` is already shifted right by `8 - oss`.
    pub fn pressure(&self, ut: i32, up: i32, oss: u8) -> i32 {
        let b6 = self.b5(ut).wrapping_sub(4000);
        let b6_sq = b6.wrapping_mul(b6) >> 12;

        let x1 = (self.b2 as i32).wrapping_mul(b6_sq) >> 11;
        let x2 = (self.ac2 as i32).wrapping_mul(b6) >> 11;
        let x3 = x1.wrapping_add(x2);
        let b3 = (((self.ac1 as i32).wrapping_mul(4).wrapping_add(x3) << oss).wrapping_add(2)) / 4;

        let x1 = (self.ac3 as i32).wrapping_mul(b6) >> 13;
        let x2 = (self.b1 as i32).wrapping_mul(b6_sq) >> 16;
        let x3 = x1.wrapping_add(x2).wrapping_add(2) >> 2;
        let b4 = (self.ac4 as u32).wrapping_mul(x3.wrapping_add(32768) as u32) >> 15;
        let b7 = (up as u32)
            .wrapping_sub(b3 as u32)
            .wrapping_mul(50000 >> oss);

        let p = if b7 < 0x8000_0000 {
            b7.wrapping_mul(2).checked_div(b4).unwrap_or(0)
        } else {
            b7.checked_div(b4).unwrap_or(0).wrapping_mul(2)
        };
        let p = p as i32;

        let x1 = (p >> 8).wrapping_mul(p >> 8);
        let x1 = x1.wrapping_mul(3038) >> 16;
        let x2 = p.wrapping_mul(-7357) >> 16;
        p.wrapping_add(x1.wrapping_add(x2).wrapping_add(3791) >> 4)
    }

    /// `(temperature in 0.1 °C, pressure in Pa)`.
    pub fn compensate(&self, ut: i32, up: i32, oss: u8) -> (i32, i32) {
        (self.temperature(ut), self.pressure(ut, up, oss))
    }
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}
