// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SPI write datagram for the TMC5160.
//!
//! Every register access is a 40-bit datagram, MSB first:
//! - byte 0: 7-bit register address, bit 7 set for write access
//! - bytes 1..=4: 32-bit register value, big-endian

/// Length of one datagram in bytes.
pub const TELEGRAM_LEN: usize = 5;

/// Bit 7 of the address byte selects write access.
pub const WRITE_ACCESS: u8 = 0x80;

const ADDRESS_MASK: u8 = 0x7F;

/// One encoded register write.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Telegram([u8; TELEGRAM_LEN]);

impl Telegram {
    /// Encode a write of `value` to register `address`.
    pub fn write(address: u8, value: u32) -> Self {
        let mut bytes = [0u8; TELEGRAM_LEN];
        bytes[0] = (address & ADDRESS_MASK) | WRITE_ACCESS;
        bytes[1..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Register address carried in byte 0.
    #[inline]
    pub fn address(&self) -> u8 {
        self.0[0] & ADDRESS_MASK
    }

    #[inline]
    pub fn is_write(&self) -> bool {
        (self.0[0] & WRITE_ACCESS) != 0
    }

    /// 32-bit register value carried in bytes 1..=4.
    #[inline]
    pub fn value(&self) -> u32 {
        u32::from_be_bytes([self.0[1], self.0[2], self.0[3], self.0[4]])
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; TELEGRAM_LEN] {
        &self.0
    }
}
