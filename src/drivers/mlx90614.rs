//! MLX90614 IR thermometer over SMBus.
//!
//! RAM reads return three bytes: LSB, MSB, PEC.  The PEC is a CRC-8
//! (poly 0x07) over the whole transaction including both address bytes.
//! Bit 15 of the word is the sensor's error flag.  Any failure yields
//! NaN so the samplers treat the read as invalid.

use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::app::ports::TemperatureSource;
use crate::error::SensorError;

/// Factory SMBus address.
pub const DEFAULT_ADDRESS: u8 = 0x5A;

const REG_TA: u8 = 0x06;
const REG_TOBJ1: u8 = 0x07;

/// Raw LSB is 0.02 K.
const KELVIN_PER_LSB: f32 = 0.02;
const KELVIN_OFFSET: f32 = 273.15;

/// SMBus packet error code: CRC-8, polynomial x⁸+x²+x+1, init 0.
pub fn pec(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |mut crc, &b| {
        crc ^= b;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// Convert a RAM temperature word to °C, `None` when the error flag is set.
pub fn word_to_celsius(raw: u16) -> Option<f32> {
    if raw & 0x8000 != 0 {
        return None;
    }
    Some(f32::from(raw) * KELVIN_PER_LSB - KELVIN_OFFSET)
}

pub struct Mlx90614<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Mlx90614<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Release the bus.
    pub fn release(self) -> I {
        self.i2c
    }

    fn read_word(&mut self, reg: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|_| SensorError::Bus)?;

        let addr_w = self.address << 1;
        let expected = pec(&[addr_w, reg, addr_w | 1, buf[0], buf[1]]);
        if expected != buf[2] {
            debug!(
                "MLX90614: PEC mismatch on 0x{:02X} (got 0x{:02X}, want 0x{:02X})",
                reg, buf[2], expected
            );
            return Err(SensorError::Bus);
        }
        Ok(u16::from_le_bytes([buf[0], buf[1]]))
    }

    fn read_celsius(&mut self, reg: u8) -> f32 {
        match self.read_word(reg) {
            Ok(raw) => word_to_celsius(raw).unwrap_or(f32::NAN),
            Err(_) => f32::NAN,
        }
    }
}

impl<I: I2c> TemperatureSource for Mlx90614<I> {
    fn probe(&mut self) -> Result<(), SensorError> {
        self.read_word(REG_TA).map(|_| ()).inspect_err(|e| {
            warn!("MLX90614 at 0x{:02X}: {}", self.address, e);
        })
    }

    fn read_object_c(&mut self) -> f32 {
        self.read_celsius(REG_TOBJ1)
    }

    fn read_ambient_c(&mut self) -> f32 {
        self.read_celsius(REG_TA)
    }
}
