//! I2C capability layer
//!
//! Addresses are `u16` so the same contract covers 7-bit and 10-bit
//! targets; the handle rejects addresses outside the configured mode.

pub mod builder;
pub mod config;
pub mod simple;

pub use builder::{I2cBuilder, I2cBuilderState};
pub use config::{AddressMode, I2cConfig, I2cExpertConfig, I2cSpeed};

use crate::error::{ErrorCode, HalResult};
use crate::validate::Validate;

/// First address probed by [`I2cPeripheral::scan_bus`].
pub const SCAN_FIRST: u16 = 0x08;
/// Last address probed by [`I2cPeripheral::scan_bus`].
pub const SCAN_LAST: u16 = 0x77;

/// Register-bus family capability contract.
pub trait I2cPeripheral {
    /// Read from device
    fn read(&mut self, address: u16, buffer: &mut [u8]) -> HalResult<()>;

    /// Write to device
    fn write(&mut self, address: u16, data: &[u8]) -> HalResult<()>;

    /// Write then read (repeated start)
    fn write_read(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> HalResult<()>;

    /// Apply new runtime bus parameters.
    fn configure(&mut self, config: I2cConfig) -> HalResult<()>;

    /// Current runtime bus parameters.
    fn config(&self) -> I2cConfig;

    /// Read one 8-bit register.
    fn read_register(&mut self, address: u16, register: u8) -> HalResult<u8> {
        let mut value = [0u8; 1];
        self.write_read(address, &[register], &mut value)?;
        let [value] = value;
        Ok(value)
    }

    /// Write one 8-bit register.
    fn write_register(&mut self, address: u16, register: u8, value: u8) -> HalResult<()> {
        self.write(address, &[register, value])
    }

    /// Burst read starting at `register`.
    fn read_registers(&mut self, address: u16, register: u8, buffer: &mut [u8]) -> HalResult<()> {
        self.write_read(address, &[register], buffer)
    }

    /// Change only the bus speed.
    fn set_speed(&mut self, speed: I2cSpeed) -> HalResult<()> {
        let config = I2cConfig {
            speed,
            ..self.config()
        };
        self.configure(config)
    }

    /// Zero-length write: `true` if a device acknowledged `address`.
    ///
    /// An address NACK reads as absent; every other error propagates.
    fn probe(&mut self, address: u16) -> HalResult<bool> {
        match self.write(address, &[]) {
            Ok(()) => Ok(true),
            Err(ErrorCode::AddressNack) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Probe the non-reserved 7-bit range, storing responders in `found`.
    ///
    /// Stops once `found` is full, without probing further addresses;
    /// returns the number stored.
    fn scan_bus(&mut self, found: &mut [u16]) -> HalResult<usize> {
        let mut count = 0usize;
        for address in SCAN_FIRST..=SCAN_LAST {
            let Some(slot) = found.get_mut(count) else { break };
            if self.probe(address)? {
                *slot = address;
                count = count.saturating_add(1);
            }
        }
        Ok(count)
    }
}

/// Hardware policy for one I2C instance.
pub trait I2cHardware {
    /// Apply a complete, already validated configuration.
    fn configure(&mut self, config: &I2cExpertConfig) -> HalResult<()>;

    /// Reprogram timing / addressing.
    fn reconfigure(&mut self, config: &I2cConfig) -> HalResult<()>;

    /// Controller read.
    fn read(&mut self, address: u16, buffer: &mut [u8]) -> HalResult<()>;

    /// Controller write; an empty `data` addresses the device only.
    fn write(&mut self, address: u16, data: &[u8]) -> HalResult<()>;

    /// Write, repeated start, read.
    fn write_read(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> HalResult<()>;
}

/// I2C handle produced by every API level.
pub struct I2c<H> {
    hw: H,
    config: I2cExpertConfig,
}

impl<H: I2cHardware> I2c<H> {
    /// Expert-level constructor: validate, then apply to hardware.
    pub fn new(mut hw: H, config: I2cExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        hw.configure(&config)?;
        hal_debug!(
            "i2c{} configured at {} Hz",
            config.peripheral.index(),
            config.speed.hz()
        );
        Ok(Self { hw, config })
    }

    /// Resolved configuration.
    pub fn expert_config(&self) -> &I2cExpertConfig {
        &self.config
    }

    /// Borrow the hardware policy.
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Mutably borrow the hardware policy.
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Release the hardware policy.
    pub fn release(self) -> H {
        self.hw
    }

    fn check_address(&self, address: u16) -> HalResult<()> {
        if self.config.address_mode.contains(address) {
            Ok(())
        } else {
            hal_warn!("i2c address {} outside addressing mode", address);
            Err(ErrorCode::InvalidParameter)
        }
    }
}

impl<H: I2cHardware> I2cPeripheral for I2c<H> {
    fn read(&mut self, address: u16, buffer: &mut [u8]) -> HalResult<()> {
        self.check_address(address)?;
        self.hw.read(address, buffer)
    }

    fn write(&mut self, address: u16, data: &[u8]) -> HalResult<()> {
        self.check_address(address)?;
        self.hw.write(address, data)
    }

    fn write_read(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> HalResult<()> {
        self.check_address(address)?;
        self.hw.write_read(address, write, read)
    }

    fn configure(&mut self, config: I2cConfig) -> HalResult<()> {
        let candidate = I2cExpertConfig {
            speed: config.speed,
            address_mode: config.address_mode,
            ..self.config
        };
        candidate.ensure_valid()?;
        self.hw.reconfigure(&config)?;
        self.config = candidate;
        Ok(())
    }

    fn config(&self) -> I2cConfig {
        self.config.bus_config()
    }
}
