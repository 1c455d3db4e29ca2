//! Fluent builder for I2C instances.
//!
//! Required: SDA and SCL. Speed defaults to Standard (100 kHz) and
//! addressing to 7-bit.

use super::{AddressMode, I2c, I2cExpertConfig, I2cHardware, I2cSpeed};
use crate::builder::{self, BuilderState};
use crate::error::{ErrorCode, HalResult};
use crate::types::{PeripheralId, PinId};
use crate::validate::Validate;

/// Required-field flags for [`I2cBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct I2cBuilderState {
    /// `sda()` was called.
    pub has_sda: bool,
    /// `scl()` was called.
    pub has_scl: bool,
}

impl BuilderState for I2cBuilderState {
    const REQUIRED: u8 = 2;

    fn satisfied(&self) -> u8 {
        builder::count(&[self.has_sda, self.has_scl])
    }
}

/// Chained configuration of one I2C instance.
///
/// ```
/// use hal::i2c::{I2cBuilder, I2cSpeed};
/// use hal::{PeripheralId, PinId, Port};
///
/// let cfg = I2cBuilder::new(PeripheralId::new(2))
///     .sda(PinId::new(Port::B, 11))
///     .scl(PinId::new(Port::B, 10))
///     .speed(I2cSpeed::Fast)
///     .build()
///     .unwrap();
/// assert_eq!(cfg.speed.hz(), 400_000);
/// ```
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct I2cBuilder {
    peripheral: PeripheralId,
    sda: Option<PinId>,
    scl: Option<PinId>,
    speed: I2cSpeed,
    address_mode: AddressMode,
    own_address: u16,
    analog_filter: bool,
    digital_filter: u8,
    dma_tx: bool,
    dma_rx: bool,
    state: I2cBuilderState,
}

impl I2cBuilder {
    /// Start configuring `peripheral`.
    pub fn new(peripheral: PeripheralId) -> Self {
        Self {
            peripheral,
            sda: None,
            scl: None,
            speed: I2cSpeed::Standard,
            address_mode: AddressMode::SevenBit,
            own_address: 0,
            analog_filter: true,
            digital_filter: 0,
            dma_tx: false,
            dma_rx: false,
            state: I2cBuilderState::default(),
        }
    }

    /// Data pin.
    pub fn sda(mut self, pin: PinId) -> Self {
        self.sda = Some(pin);
        self.state.has_sda = true;
        self
    }

    /// Clock pin.
    pub fn scl(mut self, pin: PinId) -> Self {
        self.scl = Some(pin);
        self.state.has_scl = true;
        self
    }

    /// Bus speed.
    pub fn speed(mut self, speed: I2cSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Addressing mode.
    pub fn address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// Own (target-mode) address.
    pub fn own_address(mut self, address: u16) -> Self {
        self.own_address = address;
        self
    }

    /// Analog noise filter.
    pub fn analog_filter(mut self, enabled: bool) -> Self {
        self.analog_filter = enabled;
        self
    }

    /// Digital noise filter length.
    pub fn digital_filter(mut self, coefficient: u8) -> Self {
        self.digital_filter = coefficient;
        self
    }

    /// DMA request enables.
    pub fn dma(mut self, tx: bool, rx: bool) -> Self {
        self.dma_tx = tx;
        self.dma_rx = rx;
        self
    }

    /// Required-field flags.
    pub fn state(&self) -> &I2cBuilderState {
        &self.state
    }

    /// Assemble and validate the Expert configuration.
    pub fn build(&self) -> HalResult<I2cExpertConfig> {
        self.state.require_complete()?;
        let (Some(sda), Some(scl)) = (self.sda, self.scl) else {
            return Err(ErrorCode::InvalidParameter);
        };
        let config = I2cExpertConfig {
            peripheral: self.peripheral,
            sda,
            scl,
            speed: self.speed,
            address_mode: self.address_mode,
            own_address: self.own_address,
            analog_filter: self.analog_filter,
            digital_filter: self.digital_filter,
            dma_tx: self.dma_tx,
            dma_rx: self.dma_rx,
        };
        config.ensure_valid()?;
        Ok(config)
    }

    /// Finalize into a handle.
    pub fn initialize<H: I2cHardware>(self, hw: H) -> HalResult<I2c<H>> {
        I2c::new(hw, self.build()?)
    }
}
