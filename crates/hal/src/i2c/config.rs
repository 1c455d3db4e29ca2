//! I2C configuration types.

use crate::types::{PeripheralId, PinId};
use crate::validate::{rule, RuleResult, Validate};

/// Bus speed grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cSpeed {
    /// 100 kHz
    #[default]
    Standard,
    /// 400 kHz
    Fast,
    /// 1 MHz
    FastPlus,
}

impl I2cSpeed {
    /// Bus clock in Hz.
    pub const fn hz(self) -> u32 {
        match self {
            Self::Standard => 100_000,
            Self::Fast => 400_000,
            Self::FastPlus => 1_000_000,
        }
    }
}

/// Address mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressMode {
    /// 7-bit addressing
    #[default]
    SevenBit,
    /// 10-bit addressing
    TenBit,
}

impl AddressMode {
    /// Highest address representable in this mode.
    pub const fn max_address(self) -> u16 {
        match self {
            Self::SevenBit => 0x7F,
            Self::TenBit => 0x3FF,
        }
    }

    /// `address` fits this mode.
    pub const fn contains(self, address: u16) -> bool {
        address <= self.max_address()
    }
}

/// Runtime bus parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Bus speed.
    pub speed: I2cSpeed,
    /// Address mode
    pub address_mode: AddressMode,
}

/// Complete description of one I2C instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cExpertConfig {
    /// I2C instance.
    pub peripheral: PeripheralId,
    /// Data pin.
    pub sda: PinId,
    /// Clock pin.
    pub scl: PinId,
    /// Bus speed.
    pub speed: I2cSpeed,
    /// Addressing used for targets and for `own_address`.
    pub address_mode: AddressMode,
    /// Address this controller answers to when addressed as a target.
    pub own_address: u16,
    /// Analog noise filter.
    pub analog_filter: bool,
    /// Digital noise filter length in I2C kernel clocks (0 disables).
    pub digital_filter: u8,
    /// Transmit DMA requests enabled.
    pub dma_tx: bool,
    /// Receive DMA requests enabled.
    pub dma_rx: bool,
}

impl I2cExpertConfig {
    /// Longest digital filter.
    pub const MAX_DIGITAL_FILTER: u8 = 15;

    /// 100 kHz, 7-bit, analog filter on.
    pub const fn standard(peripheral: PeripheralId, sda: PinId, scl: PinId) -> Self {
        Self {
            peripheral,
            sda,
            scl,
            speed: I2cSpeed::Standard,
            address_mode: AddressMode::SevenBit,
            own_address: 0,
            analog_filter: true,
            digital_filter: 0,
            dma_tx: false,
            dma_rx: false,
        }
    }

    /// 400 kHz, 7-bit.
    pub const fn fast(peripheral: PeripheralId, sda: PinId, scl: PinId) -> Self {
        Self {
            speed: I2cSpeed::Fast,
            ..Self::standard(peripheral, sda, scl)
        }
    }

    /// 1 MHz, 7-bit, short digital filter.
    pub const fn fast_plus(peripheral: PeripheralId, sda: PinId, scl: PinId) -> Self {
        Self {
            speed: I2cSpeed::FastPlus,
            digital_filter: 2,
            ..Self::standard(peripheral, sda, scl)
        }
    }

    /// 400 kHz with TX and RX DMA requests enabled.
    pub const fn dma(peripheral: PeripheralId, sda: PinId, scl: PinId) -> Self {
        Self {
            dma_tx: true,
            dma_rx: true,
            ..Self::fast(peripheral, sda, scl)
        }
    }

    /// Runtime bus parameters.
    pub const fn bus_config(&self) -> I2cConfig {
        I2cConfig {
            speed: self.speed,
            address_mode: self.address_mode,
        }
    }
}

impl Validate for I2cExpertConfig {
    fn check(&self) -> RuleResult {
        rule(self.sda != self.scl, "SDA and SCL must be different pins")?;
        rule(
            self.digital_filter <= Self::MAX_DIGITAL_FILTER,
            "Digital filter coefficient must be 0-15",
        )?;
        rule(
            self.address_mode.contains(self.own_address),
            "Own address out of range for addressing mode",
        )
    }
}
