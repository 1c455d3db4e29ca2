//! SPI configuration types.

use crate::types::{PeripheralId, PinId};
use crate::validate::{rule, RuleResult, Validate};

/// SPI modes (CPOL, CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Clock idles high.
    pub const fn cpol(self) -> bool {
        matches!(self, Self::Mode2 | Self::Mode3)
    }

    /// Data sampled on the second clock edge.
    pub const fn cpha(self) -> bool {
        matches!(self, Self::Mode1 | Self::Mode3)
    }
}

/// Bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// MSB first
    #[default]
    MsbFirst,
    /// LSB first
    LsbFirst,
}

/// Frame protocol resolved from the mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameFormat {
    /// Motorola SPI (CPOL/CPHA framing).
    Motorola,
    /// TI synchronous serial frame.
    Ti,
}

/// Runtime bus parameters, the part of the configuration that
/// [`SpiPeripheral::configure`](super::SpiPeripheral::configure) may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub clock_speed_hz: u32,
    /// SPI mode (CPOL, CPHA)
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: BitOrder,
    /// Bits per frame (4–16).
    pub data_size: u8,
}

impl Default for SpiConfig {
    /// Mode 0, 1 MHz, MSB first, 8-bit frames.
    fn default() -> Self {
        Self {
            clock_speed_hz: 1_000_000,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            data_size: 8,
        }
    }
}

/// Complete description of one SPI instance.
///
/// A missing `miso` makes the handle transmit-only; a missing `mosi` makes
/// it receive-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiExpertConfig {
    /// SPI instance.
    pub peripheral: PeripheralId,
    /// Controller-out pin.
    pub mosi: Option<PinId>,
    /// Controller-in pin.
    pub miso: Option<PinId>,
    /// Clock pin.
    pub sck: PinId,
    /// Hardware chip select, if the peripheral drives it.
    pub nss: Option<PinId>,
    /// Clock frequency in Hz.
    pub clock_speed_hz: u32,
    /// Clock polarity / phase.
    pub mode: SpiMode,
    /// Bit order.
    pub bit_order: BitOrder,
    /// Bits per frame (4–16).
    pub data_size: u8,
    /// TI frame format.
    pub ti_mode: bool,
    /// Motorola frame format.
    pub motorola_mode: bool,
    /// Transmit DMA requests enabled.
    pub dma_tx: bool,
    /// Receive DMA requests enabled.
    pub dma_rx: bool,
}

impl SpiExpertConfig {
    /// Slowest clock any policy may accept.
    pub const MIN_CLOCK_HZ: u32 = 1_000;
    /// Fastest clock any policy may accept.
    pub const MAX_CLOCK_HZ: u32 = 50_000_000;

    /// Full duplex Motorola, mode 0, MSB first, 8-bit.
    pub const fn standard(
        peripheral: PeripheralId,
        mosi: PinId,
        miso: PinId,
        sck: PinId,
        clock_speed_hz: u32,
    ) -> Self {
        Self {
            peripheral,
            mosi: Some(mosi),
            miso: Some(miso),
            sck,
            nss: None,
            clock_speed_hz,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            data_size: 8,
            ti_mode: false,
            motorola_mode: true,
            dma_tx: false,
            dma_rx: false,
        }
    }

    /// Transmit-only (displays, DACs, shift registers).
    pub const fn tx_only(
        peripheral: PeripheralId,
        mosi: PinId,
        sck: PinId,
        clock_speed_hz: u32,
    ) -> Self {
        Self {
            miso: None,
            ..Self::standard(peripheral, mosi, mosi, sck, clock_speed_hz)
        }
    }

    /// Full duplex at 25 MHz.
    pub const fn fast(peripheral: PeripheralId, mosi: PinId, miso: PinId, sck: PinId) -> Self {
        Self::standard(peripheral, mosi, miso, sck, 25_000_000)
    }

    /// Full duplex with TX and RX DMA requests enabled.
    pub const fn dma(
        peripheral: PeripheralId,
        mosi: PinId,
        miso: PinId,
        sck: PinId,
        clock_speed_hz: u32,
    ) -> Self {
        Self {
            dma_tx: true,
            dma_rx: true,
            ..Self::standard(peripheral, mosi, miso, sck, clock_speed_hz)
        }
    }

    /// Frame protocol; Motorola unless TI was selected.
    pub const fn frame_format(&self) -> FrameFormat {
        if self.ti_mode {
            FrameFormat::Ti
        } else {
            FrameFormat::Motorola
        }
    }

    /// Runtime bus parameters.
    pub const fn bus_config(&self) -> SpiConfig {
        SpiConfig {
            clock_speed_hz: self.clock_speed_hz,
            mode: self.mode,
            bit_order: self.bit_order,
            data_size: self.data_size,
        }
    }

    /// Same pins and DMA setup with new runtime bus parameters.
    pub const fn with_bus_config(self, bus: SpiConfig) -> Self {
        Self {
            clock_speed_hz: bus.clock_speed_hz,
            mode: bus.mode,
            bit_order: bus.bit_order,
            data_size: bus.data_size,
            ..self
        }
    }
}

impl Validate for SpiExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            (Self::MIN_CLOCK_HZ..=Self::MAX_CLOCK_HZ).contains(&self.clock_speed_hz),
            "Clock speed out of range",
        )?;
        rule(
            self.mosi.is_some() || self.miso.is_some(),
            "At least one of MOSI or MISO must be enabled",
        )?;
        rule(
            !(self.ti_mode && self.motorola_mode),
            "TI mode and Motorola mode are mutually exclusive",
        )?;
        rule(
            (4..=16).contains(&self.data_size),
            "Data size must be 4-16 bits",
        )?;
        rule(
            !self.dma_tx || self.mosi.is_some(),
            "DMA TX requires MOSI enabled",
        )?;
        rule(
            !self.dma_rx || self.miso.is_some(),
            "DMA RX requires MISO enabled",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use crate::validate::VALID;

    const SPI1: PeripheralId = PeripheralId::new(1);
    const MOSI: PinId = PinId::new(Port::A, 7);
    const MISO: PinId = PinId::new(Port::A, 6);
    const SCK: PinId = PinId::new(Port::A, 5);

    #[test]
    fn mode_bits() {
        assert!(!SpiMode::Mode0.cpol() && !SpiMode::Mode0.cpha());
        assert!(!SpiMode::Mode1.cpol() && SpiMode::Mode1.cpha());
        assert!(SpiMode::Mode2.cpol() && !SpiMode::Mode2.cpha());
        assert!(SpiMode::Mode3.cpol() && SpiMode::Mode3.cpha());
    }

    #[test]
    fn ti_and_motorola_together_rejected() {
        let cfg = SpiExpertConfig {
            ti_mode: true,
            ..SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 1_000_000)
        };
        assert_eq!(
            cfg.error_message(),
            "TI mode and Motorola mode are mutually exclusive"
        );

        let ti = SpiExpertConfig {
            motorola_mode: false,
            ..cfg
        };
        assert_eq!(ti.error_message(), VALID);
        assert_eq!(ti.frame_format(), FrameFormat::Ti);
    }

    #[test]
    fn clock_speed_checked_before_pins() {
        let cfg = SpiExpertConfig {
            clock_speed_hz: 999,
            mosi: None,
            miso: None,
            ..SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 1_000_000)
        };
        assert_eq!(cfg.error_message(), "Clock speed out of range");
    }

    #[test]
    fn data_size_bounds() {
        let base = SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 1_000_000);
        assert!(SpiExpertConfig { data_size: 4, ..base }.is_valid());
        assert!(SpiExpertConfig { data_size: 16, ..base }.is_valid());
        assert_eq!(
            SpiExpertConfig { data_size: 3, ..base }.error_message(),
            "Data size must be 4-16 bits"
        );
    }

    #[test]
    fn dma_rx_needs_miso() {
        let cfg = SpiExpertConfig {
            dma_rx: true,
            ..SpiExpertConfig::tx_only(SPI1, MOSI, SCK, 8_000_000)
        };
        assert_eq!(cfg.error_message(), "DMA RX requires MISO enabled");
    }

    #[test]
    fn bus_config_round_trips_through_expert_config() {
        let base = SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 1_000_000);
        let bus = SpiConfig {
            clock_speed_hz: 4_000_000,
            mode: SpiMode::Mode3,
            ..base.bus_config()
        };
        let updated = base.with_bus_config(bus);
        assert_eq!(updated.bus_config(), bus);
        assert_eq!(updated.miso, Some(MISO));
    }

    #[test]
    fn default_bus_config_is_mode0_1mhz() {
        let bus = SpiConfig::default();
        assert_eq!(bus.mode, SpiMode::Mode0);
        assert_eq!(bus.clock_speed_hz, 1_000_000);
        assert_eq!(bus.bit_order, BitOrder::MsbFirst);
        assert_eq!(bus.data_size, 8);
    }
}
