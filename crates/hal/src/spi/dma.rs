//! SPI with DMA-backed streams.

use super::SpiExpertConfig;
use crate::dma::{DmaDirection, DmaExpertConfig, DmaHardware, DmaTransfer};
use crate::error::{ErrorCode, HalResult};
use crate::validate::{rule, RuleResult, Validate};

/// SPI configuration plus the DMA streams serving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiDmaConfig {
    /// Underlying SPI configuration.
    pub spi: SpiExpertConfig,
    /// Transmit stream.
    pub tx_dma: Option<DmaExpertConfig>,
    /// Receive stream.
    pub rx_dma: Option<DmaExpertConfig>,
}

impl SpiDmaConfig {
    /// Transmit stream only; enables the TX DMA request.
    pub const fn tx_only(spi: SpiExpertConfig, tx_dma: DmaExpertConfig) -> Self {
        Self {
            spi: SpiExpertConfig {
                dma_tx: true,
                ..spi
            },
            tx_dma: Some(tx_dma),
            rx_dma: None,
        }
    }

    /// Both streams; enables both DMA requests.
    pub const fn full_duplex(
        spi: SpiExpertConfig,
        tx_dma: DmaExpertConfig,
        rx_dma: DmaExpertConfig,
    ) -> Self {
        Self {
            spi: SpiExpertConfig {
                dma_tx: true,
                dma_rx: true,
                ..spi
            },
            tx_dma: Some(tx_dma),
            rx_dma: Some(rx_dma),
        }
    }

    /// Program the transmit stream into `channel`.
    pub fn prepare_tx<D: DmaHardware>(&self, channel: D) -> HalResult<DmaTransfer<D>> {
        self.ensure_valid()?;
        let stream = self.tx_dma.ok_or(ErrorCode::NotSupported)?;
        DmaTransfer::new(channel, stream)
    }

    /// Program the receive stream into `channel`.
    pub fn prepare_rx<D: DmaHardware>(&self, channel: D) -> HalResult<DmaTransfer<D>> {
        self.ensure_valid()?;
        let stream = self.rx_dma.ok_or(ErrorCode::NotSupported)?;
        DmaTransfer::new(channel, stream)
    }
}

impl Validate for SpiDmaConfig {
    fn check(&self) -> RuleResult {
        self.spi.check()?;
        if let Some(tx) = &self.tx_dma {
            tx.check()?;
        }
        if let Some(rx) = &self.rx_dma {
            rx.check()?;
        }
        rule(
            self.tx_dma.is_none() || self.spi.dma_tx,
            "SPI DMA TX stream requires DMA TX enabled",
        )?;
        rule(
            self.rx_dma.is_none() || self.spi.dma_rx,
            "SPI DMA RX stream requires DMA RX enabled",
        )?;
        rule(
            !matches!(&self.tx_dma, Some(d) if d.direction != DmaDirection::MemoryToPeripheral),
            "SPI DMA TX must be memory-to-peripheral",
        )?;
        rule(
            !matches!(&self.rx_dma, Some(d) if d.direction != DmaDirection::PeripheralToMemory),
            "SPI DMA RX must be peripheral-to-memory",
        )?;
        match (&self.tx_dma, &self.rx_dma) {
            (Some(tx), Some(rx)) => rule(
                tx.channel != rx.channel,
                "TX and RX DMA channels must differ",
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockDmaChannel;
    use crate::types::{PeripheralId, PinId, Port};

    const SPI1: PeripheralId = PeripheralId::new(1);
    const MOSI: PinId = PinId::new(Port::A, 7);
    const MISO: PinId = PinId::new(Port::A, 6);
    const SCK: PinId = PinId::new(Port::A, 5);
    const DR: usize = 0x4001_300C;
    const BUF: usize = 0x2000_1000;

    #[test]
    fn full_duplex_enables_requests() {
        let cfg = SpiDmaConfig::full_duplex(
            SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 8_000_000),
            DmaExpertConfig::memory_to_peripheral(3, BUF, DR, 128),
            DmaExpertConfig::peripheral_to_memory(2, DR, BUF, 128),
        );
        assert!(cfg.spi.dma_tx && cfg.spi.dma_rx);
        assert!(cfg.is_valid());
    }

    #[test]
    fn tx_only_spi_cannot_take_rx_stream() {
        let cfg = SpiDmaConfig::full_duplex(
            SpiExpertConfig::tx_only(SPI1, MOSI, SCK, 8_000_000),
            DmaExpertConfig::memory_to_peripheral(3, BUF, DR, 128),
            DmaExpertConfig::peripheral_to_memory(2, DR, BUF, 128),
        );
        assert_eq!(cfg.error_message(), "DMA RX requires MISO enabled");
    }

    #[test]
    fn stream_without_request_rejected() {
        let cfg = SpiDmaConfig {
            rx_dma: Some(DmaExpertConfig::peripheral_to_memory(2, DR, BUF, 16)),
            ..SpiDmaConfig::tx_only(
                SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 8_000_000),
                DmaExpertConfig::memory_to_peripheral(3, BUF, DR, 16),
            )
        };
        assert_eq!(
            cfg.error_message(),
            "SPI DMA RX stream requires DMA RX enabled"
        );
    }

    #[test]
    fn tx_stream_must_feed_the_peripheral() {
        let cfg = SpiDmaConfig::tx_only(
            SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 8_000_000),
            DmaExpertConfig::peripheral_to_memory(3, DR, BUF, 16),
        );
        assert_eq!(cfg.error_message(), "SPI DMA TX must be memory-to-peripheral");

        let cfg = SpiDmaConfig::tx_only(
            SpiExpertConfig::standard(SPI1, MOSI, MISO, SCK, 8_000_000),
            DmaExpertConfig::memory_to_peripheral(3, BUF, DR, 16),
        );
        assert!(cfg.is_valid());
    }

    #[test]
    fn prepare_tx_programs_channel() {
        let cfg = SpiDmaConfig::tx_only(
            SpiExpertConfig::tx_only(SPI1, MOSI, SCK, 8_000_000),
            DmaExpertConfig::memory_to_peripheral(3, BUF, DR, 16),
        );
        let transfer = cfg.prepare_tx(MockDmaChannel::new()).unwrap();
        assert_eq!(transfer.config().transfer_count, 16);
        assert_eq!(
            cfg.prepare_rx(MockDmaChannel::new()).err(),
            Some(ErrorCode::NotSupported)
        );
    }
}
