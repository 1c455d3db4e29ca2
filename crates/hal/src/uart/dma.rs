//! UART with DMA-backed streams.

use super::UartExpertConfig;
use crate::dma::{DmaDirection, DmaExpertConfig, DmaHardware, DmaTransfer};
use crate::error::{ErrorCode, HalResult};
use crate::validate::{rule, RuleResult, Validate};

/// UART configuration plus optional TX/RX DMA streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartDmaConfig {
    /// Underlying UART configuration.
    pub uart: UartExpertConfig,
    /// Transmit stream (memory → data register).
    pub tx_dma: Option<DmaExpertConfig>,
    /// Receive stream (data register → memory).
    pub rx_dma: Option<DmaExpertConfig>,
}

impl UartDmaConfig {
    /// DMA on the transmit side only.
    pub const fn with_tx(uart: UartExpertConfig, tx_dma: DmaExpertConfig) -> Self {
        Self {
            uart,
            tx_dma: Some(tx_dma),
            rx_dma: None,
        }
    }

    /// DMA on the receive side only.
    pub const fn with_rx(uart: UartExpertConfig, rx_dma: DmaExpertConfig) -> Self {
        Self {
            uart,
            tx_dma: None,
            rx_dma: Some(rx_dma),
        }
    }

    /// DMA on both sides.
    pub const fn full_duplex(
        uart: UartExpertConfig,
        tx_dma: DmaExpertConfig,
        rx_dma: DmaExpertConfig,
    ) -> Self {
        Self {
            uart,
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

impl Validate for UartDmaConfig {
    fn check(&self) -> RuleResult {
        self.uart.check()?;
        if let Some(tx) = &self.tx_dma {
            tx.check()?;
        }
        if let Some(rx) = &self.rx_dma {
            rx.check()?;
        }
        rule(
            self.tx_dma.is_none() || self.uart.enable_tx,
            "UART DMA TX requires TX enabled",
        )?;
        rule(
            self.rx_dma.is_none() || self.uart.enable_rx,
            "UART DMA RX requires RX enabled",
        )?;
        rule(
            !matches!(&self.tx_dma, Some(d) if d.direction != DmaDirection::MemoryToPeripheral),
            "UART DMA TX must be memory-to-peripheral",
        )?;
        rule(
            !matches!(&self.rx_dma, Some(d) if d.direction != DmaDirection::PeripheralToMemory),
            "UART DMA RX must be peripheral-to-memory",
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

    const USART1: PeripheralId = PeripheralId::new(1);
    const TX: PinId = PinId::new(Port::A, 9);
    const RX: PinId = PinId::new(Port::A, 10);
    const DR: usize = 0x4001_1028;
    const BUF: usize = 0x2000_0400;

    fn tx_stream(channel: u8) -> DmaExpertConfig {
        DmaExpertConfig::memory_to_peripheral(channel, BUF, DR, 32)
    }

    fn rx_stream(channel: u8) -> DmaExpertConfig {
        DmaExpertConfig::peripheral_to_memory(channel, DR, BUF, 32)
    }

    #[test]
    fn full_duplex_preset_is_valid() {
        let cfg = UartDmaConfig::full_duplex(
            UartExpertConfig::standard(USART1, TX, RX, 115_200),
            tx_stream(7),
            rx_stream(2),
        );
        assert!(cfg.is_valid());
    }

    #[test]
    fn uart_rules_run_before_stream_rules() {
        let uart = UartExpertConfig {
            baud_rate: 1,
            ..UartExpertConfig::standard(USART1, TX, RX, 115_200)
        };
        let cfg = UartDmaConfig::with_tx(uart, tx_stream(40));
        assert_eq!(cfg.error_message(), "Baud rate out of range (300-10000000)");
    }

    #[test]
    fn tx_stream_needs_tx_enabled() {
        let cfg = UartDmaConfig::with_tx(UartExpertConfig::rx_only(USART1, RX, 9_600), tx_stream(7));
        assert_eq!(cfg.error_message(), "UART DMA TX requires TX enabled");
    }

    #[test]
    fn stream_direction_checked() {
        let cfg = UartDmaConfig::with_rx(
            UartExpertConfig::standard(USART1, TX, RX, 9_600),
            tx_stream(2),
        );
        assert_eq!(cfg.error_message(), "UART DMA RX must be peripheral-to-memory");
    }

    #[test]
    fn shared_channel_rejected() {
        let cfg = UartDmaConfig::full_duplex(
            UartExpertConfig::standard(USART1, TX, RX, 9_600),
            tx_stream(4),
            rx_stream(4),
        );
        assert_eq!(cfg.error_message(), "TX and RX DMA channels must differ");
    }

    #[test]
    fn prepare_missing_stream_not_supported() {
        let cfg = UartDmaConfig::with_tx(
            UartExpertConfig::standard(USART1, TX, RX, 9_600),
            tx_stream(7),
        );
        assert!(cfg.prepare_tx(MockDmaChannel::new()).is_ok());
        assert_eq!(
            cfg.prepare_rx(MockDmaChannel::new()).err(),
            Some(ErrorCode::NotSupported)
        );
    }
}
