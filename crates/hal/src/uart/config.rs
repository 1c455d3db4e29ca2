//! Expert-level UART configuration.

use crate::types::{PeripheralId, PinId};
use crate::validate::{rule, RuleResult, Validate};

/// Parity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity
    #[default]
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Complete description of one UART instance.
///
/// # Rules (evaluated in order)
///
/// | # | Rule                                   |
/// |---|----------------------------------------|
/// | 1 | baud rate 300 – 10 000 000             |
/// | 2 | data bits 7, 8 or 9                    |
/// | 3 | stop bits 1 or 2                       |
/// | 4 | TX or RX enabled                       |
/// | 5 | TX enabled ⇒ TX pin present            |
/// | 6 | RX enabled ⇒ RX pin present            |
/// | 7 | flow control ⇒ TX and RX both enabled  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartExpertConfig {
    /// UART / USART instance.
    pub peripheral: PeripheralId,
    /// Transmit pin.
    pub tx_pin: Option<PinId>,
    /// Receive pin.
    pub rx_pin: Option<PinId>,
    /// Baud rate in bit/s.
    pub baud_rate: u32,
    /// Data bits per frame (7–9).
    pub data_bits: u8,
    /// Parity mode.
    pub parity: Parity,
    /// Stop bits (1–2).
    pub stop_bits: u8,
    /// Transmitter enabled.
    pub enable_tx: bool,
    /// Receiver enabled.
    pub enable_rx: bool,
    /// RTS/CTS hardware flow control.
    pub flow_control: bool,
}

impl UartExpertConfig {
    /// Slowest supported baud rate.
    pub const MIN_BAUD: u32 = 300;
    /// Fastest supported baud rate.
    pub const MAX_BAUD: u32 = 10_000_000;

    /// Full duplex 8N1, no flow control.
    pub const fn standard(peripheral: PeripheralId, tx: PinId, rx: PinId, baud_rate: u32) -> Self {
        Self {
            peripheral,
            tx_pin: Some(tx),
            rx_pin: Some(rx),
            baud_rate,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            enable_tx: true,
            enable_rx: true,
            flow_control: false,
        }
    }

    /// Transmit-only 8N1.
    pub const fn tx_only(peripheral: PeripheralId, tx: PinId, baud_rate: u32) -> Self {
        Self {
            rx_pin: None,
            enable_rx: false,
            ..Self::standard(peripheral, tx, tx, baud_rate)
        }
    }

    /// Receive-only 8N1.
    pub const fn rx_only(peripheral: PeripheralId, rx: PinId, baud_rate: u32) -> Self {
        Self {
            tx_pin: None,
            enable_tx: false,
            ..Self::standard(peripheral, rx, rx, baud_rate)
        }
    }

    /// Full duplex 8N1 with RTS/CTS.
    pub const fn with_flow_control(
        peripheral: PeripheralId,
        tx: PinId,
        rx: PinId,
        baud_rate: u32,
    ) -> Self {
        Self {
            flow_control: true,
            ..Self::standard(peripheral, tx, rx, baud_rate)
        }
    }

    /// Debug log output: 115200 8N1, transmit only.
    pub const fn logger(peripheral: PeripheralId, tx: PinId) -> Self {
        Self::tx_only(peripheral, tx, 115_200)
    }

    /// Bits on the wire per character (start + data + parity + stop).
    pub fn frame_bits(&self) -> u8 {
        let parity_bit = u8::from(self.parity != Parity::None);
        1u8.saturating_add(self.data_bits)
            .saturating_add(parity_bit)
            .saturating_add(self.stop_bits)
    }
}

impl Validate for UartExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            (Self::MIN_BAUD..=Self::MAX_BAUD).contains(&self.baud_rate),
            "Baud rate out of range (300-10000000)",
        )?;
        rule(
            (7..=9).contains(&self.data_bits),
            "Data bits must be 7, 8 or 9",
        )?;
        rule((1..=2).contains(&self.stop_bits), "Stop bits must be 1 or 2")?;
        rule(
            self.enable_tx || self.enable_rx,
            "At least one of TX or RX must be enabled",
        )?;
        rule(
            !self.enable_tx || self.tx_pin.is_some(),
            "TX enabled without TX pin",
        )?;
        rule(
            !self.enable_rx || self.rx_pin.is_some(),
            "RX enabled without RX pin",
        )?;
        rule(
            !self.flow_control || (self.enable_tx && self.enable_rx),
            "Flow control requires both TX and RX enabled",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    const TX: PinId = PinId::new(Port::A, 2);
    const RX: PinId = PinId::new(Port::A, 3);
    const USART2: PeripheralId = PeripheralId::new(2);

    #[test]
    fn flow_control_needs_both_directions() {
        let cfg = UartExpertConfig {
            flow_control: true,
            ..UartExpertConfig::tx_only(USART2, TX, 9_600)
        };
        assert!(!cfg.is_valid());
        assert_eq!(
            cfg.error_message(),
            "Flow control requires both TX and RX enabled"
        );
    }

    #[test]
    fn baud_rate_checked_first() {
        let cfg = UartExpertConfig {
            baud_rate: 0,
            data_bits: 5,
            stop_bits: 3,
            ..UartExpertConfig::standard(USART2, TX, RX, 9_600)
        };
        assert_eq!(cfg.error_message(), "Baud rate out of range (300-10000000)");
    }

    #[test]
    fn data_bits_then_stop_bits() {
        let base = UartExpertConfig::standard(USART2, TX, RX, 9_600);
        let cfg = UartExpertConfig {
            data_bits: 6,
            stop_bits: 0,
            ..base
        };
        assert_eq!(cfg.error_message(), "Data bits must be 7, 8 or 9");
        let cfg = UartExpertConfig {
            stop_bits: 0,
            ..base
        };
        assert_eq!(cfg.error_message(), "Stop bits must be 1 or 2");
    }

    #[test]
    fn disabled_both_directions_rejected() {
        let cfg = UartExpertConfig {
            enable_tx: false,
            enable_rx: false,
            ..UartExpertConfig::standard(USART2, TX, RX, 9_600)
        };
        assert_eq!(cfg.error_message(), "At least one of TX or RX must be enabled");
    }

    #[test]
    fn enabled_direction_needs_pin() {
        let cfg = UartExpertConfig {
            rx_pin: None,
            ..UartExpertConfig::standard(USART2, TX, RX, 9_600)
        };
        assert_eq!(cfg.error_message(), "RX enabled without RX pin");
    }

    #[test]
    fn baud_rate_bounds_are_inclusive() {
        let base = UartExpertConfig::standard(USART2, TX, RX, 9_600);
        assert!(UartExpertConfig { baud_rate: 300, ..base }.is_valid());
        assert!(UartExpertConfig { baud_rate: 10_000_000, ..base }.is_valid());
        assert!(!UartExpertConfig { baud_rate: 299, ..base }.is_valid());
        assert!(!UartExpertConfig { baud_rate: 10_000_001, ..base }.is_valid());
    }

    #[test]
    fn frame_bits_for_8n1_is_ten() {
        let cfg = UartExpertConfig::standard(USART2, TX, RX, 9_600);
        assert_eq!(cfg.frame_bits(), 10);
        let cfg = UartExpertConfig {
            parity: Parity::Even,
            stop_bits: 2,
            ..cfg
        };
        assert_eq!(cfg.frame_bits(), 12);
    }
}
