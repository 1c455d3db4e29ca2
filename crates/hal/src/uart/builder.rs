//! Fluent builder for UART instances.
//!
//! Required: a TX pin or an RX pin (either satisfies the group), and a baud
//! rate. The frame format defaults to 8N1 without flow control. Only the
//! directions whose pins were supplied are enabled.

use super::{Parity, Uart, UartExpertConfig, UartHardware};
use crate::builder::{self, BuilderState};
use crate::error::HalResult;
use crate::types::{PeripheralId, PinId};
use crate::validate::Validate;

/// Character framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataFormat {
    /// Data bits (7–9).
    pub data_bits: u8,
    /// Parity mode.
    pub parity: Parity,
    /// Stop bits (1–2).
    pub stop_bits: u8,
}

impl DataFormat {
    /// 8 data bits, no parity, 1 stop bit.
    pub const EIGHT_N_ONE: Self = Self {
        data_bits: 8,
        parity: Parity::None,
        stop_bits: 1,
    };

    /// 7 data bits, even parity, 1 stop bit.
    pub const SEVEN_E_ONE: Self = Self {
        data_bits: 7,
        parity: Parity::Even,
        stop_bits: 1,
    };
}

impl Default for DataFormat {
    fn default() -> Self {
        Self::EIGHT_N_ONE
    }
}

/// Required-field flags for [`UartBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct UartBuilderState {
    /// `tx_pin()` was called.
    pub has_tx_pin: bool,
    /// `rx_pin()` was called.
    pub has_rx_pin: bool,
    /// `baud_rate()` was called.
    pub has_baud_rate: bool,
}

impl BuilderState for UartBuilderState {
    // "TX or RX pin" counts as one requirement.
    const REQUIRED: u8 = 2;

    fn satisfied(&self) -> u8 {
        builder::count(&[self.has_tx_pin || self.has_rx_pin, self.has_baud_rate])
    }
}

/// Chained configuration of one UART instance.
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct UartBuilder {
    peripheral: PeripheralId,
    tx_pin: Option<PinId>,
    rx_pin: Option<PinId>,
    baud_rate: u32,
    format: DataFormat,
    flow_control: bool,
    state: UartBuilderState,
}

impl UartBuilder {
    /// Start configuring `peripheral`.
    pub fn new(peripheral: PeripheralId) -> Self {
        Self {
            peripheral,
            tx_pin: None,
            rx_pin: None,
            baud_rate: 0,
            format: DataFormat::EIGHT_N_ONE,
            flow_control: false,
            state: UartBuilderState::default(),
        }
    }

    /// Transmit pin; enables the transmitter.
    pub fn tx_pin(mut self, pin: PinId) -> Self {
        self.tx_pin = Some(pin);
        self.state.has_tx_pin = true;
        self
    }

    /// Receive pin; enables the receiver.
    pub fn rx_pin(mut self, pin: PinId) -> Self {
        self.rx_pin = Some(pin);
        self.state.has_rx_pin = true;
        self
    }

    /// Both pins at once.
    pub fn pins(self, tx: PinId, rx: PinId) -> Self {
        self.tx_pin(tx).rx_pin(rx)
    }

    /// Baud rate in bit/s.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self.state.has_baud_rate = true;
        self
    }

    /// Whole character format.
    pub fn data_format(mut self, format: DataFormat) -> Self {
        self.format = format;
        self
    }

    /// Data bits only.
    pub fn data_bits(mut self, bits: u8) -> Self {
        self.format.data_bits = bits;
        self
    }

    /// Parity only.
    pub fn parity(mut self, parity: Parity) -> Self {
        self.format.parity = parity;
        self
    }

    /// Stop bits only.
    pub fn stop_bits(mut self, bits: u8) -> Self {
        self.format.stop_bits = bits;
        self
    }

    /// RTS/CTS hardware flow control.
    pub fn flow_control(mut self, enabled: bool) -> Self {
        self.flow_control = enabled;
        self
    }

    /// Required-field flags.
    pub fn state(&self) -> &UartBuilderState {
        &self.state
    }

    /// Assemble and validate the Expert configuration.
    pub fn build(&self) -> HalResult<UartExpertConfig> {
        self.state.require_complete()?;
        let config = UartExpertConfig {
            peripheral: self.peripheral,
            tx_pin: self.tx_pin,
            rx_pin: self.rx_pin,
            baud_rate: self.baud_rate,
            data_bits: self.format.data_bits,
            parity: self.format.parity,
            stop_bits: self.format.stop_bits,
            enable_tx: self.tx_pin.is_some(),
            enable_rx: self.rx_pin.is_some(),
            flow_control: self.flow_control,
        };
        config.ensure_valid()?;
        Ok(config)
    }

    /// Finalize into a handle.
    pub fn initialize<H: UartHardware>(self, hw: H) -> HalResult<Uart<H>> {
        Uart::new(hw, self.build()?)
    }
}
