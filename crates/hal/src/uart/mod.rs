//! UART capability layer
//!
//! Provides the stream-style capability contract and the UART handle.
//! A handle with TX (or RX) disabled keeps the full method set; the
//! disabled side answers [`ErrorCode::NotSupported`].

pub mod builder;
pub mod config;
pub mod dma;
pub mod simple;

pub use builder::{DataFormat, UartBuilder, UartBuilderState};
pub use config::{Parity, UartExpertConfig};
pub use dma::UartDmaConfig;

use crate::error::{ErrorCode, HalResult};
use crate::validate::Validate;

/// Stream-family capability contract.
pub trait UartPeripheral {
    /// Send one byte.
    fn send(&mut self, byte: u8) -> HalResult<()>;

    /// Receive one byte (blocks in the policy until one arrives or it times out).
    fn receive(&mut self) -> HalResult<u8>;

    /// Queue a buffer for transmission; returns the number of bytes accepted.
    fn send_buffer(&mut self, data: &[u8]) -> HalResult<usize>;

    /// Copy already received bytes into `buffer`; returns the count copied.
    fn receive_buffer(&mut self, buffer: &mut [u8]) -> HalResult<usize>;

    /// Wait until every queued byte has left the shift register.
    fn flush(&mut self) -> HalResult<()>;

    /// Bytes received and not yet read.
    fn available(&self) -> usize;

    /// Change the baud rate.
    fn set_baud_rate(&mut self, baud_rate: u32) -> HalResult<()>;

    /// Send a string; a short write is reported as [`ErrorCode::Incomplete`].
    fn write_str(&mut self, text: &str) -> HalResult<()> {
        let expected = text.len();
        let sent = self.send_buffer(text.as_bytes())?;
        if sent == expected {
            Ok(())
        } else {
            Err(ErrorCode::Incomplete)
        }
    }

    /// Send a string followed by CR LF.
    fn write_line(&mut self, text: &str) -> HalResult<()> {
        self.write_str(text)?;
        self.write_str("\r\n")
    }

    /// Fill `buffer` completely, one byte at a time.
    fn read_exact(&mut self, buffer: &mut [u8]) -> HalResult<()> {
        for slot in buffer.iter_mut() {
            *slot = self.receive()?;
        }
        Ok(())
    }

    /// True when at least one byte is waiting.
    fn is_readable(&self) -> bool {
        self.available() > 0
    }
}

/// Hardware policy for one UART instance.
pub trait UartHardware {
    /// Apply a complete, already validated configuration.
    fn configure(&mut self, config: &UartExpertConfig) -> HalResult<()>;

    /// Transmit one byte.
    fn write_byte(&mut self, byte: u8) -> HalResult<()>;

    /// Receive one byte.
    fn read_byte(&mut self) -> HalResult<u8>;

    /// Transmit a buffer; returns bytes accepted.
    fn write(&mut self, data: &[u8]) -> HalResult<usize>;

    /// Drain received bytes into `buffer`; returns bytes copied.
    fn read(&mut self, buffer: &mut [u8]) -> HalResult<usize>;

    /// Wait for transmission complete.
    fn flush(&mut self) -> HalResult<()>;

    /// Received bytes pending.
    fn rx_available(&self) -> usize;

    /// Reprogram the baud rate generator.
    fn set_baud_rate(&mut self, baud_rate: u32) -> HalResult<()>;
}

/// UART handle produced by every API level.
pub struct Uart<H> {
    hw: H,
    config: UartExpertConfig,
}

impl<H: UartHardware> Uart<H> {
    /// Expert-level constructor: validate, then apply to hardware.
    pub fn new(mut hw: H, config: UartExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        hw.configure(&config)?;
        hal_debug!(
            "uart{} configured at {} baud",
            config.peripheral.index(),
            config.baud_rate
        );
        Ok(Self { hw, config })
    }

    /// Resolved configuration.
    pub fn config(&self) -> &UartExpertConfig {
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

    fn require_tx(&self) -> HalResult<()> {
        if self.config.enable_tx {
            Ok(())
        } else {
            Err(ErrorCode::NotSupported)
        }
    }

    fn require_rx(&self) -> HalResult<()> {
        if self.config.enable_rx {
            Ok(())
        } else {
            Err(ErrorCode::NotSupported)
        }
    }
}

impl<H: UartHardware> UartPeripheral for Uart<H> {
    fn send(&mut self, byte: u8) -> HalResult<()> {
        self.require_tx()?;
        self.hw.write_byte(byte)
    }

    fn receive(&mut self) -> HalResult<u8> {
        self.require_rx()?;
        self.hw.read_byte()
    }

    fn send_buffer(&mut self, data: &[u8]) -> HalResult<usize> {
        self.require_tx()?;
        if data.is_empty() {
            return Ok(0);
        }
        self.hw.write(data)
    }

    fn receive_buffer(&mut self, buffer: &mut [u8]) -> HalResult<usize> {
        self.require_rx()?;
        if buffer.is_empty() {
            return Ok(0);
        }
        self.hw.read(buffer)
    }

    fn flush(&mut self) -> HalResult<()> {
        self.require_tx()?;
        self.hw.flush()
    }

    fn available(&self) -> usize {
        if self.config.enable_rx {
            self.hw.rx_available()
        } else {
            0
        }
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> HalResult<()> {
        let candidate = UartExpertConfig {
            baud_rate,
            ..self.config
        };
        candidate.ensure_valid()?;
        self.hw.set_baud_rate(baud_rate)?;
        self.config = candidate;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockUart;
    use crate::types::{PeripheralId, PinId, Port};

    const TX: PinId = PinId::new(Port::A, 9);
    const RX: PinId = PinId::new(Port::A, 10);

    fn uart() -> Uart<MockUart> {
        Uart::new(
            MockUart::new(),
            UartExpertConfig::standard(PeripheralId::new(1), TX, RX, 115_200),
        )
        .unwrap()
    }

    #[test]
    fn write_str_sends_all_bytes() {
        let mut u = uart();
        u.write_str("hello").unwrap();
        assert_eq!(u.hardware().sent(), b"hello");
    }

    #[test]
    fn write_line_appends_crlf() {
        let mut u = uart();
        u.write_line("ok").unwrap();
        assert_eq!(u.hardware().sent(), b"ok\r\n");
    }

    #[test]
    fn short_write_reports_incomplete() {
        let mut u = uart();
        u.hardware_mut().limit_tx_accept(3);
        assert_eq!(u.write_str("hello"), Err(ErrorCode::Incomplete));
    }

    #[test]
    fn read_exact_collects_queued_bytes() {
        let mut u = uart();
        u.hardware_mut().queue_rx(b"abc");
        assert!(u.is_readable());
        let mut buf = [0u8; 3];
        u.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");
        assert!(!u.is_readable());
    }

    #[test]
    fn read_exact_propagates_timeout() {
        let mut u = uart();
        u.hardware_mut().queue_rx(b"a");
        let mut buf = [0u8; 2];
        assert_eq!(u.read_exact(&mut buf), Err(ErrorCode::Timeout));
    }

    #[test]
    fn tx_only_handle_rejects_receive() {
        let mut u = Uart::new(
            MockUart::new(),
            UartExpertConfig::tx_only(PeripheralId::new(2), TX, 9_600),
        )
        .unwrap();
        assert_eq!(u.receive(), Err(ErrorCode::NotSupported));
        assert_eq!(u.available(), 0);
        u.send(b'x').unwrap();
    }

    #[test]
    fn baud_rate_change_is_validated() {
        let mut u = uart();
        assert_eq!(u.set_baud_rate(100), Err(ErrorCode::InvalidParameter));
        assert_eq!(u.config().baud_rate, 115_200);
        u.set_baud_rate(921_600).unwrap();
        assert_eq!(u.hardware().baud_rate(), 921_600);
    }
}
