//! SPI capability layer
//!
//! A handle built without MISO is transmit-only: `receive` and `transfer`
//! answer [`ErrorCode::NotSupported`] while `transmit` keeps working.

pub mod builder;
pub mod config;
pub mod dma;
pub mod simple;

pub use builder::{SpiBuilder, SpiBuilderState};
pub use config::{BitOrder, FrameFormat, SpiConfig, SpiExpertConfig, SpiMode};
pub use dma::SpiDmaConfig;

use crate::error::{ErrorCode, HalResult};
use crate::validate::Validate;

/// Scratch size used by [`SpiPeripheral::transfer_in_place`].
pub const IN_PLACE_CHUNK: usize = 32;

/// Bus-transfer family capability contract.
pub trait SpiPeripheral {
    /// Full duplex: clock out `tx` while capturing into `rx` (equal lengths).
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> HalResult<()>;

    /// Write data (half duplex)
    fn transmit(&mut self, tx: &[u8]) -> HalResult<()>;

    /// Read data (half duplex)
    fn receive(&mut self, rx: &mut [u8]) -> HalResult<()>;

    /// Apply new runtime bus parameters.
    fn configure(&mut self, config: SpiConfig) -> HalResult<()>;

    /// Current runtime bus parameters.
    fn config(&self) -> SpiConfig;

    /// A transfer is still shifting.
    fn is_busy(&self) -> bool;

    /// Exchange one byte.
    fn transfer_byte(&mut self, byte: u8) -> HalResult<u8> {
        let mut rx = [0u8; 1];
        self.transfer(&[byte], &mut rx)?;
        let [received] = rx;
        Ok(received)
    }

    /// Send one byte.
    fn transmit_byte(&mut self, byte: u8) -> HalResult<()> {
        self.transmit(&[byte])
    }

    /// Receive one byte.
    fn receive_byte(&mut self) -> HalResult<u8> {
        let mut rx = [0u8; 1];
        self.receive(&mut rx)?;
        let [received] = rx;
        Ok(received)
    }

    /// Change only the clock frequency.
    fn set_speed(&mut self, clock_speed_hz: u32) -> HalResult<()> {
        let config = SpiConfig {
            clock_speed_hz,
            ..self.config()
        };
        self.configure(config)
    }

    /// Ready for a new transfer.
    fn is_ready(&self) -> bool {
        !self.is_busy()
    }

    /// Full duplex over a single buffer: each chunk is copied to scratch,
    /// transferred, and the received bytes overwrite the chunk.
    fn transfer_in_place(&mut self, buffer: &mut [u8]) -> HalResult<()> {
        let mut scratch = [0u8; IN_PLACE_CHUNK];
        for chunk in buffer.chunks_mut(IN_PLACE_CHUNK) {
            let tx = scratch
                .get_mut(..chunk.len())
                .ok_or(ErrorCode::InvalidParameter)?;
            tx.copy_from_slice(chunk);
            self.transfer(tx, chunk)?;
        }
        Ok(())
    }
}

/// Hardware policy for one SPI instance.
pub trait SpiHardware {
    /// Slowest clock this instance can generate.
    const MIN_CLOCK_HZ: u32 = SpiExpertConfig::MIN_CLOCK_HZ;
    /// Fastest clock this instance can generate.
    const MAX_CLOCK_HZ: u32 = SpiExpertConfig::MAX_CLOCK_HZ;

    /// Apply a complete, already validated configuration.
    fn configure(&mut self, config: &SpiExpertConfig) -> HalResult<()>;

    /// Reprogram clock / mode / framing.
    fn reconfigure(&mut self, config: &SpiConfig) -> HalResult<()>;

    /// Full duplex exchange of equal-length buffers.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> HalResult<()>;

    /// Transmit, discarding received data.
    fn write(&mut self, tx: &[u8]) -> HalResult<()>;

    /// Receive, clocking out filler.
    fn read(&mut self, rx: &mut [u8]) -> HalResult<()>;

    /// Shift register busy.
    fn is_busy(&self) -> bool;
}

/// SPI handle produced by every API level.
pub struct Spi<H> {
    hw: H,
    config: SpiExpertConfig,
}

impl<H: SpiHardware> Spi<H> {
    /// Expert-level constructor: validate, then apply to hardware.
    pub fn new(mut hw: H, config: SpiExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        Self::check_speed(config.clock_speed_hz)?;
        hw.configure(&config)?;
        hal_debug!(
            "spi{} configured at {} Hz",
            config.peripheral.index(),
            config.clock_speed_hz
        );
        Ok(Self { hw, config })
    }

    /// Resolved configuration.
    pub fn expert_config(&self) -> &SpiExpertConfig {
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

    fn check_speed(clock_speed_hz: u32) -> HalResult<()> {
        if (H::MIN_CLOCK_HZ..=H::MAX_CLOCK_HZ).contains(&clock_speed_hz) {
            Ok(())
        } else {
            hal_warn!(
                "spi clock {} Hz outside {}..={} Hz",
                clock_speed_hz,
                H::MIN_CLOCK_HZ,
                H::MAX_CLOCK_HZ
            );
            Err(ErrorCode::InvalidParameter)
        }
    }

    fn require_mosi(&self) -> HalResult<()> {
        if self.config.mosi.is_some() {
            Ok(())
        } else {
            Err(ErrorCode::NotSupported)
        }
    }

    fn require_miso(&self) -> HalResult<()> {
        if self.config.miso.is_some() {
            Ok(())
        } else {
            Err(ErrorCode::NotSupported)
        }
    }
}

impl<H: SpiHardware> SpiPeripheral for Spi<H> {
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> HalResult<()> {
        self.require_mosi()?;
        self.require_miso()?;
        if tx.len() != rx.len() {
            return Err(ErrorCode::InvalidParameter);
        }
        if tx.is_empty() {
            return Ok(());
        }
        self.hw.transfer(tx, rx)
    }

    fn transmit(&mut self, tx: &[u8]) -> HalResult<()> {
        self.require_mosi()?;
        if tx.is_empty() {
            return Ok(());
        }
        self.hw.write(tx)
    }

    fn receive(&mut self, rx: &mut [u8]) -> HalResult<()> {
        self.require_miso()?;
        if rx.is_empty() {
            return Ok(());
        }
        self.hw.read(rx)
    }

    fn configure(&mut self, config: SpiConfig) -> HalResult<()> {
        let candidate = self.config.with_bus_config(config);
        candidate.ensure_valid()?;
        Self::check_speed(config.clock_speed_hz)?;
        self.hw.reconfigure(&config)?;
        self.config = candidate;
        Ok(())
    }

    fn config(&self) -> SpiConfig {
        self.config.bus_config()
    }

    fn is_busy(&self) -> bool {
        self.hw.is_busy()
    }
}
