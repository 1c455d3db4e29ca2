//! Fluent builder for SPI instances.
//!
//! Required: MOSI, SCK and a clock speed. MISO is optional; leaving it out
//! produces a transmit-only handle.

use super::{BitOrder, Spi, SpiExpertConfig, SpiHardware, SpiMode};
use crate::builder::{self, BuilderState};
use crate::error::{ErrorCode, HalResult};
use crate::types::{PeripheralId, PinId};
use crate::validate::Validate;

/// Required-field flags for [`SpiBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct SpiBuilderState {
    /// `mosi()` was called.
    pub has_mosi: bool,
    /// `sck()` was called.
    pub has_sck: bool,
    /// `clock_speed()` was called.
    pub has_clock_speed: bool,
}

impl BuilderState for SpiBuilderState {
    const REQUIRED: u8 = 3;

    fn satisfied(&self) -> u8 {
        builder::count(&[self.has_mosi, self.has_sck, self.has_clock_speed])
    }
}

/// Chained configuration of one SPI instance.
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct SpiBuilder {
    peripheral: PeripheralId,
    mosi: Option<PinId>,
    miso: Option<PinId>,
    sck: Option<PinId>,
    nss: Option<PinId>,
    clock_speed_hz: u32,
    mode: SpiMode,
    bit_order: BitOrder,
    data_size: u8,
    ti_mode: bool,
    dma_tx: bool,
    dma_rx: bool,
    state: SpiBuilderState,
}

impl SpiBuilder {
    /// Start configuring `peripheral`.
    pub fn new(peripheral: PeripheralId) -> Self {
        Self {
            peripheral,
            mosi: None,
            miso: None,
            sck: None,
            nss: None,
            clock_speed_hz: 0,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            data_size: 8,
            ti_mode: false,
            dma_tx: false,
            dma_rx: false,
            state: SpiBuilderState::default(),
        }
    }

    /// Controller-out pin.
    pub fn mosi(mut self, pin: PinId) -> Self {
        self.mosi = Some(pin);
        self.state.has_mosi = true;
        self
    }

    /// Controller-in pin (optional).
    pub fn miso(mut self, pin: PinId) -> Self {
        self.miso = Some(pin);
        self
    }

    /// Clock pin.
    pub fn sck(mut self, pin: PinId) -> Self {
        self.sck = Some(pin);
        self.state.has_sck = true;
        self
    }

    /// Hardware chip select.
    pub fn nss(mut self, pin: PinId) -> Self {
        self.nss = Some(pin);
        self
    }

    /// Clock frequency in Hz.
    pub fn clock_speed(mut self, hz: u32) -> Self {
        self.clock_speed_hz = hz;
        self.state.has_clock_speed = true;
        self
    }

    /// Clock polarity / phase.
    pub fn mode(mut self, mode: SpiMode) -> Self {
        self.mode = mode;
        self
    }

    /// Bit order.
    pub fn bit_order(mut self, order: BitOrder) -> Self {
        self.bit_order = order;
        self
    }

    /// Shorthand for `bit_order(BitOrder::LsbFirst)`.
    pub fn lsb_first(self) -> Self {
        self.bit_order(BitOrder::LsbFirst)
    }

    /// Bits per frame.
    pub fn data_size(mut self, bits: u8) -> Self {
        self.data_size = bits;
        self
    }

    /// TI frame format instead of Motorola.
    pub fn ti_mode(mut self, enabled: bool) -> Self {
        self.ti_mode = enabled;
        self
    }

    /// DMA request enables.
    pub fn dma(mut self, tx: bool, rx: bool) -> Self {
        self.dma_tx = tx;
        self.dma_rx = rx;
        self
    }

    /// Required-field flags.
    pub fn state(&self) -> &SpiBuilderState {
        &self.state
    }

    /// Assemble and validate the Expert configuration.
    pub fn build(&self) -> HalResult<SpiExpertConfig> {
        self.state.require_complete()?;
        let sck = self.sck.ok_or(ErrorCode::InvalidParameter)?;
        let config = SpiExpertConfig {
            peripheral: self.peripheral,
            mosi: self.mosi,
            miso: self.miso,
            sck,
            nss: self.nss,
            clock_speed_hz: self.clock_speed_hz,
            mode: self.mode,
            bit_order: self.bit_order,
            data_size: self.data_size,
            ti_mode: self.ti_mode,
            motorola_mode: !self.ti_mode,
            dma_tx: self.dma_tx,
            dma_rx: self.dma_rx,
        };
        config.ensure_valid()?;
        Ok(config)
    }

    /// Finalize into a handle.
    pub fn initialize<H: SpiHardware>(self, hw: H) -> HalResult<Spi<H>> {
        Spi::new(hw, self.build()?)
    }
}
