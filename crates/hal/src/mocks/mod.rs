//! Mock hardware policies for testing
//!
//! Every hardware policy trait in this crate has an in-memory stand-in
//! here. The mocks are `no_std` (fixed-capacity `heapless` storage) and
//! record what the handle asked for so tests can assert on it.
//!
//! - [`MockGpio`]: per-pin level / direction / drive record
//! - [`MockUart`]: captures TX bytes, serves queued RX bytes
//! - [`MockSpi`]: loopback (RX mirrors TX)
//! - [`MockI2c`]: register-file devices at configurable addresses

mod system;

pub use system::{
    MockAdc, MockClock, MockDmaChannel, MockInterrupt, MockPwm, MockSysTick, MockTimer,
    MockWatchdog,
};

use crate::error::{ErrorCode, HalResult};
use crate::gpio::{Direction, Drive, GpioExpertConfig, GpioHardware, PinState, Pull};
use crate::i2c::{I2cConfig, I2cExpertConfig, I2cHardware, I2cSpeed};
use crate::spi::{SpiConfig, SpiExpertConfig, SpiHardware};
use crate::types::PinId;
use crate::uart::{UartExpertConfig, UartHardware};

const MAX_PINS: usize = 16;
const BUFFER: usize = 256;

// ─── GPIO ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct PinRecord {
    level: PinState,
    direction: Option<Direction>,
    pull: Option<Pull>,
    drive: Option<Drive>,
}

/// Mock GPIO port
///
/// Tracks up to 16 pins. Reads return the last level written, or the level
/// injected with [`set_input_level`](Self::set_input_level).
#[derive(Debug, Default)]
pub struct MockGpio {
    pins: heapless::LinearMap<PinId, PinRecord, MAX_PINS>,
    writes: usize,
}

impl MockGpio {
    /// Create new mock GPIO port
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive an input level from the "outside world".
    pub fn set_input_level(&mut self, pin: PinId, level: PinState) {
        if let Some(record) = self.record(pin) {
            record.level = level;
        }
    }

    /// Current level of `pin` (low if never touched).
    pub fn level(&self, pin: PinId) -> PinState {
        self.pins.get(&pin).map(|r| r.level).unwrap_or_default()
    }

    /// Last direction applied to `pin`.
    pub fn direction(&self, pin: PinId) -> Option<Direction> {
        self.pins.get(&pin).and_then(|r| r.direction)
    }

    /// Last pull applied to `pin`.
    pub fn pull(&self, pin: PinId) -> Option<Pull> {
        self.pins.get(&pin).and_then(|r| r.pull)
    }

    /// Drive mode set through [`GpioHardware::set_drive`], if any.
    pub fn drive(&self, pin: PinId) -> Option<Drive> {
        self.pins.get(&pin).and_then(|r| r.drive)
    }

    /// Number of `write` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn record(&mut self, pin: PinId) -> Option<&mut PinRecord> {
        if !self.pins.contains_key(&pin) {
            let _ = self.pins.insert(pin, PinRecord::default());
        }
        self.pins.get_mut(&pin)
    }
}

impl GpioHardware for MockGpio {
    fn configure(&mut self, config: &GpioExpertConfig) -> HalResult<()> {
        let record = self.record(config.pin).ok_or(ErrorCode::HardwareFault)?;
        record.direction = Some(config.direction);
        record.pull = Some(config.pull);
        if config.direction == Direction::Output {
            record.level = config.initial_state;
        }
        Ok(())
    }

    fn write(&mut self, pin: PinId, state: PinState) -> HalResult<()> {
        self.writes = self.writes.saturating_add(1);
        let record = self.record(pin).ok_or(ErrorCode::HardwareFault)?;
        record.level = state;
        Ok(())
    }

    fn read(&self, pin: PinId) -> HalResult<PinState> {
        Ok(self.level(pin))
    }

    fn set_direction(&mut self, pin: PinId, direction: Direction) -> HalResult<()> {
        let record = self.record(pin).ok_or(ErrorCode::HardwareFault)?;
        record.direction = Some(direction);
        Ok(())
    }

    fn set_pull(&mut self, pin: PinId, pull: Pull) -> HalResult<()> {
        let record = self.record(pin).ok_or(ErrorCode::HardwareFault)?;
        record.pull = Some(pull);
        Ok(())
    }

    fn set_drive(&mut self, pin: PinId, drive: Drive) -> HalResult<()> {
        let record = self.record(pin).ok_or(ErrorCode::HardwareFault)?;
        record.drive = Some(drive);
        Ok(())
    }
}

// ─── UART ────────────────────────────────────────────────────────────────────

/// Mock UART
pub struct MockUart {
    tx: heapless::Vec<u8, BUFFER>,
    rx: heapless::Deque<u8, BUFFER>,
    accept_limit: Option<usize>,
    baud_rate: u32,
    flushes: usize,
}

impl MockUart {
    /// Create new mock UART
    pub fn new() -> Self {
        Self {
            tx: heapless::Vec::new(),
            rx: heapless::Deque::new(),
            accept_limit: None,
            baud_rate: 0,
            flushes: 0,
        }
    }

    /// Bytes transmitted so far.
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    /// Make every buffered write accept at most `limit` bytes.
    pub fn limit_tx_accept(&mut self, limit: usize) {
        self.accept_limit = Some(limit);
    }

    /// Queue bytes for the receiver.
    pub fn queue_rx(&mut self, data: &[u8]) {
        for byte in data {
            let _ = self.rx.push_back(*byte);
        }
    }

    /// Baud rate last programmed.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Number of flush calls.
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl Default for MockUart {
    fn default() -> Self {
        Self::new()
    }
}

impl UartHardware for MockUart {
    fn configure(&mut self, config: &UartExpertConfig) -> HalResult<()> {
        self.baud_rate = config.baud_rate;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> HalResult<()> {
        self.tx.push(byte).map_err(|_| ErrorCode::Busy)
    }

    fn read_byte(&mut self) -> HalResult<u8> {
        self.rx.pop_front().ok_or(ErrorCode::Timeout)
    }

    fn write(&mut self, data: &[u8]) -> HalResult<usize> {
        let limit = self.accept_limit.unwrap_or(usize::MAX);
        let mut accepted = 0usize;
        for byte in data.iter().take(limit) {
            if self.tx.push(*byte).is_err() {
                break;
            }
            accepted = accepted.saturating_add(1);
        }
        Ok(accepted)
    }

    fn read(&mut self, buffer: &mut [u8]) -> HalResult<usize> {
        let mut count = 0usize;
        for slot in buffer.iter_mut() {
            let Some(byte) = self.rx.pop_front() else { break };
            *slot = byte;
            count = count.saturating_add(1);
        }
        Ok(count)
    }

    fn flush(&mut self) -> HalResult<()> {
        self.flushes = self.flushes.saturating_add(1);
        Ok(())
    }

    fn rx_available(&self) -> usize {
        self.rx.len()
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> HalResult<()> {
        self.baud_rate = baud_rate;
        Ok(())
    }
}

// ─── SPI ─────────────────────────────────────────────────────────────────────

/// Mock SPI bus
///
/// Loopback: every full-duplex transfer receives exactly what it sent.
/// Half-duplex reads return [`MockSpi::FILL`].
pub struct MockSpi {
    written: heapless::Vec<u8, BUFFER>,
    transfers: usize,
    busy: bool,
    bus: SpiConfig,
}

impl MockSpi {
    /// Byte returned by half-duplex reads (idle MISO line).
    pub const FILL: u8 = 0xFF;

    /// Create new mock SPI bus
    pub fn new() -> Self {
        Self {
            written: heapless::Vec::new(),
            transfers: 0,
            busy: false,
            bus: SpiConfig::default(),
        }
    }

    /// Every byte clocked out, in order.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Number of full-duplex transfers.
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    /// Clock last programmed.
    pub fn clock_speed_hz(&self) -> u32 {
        self.bus.clock_speed_hz
    }

    /// Bus parameters last programmed.
    pub fn bus(&self) -> SpiConfig {
        self.bus
    }

    /// Force the busy flag.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn record(&mut self, tx: &[u8]) {
        for byte in tx {
            let _ = self.written.push(*byte);
        }
    }
}

impl Default for MockSpi {
    fn default() -> Self {
        Self::new()
    }
}

impl SpiHardware for MockSpi {
    fn configure(&mut self, config: &SpiExpertConfig) -> HalResult<()> {
        self.bus = config.bus_config();
        Ok(())
    }

    fn reconfigure(&mut self, config: &SpiConfig) -> HalResult<()> {
        self.bus = *config;
        Ok(())
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> HalResult<()> {
        if tx.len() != rx.len() {
            return Err(ErrorCode::InvalidParameter);
        }
        rx.copy_from_slice(tx);
        self.record(tx);
        self.transfers = self.transfers.saturating_add(1);
        Ok(())
    }

    fn write(&mut self, tx: &[u8]) -> HalResult<()> {
        self.record(tx);
        Ok(())
    }

    fn read(&mut self, rx: &mut [u8]) -> HalResult<()> {
        rx.fill(Self::FILL);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}

// ─── I2C ─────────────────────────────────────────────────────────────────────

/// Mock I2C bus
///
/// Devices share one 256-byte register file. A write's first byte sets the
/// register pointer; further bytes are stored with auto-increment, and reads
/// continue from the pointer. Absent addresses answer
/// [`ErrorCode::AddressNack`].
pub struct MockI2c {
    devices: heapless::Vec<u16, 8>,
    registers: [u8; 256],
    pointer: u8,
    speed: I2cSpeed,
    fail_next: Option<ErrorCode>,
    address_phases: usize,
}

impl MockI2c {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            devices: heapless::Vec::new(),
            registers: [0; 256],
            pointer: 0,
            speed: I2cSpeed::Standard,
            fail_next: None,
            address_phases: 0,
        }
    }

    /// Builder-style [`add_device`](Self::add_device).
    #[must_use]
    pub fn with_device(mut self, address: u16) -> Self {
        self.add_device(address);
        self
    }

    /// Make `address` acknowledge.
    pub fn add_device(&mut self, address: u16) {
        if !self.devices.contains(&address) {
            let _ = self.devices.push(address);
        }
    }

    /// Preload a register.
    pub fn set_register(&mut self, register: u8, value: u8) {
        if let Some(slot) = self.registers.get_mut(usize::from(register)) {
            *slot = value;
        }
    }

    /// Register contents.
    pub fn register(&self, register: u8) -> u8 {
        self.registers
            .get(usize::from(register))
            .copied()
            .unwrap_or_default()
    }

    /// Fail the next bus operation with `error`.
    pub fn fail_next(&mut self, error: ErrorCode) {
        self.fail_next = Some(error);
    }

    /// Speed last programmed.
    pub fn speed(&self) -> I2cSpeed {
        self.speed
    }

    /// Address phases put on the bus (a `write_read` counts two).
    pub fn transactions(&self) -> usize {
        self.address_phases
    }

    fn address(&mut self, address: u16) -> HalResult<()> {
        self.address_phases = self.address_phases.saturating_add(1);
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        if self.devices.contains(&address) {
            Ok(())
        } else {
            Err(ErrorCode::AddressNack)
        }
    }
}

impl Default for MockI2c {
    fn default() -> Self {
        Self::new()
    }
}

impl I2cHardware for MockI2c {
    fn configure(&mut self, config: &I2cExpertConfig) -> HalResult<()> {
        self.speed = config.speed;
        Ok(())
    }

    fn reconfigure(&mut self, config: &I2cConfig) -> HalResult<()> {
        self.speed = config.speed;
        Ok(())
    }

    fn read(&mut self, address: u16, buffer: &mut [u8]) -> HalResult<()> {
        self.address(address)?;
        for slot in buffer.iter_mut() {
            *slot = self.register(self.pointer);
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(())
    }

    fn write(&mut self, address: u16, data: &[u8]) -> HalResult<()> {
        self.address(address)?;
        let Some((register, values)) = data.split_first() else {
            return Ok(());
        };
        self.pointer = *register;
        for value in values {
            self.set_register(self.pointer, *value);
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(())
    }

    fn write_read(&mut self, address: u16, write: &[u8], read: &mut [u8]) -> HalResult<()> {
        I2cHardware::write(self, address, write)?;
        I2cHardware::read(self, address, read)
    }
}
