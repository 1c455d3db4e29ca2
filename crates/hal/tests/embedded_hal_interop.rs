//! Handles plug into generic `embedded-hal` / `embedded-io` drivers.
//! Each test drives a handle only through the ecosystem traits.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
use embedded_hal::i2c::{ErrorKind, I2c, NoAcknowledgeSource, Operation};
use embedded_hal::spi::SpiBus;
use embedded_io::{Read, Write};

use hal::gpio::simple as gpio_simple;
use hal::i2c::{simple as i2c_simple, I2cConfig};
use hal::mocks::{MockGpio, MockI2c, MockSpi, MockUart};
use hal::spi::simple as spi_simple;
use hal::uart::simple as uart_simple;
use hal::{ErrorCode, HalResult, I2cExpertConfig, I2cHardware, PeripheralId, PinId, Port};

const P1: PeripheralId = PeripheralId::new(1);

// ── Minimal generic "drivers" ────────────────────────────────────────────────

fn blink<P: OutputPin>(pin: &mut P, times: usize) -> Result<(), P::Error> {
    for _ in 0..times {
        pin.set_high()?;
        pin.set_low()?;
    }
    Ok(())
}

fn who_am_i<B: I2c>(bus: &mut B, address: u8) -> Result<u8, B::Error> {
    let mut id = [0u8; 1];
    bus.write_read(address, &[0x0F], &mut id)?;
    Ok(id[0])
}

fn spi_command<B: SpiBus>(bus: &mut B, cmd: u8, reply: &mut [u8]) -> Result<(), B::Error> {
    bus.write(&[cmd])?;
    bus.read(reply)?;
    bus.flush()
}

// ── GPIO ─────────────────────────────────────────────────────────────────────

#[test]
fn output_pin_drives_hardware() {
    let pin = PinId::new(Port::B, 0);
    let mut led = gpio_simple::output(MockGpio::new(), pin).unwrap();
    blink(&mut led, 3).unwrap();
    assert_eq!(led.hardware().writes(), 6);
    assert!(led.is_set_low().unwrap());
    led.set_high().unwrap();
    assert!(led.is_set_high().unwrap());
}

#[test]
fn input_pin_reads_injected_level() {
    let pin = PinId::new(Port::C, 13);
    let mut gpio = MockGpio::new();
    gpio.set_input_level(pin, hal::gpio::PinState::High);
    let mut button = gpio_simple::input(gpio, pin).unwrap();
    assert!(button.is_high().unwrap());
    assert!(!button.is_low().unwrap());
}

#[test]
fn output_pin_on_input_reports_not_supported() {
    let mut input = gpio_simple::input(MockGpio::new(), PinId::new(Port::A, 0)).unwrap();
    assert_eq!(input.set_high(), Err(ErrorCode::NotSupported));
}

// ── I2C ──────────────────────────────────────────────────────────────────────

#[test]
fn generic_driver_reads_register() {
    let mut mock = MockI2c::new().with_device(0x6B);
    mock.set_register(0x0F, 0x6C);
    let mut bus = i2c_simple::quick_setup(mock, P1, PinId::new(Port::B, 7), PinId::new(Port::B, 6)).unwrap();
    assert_eq!(who_am_i(&mut bus, 0x6B).unwrap(), 0x6C);
}

#[test]
fn missing_device_maps_to_address_nack_kind() {
    let mut bus = i2c_simple::quick_setup(MockI2c::new(), P1, PinId::new(Port::B, 7), PinId::new(Port::B, 6)).unwrap();
    let err = who_am_i(&mut bus, 0x6B).unwrap_err();
    assert_eq!(
        embedded_hal::i2c::Error::kind(&err),
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    );
}

#[test]
fn transaction_reads_back_what_was_written() {
    let mut bus = i2c_simple::quick_setup(
        MockI2c::new().with_device(0x50),
        P1,
        PinId::new(Port::B, 7),
        PinId::new(Port::B, 6),
    )
    .unwrap();
    let mut readback = [0u8; 2];
    bus.transaction(0x50, &mut [Operation::Write(&[0x20, 0xAB, 0xCD])])
        .unwrap();
    bus.transaction(
        0x50,
        &mut [Operation::Write(&[0x20]), Operation::Read(&mut readback)],
    )
    .unwrap();
    assert_eq!(readback, [0xAB, 0xCD]);
}

/// Policy that records which bus primitive each call used.
#[derive(Default)]
struct BusRecorder {
    calls: Vec<&'static str>,
    written: Vec<u8>,
    reply: Vec<u8>,
}

impl BusRecorder {
    fn replying(reply: &[u8]) -> Self {
        Self {
            reply: reply.to_vec(),
            ..Self::default()
        }
    }

    fn fill(&self, buffer: &mut [u8]) {
        for (i, b) in buffer.iter_mut().enumerate() {
            *b = self.reply.get(i).copied().unwrap_or_default();
        }
    }
}

impl I2cHardware for BusRecorder {
    fn configure(&mut self, _config: &I2cExpertConfig) -> HalResult<()> {
        Ok(())
    }

    fn reconfigure(&mut self, _config: &I2cConfig) -> HalResult<()> {
        Ok(())
    }

    fn read(&mut self, _address: u16, buffer: &mut [u8]) -> HalResult<()> {
        self.calls.push("read");
        self.fill(buffer);
        Ok(())
    }

    fn write(&mut self, _address: u16, data: &[u8]) -> HalResult<()> {
        self.calls.push("write");
        self.written.extend_from_slice(data);
        Ok(())
    }

    fn write_read(&mut self, _address: u16, write: &[u8], read: &mut [u8]) -> HalResult<()> {
        self.calls.push("write_read");
        self.written.extend_from_slice(write);
        self.fill(read);
        Ok(())
    }
}

fn recorded_bus(policy: BusRecorder) -> hal::I2c<BusRecorder> {
    hal::I2c::new(
        policy,
        I2cExpertConfig::standard(P1, PinId::new(Port::B, 7), PinId::new(Port::B, 6)),
    )
    .unwrap()
}

#[test]
fn write_then_read_uses_repeated_start() {
    let mut bus = recorded_bus(BusRecorder::replying(&[0x6C]));
    let mut id = [0u8; 1];
    bus.transaction(0x50, &mut [Operation::Write(&[0x0F]), Operation::Read(&mut id)])
        .unwrap();
    assert_eq!(bus.hardware().calls, ["write_read"]);
    assert_eq!(bus.hardware().written, [0x0F]);
    assert_eq!(id, [0x6C]);
}

#[test]
fn adjacent_operations_share_one_bus_call() {
    let mut bus = recorded_bus(BusRecorder::replying(&[1, 2, 3]));
    bus.transaction(
        0x50,
        &mut [Operation::Write(&[0x20]), Operation::Write(&[0xAB, 0xCD])],
    )
    .unwrap();
    assert_eq!(bus.hardware().calls, ["write"]);
    assert_eq!(bus.hardware().written, [0x20, 0xAB, 0xCD]);

    let mut head = [0u8; 2];
    let mut tail = [0u8; 1];
    bus.transaction(
        0x50,
        &mut [
            Operation::Write(&[0x10]),
            Operation::Read(&mut head),
            Operation::Read(&mut tail),
        ],
    )
    .unwrap();
    assert_eq!(bus.hardware().calls, ["write", "write_read"]);
    assert_eq!((head, tail), ([1, 2], [3]));
}

#[test]
fn write_after_read_is_rejected_before_bus_access() {
    let mut bus = recorded_bus(BusRecorder::default());
    let mut buf = [0u8; 1];
    assert_eq!(
        bus.transaction(0x50, &mut [Operation::Read(&mut buf), Operation::Write(&[1])]),
        Err(ErrorCode::NotSupported)
    );
    assert_eq!(
        bus.transaction(0x50, &mut [Operation::Write(&[0; 40]), Operation::Write(&[0; 40])]),
        Err(ErrorCode::NotSupported)
    );
    assert!(bus.hardware().calls.is_empty());
}

// ── SPI ──────────────────────────────────────────────────────────────────────

#[test]
fn spi_bus_half_duplex_command() {
    let mut spi = spi_simple::quick_setup(
        MockSpi::new(),
        P1,
        PinId::new(Port::A, 7),
        PinId::new(Port::A, 6),
        PinId::new(Port::A, 5),
    )
    .unwrap();
    let mut reply = [0u8; 2];
    spi_command(&mut spi, 0x9F, &mut reply).unwrap();
    assert_eq!(reply, [MockSpi::FILL; 2]);
    assert_eq!(spi.hardware().written(), [0x9F]);
}

#[test]
fn spi_bus_transfer_pads_the_shorter_side() {
    let mut spi = spi_simple::quick_setup(
        MockSpi::new(),
        P1,
        PinId::new(Port::A, 7),
        PinId::new(Port::A, 6),
        PinId::new(Port::A, 5),
    )
    .unwrap();
    let mut read = [0u8; 4];
    SpiBus::transfer(&mut spi, &mut read, &[1, 2]).unwrap();
    assert_eq!(read, [1, 2, MockSpi::FILL, MockSpi::FILL]);

    let mut short = [0u8; 1];
    SpiBus::transfer(&mut spi, &mut short, &[7, 8, 9]).unwrap();
    assert_eq!(short, [7]);
    assert_eq!(spi.hardware().written(), [1, 2, 7, 8, 9]);
}

#[test]
fn spi_bus_read_on_transmit_only_handle_fails() {
    let mut spi = spi_simple::tx_only(MockSpi::new(), P1, PinId::new(Port::A, 7), PinId::new(Port::A, 5)).unwrap();
    let mut reply = [0u8; 1];
    assert_eq!(SpiBus::read(&mut spi, &mut reply), Err(ErrorCode::NotSupported));
    SpiBus::write(&mut spi, &[0x01]).unwrap();
}

// ── UART ─────────────────────────────────────────────────────────────────────

#[test]
fn io_write_all_and_read_exact() {
    let mut uart = uart_simple::quick_setup(
        MockUart::new(),
        P1,
        PinId::new(Port::A, 9),
        PinId::new(Port::A, 10),
    )
    .unwrap();
    uart.write_all(b"hello").unwrap();
    Write::flush(&mut uart).unwrap();
    assert_eq!(uart.hardware().sent(), b"hello");
    assert_eq!(uart.hardware().flushes(), 1);

    uart.hardware_mut().queue_rx(b"world");
    let mut buf = [0u8; 5];
    uart.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"world");
}

#[test]
fn io_read_returns_what_is_buffered() {
    let mut uart = uart_simple::quick_setup(
        MockUart::new(),
        P1,
        PinId::new(Port::A, 9),
        PinId::new(Port::A, 10),
    )
    .unwrap();
    uart.hardware_mut().queue_rx(b"ab");
    let mut buf = [0u8; 8];
    assert_eq!(Read::read(&mut uart, &mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"ab");
    assert_eq!(Read::read(&mut uart, &mut buf), Err(ErrorCode::Timeout));
}
