//! Every shipped preset must pass its own validity rules.
//! A preset that fails validation would make the "one call" Simple level
//! unusable on first contact.

#![allow(clippy::unwrap_used)]

use hal::adc::AdcExpertConfig;
use hal::clock::ClockExpertConfig;
use hal::dma::DmaExpertConfig;
use hal::gpio::GpioExpertConfig;
use hal::i2c::I2cExpertConfig;
use hal::interrupt::InterruptExpertConfig;
use hal::pwm::PwmExpertConfig;
use hal::spi::{SpiDmaConfig, SpiExpertConfig};
use hal::systick::SysTickExpertConfig;
use hal::timer::TimerExpertConfig;
use hal::uart::{UartDmaConfig, UartExpertConfig};
use hal::watchdog::WatchdogExpertConfig;
use hal::{PeripheralId, PinId, Port, Validate, VALID};

const P1: PeripheralId = PeripheralId::new(1);
const PA5: PinId = PinId::new(Port::A, 5);
const PA6: PinId = PinId::new(Port::A, 6);
const PA7: PinId = PinId::new(Port::A, 7);
const PA9: PinId = PinId::new(Port::A, 9);
const PA10: PinId = PinId::new(Port::A, 10);
const PB6: PinId = PinId::new(Port::B, 6);
const PB7: PinId = PinId::new(Port::B, 7);

const SRAM: usize = 0x2400_0000;
const UART_TDR: usize = 0x4001_1028;
const UART_RDR: usize = 0x4001_1024;

fn assert_valid(label: &str, cfg: &impl Validate) {
    assert_eq!(cfg.error_message(), VALID, "{label} preset is invalid");
}

// ── GPIO ─────────────────────────────────────────────────────────────────────

#[test]
fn gpio_presets_are_valid() {
    assert_valid("push_pull_output", &GpioExpertConfig::push_pull_output(PA5));
    assert_valid("open_drain_output", &GpioExpertConfig::open_drain_output(PA5));
    assert_valid("led", &GpioExpertConfig::led(PA5));
    assert_valid("input_floating", &GpioExpertConfig::input_floating(PA5));
    assert_valid("input_pull_up", &GpioExpertConfig::input_pull_up(PA5));
    assert_valid("input_pull_down", &GpioExpertConfig::input_pull_down(PA5));
    assert_valid("button", &GpioExpertConfig::button(PA5));
}

// ── UART ─────────────────────────────────────────────────────────────────────

#[test]
fn uart_presets_are_valid() {
    assert_valid("standard", &UartExpertConfig::standard(P1, PA9, PA10, 115_200));
    assert_valid("tx_only", &UartExpertConfig::tx_only(P1, PA9, 9_600));
    assert_valid("rx_only", &UartExpertConfig::rx_only(P1, PA10, 9_600));
    assert_valid("logger", &UartExpertConfig::logger(P1, PA9));
    assert_valid(
        "with_flow_control",
        &UartExpertConfig::with_flow_control(P1, PA9, PA10, 1_000_000),
    );
}

#[test]
fn uart_dma_presets_are_valid() {
    let uart = UartExpertConfig::standard(P1, PA9, PA10, 921_600);
    let tx = DmaExpertConfig::memory_to_peripheral(0, SRAM, UART_TDR, 64);
    let rx = DmaExpertConfig::circular_receive(1, UART_RDR, SRAM, 64);
    assert_valid("uart dma tx", &UartDmaConfig::with_tx(uart, tx));
    assert_valid("uart dma rx", &UartDmaConfig::with_rx(uart, rx));
    assert_valid("uart dma full duplex", &UartDmaConfig::full_duplex(uart, tx, rx));
}

// ── SPI ──────────────────────────────────────────────────────────────────────

#[test]
fn spi_presets_are_valid() {
    assert_valid("standard", &SpiExpertConfig::standard(P1, PA7, PA6, PA5, 1_000_000));
    assert_valid("tx_only", &SpiExpertConfig::tx_only(P1, PA7, PA5, 8_000_000));
    assert_valid("fast", &SpiExpertConfig::fast(P1, PA7, PA6, PA5));
    assert_valid("dma", &SpiExpertConfig::dma(P1, PA7, PA6, PA5, 10_000_000));
}

#[test]
fn spi_dma_presets_are_valid() {
    let spi = SpiExpertConfig::standard(P1, PA7, PA6, PA5, 4_000_000);
    let tx = DmaExpertConfig::memory_to_peripheral(2, SRAM, 0x4001_3020, 32);
    let rx = DmaExpertConfig::peripheral_to_memory(3, 0x4001_3030, SRAM, 32);
    assert_valid("spi dma tx", &SpiDmaConfig::tx_only(spi, tx));
    assert_valid("spi dma full duplex", &SpiDmaConfig::full_duplex(spi, tx, rx));
}

// ── I2C ──────────────────────────────────────────────────────────────────────

#[test]
fn i2c_presets_are_valid() {
    assert_valid("standard", &I2cExpertConfig::standard(P1, PB7, PB6));
    assert_valid("fast", &I2cExpertConfig::fast(P1, PB7, PB6));
    assert_valid("fast_plus", &I2cExpertConfig::fast_plus(P1, PB7, PB6));
    assert_valid("dma", &I2cExpertConfig::dma(P1, PB7, PB6));
}

// ── Expert-only families ─────────────────────────────────────────────────────

#[test]
fn clock_presets_are_valid() {
    assert_valid("internal_default", &ClockExpertConfig::internal_default());
    assert_valid("max_performance", &ClockExpertConfig::max_performance());
    assert_valid(
        "pll_from_external",
        &ClockExpertConfig::pll_from_external(8_000_000, 60, 2),
    );
}

#[test]
fn dma_presets_are_valid() {
    assert_valid(
        "memory_to_peripheral",
        &DmaExpertConfig::memory_to_peripheral(0, SRAM, UART_TDR, 16),
    );
    assert_valid(
        "peripheral_to_memory",
        &DmaExpertConfig::peripheral_to_memory(1, UART_RDR, SRAM, 16),
    );
    assert_valid(
        "memory_to_memory",
        &DmaExpertConfig::memory_to_memory(2, SRAM, 0x2400_1000, 256),
    );
    assert_valid(
        "circular_receive",
        &DmaExpertConfig::circular_receive(3, UART_RDR, SRAM, 128),
    );
}

#[test]
fn pwm_presets_are_valid() {
    assert_valid("led_dimming", &PwmExpertConfig::led_dimming(0));
    assert_valid("servo_motor", &PwmExpertConfig::servo_motor(1));
    assert_valid("motor_control", &PwmExpertConfig::motor_control(2));
    assert_valid("custom", &PwmExpertConfig::custom(3, 25_000, 33.3));
}

#[test]
fn timer_presets_are_valid() {
    assert_valid("periodic_ms", &TimerExpertConfig::periodic_ms(2, 84_000_000, 500));
    assert_valid("one_shot_us", &TimerExpertConfig::one_shot_us(5, 240_000_000, 50));
}

#[test]
fn adc_presets_are_valid() {
    assert_valid("single_channel", &AdcExpertConfig::single_channel(P1, 0));
    assert_valid("high_resolution", &AdcExpertConfig::high_resolution(P1, 5));
    assert_valid("fast", &AdcExpertConfig::fast(P1, 18));
}

#[test]
fn watchdog_presets_are_valid() {
    assert_valid("standard", &WatchdogExpertConfig::standard());
    assert_valid("long_timeout", &WatchdogExpertConfig::long_timeout());
    assert_valid("windowed", &WatchdogExpertConfig::windowed(500, 100));
    assert_valid("custom", &WatchdogExpertConfig::custom(60_000));
}

#[test]
fn systick_presets_are_valid() {
    for core in [16_000_000u32, 64_000_000, 168_000_000, 480_000_000] {
        assert_valid("millisecond", &SysTickExpertConfig::millisecond(core));
        assert_valid("microsecond", &SysTickExpertConfig::microsecond(core));
    }
}

#[test]
fn interrupt_presets_are_valid() {
    assert_valid("default_priority", &InterruptExpertConfig::default_priority(37));
    assert_valid("high_priority", &InterruptExpertConfig::high_priority(0));
    assert_valid("low_priority", &InterruptExpertConfig::low_priority(239));
}
