//! One-call SPI setup (mode 0, MSB first, 8-bit frames).

use super::{Spi, SpiExpertConfig, SpiHardware};
use crate::error::HalResult;
use crate::types::{PeripheralId, PinId};

/// Default clock for [`quick_setup`].
pub const DEFAULT_CLOCK_HZ: u32 = 1_000_000;

/// Full duplex at 1 MHz.
pub fn quick_setup<H: SpiHardware>(
    hw: H,
    peripheral: PeripheralId,
    mosi: PinId,
    miso: PinId,
    sck: PinId,
) -> HalResult<Spi<H>> {
    quick_setup_with_speed(hw, peripheral, mosi, miso, sck, DEFAULT_CLOCK_HZ)
}

/// Full duplex at an explicit clock (validated against the policy bounds).
pub fn quick_setup_with_speed<H: SpiHardware>(
    hw: H,
    peripheral: PeripheralId,
    mosi: PinId,
    miso: PinId,
    sck: PinId,
    clock_speed_hz: u32,
) -> HalResult<Spi<H>> {
    Spi::new(
        hw,
        SpiExpertConfig::standard(peripheral, mosi, miso, sck, clock_speed_hz),
    )
}

/// Transmit-only at 1 MHz.
pub fn tx_only<H: SpiHardware>(
    hw: H,
    peripheral: PeripheralId,
    mosi: PinId,
    sck: PinId,
) -> HalResult<Spi<H>> {
    Spi::new(
        hw,
        SpiExpertConfig::tx_only(peripheral, mosi, sck, DEFAULT_CLOCK_HZ),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::mocks::MockSpi;
    use crate::spi::{BitOrder, SpiMode, SpiPeripheral};
    use crate::types::Port;

    const SPI1: PeripheralId = PeripheralId::new(1);
    const MOSI: PinId = PinId::new(Port::A, 7);
    const MISO: PinId = PinId::new(Port::A, 6);
    const SCK: PinId = PinId::new(Port::A, 5);

    #[test]
    fn quick_setup_defaults() {
        let spi = quick_setup(MockSpi::new(), SPI1, MOSI, MISO, SCK).unwrap();
        let bus = spi.config();
        assert_eq!(bus.mode, SpiMode::Mode0);
        assert_eq!(bus.clock_speed_hz, 1_000_000);
        assert_eq!(bus.bit_order, BitOrder::MsbFirst);
        assert_eq!(bus.data_size, 8);
    }

    #[test]
    fn explicit_speed_is_validated() {
        let r = quick_setup_with_speed(MockSpi::new(), SPI1, MOSI, MISO, SCK, 100_000_000);
        assert_eq!(r.err(), Some(ErrorCode::InvalidParameter));
    }

    #[test]
    fn tx_only_cannot_receive() {
        let mut spi = tx_only(MockSpi::new(), SPI1, MOSI, SCK).unwrap();
        assert_eq!(spi.receive_byte(), Err(ErrorCode::NotSupported));
        spi.transmit_byte(0x42).unwrap();
    }
}
