//! One-call UART setup (8N1, no flow control).

use super::{Uart, UartExpertConfig, UartHardware};
use crate::error::HalResult;
use crate::types::{PeripheralId, PinId};

/// Default baud rate for [`quick_setup`].
pub const DEFAULT_BAUD: u32 = 115_200;

/// Full duplex at 115200 8N1.
pub fn quick_setup<H: UartHardware>(
    hw: H,
    peripheral: PeripheralId,
    tx: PinId,
    rx: PinId,
) -> HalResult<Uart<H>> {
    quick_setup_with_baud(hw, peripheral, tx, rx, DEFAULT_BAUD)
}

/// Full duplex 8N1 at an explicit baud rate (validated).
pub fn quick_setup_with_baud<H: UartHardware>(
    hw: H,
    peripheral: PeripheralId,
    tx: PinId,
    rx: PinId,
    baud_rate: u32,
) -> HalResult<Uart<H>> {
    Uart::new(
        hw,
        UartExpertConfig::standard(peripheral, tx, rx, baud_rate),
    )
}

/// Transmit-only logger at 115200 8N1.
pub fn logger<H: UartHardware>(hw: H, peripheral: PeripheralId, tx: PinId) -> HalResult<Uart<H>> {
    Uart::new(hw, UartExpertConfig::logger(peripheral, tx))
}
