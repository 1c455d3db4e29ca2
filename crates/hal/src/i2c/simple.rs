//! One-call I2C setup (7-bit addressing).

use super::{I2c, I2cExpertConfig, I2cHardware, I2cSpeed};
use crate::error::HalResult;
use crate::types::{PeripheralId, PinId};

/// Standard mode, 100 kHz.
pub fn quick_setup<H: I2cHardware>(
    hw: H,
    peripheral: PeripheralId,
    sda: PinId,
    scl: PinId,
) -> HalResult<I2c<H>> {
    I2c::new(hw, I2cExpertConfig::standard(peripheral, sda, scl))
}

/// Explicit speed grade.
pub fn quick_setup_with_speed<H: I2cHardware>(
    hw: H,
    peripheral: PeripheralId,
    sda: PinId,
    scl: PinId,
    speed: I2cSpeed,
) -> HalResult<I2c<H>> {
    I2c::new(
        hw,
        I2cExpertConfig {
            speed,
            ..I2cExpertConfig::standard(peripheral, sda, scl)
        },
    )
}
