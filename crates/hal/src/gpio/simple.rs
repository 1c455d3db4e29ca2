//! One-call GPIO setup.

use super::{Gpio, GpioExpertConfig, GpioHardware};
use crate::error::HalResult;
use crate::types::PinId;

/// Push-pull output, initially low.
pub fn output<H: GpioHardware>(hw: H, pin: PinId) -> HalResult<Gpio<H>> {
    Gpio::new(hw, GpioExpertConfig::push_pull_output(pin))
}

/// Floating input.
pub fn input<H: GpioHardware>(hw: H, pin: PinId) -> HalResult<Gpio<H>> {
    Gpio::new(hw, GpioExpertConfig::input_floating(pin))
}

/// Input with pull-up.
pub fn input_pull_up<H: GpioHardware>(hw: H, pin: PinId) -> HalResult<Gpio<H>> {
    Gpio::new(hw, GpioExpertConfig::input_pull_up(pin))
}

/// Active-high LED, initially off.
pub fn led<H: GpioHardware>(hw: H, pin: PinId) -> HalResult<Gpio<H>> {
    Gpio::new(hw, GpioExpertConfig::led(pin))
}

/// Push button to ground (pull-up, active-low).
pub fn button<H: GpioHardware>(hw: H, pin: PinId) -> HalResult<Gpio<H>> {
    Gpio::new(hw, GpioExpertConfig::button(pin))
}
