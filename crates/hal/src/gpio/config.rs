//! Expert-level GPIO configuration.

use super::{ActiveLevel, Direction, Drive, PinState, Pull};
use crate::types::PinId;
use crate::validate::{rule, RuleResult, Validate};

/// Complete description of one GPIO pin.
///
/// # Rules (evaluated in order)
///
/// 1. pin number 0–15
/// 2. open-drain drive only on outputs
/// 3. a high initial state only on outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioExpertConfig {
    /// Pin to configure.
    pub pin: PinId,
    /// Input or output.
    pub direction: Direction,
    /// Pull resistor.
    pub pull: Pull,
    /// Output driver type.
    pub drive: Drive,
    /// Level that counts as "on".
    pub active_level: ActiveLevel,
    /// Physical level driven when the pin is configured.
    pub initial_state: PinState,
}

impl GpioExpertConfig {
    /// Push-pull output, starts low.
    pub const fn push_pull_output(pin: PinId) -> Self {
        Self {
            pin,
            direction: Direction::Output,
            pull: Pull::None,
            drive: Drive::PushPull,
            active_level: ActiveLevel::High,
            initial_state: PinState::Low,
        }
    }

    /// Open-drain output released (high) at start, for shared lines.
    pub const fn open_drain_output(pin: PinId) -> Self {
        Self {
            drive: Drive::OpenDrain,
            initial_state: PinState::High,
            ..Self::push_pull_output(pin)
        }
    }

    /// Active-high LED, initially off.
    pub const fn led(pin: PinId) -> Self {
        Self::push_pull_output(pin)
    }

    /// Floating input.
    pub const fn input_floating(pin: PinId) -> Self {
        Self {
            pin,
            direction: Direction::Input,
            pull: Pull::None,
            drive: Drive::PushPull,
            active_level: ActiveLevel::High,
            initial_state: PinState::Low,
        }
    }

    /// Input with internal pull-up.
    pub const fn input_pull_up(pin: PinId) -> Self {
        Self {
            pull: Pull::Up,
            ..Self::input_floating(pin)
        }
    }

    /// Input with internal pull-down.
    pub const fn input_pull_down(pin: PinId) -> Self {
        Self {
            pull: Pull::Down,
            ..Self::input_floating(pin)
        }
    }

    /// Push button to ground: pull-up, pressed reads low.
    pub const fn button(pin: PinId) -> Self {
        Self {
            active_level: ActiveLevel::Low,
            ..Self::input_pull_up(pin)
        }
    }
}

impl Validate for GpioExpertConfig {
    fn check(&self) -> RuleResult {
        let is_output = self.direction == Direction::Output;
        rule(self.pin.is_valid(), "Pin number out of range (0-15)")?;
        rule(
            is_output || self.drive == Drive::PushPull,
            "Drive mode only valid for outputs",
        )?;
        rule(
            is_output || self.initial_state == PinState::Low,
            "Initial state only valid for outputs",
        )
    }
}
