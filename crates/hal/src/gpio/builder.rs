//! Fluent builder for GPIO pins.
//!
//! Direction is the only required field. Pull, drive, active level and
//! initial state fall back to floating / push-pull / active-high / low.
//!
//! ```
//! use hal::gpio::{GpioBuilder, GpioPin};
//! use hal::mocks::MockGpio;
//! use hal::{PinId, Port};
//!
//! let mut led = GpioBuilder::new(PinId::new(Port::C, 13))
//!     .output()
//!     .active_low()
//!     .initialize(MockGpio::new())
//!     .unwrap();
//! led.on().unwrap();
//! ```

use super::{ActiveLevel, Direction, Drive, Gpio, GpioExpertConfig, GpioHardware, PinState, Pull};
use crate::builder::{self, BuilderState};
use crate::error::HalResult;
use crate::types::PinId;
use crate::validate::Validate;

/// Required-field flags for [`GpioBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct GpioBuilderState {
    /// `input()` / `output()` / `direction()` was called.
    pub has_direction: bool,
}

impl BuilderState for GpioBuilderState {
    const REQUIRED: u8 = 1;

    fn satisfied(&self) -> u8 {
        builder::count(&[self.has_direction])
    }
}

/// Chained configuration of one GPIO pin.
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct GpioBuilder {
    pin: PinId,
    direction: Direction,
    pull: Pull,
    drive: Drive,
    active_level: ActiveLevel,
    initial_state: PinState,
    state: GpioBuilderState,
}

impl GpioBuilder {
    /// Start configuring `pin`.
    pub fn new(pin: PinId) -> Self {
        Self {
            pin,
            direction: Direction::Input,
            pull: Pull::None,
            drive: Drive::PushPull,
            active_level: ActiveLevel::High,
            initial_state: PinState::Low,
            state: GpioBuilderState::default(),
        }
    }

    /// Set the direction explicitly.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self.state.has_direction = true;
        self
    }

    /// Configure as output.
    pub fn output(self) -> Self {
        self.direction(Direction::Output)
    }

    /// Configure as input.
    pub fn input(self) -> Self {
        self.direction(Direction::Input)
    }

    /// Select the pull resistor.
    pub fn pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    /// Enable the internal pull-up.
    pub fn pull_up(self) -> Self {
        self.pull(Pull::Up)
    }

    /// Enable the internal pull-down.
    pub fn pull_down(self) -> Self {
        self.pull(Pull::Down)
    }

    /// Disable pull resistors.
    pub fn floating(self) -> Self {
        self.pull(Pull::None)
    }

    /// Select the output driver.
    pub fn drive(mut self, drive: Drive) -> Self {
        self.drive = drive;
        self
    }

    /// Push-pull driver.
    pub fn push_pull(self) -> Self {
        self.drive(Drive::PushPull)
    }

    /// Open-drain driver.
    pub fn open_drain(self) -> Self {
        self.drive(Drive::OpenDrain)
    }

    /// Low level means "on".
    pub fn active_low(mut self) -> Self {
        self.active_level = ActiveLevel::Low;
        self
    }

    /// High level means "on".
    pub fn active_high(mut self) -> Self {
        self.active_level = ActiveLevel::High;
        self
    }

    /// Physical level driven at configuration time.
    pub fn initial_state(mut self, state: PinState) -> Self {
        self.initial_state = state;
        self
    }

    /// Required-field flags.
    pub fn state(&self) -> &GpioBuilderState {
        &self.state
    }

    /// Assemble and validate the Expert configuration.
    pub fn build(&self) -> HalResult<GpioExpertConfig> {
        self.state.require_complete()?;
        let config = GpioExpertConfig {
            pin: self.pin,
            direction: self.direction,
            pull: self.pull,
            drive: self.drive,
            active_level: self.active_level,
            initial_state: self.initial_state,
        };
        config.ensure_valid()?;
        Ok(config)
    }

    /// Finalize into a handle.
    pub fn initialize<H: GpioHardware>(self, hw: H) -> HalResult<Gpio<H>> {
        Gpio::new(hw, self.build()?)
    }
}
