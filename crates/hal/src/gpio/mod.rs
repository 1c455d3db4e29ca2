//! GPIO capability layer
//!
//! - [`GpioPin`]: the capability contract (primitives + derived operations)
//! - [`GpioHardware`]: the hardware policy a platform crate implements
//! - [`Gpio`]: the handle every API level produces
//!
//! Logical operations (`on`, `off`, `is_on`) honour the configured
//! [`ActiveLevel`]; physical operations (`set`, `clear`, `read`) never do.

pub mod builder;
pub mod config;
pub mod simple;

pub use builder::{GpioBuilder, GpioBuilderState};
pub use config::GpioExpertConfig;

use crate::error::{ErrorCode, HalResult};
use crate::types::PinId;
use crate::validate::Validate;

/// Pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Digital input
    Input,
    /// Digital output
    Output,
}

/// Pull resistor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor (floating)
    #[default]
    None,
    /// Internal pull-up
    Up,
    /// Internal pull-down
    Down,
}

/// Output driver type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drive {
    /// Push-pull output
    #[default]
    PushPull,
    /// Open-drain output
    OpenDrain,
}

/// Which physical level means "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// High level is "on"
    #[default]
    High,
    /// Low level is "on"
    Low,
}

/// Physical pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    #[default]
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Digital-pin capability contract.
///
/// Implementors supply the primitives; the logical helpers are defined once
/// here and shared by every API level.
pub trait GpioPin {
    /// Drive the pin physically high.
    fn set(&mut self) -> HalResult<()>;

    /// Drive the pin physically low.
    fn clear(&mut self) -> HalResult<()>;

    /// Read the physical level (`true` = high).
    fn read(&self) -> HalResult<bool>;

    /// Change the pin direction.
    fn set_direction(&mut self, direction: Direction) -> HalResult<()>;

    /// Change the pull resistor.
    fn set_pull(&mut self, pull: Pull) -> HalResult<()>;

    /// Change the output driver type.
    fn set_drive(&mut self, drive: Drive) -> HalResult<()>;

    /// Configured active level.
    fn active_level(&self) -> ActiveLevel;

    /// Switch the pin to its active level.
    fn on(&mut self) -> HalResult<()> {
        match self.active_level() {
            ActiveLevel::High => self.set(),
            ActiveLevel::Low => self.clear(),
        }
    }

    /// Switch the pin to its inactive level.
    fn off(&mut self) -> HalResult<()> {
        match self.active_level() {
            ActiveLevel::High => self.clear(),
            ActiveLevel::Low => self.set(),
        }
    }

    /// Drive the level opposite to the one currently read back.
    fn toggle(&mut self) -> HalResult<()> {
        if self.read()? {
            self.clear()
        } else {
            self.set()
        }
    }

    /// True when the pin is at its active level.
    fn is_on(&self) -> HalResult<bool> {
        let high = self.read()?;
        Ok(high == matches!(self.active_level(), ActiveLevel::High))
    }

    /// Drive the given physical state.
    fn set_state(&mut self, state: PinState) -> HalResult<()> {
        match state {
            PinState::High => self.set(),
            PinState::Low => self.clear(),
        }
    }
}

/// Hardware policy for GPIO pins.
///
/// A platform crate implements this over its port registers. Every method
/// receives the [`PinId`] it acts on, so one policy value may serve a pin or
/// a whole port.
pub trait GpioHardware {
    /// Apply a complete, already validated configuration.
    fn configure(&mut self, config: &GpioExpertConfig) -> HalResult<()>;

    /// Drive a physical level.
    fn write(&mut self, pin: PinId, state: PinState) -> HalResult<()>;

    /// Read the physical level.
    fn read(&self, pin: PinId) -> HalResult<PinState>;

    /// Change direction.
    fn set_direction(&mut self, pin: PinId, direction: Direction) -> HalResult<()>;

    /// Change pull resistor.
    fn set_pull(&mut self, pin: PinId, pull: Pull) -> HalResult<()>;

    /// Change driver type.
    fn set_drive(&mut self, pin: PinId, drive: Drive) -> HalResult<()>;
}

/// GPIO pin handle produced by every API level.
pub struct Gpio<H> {
    hw: H,
    config: GpioExpertConfig,
}

impl<H: GpioHardware> Gpio<H> {
    /// Expert-level constructor: validate, then apply to hardware.
    pub fn new(mut hw: H, config: GpioExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        hw.configure(&config)?;
        hal_debug!("gpio {} configured", config.pin.number);
        Ok(Self { hw, config })
    }

    /// Resolved configuration.
    pub fn config(&self) -> &GpioExpertConfig {
        &self.config
    }

    /// Pin this handle drives.
    pub fn pin(&self) -> PinId {
        self.config.pin
    }

    /// Borrow the hardware policy.
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Release the hardware policy.
    pub fn release(self) -> H {
        self.hw
    }

    fn require_output(&self) -> HalResult<()> {
        if self.config.direction == Direction::Output {
            Ok(())
        } else {
            Err(ErrorCode::NotSupported)
        }
    }

    /// Validate a candidate configuration before touching hardware.
    fn stage(&self, update: impl FnOnce(&mut GpioExpertConfig)) -> HalResult<GpioExpertConfig> {
        let mut candidate = self.config;
        update(&mut candidate);
        candidate.ensure_valid()?;
        Ok(candidate)
    }
}

impl<H: GpioHardware> GpioPin for Gpio<H> {
    fn set(&mut self) -> HalResult<()> {
        self.require_output()?;
        self.hw.write(self.config.pin, PinState::High)
    }

    fn clear(&mut self) -> HalResult<()> {
        self.require_output()?;
        self.hw.write(self.config.pin, PinState::Low)
    }

    fn read(&self) -> HalResult<bool> {
        self.hw.read(self.config.pin).map(bool::from)
    }

    /// Switching to input also drops output-only settings (open-drain
    /// drive, high initial state).
    fn set_direction(&mut self, direction: Direction) -> HalResult<()> {
        let candidate = self.stage(|c| {
            c.direction = direction;
            if direction == Direction::Input {
                c.initial_state = PinState::Low;
                c.drive = Drive::PushPull;
            }
        })?;
        self.hw.set_direction(self.config.pin, direction)?;
        if candidate.drive != self.config.drive {
            self.hw.set_drive(self.config.pin, candidate.drive)?;
        }
        self.config = candidate;
        Ok(())
    }

    fn set_pull(&mut self, pull: Pull) -> HalResult<()> {
        let candidate = self.stage(|c| c.pull = pull)?;
        self.hw.set_pull(self.config.pin, pull)?;
        self.config = candidate;
        Ok(())
    }

    fn set_drive(&mut self, drive: Drive) -> HalResult<()> {
        let candidate = self.stage(|c| c.drive = drive)?;
        self.hw.set_drive(self.config.pin, drive)?;
        self.config = candidate;
        Ok(())
    }

    fn active_level(&self) -> ActiveLevel {
        self.config.active_level
    }
}
