//! Layered peripheral Hardware Abstraction Layer
//!
//! This crate turns peripheral configuration into operation-bearing handles.
//! Every peripheral family is reachable through three construction levels
//! that all produce the *same* handle type:
//!
//! ```text
//! Simple:  gpio::simple::output(hw, pin)            one call, defaults filled
//! Fluent:  GpioBuilder::new(pin).output().…        chained setters, checked once
//! Expert:  Gpio::new(hw, GpioExpertConfig { … })   every field explicit
//!                 ↓
//!         Gpio<H: GpioHardware>  (implements the GpioPin capability trait)
//! ```
//!
//! # Layers
//!
//! ```text
//! Application / driver crates
//!         ↓
//! Capability traits (GpioPin, UartPeripheral, SpiPeripheral, I2cPeripheral)
//!   primitives + derived operations, static dispatch only
//!         ↓
//! Handles (Gpio<H>, Uart<H>, Spi<H>, I2c<H>): validated config + policy
//!         ↓
//! Hardware policies (GpioHardware, SpiHardware, …), supplied by a
//! platform crate; this crate ships mocks only
//! ```
//!
//! # Expert-only families
//!
//! [`clock`], [`dma`], [`pwm`], [`timer`], [`adc`], [`watchdog`],
//! [`systick`] and [`interrupt`] expose an Expert configuration value with
//! presets and a validated apply step.
//!
//! # Features
//!
//! - `defmt`: `defmt::Format` derives and defmt log output
//! - `tracing`: log output through `tracing` (host / simulator builds)
//!
//! # Example
//!
//! ```
//! use hal::i2c::{I2cBuilder, I2cPeripheral, I2cSpeed};
//! use hal::mocks::MockI2c;
//! use hal::{PeripheralId, PinId, Port};
//!
//! let mut bus = I2cBuilder::new(PeripheralId::new(1))
//!     .sda(PinId::new(Port::B, 7))
//!     .scl(PinId::new(Port::B, 6))
//!     .initialize(MockI2c::new())
//!     .unwrap();
//!
//! assert_eq!(bus.config().speed, I2cSpeed::Standard);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register and pin names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod fmt;

pub mod builder;
pub mod error;
pub mod types;
pub mod validate;

pub mod gpio;
pub mod i2c;
pub mod spi;
pub mod uart;

pub mod adc;
pub mod clock;
pub mod dma;
pub mod interrupt;
pub mod pwm;
pub mod systick;
pub mod timer;
pub mod watchdog;

pub mod compat;
pub mod mocks;

// Re-export the shared machinery
pub use builder::{BuilderState, Progress};
pub use error::{ErrorCode, HalResult};
pub use types::{PeripheralId, PinId, Port};
pub use validate::{Validate, VALID};

// Re-export capability traits and handles
pub use gpio::{Gpio, GpioBuilder, GpioExpertConfig, GpioHardware, GpioPin};
pub use i2c::{I2c, I2cBuilder, I2cExpertConfig, I2cHardware, I2cPeripheral};
pub use spi::{Spi, SpiBuilder, SpiExpertConfig, SpiHardware, SpiPeripheral};
pub use uart::{Uart, UartBuilder, UartExpertConfig, UartHardware, UartPeripheral};
