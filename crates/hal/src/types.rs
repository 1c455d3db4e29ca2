//! Identifier newtypes shared by every peripheral family.
//!
//! - `PinId`: port letter + pin number, the unit every family's pin
//!   assignment is expressed in
//! - `PeripheralId`: 1-based instance number (`SPI1`, `USART2`, ...)

use core::fmt;

/// GPIO port letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Port A
    A,
    /// Port B
    B,
    /// Port C
    C,
    /// Port D
    D,
    /// Port E
    E,
    /// Port F
    F,
    /// Port G
    G,
    /// Port H
    H,
    /// Port I
    I,
    /// Port J
    J,
    /// Port K
    K,
}

impl Port {
    /// Port letter as a `char`.
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
            Self::I => 'I',
            Self::J => 'J',
            Self::K => 'K',
        }
    }
}

/// One physical pin.
///
/// The pin number is not range-checked here; configuration values reject
/// numbers above [`PinId::MAX_NUMBER`] through their validity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    /// Port the pin belongs to.
    pub port: Port,
    /// Pin number within the port.
    pub number: u8,
}

impl PinId {
    /// Highest pin number in a 16-pin port.
    pub const MAX_NUMBER: u8 = 15;

    /// Create a pin identifier.
    pub const fn new(port: Port, number: u8) -> Self {
        Self { port, number }
    }

    /// True when the pin number fits in a port.
    pub const fn is_valid(self) -> bool {
        self.number <= Self::MAX_NUMBER
    }

    /// Single-bit mask for this pin within its port register.
    ///
    /// Returns `0` for an out-of-range pin number.
    pub fn mask(self) -> u16 {
        1u16.checked_shl(u32::from(self.number))
            .filter(|_| self.is_valid())
            .unwrap_or(0)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.number)
    }
}

/// Peripheral instance number (1 for `SPI1`, 2 for `USART2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PeripheralId(u8);

impl PeripheralId {
    /// Create a peripheral identifier.
    pub const fn new(instance: u8) -> Self {
        Self(instance)
    }

    /// Return the instance number.
    pub const fn index(self) -> u8 {
        self.0
    }
}
