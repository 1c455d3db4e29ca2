//! System clock tree configuration
//!
//! [`ClockExpertConfig`] describes the oscillator, PLL and bus prescalers.
//! [`Clock::new`] validates it and hands it to a [`ClockHardware`] policy;
//! the resulting handle answers bus-frequency queries from the validated
//! values.
//!
//! # Background
//!
//! The PLL output is `input_hz * pll_multiplier / pll_divider`. The value
//! requested in `target_hz` is a cross-check: a configuration whose PLL
//! arithmetic lands anywhere else is rejected before the clock tree is
//! touched.

use crate::error::{ErrorCode, HalResult};
use crate::validate::{rule, RuleResult, Validate};

/// SYSCLK source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal RC oscillator.
    Hsi,
    /// External crystal / oscillator.
    Hse,
    /// PLL fed from HSE.
    PllHse,
    /// PLL fed from HSI.
    PllHsi,
}

impl ClockSource {
    /// SYSCLK comes out of the PLL.
    pub const fn uses_pll(self) -> bool {
        matches!(self, Self::PllHse | Self::PllHsi)
    }
}

/// Bus frequencies derived from a validated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusClocks {
    /// Core clock.
    pub sysclk_hz: u32,
    /// AHB clock.
    pub hclk_hz: u32,
    /// APB1 clock.
    pub pclk1_hz: u32,
    /// APB2 clock.
    pub pclk2_hz: u32,
}

/// Complete clock-tree description.
///
/// # Rules (evaluated in order)
///
/// 1. target 1 Hz – 300 MHz
/// 2. PLL multiplier 1 – 62
/// 3. PLL divider ≥ 1
/// 4. SYSCLK computed from source / PLL equals the target
/// 5. AHB, APB1 and APB2 prescalers are powers of two
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockExpertConfig {
    /// SYSCLK source.
    pub source: ClockSource,
    /// Oscillator frequency feeding `source` (or the PLL).
    pub input_hz: u32,
    /// Requested SYSCLK.
    pub target_hz: u32,
    /// PLL multiplier (N).
    pub pll_multiplier: u8,
    /// PLL input divider (M).
    pub pll_divider: u8,
    /// AHB prescaler.
    pub ahb_prescaler: u16,
    /// APB1 prescaler.
    pub apb1_prescaler: u16,
    /// APB2 prescaler.
    pub apb2_prescaler: u16,
}

impl ClockExpertConfig {
    /// Internal RC oscillator frequency.
    pub const HSI_HZ: u32 = 64_000_000;
    /// Highest SYSCLK accepted.
    pub const MAX_TARGET_HZ: u32 = 300_000_000;
    /// Highest PLL multiplier.
    pub const MAX_PLL_MULTIPLIER: u8 = 62;

    /// Reset state: HSI, no PLL, undivided buses.
    pub const fn internal_default() -> Self {
        Self {
            source: ClockSource::Hsi,
            input_hz: Self::HSI_HZ,
            target_hz: Self::HSI_HZ,
            pll_multiplier: 1,
            pll_divider: 1,
            ahb_prescaler: 1,
            apb1_prescaler: 1,
            apb2_prescaler: 1,
        }
    }

    /// PLL from an external crystal. The target is whatever the PLL
    /// produces; 0 if the arithmetic overflows, which fails rule 1.
    pub fn pll_from_external(hse_hz: u32, multiplier: u8, divider: u8) -> Self {
        let mut config = Self {
            source: ClockSource::PllHse,
            input_hz: hse_hz,
            target_hz: 0,
            pll_multiplier: multiplier,
            pll_divider: divider,
            ahb_prescaler: 1,
            apb1_prescaler: 2,
            apb2_prescaler: 2,
        };
        config.target_hz = config.pll_output_hz().unwrap_or(0);
        config
    }

    /// 25 MHz crystal → 280 MHz SYSCLK, APB buses at half speed.
    pub const fn max_performance() -> Self {
        Self {
            source: ClockSource::PllHse,
            input_hz: 25_000_000,
            target_hz: 280_000_000,
            pll_multiplier: 56,
            pll_divider: 5,
            ahb_prescaler: 1,
            apb1_prescaler: 2,
            apb2_prescaler: 2,
        }
    }

    /// PLL output frequency, `None` when the divider is zero or the result
    /// does not fit in `u32`.
    pub fn pll_output_hz(&self) -> Option<u32> {
        let scaled = u64::from(self.input_hz).checked_mul(u64::from(self.pll_multiplier))?;
        let out = scaled.checked_div(u64::from(self.pll_divider))?;
        u32::try_from(out).ok()
    }

    /// SYSCLK produced by this configuration.
    pub fn sysclk_hz(&self) -> Option<u32> {
        if self.source.uses_pll() {
            self.pll_output_hz()
        } else {
            Some(self.input_hz)
        }
    }

    /// Every bus frequency, `None` for a zero prescaler.
    pub fn bus_clocks(&self) -> Option<BusClocks> {
        let sysclk_hz = self.sysclk_hz()?;
        let hclk_hz = sysclk_hz.checked_div(u32::from(self.ahb_prescaler))?;
        Some(BusClocks {
            sysclk_hz,
            hclk_hz,
            pclk1_hz: hclk_hz.checked_div(u32::from(self.apb1_prescaler))?,
            pclk2_hz: hclk_hz.checked_div(u32::from(self.apb2_prescaler))?,
        })
    }
}

impl Validate for ClockExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            (1..=Self::MAX_TARGET_HZ).contains(&self.target_hz),
            "Target frequency must be 1 Hz - 300 MHz",
        )?;
        rule(
            (1..=Self::MAX_PLL_MULTIPLIER).contains(&self.pll_multiplier),
            "PLL multiplier must be 1-62",
        )?;
        rule(self.pll_divider >= 1, "PLL divider cannot be zero")?;
        rule(
            self.sysclk_hz() == Some(self.target_hz),
            "PLL output does not match target frequency",
        )?;
        rule(
            self.ahb_prescaler.is_power_of_two()
                && self.apb1_prescaler.is_power_of_two()
                && self.apb2_prescaler.is_power_of_two(),
            "Bus prescaler must be a power of two",
        )
    }
}

/// Hardware policy for the reset and clock controller.
pub trait ClockHardware {
    /// Switch the clock tree to a validated configuration.
    fn apply(&mut self, config: &ClockExpertConfig) -> HalResult<()>;
}

/// Applied clock tree.
pub struct Clock<H> {
    hw: H,
    config: ClockExpertConfig,
    clocks: BusClocks,
}

impl<H: ClockHardware> Clock<H> {
    /// Validate, then reprogram the clock tree.
    pub fn new(mut hw: H, config: ClockExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        let clocks = config
            .bus_clocks()
            .ok_or(ErrorCode::InvalidParameter)?;
        hw.apply(&config)?;
        hal_debug!("sysclk {} Hz, hclk {} Hz", clocks.sysclk_hz, clocks.hclk_hz);
        Ok(Self { hw, config, clocks })
    }

    /// Applied configuration.
    pub fn config(&self) -> &ClockExpertConfig {
        &self.config
    }

    /// Resulting bus frequencies.
    pub fn clocks(&self) -> BusClocks {
        self.clocks
    }

    /// Release the hardware policy.
    pub fn release(self) -> H {
        self.hw
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
