//! SysTick timebase configuration

use crate::error::{ErrorCode, HalResult};
use crate::validate::{rule, RuleResult, Validate};

/// SysTick counter clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SysTickClockSource {
    /// Processor clock.
    #[default]
    Core,
    /// Processor clock / 8.
    CoreDiv8,
}

/// SysTick timebase.
///
/// # Rules (evaluated in order)
///
/// 1. tick rate 1 Hz – 1 MHz
/// 2. core clock ≥ tick rate
/// 3. reload value fits the 24-bit counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysTickExpertConfig {
    /// Processor clock.
    pub core_clock_hz: u32,
    /// Interrupt rate.
    pub tick_hz: u32,
    /// Counter clock.
    pub clock_source: SysTickClockSource,
    /// Raise the SysTick exception on wrap.
    pub interrupt: bool,
}

impl SysTickExpertConfig {
    /// Fastest tick rate.
    pub const MAX_TICK_HZ: u32 = 1_000_000;
    /// Largest value the 24-bit reload register holds.
    pub const MAX_RELOAD: u32 = 0x00FF_FFFF;

    /// 1 kHz tick from the core clock.
    pub const fn millisecond(core_clock_hz: u32) -> Self {
        Self {
            core_clock_hz,
            tick_hz: 1_000,
            clock_source: SysTickClockSource::Core,
            interrupt: true,
        }
    }

    /// 1 MHz tick from the core clock.
    pub const fn microsecond(core_clock_hz: u32) -> Self {
        Self {
            tick_hz: 1_000_000,
            ..Self::millisecond(core_clock_hz)
        }
    }

    /// Frequency reaching the counter.
    pub fn counter_clock_hz(&self) -> u32 {
        match self.clock_source {
            SysTickClockSource::Core => self.core_clock_hz,
            SysTickClockSource::CoreDiv8 => self.core_clock_hz.checked_div(8).unwrap_or(0),
        }
    }

    /// Reload register value (`counter clock / tick - 1`), `None` when the
    /// counter clock is slower than the tick.
    pub fn reload_value(&self) -> Option<u32> {
        self.counter_clock_hz()
            .checked_div(self.tick_hz)?
            .checked_sub(1)
    }
}

impl Validate for SysTickExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            (1..=Self::MAX_TICK_HZ).contains(&self.tick_hz),
            "Tick rate must be 1 Hz - 1 MHz",
        )?;
        rule(
            self.core_clock_hz >= self.tick_hz,
            "Core clock must be at least the tick rate",
        )?;
        rule(
            self.reload_value().is_some_and(|r| r <= Self::MAX_RELOAD),
            "Reload value exceeds 24 bits",
        )
    }
}

/// Hardware policy for the SysTick block.
pub trait SysTickHardware {
    /// Program reload and clock source, then enable the counter.
    fn start(&mut self, reload: u32, source: SysTickClockSource, interrupt: bool) -> HalResult<()>;

    /// Disable the counter.
    fn stop(&mut self) -> HalResult<()>;

    /// Current (down-counting) value.
    fn current(&self) -> u32;
}

/// Running SysTick.
pub struct SysTick<H> {
    hw: H,
    config: SysTickExpertConfig,
    reload: u32,
}

impl<H: SysTickHardware> SysTick<H> {
    /// Validate, compute the reload value and start the counter.
    pub fn start(mut hw: H, config: SysTickExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        let reload = config.reload_value().ok_or(ErrorCode::InvalidParameter)?;
        hw.start(reload, config.clock_source, config.interrupt)?;
        hal_debug!("systick at {} Hz, reload {}", config.tick_hz, reload);
        Ok(Self { hw, config, reload })
    }

    /// Applied configuration.
    pub fn config(&self) -> &SysTickExpertConfig {
        &self.config
    }

    /// Reload register value in use.
    pub fn reload(&self) -> u32 {
        self.reload
    }

    /// Counter ticks elapsed in the current period.
    pub fn elapsed_in_period(&self) -> u32 {
        self.reload.saturating_sub(self.hw.current())
    }

    /// Stop the counter and release the hardware policy.
    pub fn stop(mut self) -> HalResult<H> {
        self.hw.stop()?;
        Ok(self.hw)
    }
}
