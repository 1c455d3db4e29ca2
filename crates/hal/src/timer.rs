//! General-purpose timer configuration

use crate::error::HalResult;
use crate::validate::{rule, RuleResult, Validate};

/// Counter behaviour at the end of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerMode {
    /// Reload and keep counting.
    #[default]
    Periodic,
    /// Stop after the first update event.
    OneShot,
}

/// One timer instance.
///
/// The counter ticks at `input_clock_hz / (prescaler + 1)` and raises an
/// update event every `period` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerExpertConfig {
    /// Timer index (TIM1 = 0 … TIM14 = 13).
    pub index: u8,
    /// Kernel clock feeding the prescaler.
    pub input_clock_hz: u32,
    /// Prescaler register value (divide by `prescaler + 1`).
    pub prescaler: u16,
    /// Ticks per update event.
    pub period: u32,
    /// Periodic or one-shot.
    pub mode: TimerMode,
    /// Raise the update interrupt.
    pub interrupt: bool,
}

impl TimerExpertConfig {
    /// Highest timer index.
    pub const MAX_INDEX: u8 = 13;

    const MS_TICK_HZ: u32 = 10_000;
    const TICKS_PER_MS: u32 = 10;
    const US_TICK_HZ: u32 = 1_000_000;

    /// Periodic update every `ms` milliseconds (10 kHz tick).
    pub fn periodic_ms(index: u8, input_clock_hz: u32, ms: u32) -> Self {
        Self {
            index,
            input_clock_hz,
            prescaler: prescaler_for(input_clock_hz, Self::MS_TICK_HZ),
            period: ms.saturating_mul(Self::TICKS_PER_MS),
            mode: TimerMode::Periodic,
            interrupt: true,
        }
    }

    /// Single update after `us` microseconds (1 MHz tick).
    pub fn one_shot_us(index: u8, input_clock_hz: u32, us: u32) -> Self {
        Self {
            index,
            input_clock_hz,
            prescaler: prescaler_for(input_clock_hz, Self::US_TICK_HZ),
            period: us,
            mode: TimerMode::OneShot,
            interrupt: true,
        }
    }

    /// Counter tick rate.
    pub fn tick_hz(&self) -> u32 {
        self.input_clock_hz
            .checked_div(u32::from(self.prescaler).saturating_add(1))
            .unwrap_or(0)
    }

    /// Update-event rate, `None` for a zero period.
    pub fn frequency_hz(&self) -> Option<u32> {
        self.tick_hz().checked_div(self.period)
    }
}

/// Prescaler register value that brings `input_hz` down to `tick_hz`,
/// saturating at the register width.
fn prescaler_for(input_hz: u32, tick_hz: u32) -> u16 {
    let divide = input_hz.checked_div(tick_hz).unwrap_or(1).max(1);
    u16::try_from(divide.saturating_sub(1)).unwrap_or(u16::MAX)
}

impl Validate for TimerExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            self.index <= Self::MAX_INDEX,
            "Timer index out of range (0-13)",
        )?;
        rule(self.period != 0, "Period cannot be zero")
    }
}

/// Hardware policy for one timer.
pub trait TimerHardware {
    /// Program prescaler, period and mode; the counter stays stopped.
    fn configure(&mut self, config: &TimerExpertConfig) -> HalResult<()>;

    /// Start counting.
    fn start(&mut self) -> HalResult<()>;

    /// Stop counting.
    fn stop(&mut self) -> HalResult<()>;

    /// Current counter value.
    fn counter(&self) -> u32;

    /// Read and clear the update flag.
    fn take_update(&mut self) -> bool;
}

/// Configured timer.
pub struct Timer<H> {
    hw: H,
    config: TimerExpertConfig,
}

impl<H: TimerHardware> Timer<H> {
    /// Validate and program the timer.
    pub fn new(mut hw: H, config: TimerExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        hw.configure(&config)?;
        hal_debug!(
            "timer{} period {} ticks at {} Hz",
            config.index,
            config.period,
            config.tick_hz()
        );
        Ok(Self { hw, config })
    }

    /// Applied configuration.
    pub fn config(&self) -> &TimerExpertConfig {
        &self.config
    }

    /// Start counting.
    pub fn start(&mut self) -> HalResult<()> {
        self.hw.start()
    }

    /// Stop counting.
    pub fn stop(&mut self) -> HalResult<()> {
        self.hw.stop()
    }

    /// Current counter value.
    pub fn counter(&self) -> u32 {
        self.hw.counter()
    }

    /// True once per elapsed period (clears the flag).
    pub fn poll_elapsed(&mut self) -> bool {
        self.hw.take_update()
    }

    /// Release the hardware policy.
    pub fn release(self) -> H {
        self.hw
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::mocks::MockTimer;

    #[test]
    fn periodic_ms_at_84mhz() {
        let cfg = TimerExpertConfig::periodic_ms(1, 84_000_000, 250);
        assert_eq!(cfg.prescaler, 8_399);
        assert_eq!(cfg.period, 2_500);
        assert_eq!(cfg.tick_hz(), 10_000);
        assert_eq!(cfg.frequency_hz(), Some(4));
    }

    #[test]
    fn one_shot_us_uses_microsecond_tick() {
        let cfg = TimerExpertConfig::one_shot_us(5, 240_000_000, 100);
        assert_eq!(cfg.tick_hz(), 1_000_000);
        assert_eq!(cfg.mode, TimerMode::OneShot);
        assert_eq!(cfg.frequency_hz(), Some(10_000));
    }

    #[test]
    fn prescaler_saturates() {
        let cfg = TimerExpertConfig::periodic_ms(0, u32::MAX, 1);
        assert_eq!(cfg.prescaler, u16::MAX);
    }

    #[test]
    fn rules_in_order() {
        let cfg = TimerExpertConfig {
            index: 14,
            period: 0,
            ..TimerExpertConfig::periodic_ms(0, 84_000_000, 1)
        };
        assert_eq!(cfg.error_message(), "Timer index out of range (0-13)");
        let cfg = TimerExpertConfig { index: 13, ..cfg };
        assert_eq!(cfg.error_message(), "Period cannot be zero");
        assert_eq!(cfg.frequency_hz(), None);
    }

    #[test]
    fn zero_ms_preset_rejected() {
        let r = Timer::new(
            MockTimer::new(),
            TimerExpertConfig::periodic_ms(2, 84_000_000, 0),
        );
        assert_eq!(r.err(), Some(ErrorCode::InvalidParameter));
    }

    #[test]
    fn elapsed_flag_is_cleared_on_poll() {
        let mut t = Timer::new(
            MockTimer::new(),
            TimerExpertConfig::periodic_ms(2, 84_000_000, 10),
        )
        .unwrap();
        t.start().unwrap();
        assert!(!t.poll_elapsed());
        t.hw.fire();
        assert!(t.poll_elapsed());
        assert!(!t.poll_elapsed());
    }
}
