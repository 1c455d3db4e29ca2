//! PWM channel configuration

use crate::error::{ErrorCode, HalResult};
use crate::validate::{rule, RuleResult, Validate};

/// Output polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmPolarity {
    /// Output high during the duty portion.
    #[default]
    ActiveHigh,
    /// Output low during the duty portion.
    ActiveLow,
}

/// One PWM output channel.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmExpertConfig {
    /// Timer channel (0–3).
    pub channel: u8,
    /// Output frequency in Hz.
    pub frequency_hz: u32,
    /// Duty cycle in percent (0.0–100.0).
    pub duty_percent: f32,
    /// Output polarity.
    pub polarity: PwmPolarity,
}

impl PwmExpertConfig {
    /// Highest channel index.
    pub const MAX_CHANNEL: u8 = 3;
    /// Highest output frequency.
    pub const MAX_FREQUENCY_HZ: u32 = 100_000_000;

    /// 1 kHz at 50 %: flicker-free LED brightness.
    pub fn led_dimming(channel: u8) -> Self {
        Self::custom(channel, 1_000, 50.0)
    }

    /// Hobby servo: 50 Hz frame, 1.5 ms pulse (7.5 %) = centre position.
    pub fn servo_motor(channel: u8) -> Self {
        Self::custom(channel, 50, 7.5)
    }

    /// 20 kHz (above audible), starting stopped.
    pub fn motor_control(channel: u8) -> Self {
        Self::custom(channel, 20_000, 0.0)
    }

    /// Explicit frequency and duty, active-high.
    pub fn custom(channel: u8, frequency_hz: u32, duty_percent: f32) -> Self {
        Self {
            channel,
            frequency_hz,
            duty_percent,
            polarity: PwmPolarity::ActiveHigh,
        }
    }

    /// Auto-reload value for a timer counting at `timer_hz`.
    pub fn period_ticks(&self, timer_hz: u32) -> Option<u32> {
        timer_hz.checked_div(self.frequency_hz)
    }

    /// Compare value producing `duty_percent` at `timer_hz`.
    pub fn compare_ticks(&self, timer_hz: u32) -> Option<u32> {
        let period = self.period_ticks(timer_hz)?;
        compare_for(period, self.duty_percent)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Safety: duty is range-checked to 0–100, so the product is within 0..=period
fn compare_for(period: u32, duty_percent: f32) -> Option<u32> {
    if !(0.0..=100.0).contains(&duty_percent) {
        return None;
    }
    let ticks = f64::from(period) * f64::from(duty_percent) / 100.0;
    Some(ticks as u32)
}

impl Validate for PwmExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            self.channel <= Self::MAX_CHANNEL,
            "PWM channel out of range (0-3)",
        )?;
        rule(
            (1..=Self::MAX_FREQUENCY_HZ).contains(&self.frequency_hz),
            "Frequency must be 1 Hz - 100 MHz",
        )?;
        rule(
            (0.0..=100.0).contains(&self.duty_percent),
            "Duty cycle must be 0-100%",
        )
    }
}

/// Hardware policy for one timer's PWM outputs.
pub trait PwmHardware {
    /// Counter clock of the timer driving the channels.
    fn timer_clock_hz(&self) -> u32;

    /// Program period, compare and polarity for `channel`.
    fn configure(
        &mut self,
        channel: u8,
        period: u32,
        compare: u32,
        polarity: PwmPolarity,
    ) -> HalResult<()>;

    /// Update only the compare register.
    fn set_compare(&mut self, channel: u8, compare: u32) -> HalResult<()>;

    /// Enable or disable the output.
    fn set_enabled(&mut self, channel: u8, enabled: bool) -> HalResult<()>;
}

/// Configured PWM output.
pub struct Pwm<H> {
    hw: H,
    config: PwmExpertConfig,
    period: u32,
}

impl<H: PwmHardware> Pwm<H> {
    /// Validate, compute tick values from the timer clock, program the channel.
    pub fn new(mut hw: H, config: PwmExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        let timer_hz = hw.timer_clock_hz();
        let period = config
            .period_ticks(timer_hz)
            .filter(|p| *p > 0)
            .ok_or(ErrorCode::NotSupported)?;
        let compare = config
            .compare_ticks(timer_hz)
            .ok_or(ErrorCode::InvalidParameter)?;
        hw.configure(config.channel, period, compare, config.polarity)?;
        hal_debug!(
            "pwm ch{} at {} Hz, period {} ticks",
            config.channel,
            config.frequency_hz,
            period
        );
        Ok(Self { hw, config, period })
    }

    /// Applied configuration.
    pub fn config(&self) -> &PwmExpertConfig {
        &self.config
    }

    /// Auto-reload value in use.
    pub fn period_ticks(&self) -> u32 {
        self.period
    }

    /// Change the duty cycle without touching the period.
    pub fn set_duty(&mut self, duty_percent: f32) -> HalResult<()> {
        let candidate = PwmExpertConfig {
            duty_percent,
            ..self.config
        };
        candidate.ensure_valid()?;
        let compare = compare_for(self.period, duty_percent).ok_or(ErrorCode::InvalidParameter)?;
        self.hw.set_compare(self.config.channel, compare)?;
        self.config = candidate;
        Ok(())
    }

    /// Start driving the output.
    pub fn enable(&mut self) -> HalResult<()> {
        self.hw.set_enabled(self.config.channel, true)
    }

    /// Stop driving the output.
    pub fn disable(&mut self) -> HalResult<()> {
        self.hw.set_enabled(self.config.channel, false)
    }

    /// Release the hardware policy.
    pub fn release(self) -> H {
        self.hw
    }
}
