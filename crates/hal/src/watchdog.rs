//! Independent / window watchdog configuration

use crate::error::HalResult;
use crate::validate::{rule, RuleResult, Validate};

/// Watchdog timing.
///
/// A non-zero `window_ms` turns on window mode: feeding earlier than
/// `timeout_ms - window_ms` after the previous feed also resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogExpertConfig {
    /// Reset after this long without a feed.
    pub timeout_ms: u32,
    /// Window length (0 disables window mode).
    pub window_ms: u32,
    /// Freeze the counter while a debugger halts the core.
    pub pause_in_debug: bool,
}

impl WatchdogExpertConfig {
    /// Longest supported timeout.
    pub const MAX_TIMEOUT_MS: u32 = 60_000;

    /// 1 s timeout.
    pub const fn standard() -> Self {
        Self::custom(1_000)
    }

    /// 10 s timeout, for boot phases with slow flash or SD init.
    pub const fn long_timeout() -> Self {
        Self::custom(10_000)
    }

    /// Window mode.
    pub const fn windowed(timeout_ms: u32, window_ms: u32) -> Self {
        Self {
            window_ms,
            ..Self::custom(timeout_ms)
        }
    }

    /// Explicit timeout, no window.
    pub const fn custom(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            window_ms: 0,
            pause_in_debug: true,
        }
    }

    /// Window mode enabled.
    pub const fn is_windowed(&self) -> bool {
        self.window_ms != 0
    }
}

impl Validate for WatchdogExpertConfig {
    fn check(&self) -> RuleResult {
        rule(self.timeout_ms != 0, "Timeout cannot be zero")?;
        rule(
            self.timeout_ms <= Self::MAX_TIMEOUT_MS,
            "Timeout exceeds maximum (60000 ms)",
        )?;
        rule(
            self.window_ms < self.timeout_ms,
            "Window must be shorter than timeout",
        )
    }
}

/// Hardware policy for the watchdog peripheral.
pub trait WatchdogHardware {
    /// Program the timeout and start counting. Cannot be undone.
    fn start(&mut self, config: &WatchdogExpertConfig) -> HalResult<()>;

    /// Reload the counter.
    fn feed(&mut self);
}

/// Running watchdog.
pub struct Watchdog<H> {
    hw: H,
    config: WatchdogExpertConfig,
}

impl<H: WatchdogHardware> Watchdog<H> {
    /// Validate and start the watchdog.
    pub fn start(mut hw: H, config: WatchdogExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        hw.start(&config)?;
        hal_debug!("watchdog started, timeout {} ms", config.timeout_ms);
        Ok(Self { hw, config })
    }

    /// Applied configuration.
    pub fn config(&self) -> &WatchdogExpertConfig {
        &self.config
    }

    /// Reload the counter.
    pub fn feed(&mut self) {
        self.hw.feed();
    }
}
