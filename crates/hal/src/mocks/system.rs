//! Mocks for the Expert-only peripherals

use crate::adc::{AdcExpertConfig, AdcHardware};
use crate::clock::{ClockExpertConfig, ClockHardware};
use crate::dma::{DmaExpertConfig, DmaHardware};
use crate::error::HalResult;
use crate::interrupt::InterruptHardware;
use crate::pwm::{PwmHardware, PwmPolarity};
use crate::systick::{SysTickClockSource, SysTickHardware};
use crate::timer::{TimerExpertConfig, TimerHardware};
use crate::watchdog::{WatchdogExpertConfig, WatchdogHardware};

/// Mock DMA channel
///
/// Transfers complete as soon as they start.
#[derive(Debug, Default)]
pub struct MockDmaChannel {
    config: Option<DmaExpertConfig>,
    running: bool,
    starts: usize,
}

impl MockDmaChannel {
    /// Create new mock DMA channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `start` calls.
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Channel enabled and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last programmed descriptor.
    pub fn config(&self) -> Option<&DmaExpertConfig> {
        self.config.as_ref()
    }
}

impl DmaHardware for MockDmaChannel {
    fn configure(&mut self, config: &DmaExpertConfig) -> HalResult<()> {
        self.config = Some(*config);
        Ok(())
    }

    fn start(&mut self) -> HalResult<()> {
        self.running = true;
        self.starts = self.starts.saturating_add(1);
        Ok(())
    }

    fn stop(&mut self) -> HalResult<()> {
        self.running = false;
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.starts > 0
    }

    fn remaining(&self) -> u32 {
        if self.starts > 0 {
            0
        } else {
            self.config.map(|c| c.transfer_count).unwrap_or(0)
        }
    }
}

/// Mock clock controller
#[derive(Debug, Default)]
pub struct MockClock {
    applied: usize,
    last: Option<ClockExpertConfig>,
}

impl MockClock {
    /// Create new mock clock controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clock tree reprogrammings.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Last applied configuration.
    pub fn last(&self) -> Option<&ClockExpertConfig> {
        self.last.as_ref()
    }
}

impl ClockHardware for MockClock {
    fn apply(&mut self, config: &ClockExpertConfig) -> HalResult<()> {
        self.applied = self.applied.saturating_add(1);
        self.last = Some(*config);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct PwmChannel {
    period: u32,
    compare: u32,
    polarity: PwmPolarity,
    enabled: bool,
}

/// Mock PWM timer with four channels
#[derive(Debug)]
pub struct MockPwm {
    timer_hz: u32,
    channels: [Option<PwmChannel>; 4],
}

impl MockPwm {
    /// Create a mock timer clocked at `timer_hz`.
    pub fn new(timer_hz: u32) -> Self {
        Self {
            timer_hz,
            channels: [None; 4],
        }
    }

    /// Compare value of `channel`, if configured.
    pub fn compare(&self, channel: u8) -> Option<u32> {
        self.channel(channel).map(|c| c.compare)
    }

    /// Period of `channel`, if configured.
    pub fn period(&self, channel: u8) -> Option<u32> {
        self.channel(channel).map(|c| c.period)
    }

    /// Polarity of `channel`, if configured.
    pub fn polarity(&self, channel: u8) -> Option<PwmPolarity> {
        self.channel(channel).map(|c| c.polarity)
    }

    /// Output enabled.
    pub fn is_enabled(&self, channel: u8) -> bool {
        self.channel(channel).is_some_and(|c| c.enabled)
    }

    fn channel(&self, channel: u8) -> Option<&PwmChannel> {
        self.channels.get(usize::from(channel))?.as_ref()
    }

    fn channel_mut(&mut self, channel: u8) -> HalResult<&mut PwmChannel> {
        self.channels
            .get_mut(usize::from(channel))
            .and_then(Option::as_mut)
            .ok_or(crate::error::ErrorCode::InvalidParameter)
    }
}

impl PwmHardware for MockPwm {
    fn timer_clock_hz(&self) -> u32 {
        self.timer_hz
    }

    fn configure(
        &mut self,
        channel: u8,
        period: u32,
        compare: u32,
        polarity: PwmPolarity,
    ) -> HalResult<()> {
        let slot = self
            .channels
            .get_mut(usize::from(channel))
            .ok_or(crate::error::ErrorCode::InvalidParameter)?;
        *slot = Some(PwmChannel {
            period,
            compare,
            polarity,
            enabled: false,
        });
        Ok(())
    }

    fn set_compare(&mut self, channel: u8, compare: u32) -> HalResult<()> {
        self.channel_mut(channel)?.compare = compare;
        Ok(())
    }

    fn set_enabled(&mut self, channel: u8, enabled: bool) -> HalResult<()> {
        self.channel_mut(channel)?.enabled = enabled;
        Ok(())
    }
}

/// Mock general-purpose timer
#[derive(Debug, Default)]
pub struct MockTimer {
    config: Option<TimerExpertConfig>,
    running: bool,
    counter: u32,
    update_pending: bool,
}

impl MockTimer {
    /// Create new mock timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a counter overflow.
    pub fn fire(&mut self) {
        if self.running {
            self.update_pending = true;
        }
    }

    /// Set the value returned by `counter`.
    pub fn set_counter(&mut self, counter: u32) {
        self.counter = counter;
    }

    /// Counter enabled.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last programmed configuration.
    pub fn config(&self) -> Option<&TimerExpertConfig> {
        self.config.as_ref()
    }
}

impl TimerHardware for MockTimer {
    fn configure(&mut self, config: &TimerExpertConfig) -> HalResult<()> {
        self.config = Some(*config);
        self.counter = 0;
        Ok(())
    }

    fn start(&mut self) -> HalResult<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> HalResult<()> {
        self.running = false;
        Ok(())
    }

    fn counter(&self) -> u32 {
        self.counter
    }

    fn take_update(&mut self) -> bool {
        core::mem::take(&mut self.update_pending)
    }
}

/// Mock ADC returning a fixed sample
#[derive(Debug)]
pub struct MockAdc {
    sample: u16,
    conversions: usize,
}

impl MockAdc {
    /// Every conversion returns `sample`.
    pub fn new(sample: u16) -> Self {
        Self {
            sample,
            conversions: 0,
        }
    }

    /// Change the returned sample.
    pub fn set_sample(&mut self, sample: u16) {
        self.sample = sample;
    }

    /// Number of conversions run.
    pub fn conversions(&self) -> usize {
        self.conversions
    }
}

impl AdcHardware for MockAdc {
    fn configure(&mut self, _config: &AdcExpertConfig) -> HalResult<()> {
        Ok(())
    }

    fn convert(&mut self) -> HalResult<u16> {
        self.conversions = self.conversions.saturating_add(1);
        Ok(self.sample)
    }
}

/// Mock watchdog
#[derive(Debug, Default)]
pub struct MockWatchdog {
    started: Option<WatchdogExpertConfig>,
    feeds: usize,
}

impl MockWatchdog {
    /// Create new mock watchdog
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of feeds.
    pub fn feeds(&self) -> usize {
        self.feeds
    }

    /// Configuration the watchdog was started with.
    pub fn started(&self) -> Option<&WatchdogExpertConfig> {
        self.started.as_ref()
    }
}

impl WatchdogHardware for MockWatchdog {
    fn start(&mut self, config: &WatchdogExpertConfig) -> HalResult<()> {
        self.started = Some(*config);
        Ok(())
    }

    fn feed(&mut self) {
        self.feeds = self.feeds.saturating_add(1);
    }
}

/// Mock SysTick
///
/// The counter never moves: `current` stays at the reload value.
#[derive(Debug, Default)]
pub struct MockSysTick {
    reload: Option<u32>,
    source: SysTickClockSource,
    running: bool,
}

impl MockSysTick {
    /// Create new mock SysTick
    pub fn new() -> Self {
        Self::default()
    }

    /// Programmed reload value.
    pub fn reload(&self) -> Option<u32> {
        self.reload
    }

    /// Programmed clock source.
    pub fn source(&self) -> SysTickClockSource {
        self.source
    }

    /// Counter enabled.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl SysTickHardware for MockSysTick {
    fn start(&mut self, reload: u32, source: SysTickClockSource, _interrupt: bool) -> HalResult<()> {
        self.reload = Some(reload);
        self.source = source;
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> HalResult<()> {
        self.running = false;
        Ok(())
    }

    fn current(&self) -> u32 {
        self.reload.unwrap_or(0)
    }
}

/// Mock interrupt controller
#[derive(Debug, Default)]
pub struct MockInterrupt {
    lines: heapless::LinearMap<u16, (u8, bool), 16>,
}

impl MockInterrupt {
    /// Create new mock interrupt controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Priority byte written for `irq`.
    pub fn priority(&self, irq: u16) -> Option<u8> {
        self.lines.get(&irq).map(|(priority, _)| *priority)
    }

    /// Line unmasked.
    pub fn is_enabled(&self, irq: u16) -> bool {
        self.lines.get(&irq).is_some_and(|(_, enabled)| *enabled)
    }

    fn line(&mut self, irq: u16) -> HalResult<&mut (u8, bool)> {
        if !self.lines.contains_key(&irq) {
            let _ = self.lines.insert(irq, (0, false));
        }
        self.lines
            .get_mut(&irq)
            .ok_or(crate::error::ErrorCode::HardwareFault)
    }
}

impl InterruptHardware for MockInterrupt {
    fn set_priority(&mut self, irq: u16, priority: u8) -> HalResult<()> {
        self.line(irq)?.0 = priority;
        Ok(())
    }

    fn enable(&mut self, irq: u16) -> HalResult<()> {
        self.line(irq)?.1 = true;
        Ok(())
    }

    fn disable(&mut self, irq: u16) -> HalResult<()> {
        self.line(irq)?.1 = false;
        Ok(())
    }
}
