//! NVIC line configuration
//!
//! Lower numbers mean higher urgency. The preempt priority decides nesting;
//! the sub priority only orders pending interrupts at equal preempt level.

use crate::error::HalResult;
use crate::validate::{rule, RuleResult, Validate};

/// One interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptExpertConfig {
    /// IRQ number (position in the vector table after the system exceptions).
    pub irq: u16,
    /// Preempt priority (0–15).
    pub preempt_priority: u8,
    /// Sub priority (0–15).
    pub sub_priority: u8,
    /// Enable the line once configured.
    pub enabled: bool,
}

impl InterruptExpertConfig {
    /// Highest IRQ number.
    pub const MAX_IRQ: u16 = 239;
    /// Lowest urgency value.
    pub const MAX_PRIORITY: u8 = 15;

    /// Middle preempt level.
    pub const fn default_priority(irq: u16) -> Self {
        Self {
            irq,
            preempt_priority: 8,
            sub_priority: 0,
            enabled: true,
        }
    }

    /// Most urgent level.
    pub const fn high_priority(irq: u16) -> Self {
        Self {
            preempt_priority: 0,
            ..Self::default_priority(irq)
        }
    }

    /// Least urgent level.
    pub const fn low_priority(irq: u16) -> Self {
        Self {
            preempt_priority: Self::MAX_PRIORITY,
            ..Self::default_priority(irq)
        }
    }

    /// Priority byte with preempt in the upper nibble, sub in the lower.
    pub const fn packed_priority(&self) -> u8 {
        self.preempt_priority.wrapping_shl(4) | (self.sub_priority & 0x0F)
    }
}

impl Validate for InterruptExpertConfig {
    fn check(&self) -> RuleResult {
        rule(self.irq <= Self::MAX_IRQ, "IRQ number out of range (0-239)")?;
        rule(
            self.preempt_priority <= Self::MAX_PRIORITY,
            "Preempt priority must be 0-15",
        )?;
        rule(
            self.sub_priority <= Self::MAX_PRIORITY,
            "Sub priority must be 0-15",
        )
    }
}

/// Hardware policy for the interrupt controller.
pub trait InterruptHardware {
    /// Write the priority byte for `irq`.
    fn set_priority(&mut self, irq: u16, priority: u8) -> HalResult<()>;

    /// Unmask `irq`.
    fn enable(&mut self, irq: u16) -> HalResult<()>;

    /// Mask `irq`.
    fn disable(&mut self, irq: u16) -> HalResult<()>;
}

/// Configured interrupt line.
pub struct Interrupt<H> {
    hw: H,
    config: InterruptExpertConfig,
}

impl<H: InterruptHardware> Interrupt<H> {
    /// Validate, set the priority, and unmask if `enabled`.
    pub fn new(mut hw: H, config: InterruptExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        hw.set_priority(config.irq, config.packed_priority())?;
        if config.enabled {
            hw.enable(config.irq)?;
        }
        hal_debug!(
            "irq {} priority {}/{}",
            config.irq,
            config.preempt_priority,
            config.sub_priority
        );
        Ok(Self { hw, config })
    }

    /// Applied configuration.
    pub fn config(&self) -> &InterruptExpertConfig {
        &self.config
    }

    /// Unmask the line.
    pub fn enable(&mut self) -> HalResult<()> {
        self.hw.enable(self.config.irq)?;
        self.config.enabled = true;
        Ok(())
    }

    /// Mask the line.
    pub fn disable(&mut self) -> HalResult<()> {
        self.hw.disable(self.config.irq)?;
        self.config.enabled = false;
        Ok(())
    }

    /// Release the hardware policy.
    pub fn release(self) -> H {
        self.hw
    }
}
