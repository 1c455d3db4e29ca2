//! DMA configuration and transfer management
//!
//! [`DmaExpertConfig`] describes one channel programming; [`DmaTransfer`]
//! owns a channel policy through the configured → active → finished
//! sequence so a channel cannot be restarted while a transfer is in flight.

use crate::error::{ErrorCode, HalResult};
use crate::validate::{rule, RuleResult, Validate};

/// Transfer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaDirection {
    /// Memory buffer → peripheral data register
    MemoryToPeripheral,
    /// Peripheral data register → memory buffer
    PeripheralToMemory,
    /// Memory → memory copy
    MemoryToMemory,
}

/// Width of one transfer item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    /// 8-bit items
    #[default]
    Byte,
    /// 16-bit items
    HalfWord,
    /// 32-bit items
    Word,
}

impl DataWidth {
    /// Item size in bytes.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::HalfWord => 2,
            Self::Word => 4,
        }
    }
}

/// Arbitration priority between channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaPriority {
    /// Low
    #[default]
    Low,
    /// Medium
    Medium,
    /// High
    High,
    /// Very high
    VeryHigh,
}

/// One channel's programming.
///
/// Addresses are bus addresses; this crate never dereferences them.
///
/// # Rules (evaluated in order)
///
/// 1. channel 0–23
/// 2. transfer count > 0
/// 3. source address non-null
/// 4. destination address non-null
/// 5. circular mode not used for memory-to-memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaExpertConfig {
    /// Channel (stream) index.
    pub channel: u8,
    /// Transfer direction.
    pub direction: DmaDirection,
    /// Source bus address.
    pub source_addr: usize,
    /// Destination bus address.
    pub dest_addr: usize,
    /// Number of items to move.
    pub transfer_count: u32,
    /// Item width.
    pub data_width: DataWidth,
    /// Arbitration priority.
    pub priority: DmaPriority,
    /// Restart automatically at the end of the buffer.
    pub circular: bool,
    /// Advance the source address after each item.
    pub increment_source: bool,
    /// Advance the destination address after each item.
    pub increment_dest: bool,
}

impl DmaExpertConfig {
    /// Highest channel index.
    pub const MAX_CHANNEL: u8 = 23;

    /// Buffer → peripheral register, byte items.
    pub const fn memory_to_peripheral(
        channel: u8,
        buffer_addr: usize,
        peripheral_addr: usize,
        count: u32,
    ) -> Self {
        Self {
            channel,
            direction: DmaDirection::MemoryToPeripheral,
            source_addr: buffer_addr,
            dest_addr: peripheral_addr,
            transfer_count: count,
            data_width: DataWidth::Byte,
            priority: DmaPriority::Medium,
            circular: false,
            increment_source: true,
            increment_dest: false,
        }
    }

    /// Peripheral register → buffer, byte items.
    pub const fn peripheral_to_memory(
        channel: u8,
        peripheral_addr: usize,
        buffer_addr: usize,
        count: u32,
    ) -> Self {
        Self {
            channel,
            direction: DmaDirection::PeripheralToMemory,
            source_addr: peripheral_addr,
            dest_addr: buffer_addr,
            transfer_count: count,
            data_width: DataWidth::Byte,
            priority: DmaPriority::High,
            circular: false,
            increment_source: false,
            increment_dest: true,
        }
    }

    /// Word-wide memory copy.
    pub const fn memory_to_memory(channel: u8, source: usize, dest: usize, words: u32) -> Self {
        Self {
            channel,
            direction: DmaDirection::MemoryToMemory,
            source_addr: source,
            dest_addr: dest,
            transfer_count: words,
            data_width: DataWidth::Word,
            priority: DmaPriority::Low,
            circular: false,
            increment_source: true,
            increment_dest: true,
        }
    }

    /// Continuous reception into a ring buffer.
    pub const fn circular_receive(
        channel: u8,
        peripheral_addr: usize,
        buffer_addr: usize,
        count: u32,
    ) -> Self {
        Self {
            circular: true,
            priority: DmaPriority::VeryHigh,
            ..Self::peripheral_to_memory(channel, peripheral_addr, buffer_addr, count)
        }
    }

    /// Total bytes moved by one pass, `None` on overflow.
    pub fn total_bytes(&self) -> Option<u32> {
        self.transfer_count.checked_mul(self.data_width.bytes())
    }
}

impl Validate for DmaExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            self.channel <= Self::MAX_CHANNEL,
            "DMA channel out of range (0-23)",
        )?;
        rule(self.transfer_count > 0, "Transfer count cannot be zero")?;
        rule(self.source_addr != 0, "Source address cannot be null")?;
        rule(self.dest_addr != 0, "Destination address cannot be null")?;
        rule(
            !(self.circular && self.direction == DmaDirection::MemoryToMemory),
            "Circular mode not supported for memory-to-memory",
        )
    }
}

/// Hardware policy for one DMA channel.
pub trait DmaHardware {
    /// Program the channel; the channel stays idle.
    fn configure(&mut self, config: &DmaExpertConfig) -> HalResult<()>;

    /// Start the programmed transfer.
    fn start(&mut self) -> HalResult<()>;

    /// Stop the channel.
    fn stop(&mut self) -> HalResult<()>;

    /// True once the programmed count has been moved.
    fn is_complete(&self) -> bool;

    /// Items still to move.
    fn remaining(&self) -> u32;
}

/// A validated, programmed, not yet started transfer.
#[derive(Debug)]
pub struct DmaTransfer<C> {
    channel: C,
    config: DmaExpertConfig,
}

impl<C: DmaHardware> DmaTransfer<C> {
    /// Validate `config` and program it into `channel`.
    pub fn new(mut channel: C, config: DmaExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        channel.configure(&config)?;
        hal_trace!(
            "dma channel {} programmed for {} items",
            config.channel,
            config.transfer_count
        );
        Ok(Self { channel, config })
    }

    /// Programmed configuration.
    pub fn config(&self) -> &DmaExpertConfig {
        &self.config
    }

    /// Start the transfer
    pub fn start(mut self) -> HalResult<DmaTransferActive<C>> {
        self.channel.start()?;
        Ok(DmaTransferActive {
            channel: self.channel,
            config: self.config,
        })
    }

    /// Give the channel back without starting.
    pub fn release(self) -> C {
        self.channel
    }
}

/// Active DMA transfer
#[derive(Debug)]
pub struct DmaTransferActive<C> {
    channel: C,
    config: DmaExpertConfig,
}

impl<C: DmaHardware> DmaTransferActive<C> {
    /// Spin until the channel reports completion, then stop it.
    ///
    /// On failure the still-owned transfer comes back with the error.
    /// Circular transfers never complete: they return `NotSupported`
    /// immediately, still running, and must be ended with
    /// [`abort`](Self::abort).
    pub fn wait(mut self) -> Result<C, (ErrorCode, Self)> {
        if self.config.circular {
            return Err((ErrorCode::NotSupported, self));
        }
        while !self.channel.is_complete() {
            core::hint::spin_loop();
        }
        match self.channel.stop() {
            Ok(()) => Ok(self.channel),
            Err(e) => Err((e, self)),
        }
    }

    /// Stop the transfer early.
    pub fn abort(mut self) -> HalResult<C> {
        self.channel.stop()?;
        Ok(self.channel)
    }

    /// Check if complete without blocking
    pub fn is_complete(&self) -> bool {
        self.channel.is_complete()
    }

    /// Items moved so far.
    pub fn transferred(&self) -> u32 {
        self.config
            .transfer_count
            .saturating_sub(self.channel.remaining())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::mocks::MockDmaChannel;

    const BUF: usize = 0x2400_0000;
    const PERIPH: usize = 0x4001_3828;

    #[test]
    fn zero_count_rejected_before_null_address() {
        let cfg = DmaExpertConfig {
            transfer_count: 0,
            source_addr: 0,
            ..DmaExpertConfig::memory_to_peripheral(1, BUF, PERIPH, 16)
        };
        assert_eq!(cfg.error_message(), "Transfer count cannot be zero");
    }

    #[test]
    fn channel_range_is_0_to_23() {
        let ok = DmaExpertConfig::memory_to_peripheral(23, BUF, PERIPH, 1);
        assert!(ok.is_valid());
        let bad = DmaExpertConfig { channel: 24, ..ok };
        assert_eq!(bad.error_message(), "DMA channel out of range (0-23)");
    }

    #[test]
    fn null_addresses_rejected() {
        let cfg = DmaExpertConfig::peripheral_to_memory(2, PERIPH, 0, 8);
        assert_eq!(cfg.error_message(), "Destination address cannot be null");
        let cfg = DmaExpertConfig::peripheral_to_memory(2, 0, BUF, 8);
        assert_eq!(cfg.error_message(), "Source address cannot be null");
    }

    #[test]
    fn circular_memory_copy_rejected() {
        let cfg = DmaExpertConfig {
            circular: true,
            ..DmaExpertConfig::memory_to_memory(0, BUF, BUF + 0x100, 64)
        };
        assert_eq!(
            cfg.error_message(),
            "Circular mode not supported for memory-to-memory"
        );
    }

    #[test]
    fn total_bytes_accounts_for_width() {
        let cfg = DmaExpertConfig::memory_to_memory(0, BUF, BUF + 0x100, 64);
        assert_eq!(cfg.total_bytes(), Some(256));
    }

    #[test]
    fn transfer_runs_to_completion() {
        let cfg = DmaExpertConfig::memory_to_peripheral(3, BUF, PERIPH, 4);
        let transfer = DmaTransfer::new(MockDmaChannel::new(), cfg).unwrap();
        let active = transfer.start().unwrap();
        assert_eq!(active.transferred(), 4);
        let channel = active.wait().unwrap();
        assert_eq!(channel.starts(), 1);
        assert!(!channel.is_running());
    }

    #[test]
    fn invalid_config_never_programs_channel() {
        let cfg = DmaExpertConfig::memory_to_peripheral(30, BUF, PERIPH, 4);
        assert_eq!(
            DmaTransfer::new(MockDmaChannel::new(), cfg).err(),
            Some(ErrorCode::InvalidParameter)
        );
    }

    #[test]
    fn circular_transfer_cannot_be_awaited() {
        let cfg = DmaExpertConfig::circular_receive(5, PERIPH, BUF, 64);
        let active = DmaTransfer::new(MockDmaChannel::new(), cfg)
            .unwrap()
            .start()
            .unwrap();
        let Err((err, active)) = active.wait() else {
            panic!("circular transfer completed");
        };
        assert_eq!(err, ErrorCode::NotSupported);

        let channel = active.abort().unwrap();
        assert!(!channel.is_running());
        assert_eq!(channel.starts(), 1);
    }
}
