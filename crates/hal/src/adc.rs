//! ADC channel configuration

use crate::error::{ErrorCode, HalResult};
use crate::types::PeripheralId;
use crate::validate::{rule, RuleResult, Validate};

/// Sampling window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleTime {
    /// Shortest window, low-impedance sources only.
    Short,
    /// Default window.
    #[default]
    Medium,
    /// Longest window, high-impedance sources.
    Long,
}

/// One ADC conversion setup.
///
/// # Rules (evaluated in order)
///
/// 1. channel 0–18
/// 2. resolution 6, 8, 10 or 12 bits
/// 3. oversampling ratio a power of two, at most 256
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcExpertConfig {
    /// ADC instance.
    pub peripheral: PeripheralId,
    /// Input channel.
    pub channel: u8,
    /// Resolution in bits.
    pub resolution: u8,
    /// Sampling window.
    pub sample_time: SampleTime,
    /// Oversampling ratio (1 disables).
    pub oversampling: u16,
    /// Free-running conversions.
    pub continuous: bool,
}

impl AdcExpertConfig {
    /// Highest channel index.
    pub const MAX_CHANNEL: u8 = 18;
    /// Highest oversampling ratio.
    pub const MAX_OVERSAMPLING: u16 = 256;

    /// 12-bit single conversions.
    pub const fn single_channel(peripheral: PeripheralId, channel: u8) -> Self {
        Self {
            peripheral,
            channel,
            resolution: 12,
            sample_time: SampleTime::Medium,
            oversampling: 1,
            continuous: false,
        }
    }

    /// 12-bit with 16× oversampling and a long sampling window.
    pub const fn high_resolution(peripheral: PeripheralId, channel: u8) -> Self {
        Self {
            sample_time: SampleTime::Long,
            oversampling: 16,
            ..Self::single_channel(peripheral, channel)
        }
    }

    /// 8-bit continuous conversions with the shortest window.
    pub const fn fast(peripheral: PeripheralId, channel: u8) -> Self {
        Self {
            resolution: 8,
            sample_time: SampleTime::Short,
            continuous: true,
            ..Self::single_channel(peripheral, channel)
        }
    }

    /// Full-scale raw reading, `None` for an unsupported resolution.
    pub fn max_value(&self) -> Option<u16> {
        match self.resolution {
            6 | 8 | 10 | 12 => 1u16
                .checked_shl(u32::from(self.resolution))
                .map(|v| v.saturating_sub(1)),
            _ => None,
        }
    }
}

impl Validate for AdcExpertConfig {
    fn check(&self) -> RuleResult {
        rule(
            self.channel <= Self::MAX_CHANNEL,
            "ADC channel out of range (0-18)",
        )?;
        rule(
            matches!(self.resolution, 6 | 8 | 10 | 12),
            "Resolution must be 6, 8, 10 or 12 bits",
        )?;
        rule(
            self.oversampling.is_power_of_two() && self.oversampling <= Self::MAX_OVERSAMPLING,
            "Oversampling ratio must be a power of two up to 256",
        )
    }
}

/// Hardware policy for one ADC instance.
pub trait AdcHardware {
    /// Program resolution, sampling window and channel selection.
    fn configure(&mut self, config: &AdcExpertConfig) -> HalResult<()>;

    /// Run one (possibly oversampled) conversion and return the raw result.
    fn convert(&mut self) -> HalResult<u16>;
}

/// Configured ADC channel.
pub struct Adc<H> {
    hw: H,
    config: AdcExpertConfig,
    max_value: u16,
}

impl<H: AdcHardware> Adc<H> {
    /// Validate and program the converter.
    pub fn new(mut hw: H, config: AdcExpertConfig) -> HalResult<Self> {
        config.ensure_valid()?;
        let max_value = config.max_value().ok_or(ErrorCode::InvalidParameter)?;
        hw.configure(&config)?;
        hal_debug!(
            "adc{} ch{} at {} bits",
            config.peripheral.index(),
            config.channel,
            config.resolution
        );
        Ok(Self {
            hw,
            config,
            max_value,
        })
    }

    /// Applied configuration.
    pub fn config(&self) -> &AdcExpertConfig {
        &self.config
    }

    /// Raw conversion result.
    pub fn read(&mut self) -> HalResult<u16> {
        let raw = self.hw.convert()?;
        if raw > self.max_value {
            return Err(ErrorCode::Overrun);
        }
        Ok(raw)
    }

    /// Conversion scaled to millivolts against `vref_mv`.
    pub fn read_millivolts(&mut self, vref_mv: u16) -> HalResult<u16> {
        let raw = self.read()?;
        let scaled = u32::from(raw)
            .checked_mul(u32::from(vref_mv))
            .and_then(|v| v.checked_div(u32::from(self.max_value)))
            .ok_or(ErrorCode::InvalidParameter)?;
        u16::try_from(scaled).map_err(|_| ErrorCode::Overrun)
    }

    /// Release the hardware policy.
    pub fn release(self) -> H {
        self.hw
    }
}
