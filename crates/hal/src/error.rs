//! Error plumbing shared by every peripheral family.

use thiserror_no_std::Error;

/// Result type returned by every primitive, derived operation and finalizer.
pub type HalResult<T> = Result<T, ErrorCode>;

/// Categorized failure reasons.
///
/// The categories map onto four sources of failure:
///
/// | Source                  | Variants                                          |
/// |-------------------------|---------------------------------------------------|
/// | Parameter validity      | [`InvalidParameter`](Self::InvalidParameter)      |
/// | Capability absent       | [`NotSupported`](Self::NotSupported)              |
/// | Hardware / runtime      | `Timeout`, `Busy`, NACKs, `ArbitrationLost`, `BusError`, `Overrun`, `Incomplete`, `HardwareFault` |
/// | Unfinished platform code| [`NotImplemented`](Self::NotImplemented)          |
///
/// Derived operations return the first primitive error verbatim; nothing in
/// this crate retries or re-maps a policy error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// A configuration value or argument broke a validity rule.
    #[error("invalid parameter")]
    InvalidParameter,
    /// The operation is structurally unavailable for this handle's
    /// configuration (e.g. `receive` on a transmit-only SPI handle).
    #[error("operation not supported by this configuration")]
    NotSupported,
    /// The hardware did not respond in time.
    #[error("operation timed out")]
    Timeout,
    /// The peripheral is busy with a previous operation.
    #[error("peripheral busy")]
    Busy,
    /// No device acknowledged the bus address.
    #[error("address not acknowledged")]
    AddressNack,
    /// The device stopped acknowledging data bytes.
    #[error("data not acknowledged")]
    DataNack,
    /// Another bus master won arbitration.
    #[error("bus arbitration lost")]
    ArbitrationLost,
    /// Misplaced start/stop or other bus protocol violation.
    #[error("bus error")]
    BusError,
    /// Received data was lost because it was not read in time.
    #[error("receive overrun")]
    Overrun,
    /// Fewer bytes were transferred than requested.
    #[error("transfer incomplete")]
    Incomplete,
    /// The platform policy has no implementation for this operation yet.
    #[error("not implemented")]
    NotImplemented,
    /// Any other hardware-reported failure.
    #[error("hardware fault")]
    HardwareFault,
}

impl ErrorCode {
    /// Short static name, suitable for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameter => "InvalidParameter",
            Self::NotSupported => "NotSupported",
            Self::Timeout => "Timeout",
            Self::Busy => "Busy",
            Self::AddressNack => "AddressNack",
            Self::DataNack => "DataNack",
            Self::ArbitrationLost => "ArbitrationLost",
            Self::BusError => "BusError",
            Self::Overrun => "Overrun",
            Self::Incomplete => "Incomplete",
            Self::NotImplemented => "NotImplemented",
            Self::HardwareFault => "HardwareFault",
        }
    }

    /// True for errors raised by configuration checks rather than hardware.
    pub const fn is_configuration_error(self) -> bool {
        matches!(self, Self::InvalidParameter | Self::NotSupported)
    }
}
