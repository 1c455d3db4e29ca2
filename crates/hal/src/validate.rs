//! Declarative validity rules for Expert configuration values.
//!
//! A configuration implements a single method, [`Validate::check`], that
//! evaluates its rules in a fixed order and stops at the first failure.
//! [`Validate::is_valid`] and [`Validate::error_message`] are both derived
//! from that one function, so they can never disagree about which rule
//! failed or in which order rules run.

use crate::error::{ErrorCode, HalResult};

/// Message returned by [`Validate::error_message`] when every rule passes.
pub const VALID: &str = "Valid";

/// Outcome of one rule: `Err` carries the human-readable rule description.
pub type RuleResult = Result<(), &'static str>;

/// Evaluate one rule.
///
/// Written as a function so rule lists read top to bottom:
///
/// ```
/// use hal::validate::{rule, RuleResult};
///
/// fn check(channel: u8, count: u32) -> RuleResult {
///     rule(channel <= 23, "DMA channel out of range (0-23)")?;
///     rule(count > 0, "Transfer count cannot be zero")
/// }
///
/// assert_eq!(check(30, 0), Err("DMA channel out of range (0-23)"));
/// ```
#[inline]
pub fn rule(ok: bool, message: &'static str) -> RuleResult {
    if ok {
        Ok(())
    } else {
        Err(message)
    }
}

/// Pure validity contract for a configuration value.
pub trait Validate {
    /// Run every rule in declaration order; return the first failure.
    fn check(&self) -> RuleResult;

    /// True when every rule passes.
    fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// First failing rule's description, or [`VALID`].
    fn error_message(&self) -> &'static str {
        match self.check() {
            Ok(()) => VALID,
            Err(message) => message,
        }
    }

    /// Gate for side-effecting consumers: `InvalidParameter` on failure.
    ///
    /// Logs the failing rule at `warn` before returning.
    fn ensure_valid(&self) -> HalResult<()> {
        self.check().map_err(|message| {
            hal_warn!("configuration rejected: {}", message);
            ErrorCode::InvalidParameter
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Window {
        min: u32,
        max: u32,
    }

    impl Validate for Window {
        fn check(&self) -> RuleResult {
            rule(self.min > 0, "Minimum cannot be zero")?;
            rule(self.min <= self.max, "Minimum exceeds maximum")
        }
    }

    #[test]
    fn valid_value_reports_sentinel() {
        let w = Window { min: 1, max: 2 };
        assert!(w.is_valid());
        assert_eq!(w.error_message(), VALID);
        assert_eq!(w.ensure_valid(), Ok(()));
    }

    #[test]
    fn first_failing_rule_wins() {
        let w = Window { min: 0, max: 0 };
        assert!(!w.is_valid());
        assert_eq!(w.error_message(), "Minimum cannot be zero");

        let w = Window { min: 5, max: 2 };
        assert_eq!(w.error_message(), "Minimum exceeds maximum");
    }

    #[test]
    fn ensure_valid_maps_to_invalid_parameter() {
        let w = Window { min: 0, max: 2 };
        assert_eq!(w.ensure_valid(), Err(ErrorCode::InvalidParameter));
    }
}
