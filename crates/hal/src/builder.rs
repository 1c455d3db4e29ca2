//! Builder progress tracking for the Fluent API level.
//!
//! Each family's builder keeps an explicit `*BuilderState` struct of
//! `has_*` flags. The flags are the only thing that decides whether a
//! builder may be finalized; optional fields never appear in the state.

use crate::error::{ErrorCode, HalResult};

/// Where a builder stands relative to its required field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// No required field supplied yet.
    Empty,
    /// Some, but not all, required fields supplied.
    Partial,
    /// Every required field supplied; the builder may be finalized.
    Complete,
}

/// Required-field bookkeeping for one builder.
pub trait BuilderState {
    /// Number of required fields (or field groups, e.g. "TX or RX pin").
    const REQUIRED: u8;

    /// Number of required fields currently satisfied.
    fn satisfied(&self) -> u8;

    /// Current progress derived from [`satisfied`](Self::satisfied).
    fn progress(&self) -> Progress {
        match self.satisfied() {
            0 => Progress::Empty,
            n if n >= Self::REQUIRED => Progress::Complete,
            _ => Progress::Partial,
        }
    }

    /// True iff every required field has been supplied.
    fn is_valid(&self) -> bool {
        self.progress() == Progress::Complete
    }

    /// Gate used by `initialize()` / `build()` finalizers.
    fn require_complete(&self) -> HalResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            hal_warn!(
                "builder finalized with {} of {} required fields",
                self.satisfied(),
                Self::REQUIRED
            );
            Err(ErrorCode::InvalidParameter)
        }
    }
}

/// Count the `true` flags in a required-field list.
#[allow(clippy::cast_possible_truncation)] // Safety: flag lists are at most a handful of entries
pub(crate) fn count(flags: &[bool]) -> u8 {
    flags.iter().filter(|f| **f).count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pair {
        has_a: bool,
        has_b: bool,
    }

    impl BuilderState for Pair {
        const REQUIRED: u8 = 2;

        fn satisfied(&self) -> u8 {
            count(&[self.has_a, self.has_b])
        }
    }

    #[test]
    fn progress_moves_empty_partial_complete() {
        let mut s = Pair::default();
        assert_eq!(s.progress(), Progress::Empty);
        s.has_b = true;
        assert_eq!(s.progress(), Progress::Partial);
        s.has_a = true;
        assert_eq!(s.progress(), Progress::Complete);
        assert!(s.is_valid());
    }

    #[test]
    fn incomplete_state_rejects_finalize() {
        let s = Pair {
            has_a: true,
            has_b: false,
        };
        assert_eq!(s.require_complete(), Err(ErrorCode::InvalidParameter));
    }
}
