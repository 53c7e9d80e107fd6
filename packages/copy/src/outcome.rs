//! Aggregate success/failure of copy work.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use crate::error::{CopyError, FailureKind};

/// Outcome of copying an entry, a directory level or a whole subtree.
///
/// Outcomes fold with logical OR: once failed, always failed. The diagnostic
/// keeps the first failure observed; the log holds the full record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    failed: bool,
    diagnostic: Option<FailureKind>,
}

impl CopyOutcome {
    /// A successful outcome.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            failed: false,
            diagnostic: None,
        }
    }

    /// A failed outcome with the given classification.
    #[must_use]
    pub const fn failure(kind: FailureKind) -> Self {
        Self {
            failed: true,
            diagnostic: Some(kind),
        }
    }

    /// Whether nothing failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.failed
    }

    /// Classification of the first failure observed, if any.
    #[must_use]
    pub const fn diagnostic(&self) -> Option<FailureKind> {
        self.diagnostic
    }

    /// Fold another outcome into this one.
    pub const fn merge(&mut self, other: Self) {
        if other.failed {
            self.failed = true;
            if self.diagnostic.is_none() {
                self.diagnostic = other.diagnostic;
            }
        }
    }

    /// Record a failure.
    pub const fn fail(&mut self, kind: FailureKind) {
        self.merge(Self::failure(kind));
    }
}

impl From<&CopyError> for CopyOutcome {
    fn from(error: &CopyError) -> Self {
        Self::failure(error.kind())
    }
}

impl<T> From<&Result<T, CopyError>> for CopyOutcome {
    fn from(result: &Result<T, CopyError>) -> Self {
        result.as_ref().map_or_else(Self::from, |_| Self::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_first_diagnostic() {
        let mut outcome = CopyOutcome::success();
        outcome.merge(CopyOutcome::success());
        assert!(outcome.is_success());

        outcome.fail(FailureKind::ShortWrite);
        outcome.fail(FailureKind::Join);

        assert!(!outcome.is_success());
        assert_eq!(outcome.diagnostic(), Some(FailureKind::ShortWrite));
    }

    #[test]
    fn test_success_merge_does_not_clear_failure() {
        let mut outcome = CopyOutcome::failure(FailureKind::LinkCreate);
        outcome.merge(CopyOutcome::success());
        assert!(!outcome.is_success());
    }
}
