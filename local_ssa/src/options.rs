// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::error::{Result, SsaError};

/// Configuration of one SSA construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SsaOptions {
    /// Appended to every versioned name except loop selectors, so that several SSA instances of
    /// the same function (e.g. one per unwinding) can live in one formula.
    pub suffix: String,
    /// Also add each assertion to the constraints of its location.
    pub assertions_to_constraints: bool,
}

impl SsaOptions {
    pub fn with_suffix<T: Into<String>>(mut self, suffix: T) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_assertions_to_constraints(mut self, enable: bool) -> Self {
        self.assertions_to_constraints = enable;
        self
    }

    /// A suffix must not contain `#`, the separator between an identifier and its version.
    pub fn validate(&self) -> Result<()> {
        if self.suffix.contains('#') {
            return Err(SsaError::InvalidOption(format!(
                "suffix `{}` must not contain `#`",
                self.suffix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_validation() {
        assert!(SsaOptions::default().validate().is_ok());
        assert!(SsaOptions::default().with_suffix("%1").validate().is_ok());
        assert!(matches!(
            SsaOptions::default().with_suffix("#1").validate(),
            Err(SsaError::InvalidOption(_))
        ));
    }
}
