use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of neighbours requested by a query. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultCount(usize);

impl ResultCount {
    /// Upper bound offered by the interactive surface.
    pub const INTERACTIVE_MAX: usize = 10;

    pub fn new(n: usize) -> Result<Self, DomainError> {
        if n == 0 {
            return Err(DomainError::InvalidInput(
                "Result count must be a positive integer".into(),
            ));
        }
        Ok(ResultCount(n))
    }

    /// Like [`ResultCount::new`] but also enforces the `[1, 10]` range of the
    /// interactive selector.
    pub fn interactive(n: usize) -> Result<Self, DomainError> {
        if !(1..=Self::INTERACTIVE_MAX).contains(&n) {
            return Err(DomainError::InvalidInput(format!(
                "Result count must be between 1 and {}, got {n}",
                Self::INTERACTIVE_MAX
            )));
        }
        Ok(ResultCount(n))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for ResultCount {
    fn default() -> Self {
        ResultCount(2)
    }
}

impl fmt::Display for ResultCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
