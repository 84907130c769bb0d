//! Rate - bounded per-reaction multiplier on a reaction type's mass
//!
//! The effective weight of a single reaction is `mass * rate`. A rate outside
//! [`Rate::MIN`, `Rate::MAX`] is rejected at construction, so a `Rate` value
//! is valid by definition everywhere downstream.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Bounded continuous multiplier applied to a reaction type's mass
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rate(f64);

impl Rate {
    /// Smallest accepted rate
    pub const MIN: f64 = 0.01;

    /// Largest accepted rate
    pub const MAX: f64 = 99.99;

    /// Rate applied when a reaction is created without an explicit rate
    pub const DEFAULT: f64 = 1.0;

    /// Create a rate, rejecting values outside the accepted range
    pub fn new(rate: f64) -> Result<Self, DomainError> {
        if !rate.is_finite() || !(Self::MIN..=Self::MAX).contains(&rate) {
            return Err(DomainError::RateOutOfRange { rate });
        }
        Ok(Self(rate))
    }

    /// Get the inner f64 value
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Rate {
    type Error = DomainError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}
