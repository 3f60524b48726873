//! Error types for node-group resolution

use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// Which scaling bound an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Min => f.write_str("min"),
            Bound::Max => f.write_str("max"),
        }
    }
}

/// Why a present bound annotation was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBound {
    #[error("value {value:?} of annotation {key:?} is not an integer")]
    NotAnInteger { key: String, value: String },

    #[error("value {value:?} of annotation {key:?} is out of range")]
    OutOfRange { key: String, value: String },

    #[error("value {0} is negative")]
    Negative(i32),

    #[error("max {max} is less than min {min}")]
    BelowMinimum { min: i32, max: i32 },
}

/// Failure to resolve scaling bounds from annotations
///
/// `Missing` usually means the group is not managed by the autoscaler and
/// can be skipped. `Invalid` is a configuration error worth surfacing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("missing {0} annotation")]
    Missing(Bound),

    #[error("invalid {bound} annotation: {reason}")]
    Invalid { bound: Bound, reason: InvalidBound },
}

impl BoundsError {
    pub fn is_missing(&self) -> bool {
        matches!(self, BoundsError::Missing(_))
    }

    pub fn bound(&self) -> Bound {
        match self {
            BoundsError::Missing(bound) | BoundsError::Invalid { bound, .. } => *bound,
        }
    }
}

/// Quantity string does not follow the Kubernetes quantity grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,

    #[error("quantity {0:?} has no valid numeric part")]
    InvalidNumber(String),

    #[error("quantity {0:?} has an unrecognised suffix")]
    InvalidSuffix(String),
}

/// Failure to parse a capacity annotation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("value {value:?} from annotation {key:?} is not a valid quantity: {source}")]
    Quantity {
        key: String,
        value: String,
        #[source]
        source: QuantityError,
    },

    #[error("value {value:?} from annotation {key:?} expected to be an integer: {source}")]
    MemoryNotInteger {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("value {value:?} from annotation {key:?} overflows when converted to bytes")]
    MemoryOverflow { key: String, value: String },
}

impl CapacityError {
    /// Annotation key whose value was rejected
    pub fn key(&self) -> &str {
        match self {
            CapacityError::Quantity { key, .. }
            | CapacityError::MemoryNotInteger { key, .. }
            | CapacityError::MemoryOverflow { key, .. } => key,
        }
    }
}

/// Failure to load resolver configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load resolver configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}
