//! Error types for gatenet

use thiserror::Error;

/// Gatenet error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatenetError {
    /// Value cannot be encoded in the target fixed-width format
    #[error("Not representable: {value} ({reason})")]
    Representability {
        value: String,
        reason: &'static str,
    },

    /// Bit-level operation on sequences of different lengths
    #[error("Width mismatch: {left} bits vs {right} bits")]
    WidthMismatch { left: usize, right: usize },

    /// Sequence has the wrong width for a fixed-width type
    #[error("Invalid width: expected {expected} bits, got {actual}")]
    InvalidWidth { expected: usize, actual: usize },

    /// Vector or layer dimensions disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Layer constructed without neurons
    #[error("Layer has no neurons")]
    EmptyLayer,

    /// Arithmetic overflow under `OverflowPolicy::Error`
    #[error("Overflow in {operation}")]
    Overflow { operation: &'static str },

    /// Structural equality check failed
    #[error("Structural mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

impl GatenetError {
    pub(crate) fn unrepresentable(value: impl ToString, reason: &'static str) -> Self {
        Self::Representability {
            value: value.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatenetError>;
