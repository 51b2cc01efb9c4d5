//! Error types for circuit construction, witness solving and proving

use thiserror::Error;

/// Errors raised while building, solving or proving the addition network.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// A bit decomposition would not fit the field without wrapping
    #[error("{bits}-bit decomposition does not fit a field of order {order}")]
    FieldTooSmall { bits: usize, order: u64 },

    /// The float format parameters are unusable
    #[error("invalid float format (k={exponent_bits}, p={precision}): {reason}")]
    InvalidFormat {
        exponent_bits: usize,
        precision: usize,
        reason: &'static str,
    },

    /// A hinted value was registered without any pinning constraint
    #[error("hint `{0}` has no pinning constraint")]
    UnpinnedHint(&'static str),

    /// A reserved output was never bound to a value
    #[error("output variable {0} was reserved but never bound")]
    UnboundOutput(usize),

    /// An integer does not name a canonical field element
    #[error("{value} is not below the field order {order}")]
    OutOfField { value: u64, order: u64 },

    /// Witness generation received the wrong number of inputs
    #[error("expected {expected} inputs, got {actual}")]
    InputCount { expected: usize, actual: usize },

    /// The witness violates a constraint of the network
    #[error("constraint #{index} ({label}) is not satisfied")]
    Unsatisfied { index: usize, label: &'static str },

    /// A trace row violates a constraint of the AIR
    #[error("row {row}: constraint #{index} ({label}) is not satisfied")]
    AirConstraint {
        row: usize,
        index: usize,
        label: &'static str,
    },

    /// Trace width does not match the chip width
    #[error("trace width {actual} does not match chip width {expected}")]
    TraceWidth { expected: usize, actual: usize },

    /// The chip binds a different number of claims than it was given
    #[error("chip binds {expected} claims, got {actual}")]
    ClaimCount { expected: usize, actual: usize },

    /// Nothing to prove
    #[error("addition trace is empty")]
    EmptyTrace,

    /// The STARK verifier rejected a proof
    #[error("proof verification failed: {0}")]
    Verification(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CircuitError>;
