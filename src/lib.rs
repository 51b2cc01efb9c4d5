//! zkfloat
//!
//! Constraint network proving correctly-rounded floating-point addition,
//! with a Plonky3 STARK backend over Baby Bear.
//!
//! # Architecture
//!
//! - `circuit`: rank-1 constraints over linear combinations, with every
//!   witness value produced by a hint registered next to its pinning
//!   constraints
//! - `gadgets`: range decomposition, comparators, selectors, shifts and MSNZB
//! - `float`: the float encoding, well-formedness, normalization, rounding
//!   and the adder itself, plus a native reference implementation
//! - `chips`: the adder network as an AIR, one addition per trace row, each
//!   row bound to a public claim
//! - `prover` / `verifier`: uni-STARK over Baby Bear with Poseidon2 and FRI

pub mod chips;
pub mod circuit;
pub mod error;
pub mod float;
pub mod gadgets;
pub mod prover;
pub mod trace;
pub mod verifier;

pub use chips::FpAddChip;
pub use error::{CircuitError, Result};
pub use float::{EncodedFloat, FloatAddCircuit, FloatFormat};
pub use prover::{AdditionProof, Prover, ProverConfig};
pub use trace::{AddClaim, AdditionTrace};
pub use verifier::Verifier;

use p3_baby_bear::BabyBear;

/// The field used by the prover (Baby Bear: p = 2^31 - 2^27 + 1)
pub type F = BabyBear;
