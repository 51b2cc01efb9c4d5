//! Batches of additions to prove

use std::path::Path;

use anyhow::Result;
use p3_field::PrimeField64;
use serde::{Deserialize, Serialize};

use crate::chips::FpAddIo;
use crate::error::CircuitError;
use crate::float::{reference, EncodedFloat, FloatFormat};

/// A single addition `lhs + rhs`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOp {
    pub lhs: EncodedFloat,
    pub rhs: EncodedFloat,
}

/// An addition together with the sum it is claimed to produce
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddClaim {
    pub lhs: EncodedFloat,
    pub rhs: EncodedFloat,
    pub sum: EncodedFloat,
}

impl AddClaim {
    /// The claim as the I/O prefix of a trace row
    pub fn to_io<F: PrimeField64>(&self) -> std::result::Result<FpAddIo<F>, CircuitError> {
        let [e0, m0] = self.lhs.to_fields()?;
        let [e1, m1] = self.rhs.to_fields()?;
        let [e_out, m_out] = self.sum.to_fields()?;
        Ok(FpAddIo {
            e0,
            m0,
            e1,
            m1,
            e_out,
            m_out,
        })
    }
}

/// Additions over one float format, one trace row each
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionTrace {
    pub format: FloatFormat,
    pub ops: Vec<AddOp>,
}

impl AdditionTrace {
    pub fn new(format: FloatFormat) -> Self {
        Self {
            format,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, lhs: EncodedFloat, rhs: EncodedFloat) {
        self.ops.push(AddOp { lhs, rhs });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Load a trace from a bincode file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let trace: Self = bincode::deserialize(&data)?;
        Ok(trace)
    }

    /// Save the trace to a bincode file
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = bincode::serialize(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Sums the adder will produce, `None` for rows it will reject
    pub fn expected_outputs(&self) -> Vec<Option<EncodedFloat>> {
        self.ops
            .iter()
            .map(|op| reference::add(&self.format, op.lhs, op.rhs))
            .collect()
    }
}
