//! STARK prover for batches of floating-point additions

use p3_baby_bear::{BabyBear, Poseidon2BabyBear};
use p3_challenger::DuplexChallenger;
use p3_commit::ExtensionMmcs;
use p3_dft::Radix2DitParallel;
use p3_field::extension::BinomialExtensionField;
use p3_field::{Field, PrimeField64};
use p3_fri::{create_benchmark_fri_config, TwoAdicFriPcs};
use p3_merkle_tree::MerkleTreeMmcs;
use p3_symmetric::{PaddingFreeSponge, TruncatedPermutation};
use p3_uni_stark::{prove, StarkConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::chips::FpAddChip;
use crate::error::{CircuitError, Result};
use crate::float::{EncodedFloat, FloatFormat};
use crate::trace::{AddClaim, AdditionTrace};

pub type Val = BabyBear;
pub type Perm = Poseidon2BabyBear<16>;
type MyHash = PaddingFreeSponge<Perm, 16, 8, 8>;
type MyCompress = TruncatedPermutation<Perm, 2, 8, 16>;
type ValMmcs =
    MerkleTreeMmcs<<Val as Field>::Packing, <Val as Field>::Packing, MyHash, MyCompress, 8>;
pub type Challenge = BinomialExtensionField<Val, 4>;
type ChallengeMmcs = ExtensionMmcs<Val, Challenge, ValMmcs>;
pub type Challenger = DuplexChallenger<Val, Perm, 16, 8>;
type Dft = Radix2DitParallel<Val>;
type Pcs = TwoAdicFriPcs<Val, Dft, ValMmcs, ChallengeMmcs>;
pub type StarkParams = StarkConfig<Pcs, Challenge, Challenger>;
pub type Proof = p3_uni_stark::Proof<StarkParams>;

/// Prover and verifier settings; both sides must use the same values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverConfig {
    pub format: FloatFormat,
    /// Seed for the Poseidon2 round constants
    pub seed: u64,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            format: FloatFormat::LAB,
            seed: 42,
        }
    }
}

/// STARK configuration together with a fresh challenger
pub(crate) struct Backend {
    pub config: StarkParams,
    pub challenger: Challenger,
}

impl Backend {
    pub fn new(seed: u64) -> Self {
        let perm = Perm::new_from_rng_128(&mut StdRng::seed_from_u64(seed));
        let hash = MyHash::new(perm.clone());
        let compress = MyCompress::new(perm.clone());
        let val_mmcs = ValMmcs::new(hash, compress);
        let challenge_mmcs = ChallengeMmcs::new(val_mmcs.clone());
        let fri_config = create_benchmark_fri_config(challenge_mmcs);
        let pcs = Pcs::new(Dft::default(), val_mmcs, fri_config);
        Self {
            config: StarkParams::new(pcs),
            challenger: Challenger::new(perm),
        }
    }
}

/// A proof together with the additions it attests, in trace order.
///
/// The claims are the public values of the proof; changing any of them makes
/// verification fail.
#[derive(Serialize, Deserialize)]
pub struct AdditionProof {
    pub format: FloatFormat,
    pub claims: Vec<AddClaim>,
    pub proof: Proof,
}

impl AdditionProof {
    /// Claimed sums, in trace order
    pub fn outputs(&self) -> Vec<EncodedFloat> {
        self.claims.iter().map(|claim| claim.sum).collect()
    }
}

/// Proves batches of additions over BabyBear
pub struct Prover {
    config: ProverConfig,
    chip: FpAddChip<Val>,
}

impl Prover {
    pub fn new(config: ProverConfig) -> Result<Self> {
        Ok(Self {
            chip: FpAddChip::new(config.format)?,
            config,
        })
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    pub fn chip(&self) -> &FpAddChip<Val> {
        &self.chip
    }

    #[instrument(skip_all, fields(ops = trace.len()))]
    pub fn prove(&self, trace: &AdditionTrace) -> Result<AdditionProof> {
        if trace.is_empty() {
            return Err(CircuitError::EmptyTrace);
        }
        let chip = self.chip.clone().with_claims(trace.len());
        let matrix = chip.generate_trace(trace)?;

        let claims: Vec<AddClaim> = trace
            .ops
            .iter()
            .enumerate()
            .map(|(row, op)| {
                let io = chip.io(&matrix, row);
                AddClaim {
                    lhs: op.lhs,
                    rhs: op.rhs,
                    sum: EncodedFloat::new(io.e_out.as_canonical_u64(), io.m_out.as_canonical_u64()),
                }
            })
            .collect();
        let public_values = chip.public_values(&claims)?;
        // Debug builds: catch bad rows here instead of inside the prover
        #[cfg(debug_assertions)]
        chip.check_trace(&matrix, &public_values)?;

        let Backend {
            config,
            mut challenger,
        } = Backend::new(self.config.seed);
        let proof = prove(&config, &chip, &mut challenger, matrix, &public_values);
        info!(rows = trace.len(), "proved fp-add trace");

        Ok(AdditionProof {
            format: self.config.format,
            claims,
            proof,
        })
    }
}
