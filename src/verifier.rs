//! STARK verifier for batches of floating-point additions

use tracing::{info, instrument, warn};

use crate::chips::FpAddChip;
use crate::error::{CircuitError, Result};
use crate::prover::{AdditionProof, Backend, ProverConfig, Val};

/// Checks [`AdditionProof`]s produced with a matching [`ProverConfig`]
pub struct Verifier {
    config: ProverConfig,
    chip: FpAddChip<Val>,
}

impl Verifier {
    pub fn new(config: ProverConfig) -> Result<Self> {
        Ok(Self {
            chip: FpAddChip::new(config.format)?,
            config,
        })
    }

    #[instrument(skip_all, fields(format = %self.config.format))]
    pub fn verify(&self, proof: &AdditionProof) -> Result<()> {
        if proof.format != self.config.format {
            return Err(CircuitError::Verification(format!(
                "proof is for format {}, verifier expects {}",
                proof.format, self.config.format
            )));
        }
        if proof.claims.is_empty() {
            return Err(CircuitError::Verification("proof carries no claims".into()));
        }
        let chip = self.chip.clone().with_claims(proof.claims.len());
        let public_values = chip
            .public_values(&proof.claims)
            .map_err(|err| CircuitError::Verification(err.to_string()))?;

        let Backend {
            config,
            mut challenger,
        } = Backend::new(self.config.seed);
        p3_uni_stark::verify(&config, &chip, &mut challenger, &proof.proof, &public_values)
            .map_err(|err| {
                warn!(?err, "rejected proof");
                CircuitError::Verification(format!("{err:?}"))
            })?;
        info!(claims = proof.claims.len(), "verified fp-add proof");
        Ok(())
    }
}
