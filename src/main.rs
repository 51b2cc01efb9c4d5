use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use p3_baby_bear::BabyBear;
use p3_field::PrimeField64;
use p3_goldilocks::Goldilocks;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zkfloat::float::reference;
use zkfloat::{
    AdditionTrace, EncodedFloat, FloatAddCircuit, FloatFormat, Prover, ProverConfig, Verifier,
};

#[derive(Parser)]
#[command(name = "zkfloat", version, about = "Prove floating-point additions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Lab,
    Half,
    Bfloat16,
    Single,
}

impl From<FormatArg> for FloatFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Lab => FloatFormat::LAB,
            FormatArg::Half => FloatFormat::HALF,
            FormatArg::Bfloat16 => FloatFormat::BFLOAT16,
            FormatArg::Single => FloatFormat::SINGLE,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Solve the adder network for one pair of operands
    Add {
        #[arg(long, value_enum, default_value = "lab")]
        format: FormatArg,
        /// Left operand as `E,M`
        #[arg(long, value_parser = parse_float)]
        lhs: EncodedFloat,
        /// Right operand as `E,M`
        #[arg(long, value_parser = parse_float)]
        rhs: EncodedFloat,
        /// Use the Goldilocks field (needed for single precision)
        #[arg(long)]
        goldilocks: bool,
    },
    /// Write a random trace of well-formed additions
    Sample {
        #[arg(long, value_enum, default_value = "lab")]
        format: FormatArg,
        #[arg(long, default_value_t = 8)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Prove and verify a bincode trace
    Prove {
        #[arg(long)]
        trace: PathBuf,
        #[arg(long, default_value_t = ProverConfig::default().seed)]
        seed: u64,
    },
    /// Print constraint statistics of the adder
    Stats {
        #[arg(long, value_enum, default_value = "lab")]
        format: FormatArg,
        #[arg(long)]
        goldilocks: bool,
    },
}

fn parse_float(s: &str) -> std::result::Result<EncodedFloat, String> {
    let (e, m) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `E,M`, got `{s}`"))?;
    let e = e.trim().parse().map_err(|err| format!("exponent: {err}"))?;
    let m = m.trim().parse().map_err(|err| format!("mantissa: {err}"))?;
    Ok(EncodedFloat::new(e, m))
}

fn add<F: PrimeField64>(format: FloatFormat, lhs: EncodedFloat, rhs: EncodedFloat) -> Result<()> {
    let adder = FloatAddCircuit::<F>::new(format)?;
    let sum = adder
        .add(lhs, rhs)
        .with_context(|| format!("adding {lhs} and {rhs}"))?;
    if reference::add(&format, lhs, rhs) != Some(sum) {
        bail!("network output {sum} disagrees with the reference adder");
    }
    let report = json!({
        "format": format,
        "lhs": lhs,
        "rhs": rhs,
        "sum": sum,
        "value": sum.to_f64(&format),
        "stats": adder.stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn stats<F: PrimeField64>(format: FloatFormat) -> Result<()> {
    let adder = FloatAddCircuit::<F>::new(format)?;
    println!("{}", serde_json::to_string_pretty(&adder.stats())?);
    Ok(())
}

fn random_float(rng: &mut StdRng, format: &FloatFormat) -> EncodedFloat {
    if rng.gen_ratio(1, 16) {
        return EncodedFloat::ZERO;
    }
    let e = rng.gen_range(1..=format.max_exponent() / 2);
    let m = rng.gen_range(format.min_mantissa()..2 * format.min_mantissa());
    EncodedFloat::new(e, m)
}

fn sample(format: FloatFormat, count: usize, seed: u64, out: PathBuf) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut trace = AdditionTrace::new(format);
    for _ in 0..count {
        let lhs = random_float(&mut rng, &format);
        let rhs = random_float(&mut rng, &format);
        trace.push(lhs, rhs);
    }
    trace
        .save(&out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!(count, path = %out.display(), "wrote trace");
    Ok(())
}

fn prove(path: PathBuf, seed: u64) -> Result<()> {
    let trace =
        AdditionTrace::load(&path).with_context(|| format!("reading {}", path.display()))?;
    let config = ProverConfig {
        format: trace.format,
        seed,
    };
    let proof = Prover::new(config)?.prove(&trace)?;
    Verifier::new(config)?.verify(&proof)?;

    let report = json!({
        "format": config.format,
        "rows": trace.len(),
        "claims": proof.claims,
        "proof_bytes": bincode::serialize(&proof.proof)?.len(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Add {
            format,
            lhs,
            rhs,
            goldilocks,
        } => {
            if goldilocks {
                add::<Goldilocks>(format.into(), lhs, rhs)
            } else {
                add::<BabyBear>(format.into(), lhs, rhs)
            }
        }
        Command::Sample {
            format,
            count,
            seed,
            out,
        } => sample(format.into(), count, seed, out),
        Command::Prove { trace, seed } => prove(trace, seed),
        Command::Stats { format, goldilocks } => {
            if goldilocks {
                stats::<Goldilocks>(format.into())
            } else {
                stats::<BabyBear>(format.into())
            }
        }
    }
}
