//! FP-add chip, trace generation and the STARK round trip

use p3_air::BaseAir;
use p3_baby_bear::BabyBear;
use p3_field::{FieldAlgebra, PrimeField64};
use p3_matrix::dense::RowMajorMatrix;
use p3_matrix::Matrix;

use zkfloat::chips::fp_add::FP_ADD_IO_COLUMNS;
use zkfloat::{
    AddClaim, AdditionTrace, CircuitError, EncodedFloat, FloatFormat, FpAddChip, Prover,
    ProverConfig, Verifier,
};

type F = BabyBear;

fn f(e: u64, m: u64) -> EncodedFloat {
    EncodedFloat::new(e, m)
}

fn sample_trace() -> AdditionTrace {
    let mut trace = AdditionTrace::new(FloatFormat::LAB);
    trace.push(f(5, 18), f(5, 18));
    trace.push(f(6, 16), f(5, 16));
    trace.push(f(20, 16), f(10, 31));
    trace
}

#[test]
fn trace_is_padded_to_power_of_two() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap();
    let matrix = chip.generate_trace(&sample_trace()).unwrap();
    assert_eq!(matrix.height(), 4);
    assert_eq!(matrix.width(), BaseAir::<F>::width(&chip));
    assert!(matrix.width() > FP_ADD_IO_COLUMNS);

    let outputs: Vec<_> = (0..4)
        .map(|row| {
            let io = chip.io(&matrix, row);
            (io.e_out.as_canonical_u64(), io.m_out.as_canonical_u64())
        })
        .collect();
    assert_eq!(outputs, vec![(6, 18), (6, 24), (20, 16), (0, 0)]);

    let first = chip.io(&matrix, 0);
    assert_eq!(first.e0, F::from_canonical_u32(5));
    assert_eq!(first.m1, F::from_canonical_u32(18));
}

#[test]
fn single_addition_pads_to_two_rows() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap();
    let mut trace = AdditionTrace::new(FloatFormat::LAB);
    trace.push(f(3, 20), EncodedFloat::ZERO);
    let matrix = chip.generate_trace(&trace).unwrap();
    assert_eq!(matrix.height(), 2);
    chip.check_trace(&matrix, &[]).unwrap();
}

#[test]
fn generated_trace_satisfies_air() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap();
    let matrix = chip.generate_trace(&sample_trace()).unwrap();
    chip.check_trace(&matrix, &[]).unwrap();
}

#[test]
fn tampered_row_is_located() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap();
    let matrix = chip.generate_trace(&sample_trace()).unwrap();
    let width = matrix.width();
    let mut values = matrix.values;
    // m_out of row 2
    values[2 * width + FP_ADD_IO_COLUMNS - 1] += F::ONE;
    let tampered = RowMajorMatrix::new(values, width);

    match chip.check_trace(&tampered, &[]) {
        Err(CircuitError::AirConstraint { row, label, .. }) => {
            assert_eq!(row, 2);
            assert_eq!(label, "output");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn malformed_operand_fails_trace_generation() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap();
    let mut trace = sample_trace();
    trace.push(f(0, 7), f(5, 18));
    match chip.generate_trace(&trace) {
        Err(CircuitError::AirConstraint { row, label, .. }) => {
            assert_eq!(row, 3);
            assert_eq!(label, "well_formed");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn width_mismatch_is_reported() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap();
    let narrow = RowMajorMatrix::new(vec![F::ZERO; 2 * FP_ADD_IO_COLUMNS], FP_ADD_IO_COLUMNS);
    assert!(matches!(
        chip.check_trace(&narrow, &[]),
        Err(CircuitError::TraceWidth { .. })
    ));
}

#[test]
fn format_mismatch_is_reported() {
    let chip = FpAddChip::<F>::new(FloatFormat::HALF).unwrap();
    assert!(matches!(
        chip.generate_trace(&sample_trace()),
        Err(CircuitError::InvalidFormat { .. })
    ));
}

#[test]
fn empty_trace_is_not_proved() {
    let prover = Prover::new(ProverConfig::default()).unwrap();
    assert!(matches!(
        prover.prove(&AdditionTrace::new(FloatFormat::LAB)),
        Err(CircuitError::EmptyTrace)
    ));
}

#[test]
fn stark_round_trip() {
    let config = ProverConfig::default();
    let mut trace = sample_trace();
    trace.push(EncodedFloat::ZERO, f(9, 21));

    let proof = Prover::new(config).unwrap().prove(&trace).unwrap();
    assert_eq!(
        proof.outputs(),
        vec![f(6, 18), f(6, 24), f(20, 16), f(9, 21)]
    );
    assert_eq!(proof.claims[0].lhs, f(5, 18));
    assert_eq!(proof.claims[3].rhs, f(9, 21));
    Verifier::new(config).unwrap().verify(&proof).unwrap();

    let other = ProverConfig {
        format: FloatFormat::BFLOAT16,
        ..config
    };
    assert!(matches!(
        Verifier::new(other).unwrap().verify(&proof),
        Err(CircuitError::Verification(_))
    ));
}

fn sample_claims() -> Vec<AddClaim> {
    sample_trace()
        .ops
        .iter()
        .zip([f(6, 18), f(6, 24), f(20, 16)])
        .map(|(op, sum)| AddClaim {
            lhs: op.lhs,
            rhs: op.rhs,
            sum,
        })
        .collect()
}

#[test]
fn claim_queue_binds_rows() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap().with_claims(3);
    let matrix = chip.generate_trace(&sample_trace()).unwrap();
    assert_eq!(matrix.width(), BaseAir::<F>::width(&chip));
    assert_eq!(
        matrix.width(),
        chip.adder().circuit().num_vars() + 3 * FP_ADD_IO_COLUMNS
    );

    let claims = sample_claims();
    let public_values = chip.public_values(&claims).unwrap();
    chip.check_trace(&matrix, &public_values).unwrap();

    // a wrong sum for the last addition is caught on the first row's queue
    let mut wrong = claims.clone();
    wrong[2].sum = f(20, 17);
    let public_values = chip.public_values(&wrong).unwrap();
    match chip.check_trace(&matrix, &public_values) {
        Err(CircuitError::AirConstraint { row, label, .. }) => {
            assert_eq!(row, 0);
            assert_eq!(label, "claim");
        }
        other => panic!("unexpected {other:?}"),
    }

    // swapping two operands is caught the same way
    let mut swapped = claims;
    swapped.swap(0, 1);
    let public_values = chip.public_values(&swapped).unwrap();
    assert!(chip.check_trace(&matrix, &public_values).is_err());
}

#[test]
fn padding_rows_keep_an_empty_queue() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap().with_claims(3);
    let matrix = chip.generate_trace(&sample_trace()).unwrap();
    let queue = chip.adder().circuit().num_vars();
    let padding_row = matrix.row_slice(3);
    assert!(padding_row[queue..].iter().all(|v| *v == F::ZERO));
    // row 1 holds the claims of rows 1 and 2, then an empty slot
    let row = matrix.row_slice(1);
    assert_eq!(row[queue + FP_ADD_IO_COLUMNS - 1], F::from_canonical_u32(24));
    assert_eq!(row[queue + 2 * FP_ADD_IO_COLUMNS - 2], F::from_canonical_u32(20));
    assert!(row[queue + 2 * FP_ADD_IO_COLUMNS..].iter().all(|v| *v == F::ZERO));
}

#[test]
fn claim_count_mismatch_is_reported() {
    let chip = FpAddChip::<F>::new(FloatFormat::LAB).unwrap().with_claims(2);
    assert!(matches!(
        chip.generate_trace(&sample_trace()),
        Err(CircuitError::ClaimCount {
            expected: 2,
            actual: 3
        })
    ));
    assert!(matches!(
        chip.public_values(&sample_claims()),
        Err(CircuitError::ClaimCount { .. })
    ));
}

#[test]
fn wrapped_operand_is_not_proved() {
    let mut trace = sample_trace();
    trace.push(f(F::ORDER_U64 + 5, 18), f(5, 18));
    assert!(matches!(
        Prover::new(ProverConfig::default()).unwrap().prove(&trace),
        Err(CircuitError::OutOfField { .. })
    ));
}

#[test]
fn tampered_claims_fail_verification() {
    let config = ProverConfig::default();
    let verifier = Verifier::new(config).unwrap();
    let mut proof = Prover::new(config).unwrap().prove(&sample_trace()).unwrap();
    verifier.verify(&proof).unwrap();

    let original = proof.claims[0];
    proof.claims[0].sum = f(200, 31);
    assert!(matches!(
        verifier.verify(&proof),
        Err(CircuitError::Verification(_))
    ));

    proof.claims[0] = AddClaim {
        lhs: f(5, 19),
        ..original
    };
    assert!(matches!(
        verifier.verify(&proof),
        Err(CircuitError::Verification(_))
    ));

    proof.claims[0] = original;
    let last = proof.claims.pop();
    assert!(matches!(
        verifier.verify(&proof),
        Err(CircuitError::Verification(_))
    ));

    proof.claims.extend(last);
    verifier.verify(&proof).unwrap();
}
