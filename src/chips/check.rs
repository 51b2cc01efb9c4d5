//! Concrete evaluation of an AIR on trace rows

use p3_air::{Air, AirBuilder, AirBuilderWithPublicValues};
use p3_field::Field;
use p3_matrix::dense::RowMajorMatrix;
use p3_matrix::Matrix;

/// An [`AirBuilder`] over concrete field values for a single window of
/// two adjacent rows. Records the index of the first failed assertion.
pub struct ConstraintCheckBuilder<'a, F: Field> {
    window: RowMajorMatrix<F>,
    public_values: &'a [F],
    is_first_row: F,
    is_last_row: F,
    is_transition: F,
    next_index: usize,
    failed: Option<usize>,
}

impl<'a, F: Field> ConstraintCheckBuilder<'a, F> {
    /// Window starting at `row`, wrapping around like the committed trace
    pub fn new(trace: &RowMajorMatrix<F>, row: usize, public_values: &'a [F]) -> Self {
        let height = trace.height();
        let next = (row + 1) % height;
        let mut values = trace.row_slice(row).to_vec();
        values.extend_from_slice(&trace.row_slice(next));
        Self {
            window: RowMajorMatrix::new(values, trace.width()),
            public_values,
            is_first_row: F::from_bool(row == 0),
            is_last_row: F::from_bool(row == height - 1),
            is_transition: F::from_bool(row != height - 1),
            next_index: 0,
            failed: None,
        }
    }

    pub fn failed(&self) -> Option<usize> {
        self.failed
    }

    fn record(&mut self, ok: bool) {
        if !ok && self.failed.is_none() {
            self.failed = Some(self.next_index);
        }
        self.next_index += 1;
    }
}

impl<F: Field> AirBuilder for ConstraintCheckBuilder<'_, F> {
    type F = F;
    type Expr = F;
    type Var = F;
    type M = RowMajorMatrix<F>;

    fn main(&self) -> Self::M {
        self.window.clone()
    }

    fn is_first_row(&self) -> Self::Expr {
        self.is_first_row
    }

    fn is_last_row(&self) -> Self::Expr {
        self.is_last_row
    }

    fn is_transition_window(&self, size: usize) -> Self::Expr {
        if size == 2 {
            self.is_transition
        } else {
            F::ZERO
        }
    }

    fn assert_zero<I: Into<Self::Expr>>(&mut self, x: I) {
        let value: F = x.into();
        self.record(value == F::ZERO);
    }
}

impl<F: Field> AirBuilderWithPublicValues for ConstraintCheckBuilder<'_, F> {
    type PublicVar = F;

    fn public_values(&self) -> &[F] {
        self.public_values
    }
}

/// Evaluate `air` on every row window of `trace`; returns the first failing
/// `(row, assertion index)`.
pub fn first_violation<F, A>(
    air: &A,
    trace: &RowMajorMatrix<F>,
    public_values: &[F],
) -> Option<(usize, usize)>
where
    F: Field,
    A: for<'a> Air<ConstraintCheckBuilder<'a, F>>,
{
    (0..trace.height()).find_map(|row| {
        let mut builder = ConstraintCheckBuilder::new(trace, row, public_values);
        air.eval(&mut builder);
        builder.failed().map(|index| (row, index))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use p3_air::BaseAir;
    use p3_baby_bear::BabyBear;
    use p3_field::FieldAlgebra;

    type F = BabyBear;

    /// `next[0] = local[0] + 1` except on the last row
    struct Counter;

    impl<T: Field> BaseAir<T> for Counter {
        fn width(&self) -> usize {
            1
        }
    }

    impl<AB: AirBuilder> Air<AB> for Counter {
        fn eval(&self, builder: &mut AB) {
            let main = builder.main();
            let local: AB::Expr = main.row_slice(0)[0].into();
            let next = main.row_slice(1)[0];
            builder
                .when_transition()
                .assert_eq(next, local + AB::Expr::ONE);
        }
    }

    fn column(values: &[u32]) -> RowMajorMatrix<F> {
        RowMajorMatrix::new(values.iter().map(|v| F::from_canonical_u32(*v)).collect(), 1)
    }

    #[test]
    fn accepts_valid_trace() {
        assert_eq!(first_violation(&Counter, &column(&[3, 4, 5, 6]), &[]), None);
    }

    #[test]
    fn reports_first_bad_row() {
        assert_eq!(
            first_violation(&Counter, &column(&[3, 4, 9, 10]), &[]),
            Some((1, 0))
        );
    }

    /// First row equals the single public value
    struct Start;

    impl<T: Field> BaseAir<T> for Start {
        fn width(&self) -> usize {
            1
        }
    }

    impl<AB: AirBuilderWithPublicValues> Air<AB> for Start {
        fn eval(&self, builder: &mut AB) {
            let start: AB::Expr = builder.public_values()[0].into();
            let main = builder.main();
            let local = main.row_slice(0)[0];
            builder.when_first_row().assert_eq(local, start);
        }
    }

    #[test]
    fn public_values_are_visible() {
        let trace = column(&[3, 4]);
        assert_eq!(first_violation(&Start, &trace, &[F::from_canonical_u32(3)]), None);
        assert_eq!(
            first_violation(&Start, &trace, &[F::from_canonical_u32(4)]),
            Some((0, 0))
        );
    }
}
