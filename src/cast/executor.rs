//! Generic per-element executor for unary vector operations.

use crate::common::error::{OpalError, OpalResult};
use crate::types::vector::{ScalarElement, ValidityMask, Vector, VectorClass};

/// Apply `op` to every valid row of `source`, writing a freshly built
/// buffer into `result`. Validity bits are copied unchanged: null rows
/// stay null and never reach `op`; a constant source yields a constant
/// result. Any operator error aborts the whole batch.
pub(crate) fn execute_unary<S, D, F>(
    source: &Vector,
    result: &mut Vector,
    count: usize,
    mut op: F,
) -> OpalResult<()>
where
    S: ScalarElement,
    D: ScalarElement,
    F: FnMut(&S) -> OpalResult<D>,
{
    let input = S::slice(source.data())?;
    match source.class() {
        VectorClass::Constant => {
            if source.validity().is_valid(0) {
                let value = op(element(input, 0)?)?;
                result.set_constant_data(D::into_data(vec![value]), true);
            } else {
                result.set_constant_data(D::into_data(vec![D::default()]), false);
            }
        }
        VectorClass::Flat => {
            let mut output = Vec::with_capacity(count);
            let mut validity = ValidityMask::all_valid(count);
            for row in 0..count {
                if source.validity().is_valid(row) {
                    output.push(op(element(input, row)?)?);
                } else {
                    validity.set_invalid(row);
                    output.push(D::default());
                }
            }
            result.set_flat_data(D::into_data(output), validity);
        }
    }
    Ok(())
}

fn element<S>(input: &[S], row: usize) -> OpalResult<&S> {
    input.get(row).ok_or_else(|| {
        OpalError::Internal(format!(
            "cast row {} exceeds source buffer length {}",
            row,
            input.len()
        ))
    })
}
