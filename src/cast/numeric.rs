//! Numeric conversion operators.
//!
//! The numeric matrix is instantiated over the closed element set
//! (signed and unsigned integer widths, both floats) via `num_traits`:
//! widening conversions always succeed, narrowing conversions that leave
//! the destination domain fail, and float sources truncate toward zero
//! with NaN and infinity rejected.

use crate::cast::decimal::{self, DecimalSource};
use crate::cast::executor::execute_unary;
use crate::cast::null_cast;
use crate::common::error::{OpalError, OpalResult};
use crate::types::logical_type::LogicalType;
use crate::types::vector::{ScalarElement, Vector};
use num_traits::{NumCast, ToPrimitive, Zero};
use std::fmt;

/// The closed set of numeric element types the cast matrix covers.
pub(crate) trait NumericElement:
    Copy + fmt::Display + Zero + NumCast + ToPrimitive + ScalarElement + DecimalSource
{
}

impl<T> NumericElement for T where
    T: Copy + fmt::Display + Zero + NumCast + ToPrimitive + ScalarElement + DecimalSource
{
}

/// Checked element conversion; `None` from `num_traits::cast` means the
/// value does not fit the destination domain.
pub(crate) fn cast_numeric<S, D>(value: S, target: &LogicalType) -> OpalResult<D>
where
    S: ToPrimitive + fmt::Display + Copy + NumCast,
    D: NumCast,
{
    num_traits::cast::<S, D>(value).ok_or_else(|| {
        OpalError::OutOfRange(format!(
            "Casting value \"{}\" to type {} failed: value is out of range!",
            value, target
        ))
    })
}

fn numeric_cast_exec<S, D>(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()>
where
    S: NumericElement,
    D: NumericElement,
{
    let target = result.logical_type().clone();
    execute_unary::<S, D, _>(source, result, count, move |value| {
        cast_numeric(*value, &target)
    })
}

/// Dispatch for a numeric source element type over the destination type.
pub(crate) fn numeric_cast_switch<S>(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()>
where
    S: NumericElement,
{
    match result.logical_type() {
        LogicalType::Boolean => {
            execute_unary::<S, bool, _>(source, result, count, |value| Ok(!value.is_zero()))
        }
        LogicalType::TinyInt => numeric_cast_exec::<S, i8>(source, result, count),
        LogicalType::SmallInt => numeric_cast_exec::<S, i16>(source, result, count),
        LogicalType::Integer => numeric_cast_exec::<S, i32>(source, result, count),
        LogicalType::BigInt => numeric_cast_exec::<S, i64>(source, result, count),
        LogicalType::HugeInt => numeric_cast_exec::<S, i128>(source, result, count),
        LogicalType::UTinyInt => numeric_cast_exec::<S, u8>(source, result, count),
        LogicalType::USmallInt => numeric_cast_exec::<S, u16>(source, result, count),
        LogicalType::UInteger => numeric_cast_exec::<S, u32>(source, result, count),
        LogicalType::UBigInt => numeric_cast_exec::<S, u64>(source, result, count),
        LogicalType::Float => numeric_cast_exec::<S, f32>(source, result, count),
        LogicalType::Double => numeric_cast_exec::<S, f64>(source, result, count),
        LogicalType::Decimal { .. } => decimal::to_decimal_cast::<S>(source, result, count),
        LogicalType::Varchar => {
            execute_unary::<S, String, _>(source, result, count, |value| Ok(value.to_string()))
        }
        _ => null_cast(source, result, count),
    }
}

fn bool_cast_exec<D>(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()>
where
    D: NumericElement,
{
    let target = result.logical_type().clone();
    execute_unary::<bool, D, _>(source, result, count, move |value| {
        cast_numeric(<u8 as From<bool>>::from(*value), &target)
    })
}

/// Dispatch for a boolean source: booleans convert as a 1-bit numeric.
pub(crate) fn boolean_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::TinyInt => bool_cast_exec::<i8>(source, result, count),
        LogicalType::SmallInt => bool_cast_exec::<i16>(source, result, count),
        LogicalType::Integer => bool_cast_exec::<i32>(source, result, count),
        LogicalType::BigInt => bool_cast_exec::<i64>(source, result, count),
        LogicalType::HugeInt => bool_cast_exec::<i128>(source, result, count),
        LogicalType::UTinyInt => bool_cast_exec::<u8>(source, result, count),
        LogicalType::USmallInt => bool_cast_exec::<u16>(source, result, count),
        LogicalType::UInteger => bool_cast_exec::<u32>(source, result, count),
        LogicalType::UBigInt => bool_cast_exec::<u64>(source, result, count),
        LogicalType::Float => bool_cast_exec::<f32>(source, result, count),
        LogicalType::Double => bool_cast_exec::<f64>(source, result, count),
        LogicalType::Decimal { .. } => decimal::to_decimal_cast::<bool>(source, result, count),
        LogicalType::Varchar => {
            execute_unary::<bool, String, _>(source, result, count, |value| Ok(value.to_string()))
        }
        _ => null_cast(source, result, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_never_fails() {
        let value: i64 = cast_numeric(42i8, &LogicalType::BigInt).unwrap();
        assert_eq!(value, 42);
        let value: f64 = cast_numeric(-3i32, &LogicalType::Double).unwrap();
        assert_eq!(value, -3.0);
    }

    #[test]
    fn test_narrowing_checks_domain() {
        assert!(cast_numeric::<i32, i8>(200, &LogicalType::TinyInt).is_err());
        assert!(cast_numeric::<i32, u8>(-1, &LogicalType::UTinyInt).is_err());
        let value: i8 = cast_numeric(127i32, &LogicalType::TinyInt).unwrap();
        assert_eq!(value, 127);
    }

    #[test]
    fn test_float_to_integer_truncates_toward_zero() {
        let value: i32 = cast_numeric(3.9f64, &LogicalType::Integer).unwrap();
        assert_eq!(value, 3);
        let value: i32 = cast_numeric(-3.9f64, &LogicalType::Integer).unwrap();
        assert_eq!(value, -3);
        assert!(cast_numeric::<f64, i32>(f64::NAN, &LogicalType::Integer).is_err());
        assert!(cast_numeric::<f64, i32>(f64::INFINITY, &LogicalType::Integer).is_err());
        assert!(cast_numeric::<f64, i64>(1e300, &LogicalType::BigInt).is_err());
    }
}
