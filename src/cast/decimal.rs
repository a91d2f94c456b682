//! Decimal conversion operators.
//!
//! Decimals are stored as integers scaled by `10^scale`, in the smallest
//! integer store that holds `width` digits. Rescaling between decimal
//! types multiplies or divides by the scale difference; a width-based
//! fast path skips the per-element limit check whenever the type system
//! proves the result always fits.

use crate::cast::executor::execute_unary;
use crate::cast::null_cast;
use crate::common::error::{OpalError, OpalResult};
use crate::types::logical_type::LogicalType;
use crate::types::physical_type::PhysicalType;
use crate::types::value::format_decimal;
use crate::types::vector::{ScalarElement, Vector};
use std::fmt;

/// `POWERS_OF_TEN[i]` is `10^i`; index 38 covers the widest decimal.
pub(crate) const POWERS_OF_TEN: [i128; 39] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
    100_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000_000_000_000,
];

fn out_of_range(value: &dyn fmt::Display, target: &LogicalType) -> OpalError {
    OpalError::OutOfRange(format!(
        "Casting value \"{}\" to type {} failed: value is out of range!",
        value, target
    ))
}

fn decimal_width_scale(logical_type: &LogicalType) -> OpalResult<(u8, u8)> {
    match logical_type {
        LogicalType::Decimal { width, scale } => Ok((*width, *scale)),
        other => Err(OpalError::Internal(format!(
            "decimal cast invoked on non-decimal type {}",
            other
        ))),
    }
}

/// Conversion into a scaled decimal integer. The string implementation
/// parses the decimal grammar; numeric implementations rescale.
pub(crate) trait DecimalSource {
    fn to_scaled(&self, scale: u8, target: &LogicalType) -> OpalResult<i128>;
}

macro_rules! impl_decimal_source_int {
    ($($ty:ty),*) => {$(
        impl DecimalSource for $ty {
            fn to_scaled(&self, scale: u8, target: &LogicalType) -> OpalResult<i128> {
                (*self as i128)
                    .checked_mul(POWERS_OF_TEN[scale as usize])
                    .ok_or_else(|| out_of_range(self, target))
            }
        }
    )*};
}

impl_decimal_source_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! impl_decimal_source_float {
    ($($ty:ty),*) => {$(
        impl DecimalSource for $ty {
            fn to_scaled(&self, scale: u8, target: &LogicalType) -> OpalResult<i128> {
                let scaled = (*self as f64) * POWERS_OF_TEN[scale as usize] as f64;
                if !scaled.is_finite() {
                    return Err(out_of_range(self, target));
                }
                // saturating narrowing is fine: the width check rejects
                // anything at or beyond 10^38
                Ok(scaled.round() as i128)
            }
        }
    )*};
}

impl_decimal_source_float!(f32, f64);

impl DecimalSource for bool {
    fn to_scaled(&self, scale: u8, _target: &LogicalType) -> OpalResult<i128> {
        Ok(if *self {
            POWERS_OF_TEN[scale as usize]
        } else {
            0
        })
    }
}

impl DecimalSource for String {
    fn to_scaled(&self, scale: u8, target: &LogicalType) -> OpalResult<i128> {
        parse_decimal(self, scale, target)
    }
}

/// Parse `[+-]digits[.digits]` into an integer scaled to `scale`.
/// Fractional digits beyond the target scale truncate toward zero.
fn parse_decimal(text: &str, scale: u8, target: &LogicalType) -> OpalResult<i128> {
    let parse_err =
        || OpalError::Parse(format!("Could not convert string '{}' to {}", text, target));
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(parse_err());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(parse_err());
    }

    let mut whole: i128 = 0;
    for digit in int_part.bytes() {
        whole = whole
            .checked_mul(10)
            .and_then(|v| v.checked_add((digit - b'0') as i128))
            .ok_or_else(|| out_of_range(&text, target))?;
    }
    let mut frac: i128 = 0;
    let mut consumed = 0usize;
    for digit in frac_part.bytes().take(scale as usize) {
        frac = frac * 10 + (digit - b'0') as i128;
        consumed += 1;
    }
    frac *= POWERS_OF_TEN[scale as usize - consumed];

    let scaled = whole
        .checked_mul(POWERS_OF_TEN[scale as usize])
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| out_of_range(&text, target))?;
    Ok(if negative { -scaled } else { scaled })
}

/// Conversion out of a scaled decimal integer.
pub(crate) trait DecimalTarget: Sized {
    fn from_unscaled(value: i128, scale: u8, target: &LogicalType) -> OpalResult<Self>;
}

macro_rules! impl_decimal_target_int {
    ($($ty:ty),*) => {$(
        impl DecimalTarget for $ty {
            fn from_unscaled(value: i128, scale: u8, target: &LogicalType) -> OpalResult<Self> {
                // integer division truncates the fractional part
                let whole = value / POWERS_OF_TEN[scale as usize];
                num_traits::cast::<i128, Self>(whole)
                    .ok_or_else(|| out_of_range(&format_decimal(value, scale), target))
            }
        }
    )*};
}

impl_decimal_target_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! impl_decimal_target_float {
    ($($ty:ty),*) => {$(
        impl DecimalTarget for $ty {
            fn from_unscaled(value: i128, scale: u8, _target: &LogicalType) -> OpalResult<Self> {
                Ok((value as f64 / POWERS_OF_TEN[scale as usize] as f64) as $ty)
            }
        }
    )*};
}

impl_decimal_target_float!(f32, f64);

impl DecimalTarget for bool {
    fn from_unscaled(value: i128, _scale: u8, _target: &LogicalType) -> OpalResult<Self> {
        Ok(value != 0)
    }
}

/// Cast any decimal-source element type into the decimal destination,
/// routing through the destination's physical store width.
pub(crate) fn to_decimal_cast<S>(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()>
where
    S: ScalarElement + DecimalSource + fmt::Display,
{
    let (width, _) = decimal_width_scale(result.logical_type())?;
    match LogicalType::decimal_physical_type(width) {
        PhysicalType::Int16 => to_decimal_exec::<S, i16>(source, result, count),
        PhysicalType::Int32 => to_decimal_exec::<S, i32>(source, result, count),
        PhysicalType::Int64 => to_decimal_exec::<S, i64>(source, result, count),
        _ => to_decimal_exec::<S, i128>(source, result, count),
    }
}

fn to_decimal_exec<S, D>(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()>
where
    S: ScalarElement + DecimalSource + fmt::Display,
    D: ScalarElement + TryFrom<i128>,
{
    let (width, scale) = decimal_width_scale(result.logical_type())?;
    let target = result.logical_type().clone();
    let limit = POWERS_OF_TEN[width as usize];
    execute_unary::<S, D, _>(source, result, count, move |value| {
        let scaled = value.to_scaled(scale, &target)?;
        if scaled >= limit || scaled <= -limit {
            return Err(out_of_range(value, &target));
        }
        D::try_from(scaled).map_err(|_| {
            OpalError::Internal("scaled decimal exceeds its storage width".to_string())
        })
    })
}

/// Cast a decimal source into any decimal-target element type.
pub(crate) fn from_decimal_cast<D>(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()>
where
    D: ScalarElement + DecimalTarget,
{
    let (width, _) = decimal_width_scale(source.logical_type())?;
    match LogicalType::decimal_physical_type(width) {
        PhysicalType::Int16 => from_decimal_exec::<i16, D>(source, result, count),
        PhysicalType::Int32 => from_decimal_exec::<i32, D>(source, result, count),
        PhysicalType::Int64 => from_decimal_exec::<i64, D>(source, result, count),
        _ => from_decimal_exec::<i128, D>(source, result, count),
    }
}

fn from_decimal_exec<S, D>(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()>
where
    S: ScalarElement + Copy + Into<i128>,
    D: ScalarElement + DecimalTarget,
{
    let (_, scale) = decimal_width_scale(source.logical_type())?;
    let target = result.logical_type().clone();
    execute_unary::<S, D, _>(source, result, count, move |value| {
        D::from_unscaled((*value).into(), scale, &target)
    })
}

/// Dispatch for a decimal source over the destination type.
pub(crate) fn decimal_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::Boolean => from_decimal_cast::<bool>(source, result, count),
        LogicalType::TinyInt => from_decimal_cast::<i8>(source, result, count),
        LogicalType::SmallInt => from_decimal_cast::<i16>(source, result, count),
        LogicalType::Integer => from_decimal_cast::<i32>(source, result, count),
        LogicalType::BigInt => from_decimal_cast::<i64>(source, result, count),
        LogicalType::HugeInt => from_decimal_cast::<i128>(source, result, count),
        LogicalType::UTinyInt => from_decimal_cast::<u8>(source, result, count),
        LogicalType::USmallInt => from_decimal_cast::<u16>(source, result, count),
        LogicalType::UInteger => from_decimal_cast::<u32>(source, result, count),
        LogicalType::UBigInt => from_decimal_cast::<u64>(source, result, count),
        LogicalType::Float => from_decimal_cast::<f32>(source, result, count),
        LogicalType::Double => from_decimal_cast::<f64>(source, result, count),
        LogicalType::Decimal { .. } => decimal_rescale_cast(source, result, count),
        LogicalType::Varchar => decimal_to_string_cast(source, result, count),
        _ => null_cast(source, result, count),
    }
}

struct RescaleParams {
    factor: i128,
    limit: Option<i128>,
    scale_up: bool,
    source_scale: u8,
    target: LogicalType,
}

fn decimal_rescale_cast(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()> {
    let (src_width, src_scale) = decimal_width_scale(source.logical_type())?;
    let (dst_width, dst_scale) = decimal_width_scale(result.logical_type())?;
    let target = result.logical_type().clone();

    let params = if dst_scale >= src_scale {
        let diff = (dst_scale - src_scale) as usize;
        let target_digits = (dst_width as usize) - diff;
        RescaleParams {
            factor: POWERS_OF_TEN[diff],
            limit: if (src_width as usize) < target_digits {
                // source digits always fit the rescaled width
                None
            } else {
                Some(POWERS_OF_TEN[target_digits])
            },
            scale_up: true,
            source_scale: src_scale,
            target,
        }
    } else {
        let diff = (src_scale - dst_scale) as usize;
        let target_digits = (dst_width as usize) + diff;
        RescaleParams {
            factor: POWERS_OF_TEN[diff],
            limit: if (src_width as usize) < target_digits {
                None
            } else {
                Some(POWERS_OF_TEN[target_digits])
            },
            scale_up: false,
            source_scale: src_scale,
            target,
        }
    };

    match LogicalType::decimal_physical_type(src_width) {
        PhysicalType::Int16 => rescale_to::<i16>(source, result, count, params, dst_width),
        PhysicalType::Int32 => rescale_to::<i32>(source, result, count, params, dst_width),
        PhysicalType::Int64 => rescale_to::<i64>(source, result, count, params, dst_width),
        _ => rescale_to::<i128>(source, result, count, params, dst_width),
    }
}

fn rescale_to<S>(
    source: &Vector,
    result: &mut Vector,
    count: usize,
    params: RescaleParams,
    dst_width: u8,
) -> OpalResult<()>
where
    S: ScalarElement + Copy + Into<i128>,
{
    match LogicalType::decimal_physical_type(dst_width) {
        PhysicalType::Int16 => rescale_exec::<S, i16>(source, result, count, params),
        PhysicalType::Int32 => rescale_exec::<S, i32>(source, result, count, params),
        PhysicalType::Int64 => rescale_exec::<S, i64>(source, result, count, params),
        _ => rescale_exec::<S, i128>(source, result, count, params),
    }
}

fn rescale_exec<S, D>(
    source: &Vector,
    result: &mut Vector,
    count: usize,
    params: RescaleParams,
) -> OpalResult<()>
where
    S: ScalarElement + Copy + Into<i128>,
    D: ScalarElement + TryFrom<i128>,
{
    execute_unary::<S, D, _>(source, result, count, move |value| {
        let value: i128 = (*value).into();
        if let Some(limit) = params.limit {
            if value >= limit || value <= -limit {
                return Err(out_of_range(
                    &format_decimal(value, params.source_scale),
                    &params.target,
                ));
            }
        }
        let rescaled = if params.scale_up {
            value
                .checked_mul(params.factor)
                .ok_or_else(|| out_of_range(&format_decimal(value, params.source_scale), &params.target))?
        } else {
            value / params.factor
        };
        D::try_from(rescaled).map_err(|_| {
            OpalError::Internal("rescaled decimal exceeds its storage width".to_string())
        })
    })
}

fn decimal_to_string_cast(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()> {
    let (width, _) = decimal_width_scale(source.logical_type())?;
    match LogicalType::decimal_physical_type(width) {
        PhysicalType::Int16 => decimal_to_string_exec::<i16>(source, result, count),
        PhysicalType::Int32 => decimal_to_string_exec::<i32>(source, result, count),
        PhysicalType::Int64 => decimal_to_string_exec::<i64>(source, result, count),
        _ => decimal_to_string_exec::<i128>(source, result, count),
    }
}

fn decimal_to_string_exec<S>(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()>
where
    S: ScalarElement + Copy + Into<i128>,
{
    let (_, scale) = decimal_width_scale(source.logical_type())?;
    execute_unary::<S, String, _>(source, result, count, move |value| {
        Ok(format_decimal((*value).into(), scale))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal_type(width: u8, scale: u8) -> LogicalType {
        LogicalType::Decimal { width, scale }
    }

    #[test]
    fn test_integer_to_scaled() {
        let target = decimal_type(10, 2);
        assert_eq!(42i32.to_scaled(2, &target).unwrap(), 4200);
        assert_eq!((-7i64).to_scaled(3, &target).unwrap(), -7000);
        assert_eq!(true.to_scaled(2, &target).unwrap(), 100);
    }

    #[test]
    fn test_float_to_scaled_rounds() {
        let target = decimal_type(10, 2);
        assert_eq!(1.006f64.to_scaled(2, &target).unwrap(), 101);
        assert_eq!((-1.006f64).to_scaled(2, &target).unwrap(), -101);
        assert!(f64::NAN.to_scaled(2, &target).is_err());
    }

    #[test]
    fn test_parse_decimal() {
        let target = decimal_type(10, 2);
        assert_eq!(parse_decimal("123.45", 2, &target).unwrap(), 12345);
        assert_eq!(parse_decimal("-0.5", 2, &target).unwrap(), -50);
        assert_eq!(parse_decimal(" 7 ", 2, &target).unwrap(), 700);
        // digits beyond the scale truncate toward zero
        assert_eq!(parse_decimal("1.999", 2, &target).unwrap(), 199);
        assert!(parse_decimal("abc", 2, &target).is_err());
        assert!(parse_decimal("1.2.3", 2, &target).is_err());
        assert!(parse_decimal("", 2, &target).is_err());
    }

    #[test]
    fn test_from_unscaled_truncates() {
        let target = LogicalType::Integer;
        assert_eq!(i32::from_unscaled(199, 2, &target).unwrap(), 1);
        assert_eq!(i32::from_unscaled(-199, 2, &target).unwrap(), -1);
        assert_eq!(f64::from_unscaled(150, 2, &target).unwrap(), 1.5);
        assert!(i8::from_unscaled(99999, 0, &LogicalType::TinyInt).is_err());
    }
}
