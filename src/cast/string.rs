//! String parse operators and the blob pathway.
//!
//! String-to-scalar casts come in two modes: lenient parsing trims
//! surrounding ASCII whitespace before requiring the whole remainder to
//! match the destination grammar; strict parsing requires the entire
//! input to match with no trimming. A partial numeric prefix is rejected
//! in both modes.

use crate::cast::decimal;
use crate::cast::executor::execute_unary;
use crate::cast::null_cast;
use crate::common::error::{OpalError, OpalResult};
use crate::types::logical_type::LogicalType;
use crate::types::temporal::{self, Interval};
use crate::types::value::escape_blob;
use crate::types::vector::{ScalarElement, Vector};
use std::num::IntErrorKind;

/// Full-input numeric parse; integer overflow is reported as an
/// out-of-range failure, any other mismatch as a parse failure.
pub(crate) trait ParseNumeric: Sized {
    fn parse_text(text: &str, target: &LogicalType) -> OpalResult<Self>;
}

macro_rules! impl_parse_numeric_int {
    ($($ty:ty),*) => {$(
        impl ParseNumeric for $ty {
            fn parse_text(text: &str, target: &LogicalType) -> OpalResult<Self> {
                match text.parse::<$ty>() {
                    Ok(value) => Ok(value),
                    Err(error) => match error.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            Err(OpalError::OutOfRange(format!(
                                "Casting value \"{}\" to type {} failed: value is out of range!",
                                text, target
                            )))
                        }
                        _ => Err(OpalError::Parse(format!(
                            "Could not convert string '{}' to {}",
                            text, target
                        ))),
                    },
                }
            }
        }
    )*};
}

impl_parse_numeric_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! impl_parse_numeric_float {
    ($($ty:ty),*) => {$(
        impl ParseNumeric for $ty {
            fn parse_text(text: &str, target: &LogicalType) -> OpalResult<Self> {
                text.parse::<$ty>().map_err(|_| {
                    OpalError::Parse(format!(
                        "Could not convert string '{}' to {}",
                        text, target
                    ))
                })
            }
        }
    )*};
}

impl_parse_numeric_float!(f32, f64);

fn parse_bool(text: &str, strict: bool) -> OpalResult<bool> {
    if strict {
        return match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(OpalError::Parse(format!(
                "Could not convert string '{}' to BOOLEAN",
                text
            ))),
        };
    }
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(OpalError::Parse(format!(
            "Could not convert string '{}' to BOOLEAN",
            text
        ))),
    }
}

fn string_to_numeric_exec<D>(
    source: &Vector,
    result: &mut Vector,
    count: usize,
    strict: bool,
) -> OpalResult<()>
where
    D: ScalarElement + ParseNumeric,
{
    let target = result.logical_type().clone();
    execute_unary::<String, D, _>(source, result, count, move |text| {
        let input = if strict { text.as_str() } else { text.trim() };
        D::parse_text(input, &target)
    })
}

/// Dispatch for a string source over the destination type.
pub(crate) fn string_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
    strict: bool,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::Boolean => {
            execute_unary::<String, bool, _>(source, result, count, move |text| {
                parse_bool(text, strict)
            })
        }
        LogicalType::TinyInt => string_to_numeric_exec::<i8>(source, result, count, strict),
        LogicalType::SmallInt => string_to_numeric_exec::<i16>(source, result, count, strict),
        LogicalType::Integer => string_to_numeric_exec::<i32>(source, result, count, strict),
        LogicalType::BigInt => string_to_numeric_exec::<i64>(source, result, count, strict),
        LogicalType::HugeInt => string_to_numeric_exec::<i128>(source, result, count, strict),
        LogicalType::UTinyInt => string_to_numeric_exec::<u8>(source, result, count, strict),
        LogicalType::USmallInt => string_to_numeric_exec::<u16>(source, result, count, strict),
        LogicalType::UInteger => string_to_numeric_exec::<u32>(source, result, count, strict),
        LogicalType::UBigInt => string_to_numeric_exec::<u64>(source, result, count, strict),
        LogicalType::Float => string_to_numeric_exec::<f32>(source, result, count, strict),
        LogicalType::Double => string_to_numeric_exec::<f64>(source, result, count, strict),
        // the decimal grammar is shared by both modes
        LogicalType::Decimal { .. } => decimal::to_decimal_cast::<String>(source, result, count),
        LogicalType::Date => {
            execute_unary::<String, i32, _>(source, result, count, move |text| {
                temporal::parse_date(text, strict)
            })
        }
        LogicalType::Time => {
            execute_unary::<String, i64, _>(source, result, count, move |text| {
                temporal::parse_time(text, strict)
            })
        }
        LogicalType::Timestamp => {
            execute_unary::<String, i64, _>(source, result, count, |text| {
                temporal::parse_timestamp(text)
            })
        }
        LogicalType::Interval => {
            execute_unary::<String, Interval, _>(source, result, count, |text| {
                temporal::parse_interval(text)
            })
        }
        LogicalType::Blob => execute_unary::<String, Vec<u8>, _>(source, result, count, |text| {
            Ok(text.as_bytes().to_vec())
        }),
        _ => null_cast(source, result, count),
    }
}

/// Dispatch for a blob source: text rendering escapes non-printable bytes.
pub(crate) fn blob_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::Varchar => {
            execute_unary::<Vec<u8>, String, _>(source, result, count, |bytes| {
                Ok(escape_blob(bytes))
            })
        }
        _ => null_cast(source, result, count),
    }
}
