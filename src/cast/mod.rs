//! The vectorized cast engine.
//!
//! `cast_vector` converts a batch of column values from one logical type
//! to another: the caller passes a populated source vector and a
//! destination shell of the target type, and the engine fills the
//! destination's buffer, validity mask, and class tag. Failure aborts
//! the whole batch and leaves the destination undefined.

pub(crate) mod decimal;
pub(crate) mod executor;
pub(crate) mod nested;
pub(crate) mod numeric;
pub(crate) mod string;
pub(crate) mod temporal;

use crate::common::error::{OpalError, OpalResult};
use crate::types::logical_type::LogicalType;
use crate::types::vector::{Vector, VectorClass};
use tracing::trace;

/// Cast `count` rows of `source` into `result`, whose logical type names
/// the destination. `strict` selects the exact-grammar string parse mode.
/// The source and destination types must differ; same-type casts are a
/// no-op handled by the caller.
pub fn cast_vector(
    source: &Vector,
    result: &mut Vector,
    count: usize,
    strict: bool,
) -> OpalResult<()> {
    if source.logical_type() == result.logical_type() {
        return Err(OpalError::Internal(format!(
            "cast invoked on identical types ({})",
            source.logical_type()
        )));
    }
    trace!(
        source = %source.logical_type(),
        target = %result.logical_type(),
        count,
        "vector cast"
    );
    match source.logical_type() {
        LogicalType::Boolean => numeric::boolean_cast_switch(source, result, count),
        LogicalType::TinyInt => numeric::numeric_cast_switch::<i8>(source, result, count),
        LogicalType::SmallInt => numeric::numeric_cast_switch::<i16>(source, result, count),
        LogicalType::Integer => numeric::numeric_cast_switch::<i32>(source, result, count),
        LogicalType::BigInt => numeric::numeric_cast_switch::<i64>(source, result, count),
        LogicalType::HugeInt => numeric::numeric_cast_switch::<i128>(source, result, count),
        LogicalType::UTinyInt => numeric::numeric_cast_switch::<u8>(source, result, count),
        LogicalType::USmallInt => numeric::numeric_cast_switch::<u16>(source, result, count),
        LogicalType::UInteger => numeric::numeric_cast_switch::<u32>(source, result, count),
        LogicalType::UBigInt => numeric::numeric_cast_switch::<u64>(source, result, count),
        LogicalType::Float => numeric::numeric_cast_switch::<f32>(source, result, count),
        LogicalType::Double => numeric::numeric_cast_switch::<f64>(source, result, count),
        LogicalType::Decimal { .. } => decimal::decimal_cast_switch(source, result, count),
        LogicalType::Varchar => string::string_cast_switch(source, result, count, strict),
        LogicalType::Blob => string::blob_cast_switch(source, result, count),
        LogicalType::Date => temporal::date_cast_switch(source, result, count),
        LogicalType::Time => temporal::time_cast_switch(source, result, count),
        LogicalType::Timestamp => temporal::timestamp_cast_switch(source, result, count),
        LogicalType::Interval => temporal::interval_cast_switch(source, result, count),
        LogicalType::Null => {
            // a NULL-typed source needs no conversion at all
            result.set_all_null(VectorClass::Constant, 1);
            Ok(())
        }
        LogicalType::List(_) => nested::list_cast_switch(source, result, count),
        LogicalType::Struct(_) => nested::struct_cast_switch(source, result, count),
    }
}

/// The fallback for type pairs with no conversion rule: succeeds only if
/// every source row in range is NULL, producing a wholly-null destination
/// with the source's class shape.
pub(crate) fn null_cast(source: &Vector, result: &mut Vector, count: usize) -> OpalResult<()> {
    if source.has_any_valid(count) {
        return Err(unimplemented_cast(
            source.logical_type(),
            result.logical_type(),
        ));
    }
    result.set_all_null(source.class(), count);
    Ok(())
}

pub(crate) fn unimplemented_cast(source: &LogicalType, target: &LogicalType) -> OpalError {
    OpalError::NotImplemented(format!(
        "Unimplemented type for cast ({} -> {})",
        source, target
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::value::Value;
    use crate::types::vector::ValidityMask;

    #[test]
    fn test_same_type_cast_is_rejected() {
        let source = Vector::from_values(LogicalType::Integer, &[Value::integer(1)]).unwrap();
        let mut result = Vector::new(LogicalType::Integer, 1);
        assert!(cast_vector(&source, &mut result, 1, false).is_err());
    }

    #[test]
    fn test_null_typed_source_always_succeeds() {
        let source = Vector::constant_null(LogicalType::Null);
        let mut result = Vector::new(LogicalType::Interval, 1);
        cast_vector(&source, &mut result, 1, false).unwrap();
        assert_eq!(result.class(), VectorClass::Constant);
        assert!(result.is_null(0));
    }

    #[test]
    fn test_null_only_fallback_accepts_all_null_flat() {
        // integer -> interval has no rule, but an all-null source passes
        let source =
            Vector::from_values(LogicalType::Integer, &[Value::Null, Value::Null]).unwrap();
        let mut result = Vector::new(LogicalType::Interval, 2);
        cast_vector(&source, &mut result, 2, false).unwrap();
        assert_eq!(result.class(), VectorClass::Flat);
        assert_eq!(result.validity().null_count(), 2);
    }

    #[test]
    fn test_null_only_fallback_rejects_values() {
        let source =
            Vector::from_values(LogicalType::Integer, &[Value::Null, Value::integer(1)]).unwrap();
        let mut result = Vector::new(LogicalType::Interval, 2);
        let error = cast_vector(&source, &mut result, 2, false).unwrap_err();
        assert!(matches!(error, OpalError::NotImplemented(_)));
        assert!(error
            .to_string()
            .contains("Unimplemented type for cast (INTEGER -> INTERVAL)"));
    }

    #[test]
    fn test_fallback_keeps_constant_shape() {
        let source = Vector::constant_null(LogicalType::Integer);
        let mut result = Vector::new(LogicalType::Interval, 4);
        cast_vector(&source, &mut result, 4, false).unwrap();
        assert_eq!(result.class(), VectorClass::Constant);
        assert_eq!(result.validity(), &ValidityMask::all_null(1));
    }
}
