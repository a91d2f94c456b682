//! Temporal conversion operators.
//!
//! Defined pairs: Date <-> Timestamp, Timestamp -> Date/Time, and every
//! temporal type to text. Anything else falls through to the null-only
//! fallback.

use crate::cast::executor::execute_unary;
use crate::cast::null_cast;
use crate::common::error::OpalResult;
use crate::types::logical_type::LogicalType;
use crate::types::temporal::{self, Interval};
use crate::types::vector::Vector;

pub(crate) fn date_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::Varchar => {
            execute_unary::<i32, String, _>(source, result, count, |days| {
                temporal::date_to_string(*days)
            })
        }
        // date to timestamp assumes midnight
        LogicalType::Timestamp => execute_unary::<i32, i64, _>(source, result, count, |days| {
            temporal::date_to_timestamp(*days)
        }),
        _ => null_cast(source, result, count),
    }
}

pub(crate) fn time_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::Varchar => {
            execute_unary::<i64, String, _>(source, result, count, |micros| {
                Ok(temporal::time_to_string(*micros))
            })
        }
        _ => null_cast(source, result, count),
    }
}

pub(crate) fn timestamp_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::Varchar => {
            execute_unary::<i64, String, _>(source, result, count, |micros| {
                temporal::timestamp_to_string(*micros)
            })
        }
        // timestamp to date truncates the time-of-day
        LogicalType::Date => execute_unary::<i64, i32, _>(source, result, count, |micros| {
            Ok(temporal::timestamp_to_date(*micros))
        }),
        // timestamp to time extracts the time-of-day
        LogicalType::Time => execute_unary::<i64, i64, _>(source, result, count, |micros| {
            Ok(temporal::timestamp_to_time(*micros))
        }),
        _ => null_cast(source, result, count),
    }
}

pub(crate) fn interval_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type() {
        LogicalType::Varchar => {
            execute_unary::<Interval, String, _>(source, result, count, |interval| {
                Ok(temporal::interval_to_string(interval))
            })
        }
        _ => null_cast(source, result, count),
    }
}
