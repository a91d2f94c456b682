use crate::common::error::{OpalError, OpalResult};
use crate::types::logical_type::LogicalType;
use crate::types::temporal::{self, Interval};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a single value with type information. The cast engine works
/// over vectors; `Value` is the row-wise view used for vector
/// construction, inspection, and the generic value-to-text fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value (type is stored separately)
    Null,
    /// Boolean value
    Boolean(bool),
    /// 8-bit signed integer
    TinyInt(i8),
    /// 16-bit signed integer
    SmallInt(i16),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    BigInt(i64),
    /// 128-bit signed integer
    HugeInt(i128),
    /// 8-bit unsigned integer
    UTinyInt(u8),
    /// 16-bit unsigned integer
    USmallInt(u16),
    /// 32-bit unsigned integer
    UInteger(u32),
    /// 64-bit unsigned integer
    UBigInt(u64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit double precision
    Double(f64),
    /// Decimal value (stored as an integer scaled by 10^scale)
    Decimal { value: i128, width: u8, scale: u8 },
    /// String value
    Varchar(String),
    /// Binary data
    Blob(Vec<u8>),
    /// Date value (days since 1970-01-01)
    Date(i32),
    /// Time value (microseconds since midnight)
    Time(i64),
    /// Timestamp value (microseconds since 1970-01-01 00:00:00 UTC)
    Timestamp(i64),
    /// Interval value
    Interval(Interval),
    /// List value
    List(Vec<Value>),
    /// Struct value with field values
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the logical type of this value
    pub fn get_type(&self) -> LogicalType {
        match self {
            Value::Null => LogicalType::Null,
            Value::Boolean(_) => LogicalType::Boolean,
            Value::TinyInt(_) => LogicalType::TinyInt,
            Value::SmallInt(_) => LogicalType::SmallInt,
            Value::Integer(_) => LogicalType::Integer,
            Value::BigInt(_) => LogicalType::BigInt,
            Value::HugeInt(_) => LogicalType::HugeInt,
            Value::UTinyInt(_) => LogicalType::UTinyInt,
            Value::USmallInt(_) => LogicalType::USmallInt,
            Value::UInteger(_) => LogicalType::UInteger,
            Value::UBigInt(_) => LogicalType::UBigInt,
            Value::Float(_) => LogicalType::Float,
            Value::Double(_) => LogicalType::Double,
            Value::Decimal { width, scale, .. } => LogicalType::Decimal {
                width: *width,
                scale: *scale,
            },
            Value::Varchar(_) => LogicalType::Varchar,
            Value::Blob(_) => LogicalType::Blob,
            Value::Date(_) => LogicalType::Date,
            Value::Time(_) => LogicalType::Time,
            Value::Timestamp(_) => LogicalType::Timestamp,
            Value::Interval(_) => LogicalType::Interval,
            Value::List(values) => {
                let element = values
                    .iter()
                    .find(|v| !v.is_null())
                    .map(|v| v.get_type())
                    .unwrap_or(LogicalType::Null);
                LogicalType::List(Box::new(element))
            }
            Value::Struct(fields) => LogicalType::Struct(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.get_type()))
                    .collect(),
            ),
        }
    }

    /// Try to extract a boolean value
    pub fn try_as_boolean(&self) -> OpalResult<bool> {
        match self {
            Value::Boolean(value) => Ok(*value),
            _ => Err(OpalError::InvalidType(format!(
                "Cannot extract boolean from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract an i32 value
    pub fn try_as_i32(&self) -> OpalResult<i32> {
        match self {
            Value::Integer(value) => Ok(*value),
            Value::SmallInt(value) => Ok(*value as i32),
            Value::TinyInt(value) => Ok(*value as i32),
            _ => Err(OpalError::InvalidType(format!(
                "Cannot extract i32 from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract an i64 value
    pub fn try_as_i64(&self) -> OpalResult<i64> {
        match self {
            Value::BigInt(value) => Ok(*value),
            Value::Integer(value) => Ok(*value as i64),
            Value::SmallInt(value) => Ok(*value as i64),
            Value::TinyInt(value) => Ok(*value as i64),
            Value::Date(value) => Ok(*value as i64),
            Value::Time(value) | Value::Timestamp(value) => Ok(*value),
            _ => Err(OpalError::InvalidType(format!(
                "Cannot extract i64 from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract an f64 value
    pub fn try_as_f64(&self) -> OpalResult<f64> {
        match self {
            Value::Double(value) => Ok(*value),
            Value::Float(value) => Ok(*value as f64),
            Value::BigInt(value) => Ok(*value as f64),
            Value::Integer(value) => Ok(*value as f64),
            _ => Err(OpalError::InvalidType(format!(
                "Cannot extract f64 from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract a string value
    pub fn try_as_string(&self) -> OpalResult<String> {
        match self {
            Value::Varchar(value) => Ok(value.clone()),
            _ => Err(OpalError::InvalidType(format!(
                "Cannot extract string from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract a list value
    pub fn try_as_list(&self) -> OpalResult<Vec<Value>> {
        match self {
            Value::List(values) => Ok(values.clone()),
            _ => Err(OpalError::InvalidType(format!(
                "Cannot extract list from {}",
                self.get_type()
            ))),
        }
    }

    /// Create a boolean value
    pub fn boolean(value: bool) -> Self {
        Value::Boolean(value)
    }

    /// Create an integer value
    pub fn integer(value: i32) -> Self {
        Value::Integer(value)
    }

    /// Create a big integer value
    pub fn bigint(value: i64) -> Self {
        Value::BigInt(value)
    }

    /// Create a double value
    pub fn double(value: f64) -> Self {
        Value::Double(value)
    }

    /// Create a string value
    pub fn varchar(value: impl Into<String>) -> Self {
        Value::Varchar(value.into())
    }

    /// Create a decimal value from its scaled integer representation
    pub fn decimal(value: i128, width: u8, scale: u8) -> Self {
        Value::Decimal {
            value,
            width,
            scale,
        }
    }

    /// Create a date value
    pub fn date(value: i32) -> Self {
        Value::Date(value)
    }

    /// Create a timestamp value
    pub fn timestamp(value: i64) -> Self {
        Value::Timestamp(value)
    }

    /// Create a list value
    pub fn list(values: Vec<Value>) -> Self {
        Value::List(values)
    }

    /// Create a struct value
    pub fn struct_(fields: Vec<(String, Value)>) -> Self {
        Value::Struct(fields)
    }
}

/// Render a scaled decimal integer with the decimal point placed per
/// `scale`. Sign is handled before the split so `-0.50` keeps its sign.
pub(crate) fn format_decimal(value: i128, scale: u8) -> String {
    if scale == 0 {
        return value.to_string();
    }
    let divisor = 10_u128.pow(scale as u32);
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!(
        "{}{}.{:0width$}",
        sign,
        abs / divisor,
        abs % divisor,
        width = scale as usize
    )
}

/// Render blob bytes as text: printable ASCII passes through, everything
/// else becomes a `\xHH` escape.
pub(crate) fn escape_blob(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if (0x20..=0x7e).contains(&byte) && byte != b'\\' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("\\x{:02X}", byte));
        }
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::TinyInt(value) => write!(f, "{}", value),
            Value::SmallInt(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::BigInt(value) => write!(f, "{}", value),
            Value::HugeInt(value) => write!(f, "{}", value),
            Value::UTinyInt(value) => write!(f, "{}", value),
            Value::USmallInt(value) => write!(f, "{}", value),
            Value::UInteger(value) => write!(f, "{}", value),
            Value::UBigInt(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", value),
            Value::Decimal { value, scale, .. } => write!(f, "{}", format_decimal(*value, *scale)),
            Value::Varchar(value) => write!(f, "'{}'", value),
            Value::Blob(bytes) => write!(f, "{}", escape_blob(bytes)),
            Value::Date(days) => match temporal::date_to_string(*days) {
                Ok(text) => write!(f, "{}", text),
                Err(_) => write!(f, "{}", days),
            },
            Value::Time(micros) => write!(f, "{}", temporal::time_to_string(*micros)),
            Value::Timestamp(micros) => match temporal::timestamp_to_string(*micros) {
                Ok(text) => write!(f, "{}", text),
                Err(_) => write!(f, "{}", micros),
            },
            Value::Interval(interval) => write!(f, "{}", temporal::interval_to_string(interval)),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        let bool_val = Value::boolean(true);
        assert!(bool_val.try_as_boolean().unwrap());

        let int_val = Value::integer(42);
        assert_eq!(int_val.try_as_i32().unwrap(), 42);

        let double_val = Value::double(3.5);
        assert_eq!(double_val.try_as_f64().unwrap(), 3.5);
    }

    #[test]
    fn test_value_types() {
        assert_eq!(Value::bigint(1).get_type(), LogicalType::BigInt);
        assert_eq!(
            Value::decimal(1234, 10, 2).get_type(),
            LogicalType::Decimal { width: 10, scale: 2 }
        );
        assert_eq!(
            Value::list(vec![Value::integer(1)]).get_type(),
            LogicalType::list(LogicalType::Integer)
        );
    }

    #[test]
    fn test_decimal_rendering() {
        assert_eq!(format_decimal(12345, 2), "123.45");
        assert_eq!(format_decimal(-50, 2), "-0.50");
        assert_eq!(format_decimal(7, 0), "7");
        assert_eq!(format_decimal(5, 3), "0.005");
    }

    #[test]
    fn test_blob_escaping() {
        assert_eq!(escape_blob(b"abc"), "abc");
        assert_eq!(escape_blob(&[0x00, 0x61, 0xff]), "\\x00a\\xFF");
    }

    #[test]
    fn test_nested_display() {
        let value = Value::struct_(vec![
            ("a".to_string(), Value::integer(1)),
            ("b".to_string(), Value::varchar("x")),
        ]);
        assert_eq!(value.to_string(), "{a: 1, b: 'x'}");

        let list = Value::list(vec![Value::integer(1), Value::Null]);
        assert_eq!(list.to_string(), "[1, NULL]");
    }
}
