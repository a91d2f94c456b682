use crate::common::error::{OpalError, OpalResult};
use crate::types::physical_type::PhysicalType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of significant digits a decimal type may carry.
pub const MAX_DECIMAL_WIDTH: u8 = 38;

/// Logical types represent the SQL-level types that users interact with.
/// These are mapped to physical types for storage and computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// NULL type (every value of this type is NULL)
    Null,
    /// Boolean type (TRUE/FALSE)
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 128-bit signed integer
    HugeInt,
    /// 8-bit unsigned integer
    UTinyInt,
    /// 16-bit unsigned integer
    USmallInt,
    /// 32-bit unsigned integer
    UInteger,
    /// 64-bit unsigned integer
    UBigInt,
    /// 32-bit floating point
    Float,
    /// 64-bit double precision
    Double,
    /// Fixed-point decimal with total width and fractional scale
    Decimal { width: u8, scale: u8 },
    /// Variable length string
    Varchar,
    /// Binary large object
    Blob,
    /// Date value (days since 1970-01-01)
    Date,
    /// Time value (microseconds since midnight)
    Time,
    /// Timestamp value (microseconds since 1970-01-01 00:00:00 UTC)
    Timestamp,
    /// Interval type (months/days/microseconds)
    Interval,
    /// List/array type with element type
    List(Box<LogicalType>),
    /// Struct type with named fields
    Struct(Vec<(String, LogicalType)>),
}

impl LogicalType {
    /// Get the corresponding physical type for this logical type.
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            LogicalType::Null => PhysicalType::Null,
            LogicalType::Boolean => PhysicalType::Bool,
            LogicalType::TinyInt => PhysicalType::Int8,
            LogicalType::SmallInt => PhysicalType::Int16,
            LogicalType::Integer => PhysicalType::Int32,
            LogicalType::BigInt => PhysicalType::Int64,
            LogicalType::HugeInt => PhysicalType::Int128,
            LogicalType::UTinyInt => PhysicalType::UInt8,
            LogicalType::USmallInt => PhysicalType::UInt16,
            LogicalType::UInteger => PhysicalType::UInt32,
            LogicalType::UBigInt => PhysicalType::UInt64,
            LogicalType::Float => PhysicalType::Float,
            LogicalType::Double => PhysicalType::Double,
            LogicalType::Decimal { width, .. } => Self::decimal_physical_type(*width),
            LogicalType::Varchar => PhysicalType::Varchar,
            LogicalType::Blob => PhysicalType::Blob,
            LogicalType::Date => PhysicalType::Int32,
            LogicalType::Time => PhysicalType::Int64,
            LogicalType::Timestamp => PhysicalType::Int64,
            LogicalType::Interval => PhysicalType::Interval,
            LogicalType::List(_) => PhysicalType::List,
            LogicalType::Struct(_) => PhysicalType::Struct,
        }
    }

    /// The smallest integer store that holds `width` decimal digits.
    pub fn decimal_physical_type(width: u8) -> PhysicalType {
        match width {
            0..=4 => PhysicalType::Int16,
            5..=9 => PhysicalType::Int32,
            10..=18 => PhysicalType::Int64,
            _ => PhysicalType::Int128,
        }
    }

    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInt
                | LogicalType::SmallInt
                | LogicalType::Integer
                | LogicalType::BigInt
                | LogicalType::HugeInt
                | LogicalType::UTinyInt
                | LogicalType::USmallInt
                | LogicalType::UInteger
                | LogicalType::UBigInt
                | LogicalType::Float
                | LogicalType::Double
                | LogicalType::Decimal { .. }
        )
    }

    /// Check if this type is integral (no fractional part)
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInt
                | LogicalType::SmallInt
                | LogicalType::Integer
                | LogicalType::BigInt
                | LogicalType::HugeInt
                | LogicalType::UTinyInt
                | LogicalType::USmallInt
                | LogicalType::UInteger
                | LogicalType::UBigInt
        )
    }

    /// Check if this type is floating point
    pub fn is_floating_point(&self) -> bool {
        matches!(self, LogicalType::Float | LogicalType::Double)
    }

    /// Check if this type is temporal (date/time related)
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            LogicalType::Date | LogicalType::Time | LogicalType::Timestamp | LogicalType::Interval
        )
    }

    /// Check if this type is a nested type (contains other types)
    pub fn is_nested(&self) -> bool {
        matches!(self, LogicalType::List(_) | LogicalType::Struct(_))
    }

    /// Validate a decimal width and scale pair
    pub fn validate_decimal(width: u8, scale: u8) -> OpalResult<()> {
        if width == 0 || width > MAX_DECIMAL_WIDTH {
            return Err(OpalError::InvalidType(format!(
                "Decimal width must be between 1 and {}, got {}",
                MAX_DECIMAL_WIDTH, width
            )));
        }
        if scale > width {
            return Err(OpalError::InvalidType(format!(
                "Decimal scale ({}) cannot be greater than width ({})",
                scale, width
            )));
        }
        Ok(())
    }

    /// Create a decimal type with validation
    pub fn decimal(width: u8, scale: u8) -> OpalResult<LogicalType> {
        Self::validate_decimal(width, scale)?;
        Ok(LogicalType::Decimal { width, scale })
    }

    /// Create a list type over the given element type
    pub fn list(child: LogicalType) -> LogicalType {
        LogicalType::List(Box::new(child))
    }

    /// Check if this type can be implicitly cast to another type
    pub fn can_implicitly_cast_to(&self, target: &LogicalType) -> bool {
        use LogicalType::*;

        match (self, target) {
            (a, b) if a == b => true,
            (Null, _) => true,

            // Signed numeric promotions
            (TinyInt, SmallInt | Integer | BigInt | HugeInt | Float | Double | Decimal { .. }) => {
                true
            }
            (SmallInt, Integer | BigInt | HugeInt | Float | Double | Decimal { .. }) => true,
            (Integer, BigInt | HugeInt | Float | Double | Decimal { .. }) => true,
            (BigInt, HugeInt | Float | Double | Decimal { .. }) => true,
            (HugeInt, Float | Double | Decimal { .. }) => true,

            // Unsigned promotions (a wider signed type always fits the value)
            (UTinyInt, SmallInt | Integer | BigInt | HugeInt | Float | Double) => true,
            (USmallInt, Integer | BigInt | HugeInt | Float | Double) => true,
            (UInteger, BigInt | HugeInt | Float | Double) => true,
            (UBigInt, HugeInt | Float | Double) => true,
            (UTinyInt, USmallInt | UInteger | UBigInt) => true,
            (USmallInt, UInteger | UBigInt) => true,
            (UInteger, UBigInt) => true,

            (Float, Double) => true,

            // Temporal widening
            (Date, Timestamp) => true,

            // Any scalar type to string
            (_, Varchar) => !self.is_nested(),

            _ => false,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Null => write!(f, "NULL"),
            LogicalType::Boolean => write!(f, "BOOLEAN"),
            LogicalType::TinyInt => write!(f, "TINYINT"),
            LogicalType::SmallInt => write!(f, "SMALLINT"),
            LogicalType::Integer => write!(f, "INTEGER"),
            LogicalType::BigInt => write!(f, "BIGINT"),
            LogicalType::HugeInt => write!(f, "HUGEINT"),
            LogicalType::UTinyInt => write!(f, "UTINYINT"),
            LogicalType::USmallInt => write!(f, "USMALLINT"),
            LogicalType::UInteger => write!(f, "UINTEGER"),
            LogicalType::UBigInt => write!(f, "UBIGINT"),
            LogicalType::Float => write!(f, "FLOAT"),
            LogicalType::Double => write!(f, "DOUBLE"),
            LogicalType::Decimal { width, scale } => write!(f, "DECIMAL({},{})", width, scale),
            LogicalType::Varchar => write!(f, "VARCHAR"),
            LogicalType::Blob => write!(f, "BLOB"),
            LogicalType::Date => write!(f, "DATE"),
            LogicalType::Time => write!(f, "TIME"),
            LogicalType::Timestamp => write!(f, "TIMESTAMP"),
            LogicalType::Interval => write!(f, "INTERVAL"),
            LogicalType::List(element_type) => write!(f, "{}[]", element_type),
            LogicalType::Struct(fields) => {
                write!(f, "STRUCT(")?;
                for (i, (name, field_type)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", name, field_type)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Type system utilities
pub struct TypeUtils;

impl TypeUtils {
    /// Get the smallest type that can hold both types
    pub fn max_type(type1: &LogicalType, type2: &LogicalType) -> OpalResult<LogicalType> {
        if type1 == type2 {
            return Ok(type1.clone());
        }
        if type1.can_implicitly_cast_to(type2) {
            return Ok(type2.clone());
        }
        if type2.can_implicitly_cast_to(type1) {
            return Ok(type1.clone());
        }
        match (type1, type2) {
            (LogicalType::Float, LogicalType::Double)
            | (LogicalType::Double, LogicalType::Float) => Ok(LogicalType::Double),
            _ => Err(OpalError::InvalidType(format!(
                "Cannot find common type between {} and {}",
                type1, type2
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_type_predicates() {
        let int_type = LogicalType::Integer;
        assert!(int_type.is_numeric());
        assert!(int_type.is_integral());
        assert!(!int_type.is_floating_point());

        let float_type = LogicalType::Float;
        assert!(float_type.is_numeric());
        assert!(!float_type.is_integral());
        assert!(float_type.is_floating_point());

        assert!(LogicalType::UBigInt.is_integral());
        assert!(LogicalType::Timestamp.is_temporal());
    }

    #[test]
    fn test_decimal_validation() {
        assert!(LogicalType::decimal(10, 2).is_ok());
        assert!(LogicalType::decimal(0, 0).is_err());
        assert!(LogicalType::decimal(39, 10).is_err());
        assert!(LogicalType::decimal(10, 11).is_err());
    }

    #[test]
    fn test_decimal_storage_width() {
        assert_eq!(
            LogicalType::decimal_physical_type(4),
            PhysicalType::Int16
        );
        assert_eq!(
            LogicalType::decimal_physical_type(9),
            PhysicalType::Int32
        );
        assert_eq!(
            LogicalType::decimal_physical_type(18),
            PhysicalType::Int64
        );
        assert_eq!(
            LogicalType::decimal_physical_type(38),
            PhysicalType::Int128
        );
    }

    #[test]
    fn test_shared_physical_representation() {
        assert_eq!(LogicalType::Date.physical_type(), PhysicalType::Int32);
        assert_eq!(LogicalType::Integer.physical_type(), PhysicalType::Int32);
        assert_eq!(LogicalType::Time.physical_type(), PhysicalType::Int64);
        assert_eq!(LogicalType::Timestamp.physical_type(), PhysicalType::Int64);
    }

    #[test]
    fn test_implicit_casting() {
        let int_type = LogicalType::Integer;
        let double_type = LogicalType::Double;
        let varchar_type = LogicalType::Varchar;

        assert!(int_type.can_implicitly_cast_to(&double_type));
        assert!(!double_type.can_implicitly_cast_to(&int_type));
        assert!(int_type.can_implicitly_cast_to(&varchar_type));
        assert!(LogicalType::UTinyInt.can_implicitly_cast_to(&LogicalType::SmallInt));
    }

    #[test]
    fn test_type_promotion() {
        let max_type = TypeUtils::max_type(&LogicalType::TinyInt, &LogicalType::BigInt).unwrap();
        assert_eq!(max_type, LogicalType::BigInt);

        let max_type = TypeUtils::max_type(&LogicalType::Float, &LogicalType::Double).unwrap();
        assert_eq!(max_type, LogicalType::Double);
    }

    #[test]
    fn test_nested_types() {
        let list_type = LogicalType::list(LogicalType::Integer);
        assert!(list_type.is_nested());
        assert_eq!(list_type.to_string(), "INTEGER[]");

        let struct_type = LogicalType::Struct(vec![
            ("id".to_string(), LogicalType::Integer),
            ("name".to_string(), LogicalType::Varchar),
        ]);
        assert!(struct_type.is_nested());
        assert_eq!(struct_type.to_string(), "STRUCT(id INTEGER, name VARCHAR)");
    }
}
