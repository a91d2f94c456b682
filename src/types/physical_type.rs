use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical types describe how a logical type is stored in memory.
/// Several logical types can share a physical type: DATE columns live in
/// an Int32 buffer, TIME and TIMESTAMP columns in an Int64 buffer, and a
/// decimal picks the smallest integer width that holds its digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalType {
    /// Boolean value
    Bool,
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 128-bit signed integer
    Int128,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit floating point
    Float,
    /// 64-bit double precision
    Double,
    /// Variable length string
    Varchar,
    /// Variable length binary data
    Blob,
    /// Interval (months/days/microseconds triple)
    Interval,
    /// Nested list type (no direct buffer; entries plus a child collection)
    List,
    /// Nested struct type (no direct buffer; delegates to children)
    Struct,
    /// The NULL singleton type
    Null,
}

impl PhysicalType {
    /// Get the size of this physical type in bytes (for fixed-size types)
    pub fn size(&self) -> Option<usize> {
        match self {
            PhysicalType::Bool | PhysicalType::Int8 | PhysicalType::UInt8 => Some(1),
            PhysicalType::Int16 | PhysicalType::UInt16 => Some(2),
            PhysicalType::Int32 | PhysicalType::UInt32 | PhysicalType::Float => Some(4),
            PhysicalType::Int64 | PhysicalType::UInt64 | PhysicalType::Double => Some(8),
            PhysicalType::Int128 | PhysicalType::Interval => Some(16),
            _ => None,
        }
    }

    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PhysicalType::Int8
                | PhysicalType::Int16
                | PhysicalType::Int32
                | PhysicalType::Int64
                | PhysicalType::Int128
                | PhysicalType::UInt8
                | PhysicalType::UInt16
                | PhysicalType::UInt32
                | PhysicalType::UInt64
                | PhysicalType::Float
                | PhysicalType::Double
        )
    }

    /// Check if this type is variable length
    pub fn is_variable_size(&self) -> bool {
        matches!(
            self,
            PhysicalType::Varchar | PhysicalType::Blob | PhysicalType::List | PhysicalType::Struct
        )
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalType::Bool => write!(f, "BOOL"),
            PhysicalType::Int8 => write!(f, "INT8"),
            PhysicalType::Int16 => write!(f, "INT16"),
            PhysicalType::Int32 => write!(f, "INT32"),
            PhysicalType::Int64 => write!(f, "INT64"),
            PhysicalType::Int128 => write!(f, "INT128"),
            PhysicalType::UInt8 => write!(f, "UINT8"),
            PhysicalType::UInt16 => write!(f, "UINT16"),
            PhysicalType::UInt32 => write!(f, "UINT32"),
            PhysicalType::UInt64 => write!(f, "UINT64"),
            PhysicalType::Float => write!(f, "FLOAT"),
            PhysicalType::Double => write!(f, "DOUBLE"),
            PhysicalType::Varchar => write!(f, "VARCHAR"),
            PhysicalType::Blob => write!(f, "BLOB"),
            PhysicalType::Interval => write!(f, "INTERVAL"),
            PhysicalType::List => write!(f, "LIST"),
            PhysicalType::Struct => write!(f, "STRUCT"),
            PhysicalType::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_type_sizes() {
        assert_eq!(PhysicalType::Int8.size(), Some(1));
        assert_eq!(PhysicalType::Int32.size(), Some(4));
        assert_eq!(PhysicalType::Int128.size(), Some(16));
        assert_eq!(PhysicalType::Double.size(), Some(8));
        assert_eq!(PhysicalType::Varchar.size(), None);
    }

    #[test]
    fn test_numeric_types() {
        assert!(PhysicalType::Int32.is_numeric());
        assert!(PhysicalType::UInt64.is_numeric());
        assert!(PhysicalType::Float.is_numeric());
        assert!(!PhysicalType::Varchar.is_numeric());
        assert!(!PhysicalType::Bool.is_numeric());
    }

    #[test]
    fn test_variable_size_types() {
        assert!(PhysicalType::Varchar.is_variable_size());
        assert!(PhysicalType::List.is_variable_size());
        assert!(!PhysicalType::Int32.is_variable_size());
        assert!(!PhysicalType::Interval.is_variable_size());
    }
}
