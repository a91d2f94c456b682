use crate::common::error::{OpalError, OpalResult};
use crate::types::logical_type::LogicalType;
use crate::types::temporal::Interval;
use crate::types::value::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Standard batch capacity: vectors processed by the engine hold at most
/// this many rows.
pub const VECTOR_CAPACITY: usize = 1024;

/// A validity mask for tracking null values in a vector.
/// Uses a bitset for efficient storage; bit = 1 means the row is non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityMask {
    data: Vec<u64>,
    count: usize,
}

impl ValidityMask {
    /// Create a validity mask where all entries are valid
    pub fn all_valid(count: usize) -> Self {
        Self {
            data: vec![u64::MAX; count.div_ceil(64)],
            count,
        }
    }

    /// Create a validity mask where all entries are null
    pub fn all_null(count: usize) -> Self {
        Self {
            data: vec![0u64; count.div_ceil(64)],
            count,
        }
    }

    /// Set the validity of a specific entry
    pub fn set_valid(&mut self, index: usize, valid: bool) {
        if index >= self.count {
            return;
        }
        let word_index = index / 64;
        let bit_index = index % 64;
        if valid {
            self.data[word_index] |= 1u64 << bit_index;
        } else {
            self.data[word_index] &= !(1u64 << bit_index);
        }
    }

    /// Set a specific entry as invalid (null)
    pub fn set_invalid(&mut self, index: usize) {
        self.set_valid(index, false);
    }

    /// Check if a specific entry is valid; out-of-range entries read as null
    pub fn is_valid(&self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        (self.data[index / 64] & (1u64 << (index % 64))) != 0
    }

    /// Check if a specific entry is null
    pub fn is_null(&self, index: usize) -> bool {
        !self.is_valid(index)
    }

    /// Get the number of entries in the mask
    pub fn count(&self) -> usize {
        self.count
    }

    /// Count the number of valid entries
    pub fn valid_count(&self) -> usize {
        (0..self.count).filter(|&i| self.is_valid(i)).count()
    }

    /// Count the number of null entries
    pub fn null_count(&self) -> usize {
        self.count - self.valid_count()
    }

    /// Copy the first `count` bits into a fresh mask
    pub fn prefix(&self, count: usize) -> ValidityMask {
        let mut mask = ValidityMask::all_null(count);
        for i in 0..count.min(self.count) {
            if self.is_valid(i) {
                mask.set_valid(i, true);
            }
        }
        mask
    }
}

/// How the rows of a vector map onto its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorClass {
    /// One logical element represents every row; validity bit 0 covers all rows
    Constant,
    /// One physical element per row
    Flat,
}

/// Per-row descriptor of a list vector: a span into the child collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListEntry {
    pub offset: usize,
    pub length: usize,
}

impl ListEntry {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }
}

/// A struct child vector, tagged by provenance: `Owned` children were
/// materialized for this vector, `Shared` children alias another vector's
/// storage because the element type already matched.
#[derive(Debug, Clone)]
pub enum ChildRef {
    Owned(Arc<Vector>),
    Shared(Arc<Vector>),
}

impl ChildRef {
    pub fn vector(&self) -> &Vector {
        match self {
            ChildRef::Owned(v) | ChildRef::Shared(v) => v,
        }
    }

    pub fn arc(&self) -> &Arc<Vector> {
        match self {
            ChildRef::Owned(v) | ChildRef::Shared(v) => v,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, ChildRef::Shared(_))
    }
}

/// The owned, typed buffer behind a vector. One variant per scalar
/// physical representation; nested vectors carry their children here
/// instead of a direct buffer.
#[derive(Debug, Clone)]
pub enum VectorData {
    /// The NULL singleton type has no storage
    Null,
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Int128(Vec<i128>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Varchar(Vec<String>),
    Blob(Vec<Vec<u8>>),
    Interval(Vec<Interval>),
    List {
        entries: Vec<ListEntry>,
        child: Box<Vector>,
    },
    Struct {
        children: Vec<(String, ChildRef)>,
    },
}

impl VectorData {
    /// Allocate a default-filled buffer for `capacity` rows of the given
    /// logical type.
    pub fn for_type(logical_type: &LogicalType, capacity: usize) -> VectorData {
        use crate::types::physical_type::PhysicalType;
        match logical_type {
            LogicalType::Null => VectorData::Null,
            LogicalType::List(child) => VectorData::List {
                entries: vec![ListEntry::default(); capacity],
                child: Box::new(Vector::new((**child).clone(), 0)),
            },
            LogicalType::Struct(fields) => VectorData::Struct {
                children: fields
                    .iter()
                    .map(|(name, child_type)| {
                        (
                            name.clone(),
                            ChildRef::Owned(Arc::new(Vector::new(child_type.clone(), capacity))),
                        )
                    })
                    .collect(),
            },
            other => match other.physical_type() {
                PhysicalType::Bool => VectorData::Bool(vec![false; capacity]),
                PhysicalType::Int8 => VectorData::Int8(vec![0; capacity]),
                PhysicalType::Int16 => VectorData::Int16(vec![0; capacity]),
                PhysicalType::Int32 => VectorData::Int32(vec![0; capacity]),
                PhysicalType::Int64 => VectorData::Int64(vec![0; capacity]),
                PhysicalType::Int128 => VectorData::Int128(vec![0; capacity]),
                PhysicalType::UInt8 => VectorData::UInt8(vec![0; capacity]),
                PhysicalType::UInt16 => VectorData::UInt16(vec![0; capacity]),
                PhysicalType::UInt32 => VectorData::UInt32(vec![0; capacity]),
                PhysicalType::UInt64 => VectorData::UInt64(vec![0; capacity]),
                PhysicalType::Float => VectorData::Float(vec![0.0; capacity]),
                PhysicalType::Double => VectorData::Double(vec![0.0; capacity]),
                PhysicalType::Varchar => VectorData::Varchar(vec![String::new(); capacity]),
                PhysicalType::Blob => VectorData::Blob(vec![Vec::new(); capacity]),
                PhysicalType::Interval => VectorData::Interval(vec![Interval::default(); capacity]),
                PhysicalType::List | PhysicalType::Struct | PhysicalType::Null => {
                    // covered by the arms above
                    VectorData::Null
                }
            },
        }
    }

    /// Number of elements stored in this buffer
    pub fn len(&self) -> usize {
        match self {
            VectorData::Null => 0,
            VectorData::Bool(v) => v.len(),
            VectorData::Int8(v) => v.len(),
            VectorData::Int16(v) => v.len(),
            VectorData::Int32(v) => v.len(),
            VectorData::Int64(v) => v.len(),
            VectorData::Int128(v) => v.len(),
            VectorData::UInt8(v) => v.len(),
            VectorData::UInt16(v) => v.len(),
            VectorData::UInt32(v) => v.len(),
            VectorData::UInt64(v) => v.len(),
            VectorData::Float(v) => v.len(),
            VectorData::Double(v) => v.len(),
            VectorData::Varchar(v) => v.len(),
            VectorData::Blob(v) => v.len(),
            VectorData::Interval(v) => v.len(),
            VectorData::List { entries, .. } => entries.len(),
            VectorData::Struct { children } => children
                .first()
                .map(|(_, child)| child.vector().len())
                .unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ties a Rust element type to its buffer variant; the monomorphization
/// seam the per-width cast operators are instantiated over.
pub(crate) trait ScalarElement: Clone + Default {
    fn slice(data: &VectorData) -> OpalResult<&[Self]>;
    fn into_data(values: Vec<Self>) -> VectorData;
}

macro_rules! impl_scalar_element {
    ($ty:ty, $variant:ident) => {
        impl ScalarElement for $ty {
            fn slice(data: &VectorData) -> OpalResult<&[Self]> {
                match data {
                    VectorData::$variant(values) => Ok(values),
                    _ => Err(OpalError::Internal(format!(
                        "vector buffer does not hold {} elements",
                        stringify!($variant)
                    ))),
                }
            }

            fn into_data(values: Vec<Self>) -> VectorData {
                VectorData::$variant(values)
            }
        }
    };
}

impl_scalar_element!(bool, Bool);
impl_scalar_element!(i8, Int8);
impl_scalar_element!(i16, Int16);
impl_scalar_element!(i32, Int32);
impl_scalar_element!(i64, Int64);
impl_scalar_element!(i128, Int128);
impl_scalar_element!(u8, UInt8);
impl_scalar_element!(u16, UInt16);
impl_scalar_element!(u32, UInt32);
impl_scalar_element!(u64, UInt64);
impl_scalar_element!(f32, Float);
impl_scalar_element!(f64, Double);
impl_scalar_element!(String, Varchar);
impl_scalar_element!(Vec<u8>, Blob);
impl_scalar_element!(Interval, Interval);

fn slot<T>(values: &mut [T], row: usize) -> OpalResult<&mut T> {
    let len = values.len();
    values.get_mut(row).ok_or_else(|| {
        OpalError::InvalidValue(format!("Row {} exceeds vector capacity {}", row, len))
    })
}

/// A batch of column values: a typed buffer, a validity mask, and a
/// vector-class tag.
#[derive(Debug, Clone)]
pub struct Vector {
    logical_type: LogicalType,
    class: VectorClass,
    data: VectorData,
    validity: ValidityMask,
}

impl Vector {
    /// Create a flat vector shell with default-filled storage for
    /// `capacity` rows. This is what callers hand to the cast engine as a
    /// destination.
    pub fn new(logical_type: LogicalType, capacity: usize) -> Self {
        let data = VectorData::for_type(&logical_type, capacity);
        Self {
            logical_type,
            class: VectorClass::Flat,
            data,
            validity: ValidityMask::all_valid(capacity),
        }
    }

    /// Create a constant vector holding a single value
    pub fn constant(value: &Value, logical_type: LogicalType) -> OpalResult<Self> {
        let mut vector = Self {
            data: VectorData::for_type(&logical_type, 1),
            logical_type,
            class: VectorClass::Constant,
            validity: ValidityMask::all_valid(1),
        };
        vector.set_value(0, value)?;
        Ok(vector)
    }

    /// Create a constant vector whose single value is NULL. Struct
    /// children of a constant vector are constant themselves.
    pub fn constant_null(logical_type: LogicalType) -> Self {
        let data = match &logical_type {
            LogicalType::Struct(fields) => VectorData::Struct {
                children: fields
                    .iter()
                    .map(|(name, child_type)| {
                        (
                            name.clone(),
                            ChildRef::Owned(Arc::new(Vector::constant_null(child_type.clone()))),
                        )
                    })
                    .collect(),
            },
            other => VectorData::for_type(other, 1),
        };
        Self {
            logical_type,
            class: VectorClass::Constant,
            data,
            validity: ValidityMask::all_null(1),
        }
    }

    /// Create a flat vector from a slice of values
    pub fn from_values(logical_type: LogicalType, values: &[Value]) -> OpalResult<Self> {
        let mut vector = Self::new(logical_type, values.len());
        for (i, value) in values.iter().enumerate() {
            vector.set_value(i, value)?;
        }
        Ok(vector)
    }

    /// Create a flat list vector; `None` rows are null lists.
    pub fn list_from_values(
        child_type: LogicalType,
        rows: &[Option<Vec<Value>>],
    ) -> OpalResult<Self> {
        let mut entries = Vec::with_capacity(rows.len());
        let mut flattened = Vec::new();
        let mut validity = ValidityMask::all_valid(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match row {
                Some(values) => {
                    entries.push(ListEntry::new(flattened.len(), values.len()));
                    flattened.extend(values.iter().cloned());
                }
                None => {
                    entries.push(ListEntry::default());
                    validity.set_invalid(i);
                }
            }
        }
        let child = Vector::from_values(child_type.clone(), &flattened)?;
        Ok(Self {
            logical_type: LogicalType::list(child_type),
            class: VectorClass::Flat,
            data: VectorData::List {
                entries,
                child: Box::new(child),
            },
            validity,
        })
    }

    /// Create a flat struct vector from pre-built child vectors
    pub fn struct_from_vectors(fields: Vec<(String, Vector)>) -> OpalResult<Self> {
        if fields.is_empty() {
            return Err(OpalError::InvalidType(
                "Struct vector requires at least one child".to_string(),
            ));
        }
        let rows = fields[0].1.len();
        let logical_type = LogicalType::Struct(
            fields
                .iter()
                .map(|(name, vector)| (name.clone(), vector.logical_type().clone()))
                .collect(),
        );
        let children = fields
            .into_iter()
            .map(|(name, vector)| (name, ChildRef::Owned(Arc::new(vector))))
            .collect();
        Ok(Self {
            logical_type,
            class: VectorClass::Flat,
            data: VectorData::Struct { children },
            validity: ValidityMask::all_valid(rows),
        })
    }

    /// Get the logical type of this vector
    pub fn logical_type(&self) -> &LogicalType {
        &self.logical_type
    }

    /// Get the vector class tag
    pub fn class(&self) -> VectorClass {
        self.class
    }

    /// Get the underlying buffer
    pub fn data(&self) -> &VectorData {
        &self.data
    }

    /// Get the validity mask
    pub fn validity(&self) -> &ValidityMask {
        &self.validity
    }

    /// Number of elements in the buffer (1 for constant vectors)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if a row is null; constant vectors answer for every row
    pub fn is_null(&self, row: usize) -> bool {
        match self.class {
            VectorClass::Constant => self.validity.is_null(0),
            VectorClass::Flat => self.validity.is_null(row),
        }
    }

    /// True if any of the first `count` rows holds a non-null value
    pub fn has_any_valid(&self, count: usize) -> bool {
        match self.class {
            VectorClass::Constant => count > 0 && self.validity.is_valid(0),
            VectorClass::Flat => (0..count).any(|i| self.validity.is_valid(i)),
        }
    }

    /// List entries of a list vector
    pub fn list_entries(&self) -> OpalResult<&[ListEntry]> {
        match &self.data {
            VectorData::List { entries, .. } => Ok(entries),
            _ => Err(OpalError::Internal(
                "list entries requested from a non-list vector".to_string(),
            )),
        }
    }

    /// Child element collection of a list vector
    pub fn list_child(&self) -> OpalResult<&Vector> {
        match &self.data {
            VectorData::List { child, .. } => Ok(child),
            _ => Err(OpalError::Internal(
                "list child requested from a non-list vector".to_string(),
            )),
        }
    }

    /// Named children of a struct vector
    pub fn struct_children(&self) -> OpalResult<&[(String, ChildRef)]> {
        match &self.data {
            VectorData::Struct { children } => Ok(children),
            _ => Err(OpalError::Internal(
                "struct children requested from a non-struct vector".to_string(),
            )),
        }
    }

    /// Set a value at a specific row. The value's type must match the
    /// vector's logical type exactly; nulls are recorded in the mask.
    pub fn set_value(&mut self, row: usize, value: &Value) -> OpalResult<()> {
        if value.is_null() {
            self.validity.set_valid(row, false);
            return Ok(());
        }
        if value.get_type() != self.logical_type {
            return Err(OpalError::InvalidType(format!(
                "Cannot store value of type {} in vector of type {}",
                value.get_type(),
                self.logical_type
            )));
        }
        self.validity.set_valid(row, true);
        match (&mut self.data, value) {
            (VectorData::Bool(data), Value::Boolean(v)) => *slot(data, row)? = *v,
            (VectorData::Int8(data), Value::TinyInt(v)) => *slot(data, row)? = *v,
            (VectorData::Int16(data), Value::SmallInt(v)) => *slot(data, row)? = *v,
            (VectorData::Int32(data), Value::Integer(v)) => *slot(data, row)? = *v,
            (VectorData::Int32(data), Value::Date(v)) => *slot(data, row)? = *v,
            (VectorData::Int64(data), Value::BigInt(v)) => *slot(data, row)? = *v,
            (VectorData::Int64(data), Value::Time(v)) => *slot(data, row)? = *v,
            (VectorData::Int64(data), Value::Timestamp(v)) => *slot(data, row)? = *v,
            (VectorData::Int128(data), Value::HugeInt(v)) => *slot(data, row)? = *v,
            (VectorData::UInt8(data), Value::UTinyInt(v)) => *slot(data, row)? = *v,
            (VectorData::UInt16(data), Value::USmallInt(v)) => *slot(data, row)? = *v,
            (VectorData::UInt32(data), Value::UInteger(v)) => *slot(data, row)? = *v,
            (VectorData::UInt64(data), Value::UBigInt(v)) => *slot(data, row)? = *v,
            (VectorData::Float(data), Value::Float(v)) => *slot(data, row)? = *v,
            (VectorData::Double(data), Value::Double(v)) => *slot(data, row)? = *v,
            (VectorData::Varchar(data), Value::Varchar(v)) => *slot(data, row)? = v.clone(),
            (VectorData::Blob(data), Value::Blob(v)) => *slot(data, row)? = v.clone(),
            (VectorData::Interval(data), Value::Interval(v)) => *slot(data, row)? = *v,
            (VectorData::Int16(data), Value::Decimal { value, .. }) => {
                *slot(data, row)? = i16::try_from(*value).map_err(|_| {
                    OpalError::InvalidValue(format!("Decimal value {} exceeds its storage", value))
                })?
            }
            (VectorData::Int32(data), Value::Decimal { value, .. }) => {
                *slot(data, row)? = i32::try_from(*value).map_err(|_| {
                    OpalError::InvalidValue(format!("Decimal value {} exceeds its storage", value))
                })?
            }
            (VectorData::Int64(data), Value::Decimal { value, .. }) => {
                *slot(data, row)? = i64::try_from(*value).map_err(|_| {
                    OpalError::InvalidValue(format!("Decimal value {} exceeds its storage", value))
                })?
            }
            (VectorData::Int128(data), Value::Decimal { value, .. }) => *slot(data, row)? = *value,
            _ => {
                return Err(OpalError::Internal(format!(
                    "Unsupported value storage for vector of type {}",
                    self.logical_type
                )))
            }
        }
        Ok(())
    }

    /// Get a value at a specific row; constant vectors read their single
    /// element for every row.
    pub fn get_value(&self, row: usize) -> OpalResult<Value> {
        let index = match self.class {
            VectorClass::Constant => 0,
            VectorClass::Flat => row,
        };
        if self.validity.is_null(index) {
            return Ok(Value::Null);
        }
        macro_rules! read {
            ($data:expr, $ctor:expr) => {{
                let values = $data;
                values.get(index).map(|v| $ctor(v.clone())).ok_or_else(|| {
                    OpalError::InvalidValue(format!(
                        "Row {} exceeds vector length {}",
                        row,
                        values.len()
                    ))
                })
            }};
        }
        match (&self.logical_type, &self.data) {
            (LogicalType::Null, _) => Ok(Value::Null),
            (LogicalType::Boolean, VectorData::Bool(d)) => read!(d, Value::Boolean),
            (LogicalType::TinyInt, VectorData::Int8(d)) => read!(d, Value::TinyInt),
            (LogicalType::SmallInt, VectorData::Int16(d)) => read!(d, Value::SmallInt),
            (LogicalType::Integer, VectorData::Int32(d)) => read!(d, Value::Integer),
            (LogicalType::BigInt, VectorData::Int64(d)) => read!(d, Value::BigInt),
            (LogicalType::HugeInt, VectorData::Int128(d)) => read!(d, Value::HugeInt),
            (LogicalType::UTinyInt, VectorData::UInt8(d)) => read!(d, Value::UTinyInt),
            (LogicalType::USmallInt, VectorData::UInt16(d)) => read!(d, Value::USmallInt),
            (LogicalType::UInteger, VectorData::UInt32(d)) => read!(d, Value::UInteger),
            (LogicalType::UBigInt, VectorData::UInt64(d)) => read!(d, Value::UBigInt),
            (LogicalType::Float, VectorData::Float(d)) => read!(d, Value::Float),
            (LogicalType::Double, VectorData::Double(d)) => read!(d, Value::Double),
            (LogicalType::Varchar, VectorData::Varchar(d)) => read!(d, Value::Varchar),
            (LogicalType::Blob, VectorData::Blob(d)) => read!(d, Value::Blob),
            (LogicalType::Date, VectorData::Int32(d)) => read!(d, Value::Date),
            (LogicalType::Time, VectorData::Int64(d)) => read!(d, Value::Time),
            (LogicalType::Timestamp, VectorData::Int64(d)) => read!(d, Value::Timestamp),
            (LogicalType::Interval, VectorData::Interval(d)) => read!(d, Value::Interval),
            (LogicalType::Decimal { width, scale }, data) => {
                let raw: i128 = match data {
                    VectorData::Int16(d) => *slot_ref(d, index)? as i128,
                    VectorData::Int32(d) => *slot_ref(d, index)? as i128,
                    VectorData::Int64(d) => *slot_ref(d, index)? as i128,
                    VectorData::Int128(d) => *slot_ref(d, index)?,
                    _ => {
                        return Err(OpalError::Internal(
                            "decimal vector holds a non-integer buffer".to_string(),
                        ))
                    }
                };
                Ok(Value::Decimal {
                    value: raw,
                    width: *width,
                    scale: *scale,
                })
            }
            (LogicalType::List(_), VectorData::List { entries, child }) => {
                let entry = entries.get(index).ok_or_else(|| {
                    OpalError::InvalidValue(format!(
                        "Row {} exceeds vector length {}",
                        row,
                        entries.len()
                    ))
                })?;
                let mut values = Vec::with_capacity(entry.length);
                for i in entry.offset..entry.offset + entry.length {
                    values.push(child.get_value(i)?);
                }
                Ok(Value::List(values))
            }
            (LogicalType::Struct(_), VectorData::Struct { children }) => {
                let mut fields = Vec::with_capacity(children.len());
                for (name, child) in children {
                    fields.push((name.clone(), child.vector().get_value(row)?));
                }
                Ok(Value::Struct(fields))
            }
            _ => Err(OpalError::Internal(format!(
                "Vector of type {} holds a mismatched buffer",
                self.logical_type
            ))),
        }
    }

    pub(crate) fn set_flat_data(&mut self, data: VectorData, validity: ValidityMask) {
        self.class = VectorClass::Flat;
        self.data = data;
        self.validity = validity;
    }

    pub(crate) fn set_constant_data(&mut self, data: VectorData, valid: bool) {
        self.class = VectorClass::Constant;
        self.data = data;
        self.validity = if valid {
            ValidityMask::all_valid(1)
        } else {
            ValidityMask::all_null(1)
        };
    }

    /// Mark the whole vector null, keeping the requested class shape.
    pub(crate) fn set_all_null(&mut self, class: VectorClass, count: usize) {
        match class {
            VectorClass::Constant => {
                *self = Vector::constant_null(self.logical_type.clone());
            }
            VectorClass::Flat => {
                self.class = VectorClass::Flat;
                self.data = VectorData::for_type(&self.logical_type, count);
                self.validity = ValidityMask::all_null(count);
            }
        }
    }

    pub(crate) fn set_list(
        &mut self,
        class: VectorClass,
        entries: Vec<ListEntry>,
        child: Vector,
        validity: ValidityMask,
    ) {
        self.class = class;
        self.data = VectorData::List {
            entries,
            child: Box::new(child),
        };
        self.validity = validity;
    }

    pub(crate) fn set_struct(
        &mut self,
        class: VectorClass,
        children: Vec<(String, ChildRef)>,
        validity: ValidityMask,
    ) {
        self.class = class;
        self.data = VectorData::Struct { children };
        self.validity = validity;
    }
}

fn slot_ref<T>(values: &[T], index: usize) -> OpalResult<&T> {
    values.get(index).ok_or_else(|| {
        OpalError::InvalidValue(format!(
            "Row {} exceeds vector length {}",
            index,
            values.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_mask() {
        let mut mask = ValidityMask::all_null(10);
        assert_eq!(mask.null_count(), 10);
        assert_eq!(mask.valid_count(), 0);

        mask.set_valid(0, true);
        mask.set_valid(3, true);
        mask.set_valid(7, true);

        assert_eq!(mask.valid_count(), 3);
        assert_eq!(mask.null_count(), 7);
        assert!(mask.is_valid(0));
        assert!(mask.is_valid(3));
        assert!(mask.is_valid(7));
        assert!(!mask.is_valid(1));
        // out-of-range entries read as null
        assert!(!mask.is_valid(64));
    }

    #[test]
    fn test_validity_prefix() {
        let mut mask = ValidityMask::all_valid(8);
        mask.set_invalid(2);
        let prefix = mask.prefix(4);
        assert_eq!(prefix.count(), 4);
        assert!(prefix.is_valid(0));
        assert!(!prefix.is_valid(2));
    }

    #[test]
    fn test_vector_from_values() -> OpalResult<()> {
        let values = vec![Value::integer(1), Value::Null, Value::integer(3)];
        let vector = Vector::from_values(LogicalType::Integer, &values)?;

        assert_eq!(vector.len(), 3);
        assert_eq!(vector.class(), VectorClass::Flat);
        assert_eq!(vector.get_value(0)?, Value::integer(1));
        assert_eq!(vector.get_value(1)?, Value::Null);
        assert_eq!(vector.get_value(2)?, Value::integer(3));
        assert!(vector.is_null(1));
        Ok(())
    }

    #[test]
    fn test_constant_vector() -> OpalResult<()> {
        let vector = Vector::constant(&Value::bigint(7), LogicalType::BigInt)?;
        assert_eq!(vector.class(), VectorClass::Constant);
        // every row reads the single element
        assert_eq!(vector.get_value(0)?, Value::bigint(7));
        assert_eq!(vector.get_value(500)?, Value::bigint(7));

        let null_vector = Vector::constant_null(LogicalType::Varchar);
        assert!(null_vector.is_null(3));
        assert!(!null_vector.has_any_valid(1024));
        Ok(())
    }

    #[test]
    fn test_value_type_checking() {
        let mut vector = Vector::new(LogicalType::Integer, 4);
        assert!(vector.set_value(0, &Value::varchar("nope")).is_err());
        assert!(vector.set_value(0, &Value::integer(1)).is_ok());
    }

    #[test]
    fn test_decimal_storage_width() -> OpalResult<()> {
        // DECIMAL(4,1) lives in an Int16 buffer
        let vector = Vector::from_values(
            LogicalType::Decimal { width: 4, scale: 1 },
            &[Value::decimal(123, 4, 1)],
        )?;
        assert!(matches!(vector.data(), VectorData::Int16(_)));
        assert_eq!(vector.get_value(0)?, Value::decimal(123, 4, 1));
        Ok(())
    }

    #[test]
    fn test_list_vector() -> OpalResult<()> {
        let vector = Vector::list_from_values(
            LogicalType::Integer,
            &[
                Some(vec![Value::integer(1), Value::integer(2)]),
                None,
                Some(vec![Value::integer(3)]),
            ],
        )?;
        let entries = vector.list_entries()?;
        assert_eq!(entries[0], ListEntry::new(0, 2));
        assert_eq!(entries[2], ListEntry::new(2, 1));
        assert_eq!(vector.list_child()?.len(), 3);
        assert_eq!(
            vector.get_value(0)?,
            Value::list(vec![Value::integer(1), Value::integer(2)])
        );
        assert_eq!(vector.get_value(1)?, Value::Null);
        Ok(())
    }

    #[test]
    fn test_struct_vector() -> OpalResult<()> {
        let vector = Vector::struct_from_vectors(vec![
            (
                "a".to_string(),
                Vector::from_values(LogicalType::Integer, &[Value::integer(1)])?,
            ),
            (
                "b".to_string(),
                Vector::from_values(LogicalType::Varchar, &[Value::varchar("x")])?,
            ),
        ])?;
        assert_eq!(
            vector.get_value(0)?,
            Value::struct_(vec![
                ("a".to_string(), Value::integer(1)),
                ("b".to_string(), Value::varchar("x")),
            ])
        );
        assert!(!vector.struct_children()?[0].1.is_shared());
        Ok(())
    }
}
