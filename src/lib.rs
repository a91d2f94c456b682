//! opal: vectorized execution core for an analytical database system.
//!
//! The crate centers on the cast engine: [`cast_vector`] converts a batch
//! of column values between SQL logical types in place over columnar
//! buffers, preserving null semantics, enforcing decimal width/scale and
//! numeric range rules, and recursing through nested list and struct
//! types.

pub mod cast;
pub mod common;
pub mod types;

// Re-export the cast entry point for convenience
pub use cast::cast_vector;

// Re-export common types for convenience
pub use common::{OpalError, OpalResult};

// Re-export the type system for convenience
pub use types::{
    ChildRef, Interval, ListEntry, LogicalType, PhysicalType, TypeUtils, ValidityMask, Value,
    Vector, VectorClass, VectorData, MAX_DECIMAL_WIDTH, VECTOR_CAPACITY,
};
