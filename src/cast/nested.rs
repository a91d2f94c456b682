//! Nested-type conversion: list and struct recursion plus the generic
//! value-to-text fallback for composite types.

use crate::cast::{cast_vector, null_cast};
use crate::common::error::{OpalError, OpalResult};
use crate::types::logical_type::LogicalType;
use crate::types::vector::{ChildRef, ValidityMask, Vector, VectorClass, VectorData};
use std::sync::Arc;

/// Dispatch for a list source over the destination type.
pub(crate) fn list_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type().clone() {
        LogicalType::List(target_child) => {
            let source_entries = source.list_entries()?;
            let source_child = source.list_child()?;

            // casting never changes list cardinality, only element type:
            // convert the entire child collection, keep the descriptors
            let child_count = source_child.len();
            let new_child = if source_child.logical_type() == &*target_child {
                source_child.clone()
            } else {
                let mut casted = Vector::new((*target_child).clone(), child_count);
                if child_count > 0 {
                    cast_vector(source_child, &mut casted, child_count, false)?;
                }
                casted
            };

            match source.class() {
                VectorClass::Constant => {
                    let entries = vec![source_entries.first().copied().unwrap_or_default()];
                    let valid = source.validity().is_valid(0);
                    let validity = if valid {
                        ValidityMask::all_valid(1)
                    } else {
                        ValidityMask::all_null(1)
                    };
                    result.set_list(VectorClass::Constant, entries, new_child, validity);
                }
                VectorClass::Flat => {
                    let entries = source_entries
                        .get(..count)
                        .ok_or_else(|| {
                            OpalError::Internal(format!(
                                "cast row count {} exceeds list entry count {}",
                                count,
                                source_entries.len()
                            ))
                        })?
                        .to_vec();
                    let validity = source.validity().prefix(count);
                    result.set_list(VectorClass::Flat, entries, new_child, validity);
                }
            }
            Ok(())
        }
        LogicalType::Varchar => value_string_cast(source, result, count),
        _ => null_cast(source, result, count),
    }
}

/// Dispatch for a struct source over the destination type.
pub(crate) fn struct_cast_switch(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match result.logical_type().clone() {
        LogicalType::Struct(target_fields) => {
            let source_fields = match source.logical_type() {
                LogicalType::Struct(fields) => fields.clone(),
                other => {
                    return Err(OpalError::Internal(format!(
                        "struct cast invoked on non-struct source {}",
                        other
                    )))
                }
            };
            if source_fields.len() != target_fields.len() {
                return Err(OpalError::TypeMismatch(format!(
                    "Cannot cast STRUCTs of different size ({} -> {})",
                    source.logical_type(),
                    LogicalType::Struct(target_fields)
                )));
            }
            for ((source_name, _), (target_name, _)) in source_fields.iter().zip(&target_fields) {
                if !source_name.eq_ignore_ascii_case(target_name) {
                    return Err(OpalError::TypeMismatch(format!(
                        "Cannot cast STRUCTs with different field names ({} -> {})",
                        source_name, target_name
                    )));
                }
            }

            let children = source.struct_children()?;
            let mut result_children = Vec::with_capacity(target_fields.len());
            let mut is_constant = true;
            for (index, (target_name, target_type)) in target_fields.iter().enumerate() {
                let source_child = children
                    .get(index)
                    .map(|(_, child)| child.arc())
                    .ok_or_else(|| {
                        OpalError::Internal(format!(
                            "struct vector is missing child {}",
                            target_name
                        ))
                    })?;
                if source_child.logical_type() == target_type {
                    // equal child types alias the source storage, no copy
                    if source_child.class() != VectorClass::Constant {
                        is_constant = false;
                    }
                    result_children
                        .push((target_name.clone(), ChildRef::Shared(Arc::clone(source_child))));
                } else {
                    let mut casted = Vector::new(target_type.clone(), count);
                    cast_vector(source_child, &mut casted, count, false)?;
                    if casted.class() != VectorClass::Constant {
                        is_constant = false;
                    }
                    result_children.push((target_name.clone(), ChildRef::Owned(Arc::new(casted))));
                }
            }

            let class = if is_constant {
                VectorClass::Constant
            } else {
                VectorClass::Flat
            };
            let validity = match class {
                VectorClass::Constant => {
                    if source.validity().is_valid(0) {
                        ValidityMask::all_valid(1)
                    } else {
                        ValidityMask::all_null(1)
                    }
                }
                VectorClass::Flat => source.validity().prefix(count),
            };
            result.set_struct(class, result_children, validity);
            Ok(())
        }
        LogicalType::Varchar => value_string_cast(source, result, count),
        _ => null_cast(source, result, count),
    }
}

/// Generic per-row stringification, used when a composite type has no
/// specialized textual form. Keeps the source's class shape.
pub(crate) fn value_string_cast(
    source: &Vector,
    result: &mut Vector,
    count: usize,
) -> OpalResult<()> {
    match source.class() {
        VectorClass::Constant => {
            if source.validity().is_valid(0) {
                let text = source.get_value(0)?.to_string();
                result.set_constant_data(VectorData::Varchar(vec![text]), true);
            } else {
                result.set_constant_data(VectorData::Varchar(vec![String::new()]), false);
            }
        }
        VectorClass::Flat => {
            let mut output = Vec::with_capacity(count);
            let mut validity = ValidityMask::all_valid(count);
            for row in 0..count {
                if source.validity().is_valid(row) {
                    output.push(source.get_value(row)?.to_string());
                } else {
                    validity.set_invalid(row);
                    output.push(String::new());
                }
            }
            result.set_flat_data(VectorData::Varchar(output), validity);
        }
    }
    Ok(())
}
