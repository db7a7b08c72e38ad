//! Column inspector: one column → one field descriptor.

use crate::catalog::{Column, ColumnType, Entity, ForeignKeyRef};
use crate::error::{GenerateError, Result};
use crate::field::{FieldDescriptor, FieldKind, FieldType};
use crate::options::GenerateOptions;
use crate::typemap;

/// Result of inspecting a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnField {
    pub attribute: String,
    pub descriptor: FieldDescriptor,
    /// Foreign keys of the column, kept for relationship cross-referencing.
    pub foreign_keys: Vec<ForeignKeyRef>,
}

/// Descriptor carrying only what the column type and default determine:
/// field type, `max_length` and scalar `default`.
pub fn typed_descriptor(entity: &Entity, column: &Column) -> Result<FieldDescriptor> {
    let mut descriptor = descriptor_for_type(&entity.table_name, &column.name, &column.ty)?;
    if let Some(value) = column.default.as_ref().and_then(|d| d.scalar()) {
        descriptor.default = Some(value.clone());
    }
    Ok(descriptor)
}

fn descriptor_for_type(table: &str, column: &str, ty: &ColumnType) -> Result<FieldDescriptor> {
    let kind = typemap::kind_of(ty).ok_or_else(|| GenerateError::UnrecognizedType {
        table: table.to_string(),
        column: column.to_string(),
        type_name: ty.name.clone(),
    })?;

    let mut descriptor = match FieldType::scalar(kind) {
        Some(scalar) => FieldDescriptor::new(scalar),
        None => {
            debug_assert_eq!(kind, FieldKind::List);
            let item = match typemap::item_type_of(ty) {
                Some(item_ty) => descriptor_for_type(table, column, &item_ty)?,
                None => FieldDescriptor::new(FieldType::Raw),
            };
            FieldDescriptor::list_of(item)
        }
    };
    descriptor.max_length = typemap::max_length_of(ty);
    Ok(descriptor)
}

/// Inspect `column` of `entity` under the caller's visibility settings.
///
/// - primary keys are read-only unless listed in `show`;
/// - names in `readonly` are read-only;
/// - a field is required when the column is not nullable and neither rule
///   above applies.
pub fn inspect_column(
    entity: &Entity,
    column: &Column,
    options: &GenerateOptions,
) -> Result<ColumnField> {
    let mut descriptor = typed_descriptor(entity, column)?;

    let hidden_primary_key = column.primary_key && !options.show.contains(&column.name);
    let forced_readonly = options.readonly.contains(&column.name);

    descriptor.readonly = hidden_primary_key || forced_readonly;
    descriptor.required = !column.nullable && !forced_readonly && !hidden_primary_key;

    Ok(ColumnField {
        attribute: column.name.clone(),
        descriptor,
        foreign_keys: column.foreign_keys.clone(),
    })
}
