//! Relationship inspector.
//!
//! Flat mode types a relationship after its local join column. Nested mode
//! expands the related entity into its own registered model; the caller
//! supplies the expansion and the chain of entities already being expanded.

use crate::catalog::{Catalog, Column, Entity, Relationship};
use crate::column;
use crate::error::{GenerateError, Result};
use crate::field::{FieldDescriptor, ModelRef};
use crate::options::GenerateOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipField {
    pub attribute: String,
    pub descriptor: FieldDescriptor,
}

/// Capability gate shared by both modes.
fn introspectable(entity: &Entity) -> bool {
    if entity.supports_relationship_introspection() {
        return true;
    }
    tracing::warn!(
        table = %entity.table_name,
        "composite primary key; relationships are not analyzed"
    );
    false
}

/// Local join column of `relationship` on `entity`.
///
/// Declared `local_columns` win. Otherwise a to-one relationship joins on the
/// column whose foreign key targets the related table, and a to-many
/// relationship joins on the entity's primary key.
pub fn join_column<'a>(entity: &'a Entity, relationship: &Relationship) -> Option<&'a Column> {
    if let Some(name) = relationship.local_columns.first() {
        return entity.column(name);
    }
    if !relationship.uselist {
        return entity
            .columns
            .iter()
            .find(|c| c.foreign_keys.iter().any(|fk| fk.table == relationship.target));
    }
    let mut keys = entity.primary_key_columns();
    match (keys.next(), keys.next()) {
        (Some(key), None) => Some(key),
        _ => None,
    }
}

/// Flat relationship fields.
///
/// Only relationships declared with a back-reference named after this entity
/// are considered; the inverse side is left to the other entity.
pub fn flat_fields(
    entity: &Entity,
    relationships: &[&Relationship],
    options: &GenerateOptions,
) -> Result<Vec<RelationshipField>> {
    if relationships.is_empty() || !introspectable(entity) {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for rel in relationships {
        if rel.backref.as_deref() != Some(entity.table_name.as_str()) {
            continue;
        }
        let Some(col) = join_column(entity, rel) else {
            tracing::debug!(
                table = %entity.table_name,
                relationship = %rel.name,
                "no local join column; relationship skipped"
            );
            continue;
        };

        let inner = column::typed_descriptor(entity, col)?;
        let relationship_readonly = options.readonly.contains(&rel.name);

        let descriptor = if rel.uselist {
            let mut list = FieldDescriptor::list_of(inner);
            list.readonly = relationship_readonly;
            list
        } else {
            let column_readonly = column::inspect_column(entity, col, options)?.descriptor.readonly;
            let mut single = inner;
            single.readonly = relationship_readonly || column_readonly;
            single
        };

        out.push(RelationshipField {
            attribute: rel.name.clone(),
            descriptor,
        });
    }
    Ok(out)
}

/// Nested relationship fields.
///
/// `chain` holds the table names currently being expanded, this entity
/// included. Relationships pointing back into the chain are dropped, which is
/// what terminates expansion on cyclic entity graphs. `expand` generates and
/// registers the target's model and returns its handle.
pub fn nested_fields<F>(
    catalog: &Catalog,
    entity: &Entity,
    relationships: &[&Relationship],
    options: &GenerateOptions,
    chain: &[String],
    mut expand: F,
) -> Result<Vec<RelationshipField>>
where
    F: FnMut(&Entity, &Relationship) -> Result<ModelRef>,
{
    if relationships.is_empty() || !introspectable(entity) {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for rel in relationships {
        if chain.iter().any(|t| *t == rel.target) {
            tracing::debug!(
                table = %entity.table_name,
                relationship = %rel.name,
                target = %rel.target,
                "target already being expanded; relationship skipped"
            );
            continue;
        }
        let target = catalog
            .get(&rel.target)
            .ok_or_else(|| GenerateError::UnknownEntity(rel.target.clone()))?;

        let model = expand(target, rel)?;
        let nested = FieldDescriptor::nested(model);
        let mut descriptor = if rel.uselist {
            FieldDescriptor::list_of(nested)
        } else {
            nested
        };
        descriptor.readonly = options.readonly.contains(&rel.name);

        out.push(RelationshipField {
            attribute: rel.name.clone(),
            descriptor,
        });
    }
    Ok(out)
}
