//! Schema assembly and the public generation entry points.

use crate::catalog::{Catalog, Column, Entity, Relationship};
use crate::column::{self, ColumnField};
use crate::error::{GenerateError, Result};
use crate::field::{FieldSchema, ModelRef};
use crate::naming;
use crate::options::{GenerateOptions, RelationshipMode};
use crate::registry::ModelRegistry;
use crate::relationship::{self, RelationshipField};
use std::collections::BTreeMap;

/// `person` → `Person`, `USER_ACCOUNT` → `User_account`.
pub fn default_model_name(table_name: &str) -> String {
    naming::capitalize(&table_name.to_lowercase())
}

fn model_name(entity: &Entity, options: &GenerateOptions) -> String {
    match options.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_model_name(&entity.table_name),
    }
}

fn lookup<'a>(catalog: &'a Catalog, table: &str) -> Result<&'a Entity> {
    catalog
        .get(table)
        .ok_or_else(|| GenerateError::UnknownEntity(table.to_string()))
}

// ============================================================================
// Attribute selection
// ============================================================================

struct Selection<'a> {
    columns: Vec<&'a Column>,
    relationships: Vec<&'a Relationship>,
}

fn is_private(name: &str) -> bool {
    name.starts_with('_') || name.ends_with('_')
}

fn select_attributes<'a>(entity: &'a Entity, options: &GenerateOptions) -> Result<Selection<'a>> {
    let mut selection = Selection {
        columns: Vec::new(),
        relationships: Vec::new(),
    };
    let considered = |name: &str| !is_private(name) && !options.ignore.contains(name);
    let unknown = |name: &str| GenerateError::UnknownField {
        table: entity.table_name.clone(),
        field: name.to_string(),
    };

    if let Some(fields) = &options.fields {
        // Caller allow-list: columns only, relationships are never expanded.
        for name in fields.iter().filter(|n| considered(n)) {
            match (entity.column(name), entity.relationship(name)) {
                (Some(col), _) => selection.columns.push(col),
                (None, Some(_)) => {}
                (None, None) => return Err(unknown(name)),
            }
        }
        return Ok(selection);
    }

    if let Some(exposed) = &entity.exposed_fields {
        for name in exposed.iter().filter(|n| considered(n)) {
            match (entity.column(name), entity.relationship(name)) {
                (Some(col), _) => selection.columns.push(col),
                (None, Some(rel)) => selection.relationships.push(rel),
                (None, None) => return Err(unknown(name)),
            }
        }
        return Ok(selection);
    }

    selection.columns = entity.columns.iter().filter(|c| considered(&c.name)).collect();
    selection.relationships = entity
        .relationships
        .iter()
        .filter(|r| considered(&r.name))
        .collect();
    Ok(selection)
}

// ============================================================================
// Assembly
// ============================================================================

fn assemble(
    model: &str,
    columns: Vec<ColumnField>,
    relationships: Vec<RelationshipField>,
    camel_case: bool,
) -> Result<FieldSchema> {
    let entries = columns
        .into_iter()
        .map(|c| (c.attribute, c.descriptor))
        .chain(relationships.into_iter().map(|r| (r.attribute, r.descriptor)));

    let mut schema = FieldSchema::new();
    for (attribute, mut descriptor) in entries {
        let name = naming::output_name(&attribute, camel_case);
        if name != attribute {
            descriptor.attribute = Some(attribute);
        }
        schema.insert(model, name, descriptor)?;
    }
    tracing::debug!(model, fields = schema.len(), "assembled schema");
    Ok(schema)
}

fn column_fields(entity: &Entity, columns: &[&Column], options: &GenerateOptions) -> Result<Vec<ColumnField>> {
    columns
        .iter()
        .map(|col| column::inspect_column(entity, col, options))
        .collect()
}

/// Field schema for `table` with flat relationship fields, without registering it.
pub fn build_field_schema(catalog: &Catalog, table: &str, options: &GenerateOptions) -> Result<FieldSchema> {
    let entity = lookup(catalog, table)?;
    let model = model_name(entity, options);
    let selection = select_attributes(entity, options)?;

    let columns = column_fields(entity, &selection.columns, options)?;
    let relationships = relationship::flat_fields(entity, &selection.relationships, options)?;
    assemble(&model, columns, relationships, options.camel_case)
}

/// Generate the model for `table` and register it.
///
/// The registered name is `options.name`, or the default name derived from
/// the table. `options.relationships` picks flat or nested relationship fields.
pub fn create_api_model<R>(
    registry: &mut R,
    catalog: &Catalog,
    table: &str,
    options: &GenerateOptions,
) -> Result<ModelRef>
where
    R: ModelRegistry + ?Sized,
{
    let entity = lookup(catalog, table)?;
    let name = model_name(entity, options);
    let schema = match options.relationships {
        RelationshipMode::Flat => build_field_schema(catalog, table, options)?,
        RelationshipMode::Nested => gen_api_model_from_db(registry, catalog, table, options)?,
    };
    Ok(registry.register_model(&name, schema))
}

/// Generate the schema for `table`, expanding relationships into nested models.
///
/// Each expanded relationship is registered as `Nested{Relationship}`; the
/// returned top-level schema is left for the caller to register. Reusing a
/// nested model name for a different target table within one call is a
/// [`GenerateError::NestedModelCollision`].
pub fn gen_api_model_from_db<R>(
    registry: &mut R,
    catalog: &Catalog,
    table: &str,
    options: &GenerateOptions,
) -> Result<FieldSchema>
where
    R: ModelRegistry + ?Sized,
{
    let entity = lookup(catalog, table)?;
    // Fresh chain and nested-name table per top-level call.
    let mut nested_models = BTreeMap::new();
    generate_nested(registry, catalog, entity, options, &[], &mut nested_models, 0)
}

fn generate_nested<R>(
    registry: &mut R,
    catalog: &Catalog,
    entity: &Entity,
    options: &GenerateOptions,
    parents: &[String],
    nested_models: &mut BTreeMap<String, String>,
    depth: usize,
) -> Result<FieldSchema>
where
    R: ModelRegistry + ?Sized,
{
    let mut chain = parents.to_vec();
    chain.push(entity.table_name.clone());
    if depth > options.max_depth {
        return Err(GenerateError::RecursionLimit {
            limit: options.max_depth,
            chain,
        });
    }

    let model = model_name(entity, options);
    let selection = select_attributes(entity, options)?;
    let columns = column_fields(entity, &selection.columns, options)?;

    let nested_options = options.for_nested();
    let relationships = relationship::nested_fields(
        catalog,
        entity,
        &selection.relationships,
        options,
        &chain,
        |target, rel| {
            let schema = generate_nested(
                registry,
                catalog,
                target,
                &nested_options,
                &chain,
                nested_models,
                depth + 1,
            )?;
            let name = naming::nested_model_name(&rel.name);
            // Checked after recursion so names claimed deeper in the walk count too.
            match nested_models.get(&name) {
                Some(existing) if *existing != target.table_name => {
                    return Err(GenerateError::NestedModelCollision {
                        model: name,
                        existing: existing.clone(),
                        target: target.table_name.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    nested_models.insert(name.clone(), target.table_name.clone());
                }
            }
            Ok(registry.register_model(&name, schema))
        },
    )?;

    assemble(&model, columns, relationships, options.camel_case)
}
