//! SQL schema discovery for apimodel
//!
//! Builds an entity catalog from SQL DDL:
//! - `CREATE TABLE` -> entities
//! - column types, `NOT NULL`, `DEFAULT`, primary keys -> columns
//! - foreign keys -> column references and derived relationships
//!
//! For a foreign key `child.c -> parent.p` the parent gains a to-many
//! relationship named after the child table (back-reference `parent`, joined
//! on `p`), and the child gains a to-one relationship named after the parent
//! table (joined on `c`).

use anyhow::{bail, Result};
use apimodel_core::typemap;
use apimodel_core::{
    Catalog, Column, ColumnDefault, ColumnType, Entity, ForeignKeyRef, Relationship, ScalarValue,
};
use sqlparser::ast::*;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// A foreign key as declared, before the referenced column is resolved.
#[derive(Debug, Clone)]
struct DeclaredForeignKey {
    child: String,
    column: String,
    parent: String,
    referred: Option<String>,
}

/// Parse SQL DDL into an entity catalog.
pub fn parse_sql_ddl(sql: &str) -> Result<Catalog> {
    let dialect = GenericDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;

    let mut catalog = Catalog::default();
    let mut foreign_keys = Vec::new();

    for stmt in statements {
        let Statement::CreateTable {
            name,
            columns: sql_columns,
            constraints: sql_constraints,
            ..
        } = &stmt
        else {
            tracing::debug!(statement = %stmt, "not a CREATE TABLE; skipped");
            continue;
        };

        let table_name = object_name(name);
        if catalog.get(&table_name).is_some() {
            bail!("table `{table_name}` is defined more than once");
        }
        let mut entity = Entity::new(table_name.clone());

        for col in sql_columns {
            let (column, fks) = column_from_def(&table_name, col);
            foreign_keys.extend(fks);
            entity.columns.push(column);
        }

        for constraint in sql_constraints {
            match constraint {
                TableConstraint::Unique {
                    columns: key_cols,
                    is_primary: true,
                    ..
                } => {
                    for key in key_cols {
                        mark_primary_key(&mut entity, &key.value)?;
                    }
                }
                TableConstraint::ForeignKey {
                    columns: fk_cols,
                    foreign_table,
                    referred_columns,
                    ..
                } => {
                    let parent = object_name(foreign_table);
                    for (i, fk_col) in fk_cols.iter().enumerate() {
                        if entity.column(&fk_col.value).is_none() {
                            bail!(
                                "foreign key on `{table_name}` names unknown column `{}`",
                                fk_col.value
                            );
                        }
                        foreign_keys.push(DeclaredForeignKey {
                            child: table_name.clone(),
                            column: fk_col.value.clone(),
                            parent: parent.clone(),
                            referred: referred_columns.get(i).map(|c| c.value.clone()),
                        });
                    }
                }
                _ => {}
            }
        }

        catalog.entities.push(entity);
    }

    for fk in foreign_keys {
        link_foreign_key(&mut catalog, fk);
    }

    Ok(catalog)
}

/// Last identifier of a possibly schema-qualified name, unquoted.
fn object_name(name: &ObjectName) -> String {
    name.0
        .last()
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

fn column_from_def(table: &str, def: &ColumnDef) -> (Column, Vec<DeclaredForeignKey>) {
    let rendered = def.data_type.to_string();
    let mut ty = ColumnType::new(rendered);
    ty.length = typemap::max_length_of(&ty);

    let mut column = Column::new(def.name.value.clone(), ty);
    let mut fks = Vec::new();

    for opt in &def.options {
        match &opt.option {
            ColumnOption::NotNull => column.nullable = false,
            ColumnOption::Null => column.nullable = true,
            ColumnOption::Unique {
                is_primary: true, ..
            } => {
                column.primary_key = true;
                column.nullable = false;
            }
            ColumnOption::Default(expr) => column.default = default_from_expr(expr),
            ColumnOption::ForeignKey {
                foreign_table,
                referred_columns,
                ..
            } => fks.push(DeclaredForeignKey {
                child: table.to_string(),
                column: column.name.clone(),
                parent: object_name(foreign_table),
                referred: referred_columns.first().map(|c| c.value.clone()),
            }),
            _ => {}
        }
    }

    (column, fks)
}

fn mark_primary_key(entity: &mut Entity, column: &str) -> Result<()> {
    let table = entity.table_name.clone();
    match entity.columns.iter_mut().find(|c| c.name == column) {
        Some(col) => {
            col.primary_key = true;
            col.nullable = false;
            Ok(())
        }
        None => bail!("primary key on `{table}` names unknown column `{column}`"),
    }
}

/// `DEFAULT` clause -> column default. `NULL` means no default.
fn default_from_expr(expr: &Expr) -> Option<ColumnDefault> {
    let value = match expr {
        Expr::Value(Value::Null) => return None,
        Expr::Value(value) => scalar_from_value(value, false),
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: inner,
        } => match inner.as_ref() {
            Expr::Value(value @ Value::Number(..)) => scalar_from_value(value, true),
            _ => None,
        },
        Expr::Function(function) => {
            return Some(ColumnDefault::Callable {
                name: function.name.to_string(),
            })
        }
        _ => None,
    };
    Some(match value {
        Some(value) => ColumnDefault::Scalar { value },
        None => ColumnDefault::Expression {
            sql: expr.to_string(),
        },
    })
}

fn scalar_from_value(value: &Value, negate: bool) -> Option<ScalarValue> {
    match value {
        Value::Number(text, _) => {
            let text = if negate {
                format!("-{text}")
            } else {
                text.clone()
            };
            text.parse::<i64>()
                .map(ScalarValue::Integer)
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(ScalarValue::Float))
        }
        Value::SingleQuotedString(s) | Value::DoubleQuotedString(s) => {
            Some(ScalarValue::String(s.clone()))
        }
        Value::Boolean(b) => Some(ScalarValue::Boolean(*b)),
        _ => None,
    }
}

fn link_foreign_key(catalog: &mut Catalog, fk: DeclaredForeignKey) {
    let Some(parent) = catalog.get(&fk.parent) else {
        tracing::warn!(
            table = %fk.child,
            column = %fk.column,
            references = %fk.parent,
            "foreign key references an undefined table; no relationship derived"
        );
        return;
    };

    let referred = match fk.referred {
        Some(name) => name,
        None => {
            let mut keys = parent.primary_key_columns();
            match (keys.next(), keys.next()) {
                (Some(key), None) => key.name.clone(),
                _ => {
                    tracing::warn!(
                        table = %fk.child,
                        column = %fk.column,
                        references = %fk.parent,
                        "referenced table has no single primary key; foreign key ignored"
                    );
                    return;
                }
            }
        }
    };

    if let Some(child) = catalog.get_mut(&fk.child) {
        if let Some(col) = child.columns.iter_mut().find(|c| c.name == fk.column) {
            col.foreign_keys.push(ForeignKeyRef {
                table: fk.parent.clone(),
                column: referred.clone(),
            });
        }
        add_relationship(
            child,
            Relationship {
                name: fk.parent.clone(),
                target: fk.parent.clone(),
                uselist: false,
                backref: None,
                local_columns: vec![fk.column.clone()],
            },
        );
    }

    if let Some(parent) = catalog.get_mut(&fk.parent) {
        add_relationship(
            parent,
            Relationship {
                name: fk.child.clone(),
                target: fk.child.clone(),
                uselist: true,
                backref: Some(fk.parent.clone()),
                local_columns: vec![referred],
            },
        );
    }
}

/// First relationship under a name wins.
fn add_relationship(entity: &mut Entity, relationship: Relationship) {
    if entity.relationship(&relationship.name).is_some() {
        tracing::debug!(
            table = %entity.table_name,
            relationship = %relationship.name,
            "relationship name already taken; duplicate skipped"
        );
        return;
    }
    entity.relationships.push(relationship);
}
