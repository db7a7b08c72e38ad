//! Relational type name → field kind.

use crate::catalog::ColumnType;
use crate::field::FieldKind;

/// Strip parameterization from a declared type: `VARCHAR(30)` → `VARCHAR`.
///
/// A Postgres-style array suffix (`TEXT[]`) normalizes to `ARRAY`.
pub fn normalize_type_name(declared: &str) -> &str {
    let trimmed = declared.trim();
    if trimmed.ends_with("[]") {
        return "ARRAY";
    }
    match trimmed.find('(') {
        Some(idx) => trimmed[..idx].trim_end(),
        None => trimmed,
    }
}

/// Element type of a `T[]` declaration.
pub fn array_item_name(declared: &str) -> Option<&str> {
    declared.trim().strip_suffix("[]").map(str::trim)
}

/// Length parameter of a declared type: `VARCHAR(30)` → `30`.
pub fn declared_length(declared: &str) -> Option<u32> {
    let open = declared.find('(')?;
    let close = declared[open..].find(')')? + open;
    let inner = declared[open + 1..close].trim();
    // `NUMERIC(10, 2)` carries precision, not length.
    if inner.contains(',') {
        return None;
    }
    inner.parse().ok()
}

/// Look up a normalized type name in the conversion table.
///
/// Exact spelling wins; otherwise the upper-cased spelling is tried so
/// hand-written catalogs may use `varchar` as well as `VARCHAR`.
pub fn field_kind_for(type_name: &str) -> Option<FieldKind> {
    lookup(type_name).or_else(|| lookup(&type_name.to_ascii_uppercase()))
}

fn lookup(type_name: &str) -> Option<FieldKind> {
    use FieldKind::*;
    let kind = match type_name {
        "INT" | "INTEGER" | "BIGINT" | "SMALLINT" => Integer,
        "SERIAL" | "BIGSERIAL" | "SMALLSERIAL" => Integer,
        "Integer" | "SmallInteger" | "BigInteger" => Integer,

        "CHAR" | "VARCHAR" | "NCHAR" | "NVARCHAR" | "TEXT" | "Text" => String,
        "CHARACTER" | "CHARACTER VARYING" => String,
        "String" | "Unicode" | "UnicodeText" | "Concatenable" => String,
        "TIME" | "Time" | "UUID" => String,

        "FLOAT" | "NUMERIC" | "REAL" | "DECIMAL" | "DOUBLE" | "DOUBLE PRECISION" => Float,
        "Numeric" | "Float" => Float,

        "TIMESTAMP" | "DATETIME" | "DateTime" => DateTime,
        "TIMESTAMP WITH TIME ZONE" | "TIMESTAMP WITHOUT TIME ZONE" | "TIMESTAMPTZ" => DateTime,
        "DATE" | "Date" => Date,

        "BOOLEAN" | "Boolean" => Boolean,

        "CLOB" | "BLOB" | "BINARY" | "VARBINARY" | "BYTEA" | "LargeBinary" => Raw,

        "Interval" | "Enum" | "Indexable" | "ARRAY" | "JSON" | "JSONB" => List,

        _ => return None,
    };
    Some(kind)
}

/// Resolve a column type to its kind, or `None` when it is not supported.
pub fn kind_of(ty: &ColumnType) -> Option<FieldKind> {
    field_kind_for(normalize_type_name(&ty.name))
}

/// Maximum length of a textual column, from the explicit `length` or the
/// declared parameterization.
pub fn max_length_of(ty: &ColumnType) -> Option<u32> {
    match kind_of(ty) {
        Some(kind) if kind.is_textual() => ty.length.or_else(|| declared_length(&ty.name)),
        _ => None,
    }
}

/// Element type of an array column, from `item` or a `T[]` declaration.
pub fn item_type_of(ty: &ColumnType) -> Option<ColumnType> {
    if let Some(item) = &ty.item {
        return Some((**item).clone());
    }
    array_item_name(&ty.name).map(ColumnType::new)
}
