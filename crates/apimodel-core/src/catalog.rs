//! Relational entity catalog.
//!
//! This is the generator's view of the host data model: tables with ordered
//! columns and relationships to other tables. It is plain data, serializable
//! with serde so catalogs can be stored as JSON or derived from SQL DDL.

use serde::{Deserialize, Serialize};

// ============================================================================
// Columns
// ============================================================================

/// Declared column type as the data model spells it (`VARCHAR(30)`, `Integer`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnType {
    pub name: String,
    /// Maximum length, when the declared type carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Element type for array-like columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Box<ColumnType>>,
}

impl ColumnType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            item: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn array_of(item: ColumnType) -> Self {
        Self {
            name: "ARRAY".to_string(),
            length: None,
            item: Some(Box::new(item)),
        }
    }
}

/// A literal default value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ScalarValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Bytes(Vec<u8>),
}

/// Column default as declared on the data model.
///
/// Only `Scalar` defaults are surfaced in generated schemas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDefault {
    Scalar { value: ScalarValue },
    /// Computed at insert time by the host (a function, a sequence, ...).
    Callable { name: String },
    /// A SQL expression evaluated by the database.
    Expression { sql: String },
}

impl ColumnDefault {
    pub fn scalar(&self) -> Option<&ScalarValue> {
        match self {
            ColumnDefault::Scalar { value } => Some(value),
            _ => None,
        }
    }
}

/// Target of a foreign key (`table.column`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForeignKeyRef {
    pub table: String,
    pub column: String,
}

impl std::fmt::Display for ForeignKeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ColumnDefault>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeyRef>,
}

fn default_nullable() -> bool {
    true
}

impl Column {
    /// A nullable, non-key column without default.
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            primary_key: false,
            default: None,
            foreign_keys: Vec::new(),
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_keys.push(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
        });
        self
    }
}

// ============================================================================
// Relationships
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relationship {
    /// Attribute name of the relationship on the owning entity.
    pub name: String,
    /// Table name of the related entity.
    pub target: String,
    /// `true` for to-many, `false` for to-one.
    #[serde(default)]
    pub uselist: bool,
    /// Back-reference declared on this side, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backref: Option<String>,
    /// Local join columns, in declaration order.
    #[serde(default)]
    pub local_columns: Vec<String>,
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub table_name: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    /// Attributes the entity itself exposes; `None` exposes everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposed_fields: Option<Vec<String>>,
}

impl Entity {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            relationships: Vec::new(),
            exposed_fields: None,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Relationship analysis needs a single-column primary key to resolve
    /// join columns; composite keys are reported as having no relationships.
    pub fn supports_relationship_introspection(&self) -> bool {
        self.primary_key_columns().count() <= 1
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub entities: Vec<Entity>,
}

impl Catalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn get(&self, table_name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.table_name == table_name)
    }

    pub fn get_mut(&mut self, table_name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.table_name == table_name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.table_name.as_str())
    }
}
