//! Output field descriptors and the insertion-ordered field schema.

use crate::catalog::ScalarValue;
use crate::error::{GenerateError, Result};
use serde::Serialize;

/// Field type tag produced by the type mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    /// Opaque or binary payload.
    Raw,
    /// Array, enum and JSON-like columns.
    List,
}

impl FieldKind {
    pub fn is_textual(self) -> bool {
        matches!(self, FieldKind::String)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Integer => "Integer",
            FieldKind::Float => "Float",
            FieldKind::Boolean => "Boolean",
            FieldKind::Date => "Date",
            FieldKind::DateTime => "DateTime",
            FieldKind::Raw => "Raw",
            FieldKind::List => "List",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by a [`crate::ModelRegistry`] for a registered model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModelRef {
    pub name: String,
}

impl ModelRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Raw,
    List(Box<FieldDescriptor>),
    Nested(ModelRef),
}

impl FieldType {
    /// Scalar type for a mapped kind. `List` needs an item and has no scalar form.
    pub fn scalar(kind: FieldKind) -> Option<Self> {
        Some(match kind {
            FieldKind::String => FieldType::String,
            FieldKind::Integer => FieldType::Integer,
            FieldKind::Float => FieldType::Float,
            FieldKind::Boolean => FieldType::Boolean,
            FieldKind::Date => FieldType::Date,
            FieldKind::DateTime => FieldType::DateTime,
            FieldKind::Raw => FieldType::Raw,
            FieldKind::List => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    #[serde(flatten)]
    pub ty: FieldType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ScalarValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Source attribute when the output name differs from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl FieldDescriptor {
    pub fn new(ty: FieldType) -> Self {
        Self {
            ty,
            required: false,
            readonly: false,
            default: None,
            max_length: None,
            attribute: None,
        }
    }

    pub fn list_of(item: FieldDescriptor) -> Self {
        Self::new(FieldType::List(Box::new(item)))
    }

    pub fn nested(model: ModelRef) -> Self {
        Self::new(FieldType::Nested(model))
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_default(mut self, default: ScalarValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn item(&self) -> Option<&FieldDescriptor> {
        match &self.ty {
            FieldType::List(item) => Some(item),
            _ => None,
        }
    }
}

/// Field name → descriptor, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<(String, FieldDescriptor)>,
}

impl Serialize for FieldSchema {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field; an existing field of the same name is a collision for `model`.
    pub fn insert(&mut self, model: &str, name: String, field: FieldDescriptor) -> Result<()> {
        if self.contains(&name) {
            return Err(GenerateError::NameCollision {
                model: model.to_string(),
                field: name,
            });
        }
        self.fields.push((name, field));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldSchema {
    type Item = &'a (String, FieldDescriptor);
    type IntoIter = std::slice::Iter<'a, (String, FieldDescriptor)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
