//! Swagger 2.0 `definitions` rendering of registered models.

use crate::catalog::ScalarValue;
use crate::field::{FieldDescriptor, FieldSchema, FieldType, ModelRef};
use crate::registry::ModelRegistry;
use serde_json::{json, Map, Value};

/// In-memory registry that renders models as Swagger definitions.
#[derive(Debug, Clone, Default)]
pub struct SwaggerRegistry {
    models: Vec<(String, FieldSchema)>,
}

impl SwaggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.models.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Swagger definition object for one model.
    pub fn definition(&self, name: &str) -> Option<Value> {
        self.get(name).map(model_definition)
    }

    /// `{ "<Model>": { ... }, ... }` in registration order.
    pub fn definitions(&self) -> Value {
        let mut out = Map::new();
        for (name, schema) in &self.models {
            out.insert(name.clone(), model_definition(schema));
        }
        Value::Object(out)
    }
}

impl ModelRegistry for SwaggerRegistry {
    fn register_model(&mut self, name: &str, fields: FieldSchema) -> ModelRef {
        if let Some(slot) = self.models.iter_mut().find(|(n, _)| n == name) {
            tracing::debug!(model = name, "replacing registered model");
            slot.1 = fields;
        } else {
            self.models.push((name.to_string(), fields));
        }
        ModelRef::new(name)
    }
}

pub fn model_definition(schema: &FieldSchema) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();
    for (name, field) in schema.iter() {
        if field.required {
            required.push(name);
        }
        properties.insert(name.to_string(), field_schema(field));
    }
    required.sort_unstable();

    let mut def = Map::new();
    if !required.is_empty() {
        def.insert("required".to_string(), json!(required));
    }
    def.insert("properties".to_string(), Value::Object(properties));
    def.insert("type".to_string(), json!("object"));
    Value::Object(def)
}

fn field_schema(field: &FieldDescriptor) -> Value {
    let mut out = Map::new();
    match &field.ty {
        FieldType::String => {
            out.insert("type".into(), json!("string"));
        }
        FieldType::Integer => {
            out.insert("type".into(), json!("integer"));
        }
        FieldType::Float => {
            out.insert("type".into(), json!("number"));
        }
        FieldType::Boolean => {
            out.insert("type".into(), json!("boolean"));
        }
        FieldType::Date => {
            out.insert("type".into(), json!("string"));
            out.insert("format".into(), json!("date"));
        }
        FieldType::DateTime => {
            out.insert("type".into(), json!("string"));
            out.insert("format".into(), json!("date-time"));
        }
        FieldType::Raw => {
            out.insert("type".into(), json!("object"));
        }
        FieldType::List(item) => {
            out.insert("type".into(), json!("array"));
            out.insert("items".into(), field_schema(item));
        }
        FieldType::Nested(model) => {
            out.insert("$ref".into(), json!(format!("#/definitions/{}", model.name)));
        }
    }
    if let Some(max) = field.max_length {
        out.insert("maxLength".into(), json!(max));
    }
    if let Some(default) = &field.default {
        out.insert("default".into(), scalar_json(default));
    }
    if field.readonly {
        out.insert("readOnly".into(), json!(true));
    }
    Value::Object(out)
}

fn scalar_json(value: &ScalarValue) -> Value {
    match value {
        ScalarValue::String(s) => json!(s),
        ScalarValue::Integer(i) => json!(i),
        ScalarValue::Float(f) => json!(f),
        ScalarValue::Boolean(b) => json!(b),
        ScalarValue::Bytes(bytes) => json!(String::from_utf8_lossy(bytes)),
    }
}
