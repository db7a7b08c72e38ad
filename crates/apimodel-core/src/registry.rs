use crate::field::{FieldSchema, ModelRef};

/// Destination for assembled schemas (an API documentation framework's model table).
///
/// The registry owns a schema once it is registered.
pub trait ModelRegistry {
    fn register_model(&mut self, name: &str, fields: FieldSchema) -> ModelRef;
}

impl<R: ModelRegistry + ?Sized> ModelRegistry for &mut R {
    fn register_model(&mut self, name: &str, fields: FieldSchema) -> ModelRef {
        (**self).register_model(name, fields)
    }
}
