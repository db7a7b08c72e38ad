use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("column `{table}.{column}` has type `{type_name}`, which is not recognized/supported")]
    UnrecognizedType {
        table: String,
        column: String,
        type_name: String,
    },

    #[error("model `{model}` already has a field named `{field}`")]
    NameCollision { model: String, field: String },

    #[error("nested expansion exceeded depth {limit} (chain: {})", chain.join(" -> "))]
    RecursionLimit { limit: usize, chain: Vec<String> },

    #[error("nested model `{model}` already describes `{existing}`, not `{target}`")]
    NestedModelCollision {
        model: String,
        existing: String,
        target: String,
    },

    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    #[error("entity `{table}` has no attribute `{field}`")]
    UnknownField { table: String, field: String },
}

pub type Result<T> = std::result::Result<T, GenerateError>;
