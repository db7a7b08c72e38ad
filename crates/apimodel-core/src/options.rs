use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How relationships contribute fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipMode {
    /// Relationships become fields typed after their local join column.
    #[default]
    Flat,
    /// Relationships expand into registered nested models of their target.
    Nested,
}

/// Per-invocation generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Registered model name; defaults to the capitalized table name.
    pub name: Option<String>,
    /// Allow-list of column attributes. When set, relationships are not expanded.
    pub fields: Option<Vec<String>>,
    /// Attributes forced read-only.
    pub readonly: BTreeSet<String>,
    /// Attributes shown as regular fields even when normally hidden (primary keys).
    pub show: BTreeSet<String>,
    /// Convert output names to camelCase.
    pub camel_case: bool,
    /// Attributes excluded from consideration entirely.
    pub ignore: BTreeSet<String>,
    pub relationships: RelationshipMode,
    pub max_depth: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            name: None,
            fields: None,
            readonly: BTreeSet::new(),
            show: BTreeSet::new(),
            camel_case: false,
            ignore: BTreeSet::new(),
            relationships: RelationshipMode::Flat,
            max_depth: crate::DEFAULT_MAX_DEPTH,
        }
    }
}

impl GenerateOptions {
    pub fn nested() -> Self {
        Self {
            relationships: RelationshipMode::Nested,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_readonly<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readonly.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_show<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.show.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn camel_case(mut self, on: bool) -> Self {
        self.camel_case = on;
        self
    }

    /// Options for a nested expansion: naming, read-only and visibility sets
    /// carry over; the allow-list and explicit name do not.
    pub(crate) fn for_nested(&self) -> Self {
        Self {
            name: None,
            fields: None,
            ..self.clone()
        }
    }
}
